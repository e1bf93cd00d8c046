//! Fleet Scaler CLI
//!
//! A command-line tool for submitting scaling triggers to the fleet scaler
//! and checking its health.

mod client;
mod commands;
mod config;
mod output;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use commands::{health, scale};

/// Fleet Scaler CLI
#[derive(Parser)]
#[command(name = "fleetctl")]
#[command(author, version, about = "CLI for the Fleet Scaler", long_about = None)]
pub struct Cli {
    /// API endpoint URL (falls back to the config file, then http://localhost:8080)
    #[arg(long, env = "FLEETCTL_API_URL")]
    pub api_url: Option<String>,

    /// Output format
    #[arg(long, short)]
    pub format: Option<output::OutputFormat>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Adjust the desired capacity of an instance group
    Group {
        /// Auto Scaling group name
        name: String,

        #[command(flatten)]
        change: ChangeArgs,
    },

    /// Adjust the desired count of a container service
    Service {
        /// Cluster name
        cluster: String,

        /// Service name
        service: String,

        #[command(flatten)]
        change: ChangeArgs,
    },

    /// Show scaler health and readiness
    Health,
}

/// Exactly one of `--add` or `--set`
#[derive(Args, Debug)]
#[group(required = true, multiple = false)]
pub struct ChangeArgs {
    /// Change capacity by a signed delta
    #[arg(long, allow_negative_numbers = true)]
    pub add: Option<i64>,

    /// Set capacity to an absolute value
    #[arg(long)]
    pub set: Option<i64>,
}

impl ChangeArgs {
    fn change(&self) -> scale::Change {
        match (self.add, self.set) {
            (Some(delta), _) => scale::Change::Add(delta),
            (None, Some(target)) => scale::Change::Set(target),
            // clap enforces that one of the two is present
            (None, None) => scale::Change::Add(0),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = config::Config::load()?;
    let format = config.format(cli.format);
    let client = client::ApiClient::new(&config.api_url(cli.api_url))?;

    let result = match &cli.command {
        Commands::Group { name, change } => {
            scale::scale_group(&client, name, change.change(), format).await
        }
        Commands::Service {
            cluster,
            service,
            change,
        } => scale::scale_service(&client, cluster, service, change.change(), format).await,
        Commands::Health => health::show_health(&client, format).await,
    };

    if let Err(err) = &result {
        output::print_error(&format!("{:#}", err));
        std::process::exit(1);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_group_set_parses() {
        let cli = Cli::try_parse_from(["fleetctl", "group", "web-asg", "--set", "5"]).unwrap();
        match cli.command {
            Commands::Group { name, change } => {
                assert_eq!(name, "web-asg");
                assert_eq!(change.change(), scale::Change::Set(5));
            }
            _ => panic!("expected group command"),
        }
    }

    #[test]
    fn test_service_negative_add_parses() {
        let cli = Cli::try_parse_from(["fleetctl", "service", "prod", "api", "--add", "-2"])
            .unwrap();
        match cli.command {
            Commands::Service {
                cluster,
                service,
                change,
            } => {
                assert_eq!(cluster, "prod");
                assert_eq!(service, "api");
                assert_eq!(change.change(), scale::Change::Add(-2));
            }
            _ => panic!("expected service command"),
        }
    }

    #[test]
    fn test_change_is_required() {
        assert!(Cli::try_parse_from(["fleetctl", "group", "web-asg"]).is_err());
    }

    #[test]
    fn test_add_and_set_are_exclusive() {
        let result =
            Cli::try_parse_from(["fleetctl", "group", "web-asg", "--add", "1", "--set", "3"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_format_flag() {
        let cli = Cli::try_parse_from(["fleetctl", "--format", "json", "health"]).unwrap();
        assert_eq!(cli.format, Some(output::OutputFormat::Json));
    }
}
