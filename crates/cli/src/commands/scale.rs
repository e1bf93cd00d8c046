//! Scaling CLI commands

use anyhow::Result;
use colored::Colorize;
use tabled::Tabled;

use crate::client::{AdjustmentReport, ApiClient, GroupScaleRequest, ServiceScaleRequest};
use crate::output::{
    color_status, format_bounds, format_change, format_timestamp, print_json, print_success,
    OutputFormat,
};

/// Requested capacity change
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Change {
    Add(i64),
    Set(i64),
}

impl Change {
    fn mode(&self) -> &'static str {
        match self {
            Change::Add(_) => "add",
            Change::Set(_) => "set",
        }
    }

    fn amount(&self) -> i64 {
        match self {
            Change::Add(amount) | Change::Set(amount) => *amount,
        }
    }
}

/// Row for the adjustment detail table
#[derive(Tabled)]
struct FieldRow {
    #[tabled(rename = "Field")]
    field: &'static str,
    #[tabled(rename = "Value")]
    value: String,
}

/// Scale an instance group
pub async fn scale_group(
    client: &ApiClient,
    group: &str,
    change: Change,
    format: OutputFormat,
) -> Result<()> {
    let request = GroupScaleRequest {
        group: group.to_string(),
        mode: change.mode().to_string(),
        amount: change.amount(),
    };

    let report: AdjustmentReport = client.post("v1/instance-groups/scale", &request).await?;
    render_report(&report, format)
}

/// Scale a container service
pub async fn scale_service(
    client: &ApiClient,
    cluster: &str,
    service: &str,
    change: Change,
    format: OutputFormat,
) -> Result<()> {
    let request = ServiceScaleRequest {
        cluster: cluster.to_string(),
        service: service.to_string(),
        mode: change.mode().to_string(),
        amount: change.amount(),
    };

    let report: AdjustmentReport = client
        .post("v1/container-services/scale", &request)
        .await?;
    render_report(&report, format)
}

fn render_report(report: &AdjustmentReport, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => print_json(report)?,
        OutputFormat::Table => {
            print_success(&format!(
                "{} {} desired capacity set to {}",
                report.kind.replace('_', " "),
                report.resource.cyan(),
                report.target.to_string().bold()
            ));

            let stages = report
                .stages
                .iter()
                .map(|stage| color_status(stage))
                .collect::<Vec<_>>()
                .join(" → ");

            let rows = vec![
                FieldRow {
                    field: "Request",
                    value: format!("{} {}", report.mode, report.amount),
                },
                FieldRow {
                    field: "Baseline",
                    value: report.baseline.to_string(),
                },
                FieldRow {
                    field: "Desired",
                    value: format_change(report.previous_desired, report.target),
                },
                FieldRow {
                    field: "Bounds",
                    value: format_bounds(report.min, report.max),
                },
                FieldRow {
                    field: "Stages",
                    value: stages,
                },
                FieldRow {
                    field: "Completed",
                    value: format_timestamp(report.completed_at),
                },
            ];

            let table = tabled::Table::new(rows)
                .with(tabled::settings::Style::rounded())
                .to_string();
            println!("{}", table);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_change_mode_and_amount() {
        assert_eq!(Change::Add(-2).mode(), "add");
        assert_eq!(Change::Add(-2).amount(), -2);
        assert_eq!(Change::Set(7).mode(), "set");
        assert_eq!(Change::Set(7).amount(), 7);
    }
}
