//! API client for communicating with the Fleet Scaler service

use anyhow::{Context, Result};
use reqwest::{Client, Response};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::collections::HashMap;
use url::Url;

/// API client for the Fleet Scaler service
pub struct ApiClient {
    client: Client,
    base_url: Url,
}

impl ApiClient {
    /// Create a new API client
    pub fn new(base_url: &str) -> Result<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .context("Failed to create HTTP client")?;

        let base_url = Url::parse(base_url).context("Invalid API URL")?;

        Ok(Self { client, base_url })
    }

    /// Make a GET request
    ///
    /// Health endpoints answer 503 with a JSON body, so any parsable body
    /// is returned regardless of status.
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = self.base_url.join(path).context("Invalid path")?;

        let response = self
            .client
            .get(url)
            .send()
            .await
            .context("Failed to send request")?;

        let status = response.status();
        let body = response.text().await.context("Failed to read response")?;
        serde_json::from_str(&body)
            .with_context(|| format!("Unexpected response ({}): {}", status, body))
    }

    /// Make a POST request with JSON body
    pub async fn post<T: DeserializeOwned, B: Serialize>(&self, path: &str, body: &B) -> Result<T> {
        let url = self.base_url.join(path).context("Invalid path")?;

        let response = self
            .client
            .post(url)
            .json(body)
            .send()
            .await
            .context("Failed to send request")?;

        parse_response(response).await
    }
}

async fn parse_response<T: DeserializeOwned>(response: Response) -> Result<T> {
    if !response.status().is_success() {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        match serde_json::from_str::<ErrorResponse>(&body) {
            Ok(err) => anyhow::bail!("{} ({}): {}", err.code, status, err.error),
            Err(_) => anyhow::bail!("API error ({}): {}", status, body),
        }
    }

    response.json().await.context("Failed to parse response")
}

// API request and response types

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupScaleRequest {
    pub group: String,
    pub mode: String,
    pub amount: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceScaleRequest {
    pub cluster: String,
    pub service: String,
    pub mode: String,
    pub amount: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdjustmentReport {
    pub resource: String,
    pub kind: String,
    pub mode: String,
    pub amount: i64,
    pub baseline: i64,
    pub previous_desired: i64,
    pub target: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<i64>,
    pub stages: Vec<String>,
    pub completed_at: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComponentHealth {
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub last_check_timestamp: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub components: HashMap<String, ComponentHealth>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReadinessResponse {
    pub ready: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stage: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;

    const REPORT: &str = r#"{
        "resource": "web-asg",
        "kind": "instance_group",
        "mode": "set",
        "amount": 10,
        "baseline": 2,
        "previous_desired": 2,
        "target": 5,
        "min": 1,
        "max": 5,
        "stages": ["start", "reading", "computing", "applying", "done"],
        "completed_at": 1700000000
    }"#;

    #[tokio::test]
    async fn test_post_returns_report() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/v1/instance-groups/scale")
            .match_body(Matcher::PartialJson(serde_json::json!({
                "group": "web-asg",
                "mode": "set",
                "amount": 10
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(REPORT)
            .create_async()
            .await;

        let client = ApiClient::new(&server.url()).unwrap();
        let request = GroupScaleRequest {
            group: "web-asg".to_string(),
            mode: "set".to_string(),
            amount: 10,
        };
        let report: AdjustmentReport = client
            .post("v1/instance-groups/scale", &request)
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(report.target, 5);
        assert_eq!(report.max, Some(5));
    }

    #[tokio::test]
    async fn test_post_surfaces_error_code() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/v1/container-services/scale")
            .with_status(404)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{"error": "service prod/api not found", "code": "resource_not_found", "stage": "reading"}"#,
            )
            .create_async()
            .await;

        let client = ApiClient::new(&server.url()).unwrap();
        let request = ServiceScaleRequest {
            cluster: "prod".to_string(),
            service: "api".to_string(),
            mode: "set".to_string(),
            amount: 3,
        };
        let err = client
            .post::<AdjustmentReport, _>("v1/container-services/scale", &request)
            .await
            .unwrap_err();

        let message = err.to_string();
        assert!(message.contains("resource_not_found"));
        assert!(message.contains("404"));
    }

    #[tokio::test]
    async fn test_get_accepts_unhealthy_body() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/readyz")
            .with_status(503)
            .with_body(r#"{"ready": false, "reason": "Resource manager clients not yet constructed"}"#)
            .create_async()
            .await;

        let client = ApiClient::new(&server.url()).unwrap();
        let readiness: ReadinessResponse = client.get("readyz").await.unwrap();

        assert!(!readiness.ready);
        assert!(readiness.reason.is_some());
    }

    #[test]
    fn test_invalid_base_url_rejected() {
        assert!(ApiClient::new("not a url").is_err());
    }
}
