//! HTTP export of encoded metric batches.

use std::fmt;

use reqwest::Client;

use crate::line_protocol::encode_line_protocol;
use crate::point::MetricPoint;

/// Failure while exporting a batch.
#[derive(Debug)]
pub enum ExportError {
    Http(reqwest::Error),
    Status(u16),
}

impl fmt::Display for ExportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExportError::Http(err) => write!(f, "telemetry request failed: {err}"),
            ExportError::Status(code) => write!(f, "telemetry endpoint returned status {code}"),
        }
    }
}

impl std::error::Error for ExportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ExportError::Http(err) => Some(err),
            ExportError::Status(_) => None,
        }
    }
}

impl From<reqwest::Error> for ExportError {
    fn from(err: reqwest::Error) -> Self {
        ExportError::Http(err)
    }
}

/// Posts line-protocol batches to a write endpoint.
#[derive(Debug, Clone)]
pub struct HttpWriter {
    endpoint: String,
    client: Client,
}

impl HttpWriter {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            client: Client::new(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Sends one batch. An empty batch is a no-op.
    pub async fn write(&self, points: &[MetricPoint]) -> Result<(), ExportError> {
        if points.is_empty() {
            return Ok(());
        }
        let body = encode_line_protocol(points);
        let response = self.client.post(&self.endpoint).body(body).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ExportError::Status(status.as_u16()));
        }
        Ok(())
    }
}
