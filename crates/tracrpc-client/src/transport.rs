//! Blocking reqwest transport.

use std::time::Duration;

use tracrpc_core::{ClientError, Transport, TransportRequest};

/// One blocking POST per exchange, basic auth for authenticated
/// endpoints. Timeouts match the original client's cURL settings: 30s
/// per request, 5s to connect.
pub struct HttpTransport {
    client: reqwest::blocking::Client,
}

impl HttpTransport {
    pub fn new() -> Result<Self, ClientError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(30))
            .connect_timeout(Duration::from_secs(5))
            .build()
            .map_err(|e| ClientError::Transport(format!("failed to build HTTP client: {}", e)))?;
        Ok(Self { client })
    }
}

impl Transport for HttpTransport {
    fn send(&self, request: &TransportRequest<'_>) -> Result<Vec<u8>, ClientError> {
        let mut builder = self
            .client
            .post(request.url)
            .header(reqwest::header::CONTENT_TYPE, request.content_type.as_mime())
            .body(request.body.to_owned());

        if let Some(credentials) = request.credentials {
            builder = builder.basic_auth(&credentials.username, Some(&credentials.password));
        }

        let response = builder
            .send()
            .map_err(|e| ClientError::Transport(e.to_string()))?
            .error_for_status()
            .map_err(|e| ClientError::Transport(e.to_string()))?;

        tracing::debug!("{} responded {}", request.url, response.status());
        response
            .bytes()
            .map(|b| b.to_vec())
            .map_err(|e| ClientError::Transport(e.to_string()))
    }
}
