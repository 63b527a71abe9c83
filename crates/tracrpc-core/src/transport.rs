//! Transport contract and endpoint configuration values.
//!
//! The core performs no networking itself. An adapter implements
//! [`Transport`] to carry one serialized payload to the endpoint and
//! return the raw response bytes; `tracrpc-client` provides a blocking
//! reqwest implementation, tests provide stubs.

use crate::error::ClientError;

/// Content type of the RPC endpoint.
///
/// The Trac plugin serves both protocols on overlapping paths, so the
/// type is derived once per session from the URL shape:
///
/// - URLs containing `jsonrpc` speak JSON
/// - URLs containing `xmlrpc` speak XML
/// - a generic `/rpc` path needs an explicit configuration value and
///   defaults to JSON
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentType {
    Json,
    Xml,
}

impl ContentType {
    /// Derive the content type from the endpoint URL, if unambiguous.
    pub fn from_url(url: &str) -> Option<ContentType> {
        if url.contains("jsonrpc") {
            Some(ContentType::Json)
        } else if url.contains("xmlrpc") {
            Some(ContentType::Xml)
        } else {
            None
        }
    }

    /// MIME value for the `Content-Type` request header.
    pub fn as_mime(&self) -> &'static str {
        match self {
            ContentType::Json => "application/json",
            ContentType::Xml => "application/xml",
        }
    }
}

/// Username/password pair for authenticated (`/login/...`) endpoints.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    /// Both halves must be non-empty for an authenticated request.
    pub fn is_complete(&self) -> bool {
        !self.username.is_empty() && !self.password.is_empty()
    }
}

/// Everything a transport needs for one request/response exchange.
#[derive(Debug)]
pub struct TransportRequest<'a> {
    pub url: &'a str,
    /// Serialized request payload.
    pub body: &'a str,
    pub content_type: ContentType,
    /// Present only for authenticated endpoints; already validated as
    /// complete by the session.
    pub credentials: Option<&'a Credentials>,
}

/// One blocking request/response exchange.
///
/// Implementations map every non-success outcome (connect failure,
/// timeout, TLS failure, non-2xx status) to [`ClientError::Transport`]
/// and never retry: calls are not guaranteed idempotent, so retries are a
/// caller-level decision.
pub trait Transport {
    fn send(&self, request: &TransportRequest<'_>) -> Result<Vec<u8>, ClientError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_type_from_url() {
        assert_eq!(
            ContentType::from_url("https://trac.example.org/jsonrpc"),
            Some(ContentType::Json)
        );
        assert_eq!(
            ContentType::from_url("https://trac.example.org/login/xmlrpc"),
            Some(ContentType::Xml)
        );
        assert_eq!(ContentType::from_url("https://trac.example.org/rpc"), None);
    }

    #[test]
    fn test_credentials_completeness() {
        assert!(Credentials::new("user", "pass").is_complete());
        assert!(!Credentials::new("user", "").is_complete());
        assert!(!Credentials::new("", "pass").is_complete());
    }
}
