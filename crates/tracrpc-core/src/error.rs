//! Error taxonomy for the RPC client core.
//!
//! Local, structural failures are the only ones surfaced as `Err`:
//! enqueue-time rejections, flush misuse, credential preconditions,
//! transport problems and unparseable responses. A remote application
//! fault (a non-null `error` member in the response) is *not* a local
//! error — it is decoded and stored per request id, and read back via
//! [`ResultStore::get_error`](crate::store::ResultStore::get_error).

/// Failures raised by the client core.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// Empty method name or malformed arguments at enqueue time.
    /// The queue is left untouched.
    #[error("Invalid call: {0}")]
    InvalidCall(String),

    /// Flush attempted with nothing to send (or a multi-entry queue
    /// outside batch mode).
    #[error("Empty queue: {0}")]
    EmptyQueue(String),

    /// Authenticated endpoint without a complete username/password pair.
    /// Raised before any network attempt.
    #[error("Missing credentials: {0}")]
    MissingCredentials(String),

    /// Any network-layer problem: connect failure, timeout, TLS failure,
    /// non-2xx status. The affected call yields no result store entry.
    #[error("Transport failure: {0}")]
    Transport(String),

    /// Response bytes did not parse into a recognizable envelope.
    #[error("Malformed response: {0}")]
    MalformedResponse(String),
}
