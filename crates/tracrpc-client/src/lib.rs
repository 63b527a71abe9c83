//! Blocking HTTP client for the Trac XML-RPC/JSON-RPC plugin.
//!
//! [`TracClient`] wraps a [`Session`] over a blocking reqwest transport
//! and exposes the Trac operation catalog as typed convenience methods.
//! Each method is a thin parameter-shaping call into the core; all the
//! real invariants (id assignment, batching, response decoding) live in
//! `tracrpc-core`.
//!
//! # Example
//!
//! ```ignore
//! use tracrpc_client::TracClient;
//! use tracrpc_core::SessionConfig;
//!
//! let config = SessionConfig::new("https://trac.example.org/jsonrpc").batching(true);
//! let mut trac = TracClient::new(config)?;
//!
//! let page = trac.get_wiki_page("TracGuide", None, true)?;
//! let ticket = trac.get_ticket("10000")?;
//! trac.flush()?;
//!
//! let guide = trac.results().get(page.id().unwrap());
//! ```

mod methods;
mod transport;

pub use methods::TicketResource;
pub use transport::HttpTransport;

pub use tracrpc_core::{
    CallOutcome, ClientError, ContentType, Credentials, ResultStore, Session, SessionConfig,
};

use serde_json::Value;
use tracrpc_core::Transport;

/// High-level client for one Trac endpoint configuration.
pub struct TracClient {
    session: Session,
}

impl TracClient {
    /// Build a client over the default blocking HTTP transport.
    pub fn new(config: SessionConfig) -> Result<Self, ClientError> {
        let transport = HttpTransport::new()?;
        Ok(Self::with_transport(config, Box::new(transport)))
    }

    /// Build a client over a caller-supplied transport (stubs in tests,
    /// alternative HTTP stacks).
    pub fn with_transport(config: SessionConfig, transport: Box<dyn Transport>) -> Self {
        Self {
            session: Session::new(config, transport),
        }
    }

    /// Stage an arbitrary RPC call; the catalog methods funnel through
    /// here.
    pub fn call(&mut self, method: &str, params: Vec<Value>) -> Result<CallOutcome, ClientError> {
        self.session.call(method, params)
    }

    /// Send the staged batch as one `system.multicall` round-trip.
    pub fn flush(&mut self) -> Result<(), ClientError> {
        self.session.flush()
    }

    /// Decoded results of the last completed exchange.
    pub fn results(&self) -> &ResultStore {
        self.session.results()
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut Session {
        &mut self.session
    }

    /// Guard shared by the catalog methods: required string arguments
    /// must be non-empty before anything touches the queue.
    fn require(value: &str, what: &str) -> Result<(), ClientError> {
        if value.trim().is_empty() {
            return Err(ClientError::InvalidCall(format!("{} is empty", what)));
        }
        Ok(())
    }
}
