//! Transport-agnostic core of the Trac RPC client.
//!
//! Trac exposes its API through the XmlRpcPlugin, which speaks both
//! XML-RPC and JSON-RPC over plain HTTP POST. This crate implements the
//! client-side marshalling layer for that protocol:
//!
//! - **`types`** — the `{method, params, id}` / `{id, result, error}` wire
//!   shapes and their serialization quirks
//! - **`codec`** — the `__jsonclass__` tagged-value codec (datetime, binary)
//! - **`queue`** — call staging and `system.multicall` batching
//! - **`decoder`** — response parsing and multicall demultiplexing
//! - **`store`** — per-session result/error lookup by request id
//! - **`transport`** — the contract an HTTP adapter must fulfil
//! - **`session`** — ties the above together for one endpoint configuration
//!
//! It is intentionally free of any HTTP dependency so the transport can be
//! swapped (blocking reqwest in `tracrpc-client`, stubs in tests).
//!
//! # Example
//!
//! ```ignore
//! use tracrpc_core::{Session, SessionConfig};
//!
//! let config = SessionConfig::new("https://trac.example.org/jsonrpc").batching(true);
//! let mut session = Session::new(config, Box::new(transport));
//!
//! let a = session.call("wiki.getPage", vec!["TracGuide".into()])?;
//! let b = session.call("ticket.get", vec!["10000".into()])?;
//! session.flush()?;
//!
//! let page = session.results().get(a.id().unwrap());
//! ```

pub mod codec;
pub mod decoder;
pub mod error;
pub mod queue;
pub mod session;
pub mod store;
pub mod transport;
pub mod types;

pub use codec::TaggedValue;
pub use decoder::ResponseDecoder;
pub use error::ClientError;
pub use queue::{BatchPayload, RequestBuilder, SinglePayload};
pub use session::{CallOutcome, Session, SessionConfig};
pub use store::ResultStore;
pub use transport::{ContentType, Credentials, Transport, TransportRequest};
pub use types::{Call, Envelope};
