//! Session orchestration.
//!
//! A [`Session`] pairs one endpoint configuration with a request builder,
//! a result store and a transport. It is single-threaded and synchronous:
//! every flush is one blocking round-trip, and callers on multiple threads
//! must serialize access themselves (one session per logical batch is the
//! intended shape). Sessions are cheap to discard and recreate.

use serde_json::Value;

use crate::decoder::ResponseDecoder;
use crate::error::ClientError;
use crate::queue::RequestBuilder;
use crate::store::ResultStore;
use crate::transport::{ContentType, Credentials, Transport, TransportRequest};

/// Endpoint configuration for one session.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Complete endpoint URL, e.g. `https://trac.example.org/login/jsonrpc`.
    pub url: String,
    /// Required for `/login/...` URLs.
    pub credentials: Option<Credentials>,
    /// Stage calls for one `system.multicall` round-trip instead of
    /// sending each call immediately.
    pub batch: bool,
    /// Explicit content type for generic `/rpc` URLs. Ignored when the
    /// URL itself selects a protocol.
    pub content_type: Option<ContentType>,
    /// When false, responses are kept as raw text only and the result
    /// store is never populated.
    pub decode_responses: bool,
}

impl SessionConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            credentials: None,
            batch: false,
            content_type: None,
            decode_responses: true,
        }
    }

    pub fn credentials(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.credentials = Some(Credentials::new(username, password));
        self
    }

    pub fn batching(mut self, batch: bool) -> Self {
        self.batch = batch;
        self
    }

    pub fn content_type(mut self, content_type: ContentType) -> Self {
        self.content_type = Some(content_type);
        self
    }

    pub fn decode_responses(mut self, decode: bool) -> Self {
        self.decode_responses = decode;
        self
    }
}

/// What a staged call handed back to the caller.
#[derive(Debug, Clone)]
pub enum CallOutcome {
    /// Batch mode: the call is staged; its result appears in the store
    /// under this id after [`Session::flush`].
    Queued(u64),
    /// Single mode: the round-trip already happened.
    Value(Value),
}

impl CallOutcome {
    /// The staged request id, if any.
    pub fn id(&self) -> Option<u64> {
        match self {
            CallOutcome::Queued(id) => Some(*id),
            CallOutcome::Value(_) => None,
        }
    }

    /// The immediate result, if any.
    pub fn into_value(self) -> Option<Value> {
        match self {
            CallOutcome::Queued(_) => None,
            CallOutcome::Value(value) => Some(value),
        }
    }
}

/// One request-builder/result-store pairing against one endpoint.
pub struct Session {
    config: SessionConfig,
    builder: RequestBuilder,
    store: ResultStore,
    transport: Box<dyn Transport>,
    last_error: Option<String>,
    last_raw: Option<String>,
}

impl Session {
    pub fn new(config: SessionConfig, transport: Box<dyn Transport>) -> Self {
        Self {
            config,
            builder: RequestBuilder::new(),
            store: ResultStore::new(),
            transport,
            last_error: None,
            last_raw: None,
        }
    }

    /// Stage one call.
    ///
    /// In batch mode the call is queued and its id returned; nothing goes
    /// on the wire until [`Session::flush`]. Otherwise the call is sent
    /// immediately, the store is replaced wholesale with the decoded
    /// response, and the result comes back directly.
    pub fn call(&mut self, method: &str, params: Vec<Value>) -> Result<CallOutcome, ClientError> {
        let id = self.builder.enqueue(method, params)?;

        if self.config.batch {
            return Ok(CallOutcome::Queued(id));
        }

        let payload = self.builder.flush_single()?;
        let raw = self.exchange(&payload.body)?;

        self.store = ResultStore::new();
        if !self.config.decode_responses {
            let text = String::from_utf8_lossy(&raw).into_owned();
            self.last_raw = Some(text.clone());
            return Ok(CallOutcome::Value(Value::String(text)));
        }

        let envelope = self.decode(&raw)?;
        ResponseDecoder::resolve(&mut self.store, envelope);

        Ok(CallOutcome::Value(
            self.store.get_default().cloned().unwrap_or(Value::Null),
        ))
    }

    /// Send the staged batch as one `system.multicall` round-trip and
    /// demultiplex the response back onto the staged ids.
    pub fn flush(&mut self) -> Result<(), ClientError> {
        if !self.config.batch {
            return Err(ClientError::InvalidCall(
                "flush is only meaningful in batch mode".into(),
            ));
        }

        let payload = self.builder.flush_batch()?;
        let raw = self.exchange(&payload.body)?;

        if !self.config.decode_responses {
            self.last_raw = Some(String::from_utf8_lossy(&raw).into_owned());
            return Ok(());
        }

        let envelope = self.decode(&raw)?;
        ResponseDecoder::resolve_batch(&mut self.store, envelope, &payload.ids)
            .map_err(|e| self.record(e))
    }

    /// One blocking exchange, after the credential precondition.
    fn exchange(&mut self, body: &str) -> Result<Vec<u8>, ClientError> {
        if self.config.url.contains("login") {
            let complete = self
                .config
                .credentials
                .as_ref()
                .is_some_and(Credentials::is_complete);
            if !complete {
                return Err(self.record(ClientError::MissingCredentials(format!(
                    "authenticated endpoint {} needs username and password",
                    self.config.url
                ))));
            }
        }

        let request = TransportRequest {
            url: &self.config.url,
            body,
            content_type: self.content_type(),
            credentials: self.config.credentials.as_ref(),
        };

        tracing::debug!("POST {} ({} bytes)", request.url, body.len());
        let raw = self
            .transport
            .send(&request)
            .map_err(|e| self.record(e))?;
        self.last_raw = Some(String::from_utf8_lossy(&raw).into_owned());
        Ok(raw)
    }

    fn decode(&mut self, raw: &[u8]) -> Result<crate::types::Envelope, ClientError> {
        ResponseDecoder::decode(raw).map_err(|e| self.record(e))
    }

    /// Keep the session's last transport/decode error queryable.
    fn record(&mut self, error: ClientError) -> ClientError {
        tracing::warn!("{}", error);
        self.last_error = Some(error.to_string());
        error
    }

    /// Effective content type: URL shape first, then explicit config,
    /// then the JSON default.
    pub fn content_type(&self) -> ContentType {
        ContentType::from_url(&self.config.url)
            .or(self.config.content_type)
            .unwrap_or(ContentType::Json)
    }

    /// Decoded results of the last completed exchange.
    pub fn results(&self) -> &ResultStore {
        &self.store
    }

    /// Number of staged, not yet flushed calls.
    pub fn pending(&self) -> usize {
        self.builder.pending()
    }

    /// Last transport or decode failure, if any.
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Untouched text of the last response body.
    pub fn last_raw(&self) -> Option<&str> {
        self.last_raw.as_deref()
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }
}
