//! Global search and system introspection.

use serde_json::{json, Value};

use tracrpc_core::{CallOutcome, ClientError};

use crate::TracClient;

impl TracClient {
    /// Run a global search, optionally restricted to specific filters
    /// (e.g. `["wiki", "ticket"]`).
    pub fn search(&mut self, query: &str, filters: &[&str]) -> Result<CallOutcome, ClientError> {
        Self::require(query, "search query")?;

        let mut params = vec![json!(query)];
        if !filters.is_empty() {
            params.push(Value::Array(filters.iter().map(|f| json!(f)).collect()));
        }
        self.call("search.performSearch", params)
    }

    /// Names and descriptions of the configured search filters.
    pub fn get_search_filters(&mut self) -> Result<CallOutcome, ClientError> {
        self.call("search.getSearchFilters", vec![])
    }

    /// Version of the RPC plugin API on the remote.
    pub fn get_api_version(&mut self) -> Result<CallOutcome, ClientError> {
        self.call("system.getAPIVersion", vec![])
    }
}
