//! Wiki operations.
//!
//! Methods:
//! - `wiki.getPage` / `wiki.getPageHTML` (+ versioned variants)
//! - `wiki.getPageInfo` / `wiki.getPageInfoVersion`
//! - `wiki.getAllPages`
//! - `wiki.getRecentChanges`
//! - `wiki.wikiToHTML`
//! - `wiki.putPage` / `wiki.deletePage`
//! - `wiki.listAttachments` / `wiki.getAttachment` / `wiki.putAttachment`
//!   / `wiki.deleteAttachment`

use chrono::Utc;
use serde_json::{json, Value};

use tracrpc_core::{CallOutcome, ClientError, TaggedValue};

use crate::TracClient;

impl TracClient {
    /// Fetch a wiki page, raw wiki text or rendered HTML, optionally a
    /// specific version.
    pub fn get_wiki_page(
        &mut self,
        name: &str,
        version: Option<u32>,
        raw: bool,
    ) -> Result<CallOutcome, ClientError> {
        Self::require(name, "wiki page name")?;

        let (method, params) = match (version, raw) {
            (None, true) => ("wiki.getPage", vec![json!(name)]),
            (None, false) => ("wiki.getPageHTML", vec![json!(name)]),
            (Some(v), true) => ("wiki.getPageVersion", vec![json!(name), json!(v)]),
            (Some(v), false) => ("wiki.getPageHTMLVersion", vec![json!(name), json!(v)]),
        };
        self.call(method, params)
    }

    /// Page metadata (author, version, last modified), optionally for a
    /// specific version.
    pub fn get_wiki_page_info(
        &mut self,
        name: &str,
        version: Option<u32>,
    ) -> Result<CallOutcome, ClientError> {
        Self::require(name, "wiki page name")?;

        match version {
            None => self.call("wiki.getPageInfo", vec![json!(name)]),
            Some(v) => self.call("wiki.getPageInfoVersion", vec![json!(name), json!(v)]),
        }
    }

    /// Names of all wiki pages.
    pub fn get_wiki_pages(&mut self) -> Result<CallOutcome, ClientError> {
        self.call("wiki.getAllPages", vec![])
    }

    /// Wiki pages changed since the given Unix timestamp; defaults to
    /// the start of the current day (UTC).
    pub fn get_recent_changed_wiki_pages(
        &mut self,
        since: Option<i64>,
    ) -> Result<CallOutcome, ClientError> {
        self.call("wiki.getRecentChanges", vec![since_param(since)])
    }

    /// Render raw wiki text as HTML.
    pub fn wiki_text_to_html(&mut self, text: &str) -> Result<CallOutcome, ClientError> {
        Self::require(text, "wiki text")?;
        self.call("wiki.wikiToHTML", vec![json!(text)])
    }

    /// Create or update a wiki page.
    pub fn put_wiki_page(
        &mut self,
        name: &str,
        content: &str,
        attributes: Value,
    ) -> Result<CallOutcome, ClientError> {
        Self::require(name, "wiki page name")?;
        self.call("wiki.putPage", vec![json!(name), json!(content), attributes])
    }

    /// Delete a wiki page.
    pub fn delete_wiki_page(&mut self, name: &str) -> Result<CallOutcome, ClientError> {
        Self::require(name, "wiki page name")?;
        self.call("wiki.deletePage", vec![json!(name)])
    }

    /// List attachments of a wiki page.
    pub fn list_wiki_attachments(&mut self, page: &str) -> Result<CallOutcome, ClientError> {
        Self::require(page, "wiki page name")?;
        self.call("wiki.listAttachments", vec![json!(page)])
    }

    /// Fetch one attachment; the result arrives as tagged binary and is
    /// decoded by the core codec.
    pub fn get_wiki_attachment(
        &mut self,
        page: &str,
        file: &str,
    ) -> Result<CallOutcome, ClientError> {
        Self::require(page, "wiki page name")?;
        Self::require(file, "attachment file name")?;
        self.call("wiki.getAttachment", vec![json!(page), json!(file)])
    }

    /// Upload an attachment; the content goes over the wire as a tagged
    /// binary value.
    pub fn put_wiki_attachment(
        &mut self,
        page: &str,
        file_name: &str,
        content: &[u8],
    ) -> Result<CallOutcome, ClientError> {
        Self::require(page, "wiki page name")?;
        Self::require(file_name, "attachment file name")?;

        let blob = TaggedValue::Binary(content.to_vec()).encode();
        self.call(
            "wiki.putAttachment",
            vec![json!(page), json!(file_name), blob],
        )
    }

    /// Delete one attachment of a wiki page.
    pub fn delete_wiki_attachment(
        &mut self,
        page: &str,
        file: &str,
    ) -> Result<CallOutcome, ClientError> {
        Self::require(page, "wiki page name")?;
        Self::require(file, "attachment file name")?;
        self.call("wiki.deleteAttachment", vec![json!(page), json!(file)])
    }
}

/// Tagged datetime parameter for the recent-changes filters; `None`
/// means the start of the current day (UTC).
pub(super) fn since_param(since: Option<i64>) -> Value {
    let ts = since.unwrap_or_else(|| {
        let now = Utc::now().timestamp();
        now - now.rem_euclid(86_400)
    });
    TaggedValue::Datetime(ts).encode()
}
