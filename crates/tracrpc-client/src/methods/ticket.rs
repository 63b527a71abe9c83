//! Ticket operations.
//!
//! Covers single tickets (`ticket.get`, create/update/delete, changelog,
//! actions, attachments), the query interface and the enum resources
//! (`ticket.component.*`, `ticket.milestone.*`, ...), which all share the
//! same getAll/get/create/update/delete shape.

use serde_json::{json, Value};

use tracrpc_core::{CallOutcome, ClientError, TaggedValue};

use super::wiki::since_param;
use crate::TracClient;

/// The enum-like ticket resources the plugin manages per project.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TicketResource {
    Component,
    Milestone,
    Priority,
    Resolution,
    Severity,
    Type,
    Version,
}

impl TicketResource {
    /// RPC method prefix, e.g. `ticket.milestone`.
    fn prefix(&self) -> &'static str {
        match self {
            TicketResource::Component => "ticket.component",
            TicketResource::Milestone => "ticket.milestone",
            TicketResource::Priority => "ticket.priority",
            TicketResource::Resolution => "ticket.resolution",
            TicketResource::Severity => "ticket.severity",
            TicketResource::Type => "ticket.type",
            TicketResource::Version => "ticket.version",
        }
    }

    fn method(&self, op: &str) -> String {
        format!("{}.{}", self.prefix(), op)
    }
}

impl TracClient {
    /// Fetch one ticket by id.
    pub fn get_ticket(&mut self, id: &str) -> Result<CallOutcome, ClientError> {
        Self::require(id, "ticket id")?;
        self.call("ticket.get", vec![json!(id)])
    }

    /// All ticket field definitions.
    pub fn get_ticket_fields(&mut self) -> Result<CallOutcome, ClientError> {
        self.call("ticket.getTicketFields", vec![])
    }

    /// Changelog of a ticket starting at `when`.
    pub fn get_ticket_changelog(
        &mut self,
        id: &str,
        when: i64,
    ) -> Result<CallOutcome, ClientError> {
        Self::require(id, "ticket id")?;
        self.call("ticket.changeLog", vec![json!(id), json!(when)])
    }

    /// Workflow actions currently available on a ticket.
    pub fn get_ticket_actions(&mut self, id: &str) -> Result<CallOutcome, ClientError> {
        Self::require(id, "ticket id")?;
        self.call("ticket.getActions", vec![json!(id)])
    }

    /// Tickets changed since the given Unix timestamp; defaults to the
    /// start of the current day (UTC).
    pub fn get_recent_changed_tickets(
        &mut self,
        since: Option<i64>,
    ) -> Result<CallOutcome, ClientError> {
        self.call("ticket.getRecentChanges", vec![since_param(since)])
    }

    /// Run a ticket query, e.g. `"status=closed&milestone=milestone1"`.
    pub fn query_tickets(&mut self, query: &str) -> Result<CallOutcome, ClientError> {
        Self::require(query, "ticket query")?;
        self.call("ticket.query", vec![json!(query)])
    }

    /// Create a ticket; returns the new ticket id as the call result.
    pub fn create_ticket(
        &mut self,
        summary: &str,
        description: &str,
        attributes: Value,
        notify: bool,
    ) -> Result<CallOutcome, ClientError> {
        Self::require(summary, "ticket summary")?;
        self.call(
            "ticket.create",
            vec![json!(summary), json!(description), attributes, json!(notify)],
        )
    }

    /// Update a ticket with a comment and attribute changes.
    pub fn update_ticket(
        &mut self,
        id: &str,
        comment: &str,
        attributes: Value,
        notify: bool,
    ) -> Result<CallOutcome, ClientError> {
        Self::require(id, "ticket id")?;
        self.call(
            "ticket.update",
            vec![json!(id), json!(comment), attributes, json!(notify)],
        )
    }

    /// Delete a ticket.
    pub fn delete_ticket(&mut self, id: &str) -> Result<CallOutcome, ClientError> {
        Self::require(id, "ticket id")?;
        self.call("ticket.delete", vec![json!(id)])
    }

    /// All known ticket statuses.
    pub fn get_ticket_statuses(&mut self) -> Result<CallOutcome, ClientError> {
        self.call("ticket.status.getAll", vec![])
    }

    /// List attachments of a ticket.
    pub fn list_ticket_attachments(&mut self, id: &str) -> Result<CallOutcome, ClientError> {
        Self::require(id, "ticket id")?;
        self.call("ticket.listAttachments", vec![json!(id)])
    }

    /// Fetch one ticket attachment (tagged binary, decoded by the core).
    pub fn get_ticket_attachment(
        &mut self,
        id: &str,
        file: &str,
    ) -> Result<CallOutcome, ClientError> {
        Self::require(id, "ticket id")?;
        Self::require(file, "attachment file name")?;
        self.call("ticket.getAttachment", vec![json!(id), json!(file)])
    }

    /// Upload a ticket attachment as tagged binary content.
    pub fn put_ticket_attachment(
        &mut self,
        id: &str,
        file_name: &str,
        description: &str,
        content: &[u8],
        replace: bool,
    ) -> Result<CallOutcome, ClientError> {
        Self::require(id, "ticket id")?;
        Self::require(file_name, "attachment file name")?;

        let blob = TaggedValue::Binary(content.to_vec()).encode();
        self.call(
            "ticket.putAttachment",
            vec![
                json!(id),
                json!(file_name),
                json!(description),
                blob,
                json!(replace),
            ],
        )
    }

    /// Delete one ticket attachment.
    pub fn delete_ticket_attachment(
        &mut self,
        id: &str,
        file: &str,
    ) -> Result<CallOutcome, ClientError> {
        Self::require(id, "ticket id")?;
        Self::require(file, "attachment file name")?;
        self.call("ticket.deleteAttachment", vec![json!(id), json!(file)])
    }

    /// All entries of an enum resource (`ticket.<resource>.getAll`).
    pub fn list_ticket_resource(
        &mut self,
        resource: TicketResource,
    ) -> Result<CallOutcome, ClientError> {
        self.call(&resource.method("getAll"), vec![])
    }

    /// One entry of an enum resource by name.
    pub fn get_ticket_resource(
        &mut self,
        resource: TicketResource,
        name: &str,
    ) -> Result<CallOutcome, ClientError> {
        Self::require(name, "resource name")?;
        self.call(&resource.method("get"), vec![json!(name)])
    }

    /// Create an enum resource entry.
    pub fn create_ticket_resource(
        &mut self,
        resource: TicketResource,
        name: &str,
        attributes: Value,
    ) -> Result<CallOutcome, ClientError> {
        Self::require(name, "resource name")?;
        self.call(&resource.method("create"), vec![json!(name), attributes])
    }

    /// Update an enum resource entry.
    pub fn update_ticket_resource(
        &mut self,
        resource: TicketResource,
        name: &str,
        attributes: Value,
    ) -> Result<CallOutcome, ClientError> {
        Self::require(name, "resource name")?;
        self.call(&resource.method("update"), vec![json!(name), attributes])
    }

    /// Delete an enum resource entry.
    pub fn delete_ticket_resource(
        &mut self,
        resource: TicketResource,
        name: &str,
    ) -> Result<CallOutcome, ClientError> {
        Self::require(name, "resource name")?;
        self.call(&resource.method("delete"), vec![json!(name)])
    }
}
