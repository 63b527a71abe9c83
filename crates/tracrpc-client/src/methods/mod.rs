//! The Trac operation catalog.
//!
//! Convenience methods grouped by API area:
//! - `wiki`   — pages, page info, attachments, wiki-text rendering
//! - `ticket` — tickets, changelogs, attachments, enum resources
//! - `search` — global search, search filters, API version

mod search;
mod ticket;
mod wiki;

pub use ticket::TicketResource;
