// The `mailbox` module defines the seam between the triage pipeline and the mail provider.

pub mod gmail;

use async_trait::async_trait;
use thiserror::Error;

pub use gmail::{GmailMailbox, GmailMailboxBuilder};

/// The `MailboxError` enum defines the provider failures the pipeline has to absorb.
#[derive(Debug, Error)]
pub enum MailboxError {
    /// Listing a page of messages failed.
    #[error("Failed to list messages: {0}")]
    List(String),
    /// Fetching a single message failed.
    #[error("Failed to fetch message {id}: {reason}")]
    Get { id: String, reason: String },
    /// Deleting a message failed.
    #[error("Failed to delete message {id}: {reason}")]
    Delete { id: String, reason: String },
}

/// A reference to a single message, as returned by a list call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageRef {
    /// The mailbox-assigned message id.
    pub id: String,
    /// The thread the message belongs to, when the provider reports one.
    pub thread_id: Option<String>,
}

impl MessageRef {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            thread_id: None,
        }
    }
}

/// One page of message references plus the cursor for the next page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MessagePage {
    pub messages: Vec<MessageRef>,
    /// Absent on the last page.
    pub next_token: Option<String>,
}

/// A header as it appears in the message payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    pub name: String,
    pub value: String,
}

impl Header {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// A node of the MIME tree.
///
/// `body` holds the payload in its wire form (base64url as sent by the
/// provider); decoding is the pipeline's job.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawPart {
    pub mime_type: Option<String>,
    pub headers: Vec<Header>,
    pub body: Option<Vec<u8>>,
    pub parts: Vec<RawPart>,
}

/// The full representation of a message: labels plus the MIME tree.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawMessage {
    pub label_ids: Vec<String>,
    pub payload: Option<RawPart>,
}

/// The contract every mail provider must fulfil for the triage pipeline.
///
/// Implementations only translate calls; they do not retry and they do not
/// swallow errors. Fault handling belongs to the pipeline stages.
#[async_trait]
pub trait Mailbox: Send + Sync {
    /// Lists one page of messages carrying `label`, starting at `page_token`.
    async fn list_messages(
        &self,
        label: &str,
        page_token: Option<&str>,
    ) -> Result<MessagePage, MailboxError>;

    /// Fetches the full representation (headers and MIME structure) of a message.
    async fn get_message(&self, id: &str) -> Result<RawMessage, MailboxError>;

    /// Permanently deletes a message.
    async fn delete_message(&self, id: &str) -> Result<(), MailboxError>;
}
