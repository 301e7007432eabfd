// The `paginator` module walks a mailbox label page by page.

use crate::mailbox::{Mailbox, MessagePage};
use std::sync::Arc;
use tracing::{debug, warn};

pub const DEFAULT_LABEL: &str = "INBOX";

/// Fetches pages of message references for one label.
pub struct Paginator {
    mailbox: Arc<dyn Mailbox>,
    label: String,
}

impl Paginator {
    pub fn new(mailbox: Arc<dyn Mailbox>, label: &str) -> Self {
        Self {
            mailbox,
            label: label.to_string(),
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// Fetches the page at `token` (the first page when absent).
    ///
    /// A provider failure yields an empty page without a continuation
    /// token, which ends pagination.
    pub async fn fetch_page(&self, token: Option<&str>) -> MessagePage {
        match self.mailbox.list_messages(&self.label, token).await {
            Ok(page) => {
                debug!(
                    label = %self.label,
                    messages = page.messages.len(),
                    has_next = page.next_token.is_some(),
                    "Listed messages"
                );
                page
            }
            Err(e) => {
                warn!(label = %self.label, error = %e, "Failed to fetch emails");
                MessagePage::default()
            }
        }
    }
}
