// The `executor` module acts on a classification: delete the message or leave it alone.

use crate::mailbox::{Mailbox, MessageRef};
use crate::pipeline::oracle::{OracleError, Verdict};
use std::sync::Arc;
use tracing::{info, warn};

/// Applies verdicts to the mailbox. Never fails the caller.
pub struct Executor {
    mailbox: Arc<dyn Mailbox>,
    dry_run: bool,
}

impl Executor {
    pub fn new(mailbox: Arc<dyn Mailbox>) -> Self {
        Self {
            mailbox,
            dry_run: false,
        }
    }

    /// In dry-run mode delete verdicts are logged but not carried out.
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Returns how many messages were deleted: 1 or 0.
    ///
    /// A failed classification keeps the message. A failed deletion is
    /// logged and not retried.
    pub async fn apply(&self, message: &MessageRef, verdict: Result<Verdict, OracleError>) -> u64 {
        let verdict = match verdict {
            Ok(verdict) => verdict,
            Err(e) => {
                warn!(message_id = %message.id, error = %e, "Failed to evaluate email, keeping it");
                return 0;
            }
        };

        if !verdict.is_delete() {
            info!(message_id = %message.id, "Email is worth the time, keeping it");
            return 0;
        }

        if self.dry_run {
            info!(message_id = %message.id, "Email is not worth the time, would delete it (dry run)");
            return 0;
        }

        info!(message_id = %message.id, "Email is not worth the time, deleting it");
        match self.mailbox.delete_message(&message.id).await {
            Ok(()) => {
                info!(message_id = %message.id, "Email deleted successfully");
                1
            }
            Err(e) => {
                warn!(message_id = %message.id, error = %e, "Failed to delete email");
                0
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::LLMError;
    use crate::testing::MockMailbox;

    fn message() -> MessageRef {
        MessageRef::new("m1")
    }

    #[tokio::test]
    async fn delete_verdict_deletes_the_message() {
        let mailbox = Arc::new(MockMailbox::default());
        let executor = Executor::new(mailbox.clone());

        let deleted = executor.apply(&message(), Ok(Verdict::Delete)).await;

        assert_eq!(deleted, 1);
        assert_eq!(mailbox.deleted(), vec!["m1"]);
    }

    #[tokio::test]
    async fn keep_verdict_has_no_side_effect() {
        let mailbox = Arc::new(MockMailbox::default());
        let executor = Executor::new(mailbox.clone());

        let deleted = executor.apply(&message(), Ok(Verdict::Keep)).await;

        assert_eq!(deleted, 0);
        assert!(mailbox.deleted().is_empty());
    }

    #[tokio::test]
    async fn failed_classification_keeps_the_message() {
        let mailbox = Arc::new(MockMailbox::default());
        let executor = Executor::new(mailbox.clone());
        let failure = OracleError::Model(LLMError::PromptError("timeout".to_string()));

        let deleted = executor.apply(&message(), Err(failure)).await;

        assert_eq!(deleted, 0);
        assert!(mailbox.deleted().is_empty());
    }

    #[tokio::test]
    async fn failed_deletion_counts_nothing() {
        let mailbox = Arc::new(MockMailbox::default().with_undeletable("m1"));
        let executor = Executor::new(mailbox.clone());

        let deleted = executor.apply(&message(), Ok(Verdict::Delete)).await;

        assert_eq!(deleted, 0);
        assert!(mailbox.deleted().is_empty());
    }

    #[tokio::test]
    async fn dry_run_never_deletes() {
        let mailbox = Arc::new(MockMailbox::default());
        let executor = Executor::new(mailbox.clone()).with_dry_run(true);

        let deleted = executor.apply(&message(), Ok(Verdict::Delete)).await;

        assert_eq!(deleted, 0);
        assert!(mailbox.deleted().is_empty());
    }
}
