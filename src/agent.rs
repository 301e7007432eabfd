use crate::mailbox::{Mailbox, MessageRef};
use crate::pipeline::paginator::DEFAULT_LABEL;
use crate::pipeline::{Decoder, Executor, Oracle, Paginator, RunStatistics, Verdict};
use std::sync::Arc;
use thiserror::Error;
use tracing::{Instrument, debug, info, info_span, warn};
use uuid::Uuid;

#[derive(Error, Debug)]
pub enum AgentError {
    #[error("No classification oracle configured")]
    MissingOracle,
}

/// A builder for [`TriageAgent`].
pub struct TriageAgentBuilder {
    mailbox: Arc<dyn Mailbox>,
    oracle: Option<Oracle>,
    label: String,
    dry_run: bool,
}

impl TriageAgentBuilder {
    /// Creates a new `TriageAgentBuilder` over `mailbox`.
    pub fn new(mailbox: Arc<dyn Mailbox>) -> Self {
        Self {
            mailbox,
            oracle: None,
            label: DEFAULT_LABEL.to_string(),
            dry_run: false,
        }
    }

    pub fn with_oracle(mut self, oracle: Oracle) -> Self {
        self.oracle = Some(oracle);
        self
    }

    /// The label to triage. Defaults to `INBOX`.
    pub fn with_label(mut self, label: &str) -> Self {
        self.label = label.to_string();
        self
    }

    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub fn build(self) -> Result<TriageAgent, AgentError> {
        let oracle = self.oracle.ok_or(AgentError::MissingOracle)?;
        Ok(TriageAgent {
            paginator: Paginator::new(self.mailbox.clone(), &self.label),
            decoder: Decoder::new(self.mailbox.clone()),
            oracle,
            executor: Executor::new(self.mailbox).with_dry_run(self.dry_run),
        })
    }
}

/// Drives one triage run: every page, every message, strictly in order.
pub struct TriageAgent {
    paginator: Paginator,
    decoder: Decoder,
    oracle: Oracle,
    executor: Executor,
}

impl TriageAgent {
    /// Runs until the mailbox reports no further page and returns the totals.
    ///
    /// Individual faults never stop the run; they are logged by the stage
    /// that hit them.
    pub async fn run(&self) -> RunStatistics {
        let span = info_span!("triage_run", run_id = %Uuid::new_v4());
        async {
            info!(label = %self.paginator.label(), "Triage run started");
            let mut stats = RunStatistics::default();
            let mut token: Option<String> = None;

            loop {
                let page = self.paginator.fetch_page(token.as_deref()).await;
                stats.accumulate(RunStatistics::page(page.messages.len()));
                info!(page = stats.pages_fetched(), messages = page.messages.len(), "Fetched page of emails");

                for message in &page.messages {
                    let deleted = self.process_message(message).await;
                    stats.accumulate(RunStatistics::deleted(deleted));
                }

                token = page.next_token;
                if token.is_none() {
                    break;
                }
            }

            for line in stats.to_string().lines() {
                info!("{}", line);
            }
            stats
        }
        .instrument(span)
        .await
    }

    async fn process_message(&self, message: &MessageRef) -> u64 {
        let data = self.decoder.decode(message).await;

        let verdict = if data.is_empty() {
            warn!(message_id = %message.id, "Could not decode email, keeping it unclassified");
            Ok(Verdict::Keep)
        } else {
            self.oracle.classify(&data).await
        };
        debug!(message_id = %message.id, verdict = ?verdict, "Email classified");

        self.executor.apply(message, verdict).await
    }
}
