//! # Mailsweep: LLM-assisted inbox triage.
//!
//! Walks a mailbox page by page, asks a language model whether each message
//! is promotional or automated noise, and deletes the ones that are. A fault
//! in one message never ends the run.

/// The `agent` module drives a complete triage run.
pub mod agent;
/// The `config` module gathers run settings from code or the environment.
pub mod config;
/// The `llm` module provides a trait for interacting with language models.
pub mod llm;
/// The `mailbox` module defines the mail provider seam and its Gmail implementation.
pub mod mailbox;
/// The `pipeline` module holds the individual triage stages.
pub mod pipeline;
/// The `utils` module provides Google authentication and prompt templating.
pub mod utils;

#[cfg(test)]
pub(crate) mod testing;

pub use agent::{TriageAgent, TriageAgentBuilder};
pub use config::{TriageConfig, TriageConfigBuilder};
pub use mailbox::{GmailMailbox, GmailMailboxBuilder, Mailbox};
pub use pipeline::{Oracle, OwnerIdentity, RunStatistics, Verdict};
