use std::fmt;
use std::ops::AddAssign;

/// Totals for one triage run.
///
/// Counters only grow, and only through [`RunStatistics::accumulate`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunStatistics {
    pages_fetched: u64,
    messages_fetched: u64,
    messages_deleted: u64,
}

impl RunStatistics {
    /// The delta for one fetched page holding `messages` references.
    pub fn page(messages: usize) -> Self {
        Self {
            pages_fetched: 1,
            messages_fetched: messages as u64,
            messages_deleted: 0,
        }
    }

    /// The delta for `count` deleted messages.
    pub fn deleted(count: u64) -> Self {
        Self {
            messages_deleted: count,
            ..Self::default()
        }
    }

    pub fn accumulate(&mut self, delta: RunStatistics) {
        *self += delta;
    }

    pub fn pages_fetched(&self) -> u64 {
        self.pages_fetched
    }

    pub fn messages_fetched(&self) -> u64 {
        self.messages_fetched
    }

    pub fn messages_deleted(&self) -> u64 {
        self.messages_deleted
    }

    /// How many of the fetched messages are still in the mailbox.
    pub fn final_count(&self) -> u64 {
        self.messages_fetched.saturating_sub(self.messages_deleted)
    }
}

impl AddAssign for RunStatistics {
    fn add_assign(&mut self, delta: Self) {
        self.pages_fetched += delta.pages_fetched;
        self.messages_fetched += delta.messages_fetched;
        self.messages_deleted += delta.messages_deleted;
    }
}

impl fmt::Display for RunStatistics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Total number of emails fetched: {}", self.messages_fetched)?;
        writeln!(f, "Total number of pages fetched: {}", self.pages_fetched)?;
        writeln!(f, "Total number of emails deleted: {}", self.messages_deleted)?;
        write!(f, "Final number of emails: {}", self.final_count())
    }
}
