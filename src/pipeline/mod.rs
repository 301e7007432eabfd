// The `pipeline` module holds the triage stages: paginate, decode, classify, act, count.

pub mod decoder;
pub mod executor;
pub mod oracle;
pub mod paginator;
pub mod stats;

pub use decoder::{Decoder, MessageData};
pub use executor::Executor;
pub use oracle::{Oracle, OracleError, OwnerIdentity, Verdict};
pub use paginator::Paginator;
pub use stats::RunStatistics;
