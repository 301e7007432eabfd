// The `llm` module provides the seam between the classification oracle and a language model.

pub mod adapters;
pub mod core;

pub use self::adapters::RigLLM;
pub use self::core::{ChatTurn, LLM, LLMError};
