use async_trait::async_trait;
use thiserror::Error;

/// A custom error type for LLM operations.
///
/// Wraps whatever the underlying provider reported so callers see one error
/// shape regardless of the model behind the trait.
#[derive(Error, Debug)]
pub enum LLMError {
    /// An error occurred while prompting the model.
    #[error("Failed to prompt the model: {0}")]
    PromptError(String),
}

/// One single-turn exchange with a chat model.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatTurn {
    /// The system message.
    pub preamble: String,
    /// The user message.
    pub prompt: String,
    /// Sampling temperature; 0.0 asks for the most likely answer.
    pub temperature: f64,
    /// Upper bound on the number of tokens the model may answer with.
    pub max_tokens: u64,
}

/// A trait that defines the contract for any model the oracle can consult.
///
/// # Examples
///
/// ```rust
/// use mailsweep::llm::{ChatTurn, LLM, LLMError};
/// use async_trait::async_trait;
///
/// struct AlwaysKeep;
///
/// #[async_trait]
/// impl LLM for AlwaysKeep {
///     async fn prompt(&self, _turn: ChatTurn) -> Result<String, LLMError> {
///         Ok("False".to_string())
///     }
/// }
/// ```
///
/// # Thread Safety
///
/// The trait requires `Send + Sync` so a model can be shared by the pipeline
/// across await points.
#[async_trait]
pub trait LLM: Send + Sync {
    /// Sends one turn to the language model and returns its raw textual answer.
    ///
    /// Implementations must not retry and must not interpret the answer;
    /// any transport, authentication or provider failure is reported as
    /// `LLMError::PromptError`.
    async fn prompt(&self, turn: ChatTurn) -> Result<String, LLMError>;
}
