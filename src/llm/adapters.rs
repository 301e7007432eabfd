use crate::llm::core::{ChatTurn, LLM, LLMError};
use async_trait::async_trait;
use rig::{agent::AgentBuilder, completion::CompletionModel};
use tracing::debug;

/// Implementation of the `LLM` trait for any `rig` completion model.
///
/// A fresh `rig::agent::Agent` is assembled for every turn so the preamble,
/// temperature and token cap always come from the caller.
///
/// # Example
///
/// ```rust,ignore
/// use mailsweep::llm::RigLLM;
/// use rig::{client::CompletionClient, prelude::ProviderClient, providers::openai};
///
/// let client = openai::Client::from_env();
/// let llm = RigLLM::new(client.completion_model(openai::GPT_4O_MINI).completions_api());
/// ```
#[derive(Clone)]
pub struct RigLLM<M: CompletionModel> {
    model: M,
}

impl<M: CompletionModel> RigLLM<M> {
    pub fn new(model: M) -> Self {
        Self { model }
    }
}

#[async_trait]
impl<M> LLM for RigLLM<M>
where
    M: CompletionModel,
{
    async fn prompt(&self, turn: ChatTurn) -> Result<String, LLMError> {
        let agent = AgentBuilder::new(self.model.clone())
            .preamble(&turn.preamble)
            .temperature(turn.temperature)
            .max_tokens(turn.max_tokens)
            .build();

        rig::completion::Prompt::prompt(&agent, turn.prompt)
            .await
            .map(|response| response.to_string())
            .map_err(|e| {
                debug!("Rig agent error: {}", e);
                LLMError::PromptError(e.to_string())
            })
    }
}
