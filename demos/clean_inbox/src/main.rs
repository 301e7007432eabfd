// This demo triages the Gmail inbox of the configured owner with an OpenAI model,
// deleting promotional and automated mail.

use mailsweep::{
    GmailMailboxBuilder, Oracle, TriageAgentBuilder, TriageConfigBuilder, llm::RigLLM,
};
use rig::{client::CompletionClient, prelude::ProviderClient, providers::openai::Client};
use std::sync::Arc;
use tracing::{Level, error, info};
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() {
    // Load USER_FIRST_NAME, USER_LAST_NAME, OPENAI_API_KEY and friends from .env
    dotenv::dotenv().ok();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .finish();
    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");

    let config = match TriageConfigBuilder::new().build() {
        Ok(config) => config,
        Err(e) => {
            error!(error = %e, "Invalid configuration");
            std::process::exit(1);
        }
    };

    let mailbox = match GmailMailboxBuilder::new(config.auth.clone()).build().await {
        Ok(mailbox) => mailbox,
        Err(e) => {
            error!(error = %e, "Failed to authenticate with Gmail");
            std::process::exit(1);
        }
    };
    info!("GmailMailbox initialized");

    let openai_client = Client::from_env();
    let model = openai_client
        .completion_model(&config.model)
        .completions_api();

    let oracle = match Oracle::new(Box::new(RigLLM::new(model)), &config.owner) {
        Ok(oracle) => oracle,
        Err(e) => {
            error!(error = %e, "Failed to build classification oracle");
            std::process::exit(1);
        }
    };

    let agent = match TriageAgentBuilder::new(Arc::new(mailbox))
        .with_oracle(oracle)
        .with_label(&config.label)
        .with_dry_run(config.dry_run)
        .build()
    {
        Ok(agent) => agent,
        Err(e) => {
            error!(error = %e, "Failed to build agent");
            std::process::exit(1);
        }
    };

    let stats = agent.run().await;
    info!(
        deleted = stats.messages_deleted(),
        remaining = stats.final_count(),
        "Inbox triage finished"
    );
}
