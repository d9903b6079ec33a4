//! Runtime services and shared state for gen-bot.

use tracing::{info, instrument};

use crate::{
    base::{
        config::Config,
        types::{Res, Void},
    },
    service::{chat::ChatClient, llm::LlmClient},
};

/// Runtime service context that can be shared across the application.
///
/// This struct holds the LLM client, chat client, and configuration.
/// It is designed to be trivially cloneable, allowing it to be passed around
/// without the need for `Arc` or `Mutex`.
#[derive(Clone)]
pub struct Runtime {
    /// The configuration for the application.
    pub config: Config,
    /// The LLM client instance.
    pub llm: LlmClient,
    /// The chat client instance.
    pub chat: ChatClient,
}

impl Runtime {
    /// Create a new runtime instance.
    #[instrument(skip_all)]
    pub async fn new(config: Config) -> Res<Self> {
        // Initialize the LLM client.
        let llm = LlmClient::openai(&config)?;

        // Initialize the chat client.
        let chat = ChatClient::slack(&config, llm.clone()).await?;

        Ok(Self { config, llm, chat })
    }

    pub async fn start(&self) -> Void {
        info!("Port {} is reserved for OAuth; socket mode does not listen on it.", self.config.port);

        self.chat.start().await
    }
}
