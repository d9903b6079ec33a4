//! OpenAI implementation of the completion and image façade.

use std::sync::Arc;

use crate::base::{config::Config, types::Res};
use async_openai::{
    Client,
    config::OpenAIConfig,
    types::{
        ChatCompletionRequestMessage, ChatCompletionRequestSystemMessageArgs, ChatCompletionRequestUserMessageArgs, CreateChatCompletionRequestArgs, CreateChatCompletionResponse,
        CreateImageRequestArgs, Image, ImageModel, ImageResponseFormat, ImageSize,
    },
};
use async_trait::async_trait;
use tracing::{debug, instrument};

use super::{GenericLlmClient, LlmClient};

// Extra methods on `LlmClient` applied by the openai implementation.

impl LlmClient {
    pub fn openai(config: &Config) -> Res<Self> {
        let client = OpenAiLlmClient::new(config)?;
        Ok(Self { inner: Arc::new(client) })
    }
}

// Specific implementations.

/// OpenAI LLM client implementation.
#[derive(Clone)]
pub struct OpenAiLlmClient {
    client: Client<OpenAIConfig>,
    completion_model: String,
    image_model: ImageModel,
    image_size: ImageSize,
    system_directive: String,
    temperature: f32,
    max_tokens: u32,
}

impl OpenAiLlmClient {
    /// Create a new OpenAI LLM client.
    #[instrument(name = "OpenAiLlmClient::new", skip_all)]
    pub fn new(config: &Config) -> Res<Self> {
        let mut cfg = OpenAIConfig::new().with_api_key(config.openai_api_key.clone());

        if let Some(org_id) = &config.openai_org_id {
            cfg = cfg.with_org_id(org_id.clone());
        }

        Ok(Self {
            client: Client::with_config(cfg),
            completion_model: config.openai_completion_model.clone(),
            image_model: parse_openai_image_model(&config.openai_image_model),
            image_size: parse_openai_image_size(&config.openai_image_size)?,
            system_directive: config.system_directive.clone(),
            temperature: config.openai_temperature,
            max_tokens: config.openai_max_tokens,
        })
    }

    /// Build the completion messages.
    fn build_completion_messages(&self, prompt: &str) -> Res<Vec<ChatCompletionRequestMessage>> {
        Ok(vec![
            ChatCompletionRequestSystemMessageArgs::default().content(self.system_directive.clone()).build()?.into(),
            ChatCompletionRequestUserMessageArgs::default().content(prompt.to_string()).build()?.into(),
        ])
    }
}

#[async_trait]
impl GenericLlmClient for OpenAiLlmClient {
    #[instrument(name = "OpenAiLlmClient::create_completion", skip_all)]
    async fn create_completion(&self, prompt: &str) -> Res<String> {
        debug!("Requesting completion from `{}` ...", self.completion_model);

        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.completion_model)
            .messages(self.build_completion_messages(prompt)?)
            .temperature(self.temperature)
            .max_completion_tokens(self.max_tokens)
            .n(1)
            .build()?;

        let response = self.client.chat().create(request).await?;

        parse_openai_completion(&response)
    }

    #[instrument(name = "OpenAiLlmClient::generate_image", skip_all)]
    async fn generate_image(&self, prompt: &str) -> Res<String> {
        debug!("Requesting image generation ...");

        let request = CreateImageRequestArgs::default()
            .prompt(prompt)
            .model(self.image_model.clone())
            .n(1)
            .size(self.image_size.clone())
            .response_format(ImageResponseFormat::B64Json)
            .build()?;

        let response = self.client.images().create(request).await?;

        parse_openai_image(&response.data)
    }
}

/// Extract the best completion's text.
fn parse_openai_completion(response: &CreateChatCompletionResponse) -> Res<String> {
    let choice = response.choices.first().ok_or(anyhow::anyhow!("Completion returned no choices."))?;
    let content = choice.message.content.as_deref().ok_or(anyhow::anyhow!("Completion returned no content."))?;

    Ok(content.trim().to_string())
}

/// Extract the base64 payload of the first generated image.
fn parse_openai_image(images: &[Arc<Image>]) -> Res<String> {
    let image = images.first().ok_or(anyhow::anyhow!("Image generation returned no images."))?;

    match image.as_ref() {
        Image::B64Json { b64_json, .. } => Ok(b64_json.as_ref().clone()),
        Image::Url { .. } => Err(anyhow::anyhow!("Image generation returned a URL instead of base64 data.")),
    }
}

/// Convert a string model name to ImageModel enum.
fn parse_openai_image_model(model: &str) -> ImageModel {
    match model {
        "dall-e-2" => ImageModel::DallE2,
        "dall-e-3" => ImageModel::DallE3,
        other => ImageModel::Other(other.to_string()),
    }
}

/// Convert a string image size to ImageSize enum.
fn parse_openai_image_size(size: &str) -> Res<ImageSize> {
    match size.to_lowercase().as_str() {
        "256x256" => Ok(ImageSize::S256x256),
        "512x512" => Ok(ImageSize::S512x512),
        "1024x1024" => Ok(ImageSize::S1024x1024),
        "1792x1024" => Ok(ImageSize::S1792x1024),
        "1024x1792" => Ok(ImageSize::S1024x1792),
        _ => Err(crate::base::types::Err::msg(format!(
            "Invalid image size: {size}. Must be one of: 256x256, 512x512, 1024x1024, 1792x1024, 1024x1792"
        ))),
    }
}

// Tests.
