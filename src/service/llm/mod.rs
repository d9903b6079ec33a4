//! Integration with generative AI services.
//!
//! The `GenericLlmClient` trait is the stateless façade the interaction
//! handlers talk to. It hides the upstream request and response shapes, with
//! a default implementation for OpenAI.

pub mod openai;

use crate::base::types::Res;
use async_trait::async_trait;
use std::ops::Deref;
use std::sync::Arc;

// Traits.

/// Generic LLM client trait that clients must implement.
///
/// Each call makes exactly one upstream request, and upstream errors are
/// propagated to the caller unchanged. Implementations hold no state between
/// calls beyond their credentials.
#[async_trait]
pub trait GenericLlmClient: Send + Sync + 'static {
    /// Complete a prompt.
    ///
    /// Returns the text of the single best completion.
    async fn create_completion(&self, prompt: &str) -> Res<String>;

    /// Generate one image from a prompt.
    ///
    /// Returns the image as a base64 string (standard alphabet).
    async fn generate_image(&self, prompt: &str) -> Res<String>;
}

// Structs.

/// LLM client for the application.
///
/// This is trivially cloneable and can be passed around without the need for `Arc` or `Mutex`.
#[derive(Clone)]
pub struct LlmClient {
    inner: Arc<dyn GenericLlmClient>,
}

impl Deref for LlmClient {
    type Target = dyn GenericLlmClient;

    fn deref(&self) -> &Self::Target {
        &*self.inner
    }
}

impl LlmClient {
    pub fn new(inner: Arc<dyn GenericLlmClient>) -> Self {
        Self { inner }
    }
}
