//! Chat platform integration for gen-bot.
//!
//! The `GenericChatClient` trait covers everything the interaction handlers
//! need from the chat platform: sending block messages, uploading files and
//! publishing them. `start` runs the inbound listener that feeds the handlers.

pub mod slack;
pub mod slack_web;

use std::{ops::Deref, sync::Arc};

use async_trait::async_trait;
use slack_morphism::prelude::SlackBlock;

use crate::base::types::{FileUpload, Res, Void};

// Traits.

/// Generic "chat" trait that clients must implement.
#[async_trait]
pub trait GenericChatClient: Send + Sync + 'static {
    /// Start the chat client listener.
    ///
    /// This connects to the chat platform and dispatches incoming mentions
    /// and commands until the connection is shut down.
    async fn start(&self) -> Void;

    /// Send a message made of blocks to a channel.
    async fn send_message(&self, channel_id: &str, blocks: Vec<SlackBlock>) -> Void;

    /// Upload a file.
    ///
    /// Returns the platform's identifier for the uploaded file.
    async fn upload_file(&self, upload: FileUpload) -> Res<String>;

    /// Make an uploaded file public.
    ///
    /// Returns the public permalink of the file.
    async fn share_public_url(&self, file_id: &str) -> Res<String>;
}

// Structs.

/// Chat client for the application.
///
/// It is designed to be trivially cloneable, allowing it to be passed around
/// without the need for `Arc` or `Mutex`.
#[derive(Clone)]
pub struct ChatClient {
    inner: Arc<dyn GenericChatClient>,
}

impl Deref for ChatClient {
    type Target = dyn GenericChatClient;

    fn deref(&self) -> &Self::Target {
        &*self.inner
    }
}

impl ChatClient {
    pub fn new(inner: Arc<dyn GenericChatClient>) -> Self {
        Self { inner }
    }
}
