//! Slack implementation of the chat client.
//!
//! Inbound mentions and slash commands arrive over socket mode, and outbound
//! messages and uploads go through a `slack-morphism` session.

use crate::{
    base::{
        blocks::section_text,
        config::Config,
        types::{CommandAck, FileUpload, MentionEvent, Res, SlashCommand, Void},
    },
    interaction,
    service::llm::LlmClient,
};
use async_trait::async_trait;
use hyper_rustls::HttpsConnector;
use hyper_util::client::legacy::connect::HttpConnector;
use slack_morphism::prelude::*;
use tracing::{debug, info, instrument, warn};

use std::sync::Arc;

use super::{ChatClient, GenericChatClient, slack_web::SlackFilePublisher};

/// Content type sent with upload bytes; Slack infers the file type from the filename.
const UPLOAD_CONTENT_TYPE: &str = "application/octet-stream";

// Type aliases.

type FullClient = slack_morphism::SlackClient<SlackClientHyperConnector<HttpsConnector<HttpConnector>>>;

// Extra methods on `ChatClient` applied by the slack implementation.

impl ChatClient {
    /// Creates a new Slack chat client.
    pub async fn slack(config: &Config, llm: LlmClient) -> Res<Self> {
        let client = SlackChatClient::new(config, llm).await?;
        Ok(Self { inner: Arc::new(client) })
    }
}

impl From<SlackChatClient> for ChatClient {
    fn from(client: SlackChatClient) -> Self {
        Self { inner: Arc::new(client) }
    }
}

// Structs.

/// User state for the slack socket client.
struct SlackUserState {
    llm: LlmClient,
    chat: ChatClient,
    image_command: String,
}

/// Slack client implementation.
#[derive(Clone)]
struct SlackChatClient {
    pub app_token: SlackApiToken,
    pub bot_token: SlackApiToken,
    pub client: Arc<FullClient>,
    pub publisher: SlackFilePublisher,
    pub llm: LlmClient,
    pub image_command: String,
}

impl SlackChatClient {
    /// Create a new Slack chat client.
    #[instrument(name = "SlackChatClient::new", skip_all)]
    pub async fn new(config: &Config, llm: LlmClient) -> Res<Self> {
        // Initialize tokens.

        let app_token = SlackApiToken::new(SlackApiTokenValue(config.slack_app_token.clone()));
        let bot_token = SlackApiToken::new(SlackApiTokenValue(config.slack_bot_token.clone()));

        // Initialize the Slack client.

        let https_connector = HttpsConnector::<HttpConnector>::builder().with_native_roots()?.https_only().enable_all_versions().build();
        let connector = SlackClientHyperConnector::with_connector(https_connector);
        let client = Arc::new(slack_morphism::SlackClient::new(connector));

        // Verify the bot token before connecting.

        let session = client.open_session(&bot_token);
        let bot_user = session.auth_test().await?;

        info!("Slack bot user ID: {}", bot_user.user_id.0);

        let publisher = SlackFilePublisher::new(config.slack_bot_token.clone(), config.slack_user_token.clone());

        Ok(Self {
            app_token,
            bot_token,
            client,
            publisher,
            llm,
            image_command: config.image_command.clone(),
        })
    }
}

#[async_trait]
impl GenericChatClient for SlackChatClient {
    async fn start(&self) -> Void {
        // Initialize the socket mode listener.

        let socket_mode_callbacks = SlackSocketModeListenerCallbacks::new()
            .with_command_events(handle_command_event)
            .with_push_events(handle_push_event);

        // Initialize the socket mode listener environment.

        let listener_environment = Arc::new(SlackClientEventsListenerEnvironment::new(self.client.clone()).with_user_state(SlackUserState {
            llm: self.llm.clone(),
            chat: ChatClient::from(self.clone()),
            image_command: self.image_command.clone(),
        }));

        let socket_mode_listener = Arc::new(SlackClientSocketModeListener::new(
            &SlackClientSocketModeConfig::new(),
            listener_environment.clone(),
            socket_mode_callbacks,
        ));

        // Register an app token to listen for events,
        socket_mode_listener.listen_for(&self.app_token).await?;

        info!("⚡️ gen-bot is running!");

        // Start WS connections calling Slack API to get WS url for the token,
        // and wait for Ctrl-C to shutdown.
        socket_mode_listener.serve().await;

        Ok(())
    }

    #[instrument(name = "SlackChatClient::send_message", skip(self, blocks))]
    async fn send_message(&self, channel_id: &str, blocks: Vec<SlackBlock>) -> Void {
        let request = post_message_request(channel_id, blocks);

        let session = self.client.open_session(&self.bot_token);

        let _ = session.chat_post_message(&request).await.map_err(|e| anyhow::anyhow!("Failed to send message: {}", e))?;

        Ok(())
    }

    #[instrument(name = "SlackChatClient::upload_file", skip_all, fields(filename = %upload.filename, length = upload.bytes.len()))]
    async fn upload_file(&self, upload: FileUpload) -> Res<String> {
        let session = self.client.open_session(&self.bot_token);

        // Reserve an upload slot.

        let request = SlackApiFilesGetUploadUrlExternalRequest::new(upload.filename.clone(), upload.bytes.len());
        let slot = session
            .get_upload_url_external(&request)
            .await
            .map_err(|e| anyhow::anyhow!("Failed to reserve file upload: {}", e))?;

        // Send the raw bytes.

        debug!("Uploading file `{}` ...", slot.file_id.0);

        let request = SlackApiFilesUploadViaUrlRequest::new(slot.upload_url, upload.bytes.clone(), UPLOAD_CONTENT_TYPE.to_string());
        session.files_upload_via_url(&request).await.map_err(|e| anyhow::anyhow!("Failed to upload file: {}", e))?;

        // Finalize the upload with its title and comment.

        let request = complete_upload_request(slot.file_id.clone(), &upload);
        session
            .files_complete_upload_external(&request)
            .await
            .map_err(|e| anyhow::anyhow!("Failed to complete file upload: {}", e))?;

        Ok(slot.file_id.0)
    }

    async fn share_public_url(&self, file_id: &str) -> Res<String> {
        self.publisher.shared_public_url(file_id).await
    }
}

// Socket mode listener callbacks for Slack.

/// Handles command events from Slack.
///
/// The socket mode acknowledgement is the return value of this callback.
#[instrument(skip_all)]
async fn handle_command_event(
    event: SlackCommandEvent,
    _client: Arc<SlackHyperClient>,
    states: SlackClientEventsUserState,
) -> Result<SlackCommandEventResponse, Box<dyn std::error::Error + Send + Sync>> {
    let (llm, chat, image_command) = {
        let states = states.read().await;
        let user_state = states.get_user_state::<SlackUserState>().ok_or(anyhow::anyhow!("Failed to get user state"))?;

        (user_state.llm.clone(), user_state.chat.clone(), user_state.image_command.clone())
    };

    let command = SlashCommand {
        channel_id: event.channel_id.0,
        user_id: event.user_id.0,
        command: event.command.0,
        text: event.text.unwrap_or_default(),
    };

    Ok(dispatch_command(command, &image_command, llm, chat).await)
}

/// Routes a slash command and produces its acknowledgement.
///
/// Unsupported commands are answered in the acknowledgement itself. The image
/// command is handed to its own task, and the acknowledgement is held until
/// that task acknowledges.
pub async fn dispatch_command(command: SlashCommand, image_command: &str, llm: LlmClient, chat: ChatClient) -> SlackCommandEventResponse {
    if command.command != image_command {
        warn!("Received unsupported command `{}`.", command.command);
        return SlackCommandEventResponse::new(SlackMessageContent::new().with_text(format!("`{}` is not supported.", command.command)));
    }

    info!("Received image command ...");

    let (ack, acked) = CommandAck::channel();
    interaction::gen_image::handle_gen_image(command, ack, llm, chat);

    if acked.await.is_err() {
        warn!("Image command handler exited without acknowledging.");
    }

    SlackCommandEventResponse::new(SlackMessageContent::new())
}

/// Handles push events from Slack.
#[instrument(skip_all)]
async fn handle_push_event(event_callback: SlackPushEventCallback, _client: Arc<SlackHyperClient>, states: SlackClientEventsUserState) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let event = event_callback.event;
    let states = states.read().await;
    let user_state = states.get_user_state::<SlackUserState>().ok_or(anyhow::anyhow!("Failed to get user state"))?;

    match event {
        SlackEventCallbackBody::AppMention(slack_app_mention_event) => {
            info!("Received app mention event ...");

            let event = MentionEvent {
                channel_id: slack_app_mention_event.channel.0,
                user: slack_app_mention_event.user.0,
                text: slack_app_mention_event.content.text.unwrap_or_default(),
            };

            interaction::app_mention::handle_app_mention(event, user_state.llm.clone(), user_state.chat.clone());
        }
        _ => {
            warn!("Received unhandled push event.")
        }
    }

    Ok(())
}

// Request builders.

/// Build the `chat.postMessage` request.
///
/// The top-level text mirrors the first section so notifications have something to show.
fn post_message_request(channel_id: &str, blocks: Vec<SlackBlock>) -> SlackApiChatPostMessageRequest {
    let fallback = blocks.iter().find_map(section_text).unwrap_or_default().to_string();
    let content = SlackMessageContent::new().with_text(fallback).with_blocks(blocks);

    SlackApiChatPostMessageRequest::new(SlackChannelId(channel_id.to_string()), content)
}

/// Build the `files.completeUploadExternal` request.
fn complete_upload_request(file_id: SlackFileId, upload: &FileUpload) -> SlackApiFilesCompleteUploadExternalRequest {
    let file = SlackApiFilesComplete::new(file_id).with_title(upload.title.clone());

    SlackApiFilesCompleteUploadExternalRequest::new(vec![file]).with_initial_comment(upload.initial_comment.clone())
}

// Tests.
