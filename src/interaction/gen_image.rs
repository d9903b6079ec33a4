//! Answers the image slash command with a generated image.

use base64::{Engine, engine::general_purpose::STANDARD};
use tokio::task::JoinHandle;
use tracing::{Instrument, error, info, instrument};

use crate::{
    base::{
        blocks::{generated_image, mention_text, section},
        types::{CommandAck, FileUpload, SlashCommand, Void},
    },
    service::{chat::ChatClient, llm::LlmClient},
};

/// Name of the uploaded image file; the platform infers the file type from it.
pub const IMAGE_FILENAME: &str = "image.png";

/// Handles an image command.
///
/// The command is processed on its own task; any error is logged and dropped.
#[instrument(skip_all, fields(user = %command.user_id, channel = %command.channel_id))]
pub fn handle_gen_image(command: SlashCommand, ack: CommandAck, llm: LlmClient, chat: ChatClient) -> JoinHandle<()> {
    tokio::spawn(
        async move {
            // Process the command.
            let result = handle_gen_image_internal(command, ack, &llm, &chat).await;

            // Log any errors.
            if let Err(err) = &result {
                error!("Error while handling image command: {}", err);
            }
        }
        .in_current_span(),
    )
}

/// Acknowledge, generate, upload, publish, then reply.
///
/// Each step consumes the previous step's output, so the first failure stops the rest.
#[instrument(skip_all)]
pub async fn handle_gen_image_internal(command: SlashCommand, ack: CommandAck, llm: &LlmClient, chat: &ChatClient) -> Void {
    ack.ack()?;

    let image_b64 = llm.generate_image(&command.text).await?;
    let bytes = STANDARD.decode(image_b64.trim())?;

    info!("Uploading generated image ({} bytes) ...", bytes.len());

    let caption = mention_text(&command.user_id, &command.text);

    let file_id = chat
        .upload_file(FileUpload {
            bytes,
            filename: IMAGE_FILENAME.to_string(),
            title: command.text.clone(),
            initial_comment: caption.clone(),
        })
        .await?;

    let public_url = chat.share_public_url(&file_id).await?;

    let blocks = vec![section(caption), generated_image(command.text.as_str(), &public_url)?];
    chat.send_message(&command.channel_id, blocks).await?;

    Ok(())
}
