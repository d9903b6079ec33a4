//! Answers @-mentions with a text completion.

use tokio::task::JoinHandle;
use tracing::{Instrument, error, info, instrument};

use crate::{
    base::{
        blocks::{mention_text, section},
        types::{MentionEvent, Void},
    },
    service::{chat::ChatClient, llm::LlmClient},
};

/// Handles an app mention event.
///
/// The event is processed on its own task; any error is logged and dropped.
#[instrument(skip_all, fields(user = %event.user, channel = %event.channel_id))]
pub fn handle_app_mention(event: MentionEvent, llm: LlmClient, chat: ChatClient) -> JoinHandle<()> {
    tokio::spawn(
        async move {
            // Process the event.
            let result = handle_app_mention_internal(event, &llm, &chat).await;

            // Log any errors.
            if let Err(err) = &result {
                error!("Error while handling app mention: {}", err);
            }
        }
        .in_current_span(),
    )
}

/// Reply to the mention with the completion of its text.
#[instrument(skip_all)]
pub async fn handle_app_mention_internal(event: MentionEvent, llm: &LlmClient, chat: &ChatClient) -> Void {
    let answer = llm.create_completion(&event.text).await?;

    info!("Replying to mention ...");

    let blocks = vec![section(mention_text(&event.user, &answer))];
    chat.send_message(&event.channel_id, blocks).await?;

    Ok(())
}
