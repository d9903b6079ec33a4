//! Block Kit message content produced by the interaction handlers.
//!
//! Thin builders over `slack-morphism`'s block model for the two block kinds
//! the bot ever sends.

use reqwest::Url;
use slack_morphism::prelude::*;

use super::types::Res;

/// Alt text attached to every generated image block.
pub const GENERATED_IMAGE_ALT_TEXT: &str = "generated from OpenAI";

/// A section block holding markdown text.
pub fn section(text: impl Into<String>) -> SlackBlock {
    SlackSectionBlock::new().with_text(SlackBlockMarkDownText::new(text.into()).into()).into()
}

/// An image block for a generated image.
///
/// Fails if `image_url` is not an absolute URL.
pub fn generated_image(title: impl Into<String>, image_url: &str) -> Res<SlackBlock> {
    let image_url = Url::parse(image_url)?;
    let title = SlackBlockPlainText::new(title.into()).with_emoji(true);

    Ok(SlackImageBlock::new(SlackImageUrlOrFile::ImageUrl { image_url }, GENERATED_IMAGE_ALT_TEXT.to_string())
        .with_title(title.into())
        .into())
}

/// The markdown text of a section block, if `block` is one.
pub fn section_text(block: &SlackBlock) -> Option<&str> {
    match block {
        SlackBlock::Section(SlackSectionBlock {
            text: Some(SlackBlockText::MarkDown(text)),
            ..
        }) => Some(&text.text),
        _ => None,
    }
}

/// The mention marker for a user id.
pub fn mention(user_id: &str) -> String {
    format!("<@{user_id}>")
}

/// Text prefixed with the mention marker for `user_id`.
pub fn mention_text(user_id: &str, text: &str) -> String {
    format!("{} {text}", mention(user_id))
}

// Tests.
