//! Event handling and user interactions for gen-bot.
//!
//! Each handler runs one inbound trigger to completion on its own task:
//! - @-mentions are answered with a text completion.
//! - The image slash command is answered with a generated image.
//!
//! Handler failures are logged and dropped; the invoking user sees no reply.

pub mod app_mention;
pub mod gen_image;
