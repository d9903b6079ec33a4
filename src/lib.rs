//! Library root for `gen-bot`.
//!
//! Gen-bot connects a Slack workspace to OpenAI:
//! - @-mentions are answered with a text completion of the message
//! - The `/gen_image` slash command is answered with a generated image
//!
//! The bot integrates with Slack over socket mode and with OpenAI for
//! completions and images. Both sit behind traits so the interaction
//! handlers can be driven by other implementations.

pub mod base;
pub mod interaction;
pub mod runtime;
pub mod service;

use base::{config::Config, types::Void};
use rustls::crypto;
use tracing::info;

/// Public async entry for the binary crate.
///
/// Sets up necessary services and starts the gen-bot runtime:
/// - Initializes the crypto provider
/// - Creates the runtime context with LLM and chat clients
/// - Serves socket mode events until shutdown
pub async fn start(config: Config) -> Void {
    info!("Starting gen-bot ...");

    // Start the crypto provider.
    crypto::ring::default_provider()
        .install_default()
        .map_err(|_| anyhow::anyhow!("Failed to install the default crypto provider."))?;

    // Initialize the runtime.
    let runtime = runtime::Runtime::new(config).await?;

    // Start the runtime.
    runtime.start().await?;

    Ok(())
}
