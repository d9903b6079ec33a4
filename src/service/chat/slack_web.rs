//! `files.sharedPublicURL`, the one Web API method `slack-morphism` does not cover.

use reqwest::Client;
use serde::Deserialize;
use tracing::instrument;

use crate::base::types::Res;

const SHARED_PUBLIC_URL_ENDPOINT: &str = "https://slack.com/api/files.sharedPublicURL";

#[derive(Debug, Deserialize)]
struct SharedFile {
    permalink_public: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SharedPublicUrlResponse {
    ok: bool,
    error: Option<String>,
    file: Option<SharedFile>,
}

/// Publishes uploaded files.
///
/// Trivially cloneable; the underlying `reqwest::Client` shares its connection pool.
#[derive(Clone)]
pub struct SlackFilePublisher {
    client: Client,
    token: String,
}

impl SlackFilePublisher {
    /// Slack only accepts user tokens here; the bot token is used when none is configured.
    pub fn new(bot_token: String, user_token: Option<String>) -> Self {
        Self {
            client: Client::new(),
            token: user_token.unwrap_or(bot_token),
        }
    }

    /// Publish a file and return its public permalink.
    #[instrument(name = "SlackFilePublisher::shared_public_url", skip(self))]
    pub async fn shared_public_url(&self, file_id: &str) -> Res<String> {
        let resp = self
            .client
            .post(SHARED_PUBLIC_URL_ENDPOINT)
            .bearer_auth(&self.token)
            .form(&[("file", file_id)])
            .send()
            .await?;

        let parsed: SharedPublicUrlResponse = resp.json().await?;

        parse_shared_public_url(parsed)
    }
}

fn parse_shared_public_url(parsed: SharedPublicUrlResponse) -> Res<String> {
    if !parsed.ok {
        return Err(anyhow::anyhow!(
            "Slack `files.sharedPublicURL` failed: {}",
            parsed.error.unwrap_or_else(|| "unknown error".into())
        ));
    }

    parsed
        .file
        .and_then(|f| f.permalink_public)
        .ok_or(anyhow::anyhow!("Slack `files.sharedPublicURL` returned no public permalink."))
}

// Tests.
