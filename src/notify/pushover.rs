//! Pushover notification sink

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use tracing::debug;

use super::Notifier;
use crate::error::Error;
use crate::Result;

const PUSHOVER_API_URL: &str = "https://api.pushover.net/1/messages.json";

#[derive(Serialize)]
struct PushoverForm<'a> {
    token: &'a str,
    user: &'a str,
    message: &'a str,
}

/// Posts messages to the Pushover API.
#[derive(Clone)]
pub struct PushoverNotifier {
    token: String,
    user: String,
    client: Client,
}

impl PushoverNotifier {
    pub fn new(token: &str, user: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            token: token.to_string(),
            user: user.to_string(),
            client,
        })
    }
}

#[async_trait]
impl Notifier for PushoverNotifier {
    fn name(&self) -> &str {
        "pushover"
    }

    async fn send(&self, text: &str) -> Result<()> {
        debug!(sink = "pushover", chars = text.len(), "sending notification");

        let response = self
            .client
            .post(PUSHOVER_API_URL)
            .form(&PushoverForm {
                token: &self.token,
                user: &self.user,
                message: text,
            })
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Notify(format!("Pushover returned {status}: {body}")));
        }
        Ok(())
    }
}
