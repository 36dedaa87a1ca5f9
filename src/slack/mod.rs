//! Posting to Slack through the Web API.
mod format;

use std::collections::BTreeMap;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{instrument, Level};
use url::Url;

use crate::{parse::WeekMenu, restaurant::Restaurant};

pub use format::format_menu;

pub const DEFAULT_API_BASE: &str = "https://slack.com/api/";

#[derive(Debug, Serialize)]
struct PostMessage<'a> {
    channel: &'a str,
    text: &'a str,
    unfurl_links: bool,
}

#[derive(Debug, Deserialize)]
struct ApiResponse {
    ok: bool,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Debug)]
pub struct SlackClient {
    client: Client,
    token: Option<String>,
    channel: String,
    api_base: Url,
}

impl SlackClient {
    /// Without a token every post is skipped; this is reported once, here.
    pub fn new(client: Client, token: Option<String>, channel: impl Into<String>) -> Self {
        let token = token.filter(|t| !t.trim().is_empty());
        if token.is_none() {
            log::warn!(
                "Slack token was not provided, posting to Slack with {} will be silently skipped",
                std::any::type_name::<Self>()
            );
        }
        Self {
            client,
            token,
            channel: channel.into(),
            api_base: Url::parse(DEFAULT_API_BASE).expect("slack api url should be valid"),
        }
    }

    /// Method names are joined onto `api_base`, so it always ends up with a trailing slash.
    #[must_use]
    pub fn with_api_base(mut self, mut api_base: Url) -> Self {
        if !api_base.path().ends_with('/') {
            let path = format!("{}/", api_base.path());
            api_base.set_path(&path);
        }
        self.api_base = api_base;
        self
    }

    pub fn channel(&self) -> &str {
        &self.channel
    }

    /// Posts `text` to `channel`, or to the default channel. Returns whether Slack accepted it.
    #[instrument(skip(self, text), level = Level::TRACE)]
    pub async fn post_message(&self, text: &str, channel: Option<&str>) -> crate::Result<bool> {
        let Some(token) = &self.token else {
            return Ok(false);
        };
        let url = self
            .api_base
            .join("chat.postMessage")
            .map_err(|e| crate::Error::config_error(format!("bad Slack API url: {e}")))?;
        let payload = PostMessage {
            channel: channel.unwrap_or(&self.channel),
            text,
            unfurl_links: false,
        };
        let response = self
            .client
            .post(url)
            .bearer_auth(token)
            .json(&payload)
            .send()
            .await?
            .error_for_status()?;
        let body: ApiResponse = serde_json::from_slice(&response.bytes().await?)?;
        if !body.ok {
            log::error!(
                "Slack refused the message to {}: {}",
                payload.channel,
                body.error.as_deref().unwrap_or("unknown error")
            );
        }
        Ok(body.ok)
    }

    /// Posts every day of every restaurant as a single message.
    pub async fn post_menu(&self, menus: &BTreeMap<Restaurant, WeekMenu>) -> crate::Result<bool> {
        let message = format_menu(menus);
        if message.is_empty() {
            log::warn!("No menus to post");
            return Ok(false);
        }
        self.post_message(&message, None).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{fetch::make_client, test_server::serve_once};

    #[test]
    fn test_payload() {
        let payload = PostMessage {
            channel: "#kosilo",
            text: "Dnevni meni",
            unfurl_links: false,
        };
        assert_eq!(
            serde_json::to_value(&payload).unwrap(),
            serde_json::json!({
                "channel": "#kosilo",
                "text": "Dnevni meni",
                "unfurl_links": false
            })
        );
    }

    #[test]
    fn test_api_response() {
        let ok: ApiResponse =
            serde_json::from_str(r#"{"ok": true, "channel": "C1", "ts": "1.2"}"#).unwrap();
        assert!(ok.ok);
        assert!(ok.error.is_none());

        let refused: ApiResponse =
            serde_json::from_str(r#"{"ok": false, "error": "channel_not_found"}"#).unwrap();
        assert!(!refused.ok);
        assert_eq!(refused.error.as_deref(), Some("channel_not_found"));
    }

    #[test]
    fn test_api_base_keeps_its_path() {
        let slack = SlackClient::new(make_client(), None, "#kosilo")
            .with_api_base(Url::parse("https://example.com/api").unwrap());
        assert_eq!(slack.api_base.as_str(), "https://example.com/api/");
        assert_eq!(
            slack.api_base.join("chat.postMessage").unwrap().as_str(),
            "https://example.com/api/chat.postMessage"
        );

        let slack = slack.with_api_base(Url::parse(DEFAULT_API_BASE).unwrap());
        assert_eq!(slack.api_base.as_str(), DEFAULT_API_BASE);
    }

    #[tokio::test]
    async fn test_post_message_accepted() {
        let (url, server) =
            serve_once(200, "application/json", r#"{"ok":true,"channel":"C1","ts":"1.2"}"#).await;
        let slack = SlackClient::new(make_client(), Some("xoxb-test".into()), "#kosilo")
            .with_api_base(url.join("api").unwrap());
        assert!(slack.post_message("Dnevni meni", None).await.unwrap());

        let request = server.await.unwrap();
        assert!(
            request.starts_with("POST /api/chat.postMessage HTTP/1.1"),
            "{request}"
        );
        let lower = request.to_ascii_lowercase();
        assert!(lower.contains("authorization: bearer xoxb-test"), "{request}");
        assert!(lower.contains("content-type: application/json"), "{request}");
        let body = &request[request.find("\r\n\r\n").unwrap() + 4..];
        let payload: serde_json::Value = serde_json::from_str(body).unwrap();
        assert_eq!(
            payload,
            serde_json::json!({
                "channel": "#kosilo",
                "text": "Dnevni meni",
                "unfurl_links": false
            })
        );
    }

    #[tokio::test]
    async fn test_post_message_refused() {
        let (url, server) =
            serve_once(200, "application/json", r#"{"ok":false,"error":"channel_not_found"}"#)
                .await;
        let slack = SlackClient::new(make_client(), Some("xoxb-test".into()), "#kosilo")
            .with_api_base(url);
        assert!(!slack.post_message("Dnevni meni", Some("#drugje")).await.unwrap());
        let request = server.await.unwrap();
        assert!(request.contains(r##""channel":"#drugje""##), "{request}");
    }

    #[tokio::test]
    async fn test_post_message_http_error() {
        let (url, server) = serve_once(503, "text/plain", "unavailable").await;
        let slack = SlackClient::new(make_client(), Some("xoxb-test".into()), "#kosilo")
            .with_api_base(url);
        assert!(matches!(
            slack.post_message("Dnevni meni", None).await,
            Err(crate::Error::Request(_))
        ));
        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_without_token_posting_is_skipped() {
        // the api base points nowhere; a request would fail instead of returning Ok(false)
        let slack = SlackClient::new(make_client(), Some("  ".into()), "#kosilo")
            .with_api_base(Url::parse("http://127.0.0.1:9/").unwrap());
        assert!(!slack.post_message("hello", None).await.unwrap());
        assert_eq!(slack.channel(), "#kosilo");
    }

    #[tokio::test]
    async fn test_empty_menu_is_not_posted() {
        let slack = SlackClient::new(make_client(), Some("xoxb-test".into()), "#kosilo")
            .with_api_base(Url::parse("http://127.0.0.1:9/").unwrap());
        assert!(!slack.post_menu(&BTreeMap::new()).await.unwrap());
    }
}
