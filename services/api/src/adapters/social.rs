//! services/api/src/adapters/social.rs
//!
//! Adapters for the `SocialPublisher` port. Telegram posts through the Bot API;
//! the remaining platforms have no live integration and only log the post.

use academy_core::domain::{Platform, PublishReceipt, SocialPost};
use academy_core::ports::{PortError, PortResult, SocialPublisher};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use tracing::{info, warn};

use crate::config::TelegramConfig;

/// Bot API length caps, checked here against the HTML we send.
const CAPTION_LIMIT: usize = 1024;
const MESSAGE_LIMIT: usize = 4096;

//=========================================================================================
// Telegram
//=========================================================================================

/// Publishes to a Telegram channel through the Bot API.
#[derive(Clone)]
pub struct TelegramPublisher {
    client: reqwest::Client,
    config: TelegramConfig,
}

#[derive(Deserialize)]
struct TelegramResponse {
    ok: bool,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    result: Option<TelegramMessage>,
}

#[derive(Deserialize)]
struct TelegramMessage {
    message_id: i64,
}

impl TelegramPublisher {
    /// Creates a new `TelegramPublisher`.
    pub fn new(client: reqwest::Client, config: TelegramConfig) -> Self {
        Self { client, config }
    }

    fn method_url(&self, method: &str) -> String {
        format!(
            "{}/bot{}/{}",
            self.config.api_base.trim_end_matches('/'),
            self.config.bot_token,
            method
        )
    }

    async fn call(&self, method: &str, body: serde_json::Value) -> PortResult<PublishReceipt> {
        let response = self
            .client
            .post(self.method_url(method))
            .json(&body)
            .send()
            .await
            .map_err(|e| PortError::Unreachable(format!("Telegram: {}", e)))?;

        let status = response.status();
        let parsed: TelegramResponse = response
            .json()
            .await
            .map_err(|e| PortError::Rejected(format!("Telegram {} returned {}: {}", method, status, e)))?;

        if !parsed.ok {
            return Err(PortError::Rejected(format!(
                "Telegram {} failed: {}",
                method,
                parsed.description.unwrap_or_else(|| status.to_string())
            )));
        }

        Ok(PublishReceipt {
            platform: Platform::Telegram,
            external_id: parsed.result.map(|m| m.message_id.to_string()),
        })
    }

    async fn send_message(&self, post: &SocialPost) -> PortResult<PublishReceipt> {
        self.call(
            "sendMessage",
            json!({
                "chat_id": self.config.chat_id,
                "text": message_text(post),
                "parse_mode": "HTML",
            }),
        )
        .await
    }
}

#[async_trait]
impl SocialPublisher for TelegramPublisher {
    fn platform(&self) -> Platform {
        Platform::Telegram
    }

    /// Sends a photo with caption when the post has an image, falling back once
    /// to a plain text message if the photo is refused.
    async fn publish(&self, post: &SocialPost) -> PortResult<PublishReceipt> {
        let Some(image_url) = &post.image_url else {
            return self.send_message(post).await;
        };

        let photo = self
            .call(
                "sendPhoto",
                json!({
                    "chat_id": self.config.chat_id,
                    "photo": image_url,
                    "caption": caption(post),
                    "parse_mode": "HTML",
                }),
            )
            .await;

        match photo {
            Ok(receipt) => Ok(receipt),
            Err(e) => {
                warn!("Telegram sendPhoto failed ({}), retrying as text", e);
                self.send_message(post).await
            }
        }
    }
}

/// Minimal escaping for Telegram's HTML parse mode.
fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

fn message_text(post: &SocialPost) -> String {
    render(post, MESSAGE_LIMIT)
}

fn caption(post: &SocialPost) -> String {
    render(post, CAPTION_LIMIT)
}

/// Formats the post as Telegram HTML within `limit` characters. When it does not
/// fit, the summary is shortened (and the title after it) so the link survives.
fn render(post: &SocialPost, limit: usize) -> String {
    let title = escape_html(&post.title);
    let url = escape_html(&post.url);
    let full = format!("<b>{}</b>\n\n{}\n\n{}", title, escape_html(&post.summary), url);
    if full.chars().count() <= limit {
        return full;
    }

    let shortened = |title: &str, summary: &str| format!("<b>{}</b>\n\n{}…\n\n{}", title, summary, url);
    let frame = shortened(&title, "").chars().count();
    if frame <= limit {
        let summary = clip_escaped(&post.summary, limit - frame);
        return shortened(&title, &summary);
    }
    let title = clip_escaped(&post.title, limit.saturating_sub(shortened("", "").chars().count()));
    shortened(&title, "")
}

/// Escapes `raw` and keeps as much as fits in `room` characters without cutting
/// through an entity.
fn clip_escaped(raw: &str, room: usize) -> String {
    let mut out = String::new();
    let mut used = 0;
    let mut buf = [0u8; 4];
    for c in raw.chars() {
        let piece = escape_html(c.encode_utf8(&mut buf));
        let width = piece.chars().count();
        if used + width > room {
            break;
        }
        out.push_str(&piece);
        used += width;
    }
    out
}

//=========================================================================================
// Platforms without a live integration
//=========================================================================================

/// Logs the post and reports success without any network call.
#[derive(Clone, Copy)]
pub struct StubPublisher {
    platform: Platform,
}

impl StubPublisher {
    pub fn new(platform: Platform) -> Self {
        Self { platform }
    }
}

#[async_trait]
impl SocialPublisher for StubPublisher {
    fn platform(&self) -> Platform {
        self.platform
    }

    async fn publish(&self, post: &SocialPost) -> PortResult<PublishReceipt> {
        info!(
            "[{}] would publish '{}' ({})",
            self.platform, post.title, post.url
        );
        Ok(PublishReceipt {
            platform: self.platform,
            external_id: None,
        })
    }
}
