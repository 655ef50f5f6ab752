//! The Telegram publisher against a mock Bot API.

use academy_core::domain::{Platform, SocialPost};
use academy_core::ports::{PortError, SocialPublisher};
use api_lib::adapters::social::TelegramPublisher;
use api_lib::config::TelegramConfig;
use mockito::Matcher;
use serde_json::json;

fn publisher(api_base: String) -> TelegramPublisher {
    TelegramPublisher::new(
        reqwest::Client::new(),
        TelegramConfig {
            bot_token: "TEST".to_string(),
            chat_id: "@ai_uz".to_string(),
            api_base,
        },
    )
}

fn post(image_url: Option<&str>) -> SocialPost {
    SocialPost {
        title: "Gemini 2.0 chiqdi".to_string(),
        summary: "Google yangi modelni taqdim etdi".to_string(),
        url: "https://example.uz/news/gemini".to_string(),
        image_url: image_url.map(str::to_string),
    }
}

#[tokio::test]
async fn post_with_image_is_sent_as_photo() {
    let mut server = mockito::Server::new_async().await;
    let photo = server
        .mock("POST", "/botTEST/sendPhoto")
        .match_body(Matcher::PartialJson(json!({
            "chat_id": "@ai_uz",
            "photo": "https://example.uz/img/gemini.png"
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"ok":true,"result":{"message_id":7}}"#)
        .expect(1)
        .create_async()
        .await;

    let receipt = publisher(server.url())
        .publish(&post(Some("https://example.uz/img/gemini.png")))
        .await
        .unwrap();

    assert_eq!(receipt.platform, Platform::Telegram);
    assert_eq!(receipt.external_id.as_deref(), Some("7"));
    photo.assert_async().await;
}

#[tokio::test]
async fn rejected_photo_falls_back_to_text_once() {
    let mut server = mockito::Server::new_async().await;
    let photo = server
        .mock("POST", "/botTEST/sendPhoto")
        .with_status(400)
        .with_header("content-type", "application/json")
        .with_body(r#"{"ok":false,"description":"Bad Request: wrong file identifier"}"#)
        .expect(1)
        .create_async()
        .await;
    let message = server
        .mock("POST", "/botTEST/sendMessage")
        .match_body(Matcher::PartialJson(json!({ "chat_id": "@ai_uz" })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"ok":true,"result":{"message_id":42}}"#)
        .expect(1)
        .create_async()
        .await;

    let receipt = publisher(server.url())
        .publish(&post(Some("https://example.uz/broken.png")))
        .await
        .unwrap();

    assert_eq!(receipt.external_id.as_deref(), Some("42"));
    photo.assert_async().await;
    message.assert_async().await;
}

#[tokio::test]
async fn text_failure_is_reported() {
    let mut server = mockito::Server::new_async().await;
    let message = server
        .mock("POST", "/botTEST/sendMessage")
        .with_status(403)
        .with_header("content-type", "application/json")
        .with_body(r#"{"ok":false,"description":"Forbidden: bot is not a member of the channel chat"}"#)
        .expect(1)
        .create_async()
        .await;

    let err = publisher(server.url()).publish(&post(None)).await.unwrap_err();

    assert!(matches!(err, PortError::Rejected(msg) if msg.contains("not a member")));
    message.assert_async().await;
}
