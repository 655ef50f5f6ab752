//! crates/academy_core/src/social.rs
//!
//! Cross-posting a piece of content to every configured platform.

use crate::domain::{Platform, PublishReceipt, SocialPost};
use crate::ports::{PortError, SocialPublisher};
use futures::future::join_all;
use std::sync::Arc;
use tracing::{error, info};

/// The result of publishing to one platform.
#[derive(Debug)]
pub struct PublishOutcome {
    pub platform: Platform,
    pub result: Result<PublishReceipt, PortError>,
}

impl PublishOutcome {
    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }
}

/// Publishes `post` through every publisher concurrently.
///
/// Returns one outcome per publisher, in the order given. A failing platform
/// does not stop the others.
pub async fn publish_everywhere(
    publishers: &[Arc<dyn SocialPublisher>],
    post: &SocialPost,
) -> Vec<PublishOutcome> {
    join_all(publishers.iter().map(|publisher| async move {
        let platform = publisher.platform();
        let result = publisher.publish(post).await;
        match &result {
            Ok(_) => info!("Published '{}' to {}", post.title, platform),
            Err(e) => error!("Failed to publish '{}' to {}: {}", post.title, platform, e),
        }
        PublishOutcome { platform, result }
    }))
    .await
}
