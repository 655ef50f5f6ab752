//! services/api/src/web/state.rs
//!
//! Defines the application's shared state.

use academy_core::ports::{LearningStore, SocialPublisher};
use std::sync::Arc;

/// The shared application state, created once at startup and passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn LearningStore>,
    pub publishers: Vec<Arc<dyn SocialPublisher>>,
}
