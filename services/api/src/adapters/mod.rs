pub mod db;
pub mod social;

pub use db::PgStore;
pub use social::{StubPublisher, TelegramPublisher};
