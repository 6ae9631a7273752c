//! Outbound notifications
//!
//! - `types`: what can be sent and how it renders
//! - `telegram`: Bot API delivery

use async_trait::async_trait;

use crate::errors::FastMoverResult;

pub mod telegram;
pub mod types;

pub use telegram::TelegramNotifier;
pub use types::{escape_html, ErrorSeverity, Notification, NotificationType, MISSING_VALUE};

/// Anything that can deliver a notification
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Deliver one notification; `Ok` means the receiver confirmed it
    async fn send(&self, notification: &Notification) -> FastMoverResult<()>;
}
