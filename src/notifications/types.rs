//! Notification types for Telegram delivery
//!
//! Every notification renders to Telegram HTML. Dashboard values are
//! inserted escaped; missing ones show as `N/A`.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::coin::CoinRecord;

/// Placeholder for a value the page did not provide
pub const MISSING_VALUE: &str = "N/A";

/// Types of notifications that can be sent
#[derive(Clone, Debug, PartialEq, Serialize)]
pub enum NotificationType {
    /// A token that passed both filters
    FastMover {
        token_symbol: Option<String>,
        market_cap: Option<String>,
        pair_age: Option<String>,
        volume: Option<String>,
        /// Absolute link to the pair page
        url: Option<String>,
        token_address: String,
    },

    /// A run that could not complete
    SystemError {
        message: String,
        severity: ErrorSeverity,
    },
}

/// Severity levels for system errors
#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
pub enum ErrorSeverity {
    Warning,
    Error,
    Critical,
}

impl std::fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorSeverity::Warning => write!(f, "warning"),
            ErrorSeverity::Error => write!(f, "error"),
            ErrorSeverity::Critical => write!(f, "critical"),
        }
    }
}

/// A notification with timestamp
#[derive(Clone, Debug)]
pub struct Notification {
    pub notification_type: NotificationType,
    pub timestamp: DateTime<Utc>,
}

impl Notification {
    /// Create a new notification with current timestamp
    pub fn new(notification_type: NotificationType) -> Self {
        Self {
            notification_type,
            timestamp: Utc::now(),
        }
    }

    /// Alert for a record that passed the filters
    ///
    /// `base_url` resolves a relative row link into a clickable one.
    pub fn fast_mover(record: &CoinRecord, token_address: &str, base_url: &str) -> Self {
        Self::new(NotificationType::FastMover {
            token_symbol: record.token_symbol.clone(),
            market_cap: record.market_cap.clone(),
            pair_age: record.pair_age.clone(),
            volume: record.volume.clone(),
            url: record.contract_url(base_url),
            token_address: token_address.to_string(),
        })
    }

    pub fn system_error(message: String, severity: ErrorSeverity) -> Self {
        Self::new(NotificationType::SystemError { message, severity })
    }

    /// Render as a Telegram HTML message
    pub fn format_html(&self) -> String {
        match &self.notification_type {
            NotificationType::FastMover {
                token_symbol,
                market_cap,
                pair_age,
                volume,
                url,
                token_address,
            } => format!(
                "🚀 <b>New Fast Mover</b>\n\n\
                 💎 <b>Coin:</b> {}\n\
                 💰 <b>Market Cap:</b> {}\n\
                 ⏰ <b>Age:</b> {}\n\
                 📈 <b>Volume:</b> {}\n\
                 🔗 <b>Contract Address: </b> <a href=\"{}\">{}</a>",
                display(token_symbol),
                display(market_cap),
                display(pair_age),
                display(volume),
                display(url),
                escape_html(token_address)
            ),

            NotificationType::SystemError { message, severity } => {
                let emoji = match severity {
                    ErrorSeverity::Warning => "⚠️",
                    ErrorSeverity::Error => "❌",
                    ErrorSeverity::Critical => "🚨",
                };
                format!(
                    "{} <b>FastMover {}</b>\n\n{}\n\n<i>{}</i>",
                    emoji,
                    severity,
                    escape_html(message),
                    self.timestamp.format("%Y-%m-%d %H:%M:%S UTC")
                )
            }
        }
    }
}

/// Escape the characters Telegram HTML treats specially
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            other => escaped.push(other),
        }
    }
    escaped
}

fn display(value: &Option<String>) -> String {
    match value.as_deref() {
        Some(text) if !text.is_empty() => escape_html(text),
        _ => MISSING_VALUE.to_string(),
    }
}
