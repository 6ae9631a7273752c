/// Error types for FastMover
///
/// One enum covers every failure the library reports. Callers decide which
/// ones are fatal: only configuration and page-fetch errors stop a run.
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FastMoverError {
    /// Missing or invalid configuration value
    #[error("Configuration error: {0}")]
    Config(String),

    /// Transport-level HTTP failure (connect, timeout, body read)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-success HTTP status from a remote endpoint
    #[error("HTTP status {status} from {endpoint}")]
    HttpStatus { endpoint: String, status: u16 },

    /// Telegram answered but refused the request (`ok: false`)
    #[error("Telegram API error: {description}")]
    Telegram { description: String },

    /// The dashboard page could not be turned into rows
    #[error("Page parse error: {0}")]
    PageParse(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type FastMoverResult<T> = Result<T, FastMoverError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        let err = FastMoverError::HttpStatus {
            endpoint: "https://api.telegram.org".to_string(),
            status: 429,
        };
        assert_eq!(err.to_string(), "HTTP status 429 from https://api.telegram.org");

        let err = FastMoverError::Config("TELEGRAM_CHAT_ID is not set".to_string());
        assert_eq!(err.to_string(), "Configuration error: TELEGRAM_CHAT_ID is not set");
    }

    #[test]
    fn test_io_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: FastMoverError = io.into();
        assert!(matches!(err, FastMoverError::Io(_)));
    }
}
