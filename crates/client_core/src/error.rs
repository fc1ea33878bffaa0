//! Errors raised while talking to the catalog read endpoints.

use shared::domain::EntityKind;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("invalid server url: {0}")]
    InvalidUrl(#[from] url::ParseError),
    #[error("failed to reach {kind} endpoint: {source}")]
    Network {
        kind: EntityKind,
        #[source]
        source: reqwest::Error,
    },
    #[error("{kind} endpoint answered HTTP {status}")]
    Http { kind: EntityKind, status: u16 },
    #[error("store reported an error for {kind}: {message}")]
    Store { kind: EntityKind, message: String },
    #[error("malformed {kind} response: {reason}")]
    Malformed { kind: EntityKind, reason: String },
}

impl FetchError {
    /// Single page-level message. Store text wins when the response carried one.
    pub fn user_message(&self) -> String {
        match self {
            Self::InvalidUrl(_) => "The site address is misconfigured.".to_string(),
            Self::Network { kind, .. } => {
                format!("Could not reach the server to load {kind}. Please try again later.")
            }
            Self::Http { kind, status } => format!("Failed to load {kind} (HTTP {status})."),
            Self::Store { message, .. } => message.clone(),
            Self::Malformed { kind, .. } => format!("Received an unreadable list of {kind}."),
        }
    }
}
