use shared::domain::Rfid;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("{operation} failed: {message}")]
    Transport {
        operation: &'static str,
        status: Option<u16>,
        message: String,
    },
    #[error("no pet registered for rfid {rfid}")]
    NotFound { rfid: Rfid },
    #[error("{operation} rejected (status {status}): {message}")]
    Validation {
        operation: &'static str,
        status: u16,
        message: String,
    },
    #[error("failed to decode {operation} response: {message}")]
    Decode {
        operation: &'static str,
        message: String,
    },
    #[error("invalid backend url '{url}': {message}")]
    Endpoint { url: String, message: String },
}

impl GatewayError {
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Transport { status, .. } => *status,
            Self::NotFound { .. } => Some(404),
            Self::Validation { status, .. } => Some(*status),
            Self::Decode { .. } | Self::Endpoint { .. } => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

pub type GatewayResult<T> = std::result::Result<T, GatewayError>;
