use thiserror::Error;

/// Failures of a single relayed call.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RelayError {
    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("transport error: {0}")]
    Transport(String),

    #[error("upstream returned status {status}")]
    Upstream { status: u16 },

    #[error("cannot decode upstream body: {0}")]
    Decode(String),
}

impl RelayError {
    /// Status code reported to the caller.
    ///
    /// Upstream error statuses pass through; everything else is a 500.
    pub fn status_code(&self) -> u16 {
        match self {
            RelayError::Upstream { status } if (400..=599).contains(status) => *status,
            _ => 500,
        }
    }
}

impl From<reqwest::Error> for RelayError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            RelayError::Decode(e.to_string())
        } else if e.is_builder() {
            RelayError::Config(e.to_string())
        } else if let Some(status) = e.status() {
            RelayError::Upstream {
                status: status.as_u16(),
            }
        } else {
            // connect, timeout, proxy handshake, body read
            RelayError::Transport(e.to_string())
        }
    }
}
