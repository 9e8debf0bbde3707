use shipwatch_core::ZoneError;
use thiserror::Error;

/// What went wrong during a tracking cycle.
///
/// Every kind is recoverable: the cycle yields no new observations and the
/// next one starts afresh.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TrackerError {
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("Authentication failed: {0}")]
    Auth(String),
    #[error("Transport error: {0}")]
    Transport(String),
    #[error("Malformed response: {0}")]
    Parse(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Config,
    Auth,
    Transport,
    Parse,
}

impl TrackerError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            TrackerError::Config(_) => ErrorKind::Config,
            TrackerError::Auth(_) => ErrorKind::Auth,
            TrackerError::Transport(_) => ErrorKind::Transport,
            TrackerError::Parse(_) => ErrorKind::Parse,
        }
    }
}

impl From<ZoneError> for TrackerError {
    fn from(e: ZoneError) -> Self {
        TrackerError::Config(e.to_string())
    }
}
