//! Robot bridge errors

use thiserror::Error;

/// Errors from the robot bridge client
#[derive(Debug, Error)]
pub enum RobotError {
    /// Connection to the bridge failed
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Bridge unreachable after the single reconnect attempt
    #[error("Robot bridge unavailable: {0}")]
    Unavailable(String),

    /// Request to the bridge failed
    #[error("Request failed: {0}")]
    RequestFailed(String),

    /// Hardware playback failed
    #[error("Playback failed: {0}")]
    PlaybackFailed(String),

    /// Response from the bridge could not be parsed
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Invalid configuration
    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl From<reqwest::Error> for RobotError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() || err.is_connect() {
            Self::ConnectionFailed(err.to_string())
        } else {
            Self::RequestFailed(err.to_string())
        }
    }
}
