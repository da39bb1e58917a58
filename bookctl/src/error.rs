//! Error types for bookctl.

use std::path::PathBuf;

use bookline::{IntakeError, SettleError};

/// All errors that can occur while running a bookctl command.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("config error: {0}")]
    Config(String),

    #[error("failed to read config file {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("ledger store {path}: {source}")]
    Store {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error(transparent)]
    Intake(#[from] IntakeError),

    #[error(transparent)]
    Settle(#[from] SettleError),

    #[error("risk check failed: {0}")]
    RiskFailed(String),

    #[error("aborted: {0}")]
    Aborted(String),

    #[error("audit log error: {0}")]
    Audit(#[from] std::io::Error),
}

impl Error {
    /// Process exit code: 2 for unmet preconditions and risk failures, 1 otherwise.
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::RiskFailed(_) => 2,
            Error::Settle(e) if e.is_precondition() => 2,
            Error::Aborted(_) => 0,
            _ => 1,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;
    use bookline::EventId;

    #[test]
    fn exit_codes() {
        assert_eq!(Error::RiskFailed("x".into()).exit_code(), 2);
        assert_eq!(
            Error::Settle(SettleError::EventNotFinal(EventId(1))).exit_code(),
            2
        );
        assert_eq!(Error::Config("x".into()).exit_code(), 1);
        assert_eq!(Error::Aborted("no".into()).exit_code(), 0);
    }
}
