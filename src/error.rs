use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("interval must be a positive number of seconds, got {0}")]
    Interval(f64),

    #[error("connect timeout must be a positive number of seconds, got {0}")]
    ConnectTimeout(f64),
}

/// Why a single handshake attempt failed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProbeError {
    /// Refused, unreachable, still starting up, auth not ready yet. Worth retrying.
    #[error("{0}")]
    Connection(String),

    /// Anything the connection layer does not account for. Not retried.
    #[error("{0}")]
    Unexpected(String),
}

impl ProbeError {
    pub fn is_transient(&self) -> bool {
        matches!(self, ProbeError::Connection(_))
    }

    pub fn message(&self) -> &str {
        match self {
            ProbeError::Connection(msg) | ProbeError::Unexpected(msg) => msg,
        }
    }
}

impl From<sqlx::Error> for ProbeError {
    fn from(err: sqlx::Error) -> Self {
        let msg = err.to_string();
        match err {
            sqlx::Error::Io(_)
            | sqlx::Error::Tls(_)
            | sqlx::Error::Protocol(_)
            | sqlx::Error::Database(_)
            | sqlx::Error::PoolTimedOut
            | sqlx::Error::PoolClosed
            | sqlx::Error::WorkerCrashed => ProbeError::Connection(msg),
            _ => ProbeError::Unexpected(msg),
        }
    }
}
