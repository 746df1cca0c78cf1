use std::env;

use async_trait::async_trait;
use sqlx::postgres::{PgConnectOptions, PgConnection, PgSslMode};
use sqlx::Connection;
use tracing::debug;

use crate::config::PollConfig;
use crate::error::ProbeError;

/// Variables libpq-compatible clients read on their own. `PgConnectOptions` picks
/// these up at construction and has no setter to clear `PGOPTIONS` or the TLS files.
pub const LIBPQ_ENV_VARS: &[&str] = &[
    "PGHOST",
    "PGHOSTADDR",
    "PGPORT",
    "PGUSER",
    "PGPASSWORD",
    "PGPASSFILE",
    "PGDATABASE",
    "PGSSLMODE",
    "PGSSLROOTCERT",
    "PGSSLCERT",
    "PGSSLKEY",
    "PGAPPNAME",
    "PGOPTIONS",
];

/// Drops the libpq variables from this process so only the command line reaches the handshake.
///
/// Must run before any other thread exists.
pub fn clear_libpq_env() {
    for key in LIBPQ_ENV_VARS {
        env::remove_var(key);
    }
}

/// One handshake attempt against the target. The poller only sees this seam.
#[async_trait]
pub trait Probe: Send + Sync {
    async fn attempt(&self) -> Result<(), ProbeError>;
}

pub struct PgProbe {
    options: PgConnectOptions,
}

impl PgProbe {
    pub fn new(config: &PollConfig) -> Self {
        // every field with a setter is pinned; the rest is covered by clear_libpq_env
        let options = PgConnectOptions::new_without_pgpass()
            .host(&config.host)
            .port(config.port)
            .username(&config.credentials.user)
            .password(&config.credentials.password)
            .database(&config.database)
            .ssl_mode(PgSslMode::Prefer)
            .application_name("pg-wait");

        Self { options }
    }

    #[cfg(test)]
    pub fn options(&self) -> &PgConnectOptions {
        &self.options
    }
}

#[async_trait]
impl Probe for PgProbe {
    async fn attempt(&self) -> Result<(), ProbeError> {
        let conn = PgConnection::connect_with(&self.options).await?;

        // The handshake already succeeded; a failed Terminate does not change that.
        if let Err(err) = conn.close().await {
            debug!("closing probe connection failed: {err}");
        }

        Ok(())
    }
}
