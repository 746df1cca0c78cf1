use tokio::time::Instant;
use tracing::{error, info, warn};

use crate::config::PollConfig;
use crate::db::probe::Probe;
use crate::error::ProbeError;
use crate::models::outcome::PollOutcome;

/// Retries `probe` every `config.interval` until it succeeds or `config.timeout` has elapsed.
///
/// Connection-layer failures are retried; anything else ends the loop at once with
/// [`PollOutcome::Aborted`]. The timeout is only checked after a failed attempt, so
/// at least one attempt is always made, even with a zero budget. Each attempt is cut
/// off after `config.connect_timeout`, or earlier so the run ends within
/// `config.timeout + config.interval`.
pub async fn poll_until_ready<P>(config: &PollConfig, probe: &P) -> PollOutcome
where
    P: Probe + ?Sized,
{
    info!(host = %config.host, port = config.port, "Waiting for PostgreSQL at {}...", config.endpoint());

    let start = Instant::now();
    let mut attempts: u32 = 0;

    loop {
        attempts = attempts.saturating_add(1);

        // keeps the whole run within timeout + interval
        let window = config
            .connect_timeout
            .min((config.timeout + config.interval).saturating_sub(start.elapsed()));

        let result = match tokio::time::timeout(window, probe.attempt()).await {
            Ok(res) => res,
            Err(_) => Err(ProbeError::Connection(format!(
                "connection attempt timed out after {:.1}s",
                window.as_secs_f64()
            ))),
        };

        let err = match result {
            Ok(()) => {
                info!(attempts, "PostgreSQL is available!");
                return PollOutcome::Success {
                    attempts,
                    elapsed: start.elapsed(),
                };
            }
            Err(err) => err,
        };

        let elapsed = start.elapsed();

        if !err.is_transient() {
            error!(attempts, "Unexpected error: {err}");
            return PollOutcome::Aborted {
                error: err.message().to_string(),
                attempts,
                elapsed,
            };
        }

        if elapsed >= config.timeout {
            error!(
                attempts,
                "Timeout: PostgreSQL not available after {} seconds",
                config.timeout.as_secs_f64()
            );
            error!("Last error: {err}");
            return PollOutcome::TimedOut {
                last_error: err.message().to_string(),
                attempts,
                elapsed,
            };
        }

        warn!(
            attempts,
            error = %err,
            "PostgreSQL not ready yet... ({:.1}s elapsed)",
            elapsed.as_secs_f64()
        );
        tokio::time::sleep(config.interval).await;
    }
}
