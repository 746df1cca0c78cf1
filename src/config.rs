use std::fmt;
use std::time::Duration;

use clap::Parser;

use crate::error::ConfigError;

#[derive(Parser, Debug)]
#[command(author, version, about = "Wait for PostgreSQL to be available", long_about = None)]
pub struct Args {
    /// PostgreSQL host
    #[arg(long, default_value = "localhost")]
    pub host: String,
    /// PostgreSQL port
    #[arg(long, default_value_t = 5432)]
    pub port: u16,
    /// PostgreSQL user
    #[arg(long, default_value = "postgres")]
    pub user: String,
    /// PostgreSQL password
    #[arg(long, default_value = "")]
    pub password: String,
    /// Database used for the probe; must exist before any application schema
    #[arg(long, default_value = "postgres")]
    pub database: String,
    /// Timeout in seconds
    #[arg(long, default_value_t = 60)]
    pub timeout: u64,
    /// Check interval in seconds
    #[arg(long, default_value_t = 1.0)]
    pub interval: f64,
    /// Upper bound on a single connection attempt, in seconds
    #[arg(long, default_value_t = 5.0)]
    pub connect_timeout: f64,
}

#[derive(Clone)]
pub struct Credentials {
    pub user: String,
    pub password: String,
}

// never print the secret
impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct PollConfig {
    pub host: String,
    pub port: u16,
    pub credentials: Credentials,
    pub database: String,
    pub timeout: Duration,
    pub interval: Duration,
    pub connect_timeout: Duration,
}

impl PollConfig {
    pub fn new(
        host: impl Into<String>,
        port: u16,
        credentials: Credentials,
        timeout: Duration,
        interval: Duration,
    ) -> Result<Self, ConfigError> {
        if interval.is_zero() {
            return Err(ConfigError::Interval(0.0));
        }

        Ok(Self {
            host: host.into(),
            port,
            credentials,
            database: "postgres".to_string(),
            timeout,
            interval,
            connect_timeout: Duration::from_secs(5),
        })
    }

    pub fn with_database(mut self, database: impl Into<String>) -> Self {
        self.database = database.into();
        self
    }

    pub fn with_connect_timeout(mut self, connect_timeout: Duration) -> Result<Self, ConfigError> {
        if connect_timeout.is_zero() {
            return Err(ConfigError::ConnectTimeout(0.0));
        }
        self.connect_timeout = connect_timeout;
        Ok(self)
    }

    pub fn endpoint(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

// rejects values that round down to a zero Duration as well
fn positive_secs(secs: f64) -> Option<Duration> {
    if !secs.is_finite() || secs <= 0.0 {
        return None;
    }
    Duration::try_from_secs_f64(secs)
        .ok()
        .filter(|d| !d.is_zero())
}

impl TryFrom<Args> for PollConfig {
    type Error = ConfigError;

    fn try_from(args: Args) -> Result<Self, Self::Error> {
        let interval = positive_secs(args.interval).ok_or(ConfigError::Interval(args.interval))?;
        let connect_timeout = positive_secs(args.connect_timeout)
            .ok_or(ConfigError::ConnectTimeout(args.connect_timeout))?;

        let credentials = Credentials {
            user: args.user,
            password: args.password,
        };

        PollConfig::new(
            args.host,
            args.port,
            credentials,
            Duration::from_secs(args.timeout),
            interval,
        )?
        .with_database(args.database)
        .with_connect_timeout(connect_timeout)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(argv: &[&str]) -> Args {
        let mut full = vec!["pg-wait"];
        full.extend_from_slice(argv);
        Args::try_parse_from(full).unwrap()
    }

    #[test]
    fn defaults_match_documented_flags() {
        let cfg = PollConfig::try_from(parse(&[])).unwrap();

        assert_eq!(cfg.host, "localhost");
        assert_eq!(cfg.port, 5432);
        assert_eq!(cfg.credentials.user, "postgres");
        assert_eq!(cfg.credentials.password, "");
        assert_eq!(cfg.database, "postgres");
        assert_eq!(cfg.timeout, Duration::from_secs(60));
        assert_eq!(cfg.interval, Duration::from_secs(1));
        assert_eq!(cfg.connect_timeout, Duration::from_secs(5));
        assert_eq!(cfg.endpoint(), "localhost:5432");
    }

    #[test]
    fn overrides_are_applied() {
        let cfg = PollConfig::try_from(parse(&[
            "--host",
            "db",
            "--port",
            "6543",
            "--user",
            "odoo",
            "--password",
            "s3cret",
            "--timeout",
            "5",
            "--interval",
            "0.25",
        ]))
        .unwrap();

        assert_eq!(cfg.endpoint(), "db:6543");
        assert_eq!(cfg.credentials.user, "odoo");
        assert_eq!(cfg.credentials.password, "s3cret");
        assert_eq!(cfg.timeout, Duration::from_secs(5));
        assert_eq!(cfg.interval, Duration::from_millis(250));
    }

    #[test]
    fn zero_timeout_is_allowed() {
        let cfg = PollConfig::try_from(parse(&["--timeout", "0"])).unwrap();
        assert!(cfg.timeout.is_zero());
    }

    #[test]
    fn non_positive_interval_is_rejected() {
        let err = PollConfig::try_from(parse(&["--interval", "0"])).unwrap_err();
        assert!(matches!(err, ConfigError::Interval(_)));

        let err = PollConfig::try_from(parse(&["--interval=-1.5"])).unwrap_err();
        assert!(matches!(err, ConfigError::Interval(v) if v == -1.5));
    }

    #[test]
    fn sub_nanosecond_interval_reports_given_value() {
        let err = PollConfig::try_from(parse(&["--interval", "1e-12"])).unwrap_err();
        assert!(matches!(err, ConfigError::Interval(v) if v == 1e-12));
        assert!(err.to_string().contains("0.000000000001"), "{err}");

        let err = PollConfig::try_from(parse(&["--connect-timeout", "1e-12"])).unwrap_err();
        assert!(matches!(err, ConfigError::ConnectTimeout(v) if v == 1e-12));
    }

    #[test]
    fn zero_connect_timeout_is_rejected() {
        let err = PollConfig::try_from(parse(&["--connect-timeout", "0"])).unwrap_err();
        assert!(matches!(err, ConfigError::ConnectTimeout(_)));
    }

    #[test]
    fn negative_timeout_fails_to_parse() {
        assert!(Args::try_parse_from(["pg-wait", "--timeout=-1"]).is_err());
        assert!(Args::try_parse_from(["pg-wait", "--port", "notaport"]).is_err());
    }

    #[test]
    fn debug_output_hides_password() {
        let cfg = PollConfig::try_from(parse(&["--password", "hunter2"])).unwrap();
        let dbg = format!("{cfg:?}");
        assert!(!dbg.contains("hunter2"));
        assert!(dbg.contains("<redacted>"));
    }
}
