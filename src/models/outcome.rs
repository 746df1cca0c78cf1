use std::process::ExitCode;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollOutcome {
    Success {
        attempts: u32,
        elapsed: Duration,
    },
    /// The time budget ran out; carries the last connection-layer error.
    TimedOut {
        last_error: String,
        attempts: u32,
        elapsed: Duration,
    },
    /// An error outside the connection layer stopped the loop before the budget was spent.
    Aborted {
        error: String,
        attempts: u32,
        elapsed: Duration,
    },
}

impl PollOutcome {
    pub fn is_ready(&self) -> bool {
        matches!(self, PollOutcome::Success { .. })
    }

    pub fn attempts(&self) -> u32 {
        match self {
            PollOutcome::Success { attempts, .. }
            | PollOutcome::TimedOut { attempts, .. }
            | PollOutcome::Aborted { attempts, .. } => *attempts,
        }
    }

    pub fn elapsed(&self) -> Duration {
        match self {
            PollOutcome::Success { elapsed, .. }
            | PollOutcome::TimedOut { elapsed, .. }
            | PollOutcome::Aborted { elapsed, .. } => *elapsed,
        }
    }

    pub fn exit_code_value(&self) -> u8 {
        if self.is_ready() {
            0
        } else {
            1
        }
    }

    pub fn exit_code(&self) -> ExitCode {
        ExitCode::from(self.exit_code_value())
    }
}
