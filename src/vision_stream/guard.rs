use std::time::{Duration, Instant};

/// Feedback-loop guard for switches the poller writes into.
///
/// A poll result moves the guard to `Writing`; once every switch has been
/// updated it moves to `Settling` until the change events those writes
/// caused have drained. User toggles are only honoured while `Idle`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SwitchGuard {
    #[default]
    Idle,
    Writing,
    Settling { until: Instant },
}

impl SwitchGuard {
    pub fn begin_write(&mut self) {
        *self = SwitchGuard::Writing;
    }

    pub fn finish_write(&mut self, now: Instant, settle: Duration) {
        *self = SwitchGuard::Settling {
            until: now + settle,
        };
    }

    /// Current state with an elapsed settle window folded back to `Idle`.
    pub fn state(&mut self, now: Instant) -> SwitchGuard {
        if let SwitchGuard::Settling { until } = *self {
            if now >= until {
                *self = SwitchGuard::Idle;
            }
        }
        *self
    }

    pub fn is_engaged(&mut self, now: Instant) -> bool {
        self.state(now) != SwitchGuard::Idle
    }
}
