use crate::models::OperatingMode;

use super::locks::{compute_ui_locks, UiLockPlan};

/// Holds the last mode the backend reported and the lock plan derived from
/// it. Never transitions on its own.
#[derive(Debug, Clone)]
pub struct ModeCoordinator {
    mode: OperatingMode,
    plan: UiLockPlan,
    observations: u64,
}

impl Default for ModeCoordinator {
    fn default() -> Self {
        Self::new()
    }
}

impl ModeCoordinator {
    pub fn new() -> Self {
        let mode = OperatingMode::default();
        Self {
            mode,
            plan: compute_ui_locks(mode),
            observations: 0,
        }
    }

    /// Overwrites the stored mode. The plan is recomputed unconditionally so
    /// re-observing the same mode is harmless.
    pub fn observe(&mut self, mode: OperatingMode) -> &UiLockPlan {
        self.mode = mode;
        self.plan = compute_ui_locks(mode);
        self.observations = self.observations.wrapping_add(1);
        &self.plan
    }

    pub fn mode(&self) -> OperatingMode {
        self.mode
    }

    pub fn plan(&self) -> &UiLockPlan {
        &self.plan
    }

    /// Number of polls that resolved to a mode; zero until the first one.
    pub fn observations(&self) -> u64 {
        self.observations
    }
}
