use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::sync::Mutex;

use crate::{
    backend::RigBackend,
    events::{PanelEvent, PanelEvents},
    models::OperatingMode,
};

use super::{coordinator::ModeCoordinator, locks::UiLockPlan};

const ENABLE_LOGS: bool = true;

use crate::log_info;

#[derive(Clone)]
pub struct ModeController {
    coordinator: Arc<Mutex<ModeCoordinator>>,
    backend: Arc<dyn RigBackend>,
    events: Arc<dyn PanelEvents>,
}

impl ModeController {
    pub fn new(backend: Arc<dyn RigBackend>, events: Arc<dyn PanelEvents>) -> Self {
        Self {
            coordinator: Arc::new(Mutex::new(ModeCoordinator::new())),
            backend,
            events,
        }
    }

    /// One status fetch. On failure the last known mode stays in force.
    pub async fn refresh(&self) -> Result<OperatingMode> {
        let mode = self
            .backend
            .fetch_mode()
            .await
            .context("system status poll failed")?;
        self.observe(mode).await;
        Ok(mode)
    }

    /// Applies the lock plan for `mode` and re-emits it, even if unchanged.
    pub async fn observe(&self, mode: OperatingMode) -> UiLockPlan {
        let plan = {
            let mut guard = self.coordinator.lock().await;
            let previous = guard.mode();
            let plan = guard.observe(mode).clone();
            if previous != mode {
                log_info!("operating mode {} -> {}", previous.as_str(), mode.as_str());
            }
            plan
        };

        self.events.emit(PanelEvent::UiLocksChanged(plan.clone()));
        plan
    }

    pub async fn plan(&self) -> UiLockPlan {
        self.coordinator.lock().await.plan().clone()
    }

    pub async fn mode(&self) -> OperatingMode {
        self.coordinator.lock().await.mode()
    }
}
