//! The one object that owns all panel state for a session. Command handlers
//! and the poller share it by cloning; every clone points at the same state.

use std::sync::Arc;

use anyhow::{bail, Result};
use serde::Serialize;

use crate::{
    backend::{DispatchOutcome, RigBackend},
    events::{notify, NoticeLevel, PanelEvents},
    grab_queue::{DispatchReport, GrabQueueController, QueueView},
    mode::{ModeController, UiLockPlan},
    models::{GrabColor, OperatingMode, PegTool, TaskKind},
    pegboard::{BoardView, CellReport, PegboardController},
    settings::PanelSettings,
    vision_stream::{SwitchView, ToggleReport, VisionStreamController},
};

const ENABLE_LOGS: bool = true;

use crate::{log_error, log_warn};

/// Everything the webview needs for a first render.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PanelSnapshot {
    pub locks: UiLockPlan,
    pub queue: QueueView,
    pub board: BoardView,
    pub tool: PegTool,
    pub vision_switches: Vec<SwitchView>,
    pub vision_active: Option<bool>,
}

#[derive(Clone)]
pub struct PanelSession {
    mode: ModeController,
    grab: GrabQueueController,
    pegboard: PegboardController,
    vision: VisionStreamController,
    backend: Arc<dyn RigBackend>,
    events: Arc<dyn PanelEvents>,
}

impl PanelSession {
    pub fn new(
        backend: Arc<dyn RigBackend>,
        events: Arc<dyn PanelEvents>,
        settings: &PanelSettings,
    ) -> Self {
        Self {
            mode: ModeController::new(backend.clone(), events.clone()),
            grab: GrabQueueController::new(backend.clone(), events.clone()),
            pegboard: PegboardController::new(backend.clone(), events.clone()),
            vision: VisionStreamController::new(
                settings.vision_switches.clone(),
                settings.switch_settle(),
                backend.clone(),
                events.clone(),
            ),
            backend,
            events,
        }
    }

    pub fn mode(&self) -> &ModeController {
        &self.mode
    }

    pub fn grab_queue(&self) -> &GrabQueueController {
        &self.grab
    }

    pub fn pegboard(&self) -> &PegboardController {
        &self.pegboard
    }

    pub fn vision_stream(&self) -> &VisionStreamController {
        &self.vision
    }

    /// Restores the persisted board and publishes the initial (manual) lock
    /// plan ahead of the first poll.
    pub async fn start(&self) -> PanelSnapshot {
        let mode = self.mode.mode().await;
        self.mode.observe(mode).await;
        self.pegboard.load().await;
        self.snapshot().await
    }

    pub async fn snapshot(&self) -> PanelSnapshot {
        PanelSnapshot {
            locks: self.mode.plan().await,
            queue: self.grab.view().await,
            board: self.pegboard.view().await,
            tool: self.pegboard.tool().await,
            vision_switches: self.vision.switches().await,
            vision_active: self.vision.server_value().await,
        }
    }

    pub async fn refresh_mode(&self) -> Result<OperatingMode> {
        self.mode.refresh().await
    }

    pub async fn refresh_vision_stream(&self) -> Result<bool> {
        self.vision.refresh().await
    }

    pub async fn enqueue_grab(&self, color: GrabColor) -> Result<QueueView> {
        self.require(|plan| plan.grab_picker, "The grab color picker").await?;
        Ok(self.grab.enqueue(color).await)
    }

    pub async fn remove_grab(&self, index: usize) -> Result<QueueView> {
        self.grab.remove(index).await
    }

    pub async fn clear_grabs(&self) -> QueueView {
        self.grab.clear().await
    }

    pub async fn dispatch_grabs(&self) -> Result<DispatchReport> {
        self.grab.dispatch_all().await
    }

    pub async fn select_peg_tool(&self, tool: PegTool) -> PegTool {
        self.pegboard.select_tool(tool).await
    }

    pub async fn select_peg_tool_by_key(&self, key: &str) -> Option<PegTool> {
        self.pegboard.select_tool_by_key(key).await
    }

    pub async fn peg_click(&self, row: usize, col: usize) -> Result<CellReport> {
        self.require(|plan| plan.peg_grid, "The pegboard").await?;
        self.pegboard.click(row, col).await
    }

    pub async fn peg_clear(&self, row: usize, col: usize) -> Result<CellReport> {
        self.require(|plan| plan.peg_grid, "The pegboard").await?;
        self.pegboard.clear(row, col).await
    }

    pub async fn toggle_vision_stream(&self, switch_id: &str, enabled: bool) -> Result<ToggleReport> {
        self.vision.on_user_toggle(switch_id, enabled).await
    }

    /// Tells the rig the operator is done with the current task.
    pub async fn finish_task(&self) -> Result<String> {
        self.require(|plan| plan.finish_task, "Finish task").await?;
        let message = match self.backend.finish_task().await {
            Ok(message) => message,
            Err(err) => {
                log_error!("finish task failed: {err:?}");
                notify(
                    &*self.events,
                    NoticeLevel::Error,
                    format!("Finish task could not be sent: {err}"),
                );
                return Err(err);
            }
        };
        notify(&*self.events, NoticeLevel::Info, message.clone());
        self.refresh_after_command().await;
        Ok(message)
    }

    /// Bench helper: makes the rig behave as if the car reached a task
    /// station.
    pub async fn simulate_task(&self, task: TaskKind) -> Result<DispatchOutcome> {
        self.require(|plan| plan.simulation, "Task simulation").await?;
        let outcome = match self.backend.simulate_task(task).await {
            Ok(outcome) => outcome,
            Err(err) => {
                log_error!("simulate {} failed: {err:?}", task.as_str());
                notify(
                    &*self.events,
                    NoticeLevel::Error,
                    format!("Simulation request could not be sent: {err}"),
                );
                return Err(err);
            }
        };
        let level = if outcome.is_accepted() {
            NoticeLevel::Info
        } else {
            NoticeLevel::Warn
        };
        notify(&*self.events, level, outcome.message().to_string());
        self.refresh_after_command().await;
        Ok(outcome)
    }

    async fn refresh_after_command(&self) {
        if let Err(err) = self.mode.refresh().await {
            log_warn!("status refetch after command failed: {err:?}");
        }
    }

    async fn require(&self, allowed: impl Fn(&UiLockPlan) -> bool, surface: &str) -> Result<()> {
        let plan = self.mode.plan().await;
        if !allowed(&plan) {
            bail!(
                "{surface} is locked while the rig is in {}",
                plan.mode.as_str()
            );
        }
        Ok(())
    }
}
