//! Everything the panel "renders" leaves the backend as a named event with
//! a serializable view payload. The desktop shell forwards them to the
//! webview; tests record them.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::{
    grab_queue::QueueView,
    mode::UiLockPlan,
    models::PegTool,
    pegboard::{BoardView, CellView},
    vision_stream::SwitchView,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum NoticeLevel {
    Info,
    Warn,
    Error,
}

/// Operator-facing message for the outcome of a user-initiated action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
    pub at: DateTime<Utc>,
}

impl Notice {
    pub fn new(level: NoticeLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
            at: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum PanelEvent {
    UiLocksChanged(UiLockPlan),
    GrabQueueChanged(QueueView),
    PegboardLoaded(BoardView),
    PegCellChanged(CellView),
    PegToolChanged(PegTool),
    VisionSwitchChanged(SwitchView),
    Notice(Notice),
}

impl PanelEvent {
    pub fn name(&self) -> &'static str {
        match self {
            PanelEvent::UiLocksChanged(_) => "ui-locks-changed",
            PanelEvent::GrabQueueChanged(_) => "grab-queue-changed",
            PanelEvent::PegboardLoaded(_) => "pegboard-loaded",
            PanelEvent::PegCellChanged(_) => "peg-cell-changed",
            PanelEvent::PegToolChanged(_) => "peg-tool-changed",
            PanelEvent::VisionSwitchChanged(_) => "vision-switch-changed",
            PanelEvent::Notice(_) => "panel-notice",
        }
    }
}

pub trait PanelEvents: Send + Sync {
    fn emit(&self, event: PanelEvent);
}

pub fn notify(events: &dyn PanelEvents, level: NoticeLevel, message: impl Into<String>) {
    events.emit(PanelEvent::Notice(Notice::new(level, message)));
}

#[cfg(feature = "desktop")]
mod desktop {
    use tauri::{AppHandle, Emitter};

    use super::{PanelEvent, PanelEvents};

    /// Forwards panel events to every webview window.
    pub struct TauriEvents {
        app_handle: AppHandle,
    }

    impl TauriEvents {
        pub fn new(app_handle: AppHandle) -> Self {
            Self { app_handle }
        }
    }

    impl PanelEvents for TauriEvents {
        fn emit(&self, event: PanelEvent) {
            if let Err(err) = self.app_handle.emit(event.name(), &event) {
                log::warn!("failed to emit {}: {err}", event.name());
            }
        }
    }
}

#[cfg(feature = "desktop")]
pub use desktop::TauriEvents;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::HookType;

    #[test]
    fn payload_serializes_without_wrapper() {
        let event = PanelEvent::PegToolChanged(PegTool::Hook(HookType::H2));
        assert_eq!(event.name(), "peg-tool-changed");
        assert_eq!(serde_json::to_value(&event).unwrap(), serde_json::json!("h2"));
    }
}
