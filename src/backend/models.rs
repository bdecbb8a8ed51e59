use serde::{Deserialize, Serialize};

use crate::models::{GrabColor, HookType, OperatingMode, PegCell};

#[derive(Debug, Clone, Deserialize)]
pub struct StatusResponse {
    pub status: OperatingMode,
}

/// Write-through mirror of one pegboard hole.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CellSync {
    pub row: usize,
    pub col: usize,
    pub state: PegCell,
}

/// Task 2 place command for one hole.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PlaceCommand {
    pub row: usize,
    pub col: usize,
    pub hook_type: HookType,
    pub color_id: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GrabTask {
    pub color_id: u8,
    pub color_name: GrabColor,
}

impl From<GrabColor> for GrabTask {
    fn from(color: GrabColor) -> Self {
        Self {
            color_id: color.color_id(),
            color_name: color,
        }
    }
}

/// Task 1 batch, executed by the arm in order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GrabSequence {
    pub tasks: Vec<GrabTask>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CommandReply {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub message: String,
}

impl CommandReply {
    pub fn is_success(&self) -> bool {
        self.status.as_deref() == Some("success")
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct VisionStreamStatus {
    pub is_active: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct VisionStreamRequest {
    pub enabled: bool,
}

/// Result of a command the backend answered. Transport failures are errors;
/// a reply the backend marked as anything but `success` is `Rejected`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "camelCase")]
pub enum DispatchOutcome {
    Accepted { message: String },
    Rejected { message: String },
}

impl DispatchOutcome {
    pub fn is_accepted(&self) -> bool {
        matches!(self, DispatchOutcome::Accepted { .. })
    }

    pub fn message(&self) -> &str {
        match self {
            DispatchOutcome::Accepted { message } | DispatchOutcome::Rejected { message } => {
                message
            }
        }
    }
}

impl From<CommandReply> for DispatchOutcome {
    fn from(reply: CommandReply) -> Self {
        if reply.is_success() {
            DispatchOutcome::Accepted {
                message: reply.message,
            }
        } else {
            DispatchOutcome::Rejected {
                message: reply.message,
            }
        }
    }
}
