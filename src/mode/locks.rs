use serde::Serialize;

use crate::models::OperatingMode;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum BannerTone {
    Idle,
    Awaiting,
    Busy,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusBanner {
    pub title: &'static str,
    pub tone: BannerTone,
}

/// Which panel surfaces accept input for a given mode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UiLockPlan {
    pub mode: OperatingMode,
    pub manual_controls: bool,
    pub grab_picker: bool,
    pub peg_grid: bool,
    pub finish_task: bool,
    pub simulation: bool,
    pub banner: StatusBanner,
}

pub fn compute_ui_locks(mode: OperatingMode) -> UiLockPlan {
    let manual = mode == OperatingMode::Manual;
    UiLockPlan {
        mode,
        manual_controls: manual,
        grab_picker: mode == OperatingMode::Task1AwaitingInput,
        peg_grid: mode == OperatingMode::Task2AwaitingInput,
        finish_task: mode.task().is_some(),
        simulation: manual,
        banner: banner_for(mode),
    }
}

fn banner_for(mode: OperatingMode) -> StatusBanner {
    let (title, tone) = match mode {
        OperatingMode::Manual => ("Rig control panel", BannerTone::Idle),
        OperatingMode::Task1AwaitingInput => (
            "Task 1: choose the block colors to grab",
            BannerTone::Awaiting,
        ),
        OperatingMode::Task1Executing => ("Task 1: arm is grabbing...", BannerTone::Busy),
        OperatingMode::Task2AwaitingInput => (
            "Task 2: choose a target hole on the pegboard",
            BannerTone::Awaiting,
        ),
        OperatingMode::Task2Executing => ("Task 2: arm is placing...", BannerTone::Busy),
    };
    StatusBanner { title, tone }
}
