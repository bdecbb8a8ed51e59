use serde::{Deserialize, Serialize};

/// Server-reported operating state. The panel never assigns one; it only
/// reflects the most recent observation.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OperatingMode {
    #[default]
    Manual,
    #[serde(alias = "AWAITING_TASK1_INPUT")]
    Task1AwaitingInput,
    Task1Executing,
    #[serde(alias = "AWAITING_TASK2_INPUT")]
    Task2AwaitingInput,
    Task2Executing,
}

impl OperatingMode {
    pub const ALL: [OperatingMode; 5] = [
        OperatingMode::Manual,
        OperatingMode::Task1AwaitingInput,
        OperatingMode::Task1Executing,
        OperatingMode::Task2AwaitingInput,
        OperatingMode::Task2Executing,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            OperatingMode::Manual => "MANUAL",
            OperatingMode::Task1AwaitingInput => "TASK1_AWAITING_INPUT",
            OperatingMode::Task1Executing => "TASK1_EXECUTING",
            OperatingMode::Task2AwaitingInput => "TASK2_AWAITING_INPUT",
            OperatingMode::Task2Executing => "TASK2_EXECUTING",
        }
    }

    pub fn task(&self) -> Option<TaskKind> {
        match self {
            OperatingMode::Manual => None,
            OperatingMode::Task1AwaitingInput | OperatingMode::Task1Executing => {
                Some(TaskKind::Task1)
            }
            OperatingMode::Task2AwaitingInput | OperatingMode::Task2Executing => {
                Some(TaskKind::Task2)
            }
        }
    }

    pub fn is_awaiting_input(&self) -> bool {
        matches!(
            self,
            OperatingMode::Task1AwaitingInput | OperatingMode::Task2AwaitingInput
        )
    }

    pub fn is_executing(&self) -> bool {
        matches!(
            self,
            OperatingMode::Task1Executing | OperatingMode::Task2Executing
        )
    }
}

/// Task 1 grabs a colored block, Task 2 places a hook into the pegboard.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub enum TaskKind {
    Task1,
    Task2,
}

impl TaskKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskKind::Task1 => "task1",
            TaskKind::Task2 => "task2",
        }
    }
}
