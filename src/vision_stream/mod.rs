pub mod controller;
pub mod guard;

#[cfg(feature = "desktop")]
pub mod commands;

pub use controller::{SwitchView, ToggleReport, VisionStreamController};
pub use guard::SwitchGuard;
