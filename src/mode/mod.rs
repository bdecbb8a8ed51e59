pub mod controller;
pub mod coordinator;
pub mod locks;

#[cfg(feature = "desktop")]
pub mod commands;

pub use controller::ModeController;
pub use coordinator::ModeCoordinator;
pub use locks::{compute_ui_locks, BannerTone, StatusBanner, UiLockPlan};
