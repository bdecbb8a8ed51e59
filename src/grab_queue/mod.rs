pub mod controller;
pub mod queue;

#[cfg(feature = "desktop")]
pub mod commands;

pub use controller::{DispatchReport, GrabQueueController};
pub use queue::{GrabBatch, GrabQueue, QueueEntryView, QueueView};
