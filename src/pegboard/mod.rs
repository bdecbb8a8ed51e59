pub mod controller;
pub mod decode;
pub mod grid;

#[cfg(feature = "desktop")]
pub mod commands;

pub use controller::{CellReport, PegboardController};
pub use decode::{decode_board, normalize_cell};
pub use grid::{BoardView, CellEdit, CellView, PegGrid};
