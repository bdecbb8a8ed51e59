pub mod grab;
pub mod mode;
pub mod peg;

pub use grab::{GrabColor, GrabRequest};
pub use mode::{OperatingMode, TaskKind};
pub use peg::{HookType, PegCell, PegTool, GRID_COLS, GRID_ROWS};
