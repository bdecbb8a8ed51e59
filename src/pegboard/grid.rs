use anyhow::{bail, Result};
use serde::Serialize;

use crate::{
    backend::{CellSync, PlaceCommand},
    models::{PegCell, PegTool, GRID_COLS, GRID_ROWS},
    optimistic::Pending,
};

/// Client-side mirror of the physical pegboard. Every hole in the rectangle
/// is addressable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PegGrid {
    cells: [[PegCell; GRID_COLS]; GRID_ROWS],
}

impl Default for PegGrid {
    fn default() -> Self {
        Self::empty()
    }
}

/// A cell write that still has to be mirrored to the board store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellEdit {
    pub row: usize,
    pub col: usize,
    pub pending: Pending<PegCell>,
}

impl CellEdit {
    pub fn current(&self) -> PegCell {
        *self.pending.applied()
    }

    pub fn sync_payload(&self) -> CellSync {
        CellSync {
            row: self.row,
            col: self.col,
            state: self.current(),
        }
    }

    /// A place command is only issued for writes that leave a hook behind.
    pub fn place_command(&self) -> Option<PlaceCommand> {
        self.current().hook().map(|hook| PlaceCommand {
            row: self.row,
            col: self.col,
            hook_type: hook,
            color_id: hook.color_id(),
        })
    }

    pub fn view(&self) -> CellView {
        CellView {
            row: self.row,
            col: self.col,
            state: self.current(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CellView {
    pub row: usize,
    pub col: usize,
    pub state: PegCell,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardView {
    pub rows: usize,
    pub cols: usize,
    pub cells: Vec<Vec<PegCell>>,
}

impl PegGrid {
    pub fn empty() -> Self {
        Self {
            cells: [[PegCell::Empty; GRID_COLS]; GRID_ROWS],
        }
    }

    pub fn from_rows(cells: [[PegCell; GRID_COLS]; GRID_ROWS]) -> Self {
        Self { cells }
    }

    pub fn get(&self, row: usize, col: usize) -> Result<PegCell> {
        check_bounds(row, col)?;
        Ok(self.cells[row][col])
    }

    pub fn cell_mut(&mut self, row: usize, col: usize) -> Result<&mut PegCell> {
        check_bounds(row, col)?;
        Ok(&mut self.cells[row][col])
    }

    /// Left click with the active tool. `None` when the hole already holds
    /// the value the tool would write.
    pub fn paint(&mut self, row: usize, col: usize, tool: PegTool) -> Result<Option<CellEdit>> {
        self.write(row, col, tool.paint_value())
    }

    /// Right click: always empties the hole, whatever the active tool.
    pub fn erase(&mut self, row: usize, col: usize) -> Result<Option<CellEdit>> {
        self.write(row, col, PegCell::Empty)
    }

    fn write(&mut self, row: usize, col: usize, value: PegCell) -> Result<Option<CellEdit>> {
        let slot = self.cell_mut(row, col)?;
        Ok(Pending::apply(slot, value).map(|pending| CellEdit { row, col, pending }))
    }

    pub fn occupied(&self) -> usize {
        self.cells
            .iter()
            .flatten()
            .filter(|cell| !cell.is_empty())
            .count()
    }

    pub fn view(&self) -> BoardView {
        BoardView {
            rows: GRID_ROWS,
            cols: GRID_COLS,
            cells: self.cells.iter().map(|row| row.to_vec()).collect(),
        }
    }
}

fn check_bounds(row: usize, col: usize) -> Result<()> {
    if row >= GRID_ROWS || col >= GRID_COLS {
        bail!("pegboard position ({row}, {col}) is outside the {GRID_ROWS}x{GRID_COLS} board");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::HookType;

    #[test]
    fn paint_then_erase_yields_two_edits_and_one_place() {
        let mut grid = PegGrid::empty();

        let first = grid
            .paint(3, 4, PegTool::Hook(HookType::H2))
            .unwrap()
            .expect("first write changes the cell");
        let second = grid
            .paint(3, 4, PegTool::Erase)
            .unwrap()
            .expect("erase changes the cell");

        assert_eq!(grid.get(3, 4).unwrap(), PegCell::Empty);
        let places: Vec<_> = [first, second]
            .iter()
            .filter_map(CellEdit::place_command)
            .collect();
        assert_eq!(places.len(), 1);
        assert_eq!(places[0].hook_type, HookType::H2);
        assert_eq!(places[0].color_id, 1);
    }

    #[test]
    fn repeating_the_same_value_is_a_no_op() {
        let mut grid = PegGrid::empty();
        assert!(grid.paint(0, 0, PegTool::Erase).unwrap().is_none());
        grid.paint(0, 0, PegTool::Hook(HookType::H1)).unwrap();
        assert!(grid.paint(0, 0, PegTool::Hook(HookType::H1)).unwrap().is_none());
    }

    #[test]
    fn erase_ignores_active_tool_and_never_places() {
        let mut grid = PegGrid::empty();
        grid.paint(7, 14, PegTool::Hook(HookType::H4)).unwrap();
        let edit = grid.erase(7, 14).unwrap().unwrap();
        assert!(edit.place_command().is_none());
        assert_eq!(edit.sync_payload().state, PegCell::Empty);
    }

    #[test]
    fn rejects_out_of_range_positions() {
        let mut grid = PegGrid::empty();
        assert!(grid.paint(8, 0, PegTool::Erase).is_err());
        assert!(grid.erase(0, 15).is_err());
        assert!(grid.get(100, 100).is_err());
        assert_eq!(grid, PegGrid::empty());
    }

    #[test]
    fn every_corner_is_addressable() {
        let mut grid = PegGrid::empty();
        for (row, col) in [(0, 0), (0, GRID_COLS - 1), (GRID_ROWS - 1, 0), (GRID_ROWS - 1, GRID_COLS - 1)] {
            grid.paint(row, col, PegTool::Hook(HookType::H3)).unwrap();
        }
        assert_eq!(grid.occupied(), 4);
    }
}
