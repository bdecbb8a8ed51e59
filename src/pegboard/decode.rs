//! Decoding of persisted board snapshots, including the encodings older
//! panel builds wrote (`0`/`1`, bare hook numbers, numeric strings).

use serde_json::Value;

use crate::models::{HookType, PegCell, GRID_COLS, GRID_ROWS};

use super::grid::PegGrid;

/// Maps any cell encoding seen in stored boards onto the canonical value.
/// Unknown values decode as an empty hole.
pub fn normalize_cell(value: &Value) -> PegCell {
    match value {
        Value::Null => PegCell::Empty,
        Value::Bool(true) => PegCell::Hook(HookType::H1),
        Value::Bool(false) => PegCell::Empty,
        Value::Number(number) => number
            .as_i64()
            .and_then(HookType::from_number)
            .map(PegCell::Hook)
            .unwrap_or(PegCell::Empty),
        Value::String(text) => normalize_tag(text),
        Value::Array(_) | Value::Object(_) => PegCell::Empty,
    }
}

fn normalize_tag(text: &str) -> PegCell {
    let tag = text.trim().to_ascii_lowercase();
    let digits = tag.strip_prefix('h').unwrap_or(&tag);
    digits
        .parse::<i64>()
        .ok()
        .and_then(HookType::from_number)
        .map(PegCell::Hook)
        .unwrap_or(PegCell::Empty)
}

/// Returns `None` when the snapshot is not an array of exactly
/// [`GRID_ROWS`] rows; callers fall back to an empty board. Short or long
/// rows are padded with empty holes or truncated.
pub fn decode_board(snapshot: &Value) -> Option<PegGrid> {
    let rows = snapshot.as_array()?;
    if rows.len() != GRID_ROWS {
        return None;
    }

    let mut cells = [[PegCell::Empty; GRID_COLS]; GRID_ROWS];
    for (row_idx, row) in rows.iter().enumerate() {
        let Some(values) = row.as_array() else {
            continue;
        };
        for (col_idx, value) in values.iter().take(GRID_COLS).enumerate() {
            cells[row_idx][col_idx] = normalize_cell(value);
        }
    }
    Some(PegGrid::from_rows(cells))
}
