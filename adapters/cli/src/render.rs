//! Text rendering of cost grids for the terminal.

use std::fmt::Write as _;

use cost_matrix_core::{CostGrid, RoomCoord, OBSTACLE_COST, PLAIN_COST, ROOM_SIZE, SWAMP_COST};

/// Renders the grid as one glyph per cell, one line per row.
///
/// `.` is plain, `~` swamp cost, `#` impassable, and `+` any other cost.
pub(crate) fn render_grid(grid: &CostGrid) -> String {
    let size = usize::from(ROOM_SIZE);
    let mut out = String::with_capacity(size * (size + 1));
    for y in 0..ROOM_SIZE {
        for x in 0..ROOM_SIZE {
            out.push(glyph(grid.get(RoomCoord::new(x, y)).unwrap_or(OBSTACLE_COST)));
        }
        out.push('\n');
    }
    out
}

/// Renders the serialized grid as a JSON array of costs.
pub(crate) fn render_json(grid: &CostGrid) -> serde_json::Result<String> {
    serde_json::to_string(&grid.to_serialized())
}

/// Lists cache keys alongside the tick they were computed on.
pub(crate) fn render_entries<'a>(entries: impl IntoIterator<Item = (&'a str, u64)>) -> String {
    let mut out = String::new();
    for (key, tick) in entries {
        let _ = writeln!(out, "{tick:>8}  {key}");
    }
    out
}

fn glyph(cost: u8) -> char {
    match cost {
        PLAIN_COST => '.',
        SWAMP_COST => '~',
        OBSTACLE_COST => '#',
        _ => '+',
    }
}
