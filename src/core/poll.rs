//! Doodle-style poll parsing.
//!
//! Expected layout: three header rows (dates, weekdays, time ranges) over
//! the slot columns, then one row per participant with their name in the
//! first column and a selection marker (usually "OK") in each slot column
//! they can make. Date and weekday header cells are only written once per
//! day in the export, so both rows are forward-filled.

use crate::domain::model::{PreferenceMatrix, Slot};
use crate::utils::error::{Result, ScheduleError};

const HEADER_ROWS: usize = 3;

#[derive(Debug, Clone)]
pub struct PollReader {
    marker: String,
    transpose: bool,
}

impl PollReader {
    pub fn new(marker: impl Into<String>, transpose: bool) -> Self {
        Self {
            marker: marker.into(),
            transpose,
        }
    }

    /// Parse a poll CSV export into a preference matrix.
    pub fn parse(&self, raw: &[u8]) -> Result<PreferenceMatrix> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(raw);

        let mut grid: Vec<Vec<String>> = Vec::new();
        for record in reader.records() {
            let record = record?;
            grid.push(record.iter().map(|cell| cell.trim().to_string()).collect());
        }

        if self.transpose {
            grid = transpose_grid(grid);
        }

        self.parse_grid(grid)
    }

    fn parse_grid(&self, grid: Vec<Vec<String>>) -> Result<PreferenceMatrix> {
        if grid.len() <= HEADER_ROWS {
            return Err(ScheduleError::Poll {
                message: format!(
                    "expected {} header rows plus participant rows, found {} rows",
                    HEADER_ROWS,
                    grid.len()
                ),
            });
        }

        // Any header row may drop trailing empty cells, so the dates row
        // alone cannot define the column count.
        let width = grid
            .iter()
            .take(HEADER_ROWS)
            .map(|row| row.len())
            .max()
            .unwrap_or(0);
        if width < 2 {
            return Err(ScheduleError::Poll {
                message: "poll needs a name column and at least one slot column".to_string(),
            });
        }

        // Header cells past the name column describe the slots.
        let dates = forward_fill(&header_cells(&grid[0], width));
        let weekdays = forward_fill(&header_cells(&grid[1], width));
        let times = header_cells(&grid[2], width);

        let slots: Vec<Slot> = (0..width - 1)
            .map(|col| Slot::new(dates[col].clone(), weekdays[col].clone(), times[col].clone()))
            .collect();

        let mut participants = Vec::new();
        let mut cells = Vec::new();
        for row in &grid[HEADER_ROWS..] {
            let name = row.first().cloned().unwrap_or_default();
            if name.is_empty() {
                continue; // trailing blank line in the export
            }
            let mut selections = vec![false; slots.len()];
            for (col, selection) in selections.iter_mut().enumerate() {
                *selection = row
                    .get(col + 1)
                    .map(|cell| cell == &self.marker)
                    .unwrap_or(false);
            }
            participants.push(name);
            cells.push(selections);
        }

        PreferenceMatrix::new(slots, participants, cells)
    }
}

impl Default for PollReader {
    fn default() -> Self {
        Self::new("OK", false)
    }
}

/// Slot-describing cells of a header row: everything past the name column,
/// padded out to the full column count.
fn header_cells(row: &[String], width: usize) -> Vec<String> {
    (1..width)
        .map(|col| row.get(col).cloned().unwrap_or_default())
        .collect()
}

/// Replace empty cells with the closest non-empty cell to their left.
fn forward_fill(cells: &[String]) -> Vec<String> {
    let mut filled = Vec::with_capacity(cells.len());
    let mut last = String::new();
    for cell in cells {
        if !cell.is_empty() {
            last = cell.clone();
        }
        filled.push(last.clone());
    }
    filled
}

fn transpose_grid(grid: Vec<Vec<String>>) -> Vec<Vec<String>> {
    let height = grid.len();
    let width = grid.iter().map(|row| row.len()).max().unwrap_or(0);
    let mut out = vec![vec![String::new(); height]; width];
    for (r, row) in grid.iter().enumerate() {
        for (c, cell) in row.iter().enumerate() {
            out[c][r] = cell.clone();
        }
    }
    out
}
