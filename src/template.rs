// template.rs - Plain-text center template parser

use crate::cell::Cell;
use serde::Serialize;

/// The fixed sub-grid stamped into the center of every generated maze.
/// Parsed from the level text format: one character per cell, one row per
/// line, rows space-padded to the longest row, unrecognized characters
/// mapped to `Empty`.
#[derive(Debug, Clone, Serialize)]
pub struct Template {
    rows: usize,
    cols: usize,
    cells: Vec<Cell>,
}

impl Template {
    pub fn parse(text: &str) -> Template {
        let lines: Vec<&str> = text.lines().collect();
        let cols = lines.iter().map(|l| l.chars().count()).max().unwrap_or(0);
        let rows = if cols == 0 { 0 } else { lines.len() };

        let mut cells = Vec::with_capacity(rows * cols);
        for line in lines.iter().take(rows) {
            let mut count = 0;
            for c in line.chars() {
                cells.push(Cell::from_char(c));
                count += 1;
            }
            // pad short rows out to the widest one
            cells.resize(cells.len() + cols - count, Cell::Empty);
        }

        Template { rows, cols, cells }
    }

    /// An all-`Empty` template of the given size.
    pub fn empty(rows: usize, cols: usize) -> Template {
        Template {
            rows,
            cols,
            cells: vec![Cell::Empty; rows * cols],
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn is_empty(&self) -> bool {
        self.rows == 0 || self.cols == 0
    }

    pub fn get(&self, row: usize, col: usize) -> Cell {
        self.cells[row * self.cols + col]
    }
}
