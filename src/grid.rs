// grid.rs - The final 2D cell grid handed to callers

use crate::cell::Cell;
use serde::{Deserialize, Serialize};
use std::fmt;

/// `true` when both coordinates are odd, i.e. the cell is a maze room
/// vertex. Pillars and the outer border have two even coordinates.
pub fn is_room(row: usize, col: usize) -> bool {
    row % 2 == 1 && col % 2 == 1
}

/// `true` when exactly one coordinate is odd: the wall/passage position
/// between two rooms. Doors only ever occupy these cells.
pub fn is_door_position(row: usize, col: usize) -> bool {
    (row + col) % 2 == 1
}

/// Rectangular grid of cell codes, dimensions `(2*height+1) x (2*width+1)`.
/// This is the only artifact a generation request produces.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Grid {
    rows: usize,
    cols: usize,
    cells: Vec<Cell>,
}

impl Grid {
    pub fn filled(rows: usize, cols: usize, fill: Cell) -> Grid {
        Grid {
            rows,
            cols,
            cells: vec![fill; rows * cols],
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn get(&self, row: usize, col: usize) -> Cell {
        self.cells[row * self.cols + col]
    }

    pub fn set(&mut self, row: usize, col: usize, cell: Cell) {
        self.cells[row * self.cols + col] = cell;
    }

    /// Count every occurrence of one cell code.
    pub fn count(&self, cell: Cell) -> usize {
        self.cells.iter().filter(|&&c| c == cell).count()
    }

    /// Coordinates of every cell holding the given code, row-major.
    pub fn find_all(&self, cell: Cell) -> Vec<(usize, usize)> {
        let mut out = Vec::new();
        for row in 0..self.rows {
            for col in 0..self.cols {
                if self.get(row, col) == cell {
                    out.push((row, col));
                }
            }
        }
        out
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..self.rows {
            for col in 0..self.cols {
                write!(f, "{}", self.get(row, col).to_char())?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parity_helpers() {
        assert!(is_room(1, 1));
        assert!(is_room(13, 25));
        assert!(!is_room(0, 1));
        assert!(!is_room(2, 2));

        assert!(is_door_position(1, 2));
        assert!(is_door_position(2, 1));
        assert!(!is_door_position(1, 1));
        assert!(!is_door_position(2, 2));
    }

    #[test]
    fn test_get_set_and_count() {
        let mut g = Grid::filled(3, 3, Cell::Wall);
        g.set(1, 1, Cell::Portal);
        g.set(1, 2, Cell::Empty);
        assert_eq!(g.get(1, 1), Cell::Portal);
        assert_eq!(g.count(Cell::Wall), 7);
        assert_eq!(g.find_all(Cell::Portal), vec![(1, 1)]);
    }

    #[test]
    fn test_json_round_trip() {
        let mut g = Grid::filled(2, 2, Cell::Wall);
        g.set(0, 1, Cell::RedKey);
        let json = serde_json::to_string(&g).unwrap();
        let back: Grid = serde_json::from_str(&json).unwrap();
        assert_eq!(back.rows(), 2);
        assert_eq!(back.cols(), 2);
        assert_eq!(back.get(0, 1), Cell::RedKey);
        assert_eq!(back.get(1, 0), Cell::Wall);
    }

    #[test]
    fn test_display_renders_char_codec() {
        let mut g = Grid::filled(1, 3, Cell::Wall);
        g.set(0, 1, Cell::Empty);
        assert_eq!(g.to_string(), "# #\n");
    }
}
