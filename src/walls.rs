// walls.rs - Randomized depth-first wall carving with a reserved center hole

use log::debug;
use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::HashSet;

/// Rectangle of cells the carver must never touch; the center template is
/// stamped here afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReservedRect {
    pub top: usize,
    pub left: usize,
    pub rows: usize,
    pub cols: usize,
}

impl ReservedRect {
    /// Center a reservation of the given size inside the grid. Even
    /// dimensions grow by one cell so the rectangle stays symmetric
    /// inside the odd-sized grid.
    pub fn centered(grid_rows: usize, grid_cols: usize, rows: usize, cols: usize) -> ReservedRect {
        let rows = (rows + (rows % 2 == 0) as usize).min(grid_rows);
        let cols = (cols + (cols % 2 == 0) as usize).min(grid_cols);
        ReservedRect {
            top: (grid_rows - rows) / 2,
            left: (grid_cols - cols) / 2,
            rows,
            cols,
        }
    }

    pub fn contains(&self, row: usize, col: usize) -> bool {
        row >= self.top && row < self.top + self.rows && col >= self.left && col < self.left + self.cols
    }
}

/// Boolean wall grid produced by the carver: `true` = wall, `false` = floor.
#[derive(Debug, Clone)]
pub struct WallGrid {
    rows: usize,
    cols: usize,
    walls: Vec<bool>,
}

impl WallGrid {
    fn filled(rows: usize, cols: usize) -> WallGrid {
        WallGrid {
            rows,
            cols,
            walls: vec![true; rows * cols],
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn is_wall(&self, row: usize, col: usize) -> bool {
        self.walls[row * self.cols + col]
    }

    fn clear(&mut self, row: usize, col: usize) {
        self.walls[row * self.cols + col] = false;
    }

    pub fn floor_count(&self) -> usize {
        self.walls.iter().filter(|&&w| !w).count()
    }
}

const VERTEX_STEPS: [(isize, isize); 4] = [(-2, 0), (2, 0), (0, -2), (0, 2)];

/// Carves a perfect maze: fully connected, acyclic, exactly one path
/// between any two rooms. Rooms sit at odd/odd coordinates; each spanning
/// tree edge opens the wall cell midway between its two rooms.
pub struct MazeWallsGenerator {
    width: usize,
    height: usize,
    reserved: Option<ReservedRect>,
}

impl MazeWallsGenerator {
    pub fn new(width: usize, height: usize, reserved: Option<ReservedRect>) -> MazeWallsGenerator {
        MazeWallsGenerator {
            width,
            height,
            reserved,
        }
    }

    pub fn carve<R: Rng>(&self, rng: &mut R) -> WallGrid {
        let rows = 2 * self.height + 1;
        let cols = 2 * self.width + 1;
        let mut grid = WallGrid::filled(rows, cols);

        // Chisel out the room vertices, leaving the reservation walled.
        for row in (1..rows).step_by(2) {
            for col in (1..cols).step_by(2) {
                if !self.is_reserved(row, col) {
                    grid.clear(row, col);
                }
            }
        }

        let vertices: Vec<(usize, usize)> = (1..rows)
            .step_by(2)
            .flat_map(|row| (1..cols).step_by(2).map(move |col| (row, col)))
            .filter(|&(row, col)| !grid.is_wall(row, col))
            .collect();
        if vertices.is_empty() {
            // Template occupies everything; nothing to connect.
            return grid;
        }

        // Randomized depth-first spanning tree over the room vertices.
        let mut visited: HashSet<(usize, usize)> = HashSet::with_capacity(vertices.len());
        let start = *vertices.choose(rng).expect("non-empty vertex list");
        visited.insert(start);
        let mut stack = vec![start];
        let mut passages = 0usize;

        while let Some(&(row, col)) = stack.last() {
            let neighbors: Vec<(usize, usize)> = VERTEX_STEPS
                .iter()
                .filter_map(|&(dr, dc)| {
                    let nr = row.checked_add_signed(dr)?;
                    let nc = col.checked_add_signed(dc)?;
                    if nr >= rows || nc >= cols || grid.is_wall(nr, nc) {
                        return None;
                    }
                    let mid = ((row + nr) / 2, (col + nc) / 2);
                    if self.is_reserved(mid.0, mid.1) || visited.contains(&(nr, nc)) {
                        return None;
                    }
                    Some((nr, nc))
                })
                .collect();

            match neighbors.choose(rng) {
                Some(&(nr, nc)) => {
                    grid.clear((row + nr) / 2, (col + nc) / 2);
                    passages += 1;
                    visited.insert((nr, nc));
                    stack.push((nr, nc));
                }
                None => {
                    stack.pop();
                }
            }
        }

        debug!(
            "carved {}x{} wall grid: {} vertices, {} passages",
            rows,
            cols,
            visited.len(),
            passages
        );
        grid
    }

    fn is_reserved(&self, row: usize, col: usize) -> bool {
        self.reserved.map_or(false, |r| r.contains(row, col))
    }
}
