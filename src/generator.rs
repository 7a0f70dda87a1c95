// generator.rs - Carve, stamp, then run the three placement passes in order

use crate::cell::Cell;
use crate::error::{GeneratorError, Result};
use crate::grid::{is_room, Grid};
use crate::inverse_toggle::InverseToggleGenerator;
use crate::main_path::{MainPathGenerator, DEFAULT_RETRY_LIMIT};
use crate::side_paths::SidePathsGenerator;
use crate::template::Template;
use crate::tree::Tree;
use crate::walls::{MazeWallsGenerator, ReservedRect, WallGrid};
use log::{debug, info};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// One configured generation request. `width`/`height` count rooms; the
/// produced grid is `(2*height+1) x (2*width+1)` cells with the template
/// stamped in the center and one opening connecting it to the maze.
#[derive(Debug)]
pub struct MazeGenerator {
    width: usize,
    height: usize,
    template: Template,
    retry_limit: Option<u32>,
}

impl MazeGenerator {
    pub fn new(width: usize, height: usize, template: Template) -> Result<MazeGenerator> {
        if width == 0 || height == 0 {
            return Err(GeneratorError::InvalidDimensions { width, height });
        }
        let grid_rows = 2 * height + 1;
        let grid_cols = 2 * width + 1;
        if template.rows() > grid_rows || template.cols() > grid_cols {
            return Err(GeneratorError::TemplateTooLarge {
                template_cols: template.cols(),
                template_rows: template.rows(),
                grid_cols,
                grid_rows,
            });
        }
        Ok(MazeGenerator {
            width,
            height,
            template,
            retry_limit: Some(DEFAULT_RETRY_LIMIT),
        })
    }

    /// `None` removes the ceiling on main-path restarts.
    pub fn with_retry_limit(mut self, limit: Option<u32>) -> MazeGenerator {
        self.retry_limit = limit;
        self
    }

    pub fn generate_seeded(&self, seed: u64) -> Result<Grid> {
        let mut rng = StdRng::seed_from_u64(seed);
        self.generate(&mut rng)
    }

    pub fn generate<R: Rng>(&self, rng: &mut R) -> Result<Grid> {
        let grid_rows = 2 * self.height + 1;
        let grid_cols = 2 * self.width + 1;
        // The reservation is one ring of cells wider than the template on
        // every side. The ring stays walled, so the maze touches the
        // template only through the entry corridor opened below; any other
        // adjacency would fuse tree branches and let players walk around
        // the gating doors.
        let reserved = (!self.template.is_empty()).then(|| {
            ReservedRect::centered(
                grid_rows,
                grid_cols,
                self.template.rows() + 2,
                self.template.cols() + 2,
            )
        });

        let walls = MazeWallsGenerator::new(self.width, self.height, reserved).carve(rng);
        let mut grid = Grid::filled(grid_rows, grid_cols, Cell::Wall);
        for row in 0..grid_rows {
            for col in 0..grid_cols {
                if !walls.is_wall(row, col) {
                    grid.set(row, col, Cell::Empty);
                }
            }
        }
        if let Some(rect) = reserved {
            self.stamp(&mut grid, rect);
        }

        let Some((root, corridor)) = self.find_entry(&walls, reserved) else {
            info!("no reachable maze entry, returning the stamped grid as-is");
            return Ok(grid);
        };
        for (row, col) in corridor {
            grid.set(row, col, Cell::Empty);
        }

        let tree = Tree::build(&walls, root.0, root.1);
        debug!(
            "maze tree rooted at ({},{}) spans {} nodes",
            root.0,
            root.1,
            tree.len()
        );

        MainPathGenerator::new(&tree).run(&mut grid, self.retry_limit, rng)?;
        let mut side = SidePathsGenerator::new(&tree, &grid);
        side.run(&mut grid, rng);
        InverseToggleGenerator::new(&tree).run(&mut grid, rng);
        Ok(grid)
    }

    /// Write the template into the center of its reservation, leaving the
    /// surrounding ring walled.
    fn stamp(&self, grid: &mut Grid, rect: ReservedRect) {
        let (top, left) = template_origin(rect, &self.template);
        for tr in 0..self.template.rows() {
            for tc in 0..self.template.cols() {
                grid.set(top + tr, left + tc, self.template.get(tr, tc));
            }
        }
    }

    /// The tree root plus the wall cells to open between the template and
    /// the maze. Scans the template border clockwise from the top edge and
    /// takes the first open cell with a carved room straight outside its
    /// ring; without a template the root is the room nearest the grid
    /// center. `None` means the maze is unreachable (e.g. a template
    /// covering the whole grid) and the passes are skipped.
    fn find_entry(
        &self,
        walls: &WallGrid,
        reserved: Option<ReservedRect>,
    ) -> Option<((usize, usize), Vec<(usize, usize)>)> {
        let Some(rect) = reserved else {
            let row = nearest_odd(walls.rows() / 2);
            let col = nearest_odd(walls.cols() / 2);
            return (!walls.is_wall(row, col)).then(|| ((row, col), Vec::new()));
        };

        let t = &self.template;
        let (top, left) = template_origin(rect, t);
        let bottom = top + t.rows() - 1;
        let right = left + t.cols() - 1;

        for tc in 0..t.cols() {
            let hit = probe(walls, top, left + tc, -1, 0, t.get(0, tc));
            if hit.is_some() {
                return hit;
            }
        }
        for tr in 0..t.rows() {
            let hit = probe(walls, top + tr, right, 0, 1, t.get(tr, t.cols() - 1));
            if hit.is_some() {
                return hit;
            }
        }
        for tc in 0..t.cols() {
            let hit = probe(walls, bottom, left + tc, 1, 0, t.get(t.rows() - 1, tc));
            if hit.is_some() {
                return hit;
            }
        }
        for tr in 0..t.rows() {
            let hit = probe(walls, top + tr, left, 0, -1, t.get(tr, 0));
            if hit.is_some() {
                return hit;
            }
        }
        None
    }
}

/// Top-left cell of the template inside its reservation.
fn template_origin(rect: ReservedRect, template: &Template) -> (usize, usize) {
    (
        rect.top + (rect.rows - template.rows()) / 2,
        rect.left + (rect.cols - template.cols()) / 2,
    )
}

/// From an open template border cell, walk outward until the first carved
/// room, at most three cells past the border (the reservation ring plus
/// one boundary wall, depending on parity). The wall cells passed on the
/// way become the entry corridor; any carved non-room cell disqualifies
/// the direction.
fn probe(
    walls: &WallGrid,
    row: usize,
    col: usize,
    dr: isize,
    dc: isize,
    cell: Cell,
) -> Option<((usize, usize), Vec<(usize, usize)>)> {
    if cell != Cell::Empty {
        return None;
    }
    let mut corridor = Vec::new();
    let (mut r, mut c) = (row, col);
    for _ in 0..3 {
        r = r.checked_add_signed(dr)?;
        c = c.checked_add_signed(dc)?;
        if r >= walls.rows() || c >= walls.cols() {
            return None;
        }
        if !walls.is_wall(r, c) {
            return is_room(r, c).then_some(((r, c), corridor));
        }
        corridor.push((r, c));
    }
    None
}

fn nearest_odd(x: usize) -> usize {
    if x % 2 == 1 {
        x
    } else {
        x.saturating_sub(1).max(1)
    }
}
