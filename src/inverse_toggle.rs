// inverse_toggle.rs - Doors the lever closes, placed clear of every lever route

use crate::cell::Cell;
use crate::grid::{is_door_position, Grid};
use crate::sets::{self, NodeSet, VertexSet};
use crate::tree::Tree;
use log::debug;
use rand::Rng;

/// Places one inverse toggle door per toggle door. The lever flips both
/// kinds at once, so an inverse door must never sit on a path between the
/// lever and a toggle door; pulling the lever there would seal the route
/// it was meant to open. Runs out of candidates silently and does nothing
/// when the grid carries no lever.
pub struct InverseToggleGenerator<'a> {
    tree: &'a Tree,
}

impl<'a> InverseToggleGenerator<'a> {
    pub fn new(tree: &'a Tree) -> InverseToggleGenerator<'a> {
        InverseToggleGenerator { tree }
    }

    pub fn run<R: Rng>(&self, grid: &mut Grid, rng: &mut R) {
        let mut lever = None;
        let mut toggle_doors = Vec::new();
        for id in self.tree.ids() {
            let n = self.tree.node(id);
            match grid.get(n.row, n.col) {
                Cell::Lever => lever = Some(id),
                Cell::ToggleDoor => toggle_doors.push(id),
                _ => {}
            }
        }
        let Some(lever) = lever else {
            debug!("no lever on the grid, skipping inverse toggle pass");
            return;
        };
        if toggle_doors.is_empty() {
            return;
        }

        let mut candidates = VertexSet::new();
        sets::add_recursive(&mut candidates, self.tree, self.tree.root());
        for &door in &toggle_doors {
            let route = self.tree.path_between(lever, door);
            sets::remove_all(&mut candidates, &route);
        }

        let mut placed = 0usize;
        while placed < toggle_doors.len() {
            let Some(pick) = candidates.pick_any_random(rng) else {
                break;
            };
            candidates.remove(pick);
            let n = self.tree.node(pick);
            if n.depth >= 1
                && is_door_position(n.row, n.col)
                && grid.get(n.row, n.col) == Cell::Empty
            {
                grid.set(n.row, n.col, Cell::InverseToggleDoor);
                placed += 1;
            }
        }
        debug!(
            "placed {} inverse toggle door(s) for {} toggle door(s)",
            placed,
            toggle_doors.len()
        );
    }
}
