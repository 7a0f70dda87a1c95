// side_paths.rs - Optional branch doors with bonus energy behind them

use crate::cell::{Cell, ALL_MAIN_DOORS};
use crate::grid::{is_door_position, is_room, Grid};
use crate::sets::{self, HistogramSet, NodeSet, VertexSet};
use crate::tree::{NodeId, Tree};
use log::debug;
use rand::seq::SliceRandom;
use rand::Rng;

use crate::main_path::WINDOW_SIZE;

const PLACEMENT_RETRIES: usize = 10;

/// Decorates subtrees the main path never claimed: each side door reuses
/// a main door type, hides one energy orb behind itself, and parks its
/// single required item on a main-path node. Side content is best-effort;
/// a placement that cannot be completed is rolled back and skipped, never
/// retried pass-wide.
pub struct SidePathsGenerator<'a> {
    tree: &'a Tree,
    main_nodes: VertexSet,
    side_nodes: HistogramSet,
}

impl<'a> SidePathsGenerator<'a> {
    /// Partition the tree: the ancestor chains of every important item
    /// form the main path, everything else is side territory.
    pub fn new(tree: &'a Tree, grid: &Grid) -> SidePathsGenerator<'a> {
        let mut main_nodes = VertexSet::new();
        for id in tree.ids() {
            let n = tree.node(id);
            if grid.get(n.row, n.col).is_important_item() {
                sets::add_parents(&mut main_nodes, tree, id);
            }
        }

        let mut side_nodes = HistogramSet::new();
        sets::add_recursive(&mut side_nodes, tree, tree.root());
        for id in tree.ids() {
            if main_nodes.contains(id) {
                side_nodes.remove(id);
            }
        }

        SidePathsGenerator {
            tree,
            main_nodes,
            side_nodes,
        }
    }

    pub fn run<R: Rng>(&mut self, grid: &mut Grid, rng: &mut R) {
        let mut doors = 0usize;
        let mut min_depth = self.side_nodes.highest_depth().saturating_sub(WINDOW_SIZE);
        while min_depth > 0 {
            if self.try_place(grid, min_depth, rng) {
                doors += 1;
            }
            min_depth -= 1;
        }
        debug!("side pass placed {} door(s)", doors);
    }

    fn try_place<R: Rng>(&mut self, grid: &mut Grid, min_depth: usize, rng: &mut R) -> bool {
        let Some(door) = self.pick_door_location(min_depth, rng) else {
            return false;
        };
        // Claim the whole branch; even a rolled-back door never returns it.
        // The door's ancestors leave the pool too, so a later door can
        // never enclose this subtree and double up its orb.
        sets::remove_recursive(&mut self.side_nodes, self.tree, door);
        sets::remove_parents(&mut self.side_nodes, self.tree, door);

        let door_type = *ALL_MAIN_DOORS.choose(rng).expect("non-empty door pool");
        let door_node = self.tree.node(door);
        grid.set(door_node.row, door_node.col, door_type);

        // One energy orb somewhere behind the door. Branches are disjoint
        // between side doors, so orbs never collide.
        let orb_rooms: Vec<NodeId> = self
            .tree
            .subtree(door)
            .into_iter()
            .filter(|&id| {
                let n = self.tree.node(id);
                is_room(n.row, n.col) && grid.get(n.row, n.col) == Cell::Empty
            })
            .collect();
        let Some(&orb) = orb_rooms.choose(rng) else {
            grid.set(door_node.row, door_node.col, Cell::Empty);
            return false;
        };
        let orb_node = self.tree.node(orb);
        grid.set(orb_node.row, orb_node.col, Cell::Energy);

        let req = door_type.door_requirement().expect("main door type");
        if req.reuse_item.is_some() {
            // The shared item already exists from the main pass.
            return true;
        }
        let item = req.one_time_item.expect("door without any requirement");

        loop {
            let Some(spot) = self.main_nodes.pick_any_random(rng) else {
                // No main-path node left for the item: undo door and orb.
                grid.set(door_node.row, door_node.col, Cell::Empty);
                grid.set(orb_node.row, orb_node.col, Cell::Empty);
                return false;
            };
            self.main_nodes.remove(spot);
            let n = self.tree.node(spot);
            if grid.get(n.row, n.col) == Cell::Empty {
                grid.set(n.row, n.col, item);
                return true;
            }
            // occupied main node: consumed without effect, pick again
        }
    }

    fn pick_door_location<R: Rng>(&self, min_depth: usize, rng: &mut R) -> Option<NodeId> {
        for _ in 0..PLACEMENT_RETRIES {
            let picked = self
                .side_nodes
                .pick_random(min_depth, min_depth + WINDOW_SIZE, 2, rng)?;
            let n = self.tree.node(picked);
            let door = if is_door_position(n.row, n.col) {
                picked
            } else {
                // a room sample is only usable through its parent passage
                match n.parent {
                    Some(p) if self.side_nodes.contains(p) => p,
                    _ => continue,
                }
            };
            if self.tree.node(door).depth >= 1 {
                return Some(door);
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::main_path::tests::run_main_path;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashSet;

    fn run_side_pass(seed: u64) -> (Grid, Grid, Tree) {
        let (mut grid, tree) = run_main_path(seed);
        let before = grid.clone();
        let mut rng = StdRng::seed_from_u64(seed + 7000);
        let mut side = SidePathsGenerator::new(&tree, &grid);
        side.run(&mut grid, &mut rng);
        (before, grid, tree)
    }

    fn door_nodes(grid: &Grid, tree: &Tree) -> HashSet<NodeId> {
        tree.ids()
            .filter(|&id| {
                let n = tree.node(id);
                grid.get(n.row, n.col).door_requirement().is_some()
            })
            .collect()
    }

    fn main_chain_nodes(grid: &Grid, tree: &Tree) -> HashSet<NodeId> {
        let mut chains = HashSet::new();
        for id in tree.ids() {
            let n = tree.node(id);
            if grid.get(n.row, n.col).is_important_item() {
                chains.extend(tree.path_to_root(id));
            }
        }
        chains
    }

    #[test]
    fn test_side_doors_pay_for_themselves() {
        let (before, after, tree) = run_side_pass(201);
        let main_doors = door_nodes(&before, &tree);
        let side_doors: Vec<NodeId> = door_nodes(&after, &tree)
            .into_iter()
            .filter(|id| !main_doors.contains(id))
            .collect();
        assert!(!side_doors.is_empty(), "no side door placed at all");

        // every side door funds exactly one bonus orb
        assert_eq!(
            after.count(Cell::Energy),
            before.count(Cell::Energy) + side_doors.len()
        );

        // one-time items keep pace with their door counts
        for (door, item) in [
            (Cell::RedDoor, Cell::RedKey),
            (Cell::GreenDoor, Cell::GreenKey),
            (Cell::BlueDoor, Cell::BlueKey),
            (Cell::YellowDoor, Cell::YellowKey),
            (Cell::BigDoor, Cell::Gun),
        ] {
            assert_eq!(after.count(item), after.count(door), "{item:?} vs {door:?}");
        }

        // shared items stay singletons no matter how many doors reuse them
        assert_eq!(after.count(Cell::Lever), 1);
        assert_eq!(after.count(Cell::ElectricBoxA), 1);
        assert_eq!(after.count(Cell::ElectricBoxB), 1);
        assert_eq!(after.count(Cell::ElectricBoxC), 1);
    }

    #[test]
    fn test_side_doors_sit_off_the_main_path_with_an_orb_behind() {
        let (before, after, tree) = run_side_pass(202);
        let chains = main_chain_nodes(&before, &tree);
        let main_doors = door_nodes(&before, &tree);

        for id in door_nodes(&after, &tree) {
            if main_doors.contains(&id) {
                continue;
            }
            let n = tree.node(id);
            assert!(is_door_position(n.row, n.col), "side door off a passage");
            assert!(n.depth >= 1);
            assert!(!chains.contains(&id), "side door on a main ancestor chain");
            let orbs = tree
                .subtree(id)
                .into_iter()
                .filter(|&s| {
                    let sn = tree.node(s);
                    after.get(sn.row, sn.col) == Cell::Energy
                })
                .count();
            assert_eq!(orbs, 1, "side door gates {orbs} orbs");
        }
    }

    #[test]
    fn test_side_items_land_on_the_main_path() {
        let (before, after, tree) = run_side_pass(203);
        let chains = main_chain_nodes(&before, &tree);

        for id in tree.ids() {
            let n = tree.node(id);
            let cell = after.get(n.row, n.col);
            let fresh = before.get(n.row, n.col) == Cell::Empty;
            let one_time = matches!(
                cell,
                Cell::RedKey | Cell::GreenKey | Cell::BlueKey | Cell::YellowKey | Cell::Gun
            );
            if fresh && one_time {
                assert!(chains.contains(&id), "{cell:?} placed off the main path");
            }
        }
    }
}
