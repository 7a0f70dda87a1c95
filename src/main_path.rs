// main_path.rs - Chains every main door type along the tree, gated by its items

use crate::cell::{Cell, ALL_MAIN_DOORS};
use crate::error::{GeneratorError, Result};
use crate::grid::{is_door_position, is_room, Grid};
use crate::sets::{self, HistogramSet, NodeSet};
use crate::tree::{NodeId, Tree};
use log::{debug, info};
use rand::seq::SliceRandom;
use rand::Rng;

/// Depth span of every windowed pick.
pub const WINDOW_SIZE: usize = 8;
/// Parent-hop range when chaining the next door off an item location.
pub const MIN_RANDOM_PARENT: usize = 1;
pub const MAX_RANDOM_PARENT: usize = 2;
/// A door must leave this much ancestry between itself and the entry.
const MIN_DOOR_ANCESTORS: usize = 2 + MAX_RANDOM_PARENT;
/// Re-rolls for a single placement before the attempt counts as stalled.
const PLACEMENT_RETRIES: usize = 10;

/// Default ceiling for the outer restart loop.
pub const DEFAULT_RETRY_LIMIT: u32 = 10_000;

/// Places the main progression: one door of every `ALL_MAIN_DOORS` type,
/// each gated behind items that sit strictly closer to the entry than the
/// door itself. A single attempt is greedy and gives up on the first
/// placement it cannot satisfy; the outer loop then clears everything the
/// attempt wrote and restarts from scratch. Partial progress is never
/// carried across attempts.
pub struct MainPathGenerator<'a> {
    tree: &'a Tree,
    nodes: HistogramSet,
    remaining_doors: Vec<Cell>,
    reuse_placed: Vec<Cell>,
    placed: Vec<NodeId>,
    min_depth: usize,
    first_door: Option<NodeId>,
}

impl<'a> MainPathGenerator<'a> {
    pub fn new(tree: &'a Tree) -> MainPathGenerator<'a> {
        MainPathGenerator {
            tree,
            nodes: HistogramSet::new(),
            remaining_doors: Vec::new(),
            reuse_placed: Vec::new(),
            placed: Vec::new(),
            min_depth: 0,
            first_door: None,
        }
    }

    /// Retry-until-success master loop. `retry_limit` of `None` keeps the
    /// faithful unbounded behavior; `Some(n)` turns exhaustion into
    /// `GeneratorError::RetriesExhausted`.
    pub fn run<R: Rng>(
        &mut self,
        grid: &mut Grid,
        retry_limit: Option<u32>,
        rng: &mut R,
    ) -> Result<()> {
        let mut attempts = 0u32;
        loop {
            if let Some(limit) = retry_limit {
                if attempts >= limit {
                    return Err(GeneratorError::RetriesExhausted(limit));
                }
            }
            attempts += 1;
            self.reset(grid);
            if self.run_attempt(grid, rng) {
                info!("main path placed after {} attempt(s)", attempts);
                self.place_map_reward(grid, rng);
                return Ok(());
            }
            debug!(
                "main path attempt {} stalled with {} door(s) left, restarting",
                attempts,
                self.remaining_doors.len()
            );
        }
    }

    /// Wind the whole state machine back: cells to `Empty`, the histogram
    /// rebuilt over the full tree, the door pool and window restored.
    fn reset(&mut self, grid: &mut Grid) {
        for &id in &self.placed {
            let n = self.tree.node(id);
            grid.set(n.row, n.col, Cell::Empty);
        }
        self.placed.clear();
        self.nodes = HistogramSet::from_tree(self.tree);
        self.remaining_doors = ALL_MAIN_DOORS.to_vec();
        self.reuse_placed.clear();
        self.min_depth = self.nodes.highest_depth().saturating_sub(WINDOW_SIZE);
        self.first_door = None;
    }

    /// One greedy pass. Returns false on any stall; the caller restarts.
    fn run_attempt<R: Rng>(&mut self, grid: &mut Grid, rng: &mut R) -> bool {
        let Some(mut door) = self.pick_door_location(rng) else {
            return false;
        };

        loop {
            let slot = rng.gen_range(0..self.remaining_doors.len());
            let door_type = self.remaining_doors.swap_remove(slot);
            let door_depth = self.tree.node(door).depth;
            self.write(grid, door, door_type);
            self.first_door.get_or_insert(door);

            // Everything behind the door is sealed off for this pass.
            sets::remove_recursive(&mut self.nodes, self.tree, door);
            self.shift_min_depth();

            let req = door_type.door_requirement().expect("main door type");
            let mut items = Vec::new();
            items.extend(req.one_time_item);
            if let Some(item) = req.reuse_item {
                if !self.reuse_placed.contains(&item) {
                    self.reuse_placed.push(item);
                    items.push(item);
                }
            }

            let mut anchor = None;
            for item in items {
                let Some(spot) = self.pick_item_location(door_depth, rng) else {
                    // Roll the door back and hand the stall to the outer loop.
                    let n = self.tree.node(door);
                    grid.set(n.row, n.col, Cell::Empty);
                    self.remaining_doors.push(door_type);
                    return false;
                };
                self.write(grid, spot, item);
                self.nodes.remove(spot);
                anchor.get_or_insert(spot);
            }

            if self.remaining_doors.is_empty() {
                return true;
            }
            let anchor = anchor.expect("every main door demands at least one item");
            match self.pick_next_door(anchor, rng) {
                Some(next) => door = next,
                None => return false,
            }
        }
    }

    fn write(&mut self, grid: &mut Grid, id: NodeId, cell: Cell) {
        let n = self.tree.node(id);
        grid.set(n.row, n.col, cell);
        self.placed.push(id);
    }

    fn shift_min_depth(&mut self) {
        self.min_depth = self.min_depth.saturating_sub(1);
    }

    /// First door of the chain: sampled near the histogram's high-water
    /// mark so the chain starts deep, with enough ancestry below the
    /// entry for the later parent hops.
    fn pick_door_location<R: Rng>(&self, rng: &mut R) -> Option<NodeId> {
        for _ in 0..PLACEMENT_RETRIES {
            let picked = self.nodes.pick_random(
                self.min_depth,
                self.min_depth + WINDOW_SIZE,
                MIN_DOOR_ANCESTORS + 1,
                rng,
            )?;
            if let Some(door) = self.snap_to_passage(picked) {
                if self.nodes.contains(door) && self.tree.node(door).depth >= MIN_DOOR_ANCESTORS {
                    return Some(door);
                }
            }
        }
        None
    }

    /// Items live in a window hanging directly below their door's depth,
    /// which keeps them strictly shallower than the door while the door's
    /// own ancestor chain guarantees candidates at every depth in range.
    fn pick_item_location<R: Rng>(&self, door_depth: usize, rng: &mut R) -> Option<NodeId> {
        let max = door_depth.checked_sub(1)?;
        let min = max.saturating_sub(WINDOW_SIZE).min(self.min_depth);
        self.nodes.pick_random(min, max, 0, rng)
    }

    /// Next door in the chain: a short parent hop up from the item it
    /// protects, snapped onto a passage cell.
    fn pick_next_door<R: Rng>(&self, anchor: NodeId, rng: &mut R) -> Option<NodeId> {
        for _ in 0..PLACEMENT_RETRIES {
            let hops = rng.gen_range(MIN_RANDOM_PARENT..=MAX_RANDOM_PARENT);
            let Some(up) = self.tree.ancestor(anchor, hops) else {
                continue;
            };
            let Some(door) = self.snap_to_passage(up) else {
                continue;
            };
            if self.nodes.contains(door) && self.tree.node(door).depth >= 1 {
                return Some(door);
            }
        }
        None
    }

    /// Doors occupy passage cells; a room sample snaps to its parent,
    /// which is always a passage.
    fn snap_to_passage(&self, id: NodeId) -> Option<NodeId> {
        let n = self.tree.node(id);
        if is_door_position(n.row, n.col) {
            Some(id)
        } else {
            n.parent
        }
    }

    /// The first-placed door is the deepest and the last one the player
    /// opens; drop the map reward somewhere behind it.
    fn place_map_reward<R: Rng>(&mut self, grid: &mut Grid, rng: &mut R) {
        let Some(first) = self.first_door else { return };
        let rooms: Vec<NodeId> = self
            .tree
            .subtree(first)
            .into_iter()
            .filter(|&id| {
                let n = self.tree.node(id);
                is_room(n.row, n.col) && grid.get(n.row, n.col) == Cell::Empty
            })
            .collect();
        if let Some(&spot) = rooms.choose(rng) {
            self.write(grid, spot, Cell::Map);
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::walls::MazeWallsGenerator;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::{HashMap, HashSet};

    pub(crate) fn carved_pipeline(seed: u64) -> (Grid, Tree, StdRng) {
        let mut rng = StdRng::seed_from_u64(seed);
        let walls = MazeWallsGenerator::new(13, 13, None).carve(&mut rng);
        let mut grid = Grid::filled(walls.rows(), walls.cols(), Cell::Wall);
        for row in 0..walls.rows() {
            for col in 0..walls.cols() {
                if !walls.is_wall(row, col) {
                    grid.set(row, col, Cell::Empty);
                }
            }
        }
        let tree = Tree::build(&walls, 1, 1);
        (grid, tree, rng)
    }

    pub(crate) fn run_main_path(seed: u64) -> (Grid, Tree) {
        let (mut grid, tree, mut rng) = carved_pipeline(seed);
        MainPathGenerator::new(&tree)
            .run(&mut grid, Some(DEFAULT_RETRY_LIMIT), &mut rng)
            .expect("main path generation");
        (grid, tree)
    }

    fn cell_at(grid: &Grid, tree: &Tree, id: NodeId) -> Cell {
        let n = tree.node(id);
        grid.get(n.row, n.col)
    }

    #[test]
    fn test_every_main_door_appears_exactly_once() {
        let (grid, _) = run_main_path(101);
        for door in ALL_MAIN_DOORS {
            assert_eq!(grid.count(door), 1, "{door:?} count");
        }
    }

    #[test]
    fn test_reuse_items_are_singletons() {
        let (grid, _) = run_main_path(102);
        assert_eq!(grid.count(Cell::Lever), 1);
        assert_eq!(grid.count(Cell::ElectricBoxA), 1);
        assert_eq!(grid.count(Cell::ElectricBoxB), 1);
        assert_eq!(grid.count(Cell::ElectricBoxC), 1);
    }

    #[test]
    fn test_items_sit_strictly_shallower_than_their_door() {
        let (grid, tree) = run_main_path(103);
        let depth_of = |cell: Cell| -> usize {
            let id = tree
                .ids()
                .find(|&id| cell_at(&grid, &tree, id) == cell)
                .unwrap_or_else(|| panic!("{cell:?} missing"));
            tree.node(id).depth
        };

        for (door, key) in [
            (Cell::RedDoor, Cell::RedKey),
            (Cell::GreenDoor, Cell::GreenKey),
            (Cell::BlueDoor, Cell::BlueKey),
            (Cell::YellowDoor, Cell::YellowKey),
        ] {
            assert!(depth_of(key) < depth_of(door), "{key:?} not before {door:?}");
        }
        assert!(depth_of(Cell::Lever) < depth_of(Cell::ToggleDoor));
        assert!(depth_of(Cell::Gun) < depth_of(Cell::BigDoor));
        for (door, item) in [
            (Cell::ElectricDoorA, Cell::ElectricBoxA),
            (Cell::ElectricDoorB, Cell::ElectricBoxB),
            (Cell::ElectricDoorC, Cell::ElectricBoxC),
        ] {
            assert!(depth_of(item) < depth_of(door));
        }
        // Each electric door also burns an energy charge placed before it.
        let energies: Vec<usize> = tree
            .ids()
            .filter(|&id| cell_at(&grid, &tree, id) == Cell::Energy)
            .map(|id| tree.node(id).depth)
            .collect();
        assert_eq!(energies.len(), 3);
        for door in [Cell::ElectricDoorA, Cell::ElectricDoorB, Cell::ElectricDoorC] {
            let door_depth = depth_of(door);
            assert!(energies.iter().any(|&d| d < door_depth));
        }
    }

    #[test]
    fn test_doors_occupy_passage_cells() {
        let (grid, tree) = run_main_path(104);
        for id in tree.ids() {
            if cell_at(&grid, &tree, id).door_requirement().is_some() {
                let n = tree.node(id);
                assert!(is_door_position(n.row, n.col), "door on non-passage cell");
                assert!(n.depth >= 1);
            }
        }
    }

    #[test]
    fn test_progression_is_winnable_from_the_entry() {
        let (grid, tree) = run_main_path(105);

        let mut opened: HashSet<NodeId> = HashSet::new();
        let mut collected: HashSet<NodeId> = HashSet::new();
        let mut keys: HashMap<Cell, usize> = HashMap::new();
        let mut energy = 0usize;
        let door_nodes: Vec<NodeId> = tree
            .ids()
            .filter(|&id| cell_at(&grid, &tree, id).door_requirement().is_some())
            .collect();

        loop {
            // region reachable without crossing a closed door
            let mut reachable = HashSet::new();
            let mut stack = vec![tree.root()];
            while let Some(id) = stack.pop() {
                if !reachable.insert(id) {
                    continue;
                }
                let closed =
                    cell_at(&grid, &tree, id).door_requirement().is_some() && !opened.contains(&id);
                if closed {
                    continue;
                }
                stack.extend_from_slice(&tree.node(id).children);
            }
            for &id in &reachable {
                let cell = cell_at(&grid, &tree, id);
                if cell.is_important_item() && collected.insert(id) {
                    match cell {
                        Cell::Energy => energy += 1,
                        other => *keys.entry(other).or_default() += 1,
                    }
                }
            }

            let mut progressed = false;
            for &door in &door_nodes {
                if opened.contains(&door) || !reachable.contains(&tree.node(door).parent.unwrap())
                {
                    continue;
                }
                let cell = cell_at(&grid, &tree, door);
                let req = cell.door_requirement().unwrap();
                let has_reuse = req
                    .reuse_item
                    .map_or(true, |item| keys.get(&item).copied().unwrap_or(0) > 0);
                let payable = match req.one_time_item {
                    Some(Cell::Energy) => energy > 0,
                    Some(item) => keys.get(&item).copied().unwrap_or(0) > 0,
                    None => true,
                };
                if has_reuse && payable {
                    match req.one_time_item {
                        Some(Cell::Energy) => energy -= 1,
                        Some(item) => *keys.get_mut(&item).unwrap() -= 1,
                        None => {}
                    }
                    opened.insert(door);
                    progressed = true;
                }
            }
            if !progressed {
                break;
            }
        }

        assert_eq!(opened.len(), ALL_MAIN_DOORS.len(), "progression deadlocked");
    }

    #[test]
    fn test_map_reward_is_placed_behind_the_deepest_door() {
        let (grid, tree) = run_main_path(106);
        assert_eq!(grid.count(Cell::Map), 1);

        let map_id = tree
            .ids()
            .find(|&id| cell_at(&grid, &tree, id) == Cell::Map)
            .unwrap();
        let deepest_door = tree
            .ids()
            .filter(|&id| cell_at(&grid, &tree, id).door_requirement().is_some())
            .max_by_key(|&id| tree.node(id).depth)
            .unwrap();
        assert!(tree.subtree(deepest_door).contains(&map_id));
    }

    #[test]
    fn test_retry_ceiling_reports_exhaustion() {
        // A 2x2 maze has nowhere near the ancestry nine doors need, so
        // every attempt stalls and the ceiling trips.
        let mut rng = StdRng::seed_from_u64(9);
        let walls = MazeWallsGenerator::new(2, 2, None).carve(&mut rng);
        let mut grid = Grid::filled(walls.rows(), walls.cols(), Cell::Wall);
        for row in 0..walls.rows() {
            for col in 0..walls.cols() {
                if !walls.is_wall(row, col) {
                    grid.set(row, col, Cell::Empty);
                }
            }
        }
        let tree = Tree::build(&walls, 1, 1);
        let err = MainPathGenerator::new(&tree)
            .run(&mut grid, Some(25), &mut rng)
            .unwrap_err();
        assert!(matches!(err, GeneratorError::RetriesExhausted(25)));
    }
}
