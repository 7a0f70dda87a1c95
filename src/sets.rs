// sets.rs - Node containers behind every random placement draw

use crate::tree::{NodeId, Tree};
use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::HashMap;

/// Minimal mutable-collection surface shared by the flat and the
/// depth-bucketed set. The recursive helpers below are free functions
/// over this trait; they are identical for both shapes.
pub trait NodeSet {
    fn contains(&self, id: NodeId) -> bool;
    fn add(&mut self, id: NodeId, depth: usize);
    fn remove(&mut self, id: NodeId) -> bool;
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Flat node set with O(1) membership, removal and uniform random pick.
#[derive(Debug, Default)]
pub struct VertexSet {
    items: Vec<NodeId>,
    index: HashMap<NodeId, usize>,
}

impl VertexSet {
    pub fn new() -> VertexSet {
        VertexSet::default()
    }

    /// Uniform pick over the whole set, `None` if empty.
    pub fn pick_any_random<R: Rng>(&self, rng: &mut R) -> Option<NodeId> {
        self.items.choose(rng).copied()
    }
}

impl NodeSet for VertexSet {
    fn contains(&self, id: NodeId) -> bool {
        self.index.contains_key(&id)
    }

    fn add(&mut self, id: NodeId, _depth: usize) {
        if !self.index.contains_key(&id) {
            self.index.insert(id, self.items.len());
            self.items.push(id);
        }
    }

    fn remove(&mut self, id: NodeId) -> bool {
        match self.index.remove(&id) {
            Some(slot) => {
                self.items.swap_remove(slot);
                if let Some(&moved) = self.items.get(slot) {
                    self.index.insert(moved, slot);
                }
                true
            }
            None => false,
        }
    }

    fn len(&self) -> usize {
        self.items.len()
    }
}

/// Depth-bucketed node set: the sampling primitive for every placement
/// step that cares about distance from the maze entry.
///
/// `highest_depth` is a high-water mark over everything ever inserted and
/// never decreases on removal; the path generators size their sliding
/// windows from it.
#[derive(Debug, Default)]
pub struct HistogramSet {
    buckets: HashMap<usize, Vec<NodeId>>,
    depths: HashMap<NodeId, usize>,
    highest_depth: usize,
}

impl HistogramSet {
    pub fn new() -> HistogramSet {
        HistogramSet::default()
    }

    /// Every node of the tree, bucketed by depth.
    pub fn from_tree(tree: &Tree) -> HistogramSet {
        let mut set = HistogramSet::new();
        for id in tree.ids() {
            set.add(id, tree.node(id).depth);
        }
        set
    }

    pub fn highest_depth(&self) -> usize {
        self.highest_depth
    }

    /// Gather every node with depth in `[min_depth, max_depth]`, then
    /// probe from a uniformly random index and scan forward circularly
    /// until one with depth >= `min_absolute_depth` turns up. Every
    /// candidate is tried at most once, so the scan is bounded; `None`
    /// when nothing qualifies.
    pub fn pick_random<R: Rng>(
        &self,
        min_depth: usize,
        max_depth: usize,
        min_absolute_depth: usize,
        rng: &mut R,
    ) -> Option<NodeId> {
        let mut candidates: Vec<(NodeId, usize)> = Vec::new();
        for depth in min_depth..=max_depth {
            if let Some(bucket) = self.buckets.get(&depth) {
                candidates.extend(bucket.iter().map(|&id| (id, depth)));
            }
        }
        if candidates.is_empty() {
            return None;
        }

        let start = rng.gen_range(0..candidates.len());
        for offset in 0..candidates.len() {
            let (id, depth) = candidates[(start + offset) % candidates.len()];
            if depth >= min_absolute_depth {
                return Some(id);
            }
        }
        None
    }
}

impl NodeSet for HistogramSet {
    fn contains(&self, id: NodeId) -> bool {
        self.depths.contains_key(&id)
    }

    fn add(&mut self, id: NodeId, depth: usize) {
        if self.depths.contains_key(&id) {
            return;
        }
        self.depths.insert(id, depth);
        self.buckets.entry(depth).or_default().push(id);
        self.highest_depth = self.highest_depth.max(depth);
    }

    fn remove(&mut self, id: NodeId) -> bool {
        match self.depths.remove(&id) {
            Some(depth) => {
                let bucket = self.buckets.get_mut(&depth).expect("bucket for known depth");
                if let Some(slot) = bucket.iter().position(|&n| n == id) {
                    bucket.swap_remove(slot);
                }
                true
            }
            None => false,
        }
    }

    fn len(&self) -> usize {
        self.depths.len()
    }
}

/// Add `id` and its whole subtree.
pub fn add_recursive(set: &mut impl NodeSet, tree: &Tree, id: NodeId) {
    for n in tree.subtree(id) {
        set.add(n, tree.node(n).depth);
    }
}

/// Remove `id` and its whole subtree.
pub fn remove_recursive(set: &mut impl NodeSet, tree: &Tree, id: NodeId) {
    for n in tree.subtree(id) {
        set.remove(n);
    }
}

/// Add `id` and every ancestor up to the root.
pub fn add_parents(set: &mut impl NodeSet, tree: &Tree, id: NodeId) {
    for n in tree.path_to_root(id) {
        set.add(n, tree.node(n).depth);
    }
}

/// Remove `id` and every ancestor up to the root.
pub fn remove_parents(set: &mut impl NodeSet, tree: &Tree, id: NodeId) {
    for n in tree.path_to_root(id) {
        set.remove(n);
    }
}

/// Bulk removal.
pub fn remove_all(set: &mut impl NodeSet, ids: &[NodeId]) {
    for &n in ids {
        set.remove(n);
    }
}
