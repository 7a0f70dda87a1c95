// tree.rs - Rooted tree over every traversable cell of the carved maze

use crate::walls::WallGrid;

pub type NodeId = usize;

/// One traversable cell. Parent/child links are arena indices, so the
/// back-reference costs nothing to own.
#[derive(Debug, Clone)]
pub struct TreeNode {
    pub row: usize,
    pub col: usize,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
    pub depth: usize,
}

/// Arena of tree nodes anchored at the maze entry. Built once per
/// generation pass over the boolean wall grid and shared immutably by the
/// three path generators; the node id space doubles as the index into
/// every `NodeSet`.
///
/// The walk takes single-cell steps in the four axis directions, skipping
/// walls and the immediate parent cell. The input grid must be connected
/// and acyclic (the carver guarantees both); a cyclic grid is not
/// defended against and produces broken parent links.
#[derive(Debug)]
pub struct Tree {
    nodes: Vec<TreeNode>,
}

const STEPS: [(isize, isize); 4] = [(-1, 0), (1, 0), (0, -1), (0, 1)];

impl Tree {
    pub fn build(walls: &WallGrid, root_row: usize, root_col: usize) -> Tree {
        let mut nodes: Vec<TreeNode> = Vec::new();
        let mut work = vec![(root_row, root_col, None::<NodeId>)];

        while let Some((row, col, parent)) = work.pop() {
            let depth = parent.map_or(0, |p| nodes[p].depth + 1);
            let id = nodes.len();
            nodes.push(TreeNode {
                row,
                col,
                parent,
                children: Vec::new(),
                depth,
            });
            if let Some(p) = parent {
                nodes[p].children.push(id);
            }

            for (dr, dc) in STEPS {
                let (Some(nr), Some(nc)) = (row.checked_add_signed(dr), col.checked_add_signed(dc))
                else {
                    continue;
                };
                if nr >= walls.rows() || nc >= walls.cols() || walls.is_wall(nr, nc) {
                    continue;
                }
                // don't walk straight back into the parent cell
                if parent.map_or(false, |p| nodes[p].row == nr && nodes[p].col == nc) {
                    continue;
                }
                work.push((nr, nc, Some(id)));
            }
        }

        Tree { nodes }
    }

    pub fn root(&self) -> NodeId {
        0
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node(&self, id: NodeId) -> &TreeNode {
        &self.nodes[id]
    }

    pub fn ids(&self) -> impl Iterator<Item = NodeId> {
        0..self.nodes.len()
    }

    /// Walk `hops` parent links up from `id`; `None` when the chain ends
    /// at the root first.
    pub fn ancestor(&self, id: NodeId, hops: usize) -> Option<NodeId> {
        let mut current = id;
        for _ in 0..hops {
            current = self.nodes[current].parent?;
        }
        Some(current)
    }

    /// `id` plus every node below it, preorder.
    pub fn subtree(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![id];
        while let Some(n) = stack.pop() {
            out.push(n);
            stack.extend_from_slice(&self.nodes[n].children);
        }
        out
    }

    /// `id` first, root last.
    pub fn path_to_root(&self, id: NodeId) -> Vec<NodeId> {
        let mut path = vec![id];
        let mut current = id;
        while let Some(p) = self.nodes[current].parent {
            path.push(p);
            current = p;
        }
        path
    }

    /// The unique node path from `a` to `b`, endpoints included: both
    /// root paths with the common suffix stripped, joined at the shared
    /// pivot. Uniqueness is the acyclicity guarantee from the carver.
    pub fn path_between(&self, a: NodeId, b: NodeId) -> Vec<NodeId> {
        let pa = self.path_to_root(a);
        let pb = self.path_to_root(b);

        let mut i = pa.len();
        let mut j = pb.len();
        while i > 0 && j > 0 && pa[i - 1] == pb[j - 1] {
            i -= 1;
            j -= 1;
        }

        let mut path = pa[..i].to_vec();
        path.push(pa[i]); // shared pivot (the deepest common ancestor)
        path.extend(pb[..j].iter().rev());
        path
    }
}
