//! Weighted union-find over `0..n` with an additive lazy value per element.
//!
//! `value[x]` is the offset from `x` to its current parent pointer; a root
//! stores the offset shared by its whole set. The true offset of an element is
//! therefore the sum of the values along its path to the root, which
//! [`CompressedTree::find_value`] reads after compressing the path.

use crate::utils::NumIndexVec;
use crate::{Vertex, Weight};

#[derive(Clone, Debug)]
pub struct CompressedTree<W> {
    /// parent index, or the negated set size for roots
    parent: NumIndexVec<i64>,
    value: NumIndexVec<W>,
    path: Vec<Vertex>,
}

impl<W> CompressedTree<W>
where
    W: Weight,
{
    pub fn new(size: Vertex) -> Self {
        Self {
            parent: num_index_vec![-1; size],
            value: num_index_vec![W::zero(); size],
            path: Vec::new(),
        }
    }

    /// number of elements
    #[inline(always)]
    pub fn len(&self) -> usize {
        self.parent.len()
    }

    #[inline(always)]
    pub fn is_root(&self, x: Vertex) -> bool {
        self.parent[x] < 0
    }

    /// size of the set containing `x`
    pub fn size(&mut self, x: Vertex) -> usize {
        let root = self.find(x);
        -self.parent[root] as usize
    }

    pub fn find(&mut self, x: Vertex) -> Vertex {
        let mut root = x;
        while self.parent[root] >= 0 {
            self.path.push(root);
            root = self.parent[root] as Vertex;
        }
        // the last element on the path is a child of the root and already final
        self.path.pop();
        while let Some(node) = self.path.pop() {
            let via = self.parent[node] as Vertex;
            self.compress(node, via, root);
        }
        root
    }

    /// Points `node` at `root`, folding the offset of `via` (its old parent,
    /// already compressed) into its own before the pointer moves.
    #[inline(always)]
    fn compress(&mut self, node: Vertex, via: Vertex, root: Vertex) {
        debug_assert_eq!(self.parent[via], root as i64);
        self.value[node] = self.value[node] + self.value[via];
        self.parent[node] = root as i64;
    }

    /// True offset of `x`.
    pub fn find_value(&mut self, x: Vertex) -> W {
        let root = self.find(x);
        if root == x {
            self.value[x]
        } else {
            self.value[x] + self.value[root]
        }
    }

    /// Adds `delta` to every element of the set containing `x`.
    pub fn add_value(&mut self, x: Vertex, delta: W) {
        let root = self.find(x);
        self.value[root] = self.value[root] + delta;
    }

    /// Union by size, returns the representative of the joined set.
    pub fn join(&mut self, a: Vertex, b: Vertex) -> Vertex {
        let mut a = self.find(a);
        let mut b = self.find(b);
        if a == b {
            return a;
        }
        // sizes are stored negated
        if self.parent[a] > self.parent[b] {
            std::mem::swap(&mut a, &mut b);
        }
        self.parent[a] += self.parent[b];
        self.parent[b] = a as i64;
        self.value[b] = self.value[b] - self.value[a];
        a
    }
}
