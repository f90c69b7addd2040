//! Minimum-cost spanning arborescence after Gabow, Galil, Spencer and Tarjan.
//!
//! Growth paths are built backwards: the tip component picks its cheapest
//! incoming edge and the component the edge leaves from becomes the new tip.
//! A tip that is already on the path closes a cycle, which is contracted into
//! one component; reaching the root's component retires the whole path.
//! The chosen edges form an implicit contraction forest from which the
//! arborescence is read off in [`Gabow::reconstruct`].
//!
//! All vertices must be reachable from the root, otherwise a component runs
//! out of candidates and the run panics.

use fixedbitset::FixedBitSet;
use log::{debug, trace};

use crate::active_forest::ActiveForest;
use crate::compressed_tree::CompressedTree;
use crate::utils::NumIndexVec;
use crate::{Edge, EdgeId, Vertex, Weight};


pub struct Gabow<W> {
    num_vertices: Vertex,
    root: Vertex,
    edges: Vec<Edge<W>>,
    /// incoming edge ids grouped by destination, ascending ids per vertex
    in_edges: Vec<EdgeId>,
    in_row_ptr: NumIndexVec<usize>,

    co: CompressedTree<W>,
    forest: ActiveForest<W>,
    /// edges pushed out of the active forest, keyed by destination component
    passive: NumIndexVec<Vec<EdgeId>>,

    visited: FixedBitSet,
    /// bit per component representative currently on the growth path
    on_path: FixedBitSet,
    growth_path: Vec<Vertex>,
    /// index into `chosen` of the incoming edge of each growth path component
    path_edges: Vec<usize>,

    chosen: Vec<EdgeId>,
    /// reconstruction forest over `chosen`, parents always have larger indices
    forest_parent: Vec<Option<usize>>,
    /// first chosen edge entering each vertex
    leaf: NumIndexVec<Option<usize>>,
    /// chosen edges of the last contracted cycle, waiting for their parent
    pending_children: Vec<usize>,
}

impl<W> Gabow<W>
where
    W: Weight,
{
    /// Takes a snapshot of `edges`; every id must equal the position in the slice.
    pub fn new(num_vertices: Vertex, root: Vertex, edges: Vec<Edge<W>>) -> Self {
        assert!(root < num_vertices, "root {} out of range", root);
        debug_assert!(edges.iter().enumerate().all(|(i, e)| e.id == i));

        // counting sort by destination keeps ids ascending inside each row
        let mut in_row_ptr = num_index_vec![0usize; num_vertices + 1];
        for edge in &edges {
            in_row_ptr[edge.to + 1] += 1;
        }
        for v in 0..num_vertices {
            in_row_ptr[v + 1] += in_row_ptr[v];
        }
        let mut fill = in_row_ptr.clone();
        let mut in_edges = vec![0; edges.len()];
        for edge in &edges {
            in_edges[fill[edge.to]] = edge.id;
            fill[edge.to] += 1;
        }

        Self {
            num_vertices,
            root,
            in_edges,
            in_row_ptr,
            co: CompressedTree::new(num_vertices),
            forest: ActiveForest::new(num_vertices),
            passive: num_index_vec![Vec::new(); num_vertices],
            visited: FixedBitSet::with_capacity(num_vertices as usize),
            on_path: FixedBitSet::with_capacity(num_vertices as usize),
            growth_path: Vec::new(),
            path_edges: Vec::new(),
            chosen: Vec::with_capacity(2 * num_vertices as usize),
            forest_parent: Vec::with_capacity(2 * num_vertices as usize),
            leaf: num_index_vec![None; num_vertices],
            pending_children: Vec::new(),
            edges,
        }
    }

    /// Computes the arborescence, returns the ids of its edges in ascending order.
    pub fn solve(mut self) -> Vec<EdgeId> {
        self.visited.insert(self.root as usize);
        for start in 0..self.num_vertices {
            if !self.visited.contains(start as usize) {
                self.grow_from(start);
            }
        }
        debug!(
            "{} edges chosen for {} vertices",
            self.chosen.len(),
            self.num_vertices
        );
        self.reconstruct()
    }

    fn grow_from(&mut self, start: Vertex) {
        trace!("new growth path from {}", start);
        self.extend(start);
        let mut tip = start;
        loop {
            let edge = self.select(tip);
            let next = self.co.find(edge.from);
            if next == self.co.find(self.root) {
                self.contract_complete_path();
                return;
            }
            tip = if self.on_path.contains(next as usize) {
                self.contract_path_prefix(next)
            } else {
                self.extend(next);
                next
            };
        }
    }

    /// Pushes the unvisited vertex `u` onto the growth path and offers all
    /// its incoming edges to the active forest.
    fn extend(&mut self, u: Vertex) {
        debug_assert!(!self.visited.contains(u as usize));
        self.visited.insert(u as usize);
        self.on_path.insert(u as usize);
        self.growth_path.push(u);

        for i in self.in_row_ptr[u]..self.in_row_ptr[u + 1] {
            let edge = self.edges[self.in_edges[i]];
            if edge.from == edge.to {
                // self-loops never enter a heap
                continue;
            }
            if let Some(displaced) = self.forest.make_active(edge, &mut self.co) {
                self.park(displaced);
            }
        }
    }

    /// Keeps `edge` aside until its destination component gets contracted.
    fn park(&mut self, edge: Edge<W>) {
        let home = self.co.find(edge.to);
        debug_assert!(self.on_path.contains(home as usize));
        self.passive[home].push(edge.id);
    }

    /// Takes the cheapest external edge entering `tip` and records it.
    fn select(&mut self, tip: Vertex) -> Edge<W> {
        let edge = loop {
            let edge = self
                .forest
                .get_min(tip, &mut self.co)
                .unwrap_or_else(|| panic!("component {} has no incoming edge left", tip));
            self.forest.delete_active_edge(edge.from, &mut self.co);
            if self.co.find(edge.from) != tip {
                break edge;
            }
            trace!("dropping edge {} inside component {}", edge.id, tip);
        };

        let index = self.chosen.len();
        self.chosen.push(edge.id);
        self.forest_parent.push(None);
        for child in self.pending_children.drain(..) {
            self.forest_parent[child] = Some(index);
        }
        if self.leaf[edge.to].is_none() {
            self.leaf[edge.to] = Some(index);
        }
        self.path_edges.push(index);
        trace!(
            "component {} chose edge {} ({} -> {})",
            tip,
            edge.id,
            edge.from,
            edge.to
        );
        edge
    }

    /// Contracts the cycle formed by the growth path suffix starting at
    /// `target` and returns the representative of the new component.
    fn contract_path_prefix(&mut self, target: Vertex) -> Vertex {
        let position = self
            .growth_path
            .iter()
            .rposition(|&c| c == target)
            .unwrap_or_else(|| panic!("component {} is not on the growth path", target));
        let cycle = self.growth_path.split_off(position);
        let cycle_edges = self.path_edges.split_off(position);
        debug_assert_eq!(cycle.len(), cycle_edges.len());

        // the incoming edge of every cycle component is already paid for
        for (&component, &index) in cycle.iter().zip(cycle_edges.iter()) {
            let edge = self.edges[self.chosen[index]];
            let paid = edge.weight + self.co.find_value(edge.to);
            self.co.add_value(component, W::zero() - paid);
            self.on_path.set(component as usize, false);
        }

        let mut rep = cycle[0];
        for &component in &cycle[1..] {
            rep = self.co.join(rep, component);
        }
        for &component in &cycle {
            self.forest.merge_heaps(rep, component);
        }

        let mut parked = Vec::new();
        for &component in &cycle {
            parked.append(&mut self.passive[component]);
        }
        for id in parked {
            let edge = self.edges[id];
            if self.co.find(edge.from) == rep {
                continue;
            }
            debug_assert_eq!(self.co.find(edge.to), rep);
            if let Some(displaced) = self.forest.make_active(edge, &mut self.co) {
                self.park(displaced);
            }
        }

        trace!("contracted {} components into {}", cycle.len(), rep);
        self.on_path.insert(rep as usize);
        self.growth_path.push(rep);
        self.pending_children = cycle_edges;
        rep
    }

    /// Merges the whole growth path into the root's component.
    fn contract_complete_path(&mut self) {
        let path = std::mem::take(&mut self.growth_path);
        self.path_edges.clear();
        debug_assert!(self.pending_children.is_empty());
        let mut dropped = 0;
        for &component in &path {
            dropped += self.forest.clear_heap(component);
            self.passive[component].clear();
            self.on_path.set(component as usize, false);
        }
        for &component in &path {
            self.co.join(self.root, component);
        }
        trace!(
            "growth path of {} components reached the root, {} candidate edges dropped",
            path.len(),
            dropped
        );
    }

    /// Reads the arborescence off the contraction forest, newest edges first.
    fn reconstruct(&self) -> Vec<EdgeId> {
        let mut deleted = FixedBitSet::with_capacity(self.chosen.len());
        let mut result = Vec::with_capacity(self.num_vertices as usize - 1);
        for index in (0..self.chosen.len()).rev() {
            if deleted.contains(index) {
                continue;
            }
            let id = self.chosen[index];
            result.push(id);
            let mut cursor = self.leaf[self.edges[id].to];
            while let Some(k) = cursor {
                if deleted.contains(k) {
                    break;
                }
                deleted.insert(k);
                cursor = self.forest_parent[k];
            }
            debug_assert!(deleted.contains(index));
        }
        debug_assert_eq!(result.len(), self.num_vertices as usize - 1);
        result.sort_unstable();
        result
    }
}
