//! Candidate incoming edges of the contracted components.
//!
//! Every origin vertex owns at most one *active* edge. Active edges are
//! [`FibonacciHeapNode`]s kept in the root-list (`active_sets`) of the
//! component their destination currently belongs to, or as heap-children
//! below another node of that root-list. Heap order is by current weight
//! (`weight + co.find_value(to)`), ties by edge id. Lazy offsets only ever
//! move a whole component, so the order established when two nodes were
//! linked stays valid.
//!
//! A node's location is not stored: with a parent it sits in the parent's
//! children list, without one it sits in the root-list of `co.find(to)`.

use std::cmp::Ordering;

use log::trace;

use crate::compressed_tree::CompressedTree;
use crate::linked_list::{Handle, LinkedList, ListPool};
use crate::utils::NumIndexVec;
use crate::{Edge, Vertex, Weight};

#[derive(Debug)]
pub struct FibonacciHeapNode<W> {
    pub edge: Edge<W>,
    parent: Option<Handle>,
    children: LinkedList,
    /// lost a child since it last became a root
    is_loser: bool,
}

impl<W> FibonacciHeapNode<W> {
    fn new(edge: Edge<W>) -> Self {
        Self {
            edge,
            parent: None,
            children: LinkedList::new(),
            is_loser: false,
        }
    }

    #[inline(always)]
    pub fn parent(&self) -> Option<Handle> {
        self.parent
    }

    #[inline(always)]
    pub fn degree(&self) -> usize {
        self.children.len()
    }

    #[inline(always)]
    pub fn is_loser(&self) -> bool {
        self.is_loser
    }
}

pub struct ActiveForest<W> {
    nodes: ListPool<FibonacciHeapNode<W>>,
    /// active node per origin vertex
    active_edge: NumIndexVec<Option<Handle>>,
    /// root-list per component representative
    active_sets: NumIndexVec<LinkedList>,
    /// consolidation table indexed by degree
    order_rep: Vec<Option<Handle>>,
}

#[inline(always)]
fn current_weight<W: Weight>(edge: &Edge<W>, co: &mut CompressedTree<W>) -> W {
    edge.weight + co.find_value(edge.to)
}

/// Orders by current weight, then by id.
fn compare<W: Weight>(a: &Edge<W>, b: &Edge<W>, co: &mut CompressedTree<W>) -> Ordering {
    current_weight(a, co)
        .cmp(&current_weight(b, co))
        .then(a.id.cmp(&b.id))
}

impl<W> ActiveForest<W>
where
    W: Weight,
{
    pub fn new(num_vertices: Vertex) -> Self {
        Self {
            nodes: ListPool::with_capacity(num_vertices as usize),
            active_edge: num_index_vec![None; num_vertices],
            active_sets: num_index_vec![LinkedList::new(); num_vertices],
            order_rep: Vec::new(),
        }
    }

    pub fn active_edge(&self, from: Vertex) -> Option<Edge<W>> {
        self.active_edge[from].map(|node| self.nodes[node].edge)
    }

    pub fn node(&self, handle: Handle) -> &FibonacciHeapNode<W> {
        &self.nodes[handle]
    }

    /// number of edges currently held in heaps
    pub fn len(&self) -> usize {
        self.nodes.num_allocated()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn root_list_len(&self, component: Vertex) -> usize {
        self.active_sets[component].len()
    }

    /// Offers `edge` as the active edge of its origin.
    ///
    /// An origin without active edge simply gets one. If the current active
    /// edge enters the same component, the cheaper of both survives (the new
    /// edge takes over the node in place). If it enters a different component,
    /// the new edge becomes active and the old one is returned to the caller.
    pub fn make_active(&mut self, edge: Edge<W>, co: &mut CompressedTree<W>) -> Option<Edge<W>> {
        let Some(node) = self.active_edge[edge.from] else {
            self.insert(edge, co);
            return None;
        };
        let current = self.nodes[node].edge;
        if co.find(current.to) != co.find(edge.to) {
            let displaced = self.delete_active_edge(edge.from, co);
            self.insert(edge, co);
            return displaced;
        }
        if compare(&edge, &current, co) == Ordering::Less {
            // decrease-key: the node can only violate the order towards its parent
            self.nodes[node].edge = edge;
            if let Some(parent) = self.nodes[node].parent {
                self.remove_from_current_list(node, co);
                self.move_home(node, co);
                self.lose_child(parent, co);
            }
        }
        self.check_invariants(co);
        None
    }

    fn insert(&mut self, edge: Edge<W>, co: &mut CompressedTree<W>) {
        let node = self.nodes.insert(FibonacciHeapNode::new(edge));
        self.active_edge[edge.from] = Some(node);
        self.move_home(node, co);
    }

    /// Links the detached `node` into the root-list of its destination component.
    fn move_home(&mut self, node: Handle, co: &mut CompressedTree<W>) {
        let home = co.find(self.nodes[node].edge.to);
        let n = &mut self.nodes[node];
        n.parent = None;
        n.is_loser = false;
        self.nodes.link_back(&mut self.active_sets[home], node);
    }

    /// Unlinks `node` from the parent's children or from its root-list.
    fn remove_from_current_list(&mut self, node: Handle, co: &mut CompressedTree<W>) {
        match self.nodes[node].parent.take() {
            Some(parent) => {
                let mut children = std::mem::take(&mut self.nodes[parent].children);
                self.nodes.unlink(&mut children, node);
                self.nodes[parent].children = children;
            }
            None => {
                let home = co.find(self.nodes[node].edge.to);
                self.nodes.unlink(&mut self.active_sets[home], node);
            }
        }
    }

    /// Cascading cut starting at `node`, which just lost a child.
    ///
    /// Roots never carry the loser flag.
    fn lose_child(&mut self, mut node: Handle, co: &mut CompressedTree<W>) {
        loop {
            let Some(parent) = self.nodes[node].parent else {
                return;
            };
            if !self.nodes[node].is_loser {
                self.nodes[node].is_loser = true;
                return;
            }
            self.remove_from_current_list(node, co);
            self.move_home(node, co);
            node = parent;
        }
    }

    /// Removes the active edge of `from` from its heap and returns it.
    ///
    /// Its heap-children move to the root-list of their component.
    pub fn delete_active_edge(&mut self, from: Vertex, co: &mut CompressedTree<W>) -> Option<Edge<W>> {
        let node = self.active_edge[from].take()?;
        let parent = self.nodes[node].parent;
        self.remove_from_current_list(node, co);

        let mut children = std::mem::take(&mut self.nodes[node].children);
        let mut cursor = children.first();
        while let Some(child) = cursor {
            cursor = self.nodes.next(child);
            let c = &mut self.nodes[child];
            c.parent = None;
            c.is_loser = false;
        }
        let home = co.find(self.nodes[node].edge.to);
        self.nodes.splice(&mut self.active_sets[home], &mut children);

        if let Some(parent) = parent {
            self.lose_child(parent, co);
        }
        let FibonacciHeapNode { edge, .. } = self.nodes.release(node);
        self.check_invariants(co);
        Some(edge)
    }

    /// Makes the root of `b` a heap-child of the root of `a`.
    fn link(&mut self, a: Handle, b: Handle) {
        let mut children = std::mem::take(&mut self.nodes[a].children);
        let n = &mut self.nodes[b];
        n.parent = Some(a);
        n.is_loser = false;
        self.nodes.link_back(&mut children, b);
        self.nodes[a].children = children;
    }

    /// Consolidates the root-list of `component` and returns its cheapest edge.
    ///
    /// The edge stays in the heap; see [`ActiveForest::delete_active_edge`].
    pub fn get_min(&mut self, component: Vertex, co: &mut CompressedTree<W>) -> Option<Edge<W>> {
        let mut roots = std::mem::take(&mut self.active_sets[component]);
        let num_roots = roots.len();
        while let Some(first) = roots.first() {
            self.nodes.unlink(&mut roots, first);
            let mut node = first;
            loop {
                let degree = self.nodes[node].degree();
                if self.order_rep.len() <= degree {
                    self.order_rep.resize(degree + 1, None);
                }
                let Some(other) = self.order_rep[degree].take() else {
                    self.order_rep[degree] = Some(node);
                    break;
                };
                let (a, b) = (self.nodes[node].edge, self.nodes[other].edge);
                node = if compare(&a, &b, co) == Ordering::Less {
                    self.link(node, other);
                    node
                } else {
                    self.link(other, node);
                    other
                };
            }
        }

        let mut min: Option<Handle> = None;
        for slot in self.order_rep.iter_mut() {
            let Some(node) = slot.take() else {
                continue;
            };
            self.nodes.link_back(&mut roots, node);
            min = match min {
                Some(best)
                    if compare(&self.nodes[best].edge, &self.nodes[node].edge, co)
                        != Ordering::Greater =>
                {
                    Some(best)
                }
                _ => Some(node),
            };
        }
        self.order_rep.clear();
        trace!(
            "consolidated component {}: {} roots -> {}",
            component,
            num_roots,
            roots.len()
        );
        self.active_sets[component] = roots;
        self.check_invariants(co);
        min.map(|node| self.nodes[node].edge)
    }

    /// Splices the whole root-list of `source` onto the one of `target`.
    pub fn merge_heaps(&mut self, target: Vertex, source: Vertex) {
        if target == source {
            return;
        }
        let mut moved = std::mem::take(&mut self.active_sets[source]);
        self.nodes.splice(&mut self.active_sets[target], &mut moved);
    }

    /// Drops every edge held by the heap of `component` and clears the
    /// active edge of their origins. Returns the number of dropped edges.
    pub fn clear_heap(&mut self, component: Vertex) -> usize {
        let mut pending = vec![std::mem::take(&mut self.active_sets[component])];
        let mut dropped = 0;
        while let Some(mut list) = pending.pop() {
            for node in self.nodes.drain(&mut list) {
                debug_assert!(self.active_edge[node.edge.from].is_some());
                self.active_edge[node.edge.from] = None;
                pending.push(node.children);
                dropped += 1;
            }
        }
        dropped
    }

    /// Walks every heap and checks parent links, heap order and the
    /// origin-to-node table. Runs in tests and with the `invariant-checks` feature.
    #[allow(unused_variables)]
    fn check_invariants(&self, co: &mut CompressedTree<W>) {
        #[cfg(any(test, feature = "invariant-checks"))]
        self.assert_consistent(co);
    }

    pub fn assert_consistent(&self, co: &mut CompressedTree<W>) {
        let mut seen = 0;
        for component in 0..self.active_sets.len() {
            let roots = &self.active_sets[component];
            let mut stack: Vec<Handle> = self.nodes.handles(roots).collect();
            for &root in &stack {
                let node = &self.nodes[root];
                assert!(node.parent.is_none(), "root {} has a parent", root);
                assert!(!node.is_loser, "root {} is flagged as loser", root);
                assert_eq!(
                    co.find(node.edge.to) as usize,
                    component,
                    "root {} is not in the list of its component",
                    root
                );
            }
            while let Some(handle) = stack.pop() {
                seen += 1;
                let node = &self.nodes[handle];
                assert_eq!(self.active_edge[node.edge.from], Some(handle));
                for child in self.nodes.handles(&node.children) {
                    let c = &self.nodes[child];
                    assert_eq!(c.parent, Some(handle));
                    assert_ne!(
                        compare(&c.edge, &node.edge, co),
                        Ordering::Less,
                        "heap order violated between {} and {}",
                        handle,
                        child
                    );
                    stack.push(child);
                }
            }
        }
        assert_eq!(seen, self.nodes.num_allocated(), "detached nodes in the forest");
        assert_eq!(
            seen,
            self.active_edge.iter().filter(|it| it.is_some()).count()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn edge(from: Vertex, to: Vertex, weight: i64, id: usize) -> Edge<i64> {
        Edge {
            from,
            to,
            weight,
            id,
        }
    }

    fn pop_min(af: &mut ActiveForest<i64>, component: Vertex, co: &mut CompressedTree<i64>) -> Option<Edge<i64>> {
        let min = af.get_min(component, co)?;
        af.delete_active_edge(min.from, co);
        af.assert_consistent(co);
        Some(min)
    }

    #[test]
    fn extracts_in_weight_order() {
        let n = 32;
        let mut co = CompressedTree::new(n);
        let mut af = ActiveForest::new(n);
        let weights = [9, 3, 7, 1, 8, 2, 6, 4, 5, 0, 11, 10, 3, 3];
        for (i, &w) in weights.iter().enumerate() {
            assert!(af.make_active(edge(i as Vertex + 1, 0, w, i), &mut co).is_none());
        }
        af.assert_consistent(&mut co);

        let mut extracted = vec![];
        while let Some(e) = pop_min(&mut af, 0, &mut co) {
            extracted.push((e.weight, e.id));
        }
        let mut expected: Vec<(i64, usize)> = weights.iter().cloned().zip(0..).collect();
        expected.sort();
        assert_eq!(extracted, expected);
        assert!(af.is_empty());
    }

    #[test]
    fn parallel_edge_keeps_the_cheaper_one() {
        let mut co = CompressedTree::new(4);
        let mut af = ActiveForest::new(4);
        af.make_active(edge(1, 0, 5, 0), &mut co);
        assert!(af.make_active(edge(1, 0, 7, 1), &mut co).is_none());
        assert_eq!(af.active_edge(1).map(|e| e.id), Some(0));
        assert!(af.make_active(edge(1, 0, 2, 2), &mut co).is_none());
        assert_eq!(af.active_edge(1).map(|e| e.id), Some(2));
        // equal weight, the smaller id wins
        assert!(af.make_active(edge(1, 0, 2, 3), &mut co).is_none());
        assert_eq!(af.active_edge(1).map(|e| e.id), Some(2));
        assert_eq!(af.len(), 1);
    }

    #[test]
    fn different_destination_displaces_the_active_edge() {
        let mut co = CompressedTree::new(4);
        let mut af = ActiveForest::new(4);
        af.make_active(edge(3, 0, 1, 0), &mut co);
        let displaced = af.make_active(edge(3, 1, 9, 1), &mut co);
        assert_eq!(displaced.map(|e| e.id), Some(0));
        assert_eq!(af.active_edge(3).map(|e| e.id), Some(1));
        assert_eq!(af.root_list_len(0), 0);
        assert_eq!(af.root_list_len(1), 1);
    }

    #[test]
    fn decrease_key_cuts_from_parent() {
        let n = 16;
        let mut co = CompressedTree::new(n);
        let mut af = ActiveForest::new(n);
        for i in 1..9 {
            af.make_active(edge(i, 0, 10 * i as i64, i as usize), &mut co);
        }
        // consolidation builds a binomial-like tree out of 8 roots
        assert_eq!(af.get_min(0, &mut co).map(|e| e.id), Some(1));
        assert_eq!(af.root_list_len(0), 1);

        // origin 8 is deep in the tree, make its edge the cheapest
        af.make_active(edge(8, 0, 1, 20), &mut co);
        af.assert_consistent(&mut co);
        assert_eq!(pop_min(&mut af, 0, &mut co).map(|e| e.id), Some(20));
        assert_eq!(pop_min(&mut af, 0, &mut co).map(|e| e.id), Some(1));
        assert_eq!(pop_min(&mut af, 0, &mut co).map(|e| e.id), Some(2));
    }

    #[test]
    fn cascading_cuts_keep_heap_valid() {
        let n = 64;
        let mut co = CompressedTree::new(n);
        let mut af = ActiveForest::new(n);
        for i in 1..33 {
            af.make_active(edge(i, 0, 100 + i as i64, i as usize), &mut co);
        }
        af.get_min(0, &mut co);
        // delete a bunch of inner nodes to trigger loser handling
        for from in [4, 6, 7, 12, 14, 15, 16, 28, 30, 31] {
            assert!(af.delete_active_edge(from, &mut co).is_some());
            af.assert_consistent(&mut co);
        }
        // decrease some of the remaining ones
        for (k, from) in [32, 24, 20, 18].into_iter().enumerate() {
            af.make_active(edge(from, 0, k as i64, 100 + k), &mut co);
            af.assert_consistent(&mut co);
        }
        let mut last = i64::MIN;
        while let Some(e) = pop_min(&mut af, 0, &mut co) {
            assert!(e.weight >= last);
            last = e.weight;
        }
    }

    /// Origins `1..=16` with weights `10 * origin` into component 0, consolidated
    /// into one tree:
    ///
    /// ```text
    /// 1 ── 2
    ///   ├─ 3 ── 4
    ///   ├─ 5 ── 6, 7 ── 8
    ///   └─ 9 ── 10
    ///        ├─ 11 ── 12
    ///        └─ 13 ── 14, 15 ── 16
    /// ```
    fn consolidated_tree(co: &mut CompressedTree<i64>) -> ActiveForest<i64> {
        let mut af = ActiveForest::new(32);
        for i in 1..=16 {
            af.make_active(edge(i, 0, 10 * i as i64, i as usize), co);
        }
        assert_eq!(af.get_min(0, co).map(|e| e.id), Some(1));
        assert_eq!(af.root_list_len(0), 1);
        af
    }

    fn handle_of(af: &ActiveForest<i64>, from: Vertex) -> Handle {
        af.active_edge[from].unwrap()
    }

    #[test]
    fn consolidation_shape() {
        let mut co = CompressedTree::new(32);
        let af = consolidated_tree(&mut co);
        let parent_of = |from| af.node(handle_of(&af, from)).parent();
        assert_eq!(parent_of(1), None);
        assert_eq!(af.node(handle_of(&af, 1)).degree(), 4);
        assert_eq!(parent_of(9), Some(handle_of(&af, 1)));
        assert_eq!(parent_of(13), Some(handle_of(&af, 9)));
        assert_eq!(parent_of(15), Some(handle_of(&af, 13)));
        assert_eq!(parent_of(16), Some(handle_of(&af, 15)));
        assert!((1..=16).all(|from| !af.node(handle_of(&af, from)).is_loser()));
    }

    #[test]
    fn second_lost_child_moves_node_home_and_flags_its_parent() {
        let mut co = CompressedTree::new(32);
        let mut af = consolidated_tree(&mut co);

        af.delete_active_edge(14, &mut co);
        let n13 = af.node(handle_of(&af, 13));
        assert!(n13.is_loser());
        assert_eq!(n13.parent(), Some(handle_of(&af, 9)));
        assert!(!af.node(handle_of(&af, 9)).is_loser());
        assert_eq!(af.root_list_len(0), 1);

        // 16 is promoted, 13 loses its second child and is cut
        af.delete_active_edge(15, &mut co);
        let n13 = af.node(handle_of(&af, 13));
        assert_eq!(n13.parent(), None);
        assert!(!n13.is_loser());
        assert_eq!(af.node(handle_of(&af, 16)).parent(), None);
        let n9 = af.node(handle_of(&af, 9));
        assert!(n9.is_loser());
        assert_eq!(n9.parent(), Some(handle_of(&af, 1)));
        assert_eq!(af.root_list_len(0), 3);
        af.assert_consistent(&mut co);
    }

    #[test]
    fn cuts_cascade_up_to_the_root() {
        let mut co = CompressedTree::new(32);
        let mut af = consolidated_tree(&mut co);

        af.delete_active_edge(10, &mut co);
        af.delete_active_edge(14, &mut co);
        assert!(af.node(handle_of(&af, 9)).is_loser());
        assert!(af.node(handle_of(&af, 13)).is_loser());

        // 13 is cut, then its flagged parent 9; the root 1 stays unflagged
        af.delete_active_edge(15, &mut co);
        for from in [9, 13, 16] {
            let node = af.node(handle_of(&af, from));
            assert_eq!(node.parent(), None, "{} is not a root", from);
            assert!(!node.is_loser());
        }
        let n1 = af.node(handle_of(&af, 1));
        assert!(!n1.is_loser());
        assert_eq!(n1.degree(), 3);
        assert_eq!(af.node(handle_of(&af, 9)).degree(), 1);
        assert_eq!(af.root_list_len(0), 4);
        af.assert_consistent(&mut co);

        let order: Vec<usize> = std::iter::from_fn(|| pop_min(&mut af, 0, &mut co))
            .map(|e| e.id)
            .collect();
        assert_eq!(order, vec![1, 2, 3, 4, 5, 6, 7, 8, 9, 11, 12, 13, 16]);
    }

    #[test]
    fn merged_heaps_respect_lazy_offsets() {
        let n = 8;
        let mut co = CompressedTree::new(n);
        let mut af = ActiveForest::new(n);
        af.make_active(edge(4, 0, 10, 0), &mut co);
        af.make_active(edge(5, 0, 12, 1), &mut co);
        af.make_active(edge(6, 1, 3, 2), &mut co);
        af.make_active(edge(7, 1, 20, 3), &mut co);
        af.get_min(0, &mut co);
        af.get_min(1, &mut co);

        // component 0 paid 10 for its incoming edge, component 1 paid 3
        co.add_value(0, -10);
        co.add_value(1, -3);
        let rep = co.join(0, 1);
        af.merge_heaps(rep, if rep == 0 { 1 } else { 0 });
        af.assert_consistent(&mut co);

        let order: Vec<usize> = std::iter::from_fn(|| pop_min(&mut af, rep, &mut co))
            .map(|e| e.id)
            .collect();
        // current weights: 0, 2, 0, 17
        assert_eq!(order, vec![0, 2, 1, 3]);
    }

    #[test]
    fn clear_heap_resets_origins() {
        let n = 8;
        let mut co = CompressedTree::new(n);
        let mut af = ActiveForest::new(n);
        for i in 1..7 {
            af.make_active(edge(i, 0, i as i64, i as usize), &mut co);
        }
        af.make_active(edge(7, 1, 1, 7), &mut co);
        af.get_min(0, &mut co);
        assert_eq!(af.clear_heap(0), 6);
        for i in 1..7 {
            assert!(af.active_edge(i).is_none());
        }
        assert!(af.active_edge(7).is_some());
        af.assert_consistent(&mut co);
        assert_eq!(af.len(), 1);
    }
}
