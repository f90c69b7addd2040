use std::collections::VecDeque;

use fixedbitset::FixedBitSet;

use crate::utils::NumIndexVec;
use crate::{Arc, Vertex};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Violation {
    InDegree(Vertex),
    Cycle(Vertex),
    RootHasParent,
    Unreachable(Vertex),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidatorResult {
    Valid(usize),
    Invalid(Violation),
}

impl ValidatorResult {
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid(_))
    }

    pub fn assert_valid(&self) {
        if let Self::Invalid(violation) = self {
            panic!("invalid arborescence: {:?}", violation)
        }
    }
}

fn parents<W>(num_vertices: Vertex, arcs: &[Arc<W>]) -> Result<NumIndexVec<Option<Vertex>>, Violation> {
    let mut parent = num_index_vec![None; num_vertices];
    for arc in arcs {
        if parent[arc.to].replace(arc.from).is_some() {
            return Err(Violation::InDegree(arc.to));
        }
    }
    Ok(parent)
}

fn reach<W>(num_vertices: Vertex, arcs: &[Arc<W>], root: Vertex) -> FixedBitSet {
    let mut children: NumIndexVec<Vec<Vertex>> = num_index_vec![Vec::new(); num_vertices];
    for arc in arcs {
        children[arc.from].push(arc.to);
    }
    let mut reached = FixedBitSet::with_capacity(num_vertices as usize);
    let mut queue = VecDeque::from([root]);
    reached.insert(root as usize);
    while let Some(v) = queue.pop_front() {
        for &c in &children[v] {
            if !reached.contains(c as usize) {
                reached.insert(c as usize);
                queue.push_back(c);
            }
        }
    }
    reached
}

/// Checks that `arcs` form an arborescence rooted at `root`: in-degree one
/// for every vertex touched except the root, and everything touched is
/// reachable from the root.
pub fn validate_arborescence<W>(num_vertices: Vertex, root: Vertex, arcs: &[Arc<W>]) -> ValidatorResult {
    use ValidatorResult::*;

    let parent = match parents(num_vertices, arcs) {
        Ok(parent) => parent,
        Err(violation) => return Invalid(violation),
    };
    if parent[root].is_some() {
        return Invalid(Violation::RootHasParent);
    }

    let reached = reach(num_vertices, arcs, root);
    for arc in arcs {
        let v = arc.to;
        if reached.contains(v as usize) {
            continue;
        }
        // walk up; with in-degree at most one an unreachable vertex either
        // hangs below a cycle or below another source
        let mut on_walk = FixedBitSet::with_capacity(num_vertices as usize);
        let mut cursor = Some(v);
        while let Some(u) = cursor {
            if on_walk.contains(u as usize) {
                return Invalid(Violation::Cycle(u));
            }
            on_walk.insert(u as usize);
            cursor = parent[u];
        }
        return Invalid(Violation::Unreachable(v));
    }
    Valid(arcs.len())
}

/// The unique root of the tree formed by `arcs`, if they form one.
pub fn find_tree_root<W>(num_vertices: Vertex, arcs: &[Arc<W>]) -> Option<Vertex> {
    if arcs.is_empty() {
        return None;
    }
    let parent = parents(num_vertices, arcs).ok()?;
    let mut root = None;
    for arc in arcs {
        if parent[arc.from].is_none() {
            match root {
                None => root = Some(arc.from),
                Some(r) if r != arc.from => return None,
                Some(_) => {}
            }
        }
    }
    let root = root?;
    let reached = reach(num_vertices, arcs, root);
    if arcs.iter().all(|arc| reached.contains(arc.to as usize)) {
        Some(root)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_a_tree() {
        let arcs = vec![Arc::new(1, 0, 1), Arc::new(1, 2, 1), Arc::new(2, 3, 1)];
        assert_eq!(validate_arborescence(4, 1, &arcs), ValidatorResult::Valid(3));
        assert_eq!(find_tree_root(4, &arcs), Some(1));
        assert!(validate_arborescence::<i32>(4, 3, &[]).is_valid());
    }

    #[test]
    fn reports_violations() {
        let two_parents = vec![Arc::new(0, 1, 1), Arc::new(2, 1, 1), Arc::new(0, 2, 1)];
        assert_eq!(
            validate_arborescence(3, 0, &two_parents),
            ValidatorResult::Invalid(Violation::InDegree(1))
        );
        assert_eq!(find_tree_root(3, &two_parents), None);

        let cycle = vec![Arc::new(0, 1, 1), Arc::new(2, 3, 1), Arc::new(3, 2, 1)];
        assert_eq!(
            validate_arborescence(4, 0, &cycle),
            ValidatorResult::Invalid(Violation::Cycle(3))
        );
        assert_eq!(find_tree_root(4, &cycle), None);

        let forest = vec![Arc::new(0, 1, 1), Arc::new(2, 3, 1)];
        assert_eq!(
            validate_arborescence(4, 0, &forest),
            ValidatorResult::Invalid(Violation::Unreachable(3))
        );
        assert_eq!(find_tree_root(4, &forest), None);

        let into_root = vec![Arc::new(1, 0, 1)];
        assert_eq!(
            validate_arborescence(2, 0, &into_root),
            ValidatorResult::Invalid(Violation::RootHasParent)
        );
    }

    #[test]
    #[should_panic(expected = "InDegree")]
    fn assert_valid_panics() {
        let arcs = vec![Arc::new(0, 1, 1), Arc::new(0, 1, 2)];
        validate_arborescence(2, 0, &arcs).assert_valid();
    }
}
