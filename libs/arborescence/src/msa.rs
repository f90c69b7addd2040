use std::collections::VecDeque;
use std::fmt::{Debug, Display, Formatter};

use fixedbitset::FixedBitSet;
use log::{debug, trace};

use crate::gabow::Gabow;
use crate::utils::NumIndexVec;
use crate::{Arc, Edge, EdgeId, Vertex, Weight};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MsaError {
    RootOutOfRange {
        root: Vertex,
        num_vertices: Vertex,
    },
    VertexOutOfRange {
        arc: EdgeId,
        vertex: Vertex,
        num_vertices: Vertex,
    },
    /// graph format error, arborescences are only defined on directed arcs
    UndirectedArc { arc: EdgeId },
}

impl Display for MsaError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::RootOutOfRange { root, num_vertices } => write!(
                f,
                "root {} is out of range (graph has {} vertices)",
                root, num_vertices
            ),
            Self::VertexOutOfRange {
                arc,
                vertex,
                num_vertices,
            } => write!(
                f,
                "arc {} references vertex {}, but the graph has {} vertices",
                arc, vertex, num_vertices
            ),
            Self::UndirectedArc { arc } => write!(
                f,
                "graph format error: arc {} is undirected, only directed arcs are supported",
                arc
            ),
        }
    }
}

impl std::error::Error for MsaError {}

/// Minimum-cost arborescence restricted to the vertices reachable from `root`.
#[derive(Clone, Debug)]
pub struct Arborescence<W> {
    pub root: Vertex,
    /// positions in the input arc list, ascending
    pub arc_ids: Vec<EdgeId>,
    /// copies of the input arcs, same order as `arc_ids`
    pub arcs: Vec<Arc<W>>,
    /// position in `arcs` of the arc entering each vertex
    entering: Vec<Option<usize>>,
}

impl<W> Arborescence<W>
where
    W: Weight,
{
    pub fn len(&self) -> usize {
        self.arcs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arcs.is_empty()
    }

    pub fn total_weight(&self) -> W {
        self.arcs.iter().fold(W::zero(), |sum, arc| sum + arc.w)
    }

    /// The arc entering `v`, `None` for the root and unreachable vertices.
    pub fn parent_of(&self, v: Vertex) -> Option<&Arc<W>> {
        let index = (*self.entering.get(v as usize)?)?;
        Some(&self.arcs[index])
    }
}

fn validate<W>(arcs: &[Arc<W>], num_vertices: Vertex, root: Vertex) -> Result<(), MsaError> {
    if root >= num_vertices {
        return Err(MsaError::RootOutOfRange { root, num_vertices });
    }
    for (id, arc) in arcs.iter().enumerate() {
        for vertex in [arc.from, arc.to] {
            if vertex >= num_vertices {
                return Err(MsaError::VertexOutOfRange {
                    arc: id,
                    vertex,
                    num_vertices,
                });
            }
        }
        if !arc.directed {
            return Err(MsaError::UndirectedArc { arc: id });
        }
    }
    Ok(())
}

/// Breadth-first search over outgoing arcs.
pub fn reachable_from<W>(arcs: &[Arc<W>], num_vertices: Vertex, root: Vertex) -> FixedBitSet {
    let mut out_row_ptr = num_index_vec![0usize; num_vertices + 1];
    for arc in arcs {
        out_row_ptr[arc.from + 1] += 1;
    }
    for v in 0..num_vertices {
        out_row_ptr[v + 1] += out_row_ptr[v];
    }
    let mut fill = out_row_ptr.clone();
    let mut heads = vec![0 as Vertex; arcs.len()];
    for arc in arcs {
        heads[fill[arc.from]] = arc.to;
        fill[arc.from] += 1;
    }

    let mut reached = FixedBitSet::with_capacity(num_vertices as usize);
    let mut queue = VecDeque::new();
    reached.insert(root as usize);
    queue.push_back(root);
    while let Some(from) = queue.pop_front() {
        for &to in &heads[out_row_ptr[from]..out_row_ptr[from + 1]] {
            if !reached.contains(to as usize) {
                reached.insert(to as usize);
                queue.push_back(to);
            }
        }
    }
    reached
}

/// Computes a minimum-cost arborescence rooted at `root`.
///
/// Vertices the root cannot reach are left out; the result then spans the
/// reachable part only. Arc weights may be negative. Ties between equally
/// cheap arcs are broken by their position in `arcs`.
pub fn compute_msa<W>(
    arcs: &[Arc<W>],
    num_vertices: Vertex,
    root: Vertex,
) -> Result<Arborescence<W>, MsaError>
where
    W: Weight,
{
    validate(arcs, num_vertices, root)?;

    let reached = reachable_from(arcs, num_vertices, root);
    let num_reached = reached.count_ones(..);
    debug!(
        "computing arborescence: {} vertices, {} arcs, {} reachable from {}",
        num_vertices,
        arcs.len(),
        num_reached,
        root
    );

    let arc_ids = if num_reached == num_vertices as usize {
        let edges = arcs
            .iter()
            .enumerate()
            .map(|(id, arc)| Edge {
                from: arc.from,
                to: arc.to,
                weight: arc.w,
                id,
            })
            .collect();
        Gabow::new(num_vertices, root, edges).solve()
    } else {
        solve_reachable_part(arcs, num_vertices, root, &reached)
    };

    let arcs: Vec<Arc<W>> = arc_ids.iter().map(|&id| arcs[id].clone()).collect();
    let mut entering = vec![None; num_vertices as usize];
    for (index, arc) in arcs.iter().enumerate() {
        entering[arc.to as usize] = Some(index);
    }
    Ok(Arborescence {
        root,
        arc_ids,
        arcs,
        entering,
    })
}

/// Runs the core on the subgraph induced by `reached`, with dense indices.
fn solve_reachable_part<W>(
    arcs: &[Arc<W>],
    num_vertices: Vertex,
    root: Vertex,
    reached: &FixedBitSet,
) -> Vec<EdgeId>
where
    W: Weight,
{
    let mut remap: NumIndexVec<Option<Vertex>> = num_index_vec![None; num_vertices];
    let mut num_sub_vertices: Vertex = 0;
    for v in reached.ones() {
        remap[v] = Some(num_sub_vertices);
        num_sub_vertices += 1;
    }

    let mut original_ids = Vec::new();
    let mut edges = Vec::new();
    for (id, arc) in arcs.iter().enumerate() {
        if let (Some(from), Some(to)) = (remap[arc.from], remap[arc.to]) {
            edges.push(Edge {
                from,
                to,
                weight: arc.w,
                id: edges.len(),
            });
            original_ids.push(id);
        }
    }
    trace!(
        "induced subgraph: {} vertices, {} of {} arcs",
        num_sub_vertices,
        edges.len(),
        arcs.len()
    );

    let sub_root = remap[root].expect("root reaches itself");
    let mut ids: Vec<EdgeId> = Gabow::new(num_sub_vertices, sub_root, edges)
        .solve()
        .into_iter()
        .map(|id| original_ids[id])
        .collect();
    ids.sort_unstable();
    ids
}
