#[macro_use]
mod utils;
pub mod active_forest;
pub mod compressed_tree;
pub mod gabow;
pub mod linked_list;
pub mod msa;
pub mod validator;

use std::fmt::Debug;
use std::ops::{Add, Sub};

use num_traits::Zero;

pub use msa::{compute_msa, Arborescence, MsaError};

pub type Vertex = u32;
pub type EdgeId = usize;

// trait aliases are experimental (rust-lang/rfcs#1733), hence the blanket impl
pub trait Weight: Zero + Add<Output = Self> + Sub<Output = Self> + Copy + Ord + Debug {}

impl<W> Weight for W where W: Zero + Add<Output = W> + Sub<Output = W> + Copy + Ord + Debug {}

/// Arc as handed over by the graph collaborator.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Arc<W> {
    pub from: Vertex,
    pub to: Vertex,
    pub w: W,
    pub directed: bool,
}

impl<W> Arc<W> {
    pub fn new(from: Vertex, to: Vertex, w: W) -> Self {
        Self {
            from,
            to,
            w,
            directed: true,
        }
    }

    pub fn undirected(from: Vertex, to: Vertex, w: W) -> Self {
        Self {
            from,
            to,
            w,
            directed: false,
        }
    }
}

/// Directed edge as seen by the core, `id` is the position in the input arc list.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Edge<W> {
    pub from: Vertex,
    pub to: Vertex,
    pub weight: W,
    pub id: EdgeId,
}
