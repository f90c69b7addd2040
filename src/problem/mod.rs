use arborescence::{Arc, Vertex};

pub type Num = crate::utils::num::NumI64P3;

/// A weighted digraph as loaded from disk or generated.
#[derive(Debug, Clone)]
pub struct Instance {
    pub name: String,
    pub num_vertices: Vertex,
    /// root given by the instance file, if any
    pub root: Option<Vertex>,
    pub arcs: Vec<Arc<Num>>,
}

impl Instance {
    pub fn num_arcs(&self) -> usize {
        self.arcs.len()
    }

    pub fn num_undirected(&self) -> usize {
        self.arcs.iter().filter(|arc| !arc.directed).count()
    }
}
