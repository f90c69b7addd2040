use std::fs::File;
use std::io::{BufWriter, Write};

use anyhow::Context;
use arborescence::{Arborescence, Vertex};
use serde::Serialize;
use took::Took;

use crate::problem::{Instance, Num};

/// One run, as written by `--summary-json`.
#[derive(Debug, Serialize)]
pub struct RunSummary {
    pub name: String,
    pub root: Vertex,
    pub num_vertices: Vertex,
    pub num_arcs: usize,
    /// vertices spanned by the arborescence, root included
    pub num_reachable: usize,
    pub num_tree_arcs: usize,
    pub total_weight: Num,
    pub time_ms: u64,
}

impl RunSummary {
    pub fn new(instance: &Instance, msa: &Arborescence<Num>, took: &Took) -> Self {
        Self {
            name: instance.name.clone(),
            root: msa.root,
            num_vertices: instance.num_vertices,
            num_arcs: instance.num_arcs(),
            num_reachable: msa.len() + 1,
            num_tree_arcs: msa.len(),
            total_weight: msa.total_weight(),
            time_ms: took.as_std().as_millis() as u64,
        }
    }

    pub fn write_json(&self, path: impl Into<String>) -> anyhow::Result<()> {
        let path = path.into();
        let f = File::create(&path).with_context(|| format!("cannot create summary file {}", path))?;
        let mut file = BufWriter::new(f);
        serde_json::to_writer_pretty(&mut file, self)?;
        writeln!(file)?;
        file.flush()?;
        Ok(())
    }
}
