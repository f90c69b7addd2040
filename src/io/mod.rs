use std::path::Path;

use anyhow::{bail, Context};
use arborescence::{Arc, Vertex};

use crate::problem::{Instance, Num};

pub mod descriptor_reader;
pub mod edge_list_reader;
pub mod solution_writer;
pub mod summary;

/// Loads a `.toml` descriptor or, for any other extension, an edge list.
pub fn load_instance(path: impl Into<String>) -> anyhow::Result<Instance> {
    let path = path.into();
    let is_descriptor = Path::new(&path)
        .extension()
        .map_or(false, |ext| ext == "toml");
    if is_descriptor {
        descriptor_reader::load_instance(path)
    } else {
        edge_list_reader::load_instance(path)
    }
}

/// File name of `path`, used when the instance carries no name of its own.
pub(crate) fn file_stem(path: &str) -> String {
    Path::new(path)
        .file_stem()
        .map(|it| it.to_string_lossy().to_string())
        .unwrap_or_else(|| path.to_string())
}

/// Lines that carry no data: blank or starting with `#`.
pub(crate) fn is_skipped(line: &str) -> bool {
    let line = line.trim();
    line.is_empty() || line.starts_with('#')
}

/// `from,to,weight[,u]`, a trailing `u` marks an undirected edge.
pub(crate) fn parse_arc(line: &str) -> anyhow::Result<Arc<Num>> {
    let mut split = line.trim().split(',').map(str::trim);
    let from = split
        .next()
        .context("expected next split: from")?
        .parse::<Vertex>()
        .context("invalid tail vertex")?;
    let to = split
        .next()
        .context("expected next split: to")?
        .parse::<Vertex>()
        .context("invalid head vertex")?;
    let w = split
        .next()
        .context("expected next split: weight")?
        .parse::<Num>()
        .context("invalid weight")?;
    let arc = match split.next() {
        None => Arc::new(from, to, w),
        Some("u") => Arc::undirected(from, to, w),
        Some(other) => bail!("unexpected field '{}'", other),
    };
    if let Some(other) = split.next() {
        bail!("unexpected field '{}'", other);
    }
    Ok(arc)
}
