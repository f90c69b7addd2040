use std::fs::File;
use std::io::{BufWriter, Write};

use anyhow::Context;
use arborescence::Arborescence;

use crate::problem::Num;

/// Writes
///
/// ```text
/// <name>
/// <root>
/// <num_arcs>
/// <total_weight>
///
/// from,to,weight
/// ...
/// ```
///
/// with the arcs in ascending input position.
pub fn write_solution(
    path: impl Into<String>,
    name: impl Into<String>,
    msa: &Arborescence<Num>,
) -> anyhow::Result<()> {
    let path = path.into();
    let f = File::create(&path).with_context(|| format!("cannot create solution file {}", path))?;
    let mut file = BufWriter::new(f);
    write_solution_to(&mut file, name, msa)?;
    file.flush()?;
    Ok(())
}

pub fn write_solution_to(
    mut out: impl Write,
    name: impl Into<String>,
    msa: &Arborescence<Num>,
) -> anyhow::Result<()> {
    writeln!(out, "{}", name.into())?;
    writeln!(out, "{}", msa.root)?;
    writeln!(out, "{}", msa.len())?;
    writeln!(out, "{}", msa.total_weight())?;

    writeln!(out)?;

    for it in &msa.arcs {
        writeln!(out, "{from},{to},{w}", from = it.from, to = it.to, w = it.w)?;
    }
    Ok(())
}
