use arborescence::Arborescence;
use took::Took;

use crate::problem::{Instance, Num};

pub fn format_log_instance(instance: &Instance) -> String {
    format!(
        "{}: {} vertices, {} arcs ({} undirected)",
        instance.name,
        instance.num_vertices,
        instance.num_arcs(),
        instance.num_undirected(),
    )
}

pub fn format_log_arborescence(msa: &Arborescence<Num>) -> String {
    format!(
        "root {}, {} arcs, total weight {}",
        msa.root,
        msa.len(),
        msa.total_weight(),
    )
}

pub fn format_log_arborescence_timed(msa: &Arborescence<Num>, took: &Took) -> String {
    format!("{}, took: {took}", format_log_arborescence(msa))
}
