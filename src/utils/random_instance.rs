use std::ops::RangeInclusive;

use anyhow::ensure;
use arborescence::{Arc, Vertex};
use rand::seq::SliceRandom;
use rand::Rng;

use crate::problem::{Instance, Num};
use crate::utils::Random;

const WEIGHT_RANGE: RangeInclusive<i64> = 0..=100;

/// Random instance in which `root` reaches every vertex.
///
/// A random out-tree from `root` comes first, the remaining arcs are drawn
/// uniformly (self-loops and parallel arcs possible). Arcs are shuffled so
/// the tree arcs do not sit at the lowest ids. When `num_arcs` is smaller
/// than `num_vertices - 1` the tree alone is returned.
pub fn create_random_instance(
    rng: &mut Random,
    num_vertices: Vertex,
    num_arcs: usize,
    root: Vertex,
) -> anyhow::Result<Instance> {
    ensure!(num_vertices > 0, "a random instance needs at least one vertex");
    ensure!(
        root < num_vertices,
        "root {} is out of range for {} vertices",
        root,
        num_vertices
    );

    let mut order: Vec<Vertex> = (0..num_vertices).filter(|&v| v != root).collect();
    order.shuffle(rng);
    order.insert(0, root);

    let num_tree_arcs = num_vertices as usize - 1;
    let mut arcs = Vec::with_capacity(num_arcs.max(num_tree_arcs));
    for i in 1..order.len() {
        let from = order[rng.gen_range(0..i)];
        arcs.push(Arc::new(from, order[i], random_weight(rng)));
    }
    for _ in num_tree_arcs..num_arcs {
        let from = rng.gen_range(0..num_vertices);
        let to = rng.gen_range(0..num_vertices);
        arcs.push(Arc::new(from, to, random_weight(rng)));
    }
    arcs.shuffle(rng);

    Ok(Instance {
        name: format!("random-{}-{}", num_vertices, arcs.len()),
        num_vertices,
        root: Some(root),
        arcs,
    })
}

fn random_weight(rng: &mut Random) -> Num {
    Num::from(rng.gen_range(WEIGHT_RANGE))
}

#[cfg(test)]
mod tests {
    use arborescence::msa::reachable_from;

    use super::*;
    use crate::utils::create_seeded_rng;

    #[test]
    fn root_reaches_everything() {
        let mut rng = create_seeded_rng(7);
        for (n, m) in [(1, 0), (2, 0), (10, 3), (50, 200), (300, 1000)] {
            let instance = create_random_instance(&mut rng, n, m, n / 2).unwrap();
            assert_eq!(instance.num_arcs(), m.max(n as usize - 1));
            assert_eq!(instance.root, Some(n / 2));
            let reached = reachable_from(&instance.arcs, n, n / 2);
            assert_eq!(reached.count_ones(..), n as usize);
            assert!(instance
                .arcs
                .iter()
                .all(|arc| arc.directed && Num::ZERO <= arc.w && arc.w <= Num::from(100)));
        }
    }

    #[test]
    fn seeded_generation_is_reproducible() {
        let a = create_random_instance(&mut create_seeded_rng(1), 40, 120, 0).unwrap();
        let b = create_random_instance(&mut create_seeded_rng(1), 40, 120, 0).unwrap();
        assert_eq!(a.arcs, b.arcs);
        assert_eq!(a.name, "random-40-120");
    }

    #[test]
    fn rejects_bad_parameters() {
        let mut rng = create_seeded_rng(0);
        assert!(create_random_instance(&mut rng, 0, 5, 0).is_err());
        assert!(create_random_instance(&mut rng, 5, 5, 5).is_err());
    }
}
