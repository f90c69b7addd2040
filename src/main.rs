use anyhow::{bail, ensure, Context};
use arborescence::compute_msa;
#[cfg(feature = "output-assertions")]
use arborescence::validator::validate_arborescence;
use clap::{CommandFactory, FromArgMatches};
use log::info;
use os_str_bytes::OsStrBytesExt;
use rand::random;
use took::Timer;

use crate::io::summary::RunSummary;
use crate::utils::create_seeded_rng;
use crate::utils::logging::{format_log_arborescence_timed, format_log_instance};
use crate::utils::random_instance::create_random_instance;

mod cli;
mod io;
mod problem;
mod utils;

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let args = argfile::expand_args_from(
        std::env::args_os(),
        argfile::parse_fromfile,
        argfile::PREFIX,
    )?;
    let args = cli::ProgramArguments::from_arg_matches(
        &cli::ProgramArguments::command()
            .get_matches_from(args.iter().flat_map(|it| {
                it.split(" ").into_iter().collect::<Vec<_>>()
            }))
    )?;
    info!("{:?}", &args);

    let load_timer = Timer::new();
    let instance = match (&args.instance, args.random_vertices) {
        (Some(path), _) => io::load_instance(path)?,
        (None, Some(num_vertices)) => {
            let seed_value = args.seed.unwrap_or_else(|| random::<u64>() as i128);
            info!("seed: {}", seed_value);
            let mut rng = create_seeded_rng(seed_value);
            let num_arcs = args.random_arcs.context("--random-arcs is required")?;
            create_random_instance(&mut rng, num_vertices, num_arcs, args.root.unwrap_or(0))?
        }
        (None, None) => bail!("either an instance or --random-vertices is required"),
    };
    info!("instance loaded after {}", load_timer.took());
    info!("{}", format_log_instance(&instance));

    let root = args.root.or(instance.root).unwrap_or(0);
    ensure!(
        root < instance.num_vertices,
        "root {} is out of range for {} vertices",
        root,
        instance.num_vertices
    );

    let timer = Timer::new();
    let msa = compute_msa(&instance.arcs, instance.num_vertices, root)
        .with_context(|| format!("cannot compute arborescence of {}", instance.name))?;
    let took = timer.took();
    info!("{}", format_log_arborescence_timed(&msa, &took));

    #[cfg(feature = "output-assertions")]
    validate_arborescence(instance.num_vertices, root, &msa.arcs).assert_valid();

    if msa.len() + 1 < instance.num_vertices as usize {
        info!(
            "{} vertices are not reachable from {}",
            instance.num_vertices as usize - msa.len() - 1,
            root
        );
    }

    if args.print_summary_to_stdout {
        println!(
            "{},{},{},{}",
            instance.name,
            msa.len(),
            msa.total_weight(),
            took.as_std().as_millis()
        );
    }

    if let Some(solution_path) = args.solution {
        info!("writing solution to {}", &solution_path);
        io::solution_writer::write_solution(solution_path, &instance.name, &msa)?;
    }

    if let Some(summary_path) = args.summary_json {
        RunSummary::new(&instance, &msa, &took).write_json(summary_path)?;
    }

    Ok(())
}
