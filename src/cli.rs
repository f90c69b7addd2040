use arborescence::Vertex;
use clap::Parser;

#[derive(Parser, Debug)]
#[command(version, about = "minimum-cost spanning arborescence")]
pub struct ProgramArguments {
    #[arg(
        short,
        long,
        help = "instance file path (edge list, or .toml descriptor)",
        required_unless_present = "random_vertices"
    )]
    pub instance: Option<String>,

    #[arg(
        long,
        help = "number of vertices of a generated instance",
        conflicts_with = "instance",
        requires = "random_arcs"
    )]
    pub random_vertices: Option<Vertex>,

    #[arg(long, help = "number of arcs of a generated instance")]
    pub random_arcs: Option<usize>,

    #[arg(long, help = "rng seed", allow_hyphen_values = true)]
    pub seed: Option<i128>,

    #[arg(short, long, help = "root vertex, overrides the root of the instance [default: 0]")]
    pub root: Option<Vertex>,

    #[arg(short, long, help = "solution file path")]
    pub solution: Option<String>,

    #[arg(long, help = "file to store a json summary")]
    pub summary_json: Option<String>,

    #[arg(long, help = "print summary to stdout", default_value = "false")]
    pub print_summary_to_stdout: bool,
}
