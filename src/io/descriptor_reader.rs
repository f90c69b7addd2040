use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use anyhow::{ensure, Context};
use log::{debug, info};

use crate::io::{file_stem, is_skipped, parse_arc};
use crate::problem::Instance;

mod toml {
    use std::fs::File;
    use std::io::Read;

    use arborescence::Vertex;
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    pub struct Config {
        pub instance: Instance,
        pub arcs: Arcs,
    }

    #[derive(Debug, Deserialize)]
    pub struct Instance {
        pub name: Option<String>,
        pub num_vertices: Vertex,
        pub root: Option<Vertex>,
    }

    #[derive(Debug, Deserialize)]
    pub struct Arcs {
        /// relative to the descriptor
        pub csv: String,
        pub num_arcs: Option<usize>,
    }

    pub fn read_config(path: impl Into<String>) -> anyhow::Result<Config> {
        let mut s = String::new();
        File::open(path.into())?.read_to_string(&mut s)?;
        Ok(toml::from_str(s.as_str())?)
    }
}

/**
TOML descriptor pointing to a CSV arc file.

```toml
[instance]
name = "city-net"      # optional, defaults to the descriptor's file name
num_vertices = 5
root = 1               # optional

[arcs]
csv = "arcs.csv"       # from,to,weight[,u] per line
num_arcs = 10          # optional, checked when present
```
 */
pub fn load_instance(toml_path: impl Into<String>) -> anyhow::Result<Instance> {
    let toml_path = toml_path.into();
    let config = toml::read_config(toml_path.clone())
        .with_context(|| format!("cannot read descriptor {}", toml_path))?;
    let directory = Path::new(&toml_path).parent().unwrap_or_else(|| Path::new(""));
    let csv_path = directory.join(&config.arcs.csv);

    let f = File::open(&csv_path)
        .with_context(|| format!("cannot open arc file {}", csv_path.display()))?;
    let mut arcs = Vec::with_capacity(config.arcs.num_arcs.unwrap_or(0));
    for (i, line) in BufReader::new(f).lines().enumerate() {
        let line = line?;
        if is_skipped(&line) {
            continue;
        }
        let arc = parse_arc(&line)
            .with_context(|| format!("{}:{}: '{}'", csv_path.display(), i + 1, line))?;
        arcs.push(arc);
    }
    if let Some(num_arcs) = config.arcs.num_arcs {
        ensure!(
            arcs.len() == num_arcs,
            "descriptor announces {} arcs, {} has {}",
            num_arcs,
            csv_path.display(),
            arcs.len()
        );
    }
    debug!("read {} arcs from {}", arcs.len(), csv_path.display());

    let name = config.instance.name.unwrap_or_else(|| file_stem(&toml_path));
    if let Some(root) = config.instance.root {
        info!("{}: descriptor sets root {}", name, root);
    }
    Ok(Instance {
        name,
        num_vertices: config.instance.num_vertices,
        root: config.instance.root,
        arcs,
    })
}
