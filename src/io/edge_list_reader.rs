use std::fs::File;
use std::io::{BufRead, BufReader};

use anyhow::{bail, ensure, Context};
use arborescence::Vertex;
use log::debug;

use crate::io::{is_skipped, parse_arc};
use crate::problem::Instance;

/**
Plain edge-list instances.

```text
<name>
<num_vertices>
<num_arcs>

from,to,weight[,u]
...
```

Blank lines and lines starting with `#` are ignored anywhere. The header is
the first three data lines, followed by exactly `num_arcs` arc lines. The
format carries no root.
 */
pub fn load_instance(path: impl Into<String>) -> anyhow::Result<Instance> {
    let path = path.into();
    let f = File::open(&path).with_context(|| format!("cannot open instance {}", path))?;
    let instance =
        read_instance(BufReader::new(f)).with_context(|| format!("cannot read instance {}", path))?;
    debug!("read {} arcs from {}", instance.num_arcs(), path);
    Ok(instance)
}

pub fn read_instance(reader: impl BufRead) -> anyhow::Result<Instance> {
    let mut lines = reader
        .lines()
        .enumerate()
        .map(|(i, line)| (i + 1, line))
        .filter(|(_, line)| line.as_ref().map_or(true, |it| !is_skipped(it)));

    let mut header = |field: &str| -> anyhow::Result<(usize, String)> {
        match lines.next() {
            Some((no, line)) => Ok((no, line?.trim().to_string())),
            None => bail!("missing header field: {}", field),
        }
    };
    let (_, name) = header("name")?;
    let (no, line) = header("num_vertices")?;
    let num_vertices = line
        .parse::<Vertex>()
        .with_context(|| format!("line {}: invalid number of vertices", no))?;
    let (no, line) = header("num_arcs")?;
    let num_arcs = line
        .parse::<usize>()
        .with_context(|| format!("line {}: invalid number of arcs", no))?;

    let mut arcs = Vec::with_capacity(num_arcs);
    for (no, line) in lines {
        let line = line?;
        let arc = parse_arc(&line).with_context(|| format!("line {}: '{}'", no, line))?;
        arcs.push(arc);
    }
    ensure!(
        arcs.len() == num_arcs,
        "header announces {} arcs, found {}",
        num_arcs,
        arcs.len()
    );

    Ok(Instance {
        name,
        num_vertices,
        root: None,
        arcs,
    })
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use arborescence::Arc;

    use super::*;
    use crate::problem::Num;

    const TINY: &str = "\
# three vertices, one undirected arc
tiny
3
3

0,1,0.5
1,2,1.5
# comment between arcs
2,0,2,u
";

    #[test]
    fn reads_header_and_arcs() {
        let instance = read_instance(Cursor::new(TINY)).unwrap();
        assert_eq!(instance.name, "tiny");
        assert_eq!(instance.num_vertices, 3);
        assert_eq!(instance.root, None);
        assert_eq!(
            instance.arcs,
            vec![
                Arc::new(0, 1, Num::from(0.5)),
                Arc::new(1, 2, Num::from(1.5)),
                Arc::undirected(2, 0, Num::from(2)),
            ]
        );
    }

    #[test]
    fn reports_the_offending_line() {
        let err = read_instance(Cursor::new("g\n2\n2\n\n0,1,1\n1,0,one\n")).unwrap_err();
        assert!(format!("{:#}", err).contains("line 6"), "{:#}", err);

        let err = read_instance(Cursor::new("g\nmany\n2\n")).unwrap_err();
        assert!(format!("{:#}", err).contains("line 2"), "{:#}", err);
    }

    #[test]
    fn rejects_count_mismatch_and_truncation() {
        assert!(read_instance(Cursor::new("g\n2\n2\n\n0,1,1\n")).is_err());
        assert!(read_instance(Cursor::new("g\n2\n")).is_err());
        assert!(read_instance(Cursor::new("")).is_err());
    }

    #[test]
    fn empty_arc_list() {
        let instance = read_instance(Cursor::new("single\n1\n0\n")).unwrap();
        assert_eq!(instance.num_vertices, 1);
        assert!(instance.arcs.is_empty());
    }

    #[test]
    fn missing_file() {
        assert!(load_instance("does/not/exist.txt").is_err());
    }
}
