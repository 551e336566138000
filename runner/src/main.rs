extern crate kruskal_mst;

use clap::Parser;
use kruskal_mst::{Edge, ForestPolicy, Graph, MstBuilder, MstError, Snapshot};
use std::io::{self, Write};
use std::path::PathBuf;
use std::thread;
use std::time::Duration;
use thiserror::Error;

#[derive(Parser, Debug)]
#[command(version, about = "Builds the minimum spanning tree of a switch network")]
struct Arguments {
    #[arg(help = "edge list file, one `u v bandwidth` connection per line")]
    input: PathBuf,

    #[arg(long, default_value_t = 500, help = "pause between trace steps in milliseconds")]
    delay_ms: u64,

    #[arg(long, help = "fail instead of printing a spanning forest")]
    require_tree: bool,
}

#[derive(Debug, Error)]
enum RunnerError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("line {line}: {reason}")]
    Parse { line: usize, reason: String },

    #[error(transparent)]
    Mst(#[from] MstError),
}

fn parse_edges(text: &str) -> Result<Vec<Edge<String>>, RunnerError> {
    let mut edges = Vec::new();
    for (index, raw) in text.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let parse_error = |reason: String| RunnerError::Parse {
            line: index + 1,
            reason,
        };

        let fields: Vec<&str> = line.split_whitespace().collect();
        let [u, v, weight] = fields[..] else {
            return Err(parse_error(format!(
                "expected `u v bandwidth`, got {} fields",
                fields.len()
            )));
        };
        let weight = weight
            .parse::<u64>()
            .map_err(|e| parse_error(format!("bad bandwidth {weight:?}: {e}")))?;
        edges.push(Edge::new(u.to_string(), v.to_string(), weight));
    }
    Ok(edges)
}

fn print_step(out: &mut impl Write, snapshot: &Snapshot<'_, String>) -> io::Result<()> {
    if let Some(edge) = snapshot.latest() {
        writeln!(
            out,
            "{}\t{}\t{}\t{}\t{}",
            snapshot.step(),
            edge.u(),
            edge.v(),
            edge.weight(),
            snapshot.total_weight()
        )?;
    }
    Ok(())
}

fn main() -> Result<(), RunnerError> {
    env_logger::init();
    let args = Arguments::parse();
    log::info!("{args:?}");

    let text = std::fs::read_to_string(&args.input)?;
    let graph = Graph::from_edges(parse_edges(&text)?);
    if graph.edges().is_empty() {
        log::warn!("No valid connections submitted.");
        return Ok(());
    }

    let policy = if args.require_tree {
        ForestPolicy::Reject
    } else {
        ForestPolicy::Allow
    };
    let delay = Duration::from_millis(args.delay_ms);
    let mut out = io::stdout().lock();
    writeln!(out, "Step\tU\tV\tBandwidth\tTotal")?;

    let mut write_error = None;
    let mst = MstBuilder::new(policy).build_observed(
        graph.nodes(),
        graph.edges(),
        &mut |snapshot: &Snapshot<'_, String>| {
            if write_error.is_none() {
                write_error = print_step(&mut out, snapshot).err();
                thread::sleep(delay);
            }
        },
    )?;
    if let Some(e) = write_error {
        return Err(e.into());
    }

    writeln!(
        out,
        "Minimum spanning tree: {} edges, total bandwidth {}, {} component(s)",
        mst.edge_count(),
        mst.total_weight(),
        mst.components()
    )?;
    Ok(())
}
