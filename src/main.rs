use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};
use clap::Parser;
use log::info;
use shader_graph_compiler::document;
use shader_graph_compiler::graph::{NodeId, PortIndex};

/// Compile a shader graph JSON document into GLSL fragment shader source.
#[derive(Debug, Parser)]
#[command(name = "shader-graph", version)]
struct Cli {
    /// Shader graph JSON document.
    graph: PathBuf,

    /// Compile a preview of one output port instead of the whole graph (`<node>:<port>`).
    #[arg(long, value_parser = parse_port_ref)]
    preview: Option<(NodeId, PortIndex)>,

    /// Write the source here instead of stdout.
    #[arg(long, short)]
    output: Option<PathBuf>,

    /// Print the ids a node depends on (itself included) and exit.
    #[arg(long, conflicts_with = "preview")]
    list_ancestors: Option<NodeId>,
}

fn parse_port_ref(s: &str) -> Result<(NodeId, PortIndex)> {
    let (node, port) = s
        .split_once(':')
        .ok_or_else(|| anyhow!("expected <node>:<port>, got '{s}'"))?;
    let node = node
        .trim()
        .parse()
        .with_context(|| format!("invalid node id '{node}'"))?;
    let port = port
        .trim()
        .parse()
        .with_context(|| format!("invalid port index '{port}'"))?;
    Ok((node, port))
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let graph = document::load_graph_from_path(&cli.graph)?;
    info!(
        "loaded {}: {} node(s), {} connection(s)",
        cli.graph.display(),
        graph.nodes().len(),
        graph.connections().len()
    );

    if let Some(node) = cli.list_ancestors {
        let ids: Vec<String> = graph.ancestors(node).iter().map(|id| id.to_string()).collect();
        println!("{}", ids.join(" "));
        return Ok(());
    }

    let source = match cli.preview {
        Some((node, port)) => graph
            .compile_preview(node, port)
            .with_context(|| format!("preview of {node}:{port} failed"))?,
        None => graph.compile().context("shader compilation failed")?,
    };

    match cli.output {
        Some(path) => {
            std::fs::write(&path, &source)
                .with_context(|| format!("failed to write {}", path.display()))?;
            info!("wrote {}", path.display());
        }
        None => print!("{source}"),
    }
    Ok(())
}
