use clap::Parser;
use serde::Deserialize;
use std::fs;
use std::time::Instant;
use tracing::{debug, info};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};
use tsunagi::error::LayoutConversionError;
use tsunagi::prelude::*;

// --- Canvas export structs (input format specific) ---
// These match the node/edge export of a React Flow canvas and are only used here for
// conversion into a WorkflowLayout.

#[derive(Deserialize)]
struct RawCanvas {
    nodes: Vec<RawNode>,
    edges: Vec<RawEdge>,
}

#[derive(Deserialize)]
struct RawNode {
    id: String,
    position: RawPosition,
    #[serde(default)]
    data: RawNodeData,
}

#[derive(Deserialize, Default)]
struct RawNodeData {
    #[serde(default)]
    inputs: Vec<RawHandle>,
    #[serde(default)]
    outputs: Vec<RawHandle>,
}

#[derive(Deserialize)]
struct RawHandle {
    id: String,
    #[serde(default)]
    x: f64,
    #[serde(default)]
    y: f64,
}

#[derive(Deserialize)]
struct RawPosition {
    x: f64,
    y: f64,
}

#[derive(Deserialize)]
struct RawEdge {
    id: String,
    source: String,
    #[serde(alias = "sourceHandle")]
    source_handle: String,
    target: String,
    #[serde(alias = "targetHandle")]
    target_handle: String,
}

/// Either a native layout or a canvas export. Canvas exports are tried first because
/// every field of the native layout is optional.
#[derive(Deserialize)]
#[serde(untagged)]
enum LayoutFile {
    Canvas(RawCanvas),
    Native(WorkflowLayout),
}

// --- Converter Implementation ---

impl IntoLayout for RawCanvas {
    fn into_layout(self) -> Result<WorkflowLayout, LayoutConversionError> {
        let nodes = self
            .nodes
            .into_iter()
            .map(|raw| {
                let mut node =
                    WorkflowNode::new(raw.id, Position::new(raw.position.x, raw.position.y));
                for handle in raw.data.inputs {
                    node = node.with_input(handle.id, Position::new(handle.x, handle.y));
                }
                for handle in raw.data.outputs {
                    node = node.with_output(handle.id, Position::new(handle.x, handle.y));
                }
                node
            })
            .collect();

        let connections = self
            .edges
            .into_iter()
            .map(|raw| {
                if raw.id.is_empty() {
                    return Err(LayoutConversionError::ValidationError(format!(
                        "edge {} -> {} has an empty id",
                        raw.source, raw.target
                    )));
                }
                Ok(Connection::new(
                    ConnectionId::new(raw.id),
                    Endpoint::new(raw.source, raw.source_handle),
                    Endpoint::new(raw.target, raw.target_handle),
                ))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(WorkflowLayout::new(nodes, connections))
    }
}

impl IntoLayout for LayoutFile {
    fn into_layout(self) -> Result<WorkflowLayout, LayoutConversionError> {
        match self {
            LayoutFile::Canvas(canvas) => canvas.into_layout(),
            LayoutFile::Native(layout) => layout.into_layout(),
        }
    }
}

/// Replays a gesture script against a workflow layout and prints the resulting graph
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Path to the layout JSON file (native layout or canvas export)
    layout_path: String,
    /// Path to the gesture script JSON file
    script_path: String,

    /// Optional store configuration JSON file
    #[arg(short, long)]
    config: Option<String>,

    /// Write the resulting layout here (`.json` for JSON, anything else for binary)
    #[arg(short, long)]
    output: Option<String>,

    /// Print every applied event and enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let total_start = Instant::now();

    // --- 1. Loading ---
    let config = match &cli.config {
        Some(path) => StoreConfig::from_file(path)
            .unwrap_or_else(|e| exit_with_error(&format!("Failed to load config: {}", e))),
        None => StoreConfig::default(),
    };
    let layout_json = fs::read_to_string(&cli.layout_path).unwrap_or_else(|e| {
        exit_with_error(&format!(
            "Failed to read layout file '{}': {}",
            cli.layout_path, e
        ))
    });
    let script_json = fs::read_to_string(&cli.script_path).unwrap_or_else(|e| {
        exit_with_error(&format!(
            "Failed to read script file '{}': {}",
            cli.script_path, e
        ))
    });

    // --- 2. Parsing and Conversion ---
    let layout_file: LayoutFile = serde_json::from_str(&layout_json)
        .unwrap_or_else(|e| exit_with_error(&format!("Failed to parse layout JSON: {}", e)));
    let layout = layout_file
        .into_layout()
        .unwrap_or_else(|e| exit_with_error(&format!("Failed to convert layout: {}", e)));
    let script: Vec<GestureEvent> = serde_json::from_str(&script_json)
        .unwrap_or_else(|e| exit_with_error(&format!("Failed to parse gesture script: {}", e)));

    let mut editor = WorkflowEditor::with_store(ConnectionStore::with_config(config));
    editor
        .load(layout)
        .unwrap_or_else(|e| exit_with_error(&format!("Invalid layout: {}", e)));
    info!(
        nodes = editor.node_count(),
        connections = editor.store().len(),
        events = script.len(),
        "layout loaded"
    );

    // --- 3. Replay ---
    let replay_start = Instant::now();
    let mut committed = 0usize;
    let mut rejected = 0usize;
    let mut ignored = 0usize;
    for (index, event) in script.iter().enumerate() {
        let applied = editor.apply(event);
        match &applied {
            Applied::Finished(FinishOutcome::Committed(_)) => committed += 1,
            Applied::Finished(FinishOutcome::Rejected(_)) => rejected += 1,
            Applied::Ignored => {
                ignored += 1;
                debug!(
                    index,
                    endpoint = ?event.endpoint(),
                    position = ?event.position(),
                    "event had no effect"
                );
            }
            _ => {}
        }
        if cli.verbose {
            println!("  [{:>4}] {:?} -> {:?}", index, event, applied);
        }
    }
    let replay_duration = replay_start.elapsed();

    // --- 4. Results ---
    let snapshot = editor.snapshot();
    println!("\nConnections ({}):", snapshot.connections.len());
    for connection in &snapshot.connections {
        println!("  {}", connection);
    }
    if let Some(pending) = editor.store().pending() {
        println!(
            "\nPending connection from {} (free end at {})",
            pending.origin, pending.free_end
        );
    }

    if let Some(output) = &cli.output {
        let result = if output.ends_with(".json") {
            snapshot
                .to_json_pretty()
                .and_then(|json| {
                    fs::write(output, json).map_err(|e| ArtifactError::Io {
                        path: output.clone(),
                        message: e.to_string(),
                    })
                })
        } else {
            snapshot.save(output)
        };
        result.unwrap_or_else(|e| exit_with_error(&format!("Failed to write output: {}", e)));
        println!("\nLayout written to '{}'", output);
    }

    println!("\n--- Replay Summary ---");
    println!("Nodes:                {}", snapshot.nodes.len());
    println!("Events Applied:       {}", script.len());
    println!("Connections Made:     {}", committed);
    println!("Attempts Rejected:    {}", rejected);
    println!("Events Ignored:       {}", ignored);
    println!("Replay:               {:?}", replay_duration);
    println!("Total Execution:      {:?}", total_start.elapsed());
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose { "tsunagi=debug,info" } else { "tsunagi=info,warn" };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into()))
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn exit_with_error(message: &str) -> ! {
    eprintln!("\nError: {}", message);
    std::process::exit(1);
}
