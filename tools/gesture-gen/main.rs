use clap::Parser;
use rand::{Rng, rngs::ThreadRng};
use std::fs;
use tsunagi::prelude::*;

/// A CLI tool to generate random layouts and gesture scripts for tsunagi-cli
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Where to write the generated layout JSON
    #[arg(long, default_value = "generated_layout.json")]
    layout: String,

    /// Where to write the generated gesture script JSON
    #[arg(long, default_value = "generated_script.json")]
    script: String,

    /// Number of nodes on the canvas
    #[arg(short, long, default_value_t = 8)]
    nodes: usize,

    /// Number of drag gestures in the script
    #[arg(short, long, default_value_t = 40)]
    gestures: usize,
}

const NODE_WIDTH: f64 = 180.0;
const POINT_SPACING: f64 = 24.0;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let mut rng = rand::rng();

    if cli.nodes < 2 {
        eprintln!("Error: --nodes must be at least 2 to connect anything");
        std::process::exit(1);
    }

    println!(
        "Generating {} nodes and {} gestures...",
        cli.nodes, cli.gestures
    );

    let layout = generate_layout(&mut rng, cli.nodes);
    let script = generate_script(&mut rng, &layout, cli.gestures);

    fs::write(&cli.layout, layout.to_json_pretty()?)?;
    fs::write(&cli.script, serde_json::to_string_pretty(&script)?)?;

    println!(
        "Successfully wrote layout to '{}' and {} events to '{}'",
        cli.layout,
        script.len(),
        cli.script
    );
    Ok(())
}

/// Lays nodes out on a loose grid, each with one to three inputs and outputs.
fn generate_layout(rng: &mut ThreadRng, count: usize) -> WorkflowLayout {
    let columns = (count as f64).sqrt().ceil() as usize;
    let nodes = (0..count)
        .map(|i| {
            let x = (i % columns) as f64 * 260.0 + rng.random_range(-20.0..20.0);
            let y = (i / columns) as f64 * 160.0 + rng.random_range(-20.0..20.0);
            let mut node = WorkflowNode::new(format!("node-{}", i), Position::new(x, y));
            for p in 0..rng.random_range(1..=3) {
                node = node.with_input(
                    format!("in-{}", p),
                    Position::new(0.0, POINT_SPACING * (p + 1) as f64),
                );
            }
            for p in 0..rng.random_range(1..=3) {
                node = node.with_output(
                    format!("out-{}", p),
                    Position::new(NODE_WIDTH, POINT_SPACING * (p + 1) as f64),
                );
            }
            node
        })
        .collect();
    println!("-> Generated {} nodes.", count);
    WorkflowLayout::new(nodes, vec![])
}

/// Produces drag gestures, most of them ending on an input, with occasional node
/// moves, cancels and releases over points that reject the drag.
fn generate_script(
    rng: &mut ThreadRng,
    layout: &WorkflowLayout,
    gestures: usize,
) -> Vec<GestureEvent> {
    let mut events = Vec::new();
    for _ in 0..gestures {
        let source = &layout.nodes[rng.random_range(0..layout.nodes.len())];
        let target = &layout.nodes[rng.random_range(0..layout.nodes.len())];
        let output = &source.outputs[rng.random_range(0..source.outputs.len())];

        if rng.random_bool(0.1) {
            events.push(GestureEvent::MoveNode {
                node: source.id.clone(),
                x: source.position.x + rng.random_range(-40.0..40.0),
                y: source.position.y + rng.random_range(-40.0..40.0),
            });
        }

        events.push(GestureEvent::Press {
            node: source.id.clone(),
            point: output.id.clone(),
        });
        for _ in 0..rng.random_range(1..4) {
            events.push(GestureEvent::PointerMove {
                x: rng.random_range(0.0..1200.0),
                y: rng.random_range(0.0..800.0),
            });
        }

        match rng.random_range(0..10) {
            0 => events.push(GestureEvent::ReleaseCanvas),
            1 => events.push(GestureEvent::Cancel),
            2 => events.push(GestureEvent::Release {
                node: target.id.clone(),
                point: target.outputs[0].id.clone(),
            }),
            _ => {
                let input = &target.inputs[rng.random_range(0..target.inputs.len())];
                events.push(GestureEvent::Release {
                    node: target.id.clone(),
                    point: input.id.clone(),
                });
            }
        }
    }
    println!("-> Generated {} events.", events.len());
    events
}
