use crate::config::*;
use crate::error::*;
use crate::geometry::*;
use crate::lattice::*;
use crate::surface_code::*;
use crate::visualize::*;
use clap::{Parser, Subcommand};
use std::fs::File;
use std::io::Write;
use tracing::info;

#[derive(Parser, Clone)]
#[clap(author = clap::crate_authors!(", "))]
#[clap(version = env!("CARGO_PKG_VERSION"))]
#[clap(about = "Noisy rotated surface code memory circuit generator")]
#[clap(color = clap::ColorChoice::Auto)]
#[clap(propagate_version = true)]
#[clap(subcommand_required = true)]
#[clap(arg_required_else_help = true)]
pub struct Cli {
    #[clap(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Clone)]
enum Commands {
    /// generate the Z-basis memory experiment circuit
    Generate {
        /// code distance, an odd number no smaller than 3
        #[clap(value_parser)]
        d: usize,
        /// total rounds of stabilizer measurement, at least 2 are generated
        #[clap(value_parser)]
        rounds: usize,
        /// physical error rate of every noise channel
        #[clap(value_parser)]
        p: f64,
        /// write the circuit to this file instead of stdout
        #[clap(short = 'o', long)]
        output: Option<String>,
        /// json object overriding the positional parameters, e.g. {"rounds":10}
        #[clap(long, default_value = "{}")]
        config: String,
    },
    /// print the qubit coordinates followed by a circuit that labels every qubit with its role and index
    Labels {
        /// code distance
        #[clap(value_parser)]
        d: usize,
    },
    /// print the qubit layout as json
    Layout {
        /// code distance
        #[clap(value_parser)]
        d: usize,
    },
    /// dump the layout and the four CX passes into a visualizer file
    Visualize {
        /// code distance
        #[clap(value_parser)]
        d: usize,
        /// file name under the visualizer data folder, timestamped by default
        #[clap(long)]
        filename: Option<String>,
    },
}

/// positional parameters overlaid with the keys of a json object
fn merge_config(distance: usize, rounds: usize, p: f64, config: &str) -> CircuitResult<CircuitConfig> {
    let overrides: serde_json::Map<String, serde_json::Value> = serde_json::from_str(config)?;
    let mut object = serde_json::Map::new();
    object.insert("distance".to_string(), json!(distance));
    object.insert("rounds".to_string(), json!(rounds));
    object.insert("p".to_string(), json!(p));
    object.extend(overrides);
    Ok(serde_json::from_value(serde_json::Value::Object(object))?)
}

impl Cli {
    pub fn run(self) -> CircuitResult<()> {
        match self.command {
            Commands::Generate { d, rounds, p, output, config } => {
                let config = merge_config(d, rounds, p, &config)?;
                let text = surface_code_circuit(&config)?.to_stim_string();
                match output {
                    Some(filename) => {
                        let mut file = File::create(&filename)?;
                        file.write_all(text.as_bytes())?;
                        info!(filename = filename.as_str(), bytes = text.len(), "circuit written");
                    }
                    None => print!("{}", text),
                }
            }
            Commands::Labels { d } => {
                let layout = prepare_coords(d)?;
                let mut circuit = coord_circuit(&layout);
                circuit.append(label_indices(&layout));
                print!("{}", circuit);
            }
            Commands::Layout { d } => {
                let layout = prepare_coords(d)?;
                println!("{}", layout.snapshot(false));
            }
            Commands::Visualize { d, filename } => {
                let layout = prepare_coords(d)?;
                let filename = filename.unwrap_or_else(auto_visualize_data_filename);
                std::fs::create_dir_all(visualize_data_folder())?;
                let mut visualizer = Visualizer::new(Some(visualize_data_folder() + filename.as_str()))?;
                visualizer.set_positions(layout.get_positions(), true);  // automatic center all qubits
                visualizer.snapshot("layout".to_string(), &layout)?;
                for pass in 0..LATTICE_PASSES {
                    let cx_layer = CxLayer { layout: &layout, pass };
                    visualizer.snapshot_combined(format!("cx pass {}", pass), vec![&layout, &cx_layer])?;
                }
                print_visualize_link_with_parameters(&filename, vec![("distance".to_string(), d.to_string())]);
            }
        }
        Ok(())
    }
}
