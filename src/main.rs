extern crate clap;
extern crate tracing_subscriber;

use clap::Parser;
use surface_code_circuit::cli::Cli;
use tracing_subscriber::EnvFilter;

pub fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();
    if let Err(error) = Cli::parse().run() {
        eprintln!("error: {}", error);
        std::process::exit(1);
    }
}
