extern crate cfg_if;
extern crate rand_xoshiro;
extern crate serde;
#[macro_use] extern crate serde_json;
extern crate chrono;
extern crate derivative;
extern crate urlencoding;
extern crate thiserror;
extern crate tracing;
extern crate clap;

pub mod util;
pub mod error;
pub mod config;
pub mod geometry;
pub mod instruction;
pub mod lattice;
pub mod stabilizer;
pub mod surface_code;
pub mod visualize;
pub mod cli;
#[cfg(test)]
mod tableau;

use error::*;


/// generate the noisy Z-basis memory experiment of a rotated surface code as simulator circuit text,
/// e.g. `surface_code_circuit_string(5, 10, 0.001)` for distance 5, 10 rounds and a physical error rate of 0.1%
pub fn surface_code_circuit_string(distance: usize, rounds: usize, p: f64) -> CircuitResult<String> {
    surface_code::surface_code_circuit_string(distance, rounds, p)
}
