//! Surface Code Memory Circuit
//!
//! Assembles a Z-basis memory experiment: qubit coordinates, the initialization round, a `REPEAT` block of
//! steady-state rounds and the final round that measures every data qubit.
//! The detectors of the final round close the Z stabilizers against the data measurements,
//! and the first row of data qubits (a logical Z operator) forms observable 0.
//!

use super::config::*;
use super::error::*;
use super::geometry::*;
use super::instruction::*;
use super::stabilizer::*;
use super::util::*;
use tracing::{debug, warn};

/// `QUBIT_COORDS` for every qubit in index order
pub fn coord_circuit(layout: &SurfaceCodeLayout) -> Circuit {
    let mut circuit = Circuit::new();
    for (qubit, coordinate) in layout.all_coordinates().enumerate() {
        circuit.qubit_coords(*coordinate, qubit as QubitIndex);
    }
    circuit
}

/// the number of decimal digits used to spell a qubit index in [`label_indices`]
pub fn label_digits(qubit_num: QubitNum) -> u32 {
    let max_index = (qubit_num as usize).saturating_sub(1);
    let mut digits = 1;
    let mut remaining = max_index / 10;
    while remaining > 0 {
        digits += 1;
        remaining /= 10;
    }
    digits.max(2)
}

/// Tag every qubit with its role and index for inspection in the simulator's diagram viewer.
/// `Y_ERROR` marks data qubits, `X_ERROR` the X measures and `Z_ERROR` the Z measures; the digits after the decimal
/// point of the probability spell the qubit index, e.g. `0.01` is qubit 1 and `0.1` is qubit 10 with two digits.
/// This circuit is only meant for labelling, never for simulation.
pub fn label_indices(layout: &SurfaceCodeLayout) -> Circuit {
    let scale = 10f64.powi(label_digits(layout.qubit_num()) as i32);
    let label = |qubit: QubitIndex| qubit as f64 / scale;
    let mut circuit = Circuit::new();
    for qubit in layout.role_range(QubitRole::Data).iter() {
        circuit.y_error(label(qubit), vec![qubit]);
    }
    circuit.tick();
    for qubit in layout.role_range(QubitRole::XMeasure).iter() {
        circuit.x_error(label(qubit), vec![qubit]);
    }
    circuit.tick();
    for qubit in layout.role_range(QubitRole::ZMeasure).iter() {
        circuit.z_error(label(qubit), vec![qubit]);
    }
    circuit
}

/// the repeated middle rounds; the initialization and the final round already cover a 2-round circuit
pub fn rounds_step(layout: &SurfaceCodeLayout, rounds: usize, noise: &UniformNoise) -> Circuit {
    let mut circuit = Circuit::new();
    if rounds <= 2 {
        return circuit;
    }
    let mut body = stabilizers_with_noise(layout, noise);
    body.shift_coords([0., 0., 1.]);
    body.append(consecutive_round_detectors(layout));
    circuit.repeat(rounds - 2, body);
    circuit
}

/// data qubits of the first row, a Z string between the two X boundaries
pub fn observable_data_qubits(layout: &SurfaceCodeLayout) -> Vec<QubitIndex> {
    let first_row = layout.data_qubits.iter().map(|coordinate| coordinate.row2).min();
    layout
        .data_qubits
        .iter()
        .filter(|coordinate| Some(coordinate.row2) == first_row)
        .filter_map(|coordinate| layout.index_of(coordinate))
        .collect()
}

/// the last stabilizer round followed by the destructive measurement of all data qubits
pub fn final_step(layout: &SurfaceCodeLayout, noise: &UniformNoise) -> Circuit {
    let records = RoundRecordLayout::new(layout);
    let data_range = layout.role_range(QubitRole::Data);
    let data_num = data_range.len();
    let data_lookback = |qubit: QubitIndex| -> RecordLookback { data_num - (qubit - data_range.start()) as usize };
    let mut circuit = stabilizers_with_noise(layout, noise);
    circuit.shift_coords([0., 0., 1.]);
    circuit.append(consecutive_round_detectors(layout));
    let data_qubits: Vec<QubitIndex> = data_range.iter().collect();
    circuit.x_error(noise.p(), data_qubits.clone());
    circuit.measure(data_qubits);
    // each Z stabilizer must agree with the parity of its data qubits measured right after it
    for (position, measure) in layout.z_measures.iter().enumerate().rev() {
        let mut lookbacks = vec![records.lookback(QubitRole::ZMeasure, position, 0, data_num)];
        for (_corner, data_qubit) in layout.lattice_neighbors(measure) {
            debug_assert!(data_range.contains(data_qubit));
            lookbacks.push(data_lookback(data_qubit));
        }
        circuit.detector(detector_coordinates(measure, 1.), lookbacks);
    }
    let observable = observable_data_qubits(layout).into_iter().map(data_lookback).collect();
    circuit.observable_include(0, observable);
    circuit
}

/// the whole memory experiment as a typed circuit
pub fn surface_code_circuit(config: &CircuitConfig) -> CircuitResult<Circuit> {
    let layout = prepare_coords(config.distance)?;
    if config.distance % 2 == 0 {
        return Err(CircuitError::EvenDistance(config.distance));
    }
    if config.rounds < 2 {
        warn!(
            rounds = config.rounds,
            "a memory circuit has at least the initialization and the final round, generating 2 rounds"
        );
    }
    let noise = &config.p;
    let mut circuit = coord_circuit(&layout);
    circuit.append(initialization_step(&layout, noise));
    circuit.append(rounds_step(&layout, config.rounds, noise));
    circuit.append(final_step(&layout, noise));
    debug!(
        distance = config.distance,
        rounds = config.rounds,
        p = noise.p(),
        qubits = layout.qubit_num() as usize,
        measurements = circuit.measurement_count(),
        detectors = circuit.detector_count(),
        "generated surface code circuit"
    );
    Ok(circuit)
}

/// the whole memory experiment as simulator circuit text
pub fn surface_code_circuit_string(distance: usize, rounds: usize, p: f64) -> CircuitResult<String> {
    let config = CircuitConfig::new(distance, rounds, p)?;
    Ok(surface_code_circuit(&config)?.to_stim_string())
}
