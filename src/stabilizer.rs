//! Stabilizer Rounds
//!
//! One stabilizer round resets the measure qubits, rotates the X measures into the X basis, runs the CX lattice,
//! rotates back and measures every measure qubit while leaving the data qubits untouched.
//!
//! The order in which measure qubits enter the measurement record is fixed by [`MEASURE_ORDER`];
//! every detector derives its `rec[-k]` lookback from [`RoundRecordLayout`] instead of assuming that order.
//!

use super::config::*;
use super::geometry::*;
use super::instruction::*;
use super::lattice::*;
use super::util::*;

/// measure qubits enter the measurement record in this role order in every stabilizer round
pub const MEASURE_ORDER: [QubitRole; 2] = [QubitRole::XMeasure, QubitRole::ZMeasure];

/// where each measure qubit's outcome lands in the measurement record of a stabilizer round
#[derive(Debug, Clone, Copy)]
pub struct RoundRecordLayout<'a> {
    pub layout: &'a SurfaceCodeLayout,
}

impl<'a> RoundRecordLayout<'a> {
    pub fn new(layout: &'a SurfaceCodeLayout) -> Self {
        Self { layout }
    }

    /// targets of the round's measurement, in record order
    pub fn measure_targets(&self) -> Vec<QubitIndex> {
        MEASURE_ORDER
            .iter()
            .flat_map(|&role| self.layout.role_range(role).iter())
            .collect()
    }

    /// the number of records appended by one round
    pub fn round_size(&self) -> usize {
        MEASURE_ORDER.iter().map(|&role| self.layout.coordinates(role).len()).sum()
    }

    /// lookback of the `position`-th measure qubit of `role`, measured `rounds_back` rounds before the latest round,
    /// with `later_records` measurements appended after the latest round
    pub fn lookback(&self, role: QubitRole, position: usize, rounds_back: usize, later_records: usize) -> RecordLookback {
        let role_order = MEASURE_ORDER
            .iter()
            .position(|&measured| measured == role)
            .unwrap_or_else(|| panic!("{:?} qubits are not measured in a stabilizer round", role));
        let role_len = self.layout.coordinates(role).len();
        assert!(position < role_len, "position {} out of {} {:?} qubits", position, role_len, role);
        let after_in_round: usize = MEASURE_ORDER[role_order + 1..]
            .iter()
            .map(|&later_role| self.layout.coordinates(later_role).len())
            .sum();
        (role_len - position) + after_in_round + rounds_back * self.round_size() + later_records
    }
}

/// the detector coordinate of a measure qubit in the current time slice
pub fn detector_coordinates(coordinate: &Coordinate, time: f64) -> [f64; 3] {
    [coordinate.col(), coordinate.row(), time]
}

/// the measurement block closing a round: rotate X measures back, measurement noise and the measurement itself
fn measurement_block(layout: &SurfaceCodeLayout, p: f64, data_noise_before_measure: bool) -> Circuit {
    let records = RoundRecordLayout::new(layout);
    let mut circuit = Circuit::new();
    circuit.hadamard(layout.indices(QubitRole::XMeasure));
    circuit.depolarize1(p, layout.all_range().iter().collect());
    circuit.tick();
    circuit.x_error(p, layout.measure_range().iter().collect());
    if data_noise_before_measure {
        circuit.depolarize1(p, layout.indices(QubitRole::Data));
        circuit.measure(records.measure_targets());
    } else {
        circuit.measure(records.measure_targets());
        circuit.depolarize1(p, layout.indices(QubitRole::Data));
    }
    circuit.tick();
    circuit
}

/// rotate X measures into the X basis after the reset
fn basis_change_block(layout: &SurfaceCodeLayout, p: f64) -> Circuit {
    let mut circuit = Circuit::new();
    circuit.hadamard(layout.indices(QubitRole::XMeasure));
    circuit.depolarize1(p, layout.all_range().iter().collect());
    circuit.tick();
    circuit
}

/// a steady-state round: the data qubits carry over from the previous round and stay unmeasured
pub fn stabilizers_with_noise(layout: &SurfaceCodeLayout, noise: &UniformNoise) -> Circuit {
    let p = noise.p();
    let measures: Vec<QubitIndex> = layout.measure_range().iter().collect();
    let mut circuit = Circuit::new();
    circuit.reset(measures.clone());
    circuit.x_error(p, measures);
    circuit.depolarize1(p, layout.indices(QubitRole::Data));
    circuit.tick();
    circuit.append(basis_change_block(layout, p));
    circuit.append(lattice_with_noise(layout, noise));
    circuit.append(measurement_block(layout, p, true));
    circuit
}

/// the first round: every qubit starts from a reset, and with the data qubits prepared in |0> each Z stabilizer
/// outcome is deterministic on its own
pub fn initialization_step(layout: &SurfaceCodeLayout, noise: &UniformNoise) -> Circuit {
    let p = noise.p();
    let all_qubits: Vec<QubitIndex> = layout.all_range().iter().collect();
    let mut circuit = Circuit::new();
    circuit.reset(all_qubits.clone());
    circuit.x_error(p, all_qubits);
    circuit.tick();
    circuit.append(basis_change_block(layout, p));
    circuit.append(lattice_with_noise(layout, noise));
    circuit.append(measurement_block(layout, p, false));
    let records = RoundRecordLayout::new(layout);
    for (position, measure) in layout.z_measures.iter().enumerate().rev() {
        circuit.detector(
            detector_coordinates(measure, 0.),
            vec![records.lookback(QubitRole::ZMeasure, position, 0, 0)],
        );
    }
    circuit
}

/// compare every measure qubit of the latest round with its outcome one round earlier;
/// Z measures first, each role from the last qubit backwards
pub fn consecutive_round_detectors(layout: &SurfaceCodeLayout) -> Circuit {
    let records = RoundRecordLayout::new(layout);
    let mut circuit = Circuit::new();
    for role in [QubitRole::ZMeasure, QubitRole::XMeasure] {
        for (position, measure) in layout.coordinates(role).iter().enumerate().rev() {
            circuit.detector(
                detector_coordinates(measure, 0.),
                vec![records.lookback(role, position, 0, 0), records.lookback(role, position, 1, 0)],
            );
        }
    }
    circuit
}
