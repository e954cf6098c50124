//! Noisy CX Lattice
//!
//! Every stabilizer round entangles each measure qubit with its (up to four) data neighbors in four timesteps.
//! In each timestep every measure qubit reaches one diagonal corner, so no qubit takes part in two CX at once:
//!
//! - Z measures visit corners top-left, top-right, bottom-left, bottom-right; the data qubit is the control
//! - X measures visit corners top-left, bottom-left, top-right, bottom-right; the measure qubit is the control
//!
//! The two traversal orders are what keeps the schedule free of conflicts and hook errors aligned with the boundaries.
//!

use super::config::*;
use super::geometry::*;
use super::instruction::*;
use super::util::*;
use super::visualize::*;

/// number of CX timesteps in one stabilizer round
pub const LATTICE_PASSES: usize = 4;

/// the corner visited by X measures in each pass, as an index into [`adjacent_coords`]
pub const X_CORNER_ORDER: [usize; LATTICE_PASSES] = [0, 2, 1, 3];

/// the corner visited by Z measures in each pass, as an index into [`adjacent_coords`]
pub const Z_CORNER_ORDER: [usize; LATTICE_PASSES] = [0, 1, 2, 3];

/// (control, target) pairs of one pass: Z measures first, then X measures
pub fn cx_layer(layout: &SurfaceCodeLayout, pass: usize) -> Vec<(QubitIndex, QubitIndex)> {
    assert!(pass < LATTICE_PASSES, "pass {} out of range", pass);
    let mut pairs = Vec::with_capacity(layout.x_measures.len() + layout.z_measures.len());
    let z_range = layout.role_range(QubitRole::ZMeasure);
    for (measure_qubit, measure) in z_range.iter().zip(layout.z_measures.iter()) {
        let neighbor = adjacent_coords(measure)[Z_CORNER_ORDER[pass]];
        if let Some(data_qubit) = layout.index_of(&neighbor) {
            pairs.push((data_qubit, measure_qubit));
        }
    }
    let x_range = layout.role_range(QubitRole::XMeasure);
    for (measure_qubit, measure) in x_range.iter().zip(layout.x_measures.iter()) {
        let neighbor = adjacent_coords(measure)[X_CORNER_ORDER[pass]];
        if let Some(data_qubit) = layout.index_of(&neighbor) {
            pairs.push((measure_qubit, data_qubit));
        }
    }
    pairs
}

/// lattice qubits that do not take part in any of the given pairs, in index order
pub fn idle_qubits(layout: &SurfaceCodeLayout, pairs: &[(QubitIndex, QubitIndex)]) -> Vec<QubitIndex> {
    let mut is_active = vec![false; layout.qubit_num() as usize];
    for &(control, target) in pairs.iter() {
        is_active[control as usize] = true;
        is_active[target as usize] = true;
    }
    layout.all_range().iter().filter(|&qubit| !is_active[qubit as usize]).collect()
}

/// the CX timesteps of one stabilizer round, each followed by two-qubit noise on the active pairs,
/// single-qubit noise on idle qubits and a `TICK`
pub fn lattice_with_noise(layout: &SurfaceCodeLayout, noise: &UniformNoise) -> Circuit {
    let p = noise.p();
    let mut circuit = Circuit::new();
    for pass in 0..LATTICE_PASSES {
        let pairs = cx_layer(layout, pass);
        let idle = idle_qubits(layout, &pairs);
        circuit.cx(pairs.clone());
        circuit.depolarize2(p, pairs);
        circuit.depolarize1(p, idle);
        circuit.tick();
    }
    circuit
}

/// one pass of the lattice, for visualization
pub struct CxLayer<'a> {
    pub layout: &'a SurfaceCodeLayout,
    pub pass: usize,
}

impl SurfaceCodeVisualizer for CxLayer<'_> {
    fn snapshot(&self, abbrev: bool) -> serde_json::Value {
        let layer = cx_layer(self.layout, self.pass);
        let idle = idle_qubits(self.layout, &layer);
        let mut is_idle = vec![false; self.layout.qubit_num() as usize];
        for &qubit in idle.iter() {
            is_idle[qubit as usize] = true;
        }
        let qubits: Vec<serde_json::Value> = is_idle
            .iter()
            .map(|&qubit_idle| json!({ if abbrev { "a" } else { "active" }: if qubit_idle { 0 } else { 1 } }))
            .collect();
        let pairs: Vec<serde_json::Value> = layer
            .into_iter()
            .map(|(control, target)| {
                json!({
                    if abbrev { "c" } else { "control" }: control,
                    if abbrev { "t" } else { "target" }: target,
                })
            })
            .collect();
        json!({
            if abbrev { "p" } else { "pass" }: self.pass,
            "cx": pairs,
            "idle": idle,
            "qubits": qubits,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    #[test]
    fn lattice_first_pass_golden() {
        // cargo test lattice_first_pass_golden -- --nocapture
        let layout = prepare_coords(3).unwrap();
        assert_eq!(cx_layer(&layout, 0), vec![(1, 14), (3, 15), (5, 16), (10, 0), (11, 4), (12, 6)]);
        assert_eq!(cx_layer(&layout, 1), vec![(0, 13), (2, 14), (4, 15), (9, 1), (10, 3), (11, 7)]);
        let circuit = lattice_with_noise(&layout, &UniformNoise::new(0.001).unwrap());
        let text = circuit.to_stim_string();
        let first_pass = "CX 1 14 3 15 5 16 10 0 11 4 12 6
DEPOLARIZE2(0.001) 1 14 3 15 5 16 10 0 11 4 12 6
DEPOLARIZE1(0.001) 2 7 8 9 13
TICK
";
        assert!(text.starts_with(first_pass), "{}", text);
        assert_eq!(circuit.len(), 4 * LATTICE_PASSES);
        assert_eq!(text.matches("TICK").count(), LATTICE_PASSES);
    }

    /// all (measure, data) adjacencies of the stabilizer definitions
    fn all_adjacencies(layout: &SurfaceCodeLayout) -> BTreeSet<(QubitIndex, QubitIndex)> {
        let mut adjacencies = BTreeSet::new();
        for measure in layout.x_measures.iter().chain(layout.z_measures.iter()) {
            let measure_qubit = layout.index_of(measure).unwrap();
            for (_corner, data_qubit) in layout.lattice_neighbors(measure) {
                adjacencies.insert((measure_qubit, data_qubit));
            }
        }
        adjacencies
    }

    #[test]
    fn lattice_four_pass_coverage() {
        // cargo test lattice_four_pass_coverage -- --nocapture
        for distance in [2, 3, 5, 7, 9] {
            let layout = prepare_coords(distance).unwrap();
            let x_range = layout.role_range(QubitRole::XMeasure);
            let mut visited = BTreeSet::new();
            for pass in 0..LATTICE_PASSES {
                let mut used_in_pass = BTreeSet::new();
                for (control, target) in cx_layer(&layout, pass) {
                    assert!(used_in_pass.insert(control), "qubit {} used twice in pass {}", control, pass);
                    assert!(used_in_pass.insert(target), "qubit {} used twice in pass {}", target, pass);
                    // X measures control their data qubits, Z measures are targeted by them
                    let (measure, data) = if x_range.contains(control) { (control, target) } else { (target, control) };
                    assert_eq!(layout.role_of(data), QubitRole::Data);
                    assert!(visited.insert((measure, data)), "pair ({}, {}) repeated", measure, data);
                }
            }
            assert_eq!(visited, all_adjacencies(&layout));
        }
    }

    #[test]
    fn lattice_idle_complement() {
        // cargo test lattice_idle_complement -- --nocapture
        let layout = prepare_coords(5).unwrap();
        for pass in 0..LATTICE_PASSES {
            let pairs = cx_layer(&layout, pass);
            let idle = idle_qubits(&layout, &pairs);
            assert_eq!(idle.len() + 2 * pairs.len(), layout.qubit_num() as usize);
            assert!(idle.windows(2).all(|window| window[0] < window[1]));
        }
    }

    #[test]
    fn lattice_layer_snapshot() {
        // cargo test lattice_layer_snapshot -- --nocapture
        let layout = prepare_coords(3).unwrap();
        let value = CxLayer { layout: &layout, pass: 0 }.snapshot(false);
        assert_eq!(value["pass"], json!(0));
        assert_eq!(value["cx"][0], json!({"control": 1, "target": 14}));
        assert_eq!(value["idle"], json!([2, 7, 8, 9, 13]));
        assert_eq!(value["qubits"][1], json!({"active": 1}));
        assert_eq!(value["qubits"][2], json!({"active": 0}));
        let abbrev = CxLayer { layout: &layout, pass: 3 }.snapshot(true);
        assert_eq!(abbrev["p"], json!(3));
    }
}
