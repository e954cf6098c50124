//! Stabilizer Tableau
//!
//! A small Aaronson-Gottesman tableau simulator used to check generated circuits: in the absence of noise,
//! every detector and every observable must evaluate to zero no matter how the random measurements fall.
//! Noise channels, coordinates and `TICK` are ignored.
//!

use crate::instruction::*;
use crate::util::*;

pub struct Tableau {
    qubit_num: usize,
    /// rows `0..n` are destabilizers, `n..2n` stabilizers and row `2n` is scratch
    x: Vec<Vec<bool>>,
    z: Vec<Vec<bool>>,
    sign: Vec<bool>,
}

/// the power of `i` picked up when multiplying Pauli (x1, z1) into (x2, z2)
fn phase_exponent(x1: bool, z1: bool, x2: bool, z2: bool) -> i32 {
    let (x2, z2) = (x2 as i32, z2 as i32);
    match (x1, z1) {
        (false, false) => 0,
        (true, true) => z2 - x2,
        (true, false) => z2 * (2 * x2 - 1),
        (false, true) => x2 * (1 - 2 * z2),
    }
}

impl Tableau {
    pub fn new(qubit_num: usize) -> Self {
        let rows = 2 * qubit_num + 1;
        let mut x = vec![vec![false; qubit_num]; rows];
        let mut z = vec![vec![false; qubit_num]; rows];
        for qubit in 0..qubit_num {
            x[qubit][qubit] = true;
            z[qubit + qubit_num][qubit] = true;
        }
        Self { qubit_num, x, z, sign: vec![false; rows] }
    }

    pub fn hadamard(&mut self, a: usize) {
        for row in 0..2 * self.qubit_num {
            self.sign[row] ^= self.x[row][a] && self.z[row][a];
            let x = self.x[row][a];
            self.x[row][a] = self.z[row][a];
            self.z[row][a] = x;
        }
    }

    pub fn cx(&mut self, control: usize, target: usize) {
        for row in 0..2 * self.qubit_num {
            let (xc, zc, xt, zt) = (self.x[row][control], self.z[row][control], self.x[row][target], self.z[row][target]);
            self.sign[row] ^= xc && zt && (xt == zc);
            self.x[row][target] = xt ^ xc;
            self.z[row][control] = zc ^ zt;
        }
    }

    /// apply Pauli X, flipping every generator that anticommutes with it
    pub fn pauli_x(&mut self, a: usize) {
        for row in 0..2 * self.qubit_num {
            self.sign[row] ^= self.z[row][a];
        }
    }

    /// left-multiply row `h` by row `i`
    fn rowsum(&mut self, h: usize, i: usize) {
        let mut exponent = 2 * self.sign[h] as i32 + 2 * self.sign[i] as i32;
        for qubit in 0..self.qubit_num {
            exponent += phase_exponent(self.x[i][qubit], self.z[i][qubit], self.x[h][qubit], self.z[h][qubit]);
        }
        self.sign[h] = exponent.rem_euclid(4) == 2;
        for qubit in 0..self.qubit_num {
            let (xi, zi) = (self.x[i][qubit], self.z[i][qubit]);
            self.x[h][qubit] ^= xi;
            self.z[h][qubit] ^= zi;
        }
    }

    /// Z-basis measurement; returns the outcome and whether it was random
    pub fn measure(&mut self, a: usize, rng: &mut impl F64Rng) -> (bool, bool) {
        let n = self.qubit_num;
        if let Some(p) = (n..2 * n).find(|&row| self.x[row][a]) {
            for row in 0..2 * n {
                if row != p && self.x[row][a] {
                    self.rowsum(row, p);
                }
            }
            self.x[p - n] = self.x[p].clone();
            self.z[p - n] = self.z[p].clone();
            self.sign[p - n] = self.sign[p];
            self.x[p] = vec![false; n];
            self.z[p] = vec![false; n];
            self.z[p][a] = true;
            self.sign[p] = rng.next_bool();
            return (self.sign[p], true)
        }
        let scratch = 2 * n;
        self.x[scratch] = vec![false; n];
        self.z[scratch] = vec![false; n];
        self.sign[scratch] = false;
        for row in 0..n {
            if self.x[row][a] {
                self.rowsum(scratch, row + n);
            }
        }
        (self.sign[scratch], false)
    }

    pub fn reset(&mut self, a: usize, rng: &mut impl F64Rng) {
        let (outcome, _) = self.measure(a, rng);
        if outcome {
            self.pauli_x(a);
        }
    }
}

/// the outcome of one noiseless run
pub struct NoiselessRun {
    pub measurements: Vec<bool>,
    pub detectors: Vec<bool>,
    pub observables: Vec<bool>,
}

fn resolve_records(measurements: &[bool], records: &[RecordLookback]) -> bool {
    records.iter().fold(false, |parity, &lookback| {
        assert!(lookback >= 1 && lookback <= measurements.len(), "rec[-{}] out of range", lookback);
        parity ^ measurements[measurements.len() - lookback]
    })
}

pub fn run_noiseless(circuit: &Circuit, qubit_num: usize, rng: &mut impl F64Rng) -> NoiselessRun {
    let mut tableau = Tableau::new(qubit_num);
    let mut run = NoiselessRun { measurements: vec![], detectors: vec![], observables: vec![] };
    for instruction in circuit.flattened().instructions.iter() {
        match instruction {
            Instruction::Reset { targets } => {
                for &qubit in targets.iter() {
                    tableau.reset(qubit as usize, rng);
                }
            }
            Instruction::Hadamard { targets } => {
                for &qubit in targets.iter() {
                    tableau.hadamard(qubit as usize);
                }
            }
            Instruction::Cx { pairs } => {
                for &(control, target) in pairs.iter() {
                    tableau.cx(control as usize, target as usize);
                }
            }
            Instruction::Measure { targets } => {
                for &qubit in targets.iter() {
                    let (outcome, _) = tableau.measure(qubit as usize, rng);
                    run.measurements.push(outcome);
                }
            }
            Instruction::Detector { records, .. } => {
                run.detectors.push(resolve_records(&run.measurements, records));
            }
            Instruction::ObservableInclude { observable, records } => {
                if run.observables.len() <= *observable {
                    run.observables.resize(*observable + 1, false);
                }
                run.observables[*observable] ^= resolve_records(&run.measurements, records);
            }
            _ => {}
        }
    }
    run
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::*;
    use crate::geometry::*;
    use crate::surface_code::*;
    use crate::rand_xoshiro::rand_core::SeedableRng;

    #[test]
    fn tableau_bell_pair() {
        // cargo test tableau_bell_pair -- --nocapture
        let mut rng = DeterministicRng::seed_from_u64(0);
        let mut saw_one = false;
        for _ in 0..20 {
            let mut tableau = Tableau::new(2);
            tableau.hadamard(0);
            tableau.cx(0, 1);
            let (first, random) = tableau.measure(0, &mut rng);
            assert!(random);
            let (second, random) = tableau.measure(1, &mut rng);
            assert!(!random);
            assert_eq!(first, second);
            saw_one |= first;
        }
        assert!(saw_one);
        // X flips a deterministic outcome; reset brings it back
        let mut tableau = Tableau::new(1);
        tableau.pauli_x(0);
        assert_eq!(tableau.measure(0, &mut rng), (true, false));
        tableau.reset(0, &mut rng);
        assert_eq!(tableau.measure(0, &mut rng), (false, false));
    }

    #[test]
    fn tableau_surface_code_deterministic() {
        // cargo test tableau_surface_code_deterministic -- --nocapture
        for (distance, rounds) in [(3, 1), (3, 2), (3, 5), (5, 3)] {
            let config = CircuitConfig::new(distance, rounds, 0.).unwrap();
            let layout = prepare_coords(distance).unwrap();
            let circuit = surface_code_circuit(&config).unwrap();
            for seed in 0..4 {
                let mut rng = DeterministicRng::seed_from_u64(seed);
                let run = run_noiseless(&circuit, layout.qubit_num() as usize, &mut rng);
                assert_eq!(run.measurements.len(), circuit.measurement_count());
                assert_eq!(run.detectors.len(), circuit.detector_count());
                let fired: Vec<usize> = (0..run.detectors.len()).filter(|&i| run.detectors[i]).collect();
                assert!(fired.is_empty(), "d={} rounds={} seed={}: detectors {:?} fired", distance, rounds, seed, fired);
                assert_eq!(run.observables, vec![false]);
            }
        }
    }

    #[test]
    fn tableau_first_round_x_outcomes_random() {
        // cargo test tableau_first_round_x_outcomes_random -- --nocapture
        // X stabilizers of a fresh |0...0> state are random, which is why the first round only carries Z detectors
        let config = CircuitConfig::new(3, 2, 0.).unwrap();
        let layout = prepare_coords(3).unwrap();
        let circuit = surface_code_circuit(&config).unwrap();
        let mut saw_one = false;
        for seed in 0..8 {
            let mut rng = DeterministicRng::seed_from_u64(seed);
            let run = run_noiseless(&circuit, layout.qubit_num() as usize, &mut rng);
            // the first four records belong to the X measures of the first round
            saw_one |= run.measurements[..4].iter().any(|&outcome| outcome);
        }
        assert!(saw_one);
    }
}
