//! Circuit Instructions
//!
//! A typed representation of the stabilizer simulator's line-oriented circuit language.
//! Circuits are built as lists of [`Instruction`] and only turned into text by [`Circuit::to_stim_string`]
//! (or the [`std::fmt::Display`] implementation), so that the structure can be checked before serialization.
//!

use super::geometry::Coordinate;
use super::util::*;
use std::fmt::{self, Write};

#[derive(Debug, Clone, PartialEq)]
pub enum Instruction {
    /// `QUBIT_COORDS(col,row) qubit`
    QubitCoords { coordinate: Coordinate, qubit: QubitIndex },
    /// `R`: reset to |0>
    Reset { targets: Vec<QubitIndex> },
    /// `H`
    Hadamard { targets: Vec<QubitIndex> },
    /// `CX`: pairs of (control, target)
    Cx { pairs: Vec<(QubitIndex, QubitIndex)> },
    /// `M`: Z basis measurement, each target appends one bit to the measurement record
    Measure { targets: Vec<QubitIndex> },
    XError { p: f64, targets: Vec<QubitIndex> },
    YError { p: f64, targets: Vec<QubitIndex> },
    ZError { p: f64, targets: Vec<QubitIndex> },
    Depolarize1 { p: f64, targets: Vec<QubitIndex> },
    Depolarize2 { p: f64, pairs: Vec<(QubitIndex, QubitIndex)> },
    Tick,
    ShiftCoords { shift: [f64; 3] },
    /// the parity of the referenced measurements is deterministic without noise
    Detector { coordinates: [f64; 3], records: Vec<RecordLookback> },
    ObservableInclude { observable: usize, records: Vec<RecordLookback> },
    Repeat { count: usize, body: Circuit },
}

fn write_targets(out: &mut impl Write, targets: &[QubitIndex]) -> fmt::Result {
    for target in targets.iter() {
        write!(out, " {}", target)?;
    }
    Ok(())
}

fn write_pairs(out: &mut impl Write, pairs: &[(QubitIndex, QubitIndex)]) -> fmt::Result {
    for (first, second) in pairs.iter() {
        write!(out, " {} {}", first, second)?;
    }
    Ok(())
}

fn write_records(out: &mut impl Write, records: &[RecordLookback]) -> fmt::Result {
    for lookback in records.iter() {
        write!(out, " rec[-{}]", lookback)?;
    }
    Ok(())
}

impl Instruction {
    /// the number of measurement record bits this instruction appends
    pub fn measurement_count(&self) -> usize {
        match self {
            Instruction::Measure { targets } => targets.len(),
            Instruction::Repeat { count, body } => count * body.measurement_count(),
            _ => 0,
        }
    }

    pub fn detector_count(&self) -> usize {
        match self {
            Instruction::Detector { .. } => 1,
            Instruction::Repeat { count, body } => count * body.detector_count(),
            _ => 0,
        }
    }

    /// rough size of the serialized text, used to pre-size the output buffer
    fn estimated_text_len(&self) -> usize {
        match self {
            Instruction::Reset { targets }
            | Instruction::Hadamard { targets }
            | Instruction::Measure { targets }
            | Instruction::XError { targets, .. }
            | Instruction::YError { targets, .. }
            | Instruction::ZError { targets, .. }
            | Instruction::Depolarize1 { targets, .. } => 24 + 4 * targets.len(),
            Instruction::Cx { pairs } | Instruction::Depolarize2 { pairs, .. } => 24 + 8 * pairs.len(),
            Instruction::Detector { records, .. } | Instruction::ObservableInclude { records, .. } => 32 + 10 * records.len(),
            Instruction::Repeat { body, .. } => 16 + body.estimated_text_len(),
            _ => 24,
        }
    }

    fn write_stim(&self, out: &mut impl Write, indent: usize) -> fmt::Result {
        for _ in 0..indent {
            out.write_str("    ")?;
        }
        match self {
            Instruction::QubitCoords { coordinate, qubit } => {
                write!(out, "QUBIT_COORDS({},{}) {}", coordinate.col(), coordinate.row(), qubit)?;
            }
            Instruction::Reset { targets } => {
                out.write_str("R")?;
                write_targets(out, targets)?;
            }
            Instruction::Hadamard { targets } => {
                out.write_str("H")?;
                write_targets(out, targets)?;
            }
            Instruction::Cx { pairs } => {
                out.write_str("CX")?;
                write_pairs(out, pairs)?;
            }
            Instruction::Measure { targets } => {
                out.write_str("M")?;
                write_targets(out, targets)?;
            }
            Instruction::XError { p, targets } => {
                write!(out, "X_ERROR({})", p)?;
                write_targets(out, targets)?;
            }
            Instruction::YError { p, targets } => {
                write!(out, "Y_ERROR({})", p)?;
                write_targets(out, targets)?;
            }
            Instruction::ZError { p, targets } => {
                write!(out, "Z_ERROR({})", p)?;
                write_targets(out, targets)?;
            }
            Instruction::Depolarize1 { p, targets } => {
                write!(out, "DEPOLARIZE1({})", p)?;
                write_targets(out, targets)?;
            }
            Instruction::Depolarize2 { p, pairs } => {
                write!(out, "DEPOLARIZE2({})", p)?;
                write_pairs(out, pairs)?;
            }
            Instruction::Tick => {
                out.write_str("TICK")?;
            }
            Instruction::ShiftCoords { shift } => {
                write!(out, "SHIFT_COORDS({}, {}, {})", shift[0], shift[1], shift[2])?;
            }
            Instruction::Detector { coordinates, records } => {
                write!(out, "DETECTOR({}, {}, {})", coordinates[0], coordinates[1], coordinates[2])?;
                write_records(out, records)?;
            }
            Instruction::ObservableInclude { observable, records } => {
                write!(out, "OBSERVABLE_INCLUDE({})", observable)?;
                write_records(out, records)?;
            }
            Instruction::Repeat { count, body } => {
                writeln!(out, "REPEAT {} {{", count)?;
                body.write_stim(out, indent + 1)?;
                for _ in 0..indent {
                    out.write_str("    ")?;
                }
                out.write_str("}")?;
            }
        }
        out.write_char('\n')
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_stim(f, 0)
    }
}

/// an ordered list of instructions; builder methods silently skip operations without any target
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Circuit {
    pub instructions: Vec<Instruction>,
}

impl Circuit {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }

    pub fn push(&mut self, instruction: Instruction) {
        self.instructions.push(instruction);
    }

    /// move all instructions of another fragment to the end of this one
    pub fn append(&mut self, mut other: Circuit) {
        self.instructions.append(&mut other.instructions);
    }

    pub fn qubit_coords(&mut self, coordinate: Coordinate, qubit: QubitIndex) {
        self.push(Instruction::QubitCoords { coordinate, qubit });
    }

    pub fn reset(&mut self, targets: Vec<QubitIndex>) {
        if !targets.is_empty() {
            self.push(Instruction::Reset { targets });
        }
    }

    pub fn hadamard(&mut self, targets: Vec<QubitIndex>) {
        if !targets.is_empty() {
            self.push(Instruction::Hadamard { targets });
        }
    }

    pub fn cx(&mut self, pairs: Vec<(QubitIndex, QubitIndex)>) {
        if !pairs.is_empty() {
            self.push(Instruction::Cx { pairs });
        }
    }

    pub fn measure(&mut self, targets: Vec<QubitIndex>) {
        if !targets.is_empty() {
            self.push(Instruction::Measure { targets });
        }
    }

    pub fn x_error(&mut self, p: f64, targets: Vec<QubitIndex>) {
        if !targets.is_empty() {
            self.push(Instruction::XError { p, targets });
        }
    }

    pub fn y_error(&mut self, p: f64, targets: Vec<QubitIndex>) {
        if !targets.is_empty() {
            self.push(Instruction::YError { p, targets });
        }
    }

    pub fn z_error(&mut self, p: f64, targets: Vec<QubitIndex>) {
        if !targets.is_empty() {
            self.push(Instruction::ZError { p, targets });
        }
    }

    pub fn depolarize1(&mut self, p: f64, targets: Vec<QubitIndex>) {
        if !targets.is_empty() {
            self.push(Instruction::Depolarize1 { p, targets });
        }
    }

    pub fn depolarize2(&mut self, p: f64, pairs: Vec<(QubitIndex, QubitIndex)>) {
        if !pairs.is_empty() {
            self.push(Instruction::Depolarize2 { p, pairs });
        }
    }

    pub fn tick(&mut self) {
        self.push(Instruction::Tick);
    }

    pub fn shift_coords(&mut self, shift: [f64; 3]) {
        self.push(Instruction::ShiftCoords { shift });
    }

    pub fn detector(&mut self, coordinates: [f64; 3], records: Vec<RecordLookback>) {
        debug_assert!(records.iter().all(|&lookback| lookback > 0), "record lookback starts from 1");
        self.push(Instruction::Detector { coordinates, records });
    }

    pub fn observable_include(&mut self, observable: usize, records: Vec<RecordLookback>) {
        debug_assert!(records.iter().all(|&lookback| lookback > 0), "record lookback starts from 1");
        self.push(Instruction::ObservableInclude { observable, records });
    }

    pub fn repeat(&mut self, count: usize, body: Circuit) {
        if count > 0 && !body.is_empty() {
            self.push(Instruction::Repeat { count, body });
        }
    }

    /// total number of measurement record bits, counting every repetition
    pub fn measurement_count(&self) -> usize {
        self.instructions.iter().map(|instruction| instruction.measurement_count()).sum()
    }

    pub fn detector_count(&self) -> usize {
        self.instructions.iter().map(|instruction| instruction.detector_count()).sum()
    }

    /// an equivalent circuit with all `REPEAT` blocks unrolled
    pub fn flattened(&self) -> Circuit {
        let mut flat = Circuit::new();
        for instruction in self.instructions.iter() {
            match instruction {
                Instruction::Repeat { count, body } => {
                    let flat_body = body.flattened();
                    for _ in 0..*count {
                        flat.instructions.extend(flat_body.instructions.iter().cloned());
                    }
                }
                _ => flat.push(instruction.clone()),
            }
        }
        flat
    }

    fn estimated_text_len(&self) -> usize {
        self.instructions.iter().map(|instruction| instruction.estimated_text_len()).sum()
    }

    fn write_stim(&self, out: &mut impl Write, indent: usize) -> fmt::Result {
        for instruction in self.instructions.iter() {
            instruction.write_stim(out, indent)?;
        }
        Ok(())
    }

    /// serialize into the simulator's circuit text
    pub fn to_stim_string(&self) -> String {
        let mut text = String::with_capacity(self.estimated_text_len());
        self.write_stim(&mut text, 0).expect("writing to a String never fails");
        text
    }
}

impl fmt::Display for Circuit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_stim(f, 0)
    }
}
