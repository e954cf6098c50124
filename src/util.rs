use crate::rand_xoshiro::rand_core::RngCore;
use serde::{Deserialize, Serialize};

cfg_if::cfg_if! {
    if #[cfg(feature="u32_index")] {
        // use u32 to store index, for less memory usage
        pub type QubitIndex = u32;  // the index of a qubit in the generated circuit
        pub type QubitNum = QubitIndex;
    } else {
        pub type QubitIndex = usize;
        pub type QubitNum = QubitIndex;
    }
}

/// the number of measurements to look back in the measurement record, `rec[-lookback]`
pub type RecordLookback = usize;

/// the role of a qubit in the rotated surface code
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum QubitRole {
    Data,
    XMeasure,
    ZMeasure,
}

impl QubitRole {
    /// the index space is partitioned in this order: data qubits first, then X measures, then Z measures
    pub const INDEX_ORDER: [QubitRole; 3] = [QubitRole::Data, QubitRole::XMeasure, QubitRole::ZMeasure];

    pub fn is_measure(&self) -> bool {
        !matches!(self, QubitRole::Data)
    }

    /// short name used in visualizer snapshots
    pub fn abbrev(&self) -> &'static str {
        match self {
            QubitRole::Data => "d",
            QubitRole::XMeasure => "x",
            QubitRole::ZMeasure => "z",
        }
    }
}

/// a contiguous range of qubit indices `[start, end)`
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct IndexRange {
    pub range: [QubitIndex; 2],
}

impl IndexRange {
    pub fn new(start: QubitIndex, end: QubitIndex) -> Self {
        debug_assert!(end >= start, "invalid range [{}, {})", start, end);
        Self { range: [start, end] }
    }
    pub fn new_length(start: QubitIndex, length: QubitIndex) -> Self {
        Self::new(start, start + length)
    }
    pub fn is_empty(&self) -> bool {
        self.range[1] == self.range[0]
    }
    #[allow(clippy::unnecessary_cast)]
    pub fn len(&self) -> usize {
        (self.range[1] - self.range[0]) as usize
    }
    pub fn start(&self) -> QubitIndex {
        self.range[0]
    }
    pub fn end(&self) -> QubitIndex {
        self.range[1]
    }
    pub fn contains(&self, qubit_index: QubitIndex) -> bool {
        qubit_index >= self.start() && qubit_index < self.end()
    }
    pub fn iter(&self) -> std::ops::Range<QubitIndex> {
        self.range[0]..self.range[1]
    }
    /// concatenate two adjacent ranges, the lower one first
    pub fn fuse(&self, other: &Self) -> Self {
        assert_eq!(self.end(), other.start(), "only adjacent ranges can fuse");
        Self::new(self.start(), other.end())
    }
}

/// use Xoshiro256StarStar for deterministic random number generator
pub type DeterministicRng = rand_xoshiro::Xoshiro256StarStar;

pub trait F64Rng {
    fn next_f64(&mut self) -> f64;
    fn next_bool(&mut self) -> bool {
        self.next_f64() < 0.5
    }
}

impl F64Rng for DeterministicRng {
    fn next_f64(&mut self) -> f64 {
        f64::from_bits(0x3FF << 52 | self.next_u64() >> 12) - 1.
    }
}
