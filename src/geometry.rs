//! Rotated Surface Code Geometry
//!
//! Data qubits sit on integer coordinates `(col, row)` with `1 <= col, row <= d`, and measure qubits sit on the
//! half-integer plaquette centers between them.
//! Coordinates are stored in half units so that they can be hashed and compared exactly.
//!
//! The qubit index space is partitioned by role: all data qubits first, then all X measures, then all Z measures.
//! Other modules rely on this (e.g. taking all measure qubits as one contiguous [`IndexRange`]).
//!

use super::error::*;
use super::util::*;
use super::visualize::*;
use crate::derivative::Derivative;
use serde::ser::{Serialize, SerializeTuple, Serializer};
use std::collections::HashMap;
use std::fmt;

/// a point on the lattice, stored as twice its `(col, row)` value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Coordinate {
    pub col2: isize,
    pub row2: isize,
}

impl Coordinate {
    /// an integer lattice point, where data qubits live
    pub fn new(col: isize, row: isize) -> Self {
        Self::from_halves(2 * col, 2 * row)
    }

    pub fn from_halves(col2: isize, row2: isize) -> Self {
        Self { col2, row2 }
    }

    pub fn col(&self) -> f64 {
        self.col2 as f64 / 2.
    }

    pub fn row(&self) -> f64 {
        self.row2 as f64 / 2.
    }

    /// shift by a number of half units
    pub fn offset_halves(&self, dcol2: isize, drow2: isize) -> Self {
        Self::from_halves(self.col2 + dcol2, self.row2 + drow2)
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{})", self.col(), self.row())
    }
}

impl Serialize for Coordinate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut tuple = serializer.serialize_tuple(2)?;
        tuple.serialize_element(&self.col())?;
        tuple.serialize_element(&self.row())?;
        tuple.end()
    }
}

/// data qubits `(col, row)` for `col, row` in `[1, distance]`, one row after another
pub fn data_coords(distance: usize) -> Vec<Coordinate> {
    let d = distance as isize;
    let mut coords = Vec::with_capacity(distance * distance);
    for row in 1..=d {
        for col in 1..=d {
            coords.push(Coordinate::new(col, row));
        }
    }
    coords
}

/// Z measure qubits lie strictly between data rows (the last row is excluded), on every other column;
/// the column offset alternates between -0.5 and +0.5 with the row parity
pub fn z_measure_coords(distance: usize) -> Vec<Coordinate> {
    let d = distance as isize;
    let mut coords = Vec::new();
    for row in 1..d {
        for col in (1..=d).step_by(2) {
            if row % 2 == 1 {
                coords.push(Coordinate::from_halves(2 * col - 1, 2 * row + 1));
            } else {
                coords.push(Coordinate::from_halves(2 * col + 1, 2 * row + 1));
            }
        }
    }
    coords
}

/// X measure qubits include one extra row for the boundary stabilizers below the last data row;
/// columns start from the second one and skip the last, with offsets complementary to the Z measures
pub fn x_measure_coords(distance: usize) -> Vec<Coordinate> {
    let d = distance as isize;
    let mut coords = Vec::new();
    for row in 1..=(d + 1) {
        for col in (2..d).step_by(2) {
            if row % 2 == 1 {
                coords.push(Coordinate::from_halves(2 * col + 1, 2 * row - 1));
            } else {
                coords.push(Coordinate::from_halves(2 * col - 1, 2 * row - 1));
            }
        }
    }
    coords
}

/// assign indices in list order
pub fn coords_to_index(coords: &[Coordinate]) -> CircuitResult<HashMap<Coordinate, QubitIndex>> {
    let mut coordinate_to_index = HashMap::<Coordinate, QubitIndex>::with_capacity(coords.len());
    for (position, coordinate) in coords.iter().enumerate() {
        if let Some(&first) = coordinate_to_index.get(coordinate) {
            return Err(CircuitError::DuplicateCoordinate {
                coordinate: *coordinate,
                first: first as usize,
                second: position,
            });
        }
        coordinate_to_index.insert(*coordinate, position as QubitIndex);
    }
    Ok(coordinate_to_index)
}

/// the four diagonal neighbors in the order top-left, top-right, bottom-left, bottom-right;
/// the result is not checked against any lattice
pub fn adjacent_coords(coordinate: &Coordinate) -> [Coordinate; 4] {
    [
        coordinate.offset_halves(-1, -1),
        coordinate.offset_halves(1, -1),
        coordinate.offset_halves(-1, 1),
        coordinate.offset_halves(1, 1),
    ]
}

/// coordinates of all qubits of a given distance together with the coordinate-to-index map
#[derive(Derivative, Clone)]
#[derivative(Debug)]
pub struct SurfaceCodeLayout {
    pub distance: usize,
    pub data_qubits: Vec<Coordinate>,
    pub x_measures: Vec<Coordinate>,
    pub z_measures: Vec<Coordinate>,
    #[derivative(Debug = "ignore")]
    pub coordinate_to_index: HashMap<Coordinate, QubitIndex>,
}

/// the single entry point to the geometry: every other module works on the returned layout
pub fn prepare_coords(distance: usize) -> CircuitResult<SurfaceCodeLayout> {
    SurfaceCodeLayout::new(distance)
}

impl SurfaceCodeLayout {
    pub fn new(distance: usize) -> CircuitResult<Self> {
        if distance < 2 {
            return Err(CircuitError::InvalidDistance(distance));
        }
        let data_qubits = data_coords(distance);
        let x_measures = x_measure_coords(distance);
        let z_measures = z_measure_coords(distance);
        let mut all_qubits = Vec::with_capacity(data_qubits.len() + x_measures.len() + z_measures.len());
        all_qubits.extend_from_slice(&data_qubits);
        all_qubits.extend_from_slice(&x_measures);
        all_qubits.extend_from_slice(&z_measures);
        let coordinate_to_index = coords_to_index(&all_qubits)?;
        Ok(Self {
            distance,
            data_qubits,
            x_measures,
            z_measures,
            coordinate_to_index,
        })
    }

    pub fn qubit_num(&self) -> QubitNum {
        (self.data_qubits.len() + self.x_measures.len() + self.z_measures.len()) as QubitNum
    }

    pub fn coordinates(&self, role: QubitRole) -> &[Coordinate] {
        match role {
            QubitRole::Data => &self.data_qubits,
            QubitRole::XMeasure => &self.x_measures,
            QubitRole::ZMeasure => &self.z_measures,
        }
    }

    /// all coordinates in index order
    pub fn all_coordinates(&self) -> impl Iterator<Item = &Coordinate> {
        self.data_qubits.iter().chain(self.x_measures.iter()).chain(self.z_measures.iter())
    }

    pub fn role_range(&self, role: QubitRole) -> IndexRange {
        let data_num = self.data_qubits.len() as QubitIndex;
        let x_num = self.x_measures.len() as QubitIndex;
        match role {
            QubitRole::Data => IndexRange::new_length(0, data_num),
            QubitRole::XMeasure => IndexRange::new_length(data_num, x_num),
            QubitRole::ZMeasure => IndexRange::new_length(data_num + x_num, self.z_measures.len() as QubitIndex),
        }
    }

    /// X measures followed by Z measures
    pub fn measure_range(&self) -> IndexRange {
        self.role_range(QubitRole::XMeasure).fuse(&self.role_range(QubitRole::ZMeasure))
    }

    pub fn all_range(&self) -> IndexRange {
        IndexRange::new(0, self.qubit_num())
    }

    pub fn indices(&self, role: QubitRole) -> Vec<QubitIndex> {
        self.role_range(role).iter().collect()
    }

    pub fn index_of(&self, coordinate: &Coordinate) -> Option<QubitIndex> {
        self.coordinate_to_index.get(coordinate).copied()
    }

    pub fn contains(&self, coordinate: &Coordinate) -> bool {
        self.coordinate_to_index.contains_key(coordinate)
    }

    pub fn role_of(&self, qubit_index: QubitIndex) -> QubitRole {
        for role in QubitRole::INDEX_ORDER {
            if self.role_range(role).contains(qubit_index) {
                return role;
            }
        }
        panic!("qubit {} out of range [0, {})", qubit_index, self.qubit_num())
    }

    pub fn coordinate_of(&self, qubit_index: QubitIndex) -> Coordinate {
        let role = self.role_of(qubit_index);
        let range = self.role_range(role);
        self.coordinates(role)[(qubit_index - range.start()) as usize]
    }

    /// the (corner, qubit) neighbors of a coordinate that exist on this lattice, corners in [`adjacent_coords`] order
    pub fn lattice_neighbors(&self, coordinate: &Coordinate) -> Vec<(usize, QubitIndex)> {
        adjacent_coords(coordinate)
            .iter()
            .enumerate()
            .filter_map(|(corner, neighbor)| self.index_of(neighbor).map(|qubit| (corner, qubit)))
            .collect()
    }

    /// the positions of all qubits in index order, `i` is the row and `j` is the column
    pub fn get_positions(&self) -> Vec<VisualizePosition> {
        self.all_coordinates()
            .map(|coordinate| VisualizePosition::new(coordinate.row(), coordinate.col(), 0.))
            .collect()
    }

    /// check the index partition invariant: contiguous, one-to-one and ordered by role
    pub fn sanity_check(&self) -> Result<(), String> {
        if self.coordinate_to_index.len() != self.qubit_num() as usize {
            return Err(format!(
                "index map has {} entries but there are {} qubits",
                self.coordinate_to_index.len(),
                self.qubit_num()
            ));
        }
        for role in QubitRole::INDEX_ORDER {
            let range = self.role_range(role);
            for (bias, coordinate) in self.coordinates(role).iter().enumerate() {
                let expected = range.start() + bias as QubitIndex;
                match self.index_of(coordinate) {
                    Some(index) if index == expected => {}
                    found => {
                        return Err(format!(
                            "{:?} qubit {} expects index {} but found {:?}",
                            role, coordinate, expected, found
                        ))
                    }
                }
            }
        }
        for coordinate in self.data_qubits.iter() {
            if coordinate.col2 % 2 != 0 || coordinate.row2 % 2 != 0 {
                return Err(format!("data qubit {} is not on an integer point", coordinate));
            }
        }
        for coordinate in self.x_measures.iter().chain(self.z_measures.iter()) {
            if coordinate.col2 % 2 == 0 || coordinate.row2 % 2 == 0 {
                return Err(format!("measure qubit {} is not on a plaquette center", coordinate));
            }
        }
        Ok(())
    }
}
