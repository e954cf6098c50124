//! Visualizer
//!
//! This module dumps the qubit layout and the CX schedule of a surface code into a json file
//! that can be inspected step by step
//!

use crate::serde_json;
use std::fs::File;
use crate::serde::{Serialize, Deserialize};
use std::io::{Write, Seek, SeekFrom};
use crate::chrono::Local;
use crate::urlencoding;
use crate::geometry::SurfaceCodeLayout;

pub trait SurfaceCodeVisualizer {
    /// take a snapshot, set `abbrev` to true to save space
    fn snapshot(&self, abbrev: bool) -> serde_json::Value;
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct VisualizePosition {
    /// vertical axis, -i is up, +i is down (left-up corner is smallest i,j)
    pub i: f64,
    /// horizontal axis, -j is left, +j is right (left-up corner is smallest i,j)
    pub j: f64,
    /// time axis, top and bottom (orthogonal to the initial view, which looks at -t direction)
    pub t: f64,
}

impl VisualizePosition {
    /// create a visualization position
    pub fn new(i: f64, j: f64, t: f64) -> Self {
        Self {
            i, j, t
        }
    }
}

#[derive(Debug)]
pub struct Visualizer {
    /// save to file if applicable
    file: Option<File>,
    /// basic snapshot
    base: serde_json::Value,
    /// positions of the qubits
    positions: Vec<VisualizePosition>,
    /// all snapshots
    snapshots: Vec<(String, serde_json::Value)>,
}

pub fn snapshot_fix_missing_fields(value: &mut serde_json::Value, abbrev: bool) {
    let value = value.as_object_mut().expect("snapshot must be an object");
    let qubits = match value.get_mut("qubits") {
        Some(qubits) => qubits.as_array_mut().expect("qubits must be an array"),
        None => return,
    };
    for qubit in qubits {
        if qubit.is_null() { continue }  // qubit not present
        let qubit = qubit.as_object_mut().expect("each qubit must be an object");
        let key_role = if abbrev { "r" } else { "role" };
        let key_active = if abbrev { "a" } else { "active" };
        assert!(qubit.contains_key(key_role), "missing unrecoverable field");
        if !qubit.contains_key(key_active) {
            qubit.insert(key_active.to_string(), json!(0));  // idle by default
        }
    }
}

pub type ObjectMap = serde_json::Map<String, serde_json::Value>;
pub fn snapshot_combine_object_known_key(obj: &mut ObjectMap, obj_2: &mut ObjectMap, key: &str) {
    match (obj.contains_key(key), obj_2.contains_key(key)) {
        (_, false) => { },  // do nothing
        (false, true) => { if let Some(value) = obj_2.remove(key) { obj.insert(key.to_string(), value); } }
        (true, true) => {
            assert_eq!(obj[key], obj_2[key], "cannot combine different values: please make sure values don't conflict");
            obj_2.remove(key);
        }
    }
}

pub fn snapshot_copy_remaining_fields(obj: &mut ObjectMap, obj_2: &mut ObjectMap) {
    let keys: Vec<String> = obj_2.keys().cloned().collect();
    for key in keys.iter() {
        match obj.contains_key(key) {
            false => { if let Some(value) = obj_2.remove(key) { obj.insert(key.to_string(), value); } }
            true => {
                assert_eq!(obj[key], obj_2[key], "cannot combine unknown fields: don't know what to do, please modify `snapshot_combine_values` function");
                obj_2.remove(key);
            }
        }
    }
}

pub fn snapshot_combine_values(value: &mut serde_json::Value, mut value_2: serde_json::Value, abbrev: bool) {
    let value = value.as_object_mut().expect("snapshot must be an object");
    let value_2 = value_2.as_object_mut().expect("snapshot must be an object");
    match (value.contains_key("qubits"), value_2.contains_key("qubits")) {
        (_, false) => { },  // do nothing
        (false, true) => { if let Some(qubits) = value_2.remove("qubits") { value.insert("qubits".to_string(), qubits); } }
        (true, true) => {  // combine
            let qubits = value["qubits"].as_array_mut().expect("qubits must be an array");
            let qubits_2 = value_2["qubits"].as_array_mut().expect("qubits must be an array");
            assert!(qubits.len() == qubits_2.len(), "qubits must be compatible");
            for (qubit_idx, qubit) in qubits.iter_mut().enumerate() {
                let qubit_2 = &mut qubits_2[qubit_idx];
                if qubit_2.is_null() { continue }
                if qubit.is_null() { *qubit = qubit_2.clone(); continue }
                let qubit = qubit.as_object_mut().expect("each qubit must be an object");
                let qubit_2 = qubit_2.as_object_mut().expect("each qubit must be an object");
                // list known keys
                let key_role = if abbrev { "r" } else { "role" };
                let key_coordinate = if abbrev { "c" } else { "coordinate" };
                let key_active = if abbrev { "a" } else { "active" };
                for key in [key_role, key_coordinate, key_active] {
                    snapshot_combine_object_known_key(qubit, qubit_2, key);
                }
                snapshot_copy_remaining_fields(qubit, qubit_2);
                assert_eq!(qubit_2.len(), 0, "there should be nothing left");
            }
            value_2.remove("qubits");
        }
    }
    snapshot_copy_remaining_fields(value, value_2);
}

impl SurfaceCodeVisualizer for SurfaceCodeLayout {
    fn snapshot(&self, abbrev: bool) -> serde_json::Value {
        let qubits: Vec<serde_json::Value> = self.all_range().iter().map(|qubit| {
            json!({
                if abbrev { "r" } else { "role" }: self.role_of(qubit).abbrev(),
                if abbrev { "c" } else { "coordinate" }: self.coordinate_of(qubit),
            })
        }).collect();
        json!({
            if abbrev { "d" } else { "distance" }: self.distance,
            "qubits": qubits,
        })
    }
}

impl Visualizer {
    /// create a new visualizer with target filename and qubit layout
    pub fn new(mut filename: Option<String>) -> std::io::Result<Self> {
        if cfg!(feature = "disable_visualizer") {
            filename = None;  // do not open file
        }
        let file = match filename {
            Some(filename) => Some(File::create(filename)?),
            None => None,
        };
        Ok(Self {
            file,
            base: json!({}),
            positions: Vec::new(),
            snapshots: Vec::new(),
        })
    }

    /// append a snapshot combined from several sources, and also update the file in case the program is interrupted
    pub fn snapshot_combined(&mut self, name: String, sources: Vec<&dyn SurfaceCodeVisualizer>) -> std::io::Result<()> {
        if cfg!(feature = "disable_visualizer") {
            return Ok(())
        }
        let abbrev = true;
        let mut value = json!({});
        for source in sources.iter() {
            let value_2 = source.snapshot(abbrev);
            snapshot_combine_values(&mut value, value_2, abbrev);
        }
        snapshot_fix_missing_fields(&mut value, abbrev);
        self.snapshots.push((name, value));
        self.save()?;
        Ok(())
    }

    /// append another snapshot, and also update the file in case the program is interrupted
    pub fn snapshot(&mut self, name: String, source: &impl SurfaceCodeVisualizer) -> std::io::Result<()> {
        if cfg!(feature = "disable_visualizer") {
            return Ok(())
        }
        let abbrev = true;
        let mut value = source.snapshot(abbrev);
        snapshot_fix_missing_fields(&mut value, abbrev);
        self.snapshots.push((name, value));
        self.save()?;
        Ok(())
    }

    /// the snapshots taken so far
    pub fn snapshots(&self) -> &[(String, serde_json::Value)] {
        &self.snapshots
    }

    /// save to file
    pub fn save(&mut self) -> std::io::Result<()> {
        if let Some(file) = self.file.as_mut() {
            file.set_len(0)?;  // truncate the file
            file.seek(SeekFrom::Start(0))?;  // move the cursor to the front
            file.write_all(json!({
                "base": &self.base,
                "snapshots": &self.snapshots,
                "positions": &self.positions,
            }).to_string().as_bytes())?;
            file.sync_all()?;
        }
        Ok(())
    }

    /// set positions of the qubits and optionally center all positions
    pub fn set_positions(&mut self, mut positions: Vec<VisualizePosition>, center: bool) {
        if center && !positions.is_empty() {
            let (mut ci, mut cj, mut ct) = (0., 0., 0.);
            for position in positions.iter() {
                ci += position.i;
                cj += position.j;
                ct += position.t;
            }
            ci /= positions.len() as f64;
            cj /= positions.len() as f64;
            ct /= positions.len() as f64;
            for position in positions.iter_mut() {
                position.i -= ci;
                position.j -= cj;
                position.t -= ct;
            }
        }
        self.positions = positions;
    }

}

const DEFAULT_VISUALIZE_DATA_FOLDER: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/visualize/data/");

pub fn visualize_data_folder() -> String {
    DEFAULT_VISUALIZE_DATA_FOLDER.to_string()
}

pub fn static_visualize_data_filename() -> String {
    "static.json".to_string()
}

pub fn auto_visualize_data_filename() -> String {
    format!("{}.json", Local::now().format("%Y%m%d-%H-%M-%S%.3f"))
}

pub fn visualize_link_with_parameters(filename: &str, parameters: Vec<(String, String)>) -> String {
    let mut link = format!("http://localhost:8066?filename={}", urlencoding::encode(filename));
    for (key, value) in parameters.iter() {
        link.push('&');
        link.push_str(&urlencoding::encode(key));
        link.push('=');
        link.push_str(&urlencoding::encode(value));
    }
    link
}

pub fn print_visualize_link_with_parameters(filename: &str, parameters: Vec<(String, String)>) {
    let link = visualize_link_with_parameters(filename, parameters);
    eprintln!("opening link {} (serve the visualize folder locally to view the snapshots)", link)
}

pub fn print_visualize_link(filename: &str) {
    print_visualize_link_with_parameters(filename, Vec::new())
}
