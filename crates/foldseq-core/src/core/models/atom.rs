use super::ids::ResidueId;
use nalgebra::Point3;

/// Represents an atom of a single structure frame.
///
/// Besides identity and position, the struct carries the per-atom fields of a
/// PDB coordinate record so that a frame can be written back without losing
/// occupancy, temperature factor, or element information.
#[derive(Debug, Clone, PartialEq)]
pub struct Atom {
    /// The serial number from the source file.
    pub serial: usize,
    /// The name of the atom (e.g., "CA", "N", "O"), without padding.
    pub name: String,
    /// The ID of the parent residue this atom belongs to.
    pub residue_id: ResidueId,
    /// Alternate location indicator, if the record carried one.
    pub alt_loc: Option<char>,
    /// The 3D coordinates of the atom in Angstroms.
    pub position: Point3<f64>,
    /// Occupancy in the range `0.0..=1.0`.
    pub occupancy: f64,
    /// Isotropic temperature factor.
    pub temp_factor: f64,
    /// Element symbol, right-justified in columns 77-78 on output.
    pub element: String,
    /// Formal charge as written in columns 79-80 (e.g., "1+").
    pub charge: String,
}

impl Atom {
    /// Creates a new `Atom` with default values for the record fields.
    ///
    /// Occupancy defaults to `1.0`; the temperature factor, element and charge
    /// are left empty and can be filled in afterwards.
    ///
    /// # Arguments
    ///
    /// * `serial` - The serial number of the atom.
    /// * `name` - The name of the atom.
    /// * `residue_id` - The ID of the residue this atom belongs to.
    /// * `position` - The 3D coordinates of the atom.
    pub fn new(serial: usize, name: &str, residue_id: ResidueId, position: Point3<f64>) -> Self {
        Self {
            serial,
            name: name.to_string(),
            residue_id,
            alt_loc: None,
            position,
            occupancy: 1.0,
            temp_factor: 0.0,
            element: String::new(),
            charge: String::new(),
        }
    }
}
