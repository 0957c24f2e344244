use super::ids::GroupId;
use nalgebra::Point3;

const BACKBONE_ATOM_NAMES: [&str; 3] = ["N", "C", "O"];

/// Represents a single atom of a structural group.
///
/// Atoms are owned by the [`Structure`](super::structure::Structure) they were read into
/// and are never mutated by the matching engine. Only the name and coordinates take part in
/// geometric queries; the serial is carried for diagnostics.
#[derive(Debug, Clone, PartialEq)]
pub struct Atom {
    /// The name of the atom as written in the source file (e.g., "CA", "NE2", "OG").
    pub name: String,
    /// The serial number of the atom in its source file.
    pub serial: usize,
    /// The ID of the structural group this atom belongs to.
    pub group_id: GroupId,
    /// The 3D coordinates of the atom in Angstroms.
    pub position: Point3<f64>,
}

impl Atom {
    /// Creates a new `Atom`.
    ///
    /// # Arguments
    ///
    /// * `name` - The name of the atom.
    /// * `serial` - The serial number from the source file.
    /// * `group_id` - The ID of the group this atom belongs to.
    /// * `position` - The 3D coordinates of the atom.
    pub fn new(name: &str, serial: usize, group_id: GroupId, position: Point3<f64>) -> Self {
        Self {
            name: name.trim().to_string(),
            serial,
            group_id,
            position,
        }
    }

    /// Returns `true` for hydrogen (and deuterium) atoms.
    ///
    /// Any name containing `H` or starting with `D` is treated as a hydrogen. This is a
    /// name-based heuristic and intentionally also drops heavy atoms such as `OH` or `NH1`
    /// from superposition scoring.
    pub fn is_hydrogen(&self) -> bool {
        self.name.contains('H') || self.name.starts_with('D')
    }

    /// Returns `true` for the backbone atoms `N`, `C` and `O`.
    pub fn is_backbone(&self) -> bool {
        BACKBONE_ATOM_NAMES.contains(&self.name.as_str())
    }

    /// Returns `true` if the atom takes part in superposition scoring.
    pub fn is_scoring_atom(&self) -> bool {
        !self.is_hydrogen() && !self.is_backbone()
    }
}
