//! Structures and motifs shared by the unit tests.
//!
//! The catalytic triad is laid out so that every measured key-atom distance sits just
//! below its expected distance (4.5 vs 5.0, 5.5 vs 6.0, 6.5 vs 7.0), inside the acceptance
//! band at a precision factor of 1.0.

use crate::core::models::ids::GroupId;
use crate::core::models::motif::{DistanceConstraint, Motif, Residue};
use crate::core::models::residue::ResidueType;
use crate::core::models::structure::Structure;
use nalgebra::{Point3, Rotation3, Unit, Vector3};

/// A rigid-body placement applied to every atom of a fixture structure.
#[derive(Debug, Clone, Copy)]
pub struct Placement {
    rotation: Rotation3<f64>,
    shift: Vector3<f64>,
}

impl Placement {
    pub fn identity() -> Self {
        Self {
            rotation: Rotation3::identity(),
            shift: Vector3::zeros(),
        }
    }

    pub fn moved() -> Self {
        Self {
            rotation: Rotation3::from_axis_angle(
                &Unit::new_normalize(Vector3::new(1.0, 2.0, -0.5)),
                40f64.to_radians(),
            ),
            shift: Vector3::new(12.0, -3.0, 8.0),
        }
    }

    pub fn place(&self, p: Point3<f64>) -> Point3<f64> {
        self.rotation * p + self.shift
    }
}

pub fn his_key() -> Point3<f64> {
    Point3::origin()
}

pub fn asp_key() -> Point3<f64> {
    Point3::new(4.5, 0.0, 0.0)
}

pub fn ser_key() -> Point3<f64> {
    let x = 32.25 / 9.0;
    Point3::new(x, (42.25 - x * x).sqrt(), 0.0)
}

/// Adds a residue with backbone, one hydrogen, CA, CB and a named key side-chain atom.
pub fn add_residue(
    structure: &mut Structure,
    chain: char,
    residue_type: ResidueType,
    number: isize,
    key_atom: &str,
    key: Point3<f64>,
    placement: &Placement,
) -> GroupId {
    let chain_id = structure.add_chain(chain);
    let group = structure
        .add_group(
            chain_id,
            residue_type,
            residue_type.to_three_letter(),
            number,
            None,
        )
        .unwrap();
    let atoms = [
        ("N", Vector3::new(-2.4, -1.1, 1.3)),
        ("CA", Vector3::new(-1.9, -0.4, 0.9)),
        ("C", Vector3::new(-2.6, 0.7, 1.6)),
        ("O", Vector3::new(-3.1, 0.9, 2.4)),
        ("H", Vector3::new(-2.9, -1.7, 0.8)),
        ("CB", Vector3::new(-1.0, -0.9, 0.2)),
        (key_atom, Vector3::zeros()),
    ];
    let serial_base = structure.atom_count();
    for (i, (name, offset)) in atoms.iter().enumerate() {
        structure.add_atom(group, name, serial_base + i + 1, placement.place(key + offset));
    }
    group
}

/// His57 / Asp102 / Ser195 with pairwise constraints of 5.0, 7.0 and 6.0 Angstroms.
pub fn triad_motif() -> Motif {
    Motif {
        id: "1TRI".to_string(),
        ec_number: "3.4.21.4".to_string(),
        source_structure: "1TRI".to_string(),
        active_site: vec![
            Residue::new(ResidueType::Histidine, "57"),
            Residue::new(ResidueType::AsparticAcid, "102"),
            Residue::new(ResidueType::Serine, "195"),
        ],
        constraints: vec![
            constraint(
                (0, 1),
                ("NE2", "OD1"),
                (ResidueType::Histidine, ResidueType::AsparticAcid),
                5.0,
            ),
            constraint(
                (0, 2),
                ("NE2", "OG"),
                (ResidueType::Histidine, ResidueType::Serine),
                7.0,
            ),
            constraint(
                (1, 2),
                ("OD1", "OG"),
                (ResidueType::AsparticAcid, ResidueType::Serine),
                6.0,
            ),
        ],
    }
}

pub fn constraint(
    residues: (usize, usize),
    atoms: (&str, &str),
    residue_types: (ResidueType, ResidueType),
    distance: f64,
) -> DistanceConstraint {
    DistanceConstraint {
        residues,
        atoms: (atoms.0.to_string(), atoms.1.to_string()),
        residue_types,
        distance,
    }
}

/// The triad alone, in its reference frame.
pub fn triad_source_structure() -> Structure {
    let mut s = Structure::new("1TRI");
    s.set_classification(Some("3.4.21.4".to_string()));
    add_triad(&mut s, &Placement::identity());
    s
}

pub fn add_triad(s: &mut Structure, placement: &Placement) -> [GroupId; 3] {
    let his = add_residue(s, 'A', ResidueType::Histidine, 57, "NE2", his_key(), placement);
    let asp = add_residue(s, 'A', ResidueType::AsparticAcid, 102, "OD1", asp_key(), placement);
    let ser = add_residue(s, 'A', ResidueType::Serine, 195, "OG", ser_key(), placement);
    [his, asp, ser]
}

/// A rigidly moved copy of the triad plus far-away residues of the same types and a Ser
/// decoy that satisfies the His constraint but not the Asp one.
pub fn triad_target_structure(id: &str) -> Structure {
    let placement = Placement::moved();
    let mut s = Structure::new(id);
    s.set_classification(Some("3.4.21.4".to_string()));

    let far_his = Point3::new(60.0, 60.0, 60.0);
    add_residue(&mut s, 'A', ResidueType::Histidine, 40, "NE2", far_his, &placement);
    add_triad(&mut s, &placement);

    let decoy = Point3::new(-6.0, 0.0, 2.5);
    add_residue(&mut s, 'A', ResidueType::Serine, 214, "OG", decoy, &placement);

    let far_asp = Point3::new(-60.0, 60.0, 0.0);
    let far_ser = Point3::new(0.0, -60.0, 60.0);
    add_residue(&mut s, 'B', ResidueType::AsparticAcid, 189, "OD1", far_asp, &placement);
    add_residue(&mut s, 'B', ResidueType::Serine, 300, "OG", far_ser, &placement);
    s
}

/// A structure with the same residue types as the triad but no geometric match.
pub fn scattered_structure(id: &str) -> Structure {
    let placement = Placement::identity();
    let mut s = Structure::new(id);
    let residues = [
        (ResidueType::Histidine, 57, "NE2", Point3::new(0.0, 0.0, 0.0)),
        (ResidueType::AsparticAcid, 102, "OD1", Point3::new(40.0, 0.0, 0.0)),
        (ResidueType::Serine, 195, "OG", Point3::new(0.0, 40.0, 0.0)),
    ];
    for (residue_type, number, key_atom, key) in residues {
        add_residue(&mut s, 'A', residue_type, number, key_atom, key, &placement);
    }
    s
}
