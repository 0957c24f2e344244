use super::residue::ResidueType;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A motif-side active-site residue, or a residue-shaped record of a matched group.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Residue {
    #[serde(rename = "type")]
    pub residue_type: ResidueType,
    #[serde(rename = "id")]
    pub residue_id: String,
}

impl Residue {
    pub fn new(residue_type: ResidueType, residue_id: &str) -> Self {
        Self {
            residue_type,
            residue_id: residue_id.trim().to_string(),
        }
    }
}

impl std::fmt::Display for Residue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.residue_type, self.residue_id)
    }
}

/// A pairwise distance constraint between two active-site residues.
///
/// `residues` holds indices into the motif's active-site list. The residue types are the
/// types searched for in a target structure and are authored independently of the
/// referenced active-site residues.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DistanceConstraint {
    pub residues: (usize, usize),
    pub atoms: (String, String),
    #[serde(rename = "residue-types")]
    pub residue_types: (ResidueType, ResidueType),
    pub distance: f64,
}

/// One side of a constraint, viewed from a particular motif residue.
///
/// The finder always searches for atoms of `atom` inside residues of `residue_type`, that
/// lie near an atom of `partner_atom` inside a residue of `partner_type`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrientedConstraint<'a> {
    pub atom: &'a str,
    pub residue_type: ResidueType,
    pub partner_atom: &'a str,
    pub partner_type: ResidueType,
    pub distance: f64,
}

impl DistanceConstraint {
    pub fn involves(&self, index: usize) -> bool {
        self.residues.0 == index || self.residues.1 == index
    }

    /// Returns the constraint oriented so that `index` is the searched side.
    ///
    /// A constraint whose both ends reference `index` keeps its authored orientation.
    pub fn oriented_for(&self, index: usize) -> Option<OrientedConstraint<'_>> {
        if self.residues.0 == index {
            Some(OrientedConstraint {
                atom: &self.atoms.0,
                residue_type: self.residue_types.0,
                partner_atom: &self.atoms.1,
                partner_type: self.residue_types.1,
                distance: self.distance,
            })
        } else if self.residues.1 == index {
            Some(OrientedConstraint {
                atom: &self.atoms.1,
                residue_type: self.residue_types.1,
                partner_atom: &self.atoms.0,
                partner_type: self.residue_types.0,
                distance: self.distance,
            })
        } else {
            None
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum MotifError {
    #[error("Motif has an empty identifier")]
    MissingId,
    #[error("Motif '{motif}': constraint {constraint} references residue index {index}, but the active site has {size} residue(s)")]
    ResidueOutOfRange {
        motif: String,
        constraint: usize,
        index: usize,
        size: usize,
    },
    #[error("Motif '{motif}': constraint {constraint} has invalid distance {distance}")]
    InvalidDistance {
        motif: String,
        constraint: usize,
        distance: f64,
    },
}

/// A reference active-site pattern: residues plus their pairwise distance constraints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Motif {
    pub id: String,
    #[serde(rename = "ec-number")]
    pub ec_number: String,
    /// Identifier of the structure the motif was authored from.
    #[serde(rename = "source-structure")]
    pub source_structure: String,
    #[serde(rename = "active-site")]
    pub active_site: Vec<Residue>,
    #[serde(default)]
    pub constraints: Vec<DistanceConstraint>,
}

impl Motif {
    /// Checks that every constraint references residues present in the active site and
    /// carries a finite, positive distance.
    pub fn validate(&self) -> Result<(), MotifError> {
        if self.id.trim().is_empty() {
            return Err(MotifError::MissingId);
        }
        let size = self.active_site.len();
        for (i, constraint) in self.constraints.iter().enumerate() {
            for index in [constraint.residues.0, constraint.residues.1] {
                if index >= size {
                    return Err(MotifError::ResidueOutOfRange {
                        motif: self.id.clone(),
                        constraint: i,
                        index,
                        size,
                    });
                }
            }
            if !constraint.distance.is_finite() || constraint.distance <= 0.0 {
                return Err(MotifError::InvalidDistance {
                    motif: self.id.clone(),
                    constraint: i,
                    distance: constraint.distance,
                });
            }
        }
        Ok(())
    }

    pub fn size(&self) -> usize {
        self.active_site.len()
    }

    /// The active-site one-letter sequence in authored order.
    pub fn sequence(&self) -> String {
        self.active_site
            .iter()
            .map(|r| r.residue_type.to_one_letter())
            .collect()
    }

    /// Iterates over the constraints involving the active-site residue at `index`,
    /// oriented so that residue is the searched side.
    pub fn constraints_for(&self, index: usize) -> impl Iterator<Item = OrientedConstraint<'_>> {
        self.constraints
            .iter()
            .filter_map(move |c| c.oriented_for(index))
    }
}
