use super::motif::Residue;
use serde::{Deserialize, Serialize};

/// The accepted match of one motif against one structure.
///
/// `active_site_residues[i]` is matched by `aligned_residues[i]`. Both edit-distance bounds
/// carry the same value under the current scoring.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Alignment {
    pub motif_id: String,
    pub active_site_residues: Vec<Residue>,
    pub aligned_residues: Vec<Residue>,
    pub min_distance: usize,
    pub max_distance: usize,
    pub rmsd: f64,
    pub ec_number: String,
}

impl Alignment {
    pub fn edit_distance(&self) -> usize {
        self.max_distance
    }
}
