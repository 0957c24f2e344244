use super::ids::{AtomId, ChainId};
use phf::{Map, phf_map};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ResidueType {
    // --- Aliphatic, Nonpolar ---
    Alanine,    // ALA / A
    Glycine,    // GLY / G
    Isoleucine, // ILE / I
    Leucine,    // LEU / L
    Proline,    // PRO / P
    Valine,     // VAL / V

    // --- Aromatic ---
    Phenylalanine, // PHE / F
    Tryptophan,    // TRP / W
    Tyrosine,      // TYR / Y

    // --- Polar, Uncharged ---
    Asparagine, // ASN / N
    Cysteine,   // CYS / C
    Glutamine,  // GLN / Q
    Serine,     // SER / S
    Threonine,  // THR / T
    Methionine, // MET / M

    // --- Positively Charged ---
    Arginine,  // ARG / R
    Histidine, // HIS / H
    Lysine,    // LYS / K

    // --- Negatively Charged ---
    AsparticAcid, // ASP / D
    GlutamicAcid, // GLU / E
}

#[rustfmt::skip]
static THREE_LETTER_CODES: Map<&'static str, ResidueType> = phf_map! {
    "ALA" => ResidueType::Alanine, "GLY" => ResidueType::Glycine,
    "ILE" => ResidueType::Isoleucine, "LEU" => ResidueType::Leucine,
    "PRO" => ResidueType::Proline, "VAL" => ResidueType::Valine,
    "PHE" => ResidueType::Phenylalanine, "TRP" => ResidueType::Tryptophan,
    "TYR" => ResidueType::Tyrosine, "ASN" => ResidueType::Asparagine,
    "CYS" => ResidueType::Cysteine, "GLN" => ResidueType::Glutamine,
    "SER" => ResidueType::Serine, "THR" => ResidueType::Threonine,
    "MET" => ResidueType::Methionine, "ARG" => ResidueType::Arginine,
    "HIS" => ResidueType::Histidine, "LYS" => ResidueType::Lysine,
    "ASP" => ResidueType::AsparticAcid, "GLU" => ResidueType::GlutamicAcid,

    // Protonation-state and bridge variants written by common tools
    "HSD" => ResidueType::Histidine, "HSE" => ResidueType::Histidine,
    "HSP" => ResidueType::Histidine, "HID" => ResidueType::Histidine,
    "HIE" => ResidueType::Histidine, "HIP" => ResidueType::Histidine,
    "CYX" => ResidueType::Cysteine, "CYM" => ResidueType::Cysteine,
    "ASH" => ResidueType::AsparticAcid, "GLH" => ResidueType::GlutamicAcid,
    "LYN" => ResidueType::Lysine,
};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("Unknown residue type '{0}'")]
pub struct ParseResidueTypeError(pub String);

impl ResidueType {
    pub fn to_three_letter(&self) -> &'static str {
        match self {
            ResidueType::Alanine => "ALA",
            ResidueType::Glycine => "GLY",
            ResidueType::Isoleucine => "ILE",
            ResidueType::Leucine => "LEU",
            ResidueType::Proline => "PRO",
            ResidueType::Valine => "VAL",
            ResidueType::Phenylalanine => "PHE",
            ResidueType::Tryptophan => "TRP",
            ResidueType::Tyrosine => "TYR",
            ResidueType::Asparagine => "ASN",
            ResidueType::Cysteine => "CYS",
            ResidueType::Glutamine => "GLN",
            ResidueType::Serine => "SER",
            ResidueType::Threonine => "THR",
            ResidueType::Methionine => "MET",
            ResidueType::Arginine => "ARG",
            ResidueType::Histidine => "HIS",
            ResidueType::Lysine => "LYS",
            ResidueType::AsparticAcid => "ASP",
            ResidueType::GlutamicAcid => "GLU",
        }
    }

    /// The one-letter code used when residue sequences are compared as strings.
    pub fn to_one_letter(&self) -> char {
        match self {
            ResidueType::Alanine => 'A',
            ResidueType::Glycine => 'G',
            ResidueType::Isoleucine => 'I',
            ResidueType::Leucine => 'L',
            ResidueType::Proline => 'P',
            ResidueType::Valine => 'V',
            ResidueType::Phenylalanine => 'F',
            ResidueType::Tryptophan => 'W',
            ResidueType::Tyrosine => 'Y',
            ResidueType::Asparagine => 'N',
            ResidueType::Cysteine => 'C',
            ResidueType::Glutamine => 'Q',
            ResidueType::Serine => 'S',
            ResidueType::Threonine => 'T',
            ResidueType::Methionine => 'M',
            ResidueType::Arginine => 'R',
            ResidueType::Histidine => 'H',
            ResidueType::Lysine => 'K',
            ResidueType::AsparticAcid => 'D',
            ResidueType::GlutamicAcid => 'E',
        }
    }
}

impl FromStr for ResidueType {
    type Err = ParseResidueTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_ascii_uppercase();
        THREE_LETTER_CODES
            .get(key.as_str())
            .copied()
            .ok_or_else(|| ParseResidueTypeError(s.to_string()))
    }
}

impl fmt::Display for ResidueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.to_three_letter())
    }
}

impl Serialize for ResidueType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.to_three_letter())
    }
}

impl<'de> Deserialize<'de> for ResidueType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// An observed residue instance ("structural group") in a target structure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Group {
    pub residue_type: ResidueType,
    pub name: String,                       // Residue name as written in the source file
    pub number: isize,                      // Residue sequence number
    pub insertion_code: Option<char>,       // PDB insertion code, if any
    pub chain_id: ChainId,                  // ID of the parent chain
    pub(crate) atoms: Vec<AtomId>,          // Atoms in file order
    atom_name_map: HashMap<String, AtomId>, // First atom seen for each name
}

impl Group {
    pub(crate) fn new(
        residue_type: ResidueType,
        name: &str,
        number: isize,
        insertion_code: Option<char>,
        chain_id: ChainId,
    ) -> Self {
        Self {
            residue_type,
            name: name.trim().to_string(),
            number,
            insertion_code,
            chain_id,
            atoms: Vec::new(),
            atom_name_map: HashMap::new(),
        }
    }

    pub(crate) fn add_atom(&mut self, atom_name: &str, atom_id: AtomId) {
        self.atoms.push(atom_id);
        self.atom_name_map
            .entry(atom_name.to_string())
            .or_insert(atom_id);
    }

    pub fn atoms(&self) -> &[AtomId] {
        &self.atoms
    }

    pub fn get_atom_id_by_name(&self, name: &str) -> Option<AtomId> {
        self.atom_name_map.get(name).copied()
    }

    /// The residue identifier string: sequence number followed by the insertion code.
    pub fn residue_id(&self) -> String {
        match self.insertion_code {
            Some(code) => format!("{}{}", self.number, code),
            None => self.number.to_string(),
        }
    }
}
