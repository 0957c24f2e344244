use motifscan::core::io::traits::{ProviderError, StructureProvider};
use motifscan::core::models::residue::ResidueType;
use motifscan::core::models::structure::Structure;
use nalgebra::Point3;
use pdbtbx::{Format, PDB, ReadOptions, StrictnessLevel};
use std::io::{self, BufReader, Cursor};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, trace, warn};

const EXTENSIONS: [&str; 2] = ["pdb", "cif"];

#[derive(Debug, Error)]
pub enum PdbError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Unsupported structure file extension: '{0}'")]
    UnsupportedFormat(String),
    #[error("Structure file could not be parsed: {0}")]
    Parse(String),
}

fn format_for(path: &Path) -> Option<Format> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    match ext.as_str() {
        "pdb" => Some(Format::Pdb),
        "cif" => Some(Format::Mmcif),
        _ => None,
    }
}

/// Extracts the first EC number from the text of a `COMPND` record, if it carries one.
fn parse_ec_number(compnd_text: &str) -> Option<String> {
    let (_, rest) = compnd_text.split_once("EC:")?;
    let code = rest
        .split([';', ',', ' '])
        .map(str::trim)
        .find(|s| !s.is_empty())?;
    Some(code.to_string())
}

/// Finds the enzyme classification in a file's header: a PDB `COMPND ... EC:` record or an
/// mmCIF `_entity.pdbx_ec` item.
fn read_ec_number(content: &str) -> Option<String> {
    content.lines().find_map(|line| {
        if let Some(rest) = line.strip_prefix("COMPND") {
            parse_ec_number(rest)
        } else if let Some(rest) = line.strip_prefix("_entity.pdbx_ec") {
            rest.split_whitespace()
                .next()
                .map(|v| v.trim_matches(['\'', '"']))
                .filter(|v| !matches!(*v, "?" | "."))
                .map(str::to_string)
        } else {
            None
        }
    })
}

/// Copies the first model of a parsed file into a [`Structure`].
///
/// Only residues with a standard amino-acid name are kept. Atoms without an alternate
/// location are always taken; of the alternate locations, only the first listed is.
fn to_structure(id: &str, pdb: &PDB) -> Structure {
    let mut structure = Structure::new(id);
    let Some(model) = pdb.models().next() else {
        return structure;
    };
    let mut skipped_residues = 0usize;

    for chain in model.chains() {
        let chain_char = chain.id().chars().next().unwrap_or('A');
        for residue in chain.residues() {
            let Some(name) = residue.name() else {
                continue;
            };
            let Ok(residue_type) = name.parse::<ResidueType>() else {
                skipped_residues += 1;
                continue;
            };

            let chain_id = structure.add_chain(chain_char);
            let insertion_code = residue.insertion_code().and_then(|c| c.chars().next());
            let Some(group_id) = structure.add_group(
                chain_id,
                residue_type,
                name,
                residue.serial_number(),
                insertion_code,
            ) else {
                continue;
            };

            let first_altloc = residue
                .conformers()
                .find_map(|c| c.alternative_location());
            for conformer in residue.conformers() {
                let altloc = conformer.alternative_location();
                if altloc.is_some() && altloc != first_altloc {
                    trace!(residue = %name, "Skipping alternate location {:?}.", altloc);
                    continue;
                }
                for atom in conformer.atoms() {
                    let (x, y, z) = atom.pos();
                    structure.add_atom(
                        group_id,
                        atom.name(),
                        atom.serial_number(),
                        Point3::new(x, y, z),
                    );
                }
            }
        }
    }

    debug!(
        structure = %id,
        atoms = structure.atom_count(),
        residues = structure.group_count(),
        skipped_residues,
        "Read structure."
    );
    structure
}

/// Parses PDB or mmCIF text into a [`Structure`] named `id`.
pub fn read_structure(id: &str, content: &str, format: Format) -> Result<Structure, PdbError> {
    let (pdb, warnings) = ReadOptions::default()
        .set_level(StrictnessLevel::Loose)
        .set_format(format)
        .read_raw(BufReader::new(Cursor::new(content.as_bytes())))
        .map_err(|errors| {
            PdbError::Parse(
                errors
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join("; "),
            )
        })?;
    if !warnings.is_empty() {
        debug!(structure = %id, count = warnings.len(), "Structure parsed with warnings.");
    }

    let mut structure = to_structure(id, &pdb);
    structure.set_classification(read_ec_number(content));
    Ok(structure)
}

/// Reads a structure file, choosing the format from its extension.
pub fn read_structure_file(id: &str, path: &Path) -> Result<Structure, PdbError> {
    let format = format_for(path)
        .ok_or_else(|| PdbError::UnsupportedFormat(path.display().to_string()))?;
    let content = std::fs::read_to_string(path)?;
    read_structure(id, &content, format)
}

/// Serves structures from a directory of `<ID>.pdb` or `<ID>.cif` files.
#[derive(Debug, Clone)]
pub struct PdbDirectoryProvider {
    directory: PathBuf,
}

impl PdbDirectoryProvider {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
        }
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Locates the file for `id`, trying the identifier as given, then lower and upper case,
    /// PDB before mmCIF.
    fn locate(&self, id: &str) -> Option<PathBuf> {
        let names = [id.to_string(), id.to_lowercase(), id.to_uppercase()];
        EXTENSIONS
            .iter()
            .flat_map(|ext| names.iter().map(move |name| format!("{name}.{ext}")))
            .map(|file| self.directory.join(file))
            .find(|path| path.is_file())
    }

    /// Identifiers of every structure file in the directory, sorted and deduplicated.
    pub fn list_ids(&self) -> io::Result<Vec<String>> {
        let mut ids = Vec::new();
        for entry in std::fs::read_dir(&self.directory)? {
            let path = entry?.path();
            if format_for(&path).is_none() || !path.is_file() {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                ids.push(stem.to_string());
            }
        }
        ids.sort();
        ids.dedup();
        Ok(ids)
    }
}

impl StructureProvider for PdbDirectoryProvider {
    fn fetch(&self, id: &str) -> Result<Structure, ProviderError> {
        let path = self
            .locate(id)
            .ok_or_else(|| ProviderError::NotFound(id.to_string()))?;
        read_structure_file(id, &path).map_err(|e| {
            warn!(structure = %id, path = ?path, error = %e, "Failed to read structure file.");
            ProviderError::Unreadable {
                id: id.to_string(),
                message: e.to_string(),
            }
        })
    }
}
