use crate::error::Result;
use motifscan::core::models::motif::Residue;
use motifscan::workflows::scan::ScanResult;
use serde::Serialize;
use std::io::Write;
use std::path::Path;
use tracing::info;

#[derive(Debug, Serialize)]
struct AlignmentRow<'a> {
    structure_id: &'a str,
    motif_id: &'a str,
    ec_number: &'a str,
    rmsd: f64,
    edit_distance: usize,
    active_site: String,
    aligned_residues: String,
}

const HEADER: [&str; 7] = [
    "structure_id",
    "motif_id",
    "ec_number",
    "rmsd",
    "edit_distance",
    "active_site",
    "aligned_residues",
];

fn join_residues(residues: &[Residue]) -> String {
    residues
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(";")
}

/// Writes one CSV row per accepted alignment, structures in identifier order.
///
/// The header row is always written. Returns the number of data rows.
pub fn write_alignments<W: Write>(writer: W, result: &ScanResult) -> Result<usize> {
    let mut csv_writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);
    csv_writer.write_record(HEADER)?;
    let mut rows = 0;
    for (structure_id, alignments) in &result.alignments {
        for alignment in alignments {
            csv_writer.serialize(AlignmentRow {
                structure_id,
                motif_id: &alignment.motif_id,
                ec_number: &alignment.ec_number,
                rmsd: alignment.rmsd,
                edit_distance: alignment.edit_distance(),
                active_site: join_residues(&alignment.active_site_residues),
                aligned_residues: join_residues(&alignment.aligned_residues),
            })?;
            rows += 1;
        }
    }
    csv_writer.flush()?;
    Ok(rows)
}

pub fn export_csv(path: &Path, result: &ScanResult) -> Result<()> {
    let file = std::fs::File::create(path)?;
    let rows = write_alignments(file, result)?;
    info!(rows, "Wrote alignments to {:?}.", path);
    Ok(())
}
