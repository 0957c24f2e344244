use crate::core::models::ids::GroupId;
use crate::core::models::motif::Motif;
use crate::core::models::structure::Structure;
use edit_distance::edit_distance;

/// Whether an aligned sequence at `distance` edits from a motif of `size` residues is kept.
///
/// Two-residue motifs are never accepted; motifs of three or more residues need an exact
/// sequence match; smaller motifs tolerate a single edit.
pub fn is_acceptable_distance(size: usize, distance: usize) -> bool {
    match size {
        2 => false,
        0 | 1 => distance <= 1,
        _ => distance == 0,
    }
}

/// The one-letter sequence of an assignment, ordered by position in the structure.
///
/// Residue instances are ordered by sequence number, then insertion code, then chain.
pub fn aligned_sequence(structure: &Structure, assignment: &[GroupId]) -> String {
    let mut groups: Vec<_> = assignment
        .iter()
        .filter_map(|&id| structure.group(id))
        .collect();
    groups.sort_by_key(|g| {
        let chain = structure.chain(g.chain_id).map(|c| c.id);
        (g.number, g.insertion_code, chain)
    });
    groups
        .iter()
        .map(|g| g.residue_type.to_one_letter())
        .collect()
}

/// Returns the edit distance of an admissible assignment, or `None` if it is rejected.
pub fn admit(motif: &Motif, structure: &Structure, assignment: &[GroupId]) -> Option<usize> {
    let distance = edit_distance(&aligned_sequence(structure, assignment), &motif.sequence());
    is_acceptable_distance(motif.size(), distance).then_some(distance)
}
