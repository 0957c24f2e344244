use crate::core::models::ids::GroupId;
use crate::core::models::motif::Motif;
use crate::core::models::structure::Structure;
use crate::core::utils::geometry::superposition_rmsd;
use nalgebra::Point3;
use tracing::warn;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Score {
    Rmsd(f64),
    /// The two sides do not have the same number of scoring atoms.
    Incomparable,
}

/// Positions of the scoring atoms of `groups`, group by group, each in file order.
pub fn scoring_positions(
    structure: &Structure,
    groups: impl IntoIterator<Item = GroupId>,
) -> Vec<Point3<f64>> {
    groups
        .into_iter()
        .flat_map(|group_id| structure.group_atoms(group_id))
        .filter(|atom| atom.is_scoring_atom())
        .map(|atom| atom.position)
        .collect()
}

/// Resolves the motif's active site inside its own structure and collects its scoring atoms.
///
/// Returns `None` if any active-site residue is missing from that structure.
pub fn motif_reference(motif: &Motif, motif_structure: &Structure) -> Option<Vec<Point3<f64>>> {
    let mut groups = Vec::with_capacity(motif.size());
    for residue in &motif.active_site {
        match motif_structure.find_group(residue.residue_type, &residue.residue_id) {
            Some(group_id) => groups.push(group_id),
            None => {
                warn!(
                    motif = %motif.id,
                    structure = %motif_structure.id(),
                    residue = %residue,
                    "Active-site residue is missing from the motif structure."
                );
                return None;
            }
        }
    }
    Some(scoring_positions(motif_structure, groups))
}

/// Scores an assignment against the motif's reference atoms, pairing motif residue `i` with
/// assigned group `i`.
pub fn score(reference: &[Point3<f64>], structure: &Structure, assignment: &[GroupId]) -> Score {
    let target = scoring_positions(structure, assignment.iter().copied());
    match superposition_rmsd(reference, &target) {
        Some(rmsd) if rmsd.is_finite() => Score::Rmsd(rmsd),
        _ => Score::Incomparable,
    }
}

/// Keeps the lowest-RMSD candidate offered so far. Ties keep the earlier offer.
#[derive(Debug, Clone)]
pub struct BestScore<T> {
    best: Option<(T, f64)>,
}

impl<T> Default for BestScore<T> {
    fn default() -> Self {
        Self { best: None }
    }
}

impl<T> BestScore<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Offers a candidate; returns `true` if it became the new best.
    pub fn offer(&mut self, candidate: T, score: Score) -> bool {
        let Score::Rmsd(rmsd) = score else {
            return false;
        };
        if self.best.as_ref().is_some_and(|(_, best)| rmsd >= *best) {
            return false;
        }
        self.best = Some((candidate, rmsd));
        true
    }

    pub fn into_inner(self) -> Option<(T, f64)> {
        self.best
    }
}

/// Picks the lowest-RMSD candidate from an already-scored sequence.
pub fn select_best<T>(scored: impl IntoIterator<Item = (T, Score)>) -> Option<(T, f64)> {
    let mut best = BestScore::new();
    for (candidate, score) in scored {
        best.offer(candidate, score);
    }
    best.into_inner()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::motif::Residue;
    use crate::core::models::residue::ResidueType;
    use crate::fixtures;

    fn triad_assignment(structure: &Structure) -> Vec<GroupId> {
        [
            (ResidueType::Histidine, "57"),
            (ResidueType::AsparticAcid, "102"),
            (ResidueType::Serine, "195"),
        ]
        .iter()
        .map(|(t, id)| structure.find_group(*t, id).unwrap())
        .collect()
    }

    #[test]
    fn scoring_positions_skip_backbone_and_hydrogens() {
        let structure = fixtures::triad_source_structure();
        let positions = scoring_positions(&structure, triad_assignment(&structure));
        assert_eq!(positions.len(), 9);
    }

    #[test]
    fn rigidly_moved_triad_scores_near_zero() {
        let motif = fixtures::triad_motif();
        let reference = motif_reference(&motif, &fixtures::triad_source_structure()).unwrap();
        let target = fixtures::triad_target_structure("2XYZ");

        match score(&reference, &target, &triad_assignment(&target)) {
            Score::Rmsd(rmsd) => assert!(rmsd < 1e-6, "rmsd was {rmsd}"),
            Score::Incomparable => panic!("triad should be comparable"),
        }
    }

    #[test]
    fn unequal_atom_counts_are_incomparable() {
        let motif = fixtures::triad_motif();
        let reference = motif_reference(&motif, &fixtures::triad_source_structure()).unwrap();

        let mut target = fixtures::triad_target_structure("2XYZ");
        let ser = target.find_group(ResidueType::Serine, "195").unwrap();
        target.add_atom(ser, "OXT", 9999, Point3::new(1.0, 1.0, 1.0));

        assert_eq!(
            score(&reference, &target, &triad_assignment(&target)),
            Score::Incomparable
        );
    }

    #[test]
    fn motif_reference_requires_every_active_site_residue() {
        let mut motif = fixtures::triad_motif();
        motif.active_site[1] = Residue::new(ResidueType::AsparticAcid, "999");
        assert!(motif_reference(&motif, &fixtures::triad_source_structure()).is_none());
    }

    #[test]
    fn lowest_rmsd_wins_and_ties_keep_the_first() {
        let scored = vec![
            ("a", Score::Rmsd(0.8)),
            ("b", Score::Incomparable),
            ("c", Score::Rmsd(0.3)),
            ("d", Score::Rmsd(0.3)),
            ("e", Score::Rmsd(0.9)),
        ];
        assert_eq!(select_best(scored), Some(("c", 0.3)));
    }

    #[test]
    fn only_incomparable_scores_select_nothing() {
        let scored = vec![(1, Score::Incomparable), (2, Score::Incomparable)];
        assert_eq!(select_best(scored), None);
    }
}
