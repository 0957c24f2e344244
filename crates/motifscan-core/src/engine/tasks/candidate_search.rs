use crate::core::models::ids::{AtomId, GroupId};
use crate::core::models::motif::{Motif, OrientedConstraint};
use crate::core::models::residue::ResidueType;
use crate::core::models::structure::Structure;
use itertools::Itertools;
use kiddo::{KdTree, SquaredEuclidean};
use nalgebra::Point3;
use std::collections::HashSet;
use tracing::{debug, instrument};

/// Fixed tolerance, in Angstroms, below the scaled expected distance.
pub const DISTANCE_ERROR_MARGIN: f64 = 4.0;

/// Candidate residue instances per motif residue, in active-site order.
pub type CandidateMap = Vec<(usize, Vec<GroupId>)>;

/// One atom-pair distance query against a structure.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AtomPairQuery<'a> {
    /// Atom names: the first is returned, the second is the partner.
    pub atom_types: (&'a str, &'a str),
    pub residue_types: (ResidueType, ResidueType),
    pub distance: f64,
    pub precision_factor: f64,
}

impl<'a> AtomPairQuery<'a> {
    pub fn from_constraint(constraint: &OrientedConstraint<'a>, precision_factor: f64) -> Self {
        Self {
            atom_types: (constraint.atom, constraint.partner_atom),
            residue_types: (constraint.residue_type, constraint.partner_type),
            distance: constraint.distance,
            precision_factor,
        }
    }
}

/// The acceptance band: strictly closer than the scaled expected distance, and by less than
/// the scaled error margin.
#[inline]
pub fn within_band(measured: f64, expected: f64, precision_factor: f64) -> bool {
    let scaled = expected * precision_factor;
    measured < scaled && (measured - scaled).abs() < DISTANCE_ERROR_MARGIN * precision_factor
}

/// Returns every atom of the first type, inside a residue of the first type, that has an atom
/// of the second type in a different residue instance of the second type within the band.
///
/// Atoms come back in structure order (chains, then residues, then atoms) without repeats.
pub fn find_atoms(structure: &Structure, query: &AtomPairQuery) -> Vec<AtomId> {
    let (atom_name, partner_name) = query.atom_types;
    let (residue_type, partner_type) = query.residue_types;

    let partners: Vec<(GroupId, Point3<f64>)> = structure
        .groups_of_type(partner_type)
        .flat_map(|(group_id, _)| {
            structure
                .atoms_named(group_id, partner_name)
                .map(move |(_, atom)| (group_id, atom.position))
        })
        .collect();

    if partners.is_empty() {
        return Vec::new();
    }

    let partner_positions: Vec<[f64; 3]> = partners
        .iter()
        .map(|(_, p)| [p.x, p.y, p.z])
        .collect();
    let kdtree: KdTree<f64, 3> = (&partner_positions).into();
    let radius = query.distance * query.precision_factor;
    let radius_sq = radius * radius;

    structure
        .groups_of_type(residue_type)
        .flat_map(|(group_id, _)| structure.atoms_named(group_id, atom_name))
        .filter(|(_, atom)| {
            let position = [atom.position.x, atom.position.y, atom.position.z];
            kdtree
                .within_unsorted::<SquaredEuclidean>(&position, radius_sq)
                .iter()
                .any(|neighbour| {
                    let (partner_group, _) = partners[neighbour.item as usize];
                    partner_group != atom.group_id
                        && within_band(
                            neighbour.distance.sqrt(),
                            query.distance,
                            query.precision_factor,
                        )
                })
        })
        .map(|(atom_id, _)| atom_id)
        .collect()
}

/// Whether two residue instances hold an atom pair satisfying a constraint's band.
pub fn groups_satisfy(
    structure: &Structure,
    group: GroupId,
    partner: GroupId,
    constraint: &OrientedConstraint,
    precision_factor: f64,
) -> bool {
    if group == partner {
        return false;
    }
    structure
        .atoms_named(group, constraint.atom)
        .cartesian_product(
            structure
                .atoms_named(partner, constraint.partner_atom)
                .collect::<Vec<_>>(),
        )
        .any(|((_, a), (_, b))| {
            within_band(
                (a.position - b.position).norm(),
                constraint.distance,
                precision_factor,
            )
        })
}

/// Builds the candidate list of every motif residue.
///
/// A residue's candidates are the residue instances owning a qualifying atom for each of the
/// constraints it takes part in, intersected across those constraints and kept in order of
/// first discovery. A residue without constraints admits every residue instance of its own
/// type.
#[instrument(skip_all, name = "candidate_search_task", fields(motif = %motif.id, structure = %structure.id()))]
pub fn run(structure: &Structure, motif: &Motif, precision_factor: f64) -> CandidateMap {
    let mut candidate_map = CandidateMap::with_capacity(motif.size());

    for (index, residue) in motif.active_site.iter().enumerate() {
        let mut candidates: Option<Vec<GroupId>> = None;

        for constraint in motif.constraints_for(index) {
            let query = AtomPairQuery::from_constraint(&constraint, precision_factor);
            let found: Vec<GroupId> = find_atoms(structure, &query)
                .into_iter()
                .filter_map(|atom_id| structure.atom(atom_id).map(|a| a.group_id))
                .unique()
                .collect();

            let narrowed = match candidates {
                None => found,
                Some(previous) => {
                    let found: HashSet<GroupId> = found.into_iter().collect();
                    previous
                        .into_iter()
                        .filter(|g| found.contains(g))
                        .collect()
                }
            };
            let exhausted = narrowed.is_empty();
            candidates = Some(narrowed);
            if exhausted {
                break;
            }
        }

        let candidates = candidates.unwrap_or_else(|| {
            structure
                .groups_of_type(residue.residue_type)
                .map(|(group_id, _)| group_id)
                .collect()
        });

        debug!(
            residue = %residue,
            candidates = candidates.len(),
            "Collected candidate residue instances."
        );
        candidate_map.push((index, candidates));
    }

    candidate_map
}
