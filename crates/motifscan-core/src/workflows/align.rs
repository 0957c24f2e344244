use crate::core::models::alignment::Alignment;
use crate::core::models::ids::GroupId;
use crate::core::models::motif::{Motif, OrientedConstraint, Residue};
use crate::core::models::structure::Structure;
use crate::engine::cache::MatchRecord;
use crate::engine::config::MatchConfig;
use crate::engine::context::MatchContext;
use crate::engine::error::EngineError;
use crate::engine::tasks::superposition::{BestScore, Score};
use crate::engine::tasks::{admissibility, candidate_search, permutations, superposition};
use nalgebra::Point3;
use std::cell::Cell;
use std::fmt;
use std::time::{Duration, Instant};
use tracing::{debug, instrument, warn};

/// A motif together with the scoring atoms of its active site, resolved once per motif.
#[derive(Debug, Clone)]
pub struct PreparedMotif<'a> {
    pub motif: &'a Motif,
    reference: Vec<Point3<f64>>,
}

impl<'a> PreparedMotif<'a> {
    /// Resolves the active site inside the motif's own structure.
    ///
    /// A motif whose active site cannot be found keeps an empty reference; every assignment
    /// then scores as incomparable.
    pub fn new(motif: &'a Motif, motif_structure: &Structure) -> Self {
        let reference = superposition::motif_reference(motif, motif_structure).unwrap_or_default();
        Self { motif, reference }
    }

    pub fn reference(&self) -> &[Point3<f64>] {
        &self.reference
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SkipReason {
    TooManyAssignments { count: Option<usize>, limit: usize },
    DeadlineExceeded { budget: Duration },
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::TooManyAssignments {
                count: Some(count),
                limit,
            } => write!(f, "{count} assignments exceed the limit of {limit}"),
            SkipReason::TooManyAssignments { count: None, limit } => {
                write!(f, "assignment count overflows the limit of {limit}")
            }
            SkipReason::DeadlineExceeded { budget } => {
                write!(f, "evaluation exceeded its {budget:?} budget")
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum PairOutcome {
    Matched(Alignment),
    NoMatch,
    /// The pair was abandoned before a definitive answer; nothing is memoized.
    Skipped(SkipReason),
}

/// A constraint between two distinct motif residues, oriented from `first` to `second`.
struct PairwiseConstraint<'m> {
    first: usize,
    second: usize,
    oriented: OrientedConstraint<'m>,
}

fn pairwise_constraints(motif: &Motif) -> Vec<PairwiseConstraint<'_>> {
    motif
        .constraints
        .iter()
        .filter(|c| c.residues.0 != c.residues.1)
        .filter_map(|c| {
            c.oriented_for(c.residues.0).map(|oriented| PairwiseConstraint {
                first: c.residues.0,
                second: c.residues.1,
                oriented,
            })
        })
        .collect()
}

/// Checks the newest residue of a partial assignment against the residues already placed.
///
/// A residue instance may serve only one motif residue. With pruning enabled, every
/// constraint between the newest residue and an earlier one must hold between their groups.
fn is_consistent(
    structure: &Structure,
    constraints: &[PairwiseConstraint],
    partial: &[GroupId],
    config: &MatchConfig,
) -> bool {
    let Some((&newest, placed)) = partial.split_last() else {
        return true;
    };
    if placed.contains(&newest) {
        return false;
    }
    if !config.pairwise_pruning {
        return true;
    }
    let depth = placed.len();
    constraints
        .iter()
        .filter(|c| c.first.max(c.second) == depth)
        .all(|c| {
            candidate_search::groups_satisfy(
                structure,
                partial[c.first],
                partial[c.second],
                &c.oriented,
                config.precision_factor,
            )
        })
}

fn build_alignment(
    motif: &Motif,
    structure: &Structure,
    assignment: &[GroupId],
    distance: usize,
    rmsd: f64,
) -> Alignment {
    let aligned_residues = assignment
        .iter()
        .filter_map(|&id| structure.group(id))
        .map(|g| Residue::new(g.residue_type, &g.residue_id()))
        .collect();
    Alignment {
        motif_id: motif.id.clone(),
        active_site_residues: motif.active_site.clone(),
        aligned_residues,
        min_distance: distance,
        max_distance: distance,
        rmsd,
        ec_number: motif.ec_number.clone(),
    }
}

/// Evaluates one pair from scratch, without consulting or updating the memo store.
pub fn evaluate(prepared: &PreparedMotif, structure: &Structure, config: &MatchConfig) -> PairOutcome {
    let started = Instant::now();
    let motif = prepared.motif;

    let candidate_map = candidate_search::run(structure, motif, config.precision_factor);
    let lists: Vec<Vec<GroupId>> = candidate_map.into_iter().map(|(_, c)| c).collect();
    if lists.is_empty() || lists.iter().any(|l| l.is_empty()) {
        debug!("A motif residue has no candidates.");
        return PairOutcome::NoMatch;
    }

    let count = permutations::product_size(&lists);
    if count.is_none_or(|n| n > config.max_assignments) {
        return PairOutcome::Skipped(SkipReason::TooManyAssignments {
            count,
            limit: config.max_assignments,
        });
    }

    let constraints = pairwise_constraints(motif);
    let timed_out = Cell::new(false);
    let out_of_time = || {
        let expired = config.pair_deadline.is_some_and(|d| started.elapsed() > d);
        if expired {
            timed_out.set(true);
        }
        expired
    };

    let mut best = BestScore::new();
    let mut considered = 0usize;
    let assignments = permutations::Permutations::new(&lists, |partial: &[GroupId]| {
        !out_of_time() && is_consistent(structure, &constraints, partial, config)
    });
    for assignment in assignments {
        considered += 1;
        let Some(distance) = admissibility::admit(motif, structure, &assignment) else {
            continue;
        };
        let score = superposition::score(prepared.reference(), structure, &assignment);
        if score == Score::Incomparable {
            debug!(?assignment, "Assignment has mismatched atom counts.");
        }
        best.offer((assignment, distance), score);
    }

    if timed_out.get() {
        let budget = config.pair_deadline.unwrap_or_default();
        return PairOutcome::Skipped(SkipReason::DeadlineExceeded { budget });
    }

    debug!(considered, "Enumerated assignments.");
    match best.into_inner() {
        Some(((assignment, distance), rmsd)) => PairOutcome::Matched(build_alignment(
            motif,
            structure,
            &assignment,
            distance,
            rmsd,
        )),
        None => PairOutcome::NoMatch,
    }
}

/// Matches one motif against one structure, consulting the memo store first.
///
/// A fresh record short-circuits the evaluation. Otherwise the pair is evaluated and its
/// definitive outcome recorded; skipped pairs are left unrecorded.
///
/// # Errors
///
/// Fails only when the memo store fails.
#[instrument(skip_all, name = "align_pair", fields(motif = %prepared.motif.id, structure = %structure.id()))]
pub fn run(
    prepared: &PreparedMotif,
    structure: &Structure,
    context: &MatchContext,
) -> Result<PairOutcome, EngineError> {
    let motif_id = prepared.motif.id.as_str();
    let structure_id = structure.id();
    let precision_factor = context.precision_factor();

    if let Some(record) = context.store.lookup(motif_id, structure_id)? {
        if record.is_fresh(precision_factor, context.config.record_ttl_days, context.today) {
            debug!(matched = record.matched, "Reusing memoized outcome.");
            return Ok(match record.alignment {
                Some(alignment) if record.matched => PairOutcome::Matched(alignment),
                _ => PairOutcome::NoMatch,
            });
        }
        debug!("Memoized outcome is stale; re-evaluating.");
    }

    let outcome = evaluate(prepared, structure, context.config);
    match &outcome {
        PairOutcome::Matched(alignment) => context.store.record(
            motif_id,
            structure_id,
            MatchRecord::matched(alignment.clone(), precision_factor, context.today),
        )?,
        PairOutcome::NoMatch => context.store.record(
            motif_id,
            structure_id,
            MatchRecord::unmatched(precision_factor, context.today),
        )?,
        PairOutcome::Skipped(reason) => {
            warn!(%reason, "Pair skipped; outcome not recorded.");
        }
    }
    Ok(outcome)
}
