use super::align::{self, PairOutcome, PreparedMotif};
use crate::core::io::traits::{MotifSource, StructureProvider};
use crate::core::models::alignment::Alignment;
use crate::core::models::motif::Motif;
use crate::core::models::structure::Structure;
use crate::engine::context::MatchContext;
use crate::engine::error::EngineError;
use crate::engine::progress::Progress;
use std::collections::{BTreeMap, HashSet};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::{debug, info, instrument, warn};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// A caller-supplied motif evaluated after every motif from the source.
#[derive(Debug, Clone)]
pub struct CustomMotif {
    pub motif: Motif,
    /// The structure the motif's active site is resolved in.
    pub structure: Structure,
}

#[derive(Debug, Clone, Default)]
pub struct ScanRequest {
    pub structure_ids: Vec<String>,
    /// Classification prefix restricting which motifs the source pages through.
    pub ec_filter: Option<String>,
    pub custom_motifs: Vec<CustomMotif>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScanResult {
    /// Alignments per resolved structure. Every resolved structure has an entry.
    pub alignments: BTreeMap<String, Vec<Alignment>>,
    /// Structure identifiers the provider could not resolve.
    pub failed_structures: Vec<String>,
    pub motifs_evaluated: usize,
    /// Pairs abandoned because of the assignment limit or the deadline.
    pub skipped_pairs: usize,
}

impl ScanResult {
    pub fn alignment_count(&self) -> usize {
        self.alignments.values().map(Vec::len).sum()
    }
}

struct Targets {
    structures: Vec<Structure>,
    slots: Vec<Mutex<Vec<Alignment>>>,
    skipped: AtomicUsize,
}

impl Targets {
    fn new(structures: Vec<Structure>) -> Self {
        let slots = structures.iter().map(|_| Mutex::new(Vec::new())).collect();
        Self {
            structures,
            slots,
            skipped: AtomicUsize::new(0),
        }
    }

    fn deposit(
        &self,
        slot: &Mutex<Vec<Alignment>>,
        alignment: Alignment,
    ) -> Result<(), EngineError> {
        let mut slot = slot
            .lock()
            .map_err(|_| EngineError::Internal("result slot lock was poisoned".to_string()))?;
        if !slot.iter().any(|a| a.motif_id == alignment.motif_id) {
            slot.push(alignment);
        }
        Ok(())
    }

    fn into_result(
        self,
        failed_structures: Vec<String>,
        motifs_evaluated: usize,
    ) -> Result<ScanResult, EngineError> {
        let mut alignments = BTreeMap::new();
        for (structure, slot) in self.structures.into_iter().zip(self.slots) {
            let slot = slot
                .into_inner()
                .map_err(|_| EngineError::Internal("result slot lock was poisoned".to_string()))?;
            alignments.insert(structure.id().to_string(), slot);
        }
        Ok(ScanResult {
            alignments,
            failed_structures,
            motifs_evaluated,
            skipped_pairs: self.skipped.into_inner(),
        })
    }
}

/// Matches every motif from `source`, then every custom motif, against every structure.
///
/// Structures are resolved once up front; those that cannot be resolved are reported in
/// [`ScanResult::failed_structures`]. Motifs are taken one at a time, page by page, and each
/// motif is matched against all structures in parallel. A motif whose own structure cannot
/// be resolved, or that fails validation, is skipped with a warning.
///
/// Motif ids key both the memo store and the per-structure results, so a custom motif may
/// not reuse the id of another custom motif or of any motif the source yields.
///
/// # Errors
///
/// Fails if the motif source or the memo store fails, if a custom motif is invalid, or if
/// a custom motif id collides with another motif's.
#[instrument(skip_all, name = "scan_workflow")]
pub fn run(
    request: &ScanRequest,
    provider: &dyn StructureProvider,
    source: &dyn MotifSource,
    context: &MatchContext,
) -> Result<ScanResult, EngineError> {
    let mut custom_ids = HashSet::new();
    for custom in &request.custom_motifs {
        custom.motif.validate()?;
        if !custom_ids.insert(custom.motif.id.as_str()) {
            return Err(EngineError::DuplicateMotifId {
                id: custom.motif.id.clone(),
            });
        }
    }

    context.reporter.report(Progress::PhaseStart {
        name: "Resolving structures",
    });
    let (structures, failed_structures) = provider.resolve_all(&request.structure_ids);
    for structure in &structures {
        debug!(
            structure = %structure.id(),
            classification = structure.classification(),
            residues = structure.group_count(),
            "Target structure ready."
        );
    }
    info!(
        resolved = structures.len(),
        failed = failed_structures.len(),
        "Resolved target structures."
    );
    context.reporter.report(Progress::PhaseFinish);

    let targets = Targets::new(structures);
    let ec_filter = request.ec_filter.as_deref();
    let mut motifs_evaluated = 0usize;

    context.reporter.report(Progress::PhaseStart { name: "Scanning" });
    let mut page_number = 0usize;
    loop {
        let page = source
            .page(ec_filter, page_number)
            .map_err(|source| EngineError::MotifSource {
                page: page_number,
                source,
            })?;
        if page_number == 0 {
            let motif_count = page.total + request.custom_motifs.len();
            context.reporter.report(Progress::TaskStart {
                total_steps: (motif_count * targets.structures.len()) as u64,
            });
        }
        if !page.has_content() {
            break;
        }

        for motif in &page.motifs {
            if custom_ids.contains(motif.id.as_str()) {
                return Err(EngineError::DuplicateMotifId {
                    id: motif.id.clone(),
                });
            }
            if let Err(e) = motif.validate() {
                warn!(motif = %motif.id, error = %e, "Skipping invalid motif.");
                continue;
            }
            let motif_structure = match provider.fetch(&motif.source_structure) {
                Ok(structure) => structure,
                Err(e) => {
                    warn!(
                        motif = %motif.id,
                        structure = %motif.source_structure,
                        error = %e,
                        "Skipping motif whose structure could not be resolved."
                    );
                    continue;
                }
            };
            scan_motif(&PreparedMotif::new(motif, &motif_structure), &targets, context)?;
            motifs_evaluated += 1;
        }
        page_number += 1;
    }

    for custom in &request.custom_motifs {
        scan_motif(
            &PreparedMotif::new(&custom.motif, &custom.structure),
            &targets,
            context,
        )?;
        motifs_evaluated += 1;
    }

    context.reporter.report(Progress::TaskFinish);
    context.reporter.report(Progress::PhaseFinish);

    let result = targets.into_result(failed_structures, motifs_evaluated)?;
    info!(
        motifs = result.motifs_evaluated,
        alignments = result.alignment_count(),
        skipped_pairs = result.skipped_pairs,
        "Scan complete."
    );
    Ok(result)
}

fn scan_motif(
    prepared: &PreparedMotif,
    targets: &Targets,
    context: &MatchContext,
) -> Result<(), EngineError> {
    context.reporter.report(Progress::MotifStart {
        motif_id: prepared.motif.id.clone(),
    });

    let evaluate_pair = |(structure, slot): (&Structure, &Mutex<Vec<Alignment>>)|
     -> Result<(), EngineError> {
        let outcome = align::run(prepared, structure, context)?;
        context.reporter.report(Progress::TaskIncrement);
        match outcome {
            PairOutcome::Matched(alignment) => targets.deposit(slot, alignment),
            PairOutcome::NoMatch => Ok(()),
            PairOutcome::Skipped(_) => {
                targets.skipped.fetch_add(1, Ordering::Relaxed);
                Ok(())
            }
        }
    };

    #[cfg(not(feature = "parallel"))]
    let result = targets
        .structures
        .iter()
        .zip(targets.slots.iter())
        .try_for_each(evaluate_pair);

    #[cfg(feature = "parallel")]
    let result = targets
        .structures
        .par_iter()
        .zip(targets.slots.par_iter())
        .try_for_each(evaluate_pair);

    result
}
