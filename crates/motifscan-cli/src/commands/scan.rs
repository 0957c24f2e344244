use crate::cli::ScanArgs;
use crate::config::{AppConfig, build_config};
use crate::error::{CliError, Result};
use crate::export;
use crate::paths::AppPaths;
use crate::provider::PdbDirectoryProvider;
use crate::store;
use crate::utils::progress::CliProgressHandler;
use chrono::NaiveDate;
use motifscan::{
    core::io::traits::StructureProvider,
    core::models::motif::Motif,
    core::motifs::library::MotifLibrary,
    engine::{cache::InMemoryMatchStore, context::MatchContext, progress::ProgressReporter},
    workflows::scan::{self, CustomMotif, ScanRequest, ScanResult},
};
use std::path::Path;
use tracing::{debug, info, warn};

pub fn run(args: ScanArgs) -> Result<()> {
    let paths = AppPaths::new()?;
    info!("Building scan configuration...");
    let config = build_config(&args, &paths)?;
    debug!("Resolved configuration: {:?}", &config);

    let progress_handler = CliProgressHandler::new();
    let reporter = ProgressReporter::with_callback(progress_handler.get_callback());
    let today = chrono::Local::now().date_naive();

    println!("Starting motif scan...");
    let result = execute(&config, &reporter, today)?;
    print_summary(&result);

    if let Some(output) = &config.output_path {
        export::export_csv(output, &result)?;
        println!("✓ Alignments written to: {}", output.display());
    }
    Ok(())
}

/// Runs a scan end to end: loads inputs, matches, and persists the outcome store.
pub fn execute(
    config: &AppConfig,
    reporter: &ProgressReporter,
    today: NaiveDate,
) -> Result<ScanResult> {
    let provider = PdbDirectoryProvider::new(&config.structures_dir);

    let structure_ids = if config.structure_ids.is_empty() {
        let ids = provider.list_ids()?;
        info!(
            count = ids.len(),
            "No structure ids given; scanning every structure in {:?}.",
            provider.directory()
        );
        ids
    } else {
        config.structure_ids.clone()
    };
    if structure_ids.is_empty() {
        return Err(CliError::Argument(format!(
            "No structures to scan in {}",
            config.structures_dir.display()
        )));
    }

    info!("Loading motif library from {:?}", &config.library_path);
    let library = MotifLibrary::load(&config.library_path, config.page_size)?;

    let custom_motifs = config
        .custom_motif_paths
        .iter()
        .map(|path| load_custom_motif(path, &provider))
        .collect::<Result<Vec<_>>>()?;
    if let Some(custom) = custom_motifs
        .iter()
        .find(|c| library.motifs().iter().any(|m| m.id == c.motif.id))
    {
        return Err(CliError::Argument(format!(
            "Custom motif id '{}' is already used by the motif library",
            custom.motif.id
        )));
    }

    let store = match &config.store_path {
        Some(path) => store::load(path)?,
        None => InMemoryMatchStore::new(),
    };

    let request = ScanRequest {
        structure_ids,
        ec_filter: config.ec_filter.clone(),
        custom_motifs,
    };
    let context = MatchContext::new(&config.core_config, &store, reporter, today);

    info!("Invoking the core scan workflow...");
    let result = scan::run(&request, &provider, &library, &context)?;

    if let Some(path) = &config.store_path {
        store::save(&store, path)?;
    }
    Ok(result)
}

/// Reads a single-motif TOML file and resolves the structure its active site lives in.
fn load_custom_motif(path: &Path, provider: &dyn StructureProvider) -> Result<CustomMotif> {
    let content = std::fs::read_to_string(path)?;
    let motif: Motif = toml::from_str(&content).map_err(|e| CliError::FileParsing {
        path: path.to_path_buf(),
        source: e.into(),
    })?;
    let structure = provider.fetch(&motif.source_structure).map_err(|e| {
        CliError::Argument(format!(
            "Custom motif '{}' from {}: {}",
            motif.id,
            path.display(),
            e
        ))
    })?;
    debug!(motif = %motif.id, "Loaded custom motif.");
    Ok(CustomMotif { motif, structure })
}

fn print_summary(result: &ScanResult) {
    println!(
        "✓ Scanned {} structure(s) against {} motif(s): {} alignment(s) found.",
        result.alignments.len(),
        result.motifs_evaluated,
        result.alignment_count()
    );
    for (structure_id, alignments) in &result.alignments {
        if alignments.is_empty() {
            continue;
        }
        println!("  {}:", structure_id);
        for alignment in alignments {
            println!(
                "    {} (EC {}) RMSD {:.3} Å, {} edit(s)",
                alignment.motif_id,
                alignment.ec_number,
                alignment.rmsd,
                alignment.edit_distance()
            );
        }
    }
    if !result.failed_structures.is_empty() {
        warn!(
            "{} structure(s) could not be loaded.",
            result.failed_structures.len()
        );
        println!(
            "Warning: could not load structure(s): {}",
            result.failed_structures.join(", ")
        );
    }
    if result.skipped_pairs > 0 {
        println!(
            "Warning: {} (motif, structure) pair(s) were skipped for exceeding the assignment limit or deadline.",
            result.skipped_pairs
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::tests::atom_line;
    use motifscan::engine::cache::MatchStore;
    use motifscan::engine::config::MatchConfigBuilder;
    use std::fs;
    use std::path::PathBuf;
    use tempfile::{TempDir, tempdir};

    const TRIAD_LIBRARY: &str = r#"
[[motifs]]
id = "1TRI"
ec-number = "3.4.21.4"
source-structure = "1TRI"
active-site = [
    { type = "HIS", id = "57" },
    { type = "ASP", id = "102" },
    { type = "SER", id = "195" },
]

[[motifs.constraints]]
residues = [0, 1]
atoms = ["NE2", "OD1"]
residue-types = ["HIS", "ASP"]
distance = 5.0

[[motifs.constraints]]
residues = [0, 2]
atoms = ["NE2", "OG"]
residue-types = ["HIS", "SER"]
distance = 7.0

[[motifs.constraints]]
residues = [1, 2]
atoms = ["OD1", "OG"]
residue-types = ["ASP", "SER"]
distance = 6.0
"#;

    fn ser_position() -> [f64; 3] {
        let x = 32.25 / 9.0;
        [x, (42.25 - x * x).sqrt(), 0.0]
    }

    fn triad_pdb() -> String {
        [
            "COMPND   3 EC: 3.4.21.4;".to_string(),
            atom_line(1, "CA", ' ', "HIS", 'A', 57, [-1.0, -1.0, 0.0]),
            atom_line(2, "NE2", ' ', "HIS", 'A', 57, [0.0, 0.0, 0.0]),
            atom_line(3, "CA", ' ', "ASP", 'A', 102, [5.5, -1.0, 0.0]),
            atom_line(4, "OD1", ' ', "ASP", 'A', 102, [4.5, 0.0, 0.0]),
            atom_line(5, "CA", ' ', "SER", 'A', 195, [3.5, 6.5, 1.0]),
            atom_line(6, "OG", ' ', "SER", 'A', 195, ser_position()),
        ]
        .join("\n")
    }

    fn glycine_pdb() -> String {
        [
            atom_line(1, "CA", ' ', "GLY", 'A', 1, [0.0, 0.0, 0.0]),
            atom_line(2, "CA", ' ', "GLY", 'A', 2, [3.8, 0.0, 0.0]),
        ]
        .join("\n")
    }

    fn workspace() -> (TempDir, AppConfig) {
        let dir = tempdir().unwrap();
        let structures = dir.path().join("pdb");
        fs::create_dir_all(&structures).unwrap();
        fs::write(structures.join("1TRI.pdb"), triad_pdb()).unwrap();
        fs::write(structures.join("4GLY.pdb"), glycine_pdb()).unwrap();
        let library = dir.path().join("motifs.toml");
        fs::write(&library, TRIAD_LIBRARY).unwrap();

        let config = AppConfig {
            structures_dir: structures,
            structure_ids: vec![],
            library_path: library,
            page_size: 20,
            custom_motif_paths: vec![],
            ec_filter: None,
            store_path: Some(dir.path().join("state").join("outcomes.toml")),
            output_path: None,
            core_config: MatchConfigBuilder::new()
                .precision_factor(1.0)
                .build()
                .unwrap(),
        };
        (dir, config)
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, 1).unwrap()
    }

    #[test]
    fn scan_finds_the_triad_and_persists_outcomes() {
        let (_dir, mut config) = workspace();
        config.structure_ids = vec!["1TRI".into(), "4GLY".into(), "9ZZZ".into()];

        let result = execute(&config, &ProgressReporter::new(), today()).unwrap();

        assert_eq!(result.failed_structures, vec!["9ZZZ".to_string()]);
        assert_eq!(result.motifs_evaluated, 1);
        let hits = &result.alignments["1TRI"];
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].motif_id, "1TRI");
        assert_eq!(hits[0].ec_number, "3.4.21.4");
        assert!(hits[0].rmsd < 1e-6);
        assert!(result.alignments["4GLY"].is_empty());

        let reloaded = store::load(config.store_path.as_ref().unwrap()).unwrap();
        assert_eq!(reloaded.len(), 2);
        let negative = reloaded.lookup("1TRI", "4GLY").unwrap().unwrap();
        assert!(!negative.matched);
        assert_eq!(negative.recorded_on, today());
    }

    #[test]
    fn empty_id_list_scans_the_whole_directory() {
        let (_dir, config) = workspace();
        let result = execute(&config, &ProgressReporter::new(), today()).unwrap();
        let scanned: Vec<&str> = result.alignments.keys().map(String::as_str).collect();
        assert_eq!(scanned, vec!["1TRI", "4GLY"]);
    }

    #[test]
    fn custom_motifs_are_matched_after_the_library() {
        let (dir, mut config) = workspace();
        let custom = dir.path().join("custom.toml");
        let single = TRIAD_LIBRARY
            .replace("[[motifs]]\n", "")
            .replace("[[motifs.constraints]]", "[[constraints]]")
            .replace("id = \"1TRI\"\nec", "id = \"MY-TRIAD\"\nec");
        fs::write(&custom, single).unwrap();
        config.custom_motif_paths = vec![custom];
        config.store_path = None;

        let result = execute(&config, &ProgressReporter::new(), today()).unwrap();
        let ids: Vec<&str> = result.alignments["1TRI"]
            .iter()
            .map(|a| a.motif_id.as_str())
            .collect();
        assert_eq!(ids, vec!["1TRI", "MY-TRIAD"]);
    }

    #[test]
    fn custom_motif_reusing_a_library_id_is_an_argument_error() {
        let (dir, mut config) = workspace();
        let custom = dir.path().join("shadow.toml");
        fs::write(
            &custom,
            r#"
            id = "1TRI"
            ec-number = "3.4.22.2"
            source-structure = "4GLY"
            active-site = [{ type = "GLY", id = "1" }]
            "#,
        )
        .unwrap();
        config.custom_motif_paths = vec![custom];

        let result = execute(&config, &ProgressReporter::new(), today());
        assert!(matches!(result, Err(CliError::Argument(ref m)) if m.contains("1TRI")));
        assert!(!config.store_path.as_ref().unwrap().exists());
    }

    #[test]
    fn custom_motif_with_unknown_structure_is_an_argument_error() {
        let (dir, mut config) = workspace();
        let custom = dir.path().join("orphan.toml");
        fs::write(
            &custom,
            r#"
            id = "ORPHAN"
            ec-number = "1.1.1.1"
            source-structure = "0NOPE"
            active-site = [{ type = "SER", id = "1" }]
            "#,
        )
        .unwrap();
        config.custom_motif_paths = vec![custom];

        let result = execute(&config, &ProgressReporter::new(), today());
        assert!(matches!(result, Err(CliError::Argument(_))));
    }

    #[test]
    fn ec_filter_can_exclude_every_library_motif() {
        let (_dir, mut config) = workspace();
        config.ec_filter = Some("2.7".to_string());
        config.store_path = None;

        let result = execute(&config, &ProgressReporter::new(), today()).unwrap();
        assert_eq!(result.motifs_evaluated, 0);
        assert_eq!(result.alignment_count(), 0);
    }

    #[test]
    fn empty_structure_directory_is_rejected() {
        let (_dir, mut config) = workspace();
        let empty = tempdir().unwrap();
        config.structures_dir = PathBuf::from(empty.path());

        let result = execute(&config, &ProgressReporter::new(), today());
        assert!(matches!(result, Err(CliError::Argument(_))));
    }
}
