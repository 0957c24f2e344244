use super::defaults::DefaultsConfig;
use super::file::FileConfig;
use super::models::AppConfig;
use crate::cli::ScanArgs;
use crate::error::{CliError, Result};
use crate::paths::AppPaths;
use motifscan::engine::config::MatchConfigBuilder;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

pub fn build_config(args: &ScanArgs, paths: &AppPaths) -> Result<AppConfig> {
    let defaults = DefaultsConfig::default();

    let file_config = if let Some(config_path) = &args.config {
        FileConfig::from_file(config_path)?
    } else {
        FileConfig::default()
    };

    let mut file_config = apply_set_values(file_config, &args.set_values)?;

    let matching_file = file_config.matching.take().unwrap_or_default();
    let library_file = file_config.library.take().unwrap_or_default();
    let store_file = file_config.store.take().unwrap_or_default();
    let structures_file = file_config.structures.take().unwrap_or_default();

    let precision_factor = args
        .precision
        .or(matching_file.precision_factor)
        .unwrap_or(defaults.precision_factor);
    let max_assignments = args
        .max_assignments
        .or(matching_file.max_assignments)
        .unwrap_or(defaults.max_assignments);
    let pairwise_pruning = if args.no_pruning {
        false
    } else {
        matching_file
            .pairwise_pruning
            .unwrap_or(defaults.pairwise_pruning)
    };
    let pair_deadline = args
        .deadline_ms
        .or(matching_file.pair_deadline_ms)
        .map(Duration::from_millis);
    let record_ttl_days = args.record_ttl_days.or(matching_file.record_ttl_days);

    let core_config = MatchConfigBuilder::new()
        .precision_factor(precision_factor)
        .max_assignments(max_assignments)
        .pairwise_pruning(pairwise_pruning)
        .pair_deadline(pair_deadline)
        .record_ttl_days(record_ttl_days)
        .build()
        .map_err(|e| CliError::Config(e.to_string()))?;

    let structures_dir = args
        .structures
        .clone()
        .or(structures_file.directory)
        .ok_or_else(|| {
            CliError::Config(
                "A structures directory is required either in the config file (`structures.directory`) or via --structures.".to_string(),
            )
        })?;
    let library_path = args.motifs.clone().or(library_file.path).ok_or_else(|| {
        CliError::Config(
            "A motif library is required either in the config file (`library.path`) or via --motifs.".to_string(),
        )
    })?;

    let structure_ids = if args.ids.is_empty() {
        structures_file.ids
    } else {
        args.ids.clone()
    };
    let custom_motif_paths = if args.custom_motifs.is_empty() {
        library_file.custom_motifs
    } else {
        args.custom_motifs.clone()
    };

    let page_size = library_file.page_size.unwrap_or(defaults.page_size);
    if page_size == 0 {
        return Err(CliError::Config(
            "`library.page-size` must be at least 1.".to_string(),
        ));
    }

    let store_path = resolve_store_path(args, store_file.path, store_file.enabled, &defaults, paths);

    Ok(AppConfig {
        structures_dir,
        structure_ids,
        library_path,
        page_size,
        custom_motif_paths,
        ec_filter: args.ec.clone().or(library_file.ec_filter),
        store_path,
        output_path: args.output.clone().or(file_config.output),
        core_config,
    })
}

fn resolve_store_path(
    args: &ScanArgs,
    file_path: Option<PathBuf>,
    file_enabled: Option<bool>,
    defaults: &DefaultsConfig,
    paths: &AppPaths,
) -> Option<PathBuf> {
    if args.no_store {
        return None;
    }
    if let Some(path) = &args.store {
        return Some(path.clone());
    }
    if !file_enabled.unwrap_or(defaults.use_store) {
        return None;
    }
    Some(file_path.unwrap_or_else(|| paths.default_store_path()))
}

fn parse_value<T: FromStr>(key: &str, value_str: &str, kind: &str) -> Result<T> {
    value_str.parse().map_err(|_| {
        CliError::Config(format!("Invalid {} value for {}: {}", kind, key, value_str))
    })
}

fn apply_set_values(mut config: FileConfig, set_values: &[String]) -> Result<FileConfig> {
    if set_values.is_empty() {
        return Ok(config);
    }
    for kv_pair in set_values {
        let Some((key, value_str)) = kv_pair.split_once('=') else {
            return Err(CliError::Config(format!(
                "Invalid --set format: '{}'. Expected KEY=VALUE.",
                kv_pair
            )));
        };

        match key {
            "matching.precision-factor" => {
                config
                    .matching
                    .get_or_insert_with(Default::default)
                    .precision_factor = Some(parse_value(key, value_str, "float")?);
            }
            "matching.max-assignments" => {
                config
                    .matching
                    .get_or_insert_with(Default::default)
                    .max_assignments = Some(parse_value(key, value_str, "integer")?);
            }
            "matching.pairwise-pruning" => {
                config
                    .matching
                    .get_or_insert_with(Default::default)
                    .pairwise_pruning = Some(parse_value(key, value_str, "boolean")?);
            }
            "matching.pair-deadline-ms" => {
                config
                    .matching
                    .get_or_insert_with(Default::default)
                    .pair_deadline_ms = Some(parse_value(key, value_str, "integer")?);
            }
            "matching.record-ttl-days" => {
                config
                    .matching
                    .get_or_insert_with(Default::default)
                    .record_ttl_days = Some(parse_value(key, value_str, "integer")?);
            }
            "library.page-size" => {
                config
                    .library
                    .get_or_insert_with(Default::default)
                    .page_size = Some(parse_value(key, value_str, "integer")?);
            }
            "library.ec-filter" => {
                config
                    .library
                    .get_or_insert_with(Default::default)
                    .ec_filter = Some(value_str.to_string());
            }
            "store.enabled" => {
                config.store.get_or_insert_with(Default::default).enabled =
                    Some(parse_value(key, value_str, "boolean")?);
            }
            _ => {
                return Err(CliError::Config(format!(
                    "Unsupported configuration key for --set: '{}'",
                    key
                )));
            }
        }
    }
    Ok(config)
}
