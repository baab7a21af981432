use super::defaults::DefaultsConfig;
use super::file::{FileConfig, FileDispersionConfig, FileEmbeddingConfig};
use super::models::AppConfig;
use crate::cli::EmbedArgs;
use crate::error::{CliError, Result};
use mdscape::engine::config as core_config;
use std::str::FromStr;
use std::time::Duration;

pub fn build_config(args: &EmbedArgs) -> Result<AppConfig> {
    let defaults = DefaultsConfig::default();

    let file_config = if let Some(config_path) = &args.config {
        FileConfig::from_file(config_path)?
    } else {
        FileConfig::default()
    };

    let mut file_config = apply_set_values(file_config, &args.set_values)?;

    let embedding_file = file_config.embedding.take().unwrap_or_default();
    let embedding = merge_embedding(args, embedding_file, &defaults)?;

    let dispersion_file = file_config.dispersion.take().unwrap_or_default();
    let dispersion = merge_dispersion(args, dispersion_file);

    let metadata_file = file_config.metadata.take().unwrap_or_default();
    let id_column = args
        .id_column
        .clone()
        .or(metadata_file.id_column)
        .unwrap_or(defaults.id_column);
    let category_column = args
        .category_column
        .clone()
        .or(metadata_file.category_column)
        .unwrap_or(defaults.category_column);

    let compare = args.compare.as_deref().map(parse_compare).transpose()?;

    Ok(AppConfig {
        matrix_path: args.matrix.clone(),
        metadata_path: args.metadata.clone(),
        output_dir: args.output_dir.clone(),
        id_column,
        category_column,
        compare,
        core_config: core_config::LandscapeConfig {
            embedding,
            dispersion,
        },
    })
}

fn merge_embedding(
    args: &EmbedArgs,
    file_val: FileEmbeddingConfig,
    defaults: &DefaultsConfig,
) -> Result<core_config::EmbeddingConfig> {
    let initialization = match args.initialization.as_deref().or(file_val.initialization.as_deref())
    {
        Some(name) => name
            .parse::<core_config::Initialization>()
            .map_err(|e| CliError::Config(e.to_string()))?,
        None => defaults.initialization,
    };

    let mut builder = core_config::EmbeddingConfigBuilder::new()
        .dimensions(
            args.dimensions
                .or(file_val.dimensions)
                .unwrap_or(defaults.dimensions),
        )
        .n_init(args.n_init.or(file_val.n_init).unwrap_or(defaults.n_init))
        .max_iterations(
            args.max_iterations
                .or(file_val.max_iterations)
                .unwrap_or(defaults.max_iterations),
        )
        .relative_tolerance(
            args.tolerance
                .or(file_val.relative_tolerance)
                .unwrap_or(defaults.relative_tolerance),
        )
        .symmetry_tolerance(
            args.symmetry_tolerance
                .or(file_val.symmetry_tolerance)
                .unwrap_or(defaults.symmetry_tolerance),
        )
        .seed(args.seed.or(file_val.seed).unwrap_or(defaults.seed))
        .initialization(initialization);

    if let Some(secs) = args.timeout.or(file_val.timeout_secs) {
        let timeout = Duration::try_from_secs_f64(secs).map_err(|_| {
            CliError::Config(format!(
                "Timeout must be a non-negative number of seconds, got {}",
                secs
            ))
        })?;
        builder = builder.timeout(timeout);
    }

    builder
        .build()
        .map_err(|e| CliError::Config(e.to_string()))
}

fn merge_dispersion(args: &EmbedArgs, file_val: FileDispersionConfig) -> core_config::DispersionPolicy {
    let strict = args.strict_labels || file_val.strict_labels.unwrap_or(false);
    let require_pairs = args.require_pairs || file_val.require_pairs.unwrap_or(false);
    core_config::DispersionPolicy {
        unmatched_labels: if strict {
            core_config::UnmatchedLabelPolicy::Fail
        } else {
            core_config::UnmatchedLabelPolicy::Skip
        },
        small_groups: if require_pairs {
            core_config::SmallGroupPolicy::Undefined
        } else {
            core_config::SmallGroupPolicy::Zero
        },
    }
}

fn parse_compare(value: &str) -> Result<(String, String)> {
    match value.split_once(',') {
        Some((a, b)) if !a.trim().is_empty() && !b.trim().is_empty() => {
            Ok((a.trim().to_string(), b.trim().to_string()))
        }
        _ => Err(CliError::Argument(format!(
            "Invalid --compare value: '{}'. Expected two categories as A,B.",
            value
        ))),
    }
}

fn parse_value<T: FromStr>(key: &str, value: &str, kind: &str) -> Result<T> {
    value
        .parse()
        .map_err(|_| CliError::Config(format!("Invalid {} value for {}: {}", kind, key, value)))
}

fn apply_set_values(mut config: FileConfig, set_values: &[String]) -> Result<FileConfig> {
    for kv_pair in set_values {
        let Some((key, value_str)) = kv_pair.split_once('=') else {
            return Err(CliError::Config(format!(
                "Invalid --set format: '{}'. Expected KEY=VALUE.",
                kv_pair
            )));
        };

        match key {
            "embedding.dimensions" => {
                config.embedding.get_or_insert_with(Default::default).dimensions =
                    Some(parse_value(key, value_str, "integer")?);
            }
            "embedding.n-init" => {
                config.embedding.get_or_insert_with(Default::default).n_init =
                    Some(parse_value(key, value_str, "integer")?);
            }
            "embedding.max-iterations" => {
                config.embedding.get_or_insert_with(Default::default).max_iterations =
                    Some(parse_value(key, value_str, "integer")?);
            }
            "embedding.relative-tolerance" => {
                config
                    .embedding
                    .get_or_insert_with(Default::default)
                    .relative_tolerance = Some(parse_value(key, value_str, "float")?);
            }
            "embedding.symmetry-tolerance" => {
                config
                    .embedding
                    .get_or_insert_with(Default::default)
                    .symmetry_tolerance = Some(parse_value(key, value_str, "float")?);
            }
            "embedding.seed" => {
                config.embedding.get_or_insert_with(Default::default).seed =
                    Some(parse_value(key, value_str, "integer")?);
            }
            "embedding.initialization" => {
                config.embedding.get_or_insert_with(Default::default).initialization =
                    Some(value_str.to_string());
            }
            "embedding.timeout-secs" => {
                config.embedding.get_or_insert_with(Default::default).timeout_secs =
                    Some(parse_value(key, value_str, "float")?);
            }
            "dispersion.strict-labels" => {
                config
                    .dispersion
                    .get_or_insert_with(Default::default)
                    .strict_labels = Some(parse_value(key, value_str, "boolean")?);
            }
            "dispersion.require-pairs" => {
                config
                    .dispersion
                    .get_or_insert_with(Default::default)
                    .require_pairs = Some(parse_value(key, value_str, "boolean")?);
            }
            "metadata.id-column" => {
                config
                    .metadata
                    .get_or_insert_with(Default::default)
                    .id_column = Some(value_str.to_string());
            }
            "metadata.category-column" => {
                config
                    .metadata
                    .get_or_insert_with(Default::default)
                    .category_column = Some(value_str.to_string());
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

#[cfg(test)]
mod tests {
    use super::*;
    use mdscape::engine::config::{Initialization, SmallGroupPolicy, UnmatchedLabelPolicy};
    use std::fs;
    use std::path::PathBuf;
    use tempfile::tempdir;

    fn base_embed_args() -> EmbedArgs {
        EmbedArgs {
            matrix: PathBuf::from("matrix.csv"),
            metadata: None,
            output_dir: PathBuf::from("out"),
            config: None,
            id_column: None,
            category_column: None,
            dimensions: None,
            n_init: None,
            max_iterations: None,
            tolerance: None,
            symmetry_tolerance: None,
            seed: None,
            initialization: None,
            timeout: None,
            strict_labels: false,
            require_pairs: false,
            compare: None,
            set_values: vec![],
        }
    }

    #[test]
    fn defaults_apply_when_nothing_is_given() {
        let app = build_config(&base_embed_args()).expect("build ok");
        let defaults = DefaultsConfig::default();
        let embedding = &app.core_config.embedding;

        assert_eq!(embedding.dimensions, defaults.dimensions);
        assert_eq!(embedding.n_init, defaults.n_init);
        assert_eq!(embedding.max_iterations, defaults.max_iterations);
        assert_eq!(embedding.relative_tolerance, defaults.relative_tolerance);
        assert_eq!(embedding.seed, 42);
        assert_eq!(embedding.initialization, Initialization::Classical);
        assert_eq!(embedding.timeout, None);
        assert_eq!(
            app.core_config.dispersion,
            core_config::DispersionPolicy::default()
        );
        assert_eq!(app.id_column, "Sequence_ID");
        assert_eq!(app.category_column, "Lineage");
        assert_eq!(app.compare, None);
    }

    #[test]
    fn file_values_are_merged() {
        let dir = tempdir().unwrap();
        let cfg_path = dir.path().join("config.toml");
        let toml = r#"
            [embedding]
            dimensions = 3
            n-init = 10
            max-iterations = 500
            relative-tolerance = 1e-5
            seed = 7
            initialization = "random"
            timeout-secs = 2.5

            [dispersion]
            strict-labels = true
            require-pairs = true

            [metadata]
            id-column = "id"
            category-column = "group"
            "#;
        fs::write(&cfg_path, toml).unwrap();

        let mut args = base_embed_args();
        args.config = Some(cfg_path);

        let app = build_config(&args).expect("build ok");
        let embedding = &app.core_config.embedding;
        assert_eq!(embedding.dimensions, 3);
        assert_eq!(embedding.n_init, 10);
        assert_eq!(embedding.max_iterations, 500);
        assert_eq!(embedding.relative_tolerance, 1e-5);
        assert_eq!(embedding.seed, 7);
        assert_eq!(embedding.initialization, Initialization::Random);
        assert_eq!(embedding.timeout, Some(Duration::from_millis(2500)));
        assert_eq!(
            app.core_config.dispersion,
            core_config::DispersionPolicy::strict()
        );
        assert_eq!(app.id_column, "id");
        assert_eq!(app.category_column, "group");
    }

    #[test]
    fn cli_overrides_file_and_set_values() {
        let dir = tempdir().unwrap();
        let cfg_path = dir.path().join("config.toml");
        fs::write(&cfg_path, "[embedding]\nn-init = 2\nseed = 1\n").unwrap();

        let mut args = base_embed_args();
        args.config = Some(cfg_path);
        args.set_values = vec!["embedding.n-init=6".to_string()];
        args.seed = Some(99);
        args.strict_labels = true;

        let app = build_config(&args).expect("build ok");
        assert_eq!(app.core_config.embedding.n_init, 6);
        assert_eq!(app.core_config.embedding.seed, 99);
        assert_eq!(
            app.core_config.dispersion.unmatched_labels,
            UnmatchedLabelPolicy::Fail
        );
        assert_eq!(
            app.core_config.dispersion.small_groups,
            SmallGroupPolicy::Zero
        );
    }

    #[test]
    fn set_values_override_defaults() {
        let mut args = base_embed_args();
        args.set_values = vec![
            "embedding.dimensions=1".to_string(),
            "embedding.max-iterations=50".to_string(),
            "embedding.relative-tolerance=0.01".to_string(),
            "embedding.initialization=random".to_string(),
            "dispersion.require-pairs=true".to_string(),
            "metadata.category-column=Clade".to_string(),
        ];

        let app = build_config(&args).expect("build ok");
        let embedding = &app.core_config.embedding;
        assert_eq!(embedding.dimensions, 1);
        assert_eq!(embedding.max_iterations, 50);
        assert!((embedding.relative_tolerance - 0.01).abs() < 1e-12);
        assert_eq!(embedding.initialization, Initialization::Random);
        assert_eq!(
            app.core_config.dispersion.small_groups,
            SmallGroupPolicy::Undefined
        );
        assert_eq!(app.category_column, "Clade");
    }

    #[test]
    fn malformed_set_values_are_rejected() {
        let mut args = base_embed_args();
        args.set_values = vec!["embedding.seed".to_string()];
        assert!(matches!(build_config(&args), Err(CliError::Config(_))));

        args.set_values = vec!["embedding.restarts=3".to_string()];
        assert!(matches!(build_config(&args), Err(CliError::Config(_))));

        args.set_values = vec!["embedding.n-init=many".to_string()];
        assert!(matches!(build_config(&args), Err(CliError::Config(_))));
    }

    #[test]
    fn invalid_parameters_surface_as_config_errors() {
        let mut args = base_embed_args();
        args.n_init = Some(0);
        assert!(matches!(build_config(&args), Err(CliError::Config(_))));

        let mut args = base_embed_args();
        args.initialization = Some("spectral".to_string());
        assert!(matches!(build_config(&args), Err(CliError::Config(_))));

        let mut args = base_embed_args();
        args.timeout = Some(-1.0);
        assert!(matches!(build_config(&args), Err(CliError::Config(_))));
    }

    #[test]
    fn compare_pair_is_parsed() {
        let mut args = base_embed_args();
        args.compare = Some("Extended, Compact".to_string());
        let app = build_config(&args).expect("build ok");
        assert_eq!(
            app.compare,
            Some(("Extended".to_string(), "Compact".to_string()))
        );

        args.compare = Some("Extended".to_string());
        assert!(matches!(build_config(&args), Err(CliError::Argument(_))));
    }
}
