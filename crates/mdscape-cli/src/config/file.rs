use crate::error::{CliError, Result};
use serde::Deserialize;
use std::path::Path;
use tracing::debug;

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct FileEmbeddingConfig {
    pub dimensions: Option<usize>,
    pub n_init: Option<usize>,
    pub max_iterations: Option<usize>,
    pub relative_tolerance: Option<f64>,
    pub symmetry_tolerance: Option<f64>,
    pub seed: Option<u64>,
    pub initialization: Option<String>,
    pub timeout_secs: Option<f64>,
}

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct FileDispersionConfig {
    pub strict_labels: Option<bool>,
    pub require_pairs: Option<bool>,
}

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct FileMetadataConfig {
    pub id_column: Option<String>,
    pub category_column: Option<String>,
}

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub embedding: Option<FileEmbeddingConfig>,
    pub dispersion: Option<FileDispersionConfig>,
    pub metadata: Option<FileMetadataConfig>,
}

impl FileConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        debug!("Loading configuration from file: {:?}", path);
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| CliError::Table {
            path: path.to_path_buf(),
            source: e.into(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn parses_kebab_case_sections() {
        let config: FileConfig = toml::from_str(
            r#"
            [embedding]
            n-init = 8
            relative-tolerance = 1e-4
            initialization = "classical"

            [dispersion]
            require-pairs = true

            [metadata]
            category-column = "Group"
            "#,
        )
        .unwrap();
        let embedding = config.embedding.unwrap();
        assert_eq!(embedding.n_init, Some(8));
        assert_eq!(embedding.relative_tolerance, Some(1e-4));
        assert_eq!(embedding.initialization.as_deref(), Some("classical"));
        assert_eq!(config.dispersion.unwrap().require_pairs, Some(true));
        assert_eq!(
            config.metadata.unwrap().category_column.as_deref(),
            Some("Group")
        );
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("bad.toml");
        fs::write(&path, "[embedding]\nrestarts = 3\n").unwrap();
        let err = FileConfig::from_file(&path).unwrap_err();
        assert!(matches!(err, CliError::Table { .. }));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let dir = tempdir().unwrap();
        let err = FileConfig::from_file(&dir.path().join("absent.toml")).unwrap_err();
        assert!(matches!(err, CliError::Io(_)));
    }
}
