use super::report;
use crate::core::models::configuration::Configuration;
use crate::core::models::labels::CategoryLabels;
use crate::core::models::matrix::DissimilarityMatrix;
use crate::core::models::report::CoordinateRow;
use crate::engine::cancellation::CancellationToken;
use crate::engine::config::{DispersionPolicy, EmbeddingConfig, LandscapeConfig};
use crate::engine::dispersion::{self, DispersionReport};
use crate::engine::embedder::{self, Embedding};
use crate::engine::error::EngineError;
use crate::engine::progress::{Progress, ProgressReporter};
use tracing::{info, instrument};

#[derive(Debug, Clone)]
pub struct LandscapeResult {
    pub embedding: Embedding,
    pub dispersion: DispersionReport,
    pub rows: Vec<CoordinateRow>,
}

/// Embeds a validated matrix and measures the spread of every labelled category.
///
/// # Arguments
///
/// * `matrix` - The validated dissimilarity matrix.
/// * `labels` - Identifier to category mapping, joined to the embedding by identifier.
/// * `config` - Embedding parameters and dispersion policies.
/// * `reporter` - Receives phase and per-restart progress events, and one message per
///   dispersion warning.
/// * `cancellation` - Checked at every iteration; a cancelled run still yields the best
///   configuration reached so far, flagged by a convergence warning.
///
/// # Errors
///
/// Returns [`EngineError`] for invalid parameters, too few entities for the requested
/// dimensionality, or an unmatched label under the strict label policy.
#[instrument(skip_all, name = "landscape_workflow", fields(entities = matrix.len()))]
pub fn run(
    matrix: &DissimilarityMatrix,
    labels: &CategoryLabels,
    config: &LandscapeConfig,
    reporter: &ProgressReporter,
    cancellation: &CancellationToken,
) -> Result<LandscapeResult, EngineError> {
    let embedding = embedder::run(matrix, &config.embedding, reporter, cancellation)?;

    reporter.report(Progress::PhaseStart { name: "Dispersion" });
    let dispersion = dispersion::analyze(&embedding.configuration, labels, &config.dispersion)?;
    for warning in &dispersion.warnings {
        reporter.report(Progress::Message(warning.to_string()));
    }
    let rows = report::assemble(&embedding.configuration, labels);
    reporter.report(Progress::PhaseFinish);

    info!(
        stress = embedding.stress,
        categories = dispersion.results.len(),
        converged = embedding.converged(),
        "Landscape workflow complete."
    );

    Ok(LandscapeResult {
        embedding,
        dispersion,
        rows,
    })
}

/// Validates a raw matrix and embeds it.
///
/// `config.symmetry_tolerance` bounds the allowed asymmetry and diagonal deviation.
pub fn embed(
    values: Vec<Vec<f64>>,
    identifiers: Vec<String>,
    config: &EmbeddingConfig,
) -> Result<Embedding, EngineError> {
    let matrix = DissimilarityMatrix::validate(values, identifiers, config.symmetry_tolerance)?;
    embedder::run(
        &matrix,
        config,
        &ProgressReporter::new(),
        &CancellationToken::new(),
    )
}

pub fn analyze_dispersion(
    configuration: &Configuration,
    labels: &CategoryLabels,
    policy: &DispersionPolicy,
) -> Result<DispersionReport, EngineError> {
    dispersion::analyze(configuration, labels, policy)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::matrix::MatrixError;
    use std::sync::Mutex;

    fn line_values() -> Vec<Vec<f64>> {
        vec![
            vec![0.0, 1.0, 2.0, 3.0],
            vec![1.0, 0.0, 1.0, 2.0],
            vec![2.0, 1.0, 0.0, 1.0],
            vec![3.0, 2.0, 1.0, 0.0],
        ]
    }

    fn line_ids() -> Vec<String> {
        ["A", "B", "C", "D"].into_iter().map(String::from).collect()
    }

    fn line_labels() -> CategoryLabels {
        CategoryLabels::from_pairs([("A", "grp1"), ("B", "grp1"), ("C", "grp2"), ("D", "grp2")])
    }

    fn one_dimensional() -> EmbeddingConfig {
        EmbeddingConfig::builder().dimensions(1).build().unwrap()
    }

    #[test]
    fn default_line_embedding_gives_equal_dispersions_for_any_seed() {
        for seed in [0, 1, 2, 3, 7, 11, 42, 1234] {
            let config = EmbeddingConfig::builder()
                .dimensions(1)
                .seed(seed)
                .build()
                .unwrap();
            let embedding = embed(line_values(), line_ids(), &config).unwrap();
            let distances = embedding.configuration.pairwise_distances();
            for i in 0..4 {
                for j in 0..4 {
                    let expected = line_values()[i][j];
                    assert!(
                        (distances[(i, j)] - expected).abs() < 0.05,
                        "seed {}: d({}, {}) = {}",
                        seed,
                        i,
                        j,
                        distances[(i, j)]
                    );
                }
            }

            let report =
                analyze_dispersion(&embedding.configuration, &line_labels(), &DispersionPolicy::default())
                    .unwrap();
            for category in ["grp1", "grp2"] {
                let value = report.get(category).unwrap().dispersion.unwrap();
                assert!((value - 0.5).abs() < 0.05, "seed {}: {} = {}", seed, category, value);
            }
        }
    }

    #[test]
    fn dispersion_warnings_are_forwarded_as_messages() {
        let matrix = DissimilarityMatrix::validate(line_values(), line_ids(), 1e-6).unwrap();
        let labels = CategoryLabels::from_pairs([("A", "grp1"), ("B", "grp1"), ("Z", "grp9")]);
        let config = LandscapeConfig {
            embedding: one_dimensional(),
            ..LandscapeConfig::default()
        };
        let messages = Mutex::new(Vec::new());
        let reporter = ProgressReporter::with_callback(Box::new(|event: Progress| {
            if let Progress::Message(text) = event {
                messages.lock().unwrap().push(text);
            }
        }));

        let result = run(
            &matrix,
            &labels,
            &config,
            &reporter,
            &CancellationToken::new(),
        )
        .unwrap();
        drop(reporter);

        let messages = messages.into_inner().unwrap();
        assert_eq!(messages.len(), result.dispersion.warnings.len());
        assert!(messages.iter().any(|m| m.contains("'Z'")));
        assert!(messages.iter().any(|m| m.contains("'C'")));
    }

    #[test]
    fn line_pipeline_recovers_group_dispersions() {
        let matrix = DissimilarityMatrix::validate(line_values(), line_ids(), 1e-6).unwrap();
        let config = LandscapeConfig {
            embedding: one_dimensional(),
            ..LandscapeConfig::default()
        };
        let result = run(
            &matrix,
            &line_labels(),
            &config,
            &ProgressReporter::new(),
            &CancellationToken::new(),
        )
        .unwrap();

        let grp1 = result.dispersion.get("grp1").unwrap().dispersion.unwrap();
        let grp2 = result.dispersion.get("grp2").unwrap().dispersion.unwrap();
        assert!((grp1 - 0.5).abs() < 0.05);
        assert!((grp2 - 0.5).abs() < 0.05);
        assert_eq!(result.rows.len(), 4);
        assert!(result.rows.iter().all(|r| r.category.is_some()));
    }

    #[test]
    fn scaling_the_matrix_scales_dispersion() {
        let config = one_dimensional();
        let base = embed(line_values(), line_ids(), &config).unwrap();
        let scaled_values: Vec<Vec<f64>> = line_values()
            .into_iter()
            .map(|row| row.into_iter().map(|v| v * 4.0).collect())
            .collect();
        let scaled = embed(scaled_values, line_ids(), &config).unwrap();

        let policy = DispersionPolicy::default();
        let a = analyze_dispersion(&base.configuration, &line_labels(), &policy).unwrap();
        let b = analyze_dispersion(&scaled.configuration, &line_labels(), &policy).unwrap();
        for (x, y) in a.results.iter().zip(&b.results) {
            let (x, y) = (x.dispersion.unwrap(), y.dispersion.unwrap());
            assert!((y - 4.0 * x).abs() < 1e-3, "{} vs 4 * {}", y, x);
        }
    }

    #[test]
    fn all_zero_matrix_gives_zero_dispersion_for_every_category() {
        let values = vec![vec![0.0; 4]; 4];
        let embedding = embed(values, line_ids(), &EmbeddingConfig::default()).unwrap();
        let report =
            analyze_dispersion(&embedding.configuration, &line_labels(), &DispersionPolicy::default())
                .unwrap();
        assert_eq!(report.results.len(), 2);
        for result in &report.results {
            assert!(result.dispersion.unwrap() < 1e-9);
        }
    }

    #[test]
    fn malformed_matrix_aborts_before_embedding() {
        let mut values = line_values();
        values[0][1] = -1.0;
        let err = embed(values, line_ids(), &EmbeddingConfig::default()).unwrap_err();
        assert!(matches!(
            err,
            EngineError::Matrix(MatrixError::InvalidValue {
                row: 0,
                column: 1,
                ..
            })
        ));
    }
}
