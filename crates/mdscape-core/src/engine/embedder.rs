use super::cancellation::CancellationToken;
use super::config::{EmbeddingConfig, Initialization};
use super::error::EngineError;
use super::initialization;
use super::progress::{Progress, ProgressReporter};
use super::smacof::{self, SolverParams};
use super::state::{Candidate, Termination};
use crate::core::models::configuration::Configuration;
use crate::core::models::matrix::DissimilarityMatrix;
use crate::core::utils::geometry::normalized_stress;
use rand::{SeedableRng, rngs::StdRng};
use serde::Serialize;
use std::fmt;
use tracing::{debug, info, instrument, warn};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Outcome of one restart, kept for diagnostics.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RestartSummary {
    pub restart: usize,
    pub seed: u64,
    pub stress: f64,
    pub iterations: usize,
    pub termination: Termination,
}

/// The selected restart stopped before meeting the convergence criterion.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConvergenceWarning {
    pub stress: f64,
    pub iterations: usize,
    pub termination: Termination,
}

impl fmt::Display for ConvergenceWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.termination {
            Termination::Cancelled => write!(
                f,
                "embedding was cancelled after {} iterations (stress {:.6e})",
                self.iterations, self.stress
            ),
            _ => write!(
                f,
                "embedding did not converge within {} iterations (stress {:.6e})",
                self.iterations, self.stress
            ),
        }
    }
}

/// Best configuration found across all restarts.
#[derive(Debug, Clone)]
pub struct Embedding {
    pub configuration: Configuration,
    /// Raw stress `Σ_{i<j} (d_ij - δ_ij)²` of the selected configuration.
    pub stress: f64,
    /// Kruskal stress-1 of the selected configuration.
    pub normalized_stress: f64,
    pub iterations: usize,
    /// Index of the restart that produced `configuration`.
    pub restart: usize,
    pub restarts: Vec<RestartSummary>,
    pub warning: Option<ConvergenceWarning>,
}

impl Embedding {
    pub fn converged(&self) -> bool {
        self.warning.is_none()
    }
}

/// Embeds `matrix` into `config.dimensions` dimensions with multi-start SMACOF.
///
/// Restarts are independent and run in parallel when the `parallel` feature is enabled.
/// The result depends only on the matrix and the configuration, never on scheduling.
#[instrument(skip_all, name = "embedding", fields(entities = matrix.len(), dimensions = config.dimensions))]
pub fn run(
    matrix: &DissimilarityMatrix,
    config: &EmbeddingConfig,
    reporter: &ProgressReporter,
    cancellation: &CancellationToken,
) -> Result<Embedding, EngineError> {
    config.validate()?;

    let entities = matrix.len();
    let required = config.dimensions.saturating_add(2);
    if entities < required {
        return Err(EngineError::InsufficientData {
            entities,
            dimensions: config.dimensions,
            required,
        });
    }

    let cancellation = cancellation.child_with_timeout(config.timeout);
    let params = SolverParams {
        max_iterations: config.max_iterations,
        relative_tolerance: config.relative_tolerance,
    };
    let seeds = initialization::restart_seeds(config.seed, config.n_init);
    let classical_start = match config.initialization {
        Initialization::Classical => Some(initialization::classical(
            matrix.values(),
            config.dimensions,
        )),
        Initialization::Random => None,
    };

    info!(
        restarts = config.n_init,
        seed = config.seed,
        initialization = ?config.initialization,
        "Starting SMACOF restarts."
    );
    reporter.report(Progress::PhaseStart { name: "Embedding" });
    reporter.report(Progress::RestartsStart {
        total: config.n_init as u64,
    });

    let jobs: Vec<(usize, u64)> = seeds.into_iter().enumerate().collect();

    #[cfg(not(feature = "parallel"))]
    let iterator = jobs.iter();

    #[cfg(feature = "parallel")]
    let iterator = jobs.par_iter();

    let candidates: Vec<Candidate> = iterator
        .map(|&(restart, seed)| {
            let mut rng = StdRng::seed_from_u64(seed);
            let initial = match (&classical_start, restart) {
                (Some(start), 0) => start.clone(),
                _ => initialization::random_start(entities, config.dimensions, &mut rng),
            };
            let outcome = smacof::minimize(
                matrix.values(),
                initial,
                &params,
                &mut rng,
                &cancellation,
            );
            debug!(
                restart,
                seed,
                stress = outcome.stress,
                iterations = outcome.iterations,
                termination = %outcome.termination,
                perturbations = outcome.perturbations,
                "Restart finished."
            );
            reporter.report(Progress::RestartFinished {
                restart,
                stress: outcome.stress,
            });
            Candidate {
                restart,
                seed,
                coordinates: outcome.coordinates,
                stress: outcome.stress,
                iterations: outcome.iterations,
                termination: outcome.termination,
            }
        })
        .collect();

    reporter.report(Progress::RestartsFinish);

    let restarts: Vec<RestartSummary> = candidates
        .iter()
        .map(|c| RestartSummary {
            restart: c.restart,
            seed: c.seed,
            stress: c.stress,
            iterations: c.iterations,
            termination: c.termination,
        })
        .collect();

    let best = candidates
        .into_iter()
        .min()
        .ok_or_else(|| EngineError::Internal("no restart produced a candidate".to_string()))?;

    let warning = (best.termination != Termination::Converged).then(|| ConvergenceWarning {
        stress: best.stress,
        iterations: best.iterations,
        termination: best.termination,
    });
    if let Some(w) = &warning {
        warn!("{}", w);
    }

    let normalized = normalized_stress(best.stress, matrix.sum_of_squares());
    info!(
        restart = best.restart,
        stress = best.stress,
        normalized_stress = normalized,
        iterations = best.iterations,
        "Selected best restart."
    );
    reporter.report(Progress::PhaseFinish);

    let (identifiers, index) = matrix.shared_identifiers();
    Ok(Embedding {
        configuration: Configuration::new(identifiers, index, best.coordinates),
        stress: best.stress,
        normalized_stress: normalized,
        iterations: best.iterations,
        restart: best.restart,
        restarts,
        warning,
    })
}
