//! SMACOF stress majorization for a single restart.
//!
//! Each iteration replaces the configuration `X` by its Guttman transform
//! `X' = B(X) X / N`, where `B_ij = -δ_ij / d_ij` off the diagonal and `B_ii = -Σ_j B_ij`.
//! With unit weights this never increases the raw stress `Σ_{i<j} (d_ij - δ_ij)²`.

use super::cancellation::CancellationToken;
use super::state::Termination;
use crate::core::utils::geometry::{pairwise_distances, raw_stress};
use itertools::Itertools;
use nalgebra::DMatrix;
use rand::Rng;
use tracing::trace;

/// Distances below this fraction of the mean dissimilarity count as coincident points.
const COINCIDENCE_RATIO: f64 = 1e-12;
/// Magnitude, relative to the mean dissimilarity, of the nudge separating coincident points.
const PERTURBATION_RATIO: f64 = 1e-6;
/// Stress at or below this fraction of the total squared dissimilarity is treated as exact.
const STRESS_FLOOR_RATIO: f64 = 1e-14;

#[derive(Debug, Clone, Copy)]
pub struct SolverParams {
    pub max_iterations: usize,
    pub relative_tolerance: f64,
}

#[derive(Debug, Clone)]
pub struct Minimized {
    pub coordinates: DMatrix<f64>,
    pub stress: f64,
    pub iterations: usize,
    pub termination: Termination,
    /// Stress of the starting configuration followed by the stress after each iteration.
    pub stress_history: Vec<f64>,
    pub perturbations: usize,
}

struct Scale {
    coincidence: f64,
    perturbation: f64,
    stress_floor: f64,
}

impl Scale {
    fn of(dissimilarities: &DMatrix<f64>) -> Self {
        let n = dissimilarities.nrows();
        let (sum, sum_sq, pairs) = (0..n)
            .tuple_combinations()
            .map(|(i, j)| dissimilarities[(i, j)])
            .fold((0.0, 0.0, 0usize), |(s, sq, c), d| (s + d, sq + d * d, c + 1));
        let mean = if pairs > 0 { sum / pairs as f64 } else { 0.0 };
        Self {
            coincidence: (COINCIDENCE_RATIO * mean).max(f64::MIN_POSITIVE),
            perturbation: PERTURBATION_RATIO * mean,
            stress_floor: STRESS_FLOOR_RATIO * sum_sq,
        }
    }
}

/// Runs SMACOF from `initial` until convergence, the iteration budget, or cancellation.
///
/// `rng` is only consumed when coincident points must be separated.
pub fn minimize(
    dissimilarities: &DMatrix<f64>,
    initial: DMatrix<f64>,
    params: &SolverParams,
    rng: &mut impl Rng,
    cancellation: &CancellationToken,
) -> Minimized {
    let scale = Scale::of(dissimilarities);

    let mut coordinates = initial;
    let mut distances = pairwise_distances(&coordinates);
    let mut stress = raw_stress(dissimilarities, &distances);
    let mut stress_history = vec![stress];
    let mut iterations = 0;
    let mut perturbations = 0;

    let mut termination = if stress <= scale.stress_floor {
        Termination::Converged
    } else {
        Termination::MaxIterations
    };

    while termination == Termination::MaxIterations && iterations < params.max_iterations {
        if cancellation.is_cancelled() {
            termination = Termination::Cancelled;
            break;
        }

        coordinates = guttman_transform(dissimilarities, &coordinates, &distances, scale.coincidence);
        distances = pairwise_distances(&coordinates);

        let separated = separate_coincident(
            dissimilarities,
            &mut coordinates,
            &distances,
            &scale,
            rng,
        );
        if separated > 0 {
            perturbations += separated;
            distances = pairwise_distances(&coordinates);
        }

        let previous = stress;
        stress = raw_stress(dissimilarities, &distances);
        iterations += 1;
        stress_history.push(stress);
        trace!(iteration = iterations, stress, "SMACOF iteration.");

        // A perturbed step says nothing about convergence.
        if separated > 0 {
            continue;
        }
        if stress <= scale.stress_floor
            || previous - stress < params.relative_tolerance * previous
        {
            termination = Termination::Converged;
        }
    }

    Minimized {
        coordinates,
        stress,
        iterations,
        termination,
        stress_history,
        perturbations,
    }
}

/// `B(X) X / N` with pairs closer than `coincidence` contributing nothing.
fn guttman_transform(
    dissimilarities: &DMatrix<f64>,
    coordinates: &DMatrix<f64>,
    distances: &DMatrix<f64>,
    coincidence: f64,
) -> DMatrix<f64> {
    let (n, dims) = coordinates.shape();
    let mut next = DMatrix::zeros(n, dims);
    for i in 0..n {
        for j in 0..n {
            let d = distances[(i, j)];
            if i == j || d < coincidence {
                continue;
            }
            let ratio = dissimilarities[(i, j)] / d;
            for k in 0..dims {
                next[(i, k)] += ratio * (coordinates[(i, k)] - coordinates[(j, k)]);
            }
        }
    }
    next / n as f64
}

/// Nudges apart pairs that coincide although their dissimilarity is positive.
///
/// Returns the number of points moved.
fn separate_coincident(
    dissimilarities: &DMatrix<f64>,
    coordinates: &mut DMatrix<f64>,
    distances: &DMatrix<f64>,
    scale: &Scale,
    rng: &mut impl Rng,
) -> usize {
    let n = coordinates.nrows();
    let mut moved = 0;
    for (i, j) in (0..n).tuple_combinations() {
        if distances[(i, j)] < scale.coincidence && dissimilarities[(i, j)] > scale.coincidence {
            for k in 0..coordinates.ncols() {
                coordinates[(j, k)] += scale.perturbation * rng.gen_range(-1.0_f64..1.0);
            }
            moved += 1;
            trace!(i, j, "Separated coincident points.");
        }
    }
    moved
}
