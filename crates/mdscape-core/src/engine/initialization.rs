use nalgebra::{DMatrix, SymmetricEigen};
use rand::{Rng, RngCore, SeedableRng, rngs::StdRng};
use tracing::{debug, instrument};

/// Derives one seed per restart from the master seed.
///
/// The sequence depends only on `seed` and `count`, so restarts are reproducible no matter
/// in which order or on which thread they run.
pub fn restart_seeds(seed: u64, count: usize) -> Vec<u64> {
    let mut master = StdRng::seed_from_u64(seed);
    (0..count).map(|_| master.next_u64()).collect()
}

/// N×D points drawn uniformly from `[0, 1)`.
pub fn random_start(n: usize, dimensions: usize, rng: &mut impl Rng) -> DMatrix<f64> {
    DMatrix::from_fn(n, dimensions, |_, _| rng.gen_range(0.0..1.0))
}

/// Classical (Torgerson) scaling of a dissimilarity matrix.
///
/// Double-centres the squared dissimilarities and projects onto the `dimensions` leading
/// eigenvectors scaled by the square root of their eigenvalue. Negative eigenvalues,
/// which arise for non-Euclidean input, contribute zero coordinates.
#[instrument(level = "debug", skip_all, fields(n = dissimilarities.nrows(), dimensions = dimensions))]
pub fn classical(dissimilarities: &DMatrix<f64>, dimensions: usize) -> DMatrix<f64> {
    let n = dissimilarities.nrows();
    let squared = dissimilarities.map(|d| d * d);

    let row_means: Vec<f64> = (0..n).map(|i| squared.row(i).mean()).collect();
    let col_means: Vec<f64> = (0..n).map(|j| squared.column(j).mean()).collect();
    let grand_mean = squared.mean();
    let centred = DMatrix::from_fn(n, n, |i, j| {
        -0.5 * (squared[(i, j)] - row_means[i] - col_means[j] + grand_mean)
    });

    let eigen = SymmetricEigen::new(centred);
    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by(|&a, &b| eigen.eigenvalues[b].total_cmp(&eigen.eigenvalues[a]));

    let mut coordinates = DMatrix::zeros(n, dimensions);
    for (k, &axis) in order.iter().take(dimensions).enumerate() {
        let scale = eigen.eigenvalues[axis].max(0.0).sqrt();
        for i in 0..n {
            coordinates[(i, k)] = eigen.eigenvectors[(i, axis)] * scale;
        }
    }
    debug!(
        leading_eigenvalue = ?order.first().map(|&a| eigen.eigenvalues[a]),
        "Classical scaling computed."
    );
    coordinates
}
