use itertools::Itertools;
use nalgebra::{DMatrix, RowDVector};

/// Euclidean distance between rows `i` and `j` of an N×D coordinate matrix.
#[inline]
pub fn row_distance(coordinates: &DMatrix<f64>, i: usize, j: usize) -> f64 {
    (coordinates.row(i) - coordinates.row(j)).norm()
}

/// Symmetric N×N matrix of Euclidean distances between the rows of `coordinates`.
pub fn pairwise_distances(coordinates: &DMatrix<f64>) -> DMatrix<f64> {
    let n = coordinates.nrows();
    let mut distances = DMatrix::zeros(n, n);
    for (i, j) in (0..n).tuple_combinations() {
        let d = row_distance(coordinates, i, j);
        distances[(i, j)] = d;
        distances[(j, i)] = d;
    }
    distances
}

/// Raw stress: sum over pairs `i < j` of the squared residual between the embedded
/// distance and the target dissimilarity.
pub fn raw_stress(dissimilarities: &DMatrix<f64>, distances: &DMatrix<f64>) -> f64 {
    let n = dissimilarities.nrows();
    (0..n)
        .tuple_combinations()
        .map(|(i, j)| (distances[(i, j)] - dissimilarities[(i, j)]).powi(2))
        .sum()
}

/// Kruskal's stress-1: `sqrt(raw_stress / sum of squared dissimilarities)`.
///
/// Returns 0 when every dissimilarity is zero.
pub fn normalized_stress(raw_stress: f64, sum_of_squares: f64) -> f64 {
    if sum_of_squares <= 0.0 {
        0.0
    } else {
        (raw_stress / sum_of_squares).sqrt()
    }
}

/// Arithmetic mean of the selected rows.
///
/// Returns `None` when `members` is empty.
pub fn centroid(coordinates: &DMatrix<f64>, members: &[usize]) -> Option<RowDVector<f64>> {
    if members.is_empty() {
        return None;
    }
    let mut sum = RowDVector::zeros(coordinates.ncols());
    for &i in members {
        sum += coordinates.row(i);
    }
    Some(sum / members.len() as f64)
}

/// Mean Euclidean distance of the selected rows to `center`.
pub fn mean_distance_to(
    coordinates: &DMatrix<f64>,
    members: &[usize],
    center: &RowDVector<f64>,
) -> f64 {
    if members.is_empty() {
        return 0.0;
    }
    members
        .iter()
        .map(|&i| (coordinates.row(i) - center).norm())
        .sum::<f64>()
        / members.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triangle() -> DMatrix<f64> {
        DMatrix::from_row_slice(3, 2, &[0.0, 0.0, 3.0, 0.0, 0.0, 4.0])
    }

    #[test]
    fn pairwise_distances_are_symmetric_with_zero_diagonal() {
        let d = pairwise_distances(&triangle());
        assert_eq!(d[(0, 1)], 3.0);
        assert_eq!(d[(2, 0)], 4.0);
        assert_eq!(d[(1, 2)], 5.0);
        assert_eq!(d[(1, 2)], d[(2, 1)]);
        assert_eq!(d[(1, 1)], 0.0);
    }

    #[test]
    fn raw_stress_counts_each_pair_once() {
        let coords = triangle();
        let distances = pairwise_distances(&coords);
        assert_eq!(raw_stress(&distances, &distances), 0.0);

        let mut target = distances.clone();
        target[(0, 1)] = 2.0;
        target[(1, 0)] = 2.0;
        assert!((raw_stress(&target, &distances) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn normalized_stress_handles_zero_scale() {
        assert_eq!(normalized_stress(0.0, 0.0), 0.0);
        assert!((normalized_stress(1.0, 4.0) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn centroid_and_mean_distance_of_selected_rows() {
        let coords = DMatrix::from_row_slice(4, 1, &[0.0, 1.0, 2.0, 10.0]);
        let center = centroid(&coords, &[0, 1]).unwrap();
        assert!((center[0] - 0.5).abs() < 1e-12);
        assert!((mean_distance_to(&coords, &[0, 1], &center) - 0.5).abs() < 1e-12);
        assert!(centroid(&coords, &[]).is_none());
    }
}
