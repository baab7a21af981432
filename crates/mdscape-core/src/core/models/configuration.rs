use crate::core::utils::geometry;
use nalgebra::DMatrix;
use std::collections::HashMap;
use std::sync::Arc;

/// An embedded point set: N identified entities placed in D dimensions.
///
/// Rows of the coordinate matrix follow the identifier order of the dissimilarity matrix
/// the configuration was computed from. Only pairwise distances are meaningful; absolute
/// position, rotation and reflection are arbitrary.
#[derive(Debug, Clone, PartialEq)]
pub struct Configuration {
    identifiers: Arc<[String]>,
    index: Arc<HashMap<String, usize>>,
    coordinates: DMatrix<f64>,
}

impl Configuration {
    pub(crate) fn new(
        identifiers: Arc<[String]>,
        index: Arc<HashMap<String, usize>>,
        coordinates: DMatrix<f64>,
    ) -> Self {
        debug_assert_eq!(identifiers.len(), coordinates.nrows());
        Self {
            identifiers,
            index,
            coordinates,
        }
    }

    /// Builds a configuration from explicit identifiers and an N×D coordinate matrix.
    ///
    /// Returns `None` when the identifier count does not match the number of rows or an
    /// identifier is repeated.
    pub fn from_parts(identifiers: Vec<String>, coordinates: DMatrix<f64>) -> Option<Self> {
        if identifiers.len() != coordinates.nrows() {
            return None;
        }
        let index: HashMap<String, usize> = identifiers
            .iter()
            .enumerate()
            .map(|(i, id)| (id.clone(), i))
            .collect();
        if index.len() != identifiers.len() {
            return None;
        }
        Some(Self::new(identifiers.into(), Arc::new(index), coordinates))
    }

    pub fn len(&self) -> usize {
        self.coordinates.nrows()
    }

    pub fn is_empty(&self) -> bool {
        self.coordinates.nrows() == 0
    }

    pub fn dimensions(&self) -> usize {
        self.coordinates.ncols()
    }

    pub fn identifiers(&self) -> &[String] {
        &self.identifiers
    }

    pub fn index_of(&self, identifier: &str) -> Option<usize> {
        self.index.get(identifier).copied()
    }

    /// The N×D coordinate matrix, one row per entity.
    pub fn coordinates(&self) -> &DMatrix<f64> {
        &self.coordinates
    }

    pub fn point(&self, i: usize) -> Vec<f64> {
        self.coordinates.row(i).iter().copied().collect()
    }

    pub fn point_of(&self, identifier: &str) -> Option<Vec<f64>> {
        self.index_of(identifier).map(|i| self.point(i))
    }

    /// Euclidean distance between entities `i` and `j`.
    pub fn distance(&self, i: usize, j: usize) -> f64 {
        geometry::row_distance(&self.coordinates, i, j)
    }

    /// Full N×N matrix of Euclidean distances between embedded points.
    pub fn pairwise_distances(&self) -> DMatrix<f64> {
        geometry::pairwise_distances(&self.coordinates)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Vec<f64>)> + '_ {
        self.identifiers
            .iter()
            .enumerate()
            .map(|(i, id)| (id.as_str(), self.point(i)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square() -> Configuration {
        let coords = DMatrix::from_row_slice(4, 2, &[0.0, 0.0, 1.0, 0.0, 1.0, 1.0, 0.0, 1.0]);
        Configuration::from_parts(
            vec!["a".into(), "b".into(), "c".into(), "d".into()],
            coords,
        )
        .unwrap()
    }

    #[test]
    fn from_parts_rejects_mismatched_or_duplicate_identifiers() {
        let coords = DMatrix::zeros(2, 2);
        assert!(Configuration::from_parts(vec!["a".into()], coords.clone()).is_none());
        assert!(Configuration::from_parts(vec!["a".into(), "a".into()], coords).is_none());
    }

    #[test]
    fn accessors_expose_points_by_index_and_identifier() {
        let config = square();
        assert_eq!(config.len(), 4);
        assert_eq!(config.dimensions(), 2);
        assert_eq!(config.point(2), vec![1.0, 1.0]);
        assert_eq!(config.point_of("d"), Some(vec![0.0, 1.0]));
        assert_eq!(config.point_of("z"), None);
        assert_eq!(config.iter().count(), 4);
    }

    #[test]
    fn pairwise_distances_are_euclidean() {
        let config = square();
        let distances = config.pairwise_distances();
        assert_eq!(distances[(0, 1)], 1.0);
        assert!((distances[(0, 2)] - 2f64.sqrt()).abs() < 1e-12);
        assert_eq!(distances[(3, 3)], 0.0);
        assert!((config.distance(1, 3) - 2f64.sqrt()).abs() < 1e-12);
    }
}
