use serde::Serialize;

/// Spread of one category in an embedded configuration.
///
/// `dispersion` is the mean Euclidean distance of the members to their centroid. For a
/// category with fewer than two members it is `Some(0.0)` under the default policy and
/// `None` ("undefined") when the analysis requires at least two members. It is never NaN.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DispersionResult {
    pub category: String,
    pub count: usize,
    pub centroid: Vec<f64>,
    pub dispersion: Option<f64>,
}
