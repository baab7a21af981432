use serde::Serialize;

/// One embedded entity joined with its category, ready for tabulation or plotting.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CoordinateRow {
    pub identifier: String,
    pub coordinates: Vec<f64>,
    /// `None` for entities without a label.
    pub category: Option<String>,
}
