use crate::core::models::configuration::Configuration;
use crate::core::models::labels::CategoryLabels;
use crate::core::models::report::CoordinateRow;

/// One row per embedded entity, in configuration order, labelled by identifier lookup.
pub fn assemble(configuration: &Configuration, labels: &CategoryLabels) -> Vec<CoordinateRow> {
    configuration
        .iter()
        .map(|(identifier, coordinates)| CoordinateRow {
            identifier: identifier.to_string(),
            coordinates,
            category: labels.get(identifier).map(str::to_string),
        })
        .collect()
}
