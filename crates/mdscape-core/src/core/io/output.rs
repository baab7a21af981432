use super::TableError;
use crate::core::models::dispersion::DispersionResult;
use crate::core::models::report::CoordinateRow;
use serde::Serialize;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

fn dimension_headers(prefix: &str, dimensions: usize) -> impl Iterator<Item = String> + '_ {
    (1..=dimensions).map(move |d| format!("{}{}", prefix, d))
}

/// Writes `identifier,Dim1..DimD,category`, one row per embedded entity.
///
/// Unlabelled entities get an empty category cell.
pub fn write_coordinates(
    rows: &[CoordinateRow],
    dimensions: usize,
    writer: impl Write,
) -> Result<(), TableError> {
    let mut csv_writer = csv::Writer::from_writer(writer);

    let mut header = vec!["identifier".to_string()];
    header.extend(dimension_headers("Dim", dimensions));
    header.push("category".to_string());
    csv_writer.write_record(&header)?;

    for row in rows {
        let mut record = Vec::with_capacity(header.len());
        record.push(row.identifier.clone());
        record.extend(row.coordinates.iter().map(|v| v.to_string()));
        record.push(row.category.clone().unwrap_or_default());
        csv_writer.write_record(&record)?;
    }
    csv_writer.flush()?;
    Ok(())
}

/// Writes `category,count,Centroid1..CentroidD,dispersion`, one row per category.
///
/// Undefined dispersion is written as an empty cell.
pub fn write_dispersion(
    results: &[DispersionResult],
    dimensions: usize,
    writer: impl Write,
) -> Result<(), TableError> {
    let mut csv_writer = csv::Writer::from_writer(writer);

    let mut header = vec!["category".to_string(), "count".to_string()];
    header.extend(dimension_headers("Centroid", dimensions));
    header.push("dispersion".to_string());
    csv_writer.write_record(&header)?;

    for result in results {
        let mut record = vec![result.category.clone(), result.count.to_string()];
        record.extend(result.centroid.iter().map(|v| v.to_string()));
        record.push(result.dispersion.map(|d| d.to_string()).unwrap_or_default());
        csv_writer.write_record(&record)?;
    }
    csv_writer.flush()?;
    Ok(())
}

/// Writes flat serializable records, with a header taken from the field names.
///
/// Nothing is written for an empty slice.
pub fn write_records<T: Serialize>(records: &[T], writer: impl Write) -> Result<(), TableError> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    for record in records {
        csv_writer.serialize(record)?;
    }
    csv_writer.flush()?;
    Ok(())
}

pub fn write_records_to_path<T: Serialize, P: AsRef<Path>>(
    records: &[T],
    path: P,
) -> Result<(), TableError> {
    let file = File::create(path)?;
    write_records(records, BufWriter::new(file))
}

pub fn write_coordinates_to_path<P: AsRef<Path>>(
    rows: &[CoordinateRow],
    dimensions: usize,
    path: P,
) -> Result<(), TableError> {
    let file = File::create(path)?;
    write_coordinates(rows, dimensions, BufWriter::new(file))
}

pub fn write_dispersion_to_path<P: AsRef<Path>>(
    results: &[DispersionResult],
    dimensions: usize,
    path: P,
) -> Result<(), TableError> {
    let file = File::create(path)?;
    write_dispersion(results, dimensions, BufWriter::new(file))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::embedder::RestartSummary;
    use crate::engine::state::Termination;

    fn rows() -> Vec<CoordinateRow> {
        vec![
            CoordinateRow {
                identifier: "A".into(),
                coordinates: vec![0.5, -1.0],
                category: Some("grp1".into()),
            },
            CoordinateRow {
                identifier: "B".into(),
                coordinates: vec![2.0, 0.0],
                category: None,
            },
        ]
    }

    #[test]
    fn coordinates_table_has_dimension_and_category_columns() {
        let mut buffer = Vec::new();
        write_coordinates(&rows(), 2, &mut buffer).unwrap();
        let text = String::from_utf8(buffer).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "identifier,Dim1,Dim2,category");
        assert_eq!(lines[1], "A,0.5,-1,grp1");
        assert_eq!(lines[2], "B,2,0,");
    }

    #[test]
    fn empty_coordinates_table_still_has_header() {
        let mut buffer = Vec::new();
        write_coordinates(&[], 3, &mut buffer).unwrap();
        let text = String::from_utf8(buffer).unwrap();
        assert_eq!(text, "identifier,Dim1,Dim2,Dim3,category\n");
    }

    #[test]
    fn dispersion_table_writes_undefined_as_empty() {
        let results = vec![
            DispersionResult {
                category: "grp1".into(),
                count: 2,
                centroid: vec![1.0, 0.0],
                dispersion: Some(0.5),
            },
            DispersionResult {
                category: "grp2".into(),
                count: 1,
                centroid: vec![3.0, 3.0],
                dispersion: None,
            },
        ];
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dispersion.csv");
        write_dispersion_to_path(&results, 2, &path).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "category,count,Centroid1,Centroid2,dispersion");
        assert_eq!(lines[1], "grp1,2,1,0,0.5");
        assert_eq!(lines[2], "grp2,1,3,3,");
    }

    #[test]
    fn restart_summaries_serialize_with_field_headers() {
        let summaries = vec![
            RestartSummary {
                restart: 0,
                seed: 7,
                stress: 0.5,
                iterations: 12,
                termination: Termination::Converged,
            },
            RestartSummary {
                restart: 1,
                seed: 9,
                stress: 2.0,
                iterations: 300,
                termination: Termination::MaxIterations,
            },
        ];
        let mut buffer = Vec::new();
        write_records(&summaries, &mut buffer).unwrap();
        let text = String::from_utf8(buffer).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "restart,seed,stress,iterations,termination");
        assert_eq!(lines[1], "0,7,0.5,12,converged");
        assert_eq!(lines[2], "1,9,2.0,300,max-iterations");
    }

    #[test]
    fn no_records_writes_nothing() {
        let mut buffer = Vec::new();
        write_records::<RestartSummary>(&[], &mut buffer).unwrap();
        assert!(buffer.is_empty());
    }
}
