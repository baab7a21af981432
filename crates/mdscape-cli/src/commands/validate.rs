use crate::cli::ValidateArgs;
use crate::error::{CliError, Result};
use mdscape::core::io::matrix::MatrixTableReader;
use mdscape::core::io::traits::DelimitedTable;
use mdscape::core::models::matrix::DEFAULT_TOLERANCE;
use itertools::Itertools;
use mdscape::engine::error::EngineError;
use tracing::info;

/// Largest `|D[i][j] - D[j][i]|` over a square table.
fn max_asymmetry(rows: &[Vec<f64>]) -> f64 {
    let n = rows.len();
    (0..n)
        .tuple_combinations()
        .map(|(i, j)| (rows[i][j] - rows[j][i]).abs())
        .fold(0.0, f64::max)
}

pub async fn run(args: ValidateArgs) -> Result<()> {
    let tolerance = args.tolerance.unwrap_or(DEFAULT_TOLERANCE);
    info!("Validating {:?} with tolerance {}", &args.matrix, tolerance);

    let table = MatrixTableReader::default()
        .read_from_path(&args.matrix)
        .map_err(|e| CliError::Table {
            path: args.matrix.clone(),
            source: e.into(),
        })?;
    let raw_rows = table.rows.clone();
    let matrix = table
        .into_matrix(tolerance)
        .map_err(EngineError::from)?;
    let asymmetry = max_asymmetry(&raw_rows);

    println!("✓ {} is a valid dissimilarity matrix", args.matrix.display());
    println!("  Entities:           {}", matrix.len());
    println!("  Mean dissimilarity: {:.6}", matrix.mean_dissimilarity());
    println!("  Max asymmetry:      {:.3e}", asymmetry);
    Ok(())
}
