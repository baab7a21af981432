use crate::cli::EmbedArgs;
use crate::config::{AppConfig, build_config};
use crate::error::{CliError, Result};
use crate::utils::progress::CliProgressHandler;
use mdscape::core::io::labels::LabelTableReader;
use mdscape::core::io::matrix::MatrixTableReader;
use mdscape::core::io::output::{
    write_coordinates_to_path, write_dispersion_to_path, write_records_to_path,
};
use mdscape::core::io::traits::DelimitedTable;
use mdscape::core::models::labels::CategoryLabels;
use mdscape::engine::cancellation::CancellationToken;
use mdscape::engine::error::EngineError;
use mdscape::engine::progress::ProgressReporter;
use mdscape::workflows::landscape::{self, LandscapeResult};
use std::path::{Path, PathBuf};
use tokio::task;
use tracing::{info, warn};

pub const COORDINATES_FILE: &str = "coordinates.csv";
pub const DISPERSION_FILE: &str = "dispersion.csv";
pub const RESTARTS_FILE: &str = "restarts.csv";

fn table_error(path: &Path, source: impl Into<anyhow::Error>) -> CliError {
    CliError::Table {
        path: path.to_path_buf(),
        source: source.into(),
    }
}

fn load_labels(config: &AppConfig) -> Result<CategoryLabels> {
    let Some(path) = &config.metadata_path else {
        info!("No metadata table given; every entity is unlabelled.");
        return Ok(CategoryLabels::new());
    };
    info!("Loading category labels from {:?}", path);
    LabelTableReader::new(&config.id_column, &config.category_column)
        .read_from_path(path)
        .map_err(|e| table_error(path, e))
}

pub async fn run(args: EmbedArgs, show_progress: bool) -> Result<()> {
    info!("Merging configuration from defaults, file and CLI arguments...");
    let config = build_config(&args)?;

    info!("Loading dissimilarity matrix from {:?}", &config.matrix_path);
    let matrix = MatrixTableReader::default()
        .read_from_path(&config.matrix_path)
        .map_err(|e| table_error(&config.matrix_path, e))?
        .into_matrix(config.core_config.embedding.symmetry_tolerance)
        .map_err(EngineError::from)?;
    let labels = load_labels(&config)?;

    std::fs::create_dir_all(&config.output_dir)?;

    let progress_handler = if show_progress {
        CliProgressHandler::new()
    } else {
        CliProgressHandler::hidden()
    };
    let callback = progress_handler.get_callback();
    let cancellation = CancellationToken::new();

    println!(
        "Embedding {} entities into {} dimension(s) with {} restart(s)...",
        matrix.len(),
        config.core_config.embedding.dimensions,
        config.core_config.embedding.n_init
    );

    let worker_token = cancellation.clone();
    let landscape_config = config.core_config.clone();
    let mut worker = task::spawn_blocking(move || {
        let reporter = ProgressReporter::with_callback(callback);
        landscape::run(
            &matrix,
            &labels,
            &landscape_config,
            &reporter,
            &worker_token,
        )
    });

    let joined = tokio::select! {
        joined = &mut worker => joined,
        _ = tokio::signal::ctrl_c() => {
            warn!("Interrupt received; stopping restarts at the next iteration.");
            eprintln!("Interrupted. Finishing with the best configuration found so far...");
            cancellation.cancel();
            (&mut worker).await
        }
    };
    let result = joined??;

    write_outputs(&result, &config.output_dir)?;
    print_summary(&result, &config);
    Ok(())
}

fn write_outputs(result: &LandscapeResult, output_dir: &Path) -> Result<()> {
    let dimensions = result.embedding.configuration.dimensions();

    let coordinates_path: PathBuf = output_dir.join(COORDINATES_FILE);
    info!("Writing coordinates to {:?}", &coordinates_path);
    write_coordinates_to_path(&result.rows, dimensions, &coordinates_path)
        .map_err(|e| table_error(&coordinates_path, e))?;

    let dispersion_path: PathBuf = output_dir.join(DISPERSION_FILE);
    info!("Writing dispersion summary to {:?}", &dispersion_path);
    write_dispersion_to_path(&result.dispersion.results, dimensions, &dispersion_path)
        .map_err(|e| table_error(&dispersion_path, e))?;

    let restarts_path: PathBuf = output_dir.join(RESTARTS_FILE);
    info!("Writing restart diagnostics to {:?}", &restarts_path);
    write_records_to_path(&result.embedding.restarts, &restarts_path)
        .map_err(|e| table_error(&restarts_path, e))?;
    Ok(())
}

fn print_summary(result: &LandscapeResult, config: &AppConfig) {
    let embedding = &result.embedding;
    println!(
        "✓ Best restart #{}: stress {:.6e} (stress-1 {:.4}) after {} iteration(s)",
        embedding.restart, embedding.stress, embedding.normalized_stress, embedding.iterations
    );
    if let Some(warning) = &embedding.warning {
        println!("  Warning: {}", warning);
    }

    if !result.dispersion.results.is_empty() {
        println!("\nCategory dispersion (mean distance to centroid):");
        for r in &result.dispersion.results {
            let value = r
                .dispersion
                .map(|d| format!("{:.4}", d))
                .unwrap_or_else(|| "undefined".to_string());
            println!("  {:<24} n={:<6} {}", r.category, r.count, value);
        }
    }
    let label_warnings = result.dispersion.warnings.len();
    if label_warnings > 0 {
        println!("  {} label warning(s); rerun with -v for details.", label_warnings);
    }

    if let Some((a, b)) = &config.compare {
        match result.dispersion.ratio(a, b) {
            Some(ratio) => println!("\nDispersion ratio {}/{}: {:.2}x", a, b, ratio),
            None => println!("\nDispersion ratio {}/{}: not available", a, b),
        }
    }

    println!(
        "\nResults written to {}",
        config.output_dir.display()
    );
}
