use mdscape::engine::config::LandscapeConfig;
use std::path::PathBuf;

pub struct AppConfig {
    pub matrix_path: PathBuf,
    pub metadata_path: Option<PathBuf>,
    pub output_dir: PathBuf,
    pub id_column: String,
    pub category_column: String,
    /// Categories whose dispersion ratio is printed, numerator first.
    pub compare: Option<(String, String)>,
    pub core_config: LandscapeConfig,
}
