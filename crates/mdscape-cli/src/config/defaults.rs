use mdscape::core::io::labels::{DEFAULT_CATEGORY_COLUMN, DEFAULT_ID_COLUMN};
use mdscape::core::models::matrix::DEFAULT_TOLERANCE;
use mdscape::engine::config::{
    DEFAULT_DIMENSIONS, DEFAULT_MAX_ITERATIONS, DEFAULT_N_INIT, DEFAULT_RELATIVE_TOLERANCE,
    DEFAULT_SEED, Initialization,
};

pub struct DefaultsConfig {
    pub dimensions: usize,
    pub n_init: usize,
    pub max_iterations: usize,
    pub relative_tolerance: f64,
    pub symmetry_tolerance: f64,
    pub seed: u64,
    pub initialization: Initialization,
    pub id_column: String,
    pub category_column: String,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            dimensions: DEFAULT_DIMENSIONS,
            n_init: DEFAULT_N_INIT,
            max_iterations: DEFAULT_MAX_ITERATIONS,
            relative_tolerance: DEFAULT_RELATIVE_TOLERANCE,
            symmetry_tolerance: DEFAULT_TOLERANCE,
            seed: DEFAULT_SEED,
            initialization: Initialization::default(),
            id_column: DEFAULT_ID_COLUMN.to_string(),
            category_column: DEFAULT_CATEGORY_COLUMN.to_string(),
        }
    }
}
