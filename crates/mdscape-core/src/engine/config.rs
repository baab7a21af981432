use crate::core::models::matrix::DEFAULT_TOLERANCE;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_DIMENSIONS: usize = 2;
pub const DEFAULT_N_INIT: usize = 4;
pub const DEFAULT_MAX_ITERATIONS: usize = 300;
pub const DEFAULT_RELATIVE_TOLERANCE: f64 = 1e-3;
pub const DEFAULT_SEED: u64 = 42;

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum ConfigError {
    #[error("Invalid value for '{parameter}': {reason}")]
    InvalidParameter {
        parameter: &'static str,
        reason: String,
    },

    #[error("Unknown initialization strategy '{0}'. Expected 'random' or 'classical'.")]
    UnknownInitialization(String),
}

/// How restart candidates obtain their starting configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Initialization {
    /// Every restart starts from points drawn uniformly from `[0, 1)^D`.
    Random,
    /// Restart 0 starts from the classical (Torgerson) MDS solution; the others are random.
    ///
    /// Random-only starts regularly stall in local minima in one dimension.
    #[default]
    Classical,
}

impl FromStr for Initialization {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "random" => Ok(Self::Random),
            "classical" | "torgerson" => Ok(Self::Classical),
            other => Err(ConfigError::UnknownInitialization(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct EmbeddingConfig {
    /// Target dimensionality D of the configuration.
    pub dimensions: usize,
    /// Number of independent restarts K.
    pub n_init: usize,
    pub max_iterations: usize,
    /// Iteration stops once `(previous - current) / previous` stress falls below this.
    pub relative_tolerance: f64,
    /// Master seed from which every restart derives its own generator.
    pub seed: u64,
    pub initialization: Initialization,
    /// Tolerance of the symmetry and zero-diagonal checks on raw input.
    pub symmetry_tolerance: f64,
    /// Wall-clock budget; restarts stop at the next iteration boundary once exceeded.
    pub timeout: Option<Duration>,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            dimensions: DEFAULT_DIMENSIONS,
            n_init: DEFAULT_N_INIT,
            max_iterations: DEFAULT_MAX_ITERATIONS,
            relative_tolerance: DEFAULT_RELATIVE_TOLERANCE,
            seed: DEFAULT_SEED,
            initialization: Initialization::default(),
            symmetry_tolerance: DEFAULT_TOLERANCE,
            timeout: None,
        }
    }
}

impl EmbeddingConfig {
    pub fn builder() -> EmbeddingConfigBuilder {
        EmbeddingConfigBuilder::new()
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |parameter, reason: &str| {
            Err(ConfigError::InvalidParameter {
                parameter,
                reason: reason.to_string(),
            })
        };
        if self.dimensions == 0 {
            return invalid("dimensions", "must be at least 1");
        }
        if self.n_init == 0 {
            return invalid("n_init", "at least one restart is required");
        }
        if self.max_iterations == 0 {
            return invalid("max_iterations", "must be at least 1");
        }
        if !(self.relative_tolerance.is_finite() && self.relative_tolerance > 0.0) {
            return invalid("relative_tolerance", "must be a positive finite number");
        }
        if !(self.symmetry_tolerance.is_finite() && self.symmetry_tolerance >= 0.0) {
            return invalid("symmetry_tolerance", "must be a non-negative finite number");
        }
        Ok(())
    }
}

#[derive(Default)]
pub struct EmbeddingConfigBuilder {
    dimensions: Option<usize>,
    n_init: Option<usize>,
    max_iterations: Option<usize>,
    relative_tolerance: Option<f64>,
    seed: Option<u64>,
    initialization: Option<Initialization>,
    symmetry_tolerance: Option<f64>,
    timeout: Option<Duration>,
}

impl EmbeddingConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn dimensions(mut self, dimensions: usize) -> Self {
        self.dimensions = Some(dimensions);
        self
    }
    pub fn n_init(mut self, n_init: usize) -> Self {
        self.n_init = Some(n_init);
        self
    }
    pub fn max_iterations(mut self, iterations: usize) -> Self {
        self.max_iterations = Some(iterations);
        self
    }
    pub fn relative_tolerance(mut self, tolerance: f64) -> Self {
        self.relative_tolerance = Some(tolerance);
        self
    }
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
    pub fn initialization(mut self, initialization: Initialization) -> Self {
        self.initialization = Some(initialization);
        self
    }
    pub fn symmetry_tolerance(mut self, tolerance: f64) -> Self {
        self.symmetry_tolerance = Some(tolerance);
        self
    }
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn build(self) -> Result<EmbeddingConfig, ConfigError> {
        let defaults = EmbeddingConfig::default();
        let config = EmbeddingConfig {
            dimensions: self.dimensions.unwrap_or(defaults.dimensions),
            n_init: self.n_init.unwrap_or(defaults.n_init),
            max_iterations: self.max_iterations.unwrap_or(defaults.max_iterations),
            relative_tolerance: self
                .relative_tolerance
                .unwrap_or(defaults.relative_tolerance),
            seed: self.seed.unwrap_or(defaults.seed),
            initialization: self.initialization.unwrap_or(defaults.initialization),
            symmetry_tolerance: self
                .symmetry_tolerance
                .unwrap_or(defaults.symmetry_tolerance),
            timeout: self.timeout.or(defaults.timeout),
        };
        config.validate()?;
        Ok(config)
    }
}

/// What to do with a label whose identifier is not part of the embedding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UnmatchedLabelPolicy {
    /// Skip the label and record a warning.
    #[default]
    Skip,
    /// Abort with `EngineError::UnknownCategory`.
    Fail,
}

/// Dispersion reported for categories with fewer than two members.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SmallGroupPolicy {
    /// Dispersion is exactly 0.0.
    #[default]
    Zero,
    /// Dispersion is undefined (`None`) and a warning is recorded.
    Undefined,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DispersionPolicy {
    pub unmatched_labels: UnmatchedLabelPolicy,
    pub small_groups: SmallGroupPolicy,
}

impl DispersionPolicy {
    pub fn strict() -> Self {
        Self {
            unmatched_labels: UnmatchedLabelPolicy::Fail,
            small_groups: SmallGroupPolicy::Undefined,
        }
    }
}

/// Parameters of the full landscape workflow.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LandscapeConfig {
    pub embedding: EmbeddingConfig,
    pub dispersion: DispersionPolicy,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let config = EmbeddingConfig::default();
        assert_eq!(config.dimensions, 2);
        assert_eq!(config.n_init, 4);
        assert_eq!(config.max_iterations, 300);
        assert_eq!(config.relative_tolerance, 1e-3);
        assert_eq!(config.seed, 42);
        assert_eq!(config.initialization, Initialization::Classical);
        assert_eq!(config.symmetry_tolerance, 1e-6);
        assert!(config.timeout.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn builder_overrides_only_given_fields() {
        let config = EmbeddingConfig::builder()
            .dimensions(1)
            .seed(7)
            .initialization(Initialization::Random)
            .build()
            .unwrap();
        assert_eq!(config.dimensions, 1);
        assert_eq!(config.seed, 7);
        assert_eq!(config.initialization, Initialization::Random);
        assert_eq!(config.n_init, DEFAULT_N_INIT);
    }

    #[test]
    fn builder_rejects_invalid_parameters() {
        let err = EmbeddingConfig::builder().dimensions(0).build().unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidParameter {
                parameter: "dimensions",
                ..
            }
        ));
        assert!(EmbeddingConfig::builder().n_init(0).build().is_err());
        assert!(EmbeddingConfig::builder().max_iterations(0).build().is_err());
        assert!(
            EmbeddingConfig::builder()
                .relative_tolerance(0.0)
                .build()
                .is_err()
        );
        assert!(
            EmbeddingConfig::builder()
                .relative_tolerance(f64::NAN)
                .build()
                .is_err()
        );
        assert!(
            EmbeddingConfig::builder()
                .symmetry_tolerance(-1.0)
                .build()
                .is_err()
        );
    }

    #[test]
    fn initialization_parses_from_str() {
        assert_eq!("random".parse::<Initialization>(), Ok(Initialization::Random));
        assert_eq!("Classical".parse::<Initialization>(), Ok(Initialization::Classical));
        assert!("pca".parse::<Initialization>().is_err());
    }

    #[test]
    fn strict_dispersion_policy() {
        let policy = DispersionPolicy::strict();
        assert_eq!(policy.unmatched_labels, UnmatchedLabelPolicy::Fail);
        assert_eq!(policy.small_groups, SmallGroupPolicy::Undefined);
        assert_eq!(DispersionPolicy::default().small_groups, SmallGroupPolicy::Zero);
    }
}
