//! # MDScape Core Library
//!
//! Metric multidimensional scaling (MDS) of structural dissimilarity matrices and
//! quantification of how tightly each biological category clusters in the embedded space.
//!
//! ## Architectural Philosophy
//!
//! The library follows a three-layer architecture:
//!
//! - **[`core`]: The Foundation.** Stateless data models (`DissimilarityMatrix`,
//!   `Configuration`, `CategoryLabels`), geometric helpers and CSV table I/O.
//!
//! - **[`engine`]: The Logic Core.** The SMACOF stress-majorization solver, the restart
//!   driver that selects the lowest-stress configuration, the group dispersion analyzer,
//!   together with configuration, progress reporting, cancellation and error types.
//!
//! - **[`workflows`]: The Public API.** End-to-end pipelines that chain validation,
//!   embedding, dispersion analysis and report assembly.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use mdscape::{analyze_dispersion, embed};
//! use mdscape::core::models::labels::CategoryLabels;
//! use mdscape::engine::config::{DispersionPolicy, EmbeddingConfig};
//!
//! let values = vec![
//!     vec![0.0, 1.0, 2.0, 3.0],
//!     vec![1.0, 0.0, 1.0, 2.0],
//!     vec![2.0, 1.0, 0.0, 1.0],
//!     vec![3.0, 2.0, 1.0, 0.0],
//! ];
//! let ids = vec!["A", "B", "C", "D"].into_iter().map(String::from).collect();
//!
//! let embedding = embed(values, ids, &EmbeddingConfig::default())?;
//! let labels = CategoryLabels::from_pairs([("A", "grp1"), ("B", "grp1"), ("C", "grp2"), ("D", "grp2")]);
//! let report = analyze_dispersion(&embedding.configuration, &labels, &DispersionPolicy::default())?;
//! # Ok::<(), mdscape::engine::error::EngineError>(())
//! ```

pub mod core;
pub mod engine;
pub mod workflows;

pub use workflows::landscape::{analyze_dispersion, embed};
