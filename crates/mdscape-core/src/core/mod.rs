//! # Core Module
//!
//! Stateless foundation of MDScape: the data models flowing through the pipeline,
//! geometric utilities shared by the solver and the analyzer, and CSV table I/O.
//!
//! ## Architecture
//!
//! - **Models** ([`models`]) - `DissimilarityMatrix` (validated input), `Configuration`
//!   (embedded point set) and `CategoryLabels` (identifier to category mapping)
//! - **I/O** ([`io`]) - Reading labelled dissimilarity and metadata tables, writing
//!   coordinate and dispersion tables
//! - **Utilities** ([`utils`]) - Pairwise distances, centroids and stress helpers
//!
//! Nothing in this module mutates its inputs; every model is immutable once built.

pub mod io;
pub mod models;
pub mod utils;
