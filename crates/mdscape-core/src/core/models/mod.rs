//! Data models for dissimilarity landscapes.
//!
//! - [`matrix`] - The validated, symmetric, zero-diagonal `DissimilarityMatrix`
//! - [`configuration`] - The embedded point set produced by the MDS engine
//! - [`labels`] - Identifier to category mapping joined to configurations by identifier
//! - [`dispersion`] - Per-category centroid and spread in the embedded space
//! - [`report`] - Coordinate rows joined with category labels

pub mod configuration;
pub mod dispersion;
pub mod labels;
pub mod matrix;
pub mod report;
