//! # Engine Module
//!
//! Numerical engine of MDScape: multi-start SMACOF embedding of a dissimilarity matrix and
//! per-category dispersion analysis of the resulting configuration.
//!
//! ## Architecture
//!
//! - **Configuration** ([`config`]) - Embedding parameters, initialization strategy and
//!   dispersion policies
//! - **Embedding** ([`embedder`]) - Parallel restarts, best-candidate selection and
//!   convergence reporting
//! - **Dispersion** ([`dispersion`]) - Label grouping, centroids and mean distance to centroid
//! - **Cancellation** ([`cancellation`]) - Cooperative cancellation and timeouts
//! - **Progress Monitoring** ([`progress`]) - Progress reporting callbacks
//! - **Error Handling** ([`error`]) - Engine-specific error types
//!
//! The SMACOF iteration itself ([`smacof`]) and the start strategies ([`initialization`])
//! are exposed for callers that need to drive a single restart directly.

pub mod cancellation;
pub mod config;
pub mod dispersion;
pub mod embedder;
pub mod error;
pub mod initialization;
pub mod progress;
pub mod smacof;
pub mod state;
