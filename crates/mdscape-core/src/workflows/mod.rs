//! # Workflows Module
//!
//! High-level entry points that chain the engine stages into complete analyses.
//!
//! - **Landscape Workflow** ([`landscape`]) - Validation, multi-start embedding and
//!   per-category dispersion in one call
//! - **Report Assembly** ([`report`]) - Joins embedded coordinates with category labels
//!   into rows for tabulation or plotting

pub mod landscape;
pub mod report;
