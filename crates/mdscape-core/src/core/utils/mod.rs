//! Geometric helpers shared by the embedding engine and the dispersion analyzer.

pub mod geometry;
