//! # Core Module
//!
//! Per-job building blocks of the confidence pipeline.
//!
//! - **Data Model** ([`models`]) - The parsed confidence document, the validated
//!   square error matrix and the artifact records
//! - **File I/O** ([`io`]) - Confidence document loading and the consolidated CSV report
//! - **Aggregation** ([`scoring`]) - Mean pLDDT and the per-job score file
//! - **Visualization** ([`render`]) - Deterministic PAE heatmap rendering to PNG

pub mod io;
pub mod models;
pub mod render;
pub mod scoring;
