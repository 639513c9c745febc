//! # Core Models Module
//!
//! Plain data records that flow through the confidence pipeline.
//!
//! ## Key Components
//!
//! - [`document`] - The parsed per-job confidence document and the validated
//!   square error matrix derived from it
//! - [`artifacts`] - Records describing what a processed job produced: score
//!   summaries, heatmap images and consolidated report rows
//!
//! None of these types perform I/O. Reading and writing lives in
//! [`crate::core::io`], rendering in [`crate::core::render`].

pub mod artifacts;
pub mod document;
