//! # Workflows Module
//!
//! User-facing entry points that tie [`crate::core`] and [`crate::engine`]
//! together.
//!
//! - **Batch Workflow** ([`batch`]) - Scans a tree of job folders, writes the
//!   per-job score files and heatmaps, and flushes the consolidated score
//!   report once at the end.

pub mod batch;
