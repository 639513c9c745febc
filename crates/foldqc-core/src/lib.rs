//! # foldqc Core Library
//!
//! Batch post-processing for structure-prediction outputs. Given a directory
//! with one folder per prediction job, the library summarizes each job's
//! per-atom confidence (pLDDT), renders its predicted aligned error (PAE)
//! matrix as a heatmap, and writes one table of average scores for the whole
//! batch.
//!
//! ## Layers
//!
//! - **[`core`]: The Foundation.** Stateless building blocks: the confidence
//!   document model, JSON loading, score aggregation, heatmap rendering and the
//!   CSV report writer. Each works on a single job and knows nothing about
//!   batches.
//!
//! - **[`engine`]: Run Context.** Configuration, job folder discovery, progress
//!   events and the errors that can stop a run.
//!
//! - **[`workflows`]: The Public API.** [`workflows::batch::run`] drives the whole
//!   pipeline over a root directory and applies the configured failure policy.

pub mod core;
pub mod engine;
pub mod workflows;
