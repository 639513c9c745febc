//! # Engine Module
//!
//! The stateful layer between the per-job building blocks in [`crate::core`]
//! and the batch workflow in [`crate::workflows`].
//!
//! - **Configuration** ([`config`]) - Stage switches, document naming, render settings
//!   and the failure policy, assembled through [`config::BatchConfigBuilder`]
//! - **Discovery** ([`scanner`]) - Job folder enumeration and document lookup
//! - **Progress Monitoring** ([`progress`]) - Event callbacks for front-ends
//! - **Error Handling** ([`error`]) - Errors that abort a batch run

pub mod config;
pub mod error;
pub mod progress;
pub mod scanner;
