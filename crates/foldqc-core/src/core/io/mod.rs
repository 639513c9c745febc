//! Reading confidence documents and writing the consolidated score report.
//!
//! Per-job artifacts (score files, heatmaps) are written by the components
//! that produce them; this module only covers the two formats that sit at the
//! edges of a batch run.

pub mod confidence;
pub mod report;
