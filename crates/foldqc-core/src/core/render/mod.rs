//! # Render Module
//!
//! Turns a pairwise error matrix into a print-resolution PNG heatmap.
//!
//! The output is a pure function of the matrix, the job id and
//! [`heatmap::RenderSettings`]: the colour ramp is a fixed table, text is
//! drawn from an embedded bitmap font, and the PNG encoder writes no
//! timestamps. Two runs over the same input therefore produce identical bytes.
//!
//! - [`colormap`] - The reversed "Greens" ramp and value normalization
//! - [`canvas`] - An RGB pixel buffer with rectangle, text and PNG output
//! - [`glyphs`] - Glyph lookup over the `font8x8` tables
//! - [`heatmap`] - Figure layout and the per-job rendering entry points

pub mod canvas;
pub mod colormap;
pub mod glyphs;
pub mod heatmap;
