use super::canvas::Canvas;
use super::colormap::{ColorScale, Normalizer, Rgb, greens_reversed};
use super::glyphs::GLYPH_SIZE;
use crate::core::models::artifacts::HeatmapArtifact;
use crate::core::models::document::{MatrixError, SquareMatrix};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

pub const HEATMAP_SUFFIX: &str = "_pae_heatmap.png";
pub const X_LABEL: &str = "Scored Residue";
pub const Y_LABEL: &str = "Aligned Residue";
pub const COLORBAR_LABEL: &str = "Expected Position Error (Å)";

const BACKGROUND: Rgb = [255, 255, 255];
const INK: Rgb = [0, 0, 0];
const MAX_TICKS: usize = 5;
/// Canvas pixels per unit of glyph scale.
const PIXELS_PER_GLYPH_SCALE: u32 = 400;

#[derive(Debug, Clone, PartialEq)]
pub struct RenderSettings {
    pub dpi: u32,
    /// Edge length of the square figure in inches.
    pub figure_size: f64,
    pub color_scale: ColorScale,
    /// Upper bound on the matrix copy plus the pixel buffer, in bytes.
    pub max_render_bytes: u64,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            dpi: 300,
            figure_size: 8.0,
            color_scale: ColorScale::Auto,
            max_render_bytes: 2 * 1024 * 1024 * 1024,
        }
    }
}

impl RenderSettings {
    pub fn canvas_side(&self) -> u32 {
        let side = (self.figure_size * self.dpi as f64).round();
        if side < 1.0 {
            1
        } else if side > u32::MAX as f64 {
            u32::MAX
        } else {
            side as u32
        }
    }

    /// Bytes needed to render an `dim x dim` matrix at these settings.
    pub fn estimated_bytes(&self, dim: usize) -> u64 {
        let dim = dim as u64;
        let side = self.canvas_side() as u64;
        dim.saturating_mul(dim)
            .saturating_mul(std::mem::size_of::<f64>() as u64)
            .saturating_add(side.saturating_mul(side).saturating_mul(3))
    }
}

#[derive(Debug, Error)]
pub enum RenderError {
    #[error(transparent)]
    Matrix(#[from] MatrixError),

    #[error(
        "Rendering a {dim}x{dim} matrix needs about {required} bytes, over the budget of {budget} bytes"
    )]
    ExceedsBudget {
        dim: usize,
        required: u64,
        budget: u64,
    },

    #[error("A {side}px canvas is too small to lay out the heatmap")]
    CanvasTooSmall { side: u32 },

    #[error("Failed to write heatmap '{path}': {source}", path = path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to encode heatmap '{path}': {source}", path = path.display())]
    Encoding {
        path: PathBuf,
        #[source]
        source: png::EncodingError,
    },
}

impl RenderError {
    /// True for failures caused by the matrix or the settings rather than by
    /// the filesystem.
    pub fn is_validation_failure(&self) -> bool {
        matches!(
            self,
            RenderError::Matrix(_)
                | RenderError::ExceedsBudget { .. }
                | RenderError::CanvasTooSmall { .. }
        )
    }
}

pub fn heatmap_file_name(job: &str) -> String {
    format!("{}{}", job, HEATMAP_SUFFIX)
}

/// Pixel geometry of one figure. All coordinates are canvas pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Layout {
    pub side: u32,
    pub scale: u32,
    pub heat_x: i64,
    pub heat_y: i64,
    pub heat_side: i64,
    unit: i64,
    tick_len: i64,
    line: i64,
}

impl Layout {
    fn compute(side: u32, tick_chars: usize, bar_chars: usize) -> Result<Self, RenderError> {
        let scale = (side / PIXELS_PER_GLYPH_SCALE).max(1);
        let unit = (GLYPH_SIZE * scale) as i64;
        let half = unit / 2;
        let margin = unit;
        let tick_len = half.max(1);
        let line = (scale as i64 / 2).max(1);

        let left = margin + unit + half + tick_chars as i64 * unit + half + tick_len;
        let right =
            unit + unit + tick_len + half + bar_chars as i64 * unit + half + unit + margin;
        let top = margin + unit + unit;
        let bottom = tick_len + half + unit + half + unit + margin;

        let avail_w = side as i64 - left - right;
        let avail_h = side as i64 - top - bottom;
        let heat_side = avail_w.min(avail_h);
        if heat_side < 1 {
            return Err(RenderError::CanvasTooSmall { side });
        }

        Ok(Self {
            side,
            scale,
            heat_x: left + (avail_w - heat_side) / 2,
            heat_y: top + (avail_h - heat_side) / 2,
            heat_side,
            unit,
            tick_len,
            line,
        })
    }

    /// Horizontal (or vertical) pixel at the centre of residue `index`.
    fn cell_center(&self, index: usize, dim: usize) -> i64 {
        let offset = ((2 * index as u64 + 1) * self.heat_side as u64) / (2 * dim as u64);
        offset as i64
    }

    /// Maps a heat-area pixel offset to a matrix index (nearest neighbour).
    #[inline]
    fn cell_index(&self, offset: i64, dim: usize) -> usize {
        ((offset as u64 * dim as u64) / self.heat_side as u64) as usize
    }
}

/// Everything needed to paint one figure, resolved before allocation.
#[derive(Debug, Clone, PartialEq)]
pub struct FigurePlan {
    pub layout: Layout,
    pub normalizer: Normalizer,
    pub title: String,
    ticks: Vec<usize>,
    bar_labels: [String; 3],
}

/// Residue indices labelled on each axis: all of them for small matrices,
/// otherwise five evenly spaced ones including both ends.
pub fn residue_ticks(dim: usize) -> Vec<usize> {
    if dim <= MAX_TICKS {
        return (0..dim).collect();
    }
    (0..MAX_TICKS)
        .map(|k| k * (dim - 1) / (MAX_TICKS - 1))
        .collect()
}

pub fn plan(job: &str, matrix: &SquareMatrix, settings: &RenderSettings) -> Result<FigurePlan, RenderError> {
    let dim = matrix.dim();
    let normalizer = Normalizer::resolve(settings.color_scale, matrix.value_range());
    let ticks = residue_ticks(dim);
    let tick_chars = ticks
        .iter()
        .map(|t| t.to_string().len())
        .max()
        .unwrap_or(1);
    let bar_labels = [
        format!("{:.1}", normalizer.hi),
        format!("{:.1}", normalizer.midpoint()),
        format!("{:.1}", normalizer.lo),
    ];
    let bar_chars = bar_labels
        .iter()
        .map(|l| l.chars().count())
        .max()
        .unwrap_or(1);
    let layout = Layout::compute(settings.canvas_side(), tick_chars, bar_chars)?;

    Ok(FigurePlan {
        layout,
        normalizer,
        title: format!("PAE Heatmap - {}", job),
        ticks,
        bar_labels,
    })
}

/// Renders `matrix` into a fresh canvas.
pub fn render(job: &str, matrix: &SquareMatrix, settings: &RenderSettings) -> Result<Canvas, RenderError> {
    let figure = plan(job, matrix, settings)?;
    let side = figure.layout.side;
    let mut canvas = Canvas::new(side, side, BACKGROUND);

    paint_matrix(&mut canvas, &figure, matrix);
    paint_colorbar(&mut canvas, &figure);
    paint_axes(&mut canvas, &figure, matrix.dim());
    paint_titles(&mut canvas, &figure);

    Ok(canvas)
}

fn paint_matrix(canvas: &mut Canvas, figure: &FigurePlan, matrix: &SquareMatrix) {
    let layout = &figure.layout;
    let dim = matrix.dim();
    let columns: Vec<usize> = (0..layout.heat_side)
        .map(|px| layout.cell_index(px, dim))
        .collect();

    for py in 0..layout.heat_side {
        let row = layout.cell_index(py, dim);
        for (px, &col) in columns.iter().enumerate() {
            let color = figure.normalizer.color(matrix.get(row, col));
            canvas.put_pixel(layout.heat_x + px as i64, layout.heat_y + py, color);
        }
    }
    canvas.stroke_rect(
        layout.heat_x,
        layout.heat_y,
        layout.heat_side,
        layout.heat_side,
        layout.line,
        INK,
    );
}

fn paint_colorbar(canvas: &mut Canvas, figure: &FigurePlan) {
    let l = &figure.layout;
    let bar_x = l.heat_x + l.heat_side + l.unit;
    let span = (l.heat_side - 1).max(1) as f64;

    for py in 0..l.heat_side {
        let t = 1.0 - py as f64 / span;
        canvas.fill_rect(bar_x, l.heat_y + py, l.unit, 1, greens_reversed(t));
    }
    canvas.stroke_rect(bar_x, l.heat_y, l.unit, l.heat_side, l.line, INK);

    let label_x = bar_x + l.unit + l.tick_len + l.unit / 2;
    let positions = [l.heat_y, l.heat_y + l.heat_side / 2, l.heat_y + l.heat_side - 1];
    for (label, y) in figure.bar_labels.iter().zip(positions) {
        canvas.fill_rect(bar_x + l.unit, y - l.line / 2, l.tick_len, l.line, INK);
        canvas.draw_text(label_x, y - l.unit / 2, label, l.scale, INK);
    }
}

fn paint_axes(canvas: &mut Canvas, figure: &FigurePlan, dim: usize) {
    let l = &figure.layout;
    let heat_bottom = l.heat_y + l.heat_side;

    for &tick in &figure.ticks {
        let label = tick.to_string();
        let width = Canvas::text_extent(&label, l.scale);
        let center = l.cell_center(tick, dim);

        // x axis: tick below the heat area, label centred under it
        let x = l.heat_x + center;
        canvas.fill_rect(x - l.line / 2, heat_bottom + l.line, l.line, l.tick_len, INK);
        canvas.draw_text(
            x - width / 2,
            heat_bottom + l.tick_len + l.unit / 2,
            &label,
            l.scale,
            INK,
        );

        // y axis: tick left of the heat area, label right-aligned against it
        let y = l.heat_y + center;
        canvas.fill_rect(l.heat_x - l.line - l.tick_len, y - l.line / 2, l.tick_len, l.line, INK);
        canvas.draw_text(
            l.heat_x - l.tick_len - l.unit / 2 - width,
            y - l.unit / 2,
            &label,
            l.scale,
            INK,
        );
    }
}

fn paint_titles(canvas: &mut Canvas, figure: &FigurePlan) {
    let l = &figure.layout;
    let mid_x = l.heat_x + l.heat_side / 2;
    let mid_y = l.heat_y + l.heat_side / 2;
    let side = l.side as i64;

    let title_width = Canvas::text_extent(&figure.title, l.scale);
    canvas.draw_text(mid_x - title_width / 2, l.heat_y - 2 * l.unit, &figure.title, l.scale, INK);

    let x_label_width = Canvas::text_extent(X_LABEL, l.scale);
    let x_label_y = l.heat_y + l.heat_side + l.tick_len + l.unit / 2 + l.unit + l.unit / 2;
    canvas.draw_text(mid_x - x_label_width / 2, x_label_y, X_LABEL, l.scale, INK);

    let y_label_len = Canvas::text_extent(Y_LABEL, l.scale);
    canvas.draw_text_vertical(l.unit, mid_y + y_label_len / 2, Y_LABEL, l.scale, INK);

    let bar_label_len = Canvas::text_extent(COLORBAR_LABEL, l.scale);
    canvas.draw_text_vertical(
        side - 2 * l.unit,
        mid_y + bar_label_len / 2,
        COLORBAR_LABEL,
        l.scale,
        INK,
    );
}

/// Validates `rows`, renders the heatmap and writes `<job>_pae_heatmap.png`
/// into `job_dir`.
///
/// The shape and then the render budget are checked before the matrix is
/// copied or any pixel buffer is allocated.
pub fn render_to_path(
    job: &str,
    job_dir: &Path,
    rows: &[Vec<f64>],
    settings: &RenderSettings,
) -> Result<HeatmapArtifact, RenderError> {
    let dim = SquareMatrix::check_shape(rows)?;
    let required = settings.estimated_bytes(dim);
    if required > settings.max_render_bytes {
        return Err(RenderError::ExceedsBudget {
            dim,
            required,
            budget: settings.max_render_bytes,
        });
    }

    let matrix = SquareMatrix::from_rows(rows)?;
    let canvas = render(job, &matrix, settings)?;
    debug!(
        "Rendered {}x{} matrix for '{}' onto a {}px canvas.",
        dim,
        dim,
        job,
        canvas.width()
    );

    let path = job_dir.join(heatmap_file_name(job));
    let file = File::create(&path).map_err(|e| RenderError::Io {
        path: path.clone(),
        source: e,
    })?;
    let mut writer = BufWriter::new(file);
    canvas
        .write_png(&mut writer, settings.dpi)
        .map_err(|e| RenderError::Encoding {
            path: path.clone(),
            source: e,
        })?;
    writer.flush().map_err(|e| RenderError::Io {
        path: path.clone(),
        source: e,
    })?;

    Ok(HeatmapArtifact {
        job: job.to_string(),
        path,
        matrix_dim: dim,
        width: canvas.width(),
        height: canvas.height(),
    })
}
