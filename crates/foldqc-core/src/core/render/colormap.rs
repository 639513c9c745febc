use serde::Deserialize;

pub type Rgb = [u8; 3];

/// ColorBrewer "Greens", light to dark.
const GREENS: [Rgb; 9] = [
    [0xf7, 0xfc, 0xf5],
    [0xe5, 0xf5, 0xe0],
    [0xc7, 0xe9, 0xc0],
    [0xa1, 0xd9, 0x9b],
    [0x74, 0xc4, 0x76],
    [0x41, 0xab, 0x5d],
    [0x23, 0x8b, 0x45],
    [0x00, 0x6d, 0x2c],
    [0x00, 0x44, 0x1b],
];

/// Maps `t` in `[0, 1]` onto the reversed Greens ramp: `0.0` (low error) is
/// the darkest green, `1.0` (high error) the lightest.
///
/// Out-of-range input is clamped.
pub fn greens_reversed(t: f64) -> Rgb {
    let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
    let last = GREENS.len() - 1;
    let pos = (1.0 - t) * last as f64;
    let lower = (pos.floor() as usize).min(last - 1);
    let frac = pos - lower as f64;
    let a = GREENS[lower];
    let b = GREENS[lower + 1];
    let mut out = [0u8; 3];
    for channel in 0..3 {
        let value = a[channel] as f64 + (b[channel] as f64 - a[channel] as f64) * frac;
        out[channel] = value.round().clamp(0.0, 255.0) as u8;
    }
    out
}

/// How matrix values are mapped onto the colour ramp.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Default)]
#[serde(rename_all = "kebab-case", tag = "type")]
pub enum ColorScale {
    /// Linear between the matrix's own minimum and maximum.
    #[default]
    Auto,
    /// Linear between fixed bounds; values outside are clamped.
    Fixed { min: f64, max: f64 },
}

/// Linear value-to-`[0, 1]` mapping resolved for one matrix.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Normalizer {
    pub lo: f64,
    pub hi: f64,
}

impl Normalizer {
    pub fn resolve(scale: ColorScale, data_range: (f64, f64)) -> Self {
        match scale {
            ColorScale::Auto => Self {
                lo: data_range.0,
                hi: data_range.1,
            },
            ColorScale::Fixed { min, max } => Self { lo: min, hi: max },
        }
    }

    /// A degenerate range maps everything to `0.0`.
    #[inline]
    pub fn normalize(&self, value: f64) -> f64 {
        let span = self.hi - self.lo;
        if span.is_nan() || span <= 0.0 {
            return 0.0;
        }
        ((value - self.lo) / span).clamp(0.0, 1.0)
    }

    pub fn color(&self, value: f64) -> Rgb {
        greens_reversed(self.normalize(value))
    }

    pub fn midpoint(&self) -> f64 {
        self.lo + (self.hi - self.lo) / 2.0
    }
}
