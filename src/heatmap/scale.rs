//! Axis domains, band scales and the sequential color ramp.

use crate::api::SeasonalDataPoint;

/// Domains derived from one season's points. Recomputed on every render.
#[derive(Debug, Clone, PartialEq)]
pub struct ScaleSpec {
    pub x_domain: Vec<String>,
    pub y_domain: Vec<String>,
    pub color_domain: [f64; 2],
}

impl ScaleSpec {
    pub fn from_points(points: &[SeasonalDataPoint]) -> Self {
        Self {
            x_domain: distinct(points.iter().map(|p| p.category_x.as_str())),
            y_domain: distinct(points.iter().map(|p| p.category_y.as_str())),
            color_domain: color_domain(points),
        }
    }
}

/// Distinct values in first-seen order.
fn distinct<'a>(values: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut seen: Vec<String> = Vec::new();
    for v in values {
        if !seen.iter().any(|s| s == v) {
            seen.push(v.to_string());
        }
    }
    seen
}

/// `[min, max]` of the values; a flat series widens to `[v, v + 1]` so the
/// color scale always has a non-empty span.
fn color_domain(points: &[SeasonalDataPoint]) -> [f64; 2] {
    let mut values = points.iter().map(|p| p.value).filter(|v| v.is_finite());
    let Some(first) = values.next() else {
        return [0.0, 1.0];
    };
    let (min, max) = values.fold((first, first), |(lo, hi), v| (lo.min(v), hi.max(v)));
    if min == max {
        [min, min + 1.0]
    } else {
        [min, max]
    }
}

/// Categorical scale splitting a pixel range into equal bands.
#[derive(Debug, Clone, PartialEq)]
pub struct BandScale {
    domain: Vec<String>,
    start: f64,
    step: f64,
    bandwidth: f64,
    reversed: bool,
    range: (f64, f64),
}

impl BandScale {
    pub const PADDING: f64 = 0.05;

    /// Bands laid out from `range.0` towards `range.1`. A range whose end is
    /// below its start (e.g. `(height, 0)`) places the first category at the
    /// high end.
    pub fn new(domain: Vec<String>, range: (f64, f64)) -> Self {
        let n = domain.len() as f64;
        let reversed = range.1 < range.0;
        let (lo, hi) = if reversed { (range.1, range.0) } else { range };
        let padding = Self::PADDING;

        // Inner and outer padding are equal, bands centered in the range.
        let step = if n > 0.0 { (hi - lo) / (n - padding + 2.0 * padding).max(1.0) } else { 0.0 };
        let start = lo + (hi - lo - step * (n - padding)) * 0.5;

        Self {
            domain,
            start,
            step,
            bandwidth: step * (1.0 - padding),
            reversed,
            range: (lo, hi),
        }
    }

    /// Offset of the band for `label`, or `None` if it is not in the domain.
    pub fn position(&self, label: &str) -> Option<f64> {
        let i = self.domain.iter().position(|d| d == label)?;
        let n = self.domain.len();
        let slot = if self.reversed { n - 1 - i } else { i };
        Some(self.start + self.step * slot as f64)
    }

    /// Center of the band for `label`, used for tick placement.
    pub fn center(&self, label: &str) -> Option<f64> {
        self.position(label).map(|p| p + self.bandwidth / 2.0)
    }

    pub fn bandwidth(&self) -> f64 {
        self.bandwidth
    }

    pub fn domain(&self) -> &[String] {
        &self.domain
    }

    pub fn range(&self) -> (f64, f64) {
        self.range
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// Perceived lightness (Rec. 601 luma), 0..=255.
    pub fn luma(self) -> f64 {
        0.299 * self.r as f64 + 0.587 * self.g as f64 + 0.114 * self.b as f64
    }
}

fn lerp_rgb(a: Rgb, b: Rgb, t: f64) -> Rgb {
    let t = t.clamp(0.0, 1.0);
    let mix = |x: u8, y: u8| (x as f64 + (y as f64 - x as f64) * t).round() as u8;
    Rgb::new(mix(a.r, b.r), mix(a.g, b.g), mix(a.b, b.b))
}

/// Yellow -> orange -> red sequential ramp for `t` in `[0, 1]`.
pub fn yl_or_rd(t: f64) -> Rgb {
    const STOPS: [Rgb; 9] = [
        Rgb::new(0xff, 0xff, 0xcc),
        Rgb::new(0xff, 0xed, 0xa0),
        Rgb::new(0xfe, 0xd9, 0x76),
        Rgb::new(0xfe, 0xb2, 0x4c),
        Rgb::new(0xfd, 0x8d, 0x3c),
        Rgb::new(0xfc, 0x4e, 0x2a),
        Rgb::new(0xe3, 0x1a, 0x1c),
        Rgb::new(0xbd, 0x00, 0x26),
        Rgb::new(0x80, 0x00, 0x26),
    ];

    let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
    let scaled = t * (STOPS.len() - 1) as f64;
    let i = (scaled.floor() as usize).min(STOPS.len() - 2);
    lerp_rgb(STOPS[i], STOPS[i + 1], scaled - i as f64)
}

/// Maps a numeric domain onto [`yl_or_rd`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorScale {
    domain: [f64; 2],
}

impl ColorScale {
    pub fn new(domain: [f64; 2]) -> Self {
        Self { domain }
    }

    pub fn color(&self, value: f64) -> Rgb {
        let [lo, hi] = self.domain;
        let span = hi - lo;
        let t = if span > 0.0 { (value - lo) / span } else { 0.0 };
        yl_or_rd(t)
    }
}
