//! Plot grids and axis ranges.

use crate::error::{EngineError, EngineResult};
use crate::format::round_to;

/// Widest x-range accepted from callers unless configured otherwise.
pub const DEFAULT_MAX_SPAN: f64 = 200.0;

/// Y-axis range used when a series has no defined value at all.
pub const FALLBACK_Y_RANGE: [f64; 2] = [-10.0, 10.0];

/// `n` evenly spaced points from `start` to `stop`, both included.
pub fn linspace(start: f64, stop: f64, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (stop - start) / (n - 1) as f64;
            let mut xs: Vec<f64> = (0..n).map(|i| start + i as f64 * step).collect();
            xs[n - 1] = stop;
            xs
        }
    }
}

// ---------------------------------------------------------------------------
// XRange
// ---------------------------------------------------------------------------

/// Validated plotting interval: finite bounds with `min < max`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct XRange {
    min: f64,
    max: f64,
}

impl XRange {
    pub fn new(min: f64, max: f64) -> EngineResult<Self> {
        if !min.is_finite() {
            return Err(EngineError::InvalidRange("x_min must be a finite number".into()));
        }
        if !max.is_finite() {
            return Err(EngineError::InvalidRange("x_max must be a finite number".into()));
        }
        if min >= max {
            return Err(EngineError::InvalidRange("x_min must be less than x_max".into()));
        }
        Ok(Self { min, max })
    }

    /// Fill missing bounds from `default_domain` and enforce `max_span`.
    pub fn resolve(
        min: Option<f64>,
        max: Option<f64>,
        default_domain: [f64; 2],
        max_span: f64,
    ) -> EngineResult<Self> {
        let range = Self::new(
            min.unwrap_or(default_domain[0]),
            max.unwrap_or(default_domain[1]),
        )?;
        if range.span() > max_span {
            return Err(EngineError::InvalidRange(format!(
                "x range cannot be wider than {max_span}"
            )));
        }
        Ok(range)
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }

    pub fn span(&self) -> f64 {
        self.max - self.min
    }

    /// `points` evenly spaced x-values. Fails when the span is too small for
    /// the floats near the bounds to hold a strictly increasing grid.
    pub fn grid(&self, points: usize) -> EngineResult<Vec<f64>> {
        let xs = linspace(self.min, self.max, points);
        if xs.windows(2).any(|w| w[0] >= w[1]) {
            return Err(EngineError::InvalidRange(format!(
                "x range [{}, {}] is too narrow for {points} distinct points",
                self.min, self.max
            )));
        }
        Ok(xs)
    }
}

// ---------------------------------------------------------------------------
// y-range
// ---------------------------------------------------------------------------

/// Padded y-axis range over `values`. Non-finite values are skipped; the
/// padding is 15% of the spread but at least 1. Bounds are rounded to 4
/// decimals.
pub fn y_range(values: impl IntoIterator<Item = f64>) -> [f64; 2] {
    let mut bounds: Option<(f64, f64)> = None;
    for v in values.into_iter().filter(|v| v.is_finite()) {
        bounds = Some(match bounds {
            Some((lo, hi)) => (lo.min(v), hi.max(v)),
            None => (v, v),
        });
    }

    match bounds {
        Some((lo, hi)) => {
            let pad = ((hi - lo).abs() * 0.15).max(1.0);
            [round_to(lo - pad, 4), round_to(hi + pad, 4)]
        }
        None => FALLBACK_Y_RANGE,
    }
}
