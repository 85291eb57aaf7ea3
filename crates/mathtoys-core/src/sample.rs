use serde::{Serialize, Serializer};

use crate::format::round_to;

// ---------------------------------------------------------------------------
// Sample
// ---------------------------------------------------------------------------

/// One evaluated point. `Defined` always holds a finite value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Sample {
    Defined(f64),
    Undefined,
}

impl Sample {
    /// Wrap a raw arithmetic result; NaN and infinities become `Undefined`.
    pub fn from_raw(value: f64) -> Self {
        if value.is_finite() {
            Self::Defined(value)
        } else {
            Self::Undefined
        }
    }

    pub fn value(self) -> Option<f64> {
        match self {
            Self::Defined(v) => Some(v),
            Self::Undefined => None,
        }
    }

    pub fn is_defined(self) -> bool {
        matches!(self, Self::Defined(_))
    }

    /// Apply `f` to a defined value, re-checking finiteness of the result.
    pub fn map(self, f: impl FnOnce(f64) -> f64) -> Self {
        match self {
            Self::Defined(v) => Self::from_raw(f(v)),
            Self::Undefined => Self::Undefined,
        }
    }

    pub fn rounded(self, digits: u32) -> Self {
        self.map(|v| round_to(v, digits))
    }
}

impl From<Option<f64>> for Sample {
    fn from(value: Option<f64>) -> Self {
        value.map_or(Self::Undefined, Self::from_raw)
    }
}

impl Serialize for Sample {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Defined(v) => serializer.serialize_f64(*v),
            Self::Undefined => serializer.serialize_none(),
        }
    }
}

// ---------------------------------------------------------------------------
// SampleSeries
// ---------------------------------------------------------------------------

/// Plot-ready series: `x` is strictly increasing, `y[i]` belongs to `x[i]`.
#[derive(Debug, Clone, Serialize)]
pub struct SampleSeries {
    pub x: Vec<f64>,
    pub y: Vec<Sample>,
}

impl SampleSeries {
    /// Pair up a grid with its samples. Panics if the lengths differ, which
    /// would be a bug in the evaluator.
    pub fn new(x: Vec<f64>, y: Vec<Sample>) -> Self {
        assert_eq!(x.len(), y.len(), "sample series length mismatch");
        Self { x, y }
    }

    pub fn len(&self) -> usize {
        self.x.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    pub fn points(&self) -> impl Iterator<Item = (f64, Sample)> + '_ {
        self.x.iter().copied().zip(self.y.iter().copied())
    }

    /// Defined y values only, in order.
    pub fn defined_values(&self) -> impl Iterator<Item = f64> + '_ {
        self.y.iter().filter_map(|s| s.value())
    }

    /// Copy with every defined y rounded to `digits` decimals (wire form).
    pub fn rounded(&self, digits: u32) -> Self {
        Self {
            x: self.x.clone(),
            y: self.y.iter().map(|s| s.rounded(digits)).collect(),
        }
    }
}
