use serde::Serialize;

use crate::error::{EngineError, EngineResult};
use crate::format::format_general;
use crate::params::ResolvedParams;
use crate::registry;
use crate::sample::Sample;

/// Magnitudes below this are treated as zero when formatting the equation.
const EQUATION_EPSILON: f64 = 1e-10;

/// Tangent to a family's graph at `x0`: `y = slope·(x - x0) + y0`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TangentLine {
    pub x0: f64,
    pub y0: f64,
    pub slope: f64,
}

impl TangentLine {
    /// Fails when `x0` is not finite, or when f or f' is undefined there.
    pub fn at(function_id: &str, x0: f64, params: &ResolvedParams) -> EngineResult<Self> {
        if !x0.is_finite() {
            return Err(EngineError::InvalidRange("x0 must be a finite number".into()));
        }
        let family = registry::lookup_for(function_id, params)?;

        let y0 = match family.value_at(x0, params) {
            Sample::Defined(v) => v,
            Sample::Undefined => return Err(EngineError::UndefinedAt(x0)),
        };
        let slope = match family.slope_at(x0, params) {
            Sample::Defined(v) => v,
            Sample::Undefined => return Err(EngineError::NoDerivativeAt(x0)),
        };

        Ok(Self { x0, y0, slope })
    }

    pub fn intercept(&self) -> f64 {
        self.y0 - self.slope * self.x0
    }

    pub fn value_at(&self, x: f64) -> f64 {
        self.slope * (x - self.x0) + self.y0
    }

    /// Human-readable `y = mx + q` form with 4 significant digits.
    pub fn equation(&self) -> String {
        if self.slope.abs() < EQUATION_EPSILON {
            return format!("y = {}", format_general(self.y0, 4));
        }

        let slope = if (self.slope - 1.0).abs() < EQUATION_EPSILON {
            String::new()
        } else if (self.slope + 1.0).abs() < EQUATION_EPSILON {
            "-".to_string()
        } else {
            format_general(self.slope, 4)
        };

        let intercept = self.intercept();
        if intercept.abs() < EQUATION_EPSILON {
            format!("y = {slope}x")
        } else if intercept > 0.0 {
            format!("y = {slope}x + {}", format_general(intercept, 4))
        } else {
            format!("y = {slope}x - {}", format_general(intercept.abs(), 4))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::{resolve_params, ParamOverrides, RawNumber};

    fn params(function_id: &str, pairs: &[(&str, f64)]) -> ResolvedParams {
        let overrides: ParamOverrides = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), RawNumber::from(*v)))
            .collect();
        resolve_params(function_id, Some(&overrides)).unwrap()
    }

    #[test]
    fn test_quadratic_at_one() {
        let p = params("quadratic", &[]);
        let t = TangentLine::at("quadratic", 1.0, &p).unwrap();
        assert_eq!((t.y0, t.slope), (1.0, 2.0));
        assert_eq!(t.intercept(), -1.0);
        assert_eq!(t.value_at(3.0), 5.0);
        assert_eq!(t.equation(), "y = 2x - 1");
    }

    #[test]
    fn test_sin_at_zero() {
        let p = params("sin", &[]);
        let t = TangentLine::at("sin", 0.0, &p).unwrap();
        assert!((t.slope - 1.0).abs() < 1e-12);
        assert_eq!(t.equation(), "y = x");
    }

    #[test]
    fn test_exp_at_zero() {
        let p = params("exp", &[]);
        let t = TangentLine::at("exp", 0.0, &p).unwrap();
        assert_eq!(t.equation(), "y = x + 1");
    }

    #[test]
    fn test_constant_tangent() {
        let p = params("linear", &[("a", 0.0), ("b", 5.0)]);
        let t = TangentLine::at("linear", 3.0, &p).unwrap();
        assert_eq!(t.slope, 0.0);
        assert_eq!(t.equation(), "y = 5");
    }

    #[test]
    fn test_negative_unit_slope() {
        let p = params("linear", &[("a", -1.0), ("b", 2.5)]);
        let t = TangentLine::at("linear", 0.0, &p).unwrap();
        assert_eq!(t.equation(), "y = -x + 2.5");
    }

    #[test]
    fn test_cubic_at_two() {
        let p = params("cubic", &[]);
        let t = TangentLine::at("cubic", 2.0, &p).unwrap();
        assert_eq!((t.y0, t.slope), (8.0, 12.0));
        assert_eq!(t.equation(), "y = 12x - 16");
    }

    #[test]
    fn test_fractional_slope_formatting() {
        let p = params("linear", &[("a", 0.3333333), ("b", 0.0)]);
        let t = TangentLine::at("linear", 1.0, &p).unwrap();
        assert_eq!(t.equation(), "y = 0.3333x");
    }

    #[test]
    fn test_outside_domain() {
        let p = params("ln", &[]);
        assert!(matches!(
            TangentLine::at("ln", -2.0, &p),
            Err(EngineError::UndefinedAt(_))
        ));

        // sqrt is defined at its boundary but has no derivative there
        let p = params("sqrt", &[]);
        assert!(matches!(
            TangentLine::at("sqrt", 0.0, &p),
            Err(EngineError::NoDerivativeAt(_))
        ));
    }

    #[test]
    fn test_non_finite_x0() {
        let p = params("sin", &[]);
        assert!(matches!(
            TangentLine::at("sin", f64::NAN, &p),
            Err(EngineError::InvalidRange(_))
        ));
    }
}
