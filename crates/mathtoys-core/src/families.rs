//! The ten closed-form families and their analytic derivatives.

use std::f64::consts::PI;

use crate::params::{ParamSpec, ResolvedParams};
use crate::registry::{Family, FunctionSpec};

/// `tan` and its derivative are masked where `|cos(bx + c)|` drops below this.
/// Points close to, but not exactly at, an asymptote are masked too.
pub const TAN_ASYMPTOTE_TOLERANCE: f64 = 0.01;

const fn coef(id: &'static str, default: f64) -> ParamSpec {
    ParamSpec::new(id, default, -10.0, 10.0, 0.1)
}

pub(crate) fn all() -> Vec<Family> {
    vec![
        Family {
            spec: FunctionSpec {
                id: "linear",
                name: "Linear: ax + b",
                formula: "f(x) = ax + b",
                derivative_formula: "f'(x) = a",
                params: vec![coef("a", 1.0), coef("b", 0.0)],
                default_domain: [-10.0, 10.0],
            },
            value: |x, p| p.coef("a") * x + p.coef("b"),
            value_domain: everywhere,
            slope: |_, p| p.coef("a"),
            slope_domain: everywhere,
        },
        Family {
            spec: FunctionSpec {
                id: "quadratic",
                name: "Quadratic: ax\u{b2} + bx + c",
                formula: "f(x) = ax\u{b2} + bx + c",
                derivative_formula: "f'(x) = 2ax + b",
                params: vec![coef("a", 1.0), coef("b", 0.0), coef("c", 0.0)],
                default_domain: [-5.0, 5.0],
            },
            value: |x, p| p.coef("a") * x * x + p.coef("b") * x + p.coef("c"),
            value_domain: everywhere,
            slope: |x, p| 2.0 * p.coef("a") * x + p.coef("b"),
            slope_domain: everywhere,
        },
        Family {
            spec: FunctionSpec {
                id: "cubic",
                name: "Cubic: ax\u{b3} + bx\u{b2} + cx + d",
                formula: "f(x) = ax\u{b3} + bx\u{b2} + cx + d",
                derivative_formula: "f'(x) = 3ax\u{b2} + 2bx + c",
                params: vec![
                    coef("a", 1.0),
                    coef("b", 0.0),
                    coef("c", 0.0),
                    coef("d", 0.0),
                ],
                default_domain: [-5.0, 5.0],
            },
            value: |x, p| p.coef("a") * x.powi(3) + p.coef("b") * x * x + p.coef("c") * x + p.coef("d"),
            value_domain: everywhere,
            slope: |x, p| 3.0 * p.coef("a") * x * x + 2.0 * p.coef("b") * x + p.coef("c"),
            slope_domain: everywhere,
        },
        Family {
            spec: FunctionSpec {
                id: "sin",
                name: "Sine: a\u{b7}sin(bx + c)",
                formula: "f(x) = a\u{b7}sin(bx + c)",
                derivative_formula: "f'(x) = ab\u{b7}cos(bx + c)",
                params: vec![coef("a", 1.0), coef("b", 1.0), coef("c", 0.0)],
                default_domain: [-2.0 * PI, 2.0 * PI],
            },
            value: |x, p| p.coef("a") * inner(x, p).sin(),
            value_domain: everywhere,
            slope: |x, p| p.coef("a") * p.coef("b") * inner(x, p).cos(),
            slope_domain: everywhere,
        },
        Family {
            spec: FunctionSpec {
                id: "cos",
                name: "Cosine: a\u{b7}cos(bx + c)",
                formula: "f(x) = a\u{b7}cos(bx + c)",
                derivative_formula: "f'(x) = -ab\u{b7}sin(bx + c)",
                params: vec![coef("a", 1.0), coef("b", 1.0), coef("c", 0.0)],
                default_domain: [-2.0 * PI, 2.0 * PI],
            },
            value: |x, p| p.coef("a") * inner(x, p).cos(),
            value_domain: everywhere,
            slope: |x, p| -p.coef("a") * p.coef("b") * inner(x, p).sin(),
            slope_domain: everywhere,
        },
        Family {
            spec: FunctionSpec {
                id: "exp",
                name: "Exponential: a\u{b7}e^(bx)",
                formula: "f(x) = a\u{b7}e^(bx)",
                derivative_formula: "f'(x) = ab\u{b7}e^(bx)",
                params: vec![coef("a", 1.0), coef("b", 1.0)],
                default_domain: [-4.0, 4.0],
            },
            // overflow to infinity is masked by Sample::from_raw
            value: |x, p| p.coef("a") * (p.coef("b") * x).exp(),
            value_domain: everywhere,
            slope: |x, p| p.coef("a") * p.coef("b") * (p.coef("b") * x).exp(),
            slope_domain: everywhere,
        },
        Family {
            spec: FunctionSpec {
                id: "ln",
                name: "Logarithm: a\u{b7}ln(bx + c)",
                formula: "f(x) = a\u{b7}ln(bx + c)",
                derivative_formula: "f'(x) = ab/(bx + c)",
                params: vec![coef("a", 1.0), coef("b", 1.0), coef("c", 1.0)],
                default_domain: [-5.0, 10.0],
            },
            value: |x, p| p.coef("a") * inner(x, p).ln(),
            value_domain: inner_positive,
            slope: |x, p| p.coef("a") * p.coef("b") / inner(x, p),
            slope_domain: inner_positive,
        },
        Family {
            spec: FunctionSpec {
                id: "power",
                name: "Power: a\u{b7}x^n",
                formula: "f(x) = a\u{b7}x^n",
                derivative_formula: "f'(x) = a\u{b7}n\u{b7}x^(n-1)",
                params: vec![coef("a", 1.0), ParamSpec::new("n", 2.0, -10.0, 10.0, 0.5)],
                default_domain: [-5.0, 5.0],
            },
            value: power_value,
            value_domain: power_value_domain,
            slope: power_slope,
            slope_domain: power_slope_domain,
        },
        Family {
            spec: FunctionSpec {
                id: "sqrt",
                name: "Square root: a\u{b7}\u{221a}(bx + c)",
                formula: "f(x) = a\u{b7}\u{221a}(bx + c)",
                derivative_formula: "f'(x) = ab/(2\u{221a}(bx + c))",
                params: vec![coef("a", 1.0), coef("b", 1.0), coef("c", 0.0)],
                default_domain: [-1.0, 10.0],
            },
            value: |x, p| p.coef("a") * inner(x, p).sqrt(),
            value_domain: |x, p| inner(x, p) >= 0.0,
            // no derivative at the boundary point itself
            slope: |x, p| p.coef("a") * p.coef("b") / (2.0 * inner(x, p).sqrt()),
            slope_domain: inner_positive,
        },
        Family {
            spec: FunctionSpec {
                id: "tan",
                name: "Tangent: a\u{b7}tan(bx + c)",
                formula: "f(x) = a\u{b7}tan(bx + c)",
                derivative_formula: "f'(x) = ab/cos\u{b2}(bx + c)",
                params: vec![coef("a", 1.0), coef("b", 1.0), coef("c", 0.0)],
                default_domain: [-2.0 * PI, 2.0 * PI],
            },
            value: |x, p| p.coef("a") * inner(x, p).tan(),
            value_domain: away_from_tan_asymptote,
            slope: |x, p| {
                let c = inner(x, p).cos();
                p.coef("a") * p.coef("b") / (c * c)
            },
            slope_domain: away_from_tan_asymptote,
        },
    ]
}

// ---------------------------------------------------------------------------
// Shared helpers
// ---------------------------------------------------------------------------

/// `b·x + c`
fn inner(x: f64, p: &ResolvedParams) -> f64 {
    p.coef("b") * x + p.coef("c")
}

fn everywhere(_: f64, _: &ResolvedParams) -> bool {
    true
}

fn inner_positive(x: f64, p: &ResolvedParams) -> bool {
    inner(x, p) > 0.0
}

fn away_from_tan_asymptote(x: f64, p: &ResolvedParams) -> bool {
    inner(x, p).cos().abs() >= TAN_ASYMPTOTE_TOLERANCE
}

// ---------------------------------------------------------------------------
// power
// ---------------------------------------------------------------------------

fn is_integer(n: f64) -> bool {
    n.fract() == 0.0
}

fn power_value(x: f64, p: &ResolvedParams) -> f64 {
    let n = p.coef("n");
    if is_integer(n) {
        p.coef("a") * x.powi(n as i32)
    } else {
        p.coef("a") * x.powf(n)
    }
}

/// Integer exponents need no restriction; fractional ones need `x >= 0`.
fn power_value_domain(x: f64, p: &ResolvedParams) -> bool {
    is_integer(p.coef("n")) || x >= 0.0
}

fn power_slope(x: f64, p: &ResolvedParams) -> f64 {
    let (a, n) = (p.coef("a"), p.coef("n"));
    if n == 0.0 {
        0.0
    } else if is_integer(n) {
        a * n * x.powi(n as i32 - 1)
    } else {
        a * n * x.powf(n - 1.0)
    }
}

fn power_slope_domain(x: f64, p: &ResolvedParams) -> bool {
    let n = p.coef("n");
    if n == 0.0 || (is_integer(n) && n >= 1.0) {
        true
    } else if n < 0.0 {
        x != 0.0
    } else {
        x >= 0.0
    }
}
