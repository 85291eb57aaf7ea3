//! Number formatting used at the JSON and text boundaries.

const TWO_POW_52: f64 = 4_503_599_627_370_496.0;

/// Round to `digits` decimals, ties to even.
pub fn round_to(x: f64, digits: u32) -> f64 {
    if !x.is_finite() {
        return x;
    }

    // Split the scale so neither factor overflows on its own.
    let (pow1, pow2) = if digits > 22 {
        (10f64.powi((digits - 22) as i32), 1e22)
    } else {
        (10f64.powi(digits as i32), 1.0)
    };

    // At 2^52 and above every f64 is already an integer at this scale.
    let y = (x * pow1) * pow2;
    if !y.is_finite() || y.abs() >= TWO_POW_52 {
        return x;
    }

    let mut z = y.round();
    if (y - z).abs() == 0.5 {
        z = 2.0 * (y / 2.0).round();
    }

    (z / pow2) / pow1
}

/// `%g`-style formatting: `precision` significant digits, trailing zeros
/// stripped, scientific notation when the exponent is below -4 or at least
/// `precision`.
pub fn format_general(x: f64, precision: usize) -> String {
    if x.is_nan() {
        return "nan".into();
    }
    if x.is_infinite() {
        return if x > 0.0 { "inf".into() } else { "-inf".into() };
    }
    let precision = precision.max(1);
    if x == 0.0 {
        return if x.is_sign_negative() { "-0".into() } else { "0".into() };
    }

    // Let the formatter do the rounding, then read the decimal exponent back.
    let sci = format!("{:.*e}", precision - 1, x);
    let (mantissa, exp) = match sci.split_once('e') {
        Some((m, e)) => (m, e.parse::<i32>().unwrap_or(0)),
        None => (sci.as_str(), 0),
    };

    if exp < -4 || exp >= precision as i32 {
        let sign = if exp < 0 { '-' } else { '+' };
        format!("{}e{}{:02}", strip_zeros(mantissa), sign, exp.abs())
    } else {
        let decimals = (precision as i32 - 1 - exp).max(0) as usize;
        strip_zeros(&format!("{:.*}", decimals, x)).to_string()
    }
}

fn strip_zeros(s: &str) -> &str {
    if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.')
    } else {
        s
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_to_keeps_large_magnitudes() {
        let x = 123_456_789.123_456_79;
        assert_eq!(round_to(x, 8), x);
        assert_eq!(round_to(1e16 + 2.0, 8), 1e16 + 2.0);
        assert_eq!(round_to(-3.0e9 - 0.25, 8), -3.0e9 - 0.25);
    }

    #[test]
    fn test_round_to_decimals() {
        assert_eq!(round_to(1.234567891, 8), 1.23456789);
        assert_eq!(round_to(-2.71828, 2), -2.72);
        assert_eq!(round_to(12.0, 4), 12.0);
    }

    #[test]
    fn test_round_to_ties_to_even() {
        assert_eq!(round_to(0.5, 0), 0.0);
        assert_eq!(round_to(1.5, 0), 2.0);
        assert_eq!(round_to(2.5, 0), 2.0);
    }

    #[test]
    fn test_round_to_passes_through_non_finite() {
        assert!(round_to(f64::NAN, 8).is_nan());
        assert_eq!(round_to(f64::INFINITY, 8), f64::INFINITY);
    }

    #[test]
    fn test_format_general_fixed() {
        assert_eq!(format_general(2.0, 4), "2");
        assert_eq!(format_general(-1.0, 4), "-1");
        assert_eq!(format_general(0.5, 4), "0.5");
        assert_eq!(format_general(3.14159265, 4), "3.142");
        assert_eq!(format_general(123.456, 4), "123.5");
        assert_eq!(format_general(0.0001234, 4), "0.0001234");
        assert_eq!(format_general(0.0, 4), "0");
    }

    #[test]
    fn test_format_general_scientific() {
        assert_eq!(format_general(12346.0, 4), "1.235e+04");
        assert_eq!(format_general(10000.0, 4), "1e+04");
        assert_eq!(format_general(0.00001234, 4), "1.234e-05");
        assert_eq!(format_general(-2.5e10, 4), "-2.5e+10");
    }

    #[test]
    fn test_format_general_rounding_bumps_exponent() {
        // 9999.5 rounds to 1.000e4 at 4 significant digits
        assert_eq!(format_general(9999.5, 4), "1e+04");
        assert_eq!(format_general(999.95, 4), "1000");
    }
}
