use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{EngineError, EngineResult};
use crate::registry;

// ---------------------------------------------------------------------------
// ParamSpec
// ---------------------------------------------------------------------------

/// Declared contract of one family parameter.
#[derive(Debug, Clone, Serialize)]
pub struct ParamSpec {
    pub id: &'static str,
    pub label: &'static str,
    pub default: f64,
    pub min: f64,
    pub max: f64,
    pub step: f64,
}

impl ParamSpec {
    pub const fn new(id: &'static str, default: f64, min: f64, max: f64, step: f64) -> Self {
        Self {
            id,
            label: id,
            default,
            min,
            max,
            step,
        }
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }
}

// ---------------------------------------------------------------------------
// RawNumber
// ---------------------------------------------------------------------------

/// A numeric input as it arrives from a caller: a JSON number, a numeric
/// string, or something that cannot be a number at all.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum RawNumber {
    Number(f64),
    Text(String),
    Other(Value),
}

impl RawNumber {
    /// Convert to a finite real, or explain why not.
    pub fn to_finite(&self) -> Result<f64, String> {
        let value = match self {
            Self::Number(v) => *v,
            Self::Text(s) => s
                .trim()
                .parse::<f64>()
                .map_err(|_| format!("'{s}' is not a number"))?,
            Self::Other(v) => return Err(format!("{v} is not a number")),
        };
        if value.is_finite() {
            Ok(value)
        } else {
            Err("must be a finite number".into())
        }
    }
}

impl From<f64> for RawNumber {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<&str> for RawNumber {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

/// Caller-supplied parameter overrides, keyed by parameter id.
pub type ParamOverrides = HashMap<String, RawNumber>;

// ---------------------------------------------------------------------------
// ResolvedParams
// ---------------------------------------------------------------------------

/// Complete, validated parameter set for one family. Only built by
/// [`resolve_params`], so every declared parameter is present.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedParams {
    function_id: &'static str,
    values: Vec<(&'static str, f64)>,
}

impl ResolvedParams {
    pub fn function_id(&self) -> &'static str {
        self.function_id
    }

    pub fn get(&self, id: &str) -> Option<f64> {
        self.values
            .iter()
            .find(|(name, _)| *name == id)
            .map(|(_, v)| *v)
    }

    /// Kernel access. A parameter the family never declared reads as NaN,
    /// which the evaluator masks as undefined.
    pub(crate) fn coef(&self, id: &str) -> f64 {
        self.get(id).unwrap_or(f64::NAN)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, f64)> + '_ {
        self.values.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl fmt::Display for ResolvedParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.values.iter().map(|(k, v)| format!("{k}={v}")).collect();
        write!(f, "{}", parts.join(", "))
    }
}

impl Serialize for ResolvedParams {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeMap;
        let mut map = serializer.serialize_map(Some(self.values.len()))?;
        for (k, v) in &self.values {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

/// Merge `overrides` with the declared defaults of `function_id`.
///
/// `None` and an empty map both mean "all defaults". Keys that are not
/// declared parameters are ignored.
pub fn resolve_params(
    function_id: &str,
    overrides: Option<&ParamOverrides>,
) -> EngineResult<ResolvedParams> {
    let family = registry::lookup(function_id)?;
    let spec = &family.spec;

    let mut values = Vec::with_capacity(spec.params.len());
    for p in &spec.params {
        let value = match overrides.and_then(|o| o.get(p.id)) {
            Some(raw) => {
                let v = raw
                    .to_finite()
                    .map_err(|reason| EngineError::invalid_parameter(p.id, reason))?;
                if !p.contains(v) {
                    return Err(EngineError::invalid_parameter(
                        p.id,
                        format!("must be within [{}, {}]", p.min, p.max),
                    ));
                }
                v
            }
            None => p.default,
        };
        values.push((p.id, value));
    }

    Ok(ResolvedParams {
        function_id: spec.id,
        values,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::list_functions;

    fn overrides(pairs: &[(&str, RawNumber)]) -> ParamOverrides {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn test_defaults_for_every_family() {
        for spec in list_functions().iter() {
            let resolved = resolve_params(spec.id, None).unwrap();
            assert_eq!(resolved.len(), spec.params.len(), "{}", spec.id);
            for p in &spec.params {
                assert_eq!(resolved.get(p.id), Some(p.default), "{}.{}", spec.id, p.id);
            }

            let empty = resolve_params(spec.id, Some(&ParamOverrides::new())).unwrap();
            assert_eq!(empty, resolved);
        }
    }

    #[test]
    fn test_override_merges_with_defaults() {
        let o = overrides(&[("a", 2.0.into())]);
        let resolved = resolve_params("sin", Some(&o)).unwrap();
        assert_eq!(resolved.get("a").unwrap(), 2.0);
        assert_eq!(resolved.get("b").unwrap(), 1.0);
        assert_eq!(resolved.get("c").unwrap(), 0.0);
        assert_eq!(resolved.function_id(), "sin");
    }

    #[test]
    fn test_unknown_keys_ignored() {
        let o = overrides(&[("z", 3.0.into()), ("a", 0.5.into())]);
        let resolved = resolve_params("linear", Some(&o)).unwrap();
        assert_eq!(resolved.len(), 2);
        assert_eq!(resolved.get("z"), None);
        assert_eq!(resolved.get("a").unwrap(), 0.5);
    }

    #[test]
    fn test_numeric_string_accepted() {
        let o = overrides(&[("n", "0.5".into())]);
        let resolved = resolve_params("power", Some(&o)).unwrap();
        assert_eq!(resolved.get("n").unwrap(), 0.5);
    }

    #[test]
    fn test_bounds_are_inclusive() {
        let o = overrides(&[("a", 10.0.into()), ("b", (-10.0).into())]);
        let resolved = resolve_params("linear", Some(&o)).unwrap();
        assert_eq!(resolved.get("a").unwrap(), 10.0);
        assert_eq!(resolved.get("b").unwrap(), -10.0);
    }

    #[test]
    fn test_out_of_range_rejected_for_every_parameter() {
        for spec in list_functions().iter() {
            for p in &spec.params {
                for bad in [p.max + p.step, p.min - p.step] {
                    let o = overrides(&[(p.id, bad.into())]);
                    let err = resolve_params(spec.id, Some(&o)).unwrap_err();
                    assert!(
                        matches!(err, EngineError::InvalidParameter { ref name, .. } if name == p.id),
                        "{}.{} = {bad}: {err}",
                        spec.id,
                        p.id
                    );
                }
            }
        }
    }

    #[test]
    fn test_non_finite_rejected() {
        for raw in [RawNumber::Number(f64::NAN), "inf".into(), "nan".into()] {
            let o = overrides(&[("a", raw)]);
            let err = resolve_params("quadratic", Some(&o)).unwrap_err();
            assert!(matches!(err, EngineError::InvalidParameter { .. }));
        }
    }

    #[test]
    fn test_non_numeric_rejected() {
        let o = overrides(&[("b", "abc".into())]);
        assert!(resolve_params("cos", Some(&o)).is_err());

        let o = overrides(&[("b", RawNumber::Other(Value::Null))]);
        assert!(resolve_params("cos", Some(&o)).is_err());
    }

    #[test]
    fn test_unknown_function() {
        let err = resolve_params("not_a_real_id", None).unwrap_err();
        assert!(matches!(err, EngineError::UnknownFunction(ref id) if id == "not_a_real_id"));
    }

    #[test]
    fn test_raw_number_from_json() {
        let raw: ParamOverrides =
            serde_json::from_str(r#"{"a": 2, "b": "1.5", "c": null, "d": true}"#).unwrap();
        assert_eq!(raw["a"].to_finite(), Ok(2.0));
        assert_eq!(raw["b"].to_finite(), Ok(1.5));
        assert!(raw["c"].to_finite().is_err());
        assert!(raw["d"].to_finite().is_err());
    }
}
