//! Static table of supported function families.
//!
//! Each family is one record pairing its public metadata ([`FunctionSpec`])
//! with the kernels and domain tests used by the evaluator and the derivative
//! evaluator. The table is built once and never mutated.

use std::sync::LazyLock;

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

use crate::error::{EngineError, EngineResult};
use crate::families;
use crate::params::{ParamSpec, ResolvedParams};
use crate::sample::Sample;

/// Closed-form expression of `x` under resolved parameters.
pub(crate) type Kernel = fn(f64, &ResolvedParams) -> f64;

/// Whether `x` lies inside a kernel's domain.
pub(crate) type DomainTest = fn(f64, &ResolvedParams) -> bool;

// ---------------------------------------------------------------------------
// FunctionSpec
// ---------------------------------------------------------------------------

/// Display metadata and parameter contract of one family.
#[derive(Debug, Clone, Serialize)]
pub struct FunctionSpec {
    #[serde(skip)]
    pub id: &'static str,
    pub name: &'static str,
    pub formula: &'static str,
    pub derivative_formula: &'static str,
    pub params: Vec<ParamSpec>,
    #[serde(rename = "default_range")]
    pub default_domain: [f64; 2],
}

impl FunctionSpec {
    pub fn param(&self, id: &str) -> Option<&ParamSpec> {
        self.params.iter().find(|p| p.id == id)
    }
}

// ---------------------------------------------------------------------------
// Family
// ---------------------------------------------------------------------------

pub struct Family {
    pub spec: FunctionSpec,
    pub(crate) value: Kernel,
    pub(crate) value_domain: DomainTest,
    pub(crate) slope: Kernel,
    pub(crate) slope_domain: DomainTest,
}

impl Family {
    /// f(x), or `Undefined` outside the function's domain or when `params`
    /// belong to another family.
    pub fn value_at(&self, x: f64, params: &ResolvedParams) -> Sample {
        self.masked(x, params, self.value_domain, self.value)
    }

    /// f'(x), or `Undefined` outside the derivative's domain or when `params`
    /// belong to another family.
    pub fn slope_at(&self, x: f64, params: &ResolvedParams) -> Sample {
        self.masked(x, params, self.slope_domain, self.slope)
    }

    fn masked(
        &self,
        x: f64,
        params: &ResolvedParams,
        domain: DomainTest,
        kernel: Kernel,
    ) -> Sample {
        if params.function_id() != self.spec.id || !x.is_finite() || !domain(x, params) {
            return Sample::Undefined;
        }
        Sample::from_raw(kernel(x, params))
    }
}

// ---------------------------------------------------------------------------
// Registry
// ---------------------------------------------------------------------------

static REGISTRY: LazyLock<Vec<Family>> = LazyLock::new(families::all);

/// Find a family by id.
pub fn lookup(function_id: &str) -> EngineResult<&'static Family> {
    REGISTRY
        .iter()
        .find(|f| f.spec.id == function_id)
        .ok_or_else(|| EngineError::UnknownFunction(function_id.to_string()))
}

/// Find a family and check that `params` were resolved for it.
pub(crate) fn lookup_for(
    function_id: &str,
    params: &ResolvedParams,
) -> EngineResult<&'static Family> {
    let family = lookup(function_id)?;
    if params.function_id() != family.spec.id {
        return Err(EngineError::invalid_parameter(
            "*",
            format!(
                "parameters were resolved for '{}', not '{}'",
                params.function_id(),
                family.spec.id
            ),
        ));
    }
    Ok(family)
}

/// Metadata of every registered family, in registration order.
pub fn list_functions() -> Catalog {
    Catalog(REGISTRY.iter().map(|f| &f.spec).collect())
}

/// Read-only view of the registry metadata. Serialises as an object keyed by
/// function id.
#[derive(Debug, Clone)]
pub struct Catalog(Vec<&'static FunctionSpec>);

impl Catalog {
    pub fn get(&self, function_id: &str) -> Option<&'static FunctionSpec> {
        self.0.iter().copied().find(|s| s.id == function_id)
    }

    pub fn ids(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.0.iter().map(|s| s.id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &'static FunctionSpec> + '_ {
        self.0.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Serialize for Catalog {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for spec in &self.0 {
            map.serialize_entry(spec.id, spec)?;
        }
        map.end()
    }
}
