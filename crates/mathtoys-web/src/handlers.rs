use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use tracing::debug;

use mathtoys_core::{
    list_functions, lookup, resolve_params, round_to, sample_derivative, sample_function, y_range,
    RawNumber, Sample, SampleSeries, TangentLine, XRange,
};

use crate::protocol::{
    ApiError, DerivativesRequest, DerivativesResponse, FunctionsResponse, Point, TangentRequest,
    TangentResponse, ViewMode,
};
use crate::settings::ComputeSettings;

pub type SharedSettings = Arc<ComputeSettings>;

// ---------------------------------------------------------------------------
// Routes
// ---------------------------------------------------------------------------

pub async fn functions() -> Json<FunctionsResponse> {
    Json(FunctionsResponse::ok(list_functions()))
}

pub async fn derivatives(
    State(settings): State<SharedSettings>,
    payload: Result<Json<DerivativesRequest>, JsonRejection>,
) -> Result<Json<DerivativesResponse>, ApiError> {
    let Json(req) = payload.map_err(reject_body)?;
    compute_derivatives(&settings, req).map(Json)
}

pub async fn tangent(
    State(settings): State<SharedSettings>,
    payload: Result<Json<TangentRequest>, JsonRejection>,
) -> Result<Json<TangentResponse>, ApiError> {
    let Json(req) = payload.map_err(reject_body)?;
    compute_tangent(&settings, req).map(Json)
}

pub async fn not_found() -> ApiError {
    ApiError::not_found("no such endpoint")
}

fn reject_body(rejection: JsonRejection) -> ApiError {
    ApiError::bad_request(format!("invalid JSON body: {}", rejection.body_text()))
}

// ---------------------------------------------------------------------------
// Computation
// ---------------------------------------------------------------------------

/// Function and derivative sampled over the same grid.
pub fn compute_derivatives(
    settings: &ComputeSettings,
    req: DerivativesRequest,
) -> Result<DerivativesResponse, ApiError> {
    let family = lookup(&req.func)?;
    let view_mode: ViewMode = req.view_mode.parse().map_err(ApiError::bad_request)?;
    let params = resolve_params(&req.func, req.params.as_ref())?;
    let range = resolve_range(settings, family.spec.default_domain, &req.x_min, &req.x_max)?;

    let func = sample_function(&req.func, range, settings.num_points, &params)?;
    let deriv = sample_derivative(&req.func, range, settings.num_points, &params)?;
    debug!(func = %req.func, %params, points = func.len(), "sampled derivatives");

    Ok(DerivativesResponse {
        success: true,
        view_mode,
        y_range_func: y_range(func.defined_values()),
        y_range_deriv: y_range(deriv.defined_values()),
        y_range_combined: y_range(func.defined_values().chain(deriv.defined_values())),
        func_data: func.rounded(settings.precision),
        derivative_data: deriv.rounded(settings.precision),
        func_formula: family.spec.formula,
        derivative_formula: family.spec.derivative_formula,
    })
}

/// Function plot plus its tangent at `x0`, clipped to the shared y-range.
pub fn compute_tangent(
    settings: &ComputeSettings,
    req: TangentRequest,
) -> Result<TangentResponse, ApiError> {
    let family = lookup(&req.func)?;
    let params = resolve_params(&req.func, req.params.as_ref())?;
    let x0 = match &req.x0 {
        Some(raw) => raw
            .to_finite()
            .map_err(|reason| ApiError::bad_request(format!("x0: {reason}")))?,
        None => return Err(ApiError::bad_request("x0 is required")),
    };
    let range = resolve_range(settings, family.spec.default_domain, &req.x_min, &req.x_max)?;

    let line = TangentLine::at(&req.func, x0, &params)?;
    let func = sample_function(&req.func, range, settings.num_points, &params)?;
    let raw_tangent: Vec<f64> = func.x.iter().map(|&x| line.value_at(x)).collect();

    let bounds = y_range(func.defined_values().chain(raw_tangent.iter().copied()));
    let clipped = raw_tangent
        .iter()
        .map(|&y| Sample::from_raw(y).map(|v| v.clamp(bounds[0], bounds[1])))
        .collect();
    let tangent = SampleSeries::new(func.x.clone(), clipped);
    debug!(func = %req.func, %params, x0, slope = line.slope, "computed tangent");

    let digits = settings.precision;
    Ok(TangentResponse {
        success: true,
        func_data: func.rounded(digits),
        tangent_data: tangent.rounded(digits),
        tangent_point: Point {
            x: round_to(line.x0, digits),
            y: round_to(line.y0, digits),
        },
        slope: round_to(line.slope, digits),
        func_value_at_x0: round_to(line.y0, digits),
        derivative_at_x0: round_to(line.slope, digits),
        tangent_equation: line.equation(),
        y_range: bounds,
    })
}

fn resolve_range(
    settings: &ComputeSettings,
    default_domain: [f64; 2],
    x_min: &Option<RawNumber>,
    x_max: &Option<RawNumber>,
) -> Result<XRange, ApiError> {
    let min = optional_bound("x_min", x_min)?;
    let max = optional_bound("x_max", x_max)?;
    Ok(XRange::resolve(min, max, default_domain, settings.max_span)?)
}

fn optional_bound(name: &str, raw: &Option<RawNumber>) -> Result<Option<f64>, ApiError> {
    raw.as_ref()
        .map(|r| {
            r.to_finite()
                .map_err(|reason| ApiError::bad_request(format!("{name}: {reason}")))
        })
        .transpose()
}
