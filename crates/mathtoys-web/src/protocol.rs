use std::fmt;
use std::str::FromStr;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Deserializer, Serialize};
use tracing::{debug, error};

use mathtoys_core::{Catalog, EngineError, ParamOverrides, RawNumber, SampleSeries};

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

/// Body of `POST /api/derivatives`.
#[derive(Debug, Deserialize)]
pub struct DerivativesRequest {
    #[serde(default = "default_derivatives_func")]
    pub func: String,
    #[serde(default)]
    pub params: Option<ParamOverrides>,
    #[serde(default = "default_view_mode")]
    pub view_mode: String,
    #[serde(default, deserialize_with = "present")]
    pub x_min: Option<RawNumber>,
    #[serde(default, deserialize_with = "present")]
    pub x_max: Option<RawNumber>,
}

/// Body of `POST /api/tangent`.
#[derive(Debug, Deserialize)]
pub struct TangentRequest {
    #[serde(default = "default_tangent_func")]
    pub func: String,
    #[serde(default)]
    pub params: Option<ParamOverrides>,
    /// Missing means 0; an explicit `null` is rejected.
    #[serde(default = "default_x0")]
    pub x0: Option<RawNumber>,
    #[serde(default, deserialize_with = "present")]
    pub x_min: Option<RawNumber>,
    #[serde(default, deserialize_with = "present")]
    pub x_max: Option<RawNumber>,
}

/// A bound that is present in the body is kept as given, `null` included, so
/// the handler can reject it. Only a missing key falls back to the default.
fn present<'de, D>(deserializer: D) -> Result<Option<RawNumber>, D::Error>
where
    D: Deserializer<'de>,
{
    RawNumber::deserialize(deserializer).map(Some)
}

fn default_derivatives_func() -> String {
    "sin".into()
}

fn default_tangent_func() -> String {
    "quadratic".into()
}

fn default_view_mode() -> String {
    ViewMode::Separate.to_string()
}

fn default_x0() -> Option<RawNumber> {
    Some(RawNumber::Number(0.0))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    Separate,
    Combined,
}

impl fmt::Display for ViewMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Separate => write!(f, "separate"),
            Self::Combined => write!(f, "combined"),
        }
    }
}

impl FromStr for ViewMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "separate" => Ok(Self::Separate),
            "combined" => Ok(Self::Combined),
            _ => Err(format!(
                "invalid view mode: {s}. Allowed: separate, combined"
            )),
        }
    }
}

// ---------------------------------------------------------------------------
// Responses
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
pub struct FunctionsResponse {
    pub success: bool,
    pub functions: Catalog,
}

impl FunctionsResponse {
    pub fn ok(functions: Catalog) -> Self {
        Self {
            success: true,
            functions,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct DerivativesResponse {
    pub success: bool,
    pub view_mode: ViewMode,
    pub func_data: SampleSeries,
    pub derivative_data: SampleSeries,
    pub func_formula: &'static str,
    pub derivative_formula: &'static str,
    pub y_range_func: [f64; 2],
    pub y_range_deriv: [f64; 2],
    pub y_range_combined: [f64; 2],
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Serialize)]
pub struct TangentResponse {
    pub success: bool,
    pub func_data: SampleSeries,
    pub tangent_data: SampleSeries,
    pub tangent_point: Point,
    pub slope: f64,
    pub func_value_at_x0: f64,
    pub derivative_at_x0: f64,
    pub tangent_equation: String,
    pub y_range: [f64; 2],
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Failure body: `{"success": false, "error": "..."}`.
#[derive(Debug, Serialize)]
struct ErrorBody {
    success: bool,
    error: String,
}

#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            message: message.into(),
        }
    }

    /// Generic 500; details stay in the server log.
    pub fn internal() -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: "unexpected server error".into(),
        }
    }
}

impl From<EngineError> for ApiError {
    fn from(err: EngineError) -> Self {
        Self::bad_request(err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            error!(status = %self.status, "request failed: {}", self.message);
        } else {
            debug!(status = %self.status, "request rejected: {}", self.message);
        }
        let body = ErrorBody {
            success: false,
            error: self.message,
        };
        (self.status, Json(body)).into_response()
    }
}
