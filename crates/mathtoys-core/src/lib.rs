pub mod error;
pub mod evaluator;
mod families;
pub mod format;
pub mod params;
pub mod registry;
pub mod sample;
pub mod sampling;
pub mod tangent;

pub use error::{EngineError, EngineResult};
pub use evaluator::{evaluate_derivative, evaluate_function, sample_derivative, sample_function};
pub use families::TAN_ASYMPTOTE_TOLERANCE;
pub use format::{format_general, round_to};
pub use params::{resolve_params, ParamOverrides, ParamSpec, RawNumber, ResolvedParams};
pub use registry::{list_functions, lookup, Catalog, Family, FunctionSpec};
pub use sample::{Sample, SampleSeries};
pub use sampling::{linspace, y_range, XRange, DEFAULT_MAX_SPAN};
pub use tangent::TangentLine;
