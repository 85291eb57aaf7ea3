//! JSON service behind the function-derivative and tangent-line plots.

pub mod handlers;
pub mod protocol;
pub mod server;
pub mod settings;

pub use server::{router, run_server};
pub use settings::ComputeSettings;
