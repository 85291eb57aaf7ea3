use crate::error::EngineResult;
use crate::params::ResolvedParams;
use crate::registry;
use crate::sample::{Sample, SampleSeries};
use crate::sampling::XRange;

/// Evaluate `function_id` at every x in `xs`. The output is aligned with `xs`;
/// points outside the family's domain are `Sample::Undefined`.
pub fn evaluate_function(
    function_id: &str,
    xs: &[f64],
    params: &ResolvedParams,
) -> EngineResult<Vec<Sample>> {
    let family = registry::lookup_for(function_id, params)?;
    Ok(xs.iter().map(|&x| family.value_at(x, params)).collect())
}

/// Evaluate the analytic derivative of `function_id` at every x in `xs`.
pub fn evaluate_derivative(
    function_id: &str,
    xs: &[f64],
    params: &ResolvedParams,
) -> EngineResult<Vec<Sample>> {
    let family = registry::lookup_for(function_id, params)?;
    Ok(xs.iter().map(|&x| family.slope_at(x, params)).collect())
}

/// f over an evenly spaced grid of `points` x-values spanning `range`.
pub fn sample_function(
    function_id: &str,
    range: XRange,
    points: usize,
    params: &ResolvedParams,
) -> EngineResult<SampleSeries> {
    let xs = range.grid(points)?;
    let ys = evaluate_function(function_id, &xs, params)?;
    Ok(SampleSeries::new(xs, ys))
}

/// f' over an evenly spaced grid of `points` x-values spanning `range`.
pub fn sample_derivative(
    function_id: &str,
    range: XRange,
    points: usize,
    params: &ResolvedParams,
) -> EngineResult<SampleSeries> {
    let xs = range.grid(points)?;
    let ys = evaluate_derivative(function_id, &xs, params)?;
    Ok(SampleSeries::new(xs, ys))
}
