use mathtoys_core::DEFAULT_MAX_SPAN;

/// Sampling knobs shared by every request.
#[derive(Debug, Clone, PartialEq)]
pub struct ComputeSettings {
    /// Grid size of every plotted series.
    pub num_points: usize,
    /// Widest accepted `x_max - x_min`.
    pub max_span: f64,
    /// Decimals kept in y values on the wire.
    pub precision: u32,
}

impl Default for ComputeSettings {
    fn default() -> Self {
        Self {
            num_points: 500,
            max_span: DEFAULT_MAX_SPAN,
            precision: 8,
        }
    }
}
