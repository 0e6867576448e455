use crate::layout::LayoutSpec;
use crate::trace::TraceSpec;
use crate::validate::ValidationResult;
use serde::Serialize;

// =============================================================================
// Renderable figure
// =============================================================================

/// Everything the rendering collaborator receives for one plot request.
/// Built fresh per request and never cached.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Figure {
    /// Always a single trace, wrapped in a list for the renderer
    pub data: Vec<TraceSpec>,
    pub layout: LayoutSpec,
    pub config: FigureConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FigureConfig {
    pub responsive: bool,
}

impl Default for FigureConfig {
    fn default() -> Self {
        Self { responsive: true }
    }
}

impl Figure {
    pub fn new(trace: TraceSpec, layout: LayoutSpec) -> Self {
        Self {
            data: vec![trace],
            layout,
            config: FigureConfig::default(),
        }
    }

    pub fn trace(&self) -> &TraceSpec {
        &self.data[0]
    }

    pub fn to_json_string(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

// =============================================================================
// Plot request outcome
// =============================================================================

/// A successful plot request: the figure plus the advisory check that ran
/// before it was built
#[derive(Debug, Clone, PartialEq)]
pub struct PlotOutput {
    pub figure: Figure,
    pub validation: ValidationResult,
}
