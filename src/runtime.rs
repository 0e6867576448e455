// Runtime state and user-triggered actions for the plotting pipeline

use crate::classify::classify;
use crate::columns::ColumnRegistry;
use crate::csv_reader;
use crate::data::Dataset;
use crate::error::PlotError;
use crate::ir::{Figure, PlotOutput};
use crate::layout::build_layout;
use crate::trace::build_trace;
use crate::transpose::{TransposeCoordinator, TransposeTransport};
use crate::validate::{validate, ChartKind};
use std::path::Path;

pub const UPLOAD_FIRST: &str = "Please upload a file first.";
pub const TRANSPOSING: &str = "Transposing data...";
pub const TRANSPOSE_SUCCESS: &str = "Data transposed successfully! Select new columns to plot.";

// =============================================================================
// State
// =============================================================================

/// Current dataset and column choice, passed explicitly to every action
#[derive(Debug, Clone, Default)]
pub struct PlotState {
    dataset: Option<Dataset>,
    registry: ColumnRegistry,
}

impl PlotState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Swap in a new dataset and re-derive columns and default selection
    pub fn load_data(&mut self, dataset: Dataset) {
        self.registry = ColumnRegistry::from_dataset(&dataset);
        self.dataset = Some(dataset);
    }

    pub fn dataset(&self) -> Option<&Dataset> {
        self.dataset.as_ref()
    }

    pub fn registry(&self) -> &ColumnRegistry {
        &self.registry
    }

    pub fn select_columns(&mut self, x: &str, y: &str) -> Result<(), PlotError> {
        self.registry.select_x(x)?;
        self.registry.select_y(y)
    }
}

// =============================================================================
// Status surface
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusLevel {
    Progress,
    Success,
    Warning,
    Error,
}

/// A human-readable message describing how an action went
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Status {
    pub message: String,
    pub level: StatusLevel,
}

impl Status {
    pub fn new(level: StatusLevel, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            level,
        }
    }

    pub fn progress(message: impl Into<String>) -> Self {
        Self::new(StatusLevel::Progress, message)
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::new(StatusLevel::Success, message)
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(StatusLevel::Warning, message)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(StatusLevel::Error, message)
    }

    pub fn is_error(&self) -> bool {
        self.level == StatusLevel::Error
    }

    /// Style class for a status element. Warnings share the error style.
    pub fn css_class(&self) -> &'static str {
        match self.level {
            StatusLevel::Progress => "status-message",
            StatusLevel::Success => "status-message success-message",
            StatusLevel::Warning | StatusLevel::Error => "status-message error-message",
        }
    }
}

/// Receives intermediate statuses while an action is running
pub trait StatusSink {
    fn report(&mut self, status: &Status);
}

impl<F: FnMut(&Status)> StatusSink for F {
    fn report(&mut self, status: &Status) {
        self(status)
    }
}

// =============================================================================
// Plot
// =============================================================================

/// Build the figure for the current selection.
///
/// The compatibility check is advisory: an incompatible combination is
/// still plotted and only reported through `PlotOutput::validation`.
pub fn generate_plot(state: &PlotState, chart_kind: &str) -> Result<PlotOutput, PlotError> {
    let kind: ChartKind = chart_kind.parse().map_err(|err| {
        tracing::error!("{}", err);
        err
    })?;

    let dataset = state.dataset().ok_or(PlotError::NoDataLoaded)?;
    let selection = state.registry().selection().ok_or(PlotError::NoSelection)?;

    let x_type = classify(dataset, &selection.x);
    let y_type = classify(dataset, &selection.y);
    let validation = validate(kind, x_type, y_type);
    if validation.is_compatible {
        tracing::info!(%kind, x = %selection.x, y = %selection.y, "building plot");
    } else {
        tracing::warn!(%kind, %x_type, %y_type, "{}", validation.message);
    }

    let trace = build_trace(dataset, &selection.x, &selection.y, kind)?;
    let layout = build_layout(&selection.x, &selection.y, kind.title_prefix());

    Ok(PlotOutput {
        figure: Figure::new(trace, layout),
        validation,
    })
}

/// Plot button: never fails, every error becomes a status
pub fn plot_action(state: &PlotState, chart_kind: &str) -> (Option<Figure>, Status) {
    match generate_plot(state, chart_kind) {
        Ok(output) => {
            let status = if output.validation.is_compatible {
                Status::success(output.validation.message)
            } else {
                Status::warning(output.validation.message)
            };
            (Some(output.figure), status)
        }
        Err(PlotError::NoDataLoaded) => (None, Status::error(UPLOAD_FIRST)),
        Err(err) => (None, Status::error(err.to_string())),
    }
}

// =============================================================================
// Load & transpose
// =============================================================================

/// Load a file into the state. On failure the previous dataset stays.
pub fn load_action(state: &mut PlotState, path: &Path) -> Status {
    match csv_reader::load_file(path) {
        Ok(dataset) => {
            let rows = dataset.len();
            state.load_data(dataset);
            tracing::info!(rows, path = %path.display(), "loaded dataset");
            Status::success(format!(
                "Loaded {} rows with {} columns.",
                rows,
                state.registry().columns().len()
            ))
        }
        Err(err) => {
            tracing::error!("failed to load {}: {}", path.display(), err);
            Status::error(err.to_string())
        }
    }
}

/// Transpose button: reports progress to `sink` and returns the final status
pub fn transpose_action<T, S>(
    coordinator: &mut TransposeCoordinator<T>,
    state: &mut PlotState,
    sink: &mut S,
) -> Status
where
    T: TransposeTransport,
    S: StatusSink + ?Sized,
{
    if state.dataset().map_or(true, |d| d.is_empty()) {
        let status = Status::error(UPLOAD_FIRST);
        sink.report(&status);
        return status;
    }

    sink.report(&Status::progress(TRANSPOSING));

    let status = match coordinator.transpose(state) {
        Ok(()) => Status::success(TRANSPOSE_SUCCESS),
        Err(PlotError::NoDataLoaded) => Status::error(UPLOAD_FIRST),
        Err(err) => Status::error(format!("Error transposing data: {}", err)),
    };
    sink.report(&status);
    status
}
