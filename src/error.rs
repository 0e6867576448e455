use thiserror::Error;

/// Every failure the plotting pipeline can surface.
///
/// None of these escape a user-triggered action: `runtime` turns each one
/// into a [`crate::runtime::Status`].
#[derive(Debug, Error)]
pub enum PlotError {
    #[error("dataset has no rows")]
    EmptyDataset,

    #[error("Unknown chart type: '{0}'")]
    UnknownChartKind(String),

    #[error("column '{0}' not found in dataset")]
    MissingColumn(String),

    #[error("no columns selected")]
    NoSelection,

    #[error("no data loaded")]
    NoDataLoaded,

    #[error("Server returned status: {0}")]
    RemoteTranspose(u16),

    #[error("{0}")]
    Network(String),

    #[error("invalid dataset: {0}")]
    InvalidDataset(String),

    #[error("File type not supported: '{0}'. Please upload a .csv file.")]
    UnsupportedFileType(String),

    #[error("An error occurred while processing the file: {0}")]
    Csv(#[from] csv::Error),

    #[error("{0}")]
    Io(#[from] std::io::Error),
}

impl From<serde_json::Error> for PlotError {
    fn from(err: serde_json::Error) -> Self {
        PlotError::InvalidDataset(err.to_string())
    }
}
