// Round-trip of the current dataset through the remote transpose endpoint

use crate::data::Dataset;
use crate::error::PlotError;
use crate::runtime::PlotState;
use reqwest::blocking::{Client, ClientBuilder};
use serde::Deserialize;
use std::time::Duration;

pub const TRANSPOSE_PATH: &str = "/transpose";
pub const DEFAULT_SERVER: &str = "http://127.0.0.1:5000";

static USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Where and how to reach the transpose service
#[derive(Debug, Clone, Deserialize)]
pub struct TransportConfig {
    #[serde(default = "default_server")]
    pub server: String,
    /// No timeout when unset
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

fn default_server() -> String {
    DEFAULT_SERVER.to_string()
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            server: default_server(),
            timeout_secs: None,
        }
    }
}

/// Sends a dataset to the transpose service and returns its answer
pub trait TransposeTransport {
    fn send(&self, dataset: &Dataset) -> Result<Dataset, PlotError>;
}

/// JSON over HTTP POST to `<server>/transpose`
pub struct HttpTransport {
    client: Client,
    endpoint: String,
}

impl HttpTransport {
    pub fn new(config: &TransportConfig) -> Result<Self, PlotError> {
        let client = ClientBuilder::new()
            .user_agent(USER_AGENT)
            .timeout(config.timeout_secs.map(Duration::from_secs))
            .build()
            .map_err(|e| PlotError::Network(e.to_string()))?;

        Ok(Self {
            client,
            endpoint: endpoint_url(&config.server),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

pub fn endpoint_url(server: &str) -> String {
    format!("{}{}", server.trim_end_matches('/'), TRANSPOSE_PATH)
}

impl TransposeTransport for HttpTransport {
    fn send(&self, dataset: &Dataset) -> Result<Dataset, PlotError> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(dataset)
            .send()
            .map_err(|e| PlotError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(PlotError::RemoteTranspose(status.as_u16()));
        }

        let body = response
            .text()
            .map_err(|e| PlotError::Network(e.to_string()))?;
        Dataset::from_json_str(&body)
    }
}

/// Send `dataset` through `transport`. An empty dataset is refused before
/// anything goes over the wire.
pub fn transpose_dataset<T: TransposeTransport + ?Sized>(
    transport: &T,
    dataset: &Dataset,
) -> Result<Dataset, PlotError> {
    if dataset.is_empty() {
        return Err(PlotError::NoDataLoaded);
    }
    transport.send(dataset)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransposeOutcome {
    Succeeded,
    Failed,
}

/// Drives one transpose round-trip at a time against a [`PlotState`].
///
/// The state keeps its old dataset unless a complete, valid response
/// arrives. Nothing is retried. The request blocks inside
/// [`TransposeCoordinator::transpose`], so between calls the coordinator is
/// always idle and only the outcome of the last call is kept.
pub struct TransposeCoordinator<T> {
    transport: T,
    last_outcome: Option<TransposeOutcome>,
}

impl<T: TransposeTransport> TransposeCoordinator<T> {
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            last_outcome: None,
        }
    }

    /// `None` until the first request has finished
    pub fn last_outcome(&self) -> Option<TransposeOutcome> {
        self.last_outcome
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Replace the state's dataset with its transposed form and re-derive
    /// columns. Fails with `NoDataLoaded` when nothing is loaded.
    pub fn transpose(&mut self, state: &mut PlotState) -> Result<(), PlotError> {
        let dataset = match state.dataset() {
            Some(d) if !d.is_empty() => d,
            _ => return Err(PlotError::NoDataLoaded),
        };

        tracing::info!(rows = dataset.len(), "requesting transpose");
        let result = transpose_dataset(&self.transport, dataset);

        match result {
            Ok(transposed) => {
                tracing::info!(rows = transposed.len(), "transpose succeeded");
                self.last_outcome = Some(TransposeOutcome::Succeeded);
                state.load_data(transposed);
                Ok(())
            }
            Err(err) => {
                tracing::error!("transpose failed: {}", err);
                self.last_outcome = Some(TransposeOutcome::Failed);
                Err(err)
            }
        }
    }
}
