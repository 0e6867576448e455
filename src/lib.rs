// Library exports for tabplot

pub mod classify;
pub mod columns;
pub mod csv_reader;
pub mod data;
pub mod error;
pub mod graph;
pub mod ir;
pub mod layout;
pub mod runtime;
pub mod trace;
pub mod transpose;
pub mod validate;

pub use classify::{classify, ColumnType};
pub use columns::{default_selection, derive_columns, ColumnRegistry, ColumnSelection};
pub use data::{Dataset, Row};
pub use error::PlotError;
pub use ir::{Figure, PlotOutput};
pub use layout::{build_layout, LayoutSpec};
pub use runtime::{PlotState, Status, StatusLevel};
pub use trace::{build_trace, TraceMode, TraceSpec};
pub use transpose::{HttpTransport, TransposeCoordinator, TransposeTransport, TransportConfig};
pub use validate::{validate, ChartKind, ValidationResult};

use serde::Deserialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Figure description for a browser-side renderer
    #[serde(rename = "json")]
    #[default]
    Json,
    #[serde(rename = "png")]
    Png,
    #[serde(rename = "svg")]
    Svg,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RenderOptions {
    #[serde(default = "default_width")]
    pub width: u32,
    #[serde(default = "default_height")]
    pub height: u32,
    #[serde(default, rename = "type")]
    pub format: OutputFormat,
}

/// Largest raster the PNG renderer will allocate
pub const MAX_RASTER_PIXELS: usize = 100_000_000;

impl RenderOptions {
    /// Byte length of an RGB buffer for this canvas
    pub fn raster_len(&self) -> anyhow::Result<usize> {
        let pixels = (self.width as usize)
            .checked_mul(self.height as usize)
            .filter(|&n| n > 0 && n <= MAX_RASTER_PIXELS);
        pixels
            .and_then(|n| n.checked_mul(3))
            .ok_or_else(|| {
                anyhow::anyhow!(
                    "Canvas {}x{} is empty or too large (at most {} pixels)",
                    self.width,
                    self.height,
                    MAX_RASTER_PIXELS
                )
            })
    }
}

fn default_width() -> u32 { 800 }
fn default_height() -> u32 { 600 }

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: default_height(),
            format: OutputFormat::Json,
        }
    }
}
