//! Client Matrix: classify clients into a strategic-importance / spend-potential
//! matrix and describe the result as a chart
//!
//! The engine is a pure pipeline over one in-memory table: validate the six
//! required columns, classify every client into Bronze, Silver, Gold or
//! Platinum, build a renderer-agnostic chart specification and aggregate the
//! headline statistics. Loading and rendering are thin layers around it.

pub mod chart;
pub mod cli;
pub mod data;
pub mod error;
pub mod model;
pub mod schema;
pub mod summary;
pub mod viz;

// Re-export public items for easier access
pub use chart::{build_chart_spec, ChartSpec};
pub use cli::Args;
pub use data::{load_table, DataSource, DEMO_CSV};
pub use error::DataError;
pub use model::{classify, ClassifiedClient, ClientRecord, ClientTable, Quadrant, RiskCode};
pub use schema::validate;
pub use summary::{summarize, SummaryStats};

use polars::prelude::DataFrame;

/// Common result type used by the loading, rendering and CLI layers
pub type Result<T> = anyhow::Result<T>;

/// Everything produced for one input table
#[derive(Debug, Clone, serde::Serialize)]
pub struct Analysis {
    pub table: ClientTable,
    pub classified: Vec<ClassifiedClient>,
    pub chart: ChartSpec,
    pub summary: SummaryStats,
}

/// Validate `df` and derive classification, chart and summary from it.
///
/// A validation failure is returned before anything else is computed.
pub fn analyze(df: &DataFrame) -> std::result::Result<Analysis, DataError> {
    let table = validate(df)?;
    Ok(analyze_table(table))
}

/// Derive classification, chart and summary from an already validated table
pub fn analyze_table(table: ClientTable) -> Analysis {
    let classified = table.classify();
    let chart = build_chart_spec(&table);
    let summary = summarize(&table);
    Analysis {
        table,
        classified,
        chart,
        summary,
    }
}
