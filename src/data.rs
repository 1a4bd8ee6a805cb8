//! Table loading using Polars: embedded demo data, local files and remote CSVs

use anyhow::Context;
use polars::prelude::*;
use std::io::Cursor;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info};

/// Embedded 13-client demo table, also the canonical test fixture
pub const DEMO_CSV: &str = "\
Client_Name,Strategic_Importance_(1-5),Spend_Potential_(1-5),Relationship_Risk_(R/A/G),FY25_Revenue,%_of_Total_Revenue
Arctic Tours,1,2,R,200000,28%
Blackpool Tower,1,2,A,5000,1%
Crest Hotels,4,1,G,35000,5%
Dan Air,4,5,A,26500,4%
EasyJetter,5,4,G,30000,4%
Finland Tourist Board,1,4,A,60000,8%
Grange Hotel Group,3,3,R,45000,6%
Hotelfinance.com,4,2,A,92500,13%
Iceland Tours,5,1,R,69500,10%
Jupiter Travel Ltd,1,1,A,8500,1%
Kenyan Safari Group,2,2,A,16000,2%
Lapland Holidays,4,3,G,16000,2%
Monte Carlo Yachting Group,5,5,G,105000,15%";

/// Where the client table comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataSource {
    Demo,
    File(PathBuf),
    Url(String),
}

impl std::fmt::Display for DataSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DataSource::Demo => f.write_str("embedded demo data"),
            DataSource::File(path) => write!(f, "{}", path.display()),
            DataSource::Url(url) => f.write_str(url),
        }
    }
}

/// Parse CSV bytes into a DataFrame.
///
/// Every column is read as text; typing happens in the schema validator so a
/// `%`-suffixed share or a stray value never gets silently coerced here.
pub fn read_csv_bytes(bytes: Vec<u8>) -> crate::Result<DataFrame> {
    let df = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(0))
        .into_reader_with_file_handle(Cursor::new(bytes))
        .finish()
        .context("failed to parse CSV")?;

    debug!(rows = df.height(), columns = df.width(), "parsed CSV table");
    Ok(df)
}

/// Load the embedded demo table
pub fn load_demo() -> crate::Result<DataFrame> {
    read_csv_bytes(DEMO_CSV.as_bytes().to_vec())
}

/// Load a CSV file from disk
pub fn load_csv_file(path: impl AsRef<Path>) -> crate::Result<DataFrame> {
    let path = path.as_ref();
    let bytes =
        std::fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
    read_csv_bytes(bytes)
}

/// Fetch a remote CSV with a single bounded-timeout request
pub fn fetch_csv(url: &str, timeout: Duration) -> crate::Result<Vec<u8>> {
    let client = reqwest::blocking::Client::builder()
        .timeout(timeout)
        .build()
        .context("failed to build HTTP client")?;

    let response = client
        .get(url)
        .send()
        .with_context(|| format!("request to {url} failed"))?
        .error_for_status()
        .with_context(|| format!("{url} returned an error status"))?;

    let bytes = response
        .bytes()
        .with_context(|| format!("failed to read response body from {url}"))?;
    Ok(bytes.to_vec())
}

/// Load a table from any source
pub fn load_table(source: &DataSource, timeout: Duration) -> crate::Result<DataFrame> {
    let df = match source {
        DataSource::Demo => load_demo()?,
        DataSource::File(path) => load_csv_file(path)?,
        DataSource::Url(url) => read_csv_bytes(fetch_csv(url, timeout)?)?,
    };

    info!(source = %source, rows = df.height(), "loaded client table");
    Ok(df)
}
