//! Command-line interface definitions and argument parsing

use crate::data::DataSource;
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

/// Classify clients into the Bronze/Silver/Gold/Platinum matrix and chart them
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to a client CSV file (the embedded demo data is used when no
    /// input or URL is given)
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// URL of a client CSV file; ignored when --input is given
    #[arg(short, long)]
    pub url: Option<String>,

    /// Output path for the rendered chart (.svg for SVG, otherwise PNG)
    #[arg(short, long, default_value = "client_categorisation_matrix.png")]
    pub output: PathBuf,

    /// Also write the chart specification as JSON to this path
    #[arg(long)]
    pub spec: Option<PathBuf>,

    /// Skip rendering the chart image
    #[arg(long)]
    pub no_render: bool,

    /// Scale factor for PNG export
    #[arg(long, default_value = "2")]
    pub scale: u32,

    /// Timeout in seconds for fetching --url
    #[arg(long, default_value = "10")]
    pub timeout_secs: u64,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

impl Args {
    /// Where to load the table from: file first, then URL, then the demo data
    pub fn source(&self) -> DataSource {
        match (&self.input, &self.url) {
            (Some(path), _) => DataSource::File(path.clone()),
            (None, Some(url)) => DataSource::Url(url.clone()),
            (None, None) => DataSource::Demo,
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Reject argument combinations clap cannot express
    pub fn validate(&self) -> crate::Result<()> {
        if self.scale == 0 {
            anyhow::bail!("--scale must be at least 1");
        }
        if self.timeout_secs == 0 {
            anyhow::bail!("--timeout-secs must be at least 1");
        }
        if let Some(url) = &self.url {
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                anyhow::bail!("--url must be an http(s) URL, got '{}'", url);
            }
        }
        Ok(())
    }
}
