use std::fmt;
use std::fs;
use std::path::PathBuf;
#[cfg(feature = "http-source")]
use std::time::Duration;

use tracing::{debug, error};

use crate::core::SalesDataset;
use crate::error::{DashboardError, DashboardResult};

#[cfg(feature = "http-source")]
const HTTP_TIMEOUT: Duration = Duration::from_secs(10);

/// Where the sales dataset document is read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataSource {
    File(PathBuf),
    Url(String),
}

impl DataSource {
    /// `http://` and `https://` locations become [`DataSource::Url`],
    /// everything else a file path.
    #[must_use]
    pub fn parse(location: &str) -> Self {
        let trimmed = location.trim();
        if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
            Self::Url(trimmed.to_owned())
        } else {
            Self::File(PathBuf::from(trimmed))
        }
    }
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::File(path) => write!(f, "{}", path.display()),
            Self::Url(url) => f.write_str(url),
        }
    }
}

/// Reads and validates the dataset once.
pub fn load_dataset(source: &DataSource) -> DashboardResult<SalesDataset> {
    let document = read_document(source)?;
    let dataset = SalesDataset::from_json_str(&document)?;
    debug!(source = %source, records = dataset.len(), "sales dataset loaded");
    Ok(dataset)
}

/// Session load policy: any failure is logged and yields an empty dataset,
/// so both charts still render (with zero marks).
#[must_use]
pub fn load_dataset_or_empty(source: &DataSource) -> SalesDataset {
    match load_dataset(source) {
        Ok(dataset) => dataset,
        Err(err) => {
            error!(source = %source, error = %err, "failed to load sales dataset");
            SalesDataset::empty()
        }
    }
}

fn read_document(source: &DataSource) -> DashboardResult<String> {
    match source {
        DataSource::File(path) => fs::read_to_string(path).map_err(|err| {
            DashboardError::DataSource(format!("cannot read `{}`: {err}", path.display()))
        }),
        DataSource::Url(url) => fetch_url(url),
    }
}

#[cfg(feature = "http-source")]
fn fetch_url(url: &str) -> DashboardResult<String> {
    let failed = |err: reqwest::Error| DashboardError::DataSource(format!("GET {url}: {err}"));
    let client = reqwest::blocking::Client::builder()
        .timeout(HTTP_TIMEOUT)
        .build()
        .map_err(failed)?;
    client
        .get(url)
        .send()
        .and_then(reqwest::blocking::Response::error_for_status)
        .and_then(reqwest::blocking::Response::text)
        .map_err(failed)
}

#[cfg(not(feature = "http-source"))]
fn fetch_url(url: &str) -> DashboardResult<String> {
    Err(DashboardError::DataSource(format!(
        "cannot fetch `{url}`: built without the `http-source` feature"
    )))
}
