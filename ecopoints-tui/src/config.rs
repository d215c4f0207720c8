use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use clap::Parser;
use ecopoints_core::{Coordinate, DEFAULT_CENTER, DocumentName, DocumentSource};
use ecopoints_source_fs::DirectorySource;
use ecopoints_source_http::HttpSource;
use reqwest::Client;

#[derive(Debug, Parser)]
#[command(name = "ecopoints")]
#[command(about = "Browse eco collection points loaded from GeoJSON datasets", long_about = None)]
pub(crate) struct Config {
    /// Directory containing *.geojson documents
    #[arg(long, env = "ECOPOINTS_DIR", conflicts_with = "url")]
    pub dir: Option<PathBuf>,

    /// Base URL serving the documents
    #[arg(long, env = "ECOPOINTS_URL", requires = "documents")]
    pub url: Option<String>,

    /// Document to fetch below --url (repeatable)
    #[arg(long = "document", value_name = "NAME")]
    pub documents: Vec<String>,

    /// Latitude of the initial map center
    #[arg(long, default_value_t = DEFAULT_CENTER.lat(), allow_negative_numbers = true)]
    pub center_lat: f64,

    /// Longitude of the initial map center
    #[arg(long, default_value_t = DEFAULT_CENTER.lng(), allow_negative_numbers = true)]
    pub center_lng: f64,

    /// Directory for the log file
    #[arg(long, env = "ECOPOINTS_LOG_DIR", default_value = "logs")]
    pub log_dir: PathBuf,
}

impl Config {
    pub(crate) fn center(&self) -> Result<Coordinate> {
        Coordinate::new(self.center_lat, self.center_lng).context("Invalid map center")
    }

    pub(crate) fn source(&self) -> Result<Arc<dyn DocumentSource>> {
        if let Some(dir) = &self.dir {
            return Ok(Arc::new(DirectorySource::new(dir.clone())));
        }

        let Some(url) = &self.url else {
            bail!("Pass --dir <path> or --url <base> --document <name>");
        };

        let client = Client::builder().user_agent("ecopoints/0.1").build()?;
        let documents = self
            .documents
            .iter()
            .map(|name| DocumentName(name.clone()))
            .collect();
        Ok(Arc::new(HttpSource::new(client, url.clone(), documents)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_directory_source() {
        let config = Config::try_parse_from([
            "ecopoints",
            "--dir",
            "data",
            "--center-lat",
            "-22.9",
            "--center-lng",
            "-43.2",
        ])
        .expect("valid args");

        assert_eq!(config.dir, Some(PathBuf::from("data")));
        let center = config.center().expect("valid center");
        assert!((center.lat() + 22.9).abs() < 1e-9);
        assert_eq!(config.source().expect("source").meta().kind, "fs");
    }

    #[test]
    fn url_requires_documents() {
        assert!(Config::try_parse_from(["ecopoints", "--url", "https://example.org"]).is_err());

        let config = Config::try_parse_from([
            "ecopoints",
            "--url",
            "https://example.org/data",
            "--document",
            "ecopontos.geojson",
        ])
        .expect("valid args");
        assert_eq!(config.source().expect("source").meta().kind, "http");
    }

    #[test]
    fn rejects_out_of_range_center() {
        let config =
            Config::try_parse_from(["ecopoints", "--dir", "data", "--center-lat", "123"])
                .expect("parses");
        assert!(config.center().is_err());
    }
}
