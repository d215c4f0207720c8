//! Traits describing storage collaborators and shared helper types.

use std::fmt;
use std::io::Error as IoError;

use async_trait::async_trait;
use reqwest::Error as ReqwestError;

use crate::loader::LoadError;

#[derive(thiserror::Error, Debug)]
/// Errors that can occur while fetching or loading documents.
pub enum SourceError {
    /// Reading from local storage failed.
    #[error("I/O error: {0}")]
    Io(#[from] IoError),
    /// Network layer failed.
    #[error("Network error: {0}")]
    Network(#[from] ReqwestError),
    /// The source does not serve the requested document.
    #[error("Document not found: {0}")]
    NotFound(DocumentName),
    /// A fetched document could not be loaded.
    #[error("Failed to load {document}: {source}")]
    Load {
        /// Document that failed.
        document: DocumentName,
        /// Loader failure.
        #[source]
        source: LoadError,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
/// Name of a document within a source, e.g. `ecopontos.geojson`.
///
/// The name doubles as the classification hint passed to the loader.
pub struct DocumentName(pub String);

impl fmt::Display for DocumentName {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

impl From<&str> for DocumentName {
    fn from(name: &str) -> Self {
        Self(name.to_owned())
    }
}

#[derive(Debug, Clone)]
/// Metadata describing a document source.
pub struct SourceMeta {
    /// Short identifier, e.g. `fs` or `http`.
    pub kind: String,
    /// Human-friendly location (directory or base URL).
    pub location: String,
}

#[async_trait]
/// Storage collaborator that hands raw GeoJSON documents to the core.
pub trait DocumentSource: Send + Sync {
    /// Metadata describing this source.
    fn meta(&self) -> &SourceMeta;

    /// Names of all documents served, in a stable order.
    ///
    /// # Errors
    ///
    /// Returns a [`SourceError`] when the listing cannot be produced.
    async fn list(&self) -> Result<Vec<DocumentName>, SourceError>;

    /// Raw text of one document.
    ///
    /// # Errors
    ///
    /// Returns a [`SourceError`] when the document is missing or unreadable.
    async fn fetch(&self, name: &DocumentName) -> Result<String, SourceError>;
}
