//! Document source reading `*.geojson` files from a local directory.

use std::ffi::OsStr;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;
use tracing::{debug, warn};

use ecopoints_core::ports::{DocumentName, DocumentSource, SourceError, SourceMeta};

const EXTENSION: &str = "geojson";

/// Serves every `*.geojson` file directly inside a directory.
pub struct DirectorySource {
    root: PathBuf,
    meta: SourceMeta,
}

impl DirectorySource {
    /// Create a source rooted at the given directory.
    #[must_use]
    pub fn new<P: Into<PathBuf>>(root: P) -> Self {
        let root = root.into();
        let meta = SourceMeta {
            kind: "fs".to_owned(),
            location: root.display().to_string(),
        };
        Self { root, meta }
    }

    /// Directory this source reads from.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }
}

#[async_trait]
impl DocumentSource for DirectorySource {
    fn meta(&self) -> &SourceMeta {
        &self.meta
    }

    async fn list(&self) -> Result<Vec<DocumentName>, SourceError> {
        let mut entries = fs::read_dir(&self.root).await?;
        let mut names = Vec::new();

        while let Some(entry) = entries.next_entry().await? {
            // Follows symlinks, so linked documents are listed too.
            match fs::metadata(entry.path()).await {
                Ok(metadata) if metadata.is_dir() => continue,
                Ok(_) => {}
                Err(err) => {
                    warn!(path = %entry.path().display(), %err, "skipping unreadable entry");
                    continue;
                }
            }

            let Ok(name) = entry.file_name().into_string() else {
                warn!(path = %entry.path().display(), "skipping file with non UTF-8 name");
                continue;
            };

            if is_geojson(&name) {
                names.push(DocumentName(name));
            }
        }

        names.sort();
        debug!(root = %self.root.display(), documents = names.len(), "listed directory");
        Ok(names)
    }

    async fn fetch(&self, name: &DocumentName) -> Result<String, SourceError> {
        // Only plain file names inside the root are served.
        if Path::new(&name.0).file_name() != Some(OsStr::new(&name.0)) {
            return Err(SourceError::NotFound(name.clone()));
        }

        match fs::read_to_string(self.root.join(&name.0)).await {
            Ok(text) => Ok(text),
            Err(err) if err.kind() == ErrorKind::NotFound => Err(SourceError::NotFound(name.clone())),
            Err(err) => Err(SourceError::Io(err)),
        }
    }
}

fn is_geojson(name: &str) -> bool {
    Path::new(name)
        .extension()
        .and_then(OsStr::to_str)
        .is_some_and(|ext| ext.eq_ignore_ascii_case(EXTENSION))
}
