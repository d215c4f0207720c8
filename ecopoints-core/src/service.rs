//! High-level service facade combining a document source with the map state.

use std::sync::Arc;

use tracing::{debug, info};

use crate::loader;
use crate::model::{CollectionPoint, Coordinate};
use crate::ports::{DocumentSource, SourceError, SourceMeta};
use crate::state::MapState;

/// Public entry point for loading collection points and observing the map.
pub struct EcoPointsService {
    source: Arc<dyn DocumentSource>,
    state: MapState,
}

impl EcoPointsService {
    /// Create a new service bound to the provided source, with an empty map.
    #[must_use]
    pub fn new(source: Arc<dyn DocumentSource>) -> Self {
        Self {
            source,
            state: MapState::new(),
        }
    }

    /// Metadata of the underlying source.
    #[must_use]
    pub fn source(&self) -> &SourceMeta {
        self.source.meta()
    }

    /// Observable map state fed by [`EcoPointsService::refresh`].
    #[must_use]
    pub fn state(&self) -> &MapState {
        &self.state
    }

    /// Fetch and load every document of the source, in listing order.
    ///
    /// # Errors
    ///
    /// Returns a [`SourceError`] if listing or fetching fails, or
    /// [`SourceError::Load`] for the first document that does not load.
    pub async fn load_all(&self) -> Result<Vec<CollectionPoint>, SourceError> {
        let mut points = Vec::new();

        for document in self.source.list().await? {
            let raw = self.source.fetch(&document).await?;
            let loaded = loader::load(&raw, Some(document.0.as_str())).map_err(|source| {
                SourceError::Load {
                    document: document.clone(),
                    source,
                }
            })?;
            debug!(%document, points = loaded.len(), "document loaded");
            points.extend(loaded);
        }

        Ok(points)
    }

    /// Reload all documents and publish them with every category visible.
    ///
    /// The state is left untouched when loading fails.
    ///
    /// # Errors
    ///
    /// See [`EcoPointsService::load_all`].
    pub async fn refresh(&self, center: Coordinate) -> Result<usize, SourceError> {
        let points = self.load_all().await?;
        let count = points.len();
        self.state.initialize(points, center);

        let meta = self.source.meta();
        info!(
            source = %meta.kind,
            location = %meta.location,
            points = count,
            "map state refreshed"
        );
        Ok(count)
    }
}
