use std::sync::Arc;

use ecopoints_core::{CollectionPoint, Coordinate, EcoPointsService, MapUiState};
use tokio::sync::watch;

pub(crate) struct App {
    pub service: Arc<EcoPointsService>,
    /// Center used when (re)loading the dataset.
    pub home: Coordinate,

    /// Last snapshot observed from the service's map state.
    pub snapshot: Arc<MapUiState>,
    updates: watch::Receiver<Arc<MapUiState>>,
    pub list_index: usize,

    pub is_loading: bool,
    pub error_message: Option<String>,
}

impl App {
    pub(crate) fn new(service: Arc<EcoPointsService>, home: Coordinate) -> Self {
        let updates = service.state().subscribe();
        let snapshot = Arc::clone(&*updates.borrow());
        Self {
            service,
            home,
            snapshot,
            updates,
            list_index: 0,
            is_loading: false,
            error_message: None,
        }
    }

    /// Pick up the latest published snapshot, if any.
    pub(crate) fn sync(&mut self) {
        if !self.updates.has_changed().unwrap_or(false) {
            return;
        }
        self.snapshot = Arc::clone(&*self.updates.borrow_and_update());

        let visible = self.snapshot.visible_count();
        if self.list_index >= visible {
            self.list_index = visible.saturating_sub(1);
        }
    }

    pub(crate) fn selected_point(&self) -> Option<&CollectionPoint> {
        self.snapshot.visible().nth(self.list_index)
    }

    pub(crate) fn move_up(&mut self) {
        self.list_index = self.list_index.saturating_sub(1);
    }

    pub(crate) fn move_down(&mut self) {
        if self.list_index + 1 < self.snapshot.visible_count() {
            self.list_index += 1;
        }
    }
}
