//! Filtered, observable map state.
//!
//! [`MapState`] owns a single published [`MapUiState`] snapshot. Every mutation
//! builds a new snapshot and swaps it in whole, so a reader holding an
//! `Arc<MapUiState>` always sees a markers/selection pair that was valid
//! together.

use std::collections::BTreeSet;
use std::sync::Arc;

use tokio::sync::watch;

use crate::model::{CollectionPoint, CollectionType, Coordinate};

/// Default viewport center (São Paulo).
pub const DEFAULT_CENTER: Coordinate = Coordinate::from_trusted(-23.5505, -46.6333);

#[derive(Debug, Clone)]
/// Immutable snapshot read by the presentation layer.
pub struct MapUiState {
    /// Viewport center.
    pub center: Coordinate,
    /// Every loaded point in parse order.
    pub markers: Arc<[CollectionPoint]>,
    /// Categories currently visible.
    pub selected: BTreeSet<CollectionType>,
    /// Incremented on every publish.
    pub version: u64,
}

impl Default for MapUiState {
    fn default() -> Self {
        Self {
            center: DEFAULT_CENTER,
            markers: Arc::from(Vec::new()),
            selected: CollectionType::ALL.into_iter().collect(),
            version: 0,
        }
    }
}

impl MapUiState {
    /// Points whose category is currently selected, in parse order.
    pub fn visible(&self) -> impl Iterator<Item = &CollectionPoint> {
        self.markers
            .iter()
            .filter(|point| self.selected.contains(&point.category))
    }

    /// Number of visible points.
    #[must_use]
    pub fn visible_count(&self) -> usize {
        self.visible().count()
    }

    /// Number of loaded points of the given category, visible or not.
    #[must_use]
    pub fn count(&self, kind: CollectionType) -> usize {
        self.markers
            .iter()
            .filter(|point| point.category == kind)
            .count()
    }

    /// Whether the category is currently shown.
    #[must_use]
    pub fn is_selected(&self, kind: CollectionType) -> bool {
        self.selected.contains(&kind)
    }

    /// True until a dataset has been loaded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }

    fn next(&self) -> Self {
        Self {
            center: self.center,
            markers: Arc::clone(&self.markers),
            selected: self.selected.clone(),
            version: self.version.wrapping_add(1),
        }
    }
}

/// Single observable cell holding the current [`MapUiState`].
///
/// Writers are expected to be a single control loop; readers may live on any
/// thread and either poll [`MapState::current`] or await changes through
/// [`MapState::subscribe`].
#[derive(Debug)]
pub struct MapState {
    sender: watch::Sender<Arc<MapUiState>>,
}

impl Default for MapState {
    fn default() -> Self {
        Self::new()
    }
}

impl MapState {
    /// Create a cell holding the default, empty snapshot.
    #[must_use]
    pub fn new() -> Self {
        let (sender, _receiver) = watch::channel(Arc::new(MapUiState::default()));
        Self { sender }
    }

    /// Latest published snapshot.
    #[must_use]
    pub fn current(&self) -> Arc<MapUiState> {
        Arc::clone(&*self.sender.borrow())
    }

    /// Receiver notified on every publish.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Arc<MapUiState>> {
        self.sender.subscribe()
    }

    /// Replace the dataset, select every category and move the viewport.
    pub fn initialize(&self, points: Vec<CollectionPoint>, center: Coordinate) {
        let markers: Arc<[CollectionPoint]> = Arc::from(points);
        self.publish(|state| {
            let mut next = state.next();
            next.markers = markers;
            next.center = center;
            next.selected = CollectionType::ALL.into_iter().collect();
            next
        });
    }

    /// Show the category if hidden, hide it if shown.
    pub fn toggle(&self, kind: CollectionType) {
        self.publish(|state| {
            let mut next = state.next();
            if !next.selected.remove(&kind) {
                next.selected.insert(kind);
            }
            next
        });
    }

    /// Make every category visible again.
    pub fn show_all(&self) {
        self.publish(|state| {
            let mut next = state.next();
            next.selected = CollectionType::ALL.into_iter().collect();
            next
        });
    }

    /// Move the viewport center, keeping markers and selection.
    pub fn recenter(&self, center: Coordinate) {
        self.publish(|state| {
            let mut next = state.next();
            next.center = center;
            next
        });
    }

    // Swaps the snapshot under the channel's write lock and notifies receivers.
    fn publish(&self, update: impl FnOnce(&MapUiState) -> MapUiState) {
        self.sender.send_modify(|current| {
            *current = Arc::new(update(current));
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{PointDetails, PointId};

    fn point(id: &str, category: CollectionType) -> CollectionPoint {
        CollectionPoint {
            id: PointId(id.to_owned()),
            name: id.to_owned(),
            coordinate: DEFAULT_CENTER,
            category,
            details: PointDetails::default(),
        }
    }

    fn sample() -> Vec<CollectionPoint> {
        vec![
            point("a", CollectionType::Recyclable),
            point("b", CollectionType::Organic),
            point("c", CollectionType::Recyclable),
            point("d", CollectionType::DropOff),
        ]
    }

    #[test]
    fn starts_empty_with_everything_selected() {
        let state = MapState::new();
        let snapshot = state.current();
        assert!(snapshot.is_empty());
        assert_eq!(snapshot.selected.len(), CollectionType::ALL.len());
        assert_eq!(snapshot.version, 0);
        assert_eq!(snapshot.center, DEFAULT_CENTER);
    }

    #[test]
    fn initialize_selects_all_and_keeps_order() {
        let state = MapState::new();
        state.toggle(CollectionType::Organic);
        let center = Coordinate::new(50.0, 10.0).expect("valid");

        state.initialize(sample(), center);

        let snapshot = state.current();
        assert_eq!(snapshot.markers.len(), 4);
        assert_eq!(snapshot.selected.len(), CollectionType::ALL.len());
        assert_eq!(snapshot.center, center);
        let ids: Vec<_> = snapshot.markers.iter().map(|point| point.id.0.as_str()).collect();
        assert_eq!(ids, ["a", "b", "c", "d"]);
    }

    #[test]
    fn toggle_filters_visible_points() {
        let state = MapState::new();
        state.initialize(sample(), DEFAULT_CENTER);

        state.toggle(CollectionType::Recyclable);
        let snapshot = state.current();
        assert!(!snapshot.is_selected(CollectionType::Recyclable));
        let visible: Vec<_> = snapshot.visible().map(|point| point.id.0.as_str()).collect();
        assert_eq!(visible, ["b", "d"]);
        assert_eq!(snapshot.count(CollectionType::Recyclable), 2);
    }

    #[test]
    fn toggle_twice_restores_selection() {
        let state = MapState::new();
        state.initialize(sample(), DEFAULT_CENTER);
        state.toggle(CollectionType::Hazardous);
        let before = state.current().selected.clone();

        for kind in CollectionType::ALL {
            state.toggle(kind);
            state.toggle(kind);
            assert_eq!(state.current().selected, before, "{kind} toggle pair");
        }
    }

    #[test]
    fn empty_selection_hides_everything() {
        let state = MapState::new();
        state.initialize(sample(), DEFAULT_CENTER);
        for kind in CollectionType::ALL {
            state.toggle(kind);
        }
        let snapshot = state.current();
        assert!(snapshot.selected.is_empty());
        assert_eq!(snapshot.visible_count(), 0);

        state.show_all();
        assert_eq!(state.current().visible_count(), 4);
    }

    #[test]
    fn old_snapshots_are_never_mutated() {
        let state = MapState::new();
        state.initialize(sample(), DEFAULT_CENTER);
        let before = state.current();

        state.toggle(CollectionType::DropOff);
        state.recenter(Coordinate::new(0.0, 0.0).expect("valid"));

        assert!(before.is_selected(CollectionType::DropOff));
        assert_eq!(before.center, DEFAULT_CENTER);
        let after = state.current();
        assert!(Arc::ptr_eq(&before.markers, &after.markers));
        assert_eq!(after.version, before.version + 2);
    }

    #[tokio::test]
    async fn subscribers_see_each_publish() {
        let state = MapState::new();
        let mut receiver = state.subscribe();

        state.initialize(sample(), DEFAULT_CENTER);
        receiver.changed().await.expect("sender alive");
        assert_eq!(receiver.borrow_and_update().markers.len(), 4);

        state.toggle(CollectionType::Organic);
        receiver.changed().await.expect("sender alive");
        let snapshot = Arc::clone(&*receiver.borrow_and_update());
        assert!(!snapshot.is_selected(CollectionType::Organic));
        assert_eq!(snapshot.version, state.current().version);
    }

    #[test]
    fn concurrent_readers_never_see_torn_state() {
        let state = Arc::new(MapState::new());
        state.initialize(sample(), DEFAULT_CENTER);

        let reader = {
            let state = Arc::clone(&state);
            std::thread::spawn(move || {
                for _ in 0..1_000 {
                    let snapshot = state.current();
                    let expected = snapshot
                        .markers
                        .iter()
                        .filter(|point| snapshot.selected.contains(&point.category))
                        .count();
                    assert_eq!(snapshot.visible_count(), expected);
                    assert_eq!(snapshot.markers.len(), 4);
                }
            })
        };

        for _ in 0..1_000 {
            state.toggle(CollectionType::Recyclable);
        }
        reader.join().expect("reader thread");
    }
}
