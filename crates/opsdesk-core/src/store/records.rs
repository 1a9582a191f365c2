// ── Ordered reactive record list ──
//
// Gateway-ordered storage with push-based change notification via
// `watch` channels. The snapshot IS the storage: rows live in a single
// `Vec` in the order the gateway returned them (newest first), and no
// secondary index is kept. Lookups are linear scans, which is fine at
// the list sizes a desk works with.

use std::sync::Arc;

use tokio::sync::watch;

use crate::model::RecordId;

/// Rows that carry a gateway-assigned id.
pub(crate) trait Keyed {
    fn id(&self) -> &RecordId;
}

/// An ordered, reactive list of rows for a single collection.
///
/// Every mutation rebuilds the snapshot that subscribers receive and
/// bumps a version counter. Positions are stable: `merge` replaces a
/// row in place, `prepend` puts new rows at the front, and only
/// `replace_all` reorders.
pub(crate) struct RecordSet<T: Clone + Send + Sync + 'static> {
    /// Full snapshot, rebuilt on mutation for efficient subscription.
    snapshot: watch::Sender<Arc<Vec<Arc<T>>>>,

    /// Version counter, bumped on every mutation.
    version: watch::Sender<u64>,
}

impl<T: Keyed + Clone + Send + Sync + 'static> RecordSet<T> {
    pub(crate) fn new() -> Self {
        let (snapshot, _) = watch::channel(Arc::new(Vec::new()));
        let (version, _) = watch::channel(0u64);

        Self { snapshot, version }
    }

    /// Replace the whole list with freshly fetched rows, keeping the
    /// gateway's ordering.
    pub(crate) fn replace_all(&self, rows: Vec<T>) {
        let rows: Vec<Arc<T>> = rows.into_iter().map(Arc::new).collect();
        // `send_modify` updates unconditionally, even with zero receivers.
        self.snapshot.send_modify(|snap| *snap = Arc::new(rows));
        self.bump_version();
    }

    /// Insert a row at the front of the list. Returns the stored row.
    pub(crate) fn prepend(&self, row: T) -> Arc<T> {
        let row = Arc::new(row);
        let stored = Arc::clone(&row);
        self.snapshot.send_modify(move |snap| {
            let mut rows = Vec::with_capacity(snap.len() + 1);
            rows.push(row);
            rows.extend(snap.iter().cloned());
            *snap = Arc::new(rows);
        });
        self.bump_version();
        stored
    }

    /// Apply `patch` to the row with the given id, in place.
    ///
    /// Returns `false` when no row matches; the snapshot is untouched
    /// and subscribers are not woken in that case.
    pub(crate) fn merge(&self, id: &RecordId, patch: impl FnOnce(&mut T)) -> bool {
        let mut found = false;
        self.snapshot.send_if_modified(|snap| {
            let Some(pos) = snap.iter().position(|row| row.id() == id) else {
                return false;
            };
            let mut rows: Vec<Arc<T>> = snap.iter().cloned().collect();
            let mut updated = (*rows[pos]).clone();
            patch(&mut updated);
            rows[pos] = Arc::new(updated);
            *snap = Arc::new(rows);
            found = true;
            true
        });
        if found {
            self.bump_version();
        }
        found
    }

    /// Remove the row with the given id. Returns `false` on a miss.
    pub(crate) fn remove(&self, id: &RecordId) -> bool {
        let mut found = false;
        self.snapshot.send_if_modified(|snap| {
            let Some(pos) = snap.iter().position(|row| row.id() == id) else {
                return false;
            };
            let mut rows: Vec<Arc<T>> = snap.iter().cloned().collect();
            rows.remove(pos);
            *snap = Arc::new(rows);
            found = true;
            true
        });
        if found {
            self.bump_version();
        }
        found
    }

    /// Linear scan for a row by id.
    pub(crate) fn get(&self, id: &RecordId) -> Option<Arc<T>> {
        self.snapshot
            .borrow()
            .iter()
            .find(|row| row.id() == id)
            .cloned()
    }

    /// Get the current snapshot (cheap `Arc` clone).
    pub(crate) fn snapshot(&self) -> Arc<Vec<Arc<T>>> {
        self.snapshot.borrow().clone()
    }

    /// Subscribe to snapshot changes via a `watch::Receiver`.
    pub(crate) fn subscribe(&self) -> watch::Receiver<Arc<Vec<Arc<T>>>> {
        self.snapshot.subscribe()
    }

    pub(crate) fn len(&self) -> usize {
        self.snapshot.borrow().len()
    }

    #[allow(dead_code)]
    pub(crate) fn is_empty(&self) -> bool {
        self.snapshot.borrow().is_empty()
    }

    #[allow(dead_code)]
    pub(crate) fn version(&self) -> u64 {
        *self.version.borrow()
    }

    // ── Private helpers ──────────────────────────────────────────────

    /// Increment the version counter.
    fn bump_version(&self) {
        self.version.send_modify(|v| *v += 1);
    }
}
