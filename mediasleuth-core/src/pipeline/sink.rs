// ============================================================================
// mediasleuth-core/src/pipeline/sink.rs
// ============================================================================
//
// DISPLAY SINK: Where Row Snapshots Go
//
// Every inspection announces itself with a placeholder row, then pushes a
// full row snapshot after each stage. The sink owns the mapping from
// inspection id to row; the core never tracks row positions.
//
// `InspectionTable` is the in-memory sink used by the CLI and tests. It is
// keyed by inspection id and remembers which id is current for each path,
// so a late snapshot from a superseded run is reported as stale. Only the
// most recent superseded ids are remembered; updates for older ones come
// back as `RowNotFound`, which the pipeline drops the same way.
//
// AI-ASSISTANT-INFO: Display sink trait and identity-keyed row table

// ---- Standard library imports ----
use std::collections::VecDeque;
use std::path::PathBuf;
use std::sync::{Mutex, MutexGuard, PoisonError};

// ---- Internal crate imports ----
use crate::record::{DisplayRow, InspectionId};

/// What happened to a row update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SinkUpdate {
    Applied,
    /// The sink no longer knows the row; the update is dropped
    RowNotFound,
    /// The row belongs to a run that has since been refreshed
    Stale,
}

/// Consumer of inspection rows.
///
/// Implementations serialize their own updates; they are called from every
/// worker of the pool.
pub trait DisplaySink: Send + Sync {
    fn add_placeholder(&self, id: InspectionId, row: DisplayRow);

    fn update_row(&self, id: InspectionId, row: DisplayRow) -> SinkUpdate;
}

/// Sink that discards everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullDisplaySink;

impl DisplaySink for NullDisplaySink {
    fn add_placeholder(&self, _id: InspectionId, _row: DisplayRow) {}

    fn update_row(&self, _id: InspectionId, _row: DisplayRow) -> SinkUpdate {
        SinkUpdate::Applied
    }
}

/// One row of an [`InspectionTable`].
#[derive(Debug, Clone, PartialEq)]
pub struct TableRow {
    pub id: InspectionId,
    pub path: PathBuf,
    pub row: DisplayRow,
}

/// Superseded ids an [`InspectionTable`] remembers by default.
pub const DEFAULT_STALE_CAPACITY: usize = 1024;

#[derive(Debug, Default)]
struct TableState {
    rows: Vec<TableRow>,
    superseded: VecDeque<InspectionId>,
}

/// In-memory table of rows keyed by inspection id.
#[derive(Debug)]
pub struct InspectionTable {
    state: Mutex<TableState>,
    stale_capacity: usize,
}

impl Default for InspectionTable {
    fn default() -> Self {
        Self::with_stale_capacity(DEFAULT_STALE_CAPACITY)
    }
}

impl InspectionTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Table remembering at most `capacity` superseded ids.
    pub fn with_stale_capacity(capacity: usize) -> Self {
        Self {
            state: Mutex::default(),
            stale_capacity: capacity,
        }
    }

    fn lock(&self) -> MutexGuard<'_, TableState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Snapshot of every row in insertion order.
    pub fn rows(&self) -> Vec<TableRow> {
        self.lock().rows.clone()
    }

    pub fn row(&self, id: InspectionId) -> Option<DisplayRow> {
        self.lock()
            .rows
            .iter()
            .find(|r| r.id == id)
            .map(|r| r.row.clone())
    }

    /// Removes a row; later updates for `id` are dropped.
    pub fn remove(&self, id: InspectionId) -> bool {
        let mut state = self.lock();
        let before = state.rows.len();
        state.rows.retain(|r| r.id != id);
        state.rows.len() != before
    }

    pub fn len(&self) -> usize {
        self.lock().rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// The path a row was created for is its first cell.
fn row_path(row: &DisplayRow) -> PathBuf {
    PathBuf::from(row.cells.first().map(String::as_str).unwrap_or_default())
}

impl DisplaySink for InspectionTable {
    /// A placeholder for a path that already has a row replaces that row in
    /// place and supersedes its id.
    fn add_placeholder(&self, id: InspectionId, row: DisplayRow) {
        let path = row_path(&row);
        let mut state = self.lock();
        let existing = state.rows.iter().position(|r| r.path == path);
        match existing {
            Some(index) => {
                let old = std::mem::replace(&mut state.rows[index], TableRow { id, path, row });
                log::debug!("Inspection {} superseded by {}", old.id, id);
                if self.stale_capacity > 0 {
                    if state.superseded.len() == self.stale_capacity {
                        state.superseded.pop_front();
                    }
                    state.superseded.push_back(old.id);
                }
            }
            None => state.rows.push(TableRow { id, path, row }),
        }
    }

    fn update_row(&self, id: InspectionId, row: DisplayRow) -> SinkUpdate {
        let mut state = self.lock();
        if let Some(entry) = state.rows.iter_mut().find(|r| r.id == id) {
            entry.row = row;
            SinkUpdate::Applied
        } else if state.superseded.contains(&id) {
            SinkUpdate::Stale
        } else {
            SinkUpdate::RowNotFound
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(path: &str, value: &str) -> DisplayRow {
        DisplayRow {
            cells: vec![path.to_string(), value.to_string()],
        }
    }

    #[test]
    fn test_updates_are_keyed_by_id() {
        let table = InspectionTable::new();
        let (a, b) = (InspectionId::new(), InspectionId::new());
        table.add_placeholder(a, row("/x/a.mov", "loading..."));
        table.add_placeholder(b, row("/x/b.mov", "loading..."));

        assert_eq!(table.update_row(b, row("/x/b.mov", "done")), SinkUpdate::Applied);
        assert_eq!(table.row(b).unwrap().cells[1], "done");
        assert_eq!(table.row(a).unwrap().cells[1], "loading...");
    }

    #[test]
    fn test_refresh_makes_old_id_stale() {
        let table = InspectionTable::new();
        let (old, new) = (InspectionId::new(), InspectionId::new());
        table.add_placeholder(old, row("/x/a.mov", "loading..."));
        table.add_placeholder(new, row("/x/a.mov", "loading..."));

        assert_eq!(table.len(), 1);
        assert_eq!(table.update_row(old, row("/x/a.mov", "late")), SinkUpdate::Stale);
        assert_eq!(table.row(new).unwrap().cells[1], "loading...");
    }

    #[test]
    fn test_superseded_ids_are_bounded() {
        let table = InspectionTable::with_stale_capacity(2);
        let ids: Vec<InspectionId> = (0..4).map(|_| InspectionId::new()).collect();
        for id in &ids {
            table.add_placeholder(*id, row("/x/a.mov", "loading..."));
        }

        assert_eq!(table.len(), 1);
        assert_eq!(table.update_row(ids[0], row("/x/a.mov", "late")), SinkUpdate::RowNotFound);
        assert_eq!(table.update_row(ids[1], row("/x/a.mov", "late")), SinkUpdate::Stale);
        assert_eq!(table.update_row(ids[2], row("/x/a.mov", "late")), SinkUpdate::Stale);
        assert_eq!(table.update_row(ids[3], row("/x/a.mov", "done")), SinkUpdate::Applied);
    }

    #[test]
    fn test_removed_row_drops_updates() {
        let table = InspectionTable::new();
        let id = InspectionId::new();
        table.add_placeholder(id, row("/x/a.mov", "loading..."));
        assert!(table.remove(id));
        assert_eq!(table.update_row(id, row("/x/a.mov", "x")), SinkUpdate::RowNotFound);
        assert!(table.is_empty());
    }
}
