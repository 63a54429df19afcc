use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::{DateTime, Utc};

use crate::errors::ServiceError;

/// A row kept by [`MemoryStore`]: identified by an integer id and carrying a
/// soft-delete flag.
pub trait Record: Clone + Send + Sync {
    fn id(&self) -> i32;
    fn is_active(&self) -> bool;
    /// Flip the row to inactive and stamp `updated_at`.
    fn deactivate(&mut self, now: DateTime<Utc>);
}

struct State<R> {
    rows: Vec<R>,
    next_id: i32,
}

/// In-memory, insertion-ordered store with sequential ids and soft delete.
///
/// Rows and the id counter live behind one `RwLock`, so an id is assigned
/// and its row appended under the same write guard. Reads only ever see
/// active rows; the only lookup that ignores the flag is [`Self::deactivate`].
pub struct MemoryStore<R> {
    inner: RwLock<State<R>>,
}

impl<R: Record> Default for MemoryStore<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Record> MemoryStore<R> {
    pub fn new() -> Self {
        Self { inner: RwLock::new(State { rows: Vec::new(), next_id: 1 }) }
    }

    // A panic while holding the guard cannot leave a row half-written, so a
    // poisoned lock is still safe to use.
    fn read(&self) -> RwLockReadGuard<'_, State<R>> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, State<R>> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Id the next inserted row will receive.
    pub fn peek_next_id(&self) -> i32 {
        self.read().next_id
    }

    /// Active rows in insertion order.
    pub fn list_active(&self) -> Vec<R> {
        self.filter_active(|_| true)
    }

    pub fn filter_active<F>(&self, pred: F) -> Vec<R>
    where
        F: Fn(&R) -> bool,
    {
        self.read().rows.iter().filter(|r| r.is_active() && pred(r)).cloned().collect()
    }

    pub fn find_active<F>(&self, pred: F) -> Option<R>
    where
        F: Fn(&R) -> bool,
    {
        self.read().rows.iter().find(|r| r.is_active() && pred(r)).cloned()
    }

    pub fn get_active(&self, id: i32) -> Option<R> {
        self.find_active(|r| r.id() == id)
    }

    /// Append a row built from the next id.
    ///
    /// `guard` sees the current rows under the write lock and can veto the
    /// insert; in that case no id is consumed.
    pub fn insert_if<G, B>(&self, guard: G, build: B) -> Result<R, ServiceError>
    where
        G: FnOnce(&[R]) -> Result<(), ServiceError>,
        B: FnOnce(i32) -> R,
    {
        let mut state = self.write();
        guard(&state.rows)?;
        let id = state.next_id;
        state.next_id = id
            .checked_add(1)
            .ok_or_else(|| ServiceError::Internal("id sequence exhausted".into()))?;
        let row = build(id);
        state.rows.push(row.clone());
        Ok(row)
    }

    pub fn insert<B>(&self, build: B) -> Result<R, ServiceError>
    where
        B: FnOnce(i32) -> R,
    {
        self.insert_if(|_| Ok(()), build)
    }

    /// Mutate the active row with `id` in place.
    ///
    /// `guard` runs first, under the same write lock. Returns `Ok(None)` when
    /// no active row has that id.
    pub fn update_active_if<G, F>(&self, id: i32, guard: G, apply: F) -> Result<Option<R>, ServiceError>
    where
        G: FnOnce(&[R]) -> Result<(), ServiceError>,
        F: FnOnce(&mut R),
    {
        let mut state = self.write();
        guard(&state.rows)?;
        match state.rows.iter_mut().find(|r| r.id() == id && r.is_active()) {
            Some(row) => {
                apply(row);
                Ok(Some(row.clone()))
            }
            None => Ok(None),
        }
    }

    /// Soft delete. The row is looked up regardless of its flag; returns
    /// false when it does not exist or is already inactive.
    pub fn deactivate(&self, id: i32, now: DateTime<Utc>) -> bool {
        let mut state = self.write();
        match state.rows.iter_mut().find(|r| r.id() == id) {
            Some(row) if row.is_active() => {
                row.deactivate(now);
                true
            }
            _ => false,
        }
    }

    /// Total rows including inactive ones.
    pub fn len(&self) -> usize {
        self.read().rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
