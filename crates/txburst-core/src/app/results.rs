//! ResultSet - run のタスクと観測側が共有する index ごとの結果スロット
//!
//! # 設計
//! - One slot per task index, each behind its own mutex. Tasks only ever
//!   touch their own slot, so writers never contend with each other.
//! - The slot array is swapped out wholesale on `prepare`/`clear`. The outer
//!   `RwLock` is only held long enough to clone the `Arc`.
//! - `snapshot` copies every filled slot in index order. It never hands out a
//!   reference into a slot.
//! - `prepare` returns the new run's `RunSlots`. Tasks write through that
//!   handle, so a late write can only land in the run it belongs to.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock};

use tracing::warn;

use crate::domain::{RunError, TaskRecord};

type Slots = Arc<[Mutex<Option<TaskRecord>>]>;

/// Index-keyed, concurrently writable view of one run's task records.
///
/// Cloning is cheap and every clone sees the same slots.
#[derive(Clone)]
pub struct ResultSet {
    slots: Arc<RwLock<Slots>>,
}

impl ResultSet {
    /// An empty set with no slots.
    pub fn new() -> Self {
        Self {
            slots: Arc::new(RwLock::new(empty_slots(0))),
        }
    }

    /// A set with `capacity` empty slots, indices `0..capacity`.
    pub fn with_capacity(capacity: usize) -> Self {
        let set = Self::new();
        set.prepare(capacity);
        set
    }

    /// Drop every record and size the set for a run of `capacity` tasks.
    ///
    /// Returns the slots of that run.
    pub fn prepare(&self, capacity: usize) -> RunSlots {
        let fresh = empty_slots(capacity);
        let mut slots = self.slots.write().unwrap_or_else(PoisonError::into_inner);
        *slots = Arc::clone(&fresh);
        RunSlots { slots: fresh }
    }

    /// Drop every record and every slot.
    pub fn clear(&self) {
        self.prepare(0);
    }

    /// Number of slots (the size of the current run).
    pub fn capacity(&self) -> usize {
        self.current().len()
    }

    /// Number of records published so far.
    pub fn len(&self) -> usize {
        self.current()
            .iter()
            .filter(|slot| lock(slot).is_some())
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Upsert `record` into its slot of the current run. See `RunSlots::publish`.
    pub fn publish(&self, record: TaskRecord) -> Result<(), RunError> {
        self.pinned().publish(record)
    }

    /// Copy of the record at `index`, if one was published.
    pub fn get(&self, index: usize) -> Option<TaskRecord> {
        self.pinned().get(index)
    }

    /// Point-in-time copy of every known record, ascending by index.
    pub fn snapshot(&self) -> Vec<TaskRecord> {
        self.current()
            .iter()
            .filter_map(|slot| lock(slot).clone())
            .collect()
    }

    fn current(&self) -> Slots {
        let slots = self.slots.read().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(&slots)
    }

    fn pinned(&self) -> RunSlots {
        RunSlots {
            slots: self.current(),
        }
    }
}

/// The slots of one run.
///
/// Keeps pointing at that run's slots after the set was prepared for another
/// run or cleared; writes through a stale handle are invisible to the set.
#[derive(Clone)]
pub struct RunSlots {
    slots: Slots,
}

impl RunSlots {
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Upsert `record` into its slot.
    ///
    /// - empty slot: the record is stored as is
    /// - in-flight record: the update is merged, `started_at` is kept
    /// - terminal record: the update is dropped
    pub fn publish(&self, record: TaskRecord) -> Result<(), RunError> {
        let index = record.index;
        let slot = self.slots.get(index).ok_or(RunError::IndexOutOfRange {
            index,
            capacity: self.slots.len(),
        })?;

        let mut guard = lock(slot);
        match &mut *guard {
            empty @ None => *empty = Some(record),
            Some(existing) => {
                if !existing.merge(record) {
                    warn!(index, "dropped write to a finished task record");
                }
            }
        }
        Ok(())
    }

    pub fn get(&self, index: usize) -> Option<TaskRecord> {
        let slot = self.slots.get(index)?;
        lock(slot).clone()
    }
}

impl Default for ResultSet {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ResultSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResultSet")
            .field("capacity", &self.capacity())
            .field("len", &self.len())
            .finish()
    }
}

fn empty_slots(capacity: usize) -> Slots {
    (0..capacity).map(|_| Mutex::new(None)).collect()
}

// Slot contents are replaced in a single assignment, so a poisoned slot still
// holds a whole record.
fn lock(slot: &Mutex<Option<TaskRecord>>) -> MutexGuard<'_, Option<TaskRecord>> {
    slot.lock().unwrap_or_else(PoisonError::into_inner)
}
