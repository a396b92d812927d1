//! Single-slot, last-write-wins buffer.

use std::sync::Arc;

use parking_lot::Mutex;

/// A value read from a [`LatestSlot`], tagged with its publish sequence.
///
/// Sequence numbers start at 1 and increase by one on every publish, so two
/// snapshots with the same `seq` hold the same value.
#[derive(Debug)]
pub struct Snapshot<T> {
    pub seq: u64,
    pub value: Arc<T>,
}

impl<T> Clone for Snapshot<T> {
    fn clone(&self) -> Self {
        Self {
            seq: self.seq,
            value: Arc::clone(&self.value),
        }
    }
}

#[derive(Debug)]
struct SlotInner<T> {
    seq: u64,
    value: Option<Arc<T>>,
}

/// Holds only the most recently published value.
///
/// Publishing overwrites whatever was there; nothing is queued. The lock
/// guards only an `Arc` swap or clone, so readers working on a snapshot
/// never hold up writers.
#[derive(Debug)]
pub struct LatestSlot<T> {
    inner: Mutex<SlotInner<T>>,
}

impl<T> LatestSlot<T> {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(SlotInner {
                seq: 0,
                value: None,
            }),
        }
    }

    /// Replace the held value. Returns the new sequence number.
    pub fn publish(&self, value: T) -> u64 {
        let value = Arc::new(value);
        let mut inner = self.inner.lock();
        inner.seq += 1;
        inner.value = Some(value);
        inner.seq
    }

    /// Latest value, or `None` if nothing has been published yet.
    pub fn latest(&self) -> Option<Snapshot<T>> {
        let inner = self.inner.lock();
        inner.value.as_ref().map(|value| Snapshot {
            seq: inner.seq,
            value: Arc::clone(value),
        })
    }

    /// Number of values published so far.
    pub fn seq(&self) -> u64 {
        self.inner.lock().seq
    }
}

impl<T> Default for LatestSlot<T> {
    fn default() -> Self {
        Self::new()
    }
}
