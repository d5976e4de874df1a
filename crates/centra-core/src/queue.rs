//! Adaptable min-priority queue with stable entry handles.
//!
//! # Overview
//!
//! [`AdaptablePriorityQueue`] is a min-queue over `(key, value)` pairs that
//! supports changing the key of an entry already in the queue. Insertion
//! returns an [`EntryHandle`]; the handle, not the value, identifies the
//! entry for later [`replace_key`](AdaptablePriorityQueue::replace_key) and
//! [`remove`](AdaptablePriorityQueue::remove) calls.
//!
//! # Layout
//!
//! ```text
//! slots:   [ s0 | s1 | s2 | s3 | s4 ]        arena, indexed by EntryHandle
//! buckets: BTreeMap<K, Bucket>                one bucket per distinct key
//!            0   -> s0
//!            inf -> s1 <-> s2 <-> s4          FIFO list threaded through slots
//! ```
//!
//! Entries sharing a key live in one bucket, a doubly linked list threaded
//! through the arena, so unlinking an entry is O(1) regardless of bucket
//! size. The ordered map over distinct keys means the minimum is always the
//! first map key: when the minimum bucket empties it is dropped from the
//! map and the next key takes its place, with no cached minimum to go stale.
//!
//! | Operation     | Cost         |
//! |---------------|--------------|
//! | `insert`      | O(log U)     |
//! | `remove_min`  | O(log U)     |
//! | `replace_key` | O(log U)     |
//! | `remove`      | O(log U)     |
//! | `peek_min`    | O(log U)     |
//!
//! `U` is the number of distinct keys currently present, not the number of
//! entries.
//!
//! Slots are never reused. A handle whose entry was removed stays stale for
//! the lifetime of the queue.

use std::collections::BTreeMap;
use std::collections::btree_map::Entry;
use std::fmt;

use crate::error::QueueError;

// ---------------------------------------------------------------------------
// Handles
// ---------------------------------------------------------------------------

/// Opaque identity of an entry inserted into an [`AdaptablePriorityQueue`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntryHandle(usize);

impl fmt::Display for EntryHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Internal storage
// ---------------------------------------------------------------------------

#[derive(Debug)]
struct Slot<K, V> {
    key: K,
    /// `None` once the entry has left the queue.
    value: Option<V>,
    prev: Option<usize>,
    next: Option<usize>,
}

#[derive(Debug, Clone, Copy)]
struct Bucket {
    head: usize,
    tail: usize,
}

// ---------------------------------------------------------------------------
// AdaptablePriorityQueue
// ---------------------------------------------------------------------------

/// Min-priority queue with in-place key replacement.
///
/// Among entries with equal keys, removal order is FIFO by the time the
/// entry joined that key's bucket (insertion or last `replace_key`).
#[derive(Debug)]
pub struct AdaptablePriorityQueue<K, V> {
    slots: Vec<Slot<K, V>>,
    buckets: BTreeMap<K, Bucket>,
    len: usize,
}

impl<K: Ord + Clone, V> Default for AdaptablePriorityQueue<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Ord + Clone, V> AdaptablePriorityQueue<K, V> {
    /// Create an empty queue.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            slots: Vec::new(),
            buckets: BTreeMap::new(),
            len: 0,
        }
    }

    /// Create an empty queue with room for `capacity` insertions.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            buckets: BTreeMap::new(),
            len: 0,
        }
    }

    /// Number of entries currently in the queue.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.len
    }

    /// `true` when no entries remain.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of distinct keys currently present.
    #[must_use]
    pub fn distinct_keys(&self) -> usize {
        self.buckets.len()
    }

    /// Add an entry and return its handle.
    pub fn insert(&mut self, key: K, value: V) -> EntryHandle {
        let index = self.slots.len();
        self.slots.push(Slot {
            key: key.clone(),
            value: Some(value),
            prev: None,
            next: None,
        });
        self.link(index, key);
        self.len += 1;
        EntryHandle(index)
    }

    /// The entry `remove_min` would return next, without removing it.
    #[must_use]
    pub fn peek_min(&self) -> Option<(&K, &V)> {
        let (key, bucket) = self.buckets.first_key_value()?;
        let value = self.slots[bucket.head].value.as_ref()?;
        Some((key, value))
    }

    /// Remove and return an entry with the smallest key.
    ///
    /// # Errors
    ///
    /// Returns [`QueueError::Empty`] if the queue has no entries.
    pub fn remove_min(&mut self) -> Result<(K, V), QueueError> {
        let head = self
            .buckets
            .first_key_value()
            .map(|(_, bucket)| bucket.head)
            .ok_or(QueueError::Empty)?;
        self.take(head)
    }

    /// Change the key of a present entry and return its previous key.
    ///
    /// The entry moves to the back of `new_key`'s bucket even when the key
    /// is unchanged. Both decreasing and increasing the key are supported.
    ///
    /// # Errors
    ///
    /// Returns [`QueueError::StaleHandle`] if the entry has already been
    /// removed or the handle is out of range for this queue.
    pub fn replace_key(&mut self, handle: EntryHandle, new_key: K) -> Result<K, QueueError> {
        let index = self.live_index(handle)?;
        self.unlink(index);
        let old_key = std::mem::replace(&mut self.slots[index].key, new_key.clone());
        self.link(index, new_key);
        Ok(old_key)
    }

    /// Remove an arbitrary present entry.
    ///
    /// # Errors
    ///
    /// Returns [`QueueError::StaleHandle`] if the entry has already been
    /// removed or the handle is out of range for this queue.
    pub fn remove(&mut self, handle: EntryHandle) -> Result<(K, V), QueueError> {
        let index = self.live_index(handle)?;
        self.take(index)
    }

    /// Current key of a present entry.
    #[must_use]
    pub fn key(&self, handle: EntryHandle) -> Option<&K> {
        self.slots
            .get(handle.0)
            .filter(|slot| slot.value.is_some())
            .map(|slot| &slot.key)
    }

    /// Value of a present entry.
    #[must_use]
    pub fn value(&self, handle: EntryHandle) -> Option<&V> {
        self.slots.get(handle.0)?.value.as_ref()
    }

    /// `true` if the handle's entry is still in the queue.
    #[must_use]
    pub fn contains(&self, handle: EntryHandle) -> bool {
        self.value(handle).is_some()
    }

    fn live_index(&self, handle: EntryHandle) -> Result<usize, QueueError> {
        if self.contains(handle) {
            Ok(handle.0)
        } else {
            Err(QueueError::StaleHandle(handle))
        }
    }

    /// Unlink a live slot and move its value out.
    fn take(&mut self, index: usize) -> Result<(K, V), QueueError> {
        let value = self.slots[index]
            .value
            .take()
            .ok_or(QueueError::StaleHandle(EntryHandle(index)))?;
        self.unlink(index);
        self.len -= 1;
        Ok((self.slots[index].key.clone(), value))
    }

    /// Append a detached slot to the tail of `key`'s bucket.
    fn link(&mut self, index: usize, key: K) {
        match self.buckets.entry(key) {
            Entry::Vacant(vacant) => {
                vacant.insert(Bucket {
                    head: index,
                    tail: index,
                });
                self.slots[index].prev = None;
            }
            Entry::Occupied(mut occupied) => {
                let tail = occupied.get().tail;
                self.slots[tail].next = Some(index);
                self.slots[index].prev = Some(tail);
                occupied.get_mut().tail = index;
            }
        }
        self.slots[index].next = None;
    }

    /// Detach a slot from its bucket, dropping the bucket if it empties.
    fn unlink(&mut self, index: usize) {
        let prev = self.slots[index].prev;
        let next = self.slots[index].next;

        if let Some(p) = prev {
            self.slots[p].next = next;
        }
        if let Some(n) = next {
            self.slots[n].prev = prev;
        }

        let key = &self.slots[index].key;
        match (prev, next) {
            (None, None) => {
                self.buckets.remove(key);
            }
            (None, Some(n)) => {
                if let Some(bucket) = self.buckets.get_mut(key) {
                    bucket.head = n;
                }
            }
            (Some(p), None) => {
                if let Some(bucket) = self.buckets.get_mut(key) {
                    bucket.tail = p;
                }
            }
            (Some(_), Some(_)) => {}
        }

        self.slots[index].prev = None;
        self.slots[index].next = None;
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
