use std::collections::HashMap;

use tokio::sync::Mutex;

/// Sizes of the tuples held by the space at a single point in time.
///
/// Taken while holding the space lock, so every field describes the same
/// state of the mapping.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct SpaceSnapshot {
    pub tuple_count: usize,
    pub total_key_bytes: usize,
    pub total_value_bytes: usize,
}

impl SpaceSnapshot {
    pub fn average_tuple_size(&self) -> f64 {
        self.average(self.total_key_bytes + self.total_value_bytes)
    }

    pub fn average_key_size(&self) -> f64 {
        self.average(self.total_key_bytes)
    }

    pub fn average_value_size(&self) -> f64 {
        self.average(self.total_value_bytes)
    }

    fn average(&self, total: usize) -> f64 {
        if self.tuple_count == 0 {
            return 0.0;
        }

        total as f64 / self.tuple_count as f64
    }
}

/// Result of [`TupleSpace::take_if`].
#[derive(Debug, PartialEq)]
pub enum TakeOutcome {
    Taken(String),
    Refused,
    Missing,
}

/// The shared tuple space.
///
/// A single lock covers the whole mapping: every operation is O(1) apart from
/// [`TupleSpace::snapshot`], and one lock keeps each operation linearizable
/// with respect to all the others.
#[derive(Debug, Default)]
pub struct TupleSpace {
    tuples: Mutex<HashMap<String, String>>,
}

impl TupleSpace {
    pub fn new() -> Self {
        TupleSpace {
            tuples: Mutex::new(HashMap::new()),
        }
    }

    /// Returns the value stored under `key` without removing it.
    pub async fn read(&self, key: &str) -> Option<String> {
        let tuples_guard = self.tuples.lock().await;
        tuples_guard.get(key).cloned()
    }

    /// Removes the tuple stored under `key` and returns its value.
    ///
    /// Removal and return happen under the same lock acquisition, so among
    /// concurrent takers of the same key exactly one observes the value.
    pub async fn take(&self, key: &str) -> Option<String> {
        let mut tuples_guard = self.tuples.lock().await;
        tuples_guard.remove(key)
    }

    /// Removes the tuple stored under `key` only if `accept` approves its value.
    ///
    /// The check and the removal happen under one lock acquisition. A refused
    /// tuple stays in the space untouched.
    pub async fn take_if<F>(&self, key: &str, accept: F) -> TakeOutcome
    where
        F: FnOnce(&str) -> bool,
    {
        let mut tuples_guard = self.tuples.lock().await;

        let Some(value) = tuples_guard.get(key) else {
            return TakeOutcome::Missing;
        };

        if !accept(value) {
            return TakeOutcome::Refused;
        }

        match tuples_guard.remove(key) {
            Some(value) => TakeOutcome::Taken(value),
            None => TakeOutcome::Missing,
        }
    }

    /// Inserts `(key, value)` only if `key` is absent.
    ///
    /// Returns `false` and leaves the existing tuple untouched when the key is
    /// already present.
    pub async fn insert(&self, key: &str, value: &str) -> bool {
        let mut tuples_guard = self.tuples.lock().await;

        if tuples_guard.contains_key(key) {
            return false;
        }

        tuples_guard.insert(key.to_string(), value.to_string());
        true
    }

    pub async fn snapshot(&self) -> SpaceSnapshot {
        let tuples_guard = self.tuples.lock().await;

        tuples_guard
            .iter()
            .fold(SpaceSnapshot::default(), |mut snapshot, (key, value)| {
                snapshot.tuple_count += 1;
                snapshot.total_key_bytes += key.len();
                snapshot.total_value_bytes += value.len();
                snapshot
            })
    }

    pub async fn len(&self) -> usize {
        self.tuples.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.tuples.lock().await.is_empty()
    }
}
