// In crates/core-types/src/history.rs

use crate::{Error, Periods};
use serde::{Deserialize, Serialize};
use std::num::NonZeroUsize;

/// A fixed-capacity ring buffer of the most recent prices.
///
/// The slots are allocated once at construction and never reallocated.
/// Once full, each push overwrites the oldest sample.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "HistorySnapshot", into = "HistorySnapshot")]
pub struct PriceHistory {
    slots: Box<[u64]>,
    /// Index of the oldest sample.
    head: usize,
    len: usize,
}

/// Chronological on-disk form of a `PriceHistory`.
#[derive(Serialize, Deserialize)]
struct HistorySnapshot {
    capacity: usize,
    prices: Vec<u64>,
}

impl From<PriceHistory> for HistorySnapshot {
    fn from(history: PriceHistory) -> Self {
        Self {
            capacity: history.capacity(),
            prices: history.to_vec(),
        }
    }
}

impl TryFrom<HistorySnapshot> for PriceHistory {
    type Error = Error;

    fn try_from(snapshot: HistorySnapshot) -> Result<Self, Self::Error> {
        // Checked before anything is allocated.
        if u64::try_from(snapshot.capacity).map_or(true, |c| c > Periods::MAX_LONG) {
            return Err(Error::InvalidSnapshot(format!(
                "price history capacity {} exceeds {}",
                snapshot.capacity,
                Periods::MAX_LONG
            )));
        }
        let capacity = NonZeroUsize::new(snapshot.capacity)
            .ok_or_else(|| Error::InvalidSnapshot("price history capacity is zero".to_string()))?;
        if snapshot.prices.len() > capacity.get() {
            return Err(Error::InvalidSnapshot(format!(
                "price history holds {} prices but capacity is {}",
                snapshot.prices.len(),
                capacity
            )));
        }
        let mut history = PriceHistory::new(capacity);
        for price in snapshot.prices {
            history.push(price);
        }
        Ok(history)
    }
}

// Two histories are equal when they hold the same prices in the same order,
// regardless of where the ring currently starts.
impl PartialEq for PriceHistory {
    fn eq(&self, other: &Self) -> bool {
        self.capacity() == other.capacity() && self.iter().eq(other.iter())
    }
}

impl Eq for PriceHistory {}

impl PriceHistory {
    pub fn new(capacity: NonZeroUsize) -> Self {
        Self {
            slots: vec![0; capacity.get()].into_boxed_slice(),
            head: 0,
            len: 0,
        }
    }

    /// Appends a price, returning the evicted oldest price if the buffer was full.
    pub fn push(&mut self, price: u64) -> Option<u64> {
        let capacity = self.slots.len();
        if self.len < capacity {
            self.slots[(self.head + self.len) % capacity] = price;
            self.len += 1;
            None
        } else {
            let evicted = std::mem::replace(&mut self.slots[self.head], price);
            self.head = (self.head + 1) % capacity;
            Some(evicted)
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn is_full(&self) -> bool {
        self.len == self.slots.len()
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Iterates oldest to newest.
    pub fn iter(&self) -> impl Iterator<Item = u64> + '_ {
        let capacity = self.slots.len();
        (0..self.len).map(move |i| self.slots[(self.head + i) % capacity])
    }

    /// The newest `count` prices, oldest first, or `None` if fewer are held.
    pub fn latest(&self, count: usize) -> Option<impl Iterator<Item = u64> + '_> {
        if count > self.len {
            return None;
        }
        Some(self.iter().skip(self.len - count))
    }

    /// Floor of the arithmetic mean of the newest `window` prices.
    ///
    /// Sums are accumulated in `u128`, so no sequence of `u64` prices can
    /// overflow. Returns `None` for an empty window or if fewer than
    /// `window` prices are held.
    pub fn mean_of_latest(&self, window: usize) -> Option<u64> {
        if window == 0 {
            return None;
        }
        let sum: u128 = self.latest(window)?.map(u128::from).sum();
        // The mean of u64 values always fits back into a u64.
        u64::try_from(sum / window as u128).ok()
    }

    pub fn to_vec(&self) -> Vec<u64> {
        self.iter().collect()
    }

    pub fn clear(&mut self) {
        self.head = 0;
        self.len = 0;
    }
}
