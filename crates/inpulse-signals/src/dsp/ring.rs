//! Fixed-capacity sample ring
//!
//! Position-indexed circular buffer for luminance samples. Storage is
//! allocated once; pushing past capacity overwrites the oldest slot.

use ndarray::Array1;

/// Bounded FIFO of `f32` samples.
#[derive(Debug, Clone)]
pub struct SampleRing {
    slots: Vec<f32>,
    /// Index of the oldest retained sample
    head: usize,
    len: usize,
}

impl SampleRing {
    /// Create an empty ring. A capacity of zero is raised to one.
    pub fn new(capacity: usize) -> Self {
        Self {
            slots: vec![0.0; capacity.max(1)],
            head: 0,
            len: 0,
        }
    }

    /// Append a sample, evicting the oldest one when full.
    ///
    /// Returns the evicted sample, if any.
    pub fn push(&mut self, sample: f32) -> Option<f32> {
        let cap = self.slots.len();
        if self.len < cap {
            let tail = (self.head + self.len) % cap;
            self.slots[tail] = sample;
            self.len += 1;
            None
        } else {
            let evicted = self.slots[self.head];
            self.slots[self.head] = sample;
            self.head = (self.head + 1) % cap;
            Some(evicted)
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn is_full(&self) -> bool {
        self.len == self.slots.len()
    }

    /// Sample at logical position `idx` (0 = oldest).
    pub fn get(&self, idx: usize) -> Option<f32> {
        if idx >= self.len {
            return None;
        }
        Some(self.slots[(self.head + idx) % self.slots.len()])
    }

    /// Iterate from oldest to newest.
    pub fn iter(&self) -> impl Iterator<Item = f32> + '_ {
        (0..self.len).map(move |i| self.slots[(self.head + i) % self.slots.len()])
    }

    /// Copy the retained samples, oldest first, into a contiguous array.
    pub fn snapshot(&self) -> Array1<f32> {
        self.iter().collect()
    }

    pub fn to_vec(&self) -> Vec<f32> {
        self.iter().collect()
    }

    pub fn clear(&mut self) {
        self.head = 0;
        self.len = 0;
    }
}
