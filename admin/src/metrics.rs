/// Number of status renders whose load time is averaged on the status page.
pub const LATENCY_WINDOW: usize = 100;

/// Fixed-capacity FIFO of samples with an exact arithmetic mean.
///
/// Slots are allocated once; when full, each push overwrites the oldest sample.
#[derive(Debug, Clone)]
pub struct RollingMetric {
    slots: Box<[f64]>,
    head: usize,
    len: usize,
}

impl RollingMetric {
    pub fn with_capacity(capacity: usize) -> Self {
        assert!(capacity > 0, "rolling metric capacity must be at least 1");
        Self {
            slots: vec![0.0; capacity].into_boxed_slice(),
            head: 0,
            len: 0,
        }
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn push(&mut self, sample: f64) {
        let capacity = self.capacity();
        if self.len < capacity {
            self.slots[(self.head + self.len) % capacity] = sample;
            self.len += 1;
        } else {
            // Full: the oldest slot is at head.
            self.slots[self.head] = sample;
            self.head = (self.head + 1) % capacity;
        }
    }

    /// Mean of the held samples, or `None` before the first push.
    pub fn average(&self) -> Option<f64> {
        if self.is_empty() {
            return None;
        }
        let sum: f64 = self.samples().sum();
        Some(sum / self.len as f64)
    }

    /// Held samples, oldest first.
    pub fn samples(&self) -> impl Iterator<Item = f64> + '_ {
        let capacity = self.capacity();
        (0..self.len).map(move |i| self.slots[(self.head + i) % capacity])
    }
}

impl Default for RollingMetric {
    fn default() -> Self {
        Self::with_capacity(LATENCY_WINDOW)
    }
}
