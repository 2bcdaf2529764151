use super::snapshot::{HistorySeries, Metric};

/// 600 samples, roughly ten minutes at the default 1 Hz cadence
pub const DEFAULT_HISTORY_CAPACITY: usize = 600;

/// Fixed-length ring of samples with a head index.
///
/// The ring is pre-filled at construction, so its length always equals its
/// capacity. Pushing overwrites the oldest slot in O(1).
#[derive(Debug, Clone)]
pub struct RingSeries {
    values: Box<[f32]>,
    /// Index of the oldest sample
    head: usize,
}

impl RingSeries {
    pub fn new(capacity: usize, fill: f32) -> Self {
        Self {
            values: vec![fill; capacity.max(1)].into_boxed_slice(),
            head: 0,
        }
    }

    pub fn push(&mut self, value: f32) {
        self.values[self.head] = value;
        self.head = (self.head + 1) % self.values.len();
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Most recently pushed sample
    pub fn latest(&self) -> f32 {
        let len = self.values.len();
        self.values[(self.head + len - 1) % len]
    }

    /// Iterates oldest to newest
    pub fn iter(&self) -> impl Iterator<Item = f32> + '_ {
        let (newer, older) = self.values.split_at(self.head);
        older.iter().chain(newer.iter()).copied()
    }

    pub fn to_vec(&self) -> Vec<f32> {
        self.iter().collect()
    }
}

/// Rolling CPU and RAM history for charting
#[derive(Debug, Clone)]
pub struct MetricsHistory {
    capacity: usize,
    cpu: RingSeries,
    ram: RingSeries,
}

impl MetricsHistory {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_HISTORY_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            cpu: RingSeries::new(capacity, 0.0),
            ram: RingSeries::new(capacity, 0.0),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn append(&mut self, metric: Metric, value: f32) {
        self.series_mut(metric).push(value);
    }

    pub fn series(&self, metric: Metric) -> &RingSeries {
        match metric {
            Metric::Cpu => &self.cpu,
            Metric::Ram => &self.ram,
        }
    }

    /// Owned, ordered copy of one metric's window
    pub fn snapshot_series(&self, metric: Metric) -> Vec<f32> {
        self.series(metric).to_vec()
    }

    pub fn to_series(&self) -> HistorySeries {
        HistorySeries {
            cpu: self.snapshot_series(Metric::Cpu),
            ram: self.snapshot_series(Metric::Ram),
        }
    }

    fn series_mut(&mut self, metric: Metric) -> &mut RingSeries {
        match metric {
            Metric::Cpu => &mut self.cpu,
            Metric::Ram => &mut self.ram,
        }
    }
}

impl Default for MetricsHistory {
    fn default() -> Self {
        Self::new()
    }
}
