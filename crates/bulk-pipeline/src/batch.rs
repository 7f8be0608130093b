//! Fixed-capacity record batches.

/// An ordered, append-only group of records inserted as one transaction.
///
/// `len() <= capacity()` always holds; the accumulator flushes a batch as
/// soon as it is full.
#[derive(Debug)]
pub struct Batch<R> {
    records: Vec<R>,
    capacity: usize,
}

impl<R> Batch<R> {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            records: Vec::with_capacity(capacity),
            capacity,
        }
    }

    /// Append a record, handing back the completed batch once it fills.
    ///
    /// The completed batch is replaced by an empty one of the same capacity,
    /// so a batch driven only through `add` is never full when a record
    /// arrives.
    pub fn add(&mut self, record: R) -> Option<Batch<R>> {
        self.records.push(record);
        self.is_full().then(|| self.take())
    }

    /// Take the current records, leaving an empty batch of the same capacity.
    pub fn take(&mut self) -> Batch<R> {
        let capacity = self.capacity;
        std::mem::replace(self, Batch::with_capacity(capacity))
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.records.len() >= self.capacity
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn records(&self) -> &[R] {
        &self.records
    }

    pub fn into_records(self) -> Vec<R> {
        self.records
    }
}

impl<R> From<Vec<R>> for Batch<R> {
    fn from(records: Vec<R>) -> Self {
        let capacity = records.len();
        Self { records, capacity }
    }
}
