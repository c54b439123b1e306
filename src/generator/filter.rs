//! Predicates applied to candidate partitions during generation.

use hashbrown::HashMap;
use serde::{Deserialize, Serialize};

use crate::model::Partition;

/// Keeps or drops a freshly generated partition. Evaluated concurrently
/// from generator worker threads, hence `Sync`.
pub trait PartitionFilter: Sync {
    fn accept(&self, partition: &Partition) -> bool;
}

impl<F> PartitionFilter for F
where
    F: Fn(&Partition) -> bool + Sync,
{
    fn accept(&self, partition: &Partition) -> bool {
        self(partition)
    }
}

/// Colonel-Blotto strategy filter.
///
/// A partition passes when no summand value occurs more than
/// `max_repetitions` times and its `resource_parts` largest summands add
/// up to something in `[min_resource, max_resource]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlottoFilter {
    pub max_repetitions: usize,
    pub min_resource: u64,
    pub max_resource: u64,
    pub resource_parts: usize,
}

impl BlottoFilter {
    pub fn new(max_repetitions: usize, min_resource: u64, max_resource: u64) -> Self {
        Self {
            max_repetitions,
            min_resource,
            max_resource,
            resource_parts: 5,
        }
    }

    pub fn with_resource_parts(mut self, parts: usize) -> Self {
        self.resource_parts = parts;
        self
    }

    fn check_resource(&self, partition: &Partition) -> bool {
        let resource = partition.resource(self.resource_parts);
        (self.min_resource..=self.max_resource).contains(&resource)
    }

    fn check_repetitions(&self, partition: &Partition) -> bool {
        let mut counts: HashMap<u32, usize> = HashMap::new();
        partition.summands().iter().all(|&s| {
            let count = counts.entry(s).or_insert(0);
            *count += 1;
            *count <= self.max_repetitions
        })
    }
}

impl PartitionFilter for BlottoFilter {
    fn accept(&self, partition: &Partition) -> bool {
        self.check_resource(partition) && self.check_repetitions(partition)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_closure_filter() {
        let even_only = |p: &Partition| p.oddness() == 0;
        assert!(even_only.accept(&Partition::new([4, 2])));
        assert!(!even_only.accept(&Partition::new([3, 3])));
    }

    #[test]
    fn test_blotto_repetitions() {
        let filter = BlottoFilter::new(2, 0, u64::MAX);
        assert!(filter.accept(&Partition::new([3, 3, 1, 1])));
        assert!(!filter.accept(&Partition::new([2, 2, 2, 1])));
    }

    #[test]
    fn test_blotto_resource() {
        let filter = BlottoFilter::new(10, 5, 6).with_resource_parts(2);
        assert!(filter.accept(&Partition::new([3, 2, 2])));
        assert!(filter.accept(&Partition::new([4, 2, 1])));
        assert!(!filter.accept(&Partition::new([6, 1, 0])));
        assert!(!filter.accept(&Partition::new([2, 2, 2, 2])));
    }
}
