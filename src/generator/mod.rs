//! # Partition Generation
//!
//! Exhaustive enumeration of the zero-padded partitions of `n` into at most
//! `m` parts, plus a seeded random sampler.
//!
//! The exhaustive search is split by first summand: every value of the
//! largest part from `n` down to `ceil(n / m)` is an independent
//! backtracking search run as its own rayon task. Output size is
//! combinatorial in `n` and `m`; callers must bound both.

pub mod filter;

use parking_lot::Mutex;
use rand::Rng;
use rayon::prelude::*;

use crate::model::Partition;

pub use filter::{BlottoFilter, PartitionFilter};

/// Stateless entry point for partition generation.
pub struct PartitionGenerator;

impl PartitionGenerator {
    /// Every non-increasing, non-negative `m`-length sequence summing to `n`
    /// that passes `filter`, in descending lexicographic order.
    ///
    /// `m == 0` or `n < m` yields an empty list.
    pub fn build(n: u32, m: usize, filter: Option<&dyn PartitionFilter>) -> Vec<Partition> {
        if m == 0 || (n as usize) < m {
            tracing::debug!(n, m, "infeasible partition request");
            return Vec::new();
        }

        let min_first = n.div_ceil(m as u32);
        let results: Mutex<Vec<Partition>> = Mutex::new(Vec::new());

        (min_first..=n).into_par_iter().for_each(|first| {
            let mut current = vec![0u32; m];
            current[0] = first;
            let mut found = Vec::new();
            extend(n, &mut current, first, 1, filter, &mut found);
            results.lock().extend(found);
        });

        let mut partitions = results.into_inner();
        partitions.sort_unstable_by(|a, b| b.cmp(a));
        tracing::debug!(n, m, count = partitions.len(), "partitions generated");
        partitions
    }

    /// `count` random compositions of `n` into `m` parts: `m - 1` uniform cut
    /// points in `[0, n)` are sorted and their gaps become the summands.
    /// Duplicates are possible.
    pub fn build_random<R: Rng>(n: u32, m: usize, count: usize, rng: &mut R) -> Vec<Partition> {
        if m == 0 {
            return Vec::new();
        }
        (0..count)
            .map(|_| {
                let mut cuts: Vec<u32> = (1..m)
                    .map(|_| if n == 0 { 0 } else { rng.gen_range(0..n) })
                    .collect();
                cuts.sort_unstable();
                cuts.insert(0, 0);
                cuts.push(n);
                Partition::new(cuts.windows(2).map(|w| w[1] - w[0]))
            })
            .collect()
    }
}

/// Fill `current[position..]` with values no larger than the previous one,
/// emitting whenever the running sum reaches `n` (remaining slots stay zero).
fn extend(
    n: u32,
    current: &mut [u32],
    sum: u32,
    position: usize,
    filter: Option<&dyn PartitionFilter>,
    found: &mut Vec<Partition>,
) {
    if sum == n {
        let partition = Partition::unsorted(current.iter().copied());
        if filter.is_none_or(|f| f.accept(&partition)) {
            found.push(partition);
        }
        return;
    }
    if position >= current.len() {
        return;
    }

    let max = current[position - 1].min(n - sum);
    for value in 1..=max {
        current[position] = value;
        extend(n, current, sum + value, position + 1, filter, found);
    }
    current[position] = 0;
}
