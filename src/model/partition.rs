//! Partition: a fixed-length, canonically non-increasing numeric composition.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use smallvec::SmallVec;

use crate::{Error, Result};

/// Returned by [`Partition::distance_to`] when the two partitions have
/// different lengths. Callers must guard before using a distance as a magnitude.
pub const UNDEFINED_DISTANCE: i64 = -1;

type Summands = SmallVec<[u32; 8]>;

/// A sequence of `m` non-negative summands adding up to `n`.
///
/// Summands are kept in non-increasing order unless the partition was built
/// with [`Partition::unsorted`], in which case positions are preserved as given.
/// The cached sum is updated on every positional write.
///
/// Summands are integral by design; real-valued or noise-perturbed vectors
/// are not representable.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Partition {
    summands: Summands,
    sum: u64,
}

impl Partition {
    /// Build a partition, sorting summands in descending order.
    pub fn new(summands: impl IntoIterator<Item = u32>) -> Self {
        let mut p = Self::unsorted(summands);
        p.normalize();
        p
    }

    /// Build a partition keeping the given positional order.
    pub fn unsorted(summands: impl IntoIterator<Item = u32>) -> Self {
        let summands: Summands = summands.into_iter().collect();
        let sum = summands.iter().map(|&s| s as u64).sum();
        Self { summands, sum }
    }

    /// Parse a literal such as `[1, 5, 3]` without re-sorting it.
    pub fn parse_unsorted(input: &str) -> Result<Self> {
        parse_summands(input).map(Self::unsorted)
    }

    /// Parse a comma-joined list of literals: `[3, 1],[2, 2]`.
    pub fn parse_list(input: &str, sort: bool) -> Result<Vec<Self>> {
        let compact: String = input.chars().filter(|c| !c.is_whitespace()).collect();
        if compact.is_empty() {
            return Ok(Vec::new());
        }
        compact
            .split("],[")
            .filter(|chunk| !chunk.is_empty())
            .map(|chunk| {
                let summands = parse_summands(chunk)?;
                Ok(if sort { Self::new(summands) } else { Self::unsorted(summands) })
            })
            .collect()
    }

    /// Number of summands (`m`).
    pub fn len(&self) -> usize {
        self.summands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.summands.is_empty()
    }

    /// Sum of all summands (`n`).
    pub fn sum(&self) -> u64 {
        self.sum
    }

    pub fn summands(&self) -> &[u32] {
        &self.summands
    }

    /// Summand at a 1-based position.
    pub fn get(&self, position: usize) -> Option<u32> {
        position.checked_sub(1).and_then(|i| self.summands.get(i).copied())
    }

    /// Overwrite the summand at a 1-based position, returning the previous value.
    ///
    /// Does not re-sort; call [`normalize`](Self::normalize) afterwards if the
    /// canonical order matters.
    pub fn set(&mut self, position: usize, value: u32) -> Option<u32> {
        let slot = position.checked_sub(1).and_then(|i| self.summands.get_mut(i))?;
        let previous = std::mem::replace(slot, value);
        self.sum = self.sum - previous as u64 + value as u64;
        Some(previous)
    }

    /// Chebyshev distance over aligned positions, or [`UNDEFINED_DISTANCE`]
    /// when the lengths differ.
    pub fn distance_to(&self, other: &Partition) -> i64 {
        if self.len() != other.len() {
            return UNDEFINED_DISTANCE;
        }
        self.summands
            .iter()
            .zip(other.summands.iter())
            .map(|(&a, &b)| a.abs_diff(b) as i64)
            .max()
            .unwrap_or(0)
    }

    /// Same length and same sum.
    pub fn is_same_type(&self, other: &Partition) -> bool {
        self.len() == other.len() && self.sum == other.sum
    }

    /// Number of even summands (zeros included).
    pub fn evenness(&self) -> usize {
        self.summands.iter().filter(|&&s| s % 2 == 0).count()
    }

    /// Number of odd summands.
    pub fn oddness(&self) -> usize {
        self.summands.iter().filter(|&&s| s % 2 == 1).count()
    }

    /// Durfee rank: side of the largest square fitting in the Young diagram.
    pub fn rank(&self) -> usize {
        let mut sorted = self.summands.clone();
        sorted.sort_unstable_by(|a, b| b.cmp(a));
        sorted
            .iter()
            .enumerate()
            .take_while(|&(i, &s)| s as usize >= i + 1)
            .count()
    }

    /// Sum of the `k` largest summands.
    pub fn resource(&self, k: usize) -> u64 {
        let mut sorted = self.summands.clone();
        sorted.sort_unstable_by(|a, b| b.cmp(a));
        sorted.iter().take(k).map(|&s| s as u64).sum()
    }

    /// Colonel-Blotto duel: positions won minus positions lost decides the
    /// outcome. Partitions of different length are compared over the shorter prefix.
    pub fn duel(&self, other: &Partition) -> Ordering {
        let score: i64 = self
            .summands
            .iter()
            .zip(other.summands.iter())
            .map(|(a, b)| match a.cmp(b) {
                Ordering::Greater => 1,
                Ordering::Less => -1,
                Ordering::Equal => 0,
            })
            .sum();
        score.cmp(&0)
    }

    /// Re-sort descending in place.
    pub fn normalize(&mut self) -> &mut Self {
        self.summands.sort_unstable_by(|a, b| b.cmp(a));
        self
    }

    /// Sorted copy, leaving `self` untouched.
    pub fn normalized(&self) -> Self {
        let mut copy = self.clone();
        copy.normalize();
        copy
    }
}

impl Ord for Partition {
    fn cmp(&self, other: &Self) -> Ordering {
        self.summands.cmp(&other.summands)
    }
}

impl PartialOrd for Partition {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Partition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, s) in self.summands.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{s}")?;
        }
        write!(f, "]")
    }
}

impl FromStr for Partition {
    type Err = Error;

    /// Parses `[d1, d2, ..., dk]` (brackets optional) and sorts descending.
    fn from_str(s: &str) -> Result<Self> {
        parse_summands(s).map(Self::new)
    }
}

impl From<Vec<u32>> for Partition {
    fn from(summands: Vec<u32>) -> Self {
        Self::new(summands)
    }
}

// Serialized as the bare summand list; the sum is recomputed on the way in.
impl Serialize for Partition {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.summands.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Partition {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let summands = Summands::deserialize(deserializer)?;
        Ok(Self::unsorted(summands))
    }
}

fn parse_summands(input: &str) -> Result<Vec<u32>> {
    let trimmed = input.trim();
    let inner = trimmed.strip_prefix('[').unwrap_or(trimmed);
    let inner = inner.strip_suffix(']').unwrap_or(inner);
    if inner.trim().is_empty() {
        return Err(Error::Parse {
            input: input.to_string(),
            message: "partition literal has no summands".into(),
        });
    }
    inner
        .split(',')
        .map(|part| {
            part.trim().parse::<u32>().map_err(|e| Error::Parse {
                input: input.to_string(),
                message: format!("bad summand {:?}: {e}", part.trim()),
            })
        })
        .collect()
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_rank() {
        let p: Partition = "[15, 15, 15, 13, 12, 11, 8, 5, 4, 4]".parse().unwrap();
        assert_eq!(p.rank(), 7);

        let p: Partition = "[10, 10, 10, 10, 10, 10, 10, 10, 10, 10]".parse().unwrap();
        assert_eq!(p.rank(), 10);

        let p: Partition = "[100, 0, 0, 0, 0, 0, 0, 0, 0, 0]".parse().unwrap();
        assert_eq!(p.rank(), 1);

        assert_eq!(Partition::new([1, 1, 1]).rank(), 1);
        assert_eq!(Partition::new([0, 0]).rank(), 0);
    }

    #[test]
    fn test_sort_on_parse() {
        let p: Partition = "[1, 5, 3]".parse().unwrap();
        assert_eq!(p.to_string(), "[5, 3, 1]");

        let p = Partition::parse_unsorted("[1, 5, 3]").unwrap();
        assert_eq!(p.to_string(), "[1, 5, 3]");
    }

    #[test]
    fn test_parse_errors() {
        assert!("[]".parse::<Partition>().is_err());
        assert!("[1, x]".parse::<Partition>().is_err());
        assert!("[1, -2]".parse::<Partition>().is_err());
        // summands are integral only
        assert!("[2.5, 1]".parse::<Partition>().is_err());
        assert!(serde_json::from_str::<Partition>("[2.5, 1.0]").is_err());
        assert_eq!("2,2".parse::<Partition>().unwrap().summands(), &[2, 2]);
    }

    #[test]
    fn test_parse_list() {
        let list = Partition::parse_list("[3, 1], [2, 2],[1,3]", true).unwrap();
        assert_eq!(list.len(), 3);
        assert_eq!(list[2].summands(), &[3, 1]);

        let list = Partition::parse_list("[1,3]", false).unwrap();
        assert_eq!(list[0].summands(), &[1, 3]);

        assert!(Partition::parse_list("  ", true).unwrap().is_empty());
    }

    #[test]
    fn test_distance_chebyshev() {
        let a = Partition::new([3, 3, 2, 2]);
        let b = Partition::new([5, 1, 2, 2]);
        assert_eq!(a.distance_to(&b), 2);
        assert_eq!(a.distance_to(&a), 0);
    }

    #[test]
    fn test_distance_undefined_for_different_lengths() {
        let a = Partition::new([2, 2]);
        let b = Partition::new([2, 1, 1]);
        assert_eq!(a.distance_to(&b), UNDEFINED_DISTANCE);
        assert!(!a.is_same_type(&b));
    }

    #[test]
    fn test_set_keeps_sum_consistent() {
        let mut p = Partition::new([4, 2, 1]);
        assert_eq!(p.sum(), 7);
        assert_eq!(p.set(2, 5), Some(2));
        assert_eq!(p.sum(), 10);
        assert_eq!(p.get(2), Some(5));
        assert_eq!(p.set(0, 1), None);
        assert_eq!(p.set(4, 1), None);
        assert_eq!(p.sum(), 10);
        assert_eq!(p.get(0), None);
    }

    #[test]
    fn test_parity() {
        let p = Partition::new([4, 3, 2, 1, 0]);
        assert_eq!(p.evenness(), 3);
        assert_eq!(p.oddness(), 2);
    }

    #[test]
    fn test_resource_and_duel() {
        let a = Partition::new([5, 3, 2]);
        let b = Partition::unsorted([4, 4, 2]);
        assert_eq!(a.resource(2), 8);
        assert_eq!(a.resource(10), 10);
        // a wins position 1, loses position 2, ties position 3
        assert_eq!(a.duel(&b), Ordering::Equal);
        assert_eq!(Partition::new([6, 5, 1]).duel(&b), Ordering::Greater);
        assert_eq!(b.duel(&Partition::new([6, 5, 1])), Ordering::Less);
    }

    #[test]
    fn test_serde_preserves_positions() {
        let p = Partition::unsorted([1, 4, 2]);
        let json = serde_json::to_string(&p).unwrap();
        assert_eq!(json, "[1,4,2]");
        let back: Partition = serde_json::from_str(&json).unwrap();
        assert_eq!(back, p);
        assert_eq!(back.sum(), 7);
    }

    proptest! {
        #[test]
        fn prop_distance_symmetric(
            a in proptest::collection::vec(0u32..50, 1..8),
            b in proptest::collection::vec(0u32..50, 1..8),
        ) {
            let p = Partition::new(a);
            let q = Partition::new(b);
            prop_assert_eq!(p.distance_to(&q), q.distance_to(&p));
            prop_assert_eq!(p.distance_to(&p), 0);
        }

        #[test]
        fn prop_normalize_idempotent(a in proptest::collection::vec(0u32..50, 0..10)) {
            let mut p = Partition::unsorted(a);
            let once = p.normalize().clone();
            let twice = p.normalize().clone();
            prop_assert_eq!(once, twice);
        }

        #[test]
        fn prop_sum_cache_matches(a in proptest::collection::vec(0u32..50, 1..10), v in 0u32..50) {
            let mut p = Partition::new(a);
            p.set(1, v);
            let expected: u64 = p.summands().iter().map(|&s| s as u64).sum();
            prop_assert_eq!(p.sum(), expected);
        }
    }
}
