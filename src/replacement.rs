//! Page replacement policies.
//!
//! A policy decides two things: what a hit does to the resident page's entry,
//! and which resident page to evict when a fault finds no free frame. The
//! bookkeeping around both (counters, frame allocation) lives in
//! `MemoryManager`.
//!
//! Both policies break ties by the page table's insertion order, taking the
//! first page that reaches the extreme value. Neither uses a library
//! `min_by_key`/`max_by_key`, which would settle ties differently.

use std::fmt;
use std::str::FromStr;

use crate::error::ConfigError;
use crate::memory::{PageTable, PageTableEntry};
use crate::PageNumber;

pub trait ReplacementPolicy {
    fn name(&self) -> &'static str;

    /// Update the entry of a page that was just hit
    fn record_hit(&self, _entry: &mut PageTableEntry) {}

    /// Choose the resident page to evict
    ///
    /// `remaining` is the sequence of pages that will be accessed after the
    /// current one. Returns `None` only when `table` is empty.
    fn select_victim(&self, table: &PageTable, remaining: &[PageNumber]) -> Option<PageNumber>;
}

/// Evicts the resident page with the fewest hits.
///
/// This is a hit counter rather than a timestamp: each entry starts at 0 and
/// gains 1 per hit. It only approximates least-recently-used when accesses
/// are evenly spaced, and the two can pick different victims otherwise.
#[derive(Debug, Clone, Copy, Default)]
pub struct RecencyBased;

impl ReplacementPolicy for RecencyBased {
    fn name(&self) -> &'static str {
        "LRU"
    }

    fn record_hit(&self, entry: &mut PageTableEntry) {
        entry.last_used += 1;
    }

    fn select_victim(&self, table: &PageTable, _remaining: &[PageNumber]) -> Option<PageNumber> {
        let mut victim: Option<(PageNumber, u64)> = None;
        for (page, entry) in table.iter() {
            match victim {
                Some((_, least)) if entry.last_used >= least => {}
                _ => victim = Some((page, entry.last_used)),
            }
        }
        victim.map(|(page, _)| page)
    }
}

/// Belady's algorithm: evicts the resident page whose next use is farthest
/// away, or that is never used again.
#[derive(Debug, Clone, Copy, Default)]
pub struct Optimal;

impl Optimal {
    /// Index of the next access to `page`, `usize::MAX` if there is none
    pub fn next_use(page: PageNumber, remaining: &[PageNumber]) -> usize {
        remaining
            .iter()
            .position(|&p| p == page)
            .unwrap_or(usize::MAX)
    }
}

impl ReplacementPolicy for Optimal {
    fn name(&self) -> &'static str {
        "Optimal"
    }

    fn select_victim(&self, table: &PageTable, remaining: &[PageNumber]) -> Option<PageNumber> {
        let mut victim: Option<(PageNumber, usize)> = None;
        for (page, _) in table.iter() {
            let next = Self::next_use(page, remaining);
            match victim {
                Some((_, farthest)) if next <= farthest => {}
                _ => victim = Some((page, next)),
            }
        }
        victim.map(|(page, _)| page).or_else(|| table.first())
    }
}

static RECENCY_BASED: RecencyBased = RecencyBased;
static OPTIMAL: Optimal = Optimal;

/// Replacement algorithm selected by the configuration
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Algorithm {
    #[default]
    RecencyBased,
    Optimal,
}

impl Algorithm {
    pub const ALL: [Algorithm; 2] = [Algorithm::RecencyBased, Algorithm::Optimal];

    pub fn policy(&self) -> &'static dyn ReplacementPolicy {
        match self {
            Algorithm::RecencyBased => &RECENCY_BASED,
            Algorithm::Optimal => &OPTIMAL,
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.policy().name())
    }
}

impl FromStr for Algorithm {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "lru" | "recency" | "recency-based" => Ok(Algorithm::RecencyBased),
            "optimal" | "opt" | "belady" => Ok(Algorithm::Optimal),
            _ => Err(ConfigError::UnknownAlgorithm(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(pages: &[(PageNumber, u64)]) -> PageTable {
        let mut pt = PageTable::new();
        for (frame, &(page, last_used)) in pages.iter().enumerate() {
            pt.insert(page, PageTableEntry { frame, segment: 0, last_used });
        }
        pt
    }

    // =========================================================================
    // Recency-based
    // =========================================================================

    #[test]
    fn test_recency_picks_smallest_counter() {
        let pt = table(&[(1, 3), (2, 1), (3, 2)]);
        assert_eq!(RecencyBased.select_victim(&pt, &[]), Some(2));
    }

    #[test]
    fn test_recency_tie_goes_to_earliest_inserted() {
        // Pages 8 and 4 share the minimum; 8 was inserted first
        let pt = table(&[(8, 0), (4, 0), (2, 5)]);
        assert_eq!(RecencyBased.select_victim(&pt, &[]), Some(8));
    }

    #[test]
    fn test_recency_hit_increments_counter() {
        let mut entry = PageTableEntry { frame: 0, segment: 0, last_used: 0 };
        RecencyBased.record_hit(&mut entry);
        RecencyBased.record_hit(&mut entry);
        assert_eq!(entry.last_used, 2);
    }

    #[test]
    fn test_empty_table_has_no_victim() {
        let pt = PageTable::new();
        assert_eq!(RecencyBased.select_victim(&pt, &[]), None);
        assert_eq!(Optimal.select_victim(&pt, &[1, 2]), None);
    }

    // =========================================================================
    // Optimal
    // =========================================================================

    #[test]
    fn test_next_use() {
        assert_eq!(Optimal::next_use(3, &[1, 3, 3]), 1);
        assert_eq!(Optimal::next_use(9, &[1, 3, 3]), usize::MAX);
        assert_eq!(Optimal::next_use(9, &[]), usize::MAX);
    }

    #[test]
    fn test_optimal_picks_farthest() {
        let pt = table(&[(1, 0), (2, 0), (3, 0)]);
        assert_eq!(Optimal.select_victim(&pt, &[2, 1, 3, 1]), Some(3));
    }

    #[test]
    fn test_optimal_prefers_never_used_again() {
        let pt = table(&[(1, 0), (2, 0), (3, 0)]);
        assert_eq!(Optimal.select_victim(&pt, &[3, 1, 3]), Some(2));
    }

    #[test]
    fn test_optimal_tie_keeps_first_found() {
        // Neither 5 nor 6 appears again; 5 comes first in the table
        let pt = table(&[(5, 0), (6, 0), (7, 0)]);
        assert_eq!(Optimal.select_victim(&pt, &[7]), Some(5));
    }

    #[test]
    fn test_optimal_ignores_hit_counter() {
        let mut entry = PageTableEntry { frame: 0, segment: 0, last_used: 0 };
        Optimal.record_hit(&mut entry);
        assert_eq!(entry.last_used, 0);
    }

    // =========================================================================
    // Algorithm
    // =========================================================================

    #[test]
    fn test_algorithm_from_str() {
        assert_eq!("LRU".parse::<Algorithm>().unwrap(), Algorithm::RecencyBased);
        assert_eq!(" optimal ".parse::<Algorithm>().unwrap(), Algorithm::Optimal);
        assert_eq!("opt".parse::<Algorithm>().unwrap(), Algorithm::Optimal);
        assert!(matches!(
            "fifo".parse::<Algorithm>(),
            Err(ConfigError::UnknownAlgorithm(_))
        ));
    }

    #[test]
    fn test_algorithm_display() {
        assert_eq!(Algorithm::RecencyBased.to_string(), "LRU");
        assert_eq!(Algorithm::Optimal.to_string(), "Optimal");
        assert_eq!(Algorithm::default(), Algorithm::RecencyBased);
    }
}
