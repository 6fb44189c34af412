use log::{debug, trace};

use crate::error::{ConfigError, ConfigResult};
use crate::memory::{FrameAllocator, FrameSlot, PageTable, PageTableEntry};
use crate::replacement::{Algorithm, Optimal, RecencyBased, ReplacementPolicy};
use crate::segment::{Fragmentation, SegmentTable};
use crate::{FrameIndex, PageNumber, SegmentId};

/// Result of a single page access
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessOutcome {
    /// Page was already resident
    Hit,
    /// Page was loaded into `frame`, evicting `evicted` if memory was full
    Fault {
        frame: FrameIndex,
        evicted: Option<PageNumber>,
    },
    /// Segment id is not in the segment table; nothing changed
    UnknownSegment,
}

/// Check the memory geometry: both sizes non-zero and memory an exact number
/// of pages. Returns the frame count.
pub fn frame_count(page_size: u64, total_memory: u64) -> ConfigResult<usize> {
    if page_size == 0 {
        return Err(ConfigError::ZeroValue { field: "page size" });
    }
    if total_memory == 0 {
        return Err(ConfigError::ZeroValue { field: "total memory" });
    }
    if total_memory % page_size != 0 {
        return Err(ConfigError::UnevenMemory { page_size, total_memory });
    }
    Ok((total_memory / page_size) as usize)
}

/// Memory state for one simulation run
///
/// Built fresh per run. The segment table and fragmentation are fixed at
/// construction; the page table, frames and counters change with each access.
#[derive(Debug, Clone)]
pub struct MemoryManager {
    segments: SegmentTable,
    fragmentation: Fragmentation,
    page_table: PageTable,
    frames: FrameAllocator,
    page_faults: u64,
    page_replacements: u64,
    hits: u64,
}

impl MemoryManager {
    pub fn new(page_size: u64, total_memory: u64, segment_sizes: &[u64]) -> ConfigResult<Self> {
        let count = frame_count(page_size, total_memory)?;
        let (segments, fragmentation) = SegmentTable::build(page_size, total_memory, segment_sizes);

        Ok(MemoryManager {
            segments,
            fragmentation,
            page_table: PageTable::new(),
            frames: FrameAllocator::new(count),
            page_faults: 0,
            page_replacements: 0,
            hits: 0,
        })
    }

    /// Access `page` on behalf of `segment` under `policy`
    ///
    /// `remaining` holds the pages accessed after this one; only look-ahead
    /// policies read it.
    pub fn access(
        &mut self,
        policy: &dyn ReplacementPolicy,
        page: PageNumber,
        segment: SegmentId,
        remaining: &[PageNumber],
    ) -> AccessOutcome {
        if !self.segments.contains(segment) {
            trace!("page {}: unknown segment {}, ignored", page, segment);
            return AccessOutcome::UnknownSegment;
        }

        if let Some(entry) = self.page_table.get_mut(page) {
            policy.record_hit(entry);
            self.hits += 1;
            trace!("page {}: hit in frame {}", page, entry.frame);
            return AccessOutcome::Hit;
        }

        self.page_faults += 1;

        let evicted = if self.frames.has_free() {
            None
        } else {
            self.evict(policy, remaining)
        };

        let Some(frame) = self.frames.allocate(page) else {
            unreachable!("no free frame after eviction");
        };
        self.page_table.insert(page, PageTableEntry { frame, segment, last_used: 0 });

        debug!(
            "[{}] page {} (segment {}): fault -> frame {}{}",
            policy.name(),
            page,
            segment,
            frame,
            evicted.map(|p| format!(", evicted page {}", p)).unwrap_or_default()
        );

        AccessOutcome::Fault { frame, evicted }
    }

    fn evict(&mut self, policy: &dyn ReplacementPolicy, remaining: &[PageNumber]) -> Option<PageNumber> {
        let victim = policy.select_victim(&self.page_table, remaining)?;
        let entry = self.page_table.remove(victim)?;
        self.frames.release(entry.frame);
        self.page_replacements += 1;
        Some(victim)
    }

    /// Access under the recency-based policy; hits bump the page's counter
    pub fn lru_access(&mut self, page: PageNumber, segment: SegmentId) -> AccessOutcome {
        self.access(&RecencyBased, page, segment, &[])
    }

    /// Access under Belady's optimal policy
    pub fn optimal_access(
        &mut self,
        page: PageNumber,
        segment: SegmentId,
        remaining: &[PageNumber],
    ) -> AccessOutcome {
        self.access(&Optimal, page, segment, remaining)
    }

    /// Access with the configured algorithm
    pub fn access_with(
        &mut self,
        algorithm: Algorithm,
        page: PageNumber,
        segment: SegmentId,
        remaining: &[PageNumber],
    ) -> AccessOutcome {
        self.access(algorithm.policy(), page, segment, remaining)
    }

    /// Demand paging: load `page` only if it is not resident
    ///
    /// A resident page is left alone: no hit is counted and its recency
    /// counter does not move. Returns `None` in that case.
    pub fn demand_page(&mut self, page: PageNumber, segment: SegmentId) -> Option<AccessOutcome> {
        if self.page_table.contains(page) {
            trace!("page {}: already resident, demand pager skips it", page);
            return None;
        }
        Some(self.lru_access(page, segment))
    }

    // =========================================================================
    // Reporting
    // =========================================================================

    pub fn page_faults(&self) -> u64 {
        self.page_faults
    }

    pub fn page_replacements(&self) -> u64 {
        self.page_replacements
    }

    pub fn hits(&self) -> u64 {
        self.hits
    }

    pub fn fragmentation(&self) -> Fragmentation {
        self.fragmentation
    }

    pub fn segment_table(&self) -> &SegmentTable {
        &self.segments
    }

    pub fn page_table(&self) -> &PageTable {
        &self.page_table
    }

    pub fn frame_count(&self) -> usize {
        self.frames.frame_count()
    }

    pub fn free_frame_count(&self) -> usize {
        self.frames.free_count()
    }

    pub fn resident_count(&self) -> usize {
        self.page_table.len()
    }

    pub fn is_resident(&self, page: PageNumber) -> bool {
        self.page_table.contains(page)
    }

    /// Per-frame occupancy, frame 0 first
    pub fn frames(&self) -> Vec<FrameSlot> {
        (0..self.frames.frame_count())
            .map(|frame| match self.frames.page_in(frame) {
                Some(page) => FrameSlot::Occupied {
                    page,
                    segment: self.page_table.get(page).map_or(0, |e| e.segment),
                },
                None => FrameSlot::Empty,
            })
            .collect()
    }
}
