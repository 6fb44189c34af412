//! Whole-run drivers: configuration in, report out.

use std::fmt;

use log::info;

use crate::constants::*;
use crate::error::{ConfigError, ConfigResult};
use crate::memory::FrameSlot;
use crate::replacement::Algorithm;
use crate::segment::{Fragmentation, SegmentTable};
use crate::vm_manager::{frame_count, AccessOutcome, MemoryManager};
use crate::{PageNumber, SegmentId};

/// Everything needed for one run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimulationConfig {
    pub page_size: u64,
    pub total_memory: u64,
    /// Empty means one segment spanning all of memory
    pub segment_sizes: Vec<u64>,
    pub algorithm: Algorithm,
    pub access_sequence: Vec<PageNumber>,
    /// Segment of each access, parallel to `access_sequence`
    pub segment_ids: Vec<SegmentId>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        SimulationConfig {
            page_size: DEFAULT_PAGE_SIZE,
            total_memory: DEFAULT_TOTAL_MEMORY,
            segment_sizes: DEFAULT_SEGMENT_SIZES.to_vec(),
            algorithm: Algorithm::default(),
            access_sequence: DEFAULT_PAGE_SEQUENCE.to_vec(),
            segment_ids: DEFAULT_SEGMENT_IDS.to_vec(),
        }
    }
}

impl SimulationConfig {
    /// Reject configurations that cannot be simulated
    ///
    /// Segments that do not fit in memory are accepted; the overflow shows up
    /// as negative external fragmentation.
    pub fn validate(&self) -> ConfigResult<()> {
        frame_count(self.page_size, self.total_memory)?;
        if self.segment_sizes.contains(&0) {
            return Err(ConfigError::ZeroValue { field: "segment size" });
        }
        if self.access_sequence.len() != self.segment_ids.len() {
            return Err(ConfigError::LengthMismatch {
                pages: self.access_sequence.len(),
                segment_ids: self.segment_ids.len(),
            });
        }
        Ok(())
    }

    fn accesses(&self) -> impl Iterator<Item = (PageNumber, SegmentId)> + '_ {
        self.access_sequence
            .iter()
            .copied()
            .zip(self.segment_ids.iter().copied())
    }
}

/// How the access sequence was driven
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Replacement(Algorithm),
    DemandPaging,
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Replacement(algorithm) => write!(f, "{}", algorithm),
            Mode::DemandPaging => f.write_str("Demand Paging (LRU)"),
        }
    }
}

/// One processed access. `outcome` is `None` when the demand pager skipped
/// an already-resident page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccessRecord {
    pub page: PageNumber,
    pub segment: SegmentId,
    pub outcome: Option<AccessOutcome>,
}

impl fmt::Display for AccessRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "page {} (segment {}): ", self.page, self.segment)?;
        match self.outcome {
            None => f.write_str("resident, skipped"),
            Some(AccessOutcome::Hit) => f.write_str("hit"),
            Some(AccessOutcome::UnknownSegment) => f.write_str("unknown segment, ignored"),
            Some(AccessOutcome::Fault { frame, evicted: None }) => {
                write!(f, "fault -> frame {}", frame)
            }
            Some(AccessOutcome::Fault { frame, evicted: Some(victim) }) => {
                write!(f, "fault -> frame {} (replaced page {})", frame, victim)
            }
        }
    }
}

/// Final state of a run, read by the display layer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    pub mode: Mode,
    pub page_faults: u64,
    pub page_replacements: u64,
    pub hits: u64,
    pub fragmentation: Fragmentation,
    pub segment_table: SegmentTable,
    pub frames: Vec<FrameSlot>,
    pub trace: Vec<AccessRecord>,
}

impl Report {
    fn from_manager(mode: Mode, mm: &MemoryManager, trace: Vec<AccessRecord>) -> Self {
        Report {
            mode,
            page_faults: mm.page_faults(),
            page_replacements: mm.page_replacements(),
            hits: mm.hits(),
            fragmentation: mm.fragmentation(),
            segment_table: mm.segment_table().clone(),
            frames: mm.frames(),
            trace,
        }
    }

    /// Hits over hits plus faults; 0.0 when nothing was processed
    pub fn hit_ratio(&self) -> f64 {
        let total = self.hits + self.page_faults;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }

    pub fn resident_count(&self) -> usize {
        self.frames.iter().filter(|slot| slot.page().is_some()).count()
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Algorithm: {}", self.mode)?;
        writeln!(f, "Page Faults: {}", self.page_faults)?;
        writeln!(f, "Page Replacements: {}", self.page_replacements)?;
        writeln!(f, "Internal Fragmentation: {} bytes", self.fragmentation.internal)?;
        writeln!(f, "External Fragmentation: {} bytes", self.fragmentation.external)?;
        writeln!(f)?;
        writeln!(f, "Segment Table:")?;
        for (id, seg) in self.segment_table.iter() {
            writeln!(
                f,
                "Segment {}: Base {}, Limit {}, Pages {}",
                id, seg.base, seg.limit, seg.pages
            )?;
        }
        writeln!(f)?;
        writeln!(f, "Physical Memory Layout:")?;
        for (frame, slot) in self.frames.iter().enumerate() {
            match slot {
                FrameSlot::Empty => writeln!(f, "Frame {}: empty", frame)?,
                FrameSlot::Occupied { page, segment } => {
                    writeln!(f, "Frame {}: P{} (segment {})", frame, page, segment)?
                }
            }
        }
        Ok(())
    }
}

/// Run the whole access sequence under the configured replacement algorithm
pub fn run(config: &SimulationConfig) -> ConfigResult<Report> {
    config.validate()?;
    let mut mm = MemoryManager::new(config.page_size, config.total_memory, &config.segment_sizes)?;

    info!(
        "running {} over {} accesses with {} frames",
        config.algorithm,
        config.access_sequence.len(),
        mm.frame_count()
    );

    // Accesses under unknown segments never happen, so they are left out of
    // the look-ahead. `next` indexes the first known access still ahead.
    let known: Vec<PageNumber> = config
        .accesses()
        .filter(|&(_, segment)| mm.segment_table().contains(segment))
        .map(|(page, _)| page)
        .collect();
    let mut next = 0;

    let trace: Vec<AccessRecord> = config
        .accesses()
        .map(|(page, segment)| {
            if mm.segment_table().contains(segment) {
                next += 1;
            }
            AccessRecord {
                page,
                segment,
                outcome: Some(mm.access_with(config.algorithm, page, segment, &known[next..])),
            }
        })
        .collect();

    info!("{} faults, {} replacements", mm.page_faults(), mm.page_replacements());
    Ok(Report::from_manager(Mode::Replacement(config.algorithm), &mm, trace))
}

/// Run the whole access sequence through the demand pager
///
/// The configured algorithm is ignored; demand paging always loads with the
/// recency-based policy.
pub fn run_demand_paging(config: &SimulationConfig) -> ConfigResult<Report> {
    config.validate()?;
    let mut mm = MemoryManager::new(config.page_size, config.total_memory, &config.segment_sizes)?;

    info!(
        "demand paging over {} accesses with {} frames",
        config.access_sequence.len(),
        mm.frame_count()
    );

    let trace: Vec<AccessRecord> = config
        .accesses()
        .map(|(page, segment)| AccessRecord {
            page,
            segment,
            outcome: mm.demand_page(page, segment),
        })
        .collect();

    info!("{} faults, {} replacements", mm.page_faults(), mm.page_replacements());
    Ok(Report::from_manager(Mode::DemandPaging, &mm, trace))
}
