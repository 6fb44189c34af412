use std::collections::BTreeSet;

use crate::{FrameIndex, PageNumber, SegmentId};

/// Physical frame pool - tracks what each frame holds and which are free
///
/// The free set is always the exact complement of the occupied frames.
#[derive(Debug, Clone)]
pub struct FrameAllocator {
    frames: Vec<Option<PageNumber>>,
    free: BTreeSet<FrameIndex>,
}

impl FrameAllocator {
    /// Create a pool of `count` empty frames
    pub fn new(count: usize) -> Self {
        FrameAllocator {
            frames: vec![None; count],
            free: (0..count).collect(),
        }
    }

    /// Place `page` in the lowest-numbered free frame
    ///
    /// Returns `None` when every frame is occupied.
    pub fn allocate(&mut self, page: PageNumber) -> Option<FrameIndex> {
        let frame = self.free.pop_first()?;
        self.frames[frame] = Some(page);
        Some(frame)
    }

    /// Return a frame to the free set, yielding the page it held
    pub fn release(&mut self, frame: FrameIndex) -> Option<PageNumber> {
        let page = self.frames.get_mut(frame)?.take()?;
        self.free.insert(frame);
        Some(page)
    }

    #[inline]
    pub fn has_free(&self) -> bool {
        !self.free.is_empty()
    }

    #[inline]
    pub fn free_count(&self) -> usize {
        self.free.len()
    }

    #[inline]
    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    pub fn occupied_count(&self) -> usize {
        self.frames.len() - self.free.len()
    }

    /// Page held by `frame`, if any
    #[inline]
    pub fn page_in(&self, frame: FrameIndex) -> Option<PageNumber> {
        self.frames.get(frame).copied().flatten()
    }

    pub fn is_free(&self, frame: FrameIndex) -> bool {
        self.free.contains(&frame)
    }
}

/// Page Table entry for a resident page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageTableEntry {
    pub frame: FrameIndex,
    pub segment: SegmentId,
    /// Hit counter, starts at 0 and grows by one per hit under the
    /// recency-based policy. Unused (always 0) under the optimal policy.
    pub last_used: u64,
}

/// Resident pages in insertion order
///
/// Replacement policies scan this order to break ties, so entries are kept in
/// the order they were inserted rather than by page number. A hit does not
/// move an entry.
#[derive(Debug, Clone, Default)]
pub struct PageTable {
    entries: Vec<(PageNumber, PageTableEntry)>,
}

impl PageTable {
    pub fn new() -> Self {
        Self::default()
    }

    fn position(&self, page: PageNumber) -> Option<usize> {
        self.entries.iter().position(|(p, _)| *p == page)
    }

    #[inline]
    pub fn contains(&self, page: PageNumber) -> bool {
        self.position(page).is_some()
    }

    pub fn get(&self, page: PageNumber) -> Option<&PageTableEntry> {
        self.entries.iter().find(|(p, _)| *p == page).map(|(_, e)| e)
    }

    pub fn get_mut(&mut self, page: PageNumber) -> Option<&mut PageTableEntry> {
        self.entries
            .iter_mut()
            .find(|(p, _)| *p == page)
            .map(|(_, e)| e)
    }

    /// Append a new entry at the end of the iteration order
    pub fn insert(&mut self, page: PageNumber, entry: PageTableEntry) {
        debug_assert!(!self.contains(page), "page {} already resident", page);
        self.entries.push((page, entry));
    }

    /// Remove an entry, keeping the relative order of the others
    pub fn remove(&mut self, page: PageNumber) -> Option<PageTableEntry> {
        let pos = self.position(page)?;
        Some(self.entries.remove(pos).1)
    }

    /// First page in iteration order
    pub fn first(&self) -> Option<PageNumber> {
        self.entries.first().map(|(p, _)| *p)
    }

    pub fn iter(&self) -> impl Iterator<Item = (PageNumber, &PageTableEntry)> {
        self.entries.iter().map(|(p, e)| (*p, e))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// What one frame holds, as seen by the display layer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameSlot {
    Empty,
    Occupied { page: PageNumber, segment: SegmentId },
}

impl FrameSlot {
    pub fn page(&self) -> Option<PageNumber> {
        match self {
            FrameSlot::Occupied { page, .. } => Some(*page),
            FrameSlot::Empty => None,
        }
    }
}
