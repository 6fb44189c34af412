use log::debug;

use crate::SegmentId;

/// One entry of the Segment Table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Segment {
    /// First byte of the segment; always a multiple of the page size. Wider
    /// than `u64` since an oversized layout can run past the address space.
    pub base: u128,
    /// Declared size in bytes
    pub limit: u64,
    /// Whole pages backing the segment, ceil(limit / page_size)
    pub pages: u64,
}

/// Static fragmentation of a segment layout, in bytes
///
/// Computed once when the segment table is built. External fragmentation is
/// negative when the segments need more memory than is available.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Fragmentation {
    pub internal: i128,
    pub external: i128,
}

/// Segment Table, indexed by segment id in declaration order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SegmentTable {
    segments: Vec<Segment>,
}

impl SegmentTable {
    /// Lay out the segments back to back, each rounded up to whole pages.
    ///
    /// An empty `sizes` list means a single segment spanning `total_memory`.
    /// No check is made that the layout fits in memory.
    pub fn build(page_size: u64, total_memory: u64, sizes: &[u64]) -> (Self, Fragmentation) {
        let implicit = [total_memory];
        let sizes = if sizes.is_empty() { &implicit[..] } else { sizes };

        let mut segments = Vec::with_capacity(sizes.len());
        let mut offset: u128 = 0;
        let mut internal: i128 = 0;

        for &size in sizes {
            let pages = size.div_ceil(page_size);
            let span = u128::from(pages) * u128::from(page_size);
            segments.push(Segment { base: offset, limit: size, pages });
            offset += span;
            internal += (span - u128::from(size)) as i128;
        }

        let fragmentation = Fragmentation {
            internal,
            external: i128::from(total_memory) - offset as i128,
        };

        debug!(
            "built {} segments, {} bytes laid out, fragmentation {:?}",
            segments.len(),
            offset,
            fragmentation
        );

        (SegmentTable { segments }, fragmentation)
    }

    #[inline]
    pub fn get(&self, id: SegmentId) -> Option<&Segment> {
        self.segments.get(id as usize)
    }

    #[inline]
    pub fn contains(&self, id: SegmentId) -> bool {
        (id as usize) < self.segments.len()
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Iterate `(id, segment)` pairs in id order
    pub fn iter(&self) -> impl Iterator<Item = (SegmentId, &Segment)> {
        self.segments
            .iter()
            .enumerate()
            .map(|(id, segment)| (id as SegmentId, segment))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_layout() {
        let (table, frag) = SegmentTable::build(4096, 16384, &[8192, 4096, 4096]);

        assert_eq!(table.len(), 3);
        assert_eq!(table.get(0), Some(&Segment { base: 0, limit: 8192, pages: 2 }));
        assert_eq!(table.get(1), Some(&Segment { base: 8192, limit: 4096, pages: 1 }));
        assert_eq!(table.get(2), Some(&Segment { base: 12288, limit: 4096, pages: 1 }));
        assert_eq!(frag, Fragmentation { internal: 0, external: 0 });
    }

    #[test]
    fn test_partial_pages_round_up() {
        // 5000 bytes needs 2 pages of 4096, wasting 3192
        let (table, frag) = SegmentTable::build(4096, 32768, &[5000, 100]);

        assert_eq!(table.get(0), Some(&Segment { base: 0, limit: 5000, pages: 2 }));
        assert_eq!(table.get(1), Some(&Segment { base: 8192, limit: 100, pages: 1 }));
        assert_eq!(frag.internal, 3192 + 3996);
        assert_eq!(frag.external, 32768 - 12288);
    }

    #[test]
    fn test_bases_are_page_aligned() {
        let (table, _) = SegmentTable::build(512, 8192, &[1, 513, 1024, 7]);
        for (_, seg) in table.iter() {
            assert_eq!(seg.base % 512, 0);
        }
        let bases: Vec<u128> = table.iter().map(|(_, s)| s.base).collect();
        assert_eq!(bases, vec![0, 512, 1536, 2560]);
    }

    #[test]
    fn test_empty_sizes_means_single_segment() {
        let (table, frag) = SegmentTable::build(4096, 16384, &[]);

        assert_eq!(table.len(), 1);
        assert_eq!(table.get(0), Some(&Segment { base: 0, limit: 16384, pages: 4 }));
        assert_eq!(frag, Fragmentation::default());
    }

    #[test]
    fn test_overflow_gives_negative_external() {
        let (_, frag) = SegmentTable::build(4096, 8192, &[8192, 4096]);
        assert_eq!(frag.external, -4096);
        assert_eq!(frag.internal, 0);
    }

    #[test]
    fn test_oversized_segments_do_not_overflow() {
        let (table, frag) = SegmentTable::build(4096, 16384, &[u64::MAX]);
        let pages = u64::MAX / 4096 + 1;
        assert_eq!(table.get(0), Some(&Segment { base: 0, limit: u64::MAX, pages }));
        assert_eq!(frag.internal, 1);
        assert_eq!(frag.external, 16384 - (u64::MAX as i128 + 1));

        let (table, frag) = SegmentTable::build(4096, 16384, &[1 << 63, 1 << 63]);
        assert_eq!(table.get(1).map(|s| s.base), Some(1u128 << 63));
        assert_eq!(frag.internal, 0);
        assert_eq!(frag.external, 16384 - (1i128 << 64));
        assert!(frag.external < 0);
    }

    #[test]
    fn test_contains() {
        let (table, _) = SegmentTable::build(4096, 16384, &[8192, 4096]);
        assert!(table.contains(0));
        assert!(table.contains(1));
        assert!(!table.contains(2));
        assert!(table.get(7).is_none());
    }
}
