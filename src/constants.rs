pub const DEFAULT_PAGE_SIZE: u64 = 4096;
pub const DEFAULT_TOTAL_MEMORY: u64 = 16384;
pub const DEFAULT_SEGMENT_SIZES: [u64; 3] = [8192, 4096, 4096];

pub const DEFAULT_PAGE_SEQUENCE: [u64; 12] = [1, 2, 3, 4, 1, 2, 5, 1, 2, 3, 4, 5];
pub const DEFAULT_SEGMENT_IDS: [u32; 12] = [0, 0, 0, 1, 0, 0, 2, 0, 0, 1, 1, 2];

/// Separator used by the list-valued configuration fields
pub const LIST_SEPARATOR: char = ',';
