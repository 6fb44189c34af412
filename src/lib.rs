pub mod constants;
pub mod error;
pub mod io;
pub mod memory;
pub mod replacement;
pub mod segment;
pub mod simulation;
pub mod vm_manager;

// Re-export commonly used items for convenience
pub use constants::*;
pub use error::ConfigError;
pub use replacement::Algorithm;
pub use simulation::{Report, SimulationConfig};
pub use vm_manager::{AccessOutcome, MemoryManager};

/// Logical page number, unique across the whole run
pub type PageNumber = u64;
/// Index of a segment in the segment table
pub type SegmentId = u32;
/// Index of a physical frame
pub type FrameIndex = usize;
