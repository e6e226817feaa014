//! Memory management interfaces
//!
//! Address types, page arithmetic, and device register mapping.

pub mod mmio;

pub use mmio::{IdentityRemap, IoRemap, MmioAccess, MmioRegion};

/// Physical address type
pub type PhysAddr = u64;

/// Frame number type
pub type FrameNr = u64;

/// Page size (typically 4KB)
pub const PAGE_SIZE: u64 = 4096;

/// Page shift (number of bits for page offset)
pub const PAGE_SHIFT: u32 = 12;

/// Frame containing `addr`
pub const fn paddr_to_pfn(addr: PhysAddr) -> FrameNr {
    addr >> PAGE_SHIFT
}

/// Frames needed to cover `start..start + size`, as a half-open range
pub const fn pfn_span(start: PhysAddr, size: u64) -> (FrameNr, FrameNr) {
    (paddr_to_pfn(start), (start + size).div_ceil(PAGE_SIZE))
}
