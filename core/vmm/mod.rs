//! Virtual machine interfaces
//!
//! What the platform layer needs to know about a domain.

/// Domain identifier
pub type DomainId = u16;

/// Domain identifier of the hardware domain
pub const HARDWARE_DOMAIN_ID: DomainId = 0;

/// Read-only view of a domain
pub trait DomainInfo {
    /// Domain identifier
    fn domain_id(&self) -> DomainId;

    /// Whether this is the hardware domain, which drives the platform's
    /// devices itself
    fn is_hardware_domain(&self) -> bool {
        self.domain_id() == HARDWARE_DOMAIN_ID
    }
}

/// Stage-2 and trap management for a domain
///
/// Used when a platform needs to take a device window away from a domain
/// and emulate it instead.
pub trait DomainMmio {
    /// Deny the domain access to frames `start_pfn..=end_pfn`
    fn iomem_deny_access(&self, start_pfn: u64, end_pfn: u64) -> crate::Result<()>;

    /// Remove `nr` frames at guest frame `gfn` (backed by `mfn`) from the
    /// domain's stage-2 tables
    fn unmap_mmio_regions(&self, gfn: u64, nr: u64, mfn: u64) -> crate::Result<()>;

    /// Trap accesses to `size` bytes at guest physical `addr` into the
    /// platform's MMIO handler
    fn register_mmio_handler(&self, addr: u64, size: usize);
}
