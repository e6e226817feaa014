//! Device register access
//!
//! Platform drivers never dereference device addresses themselves; they
//! ask an [`IoRemap`] for a region and go through [`MmioAccess`]. That keeps
//! the register layout logic testable against a simulated device.

use core::ptr::NonNull;

use volatile::VolatilePtr;

use super::PhysAddr;

/// 32-bit register access within a mapped window
pub trait MmioAccess {
    /// Read the register at byte `offset`
    fn read32(&self, offset: usize) -> u32;

    /// Write the register at byte `offset`
    fn write32(&self, offset: usize, value: u32);
}

impl<T: MmioAccess + ?Sized> MmioAccess for &T {
    fn read32(&self, offset: usize) -> u32 {
        (**self).read32(offset)
    }

    fn write32(&self, offset: usize, value: u32) {
        (**self).write32(offset, value)
    }
}

/// Device memory mapping service
pub trait IoRemap {
    /// Mapped window type
    type Region: MmioAccess;

    /// Map `size` bytes of device memory at `paddr` uncached
    fn ioremap_nocache(&self, paddr: PhysAddr, size: usize) -> Option<Self::Region>;
}

/// A mapped window of device registers
#[derive(Debug)]
pub struct MmioRegion {
    base: NonNull<u8>,
    size: usize,
}

// Device registers are shared with the hardware anyway; every access is a
// single volatile load or store.
unsafe impl Send for MmioRegion {}
unsafe impl Sync for MmioRegion {}

impl MmioRegion {
    /// Wrap a mapped window
    ///
    /// # Safety
    ///
    /// `base..base + size` must be mapped as device memory for as long as
    /// the region lives and must not be accessed as normal memory elsewhere.
    pub unsafe fn new(base: NonNull<u8>, size: usize) -> Self {
        Self { base, size }
    }

    /// Size of the window in bytes
    pub fn size(&self) -> usize {
        self.size
    }

    fn register(&self, offset: usize) -> VolatilePtr<'_, u32> {
        assert!(
            offset % 4 == 0 && offset + 4 <= self.size,
            "MMIO offset {:#x} outside {:#x}-byte window",
            offset,
            self.size
        );
        // SAFETY: in bounds and aligned per the check above; the window is
        // mapped per the contract of `new`.
        unsafe {
            let reg = NonNull::new_unchecked(self.base.as_ptr().add(offset)).cast::<u32>();
            VolatilePtr::new(reg)
        }
    }
}

impl MmioAccess for MmioRegion {
    #[inline]
    fn read32(&self, offset: usize) -> u32 {
        self.register(offset).read()
    }

    #[inline]
    fn write32(&self, offset: usize, value: u32) {
        self.register(offset).write(value)
    }
}

/// Remapper for the hypervisor's identity-mapped device space
#[derive(Debug)]
pub struct IdentityRemap {
    _private: (),
}

impl IdentityRemap {
    /// # Safety
    ///
    /// Every physical device address handed to [`IoRemap::ioremap_nocache`]
    /// must be identity mapped with device attributes in the current
    /// translation regime.
    pub const unsafe fn new() -> Self {
        Self { _private: () }
    }
}

impl IoRemap for IdentityRemap {
    type Region = MmioRegion;

    fn ioremap_nocache(&self, paddr: PhysAddr, size: usize) -> Option<MmioRegion> {
        let base = NonNull::new(usize::try_from(paddr).ok()? as *mut u8)?;
        // SAFETY: identity mapping guaranteed by the contract of `new`.
        Some(unsafe { MmioRegion::new(base, size) })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_region_access() {
        let mut backing = [0u32; 4];
        let base = NonNull::new(backing.as_mut_ptr().cast::<u8>()).unwrap();
        let region = unsafe { MmioRegion::new(base, 16) };

        region.write32(0x8, 0xdead_beef);
        assert_eq!(region.read32(0x8), 0xdead_beef);
        assert_eq!(region.read32(0x0), 0);
        assert_eq!(region.size(), 16);
    }

    #[test]
    #[should_panic]
    fn test_region_rejects_out_of_bounds() {
        let mut backing = [0u32; 4];
        let base = NonNull::new(backing.as_mut_ptr().cast::<u8>()).unwrap();
        let region = unsafe { MmioRegion::new(base, 16) };
        region.read32(0x10);
    }

    #[test]
    fn test_identity_remap_rejects_null() {
        let remap = unsafe { IdentityRemap::new() };
        assert!(remap.ioremap_nocache(0, 4).is_none());
    }
}
