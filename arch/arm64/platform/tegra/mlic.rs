//! Mediated legacy interrupt controller
//!
//! The hardware domain runs the stock Tegra ICTLR driver, but the ICTLR also
//! gates lines owned by the hypervisor and by other guests. Its window is
//! therefore removed from the hardware domain's stage-2 tables and every
//! access is trapped here. Reads only show bits for lines the domain owns;
//! writes only change those bits.

use core::sync::atomic::{AtomicU64, Ordering};

use super::ictlr::{IctlrLine, LegacyIctlr};
use crate::core::irq::{IrqNumber, IrqOwnership};
use crate::core::mm::{pfn_span, MmioAccess, PhysAddr};
use crate::core::vmm::{DomainInfo, DomainMmio};
use crate::{Error, Result};

/// Width of a trapped data access
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessSize {
    /// 8-bit
    Byte,
    /// 16-bit
    HalfWord,
    /// 32-bit
    Word,
    /// 64-bit
    DoubleWord,
}

/// Decoded data abort on the ICTLR window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MmioInfo {
    /// Faulting guest physical address
    pub gpa: PhysAddr,
    /// Access width
    pub size: AccessSize,
}

/// Mediator access counters
#[derive(Debug, Default)]
pub struct MlicStats {
    reads: AtomicU64,
    writes: AtomicU64,
}

impl MlicStats {
    /// Trapped reads so far
    pub fn reads(&self) -> u64 {
        self.reads.load(Ordering::Relaxed)
    }

    /// Trapped writes so far
    pub fn writes(&self) -> u64 {
        self.writes.load(Ordering::Relaxed)
    }
}

/// Register targeted by a trapped access
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct MlicRequest {
    bank: usize,
    reg: usize,
    irq_base: IrqNumber,
}

/// Trap handler for the hardware domain's view of the ICTLR
pub struct Mlic<'a, R: MmioAccess> {
    ictlr: &'a LegacyIctlr<R>,
    stats: &'a MlicStats,
}

impl<'a, R: MmioAccess> Mlic<'a, R> {
    /// Mediate `ictlr`, counting into `stats`
    pub fn new(ictlr: &'a LegacyIctlr<R>, stats: &'a MlicStats) -> Self {
        Self { ictlr, stats }
    }

    /// Hand the ICTLR window of hardware domain `d` over to this mediator
    pub fn init_domain(&self, d: &dyn DomainInfo, mmio: &dyn DomainMmio) -> Result<()> {
        assert!(d.is_hardware_domain());

        let config = self.ictlr.config();
        let size = config.region_size();
        let (pfn_start, pfn_end) = pfn_span(config.base, size as u64);

        mmio.iomem_deny_access(pfn_start, pfn_end - 1).map_err(|e| {
            log::error!("d{}: Tegra LIC: failed to deny iomem access: {}", d.domain_id(), e);
            e
        })?;

        mmio.unmap_mmio_regions(pfn_start, pfn_end - pfn_start, pfn_start).map_err(|e| {
            log::error!("d{}: Tegra LIC: failed to unmap ictlr: {}", d.domain_id(), e);
            e
        })?;

        mmio.register_mmio_handler(config.base, size);

        log::info!("d{}: Tegra LIC: mediating {:#x}+{:#x}", d.domain_id(), config.base, size);
        Ok(())
    }

    /// Emulate a read of the ICTLR by `d`
    ///
    /// Bits for lines `d` does not own read as zero.
    pub fn mmio_read(
        &self,
        d: &dyn DomainInfo,
        owners: &dyn IrqOwnership,
        info: &MmioInfo,
    ) -> Result<u32> {
        self.stats.reads.fetch_add(1, Ordering::Relaxed);

        let req = self.decode(d, info, "read")?;
        let raw = self.ictlr.readl(req.bank, req.reg);

        Ok(raw & self.owned_mask(d, owners, req.irq_base))
    }

    /// Emulate a write of `value` to the ICTLR by `d`
    ///
    /// Only bits for lines `d` owns are taken from `value`; the others keep
    /// their current register contents.
    pub fn mmio_write(
        &self,
        d: &dyn DomainInfo,
        owners: &dyn IrqOwnership,
        info: &MmioInfo,
        value: u32,
    ) -> Result<()> {
        self.stats.writes.fetch_add(1, Ordering::Relaxed);

        let req = self.decode(d, info, "write")?;
        let write_mask = self.owned_mask(d, owners, req.irq_base);

        let raw = self.ictlr.readl(req.bank, req.reg);
        let merged = (raw & !write_mask) | (value & write_mask);
        self.ictlr.writel(req.bank, req.reg, merged);

        Ok(())
    }

    fn decode(&self, d: &dyn DomainInfo, info: &MmioInfo, what: &str) -> Result<MlicRequest> {
        let config = self.ictlr.config();

        // The handler is registered for exactly this window.
        let offset = info
            .gpa
            .checked_sub(config.base)
            .filter(|off| *off < config.region_size() as u64)
            .unwrap_or_else(|| panic!("Tegra LIC: {:#x} outside mediated window", info.gpa))
            as usize;

        let bank = offset / config.bank_size;
        let reg = offset % config.bank_size;

        if reg & 0x3 != 0 {
            log::error!(
                "d{}: Tegra LIC: Attempt to {} unaligned ictlr addr ({:#x})",
                d.domain_id(),
                what,
                info.gpa
            );
            return Err(Error::InvalidAccess);
        }

        if info.size != AccessSize::Word {
            log::error!(
                "d{}: Tegra LIC: Non-word {} of ictlr addr {:#x}",
                d.domain_id(),
                what,
                info.gpa
            );
            return Err(Error::InvalidAccess);
        }

        Ok(MlicRequest {
            bank,
            reg,
            irq_base: IctlrLine::irq_base(bank, config),
        })
    }

    fn owned_mask(&self, d: &dyn DomainInfo, owners: &dyn IrqOwnership, irq_base: IrqNumber) -> u32 {
        (0..self.ictlr.config().irqs_per_bank)
            .filter(|i| owners.irq_owned_by(irq_base + i, d))
            .fold(0, |mask, i| mask | 1 << i)
    }
}
