//! Tegra legacy interrupt controller (ICTLR)
//!
//! Every shared peripheral line on Tegra passes through one of the ICTLR
//! banks before it reaches the GIC. A line masked in the ICTLR never shows
//! up at the GIC, whatever the GIC thinks of it. Lines below
//! `nr_local_irqs` are wired straight to the GIC and are not gated.
//!
//! Each bank covers 32 lines. Enables are changed through the write-1-to-set
//! and write-1-to-clear registers, so a single store updates one line
//! without touching its neighbours.

use crate::config::IctlrConfig;
use crate::core::irq::IrqNumber;
use crate::core::mm::{IoRemap, MmioAccess};
use crate::{Error, Result};

/// Per-bank register offsets
pub mod regs {
    /// CPU interrupt enable status
    pub const CPU_IER: usize = 0x20;
    /// CPU interrupt enable, write 1 to set
    pub const CPU_IER_SET: usize = 0x24;
    /// CPU interrupt enable, write 1 to clear
    pub const CPU_IER_CLR: usize = 0x28;
    /// CPU interrupt class: 0 = IRQ, 1 = FIQ
    pub const CPU_IEP_CLASS: usize = 0x2c;
}

/// Position of a gated line inside the ICTLR
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct IctlrLine {
    /// Bank index
    pub bank: usize,
    /// Bit within the bank's registers
    pub bit: u32,
}

impl IctlrLine {
    /// Locate `irq`, or `None` for lines wired directly to the GIC
    ///
    /// The bank is not range checked here.
    pub fn from_irq(irq: IrqNumber, config: &IctlrConfig) -> Option<Self> {
        let ictlr_irq = irq.checked_sub(config.nr_local_irqs)?;
        Some(Self {
            bank: (ictlr_irq / config.irqs_per_bank) as usize,
            bit: ictlr_irq % config.irqs_per_bank,
        })
    }

    /// Single-bit mask for this line
    pub const fn mask(&self) -> u32 {
        1 << self.bit
    }

    /// First global IRQ number served by `bank`
    pub const fn irq_base(bank: usize, config: &IctlrConfig) -> IrqNumber {
        bank as IrqNumber * config.irqs_per_bank + config.nr_local_irqs
    }
}

/// Mapped legacy interrupt controller
///
/// Only obtainable through [`LegacyIctlr::map`], so holding one means the
/// window is mapped and every bank has been put into its default state.
/// The mapping is never torn down.
#[derive(Debug)]
pub struct LegacyIctlr<R: MmioAccess> {
    regs: R,
    config: IctlrConfig,
}

impl<R: MmioAccess> LegacyIctlr<R> {
    /// Map the ICTLR window and mask every line
    ///
    /// Every bank ends up with all enables cleared and all lines classed
    /// as normal IRQs: nothing gated by the ICTLR reaches anyone until it
    /// has been routed.
    pub fn map<M>(remap: &M, config: IctlrConfig) -> Result<Self>
    where
        M: IoRemap<Region = R>,
    {
        config.validate()?;

        let regs = remap
            .ioremap_nocache(config.base, config.region_size())
            .ok_or(Error::MapFailed)?;

        let ictlr = Self { regs, config };
        ictlr.reset_defaults();

        log::info!(
            "Tegra LIC: {} banks at {:#x}, IRQs {}-{} gated",
            config.bank_count,
            config.base,
            config.nr_local_irqs,
            config.nr_local_irqs + config.nr_gated_irqs() - 1
        );

        Ok(ictlr)
    }

    fn reset_defaults(&self) {
        for bank in 0..self.config.bank_count {
            self.writel(bank, regs::CPU_IER_CLR, !0);
            // FIQs are not supported by the hypervisor.
            self.writel(bank, regs::CPU_IEP_CLASS, 0);
        }
    }

    /// Layout in use
    pub fn config(&self) -> &IctlrConfig {
        &self.config
    }

    /// Locate a gated line, `None` for local lines
    ///
    /// Panics if `irq` lies beyond the last bank.
    pub fn line(&self, irq: IrqNumber) -> Option<IctlrLine> {
        let line = IctlrLine::from_irq(irq, &self.config)?;
        assert!(
            line.bank < self.config.bank_count,
            "IRQ {} maps to ICTLR bank {} of {}",
            irq,
            line.bank,
            self.config.bank_count
        );
        Some(line)
    }

    /// Gate or ungate `irq` in the ICTLR
    ///
    /// Local lines are left alone. One store to the bank's SET or CLR
    /// register, so concurrent calls for other lines do not race.
    pub fn set_interrupt_enable(&self, irq: IrqNumber, enabled: bool) {
        let Some(line) = self.line(irq) else {
            return;
        };

        let reg = if enabled {
            regs::CPU_IER_SET
        } else {
            regs::CPU_IER_CLR
        };

        log::debug!(
            "Tegra LIC: {} IRQ {} (bank {}, bit {})",
            if enabled { "enable" } else { "disable" },
            irq,
            line.bank,
            line.bit
        );

        self.writel(line.bank, reg, line.mask());
    }

    /// Whether `irq` can currently pass the ICTLR
    ///
    /// Local lines are never gated.
    pub fn is_interrupt_enabled(&self, irq: IrqNumber) -> bool {
        match self.line(irq) {
            Some(line) => self.readl(line.bank, regs::CPU_IER) & line.mask() != 0,
            None => true,
        }
    }

    /// Read a register of bank `bank`
    pub fn readl(&self, bank: usize, offset: usize) -> u32 {
        self.regs.read32(self.reg_offset(bank, offset))
    }

    /// Write a register of bank `bank`
    pub fn writel(&self, bank: usize, offset: usize, value: u32) {
        self.regs.write32(self.reg_offset(bank, offset), value)
    }

    fn reg_offset(&self, bank: usize, offset: usize) -> usize {
        assert!(bank < self.config.bank_count && offset < self.config.bank_size);
        bank * self.config.bank_size + offset
    }
}
