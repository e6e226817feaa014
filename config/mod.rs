//! Configuration management
//!
//! Platform layout settings for the Tegra interrupt routing layer. The
//! defaults describe the register map shared by Tegra K1 and X1; nothing
//! here is read at runtime from the device tree.

use crate::core::irq::NR_LOCAL_IRQS;
use crate::{Error, Result};

/// Bytes of the per-bank register block the routing code touches
pub const ICTLR_MIN_BANK_SIZE: usize = 0x30;

/// Tegra legacy interrupt controller layout
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IctlrConfig {
    /// Physical base of the first ICTLR bank
    pub base: u64,
    /// Distance between two banks, in bytes
    pub bank_size: usize,
    /// Number of banks
    pub bank_count: usize,
    /// Lines gated by each bank
    pub irqs_per_bank: u32,
    /// GIC lines below this number are never gated by the ICTLR
    pub nr_local_irqs: u32,
}

impl IctlrConfig {
    /// Size of the whole ICTLR window
    pub const fn region_size(&self) -> usize {
        self.bank_size * self.bank_count
    }

    /// Number of GIC lines behind the ICTLR
    pub const fn nr_gated_irqs(&self) -> u32 {
        self.bank_count as u32 * self.irqs_per_bank
    }

    /// Reject layouts the register map cannot describe
    pub fn validate(&self) -> Result<()> {
        if self.bank_count == 0 {
            return Err(Error::InvalidArgument);
        }

        // Every bank carries a 32-bit mask per register.
        if self.irqs_per_bank != 32 {
            return Err(Error::InvalidArgument);
        }

        if self.bank_size < ICTLR_MIN_BANK_SIZE {
            return Err(Error::InvalidArgument);
        }

        if self.base % 4 != 0 {
            return Err(Error::InvalidArgument);
        }

        Ok(())
    }
}

impl Default for IctlrConfig {
    fn default() -> Self {
        Self {
            base: 0x6000_4000,
            bank_size: 0x100,
            bank_count: 6,
            irqs_per_bank: 32,
            nr_local_irqs: NR_LOCAL_IRQS,
        }
    }
}

/// PMC reset register location
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResetConfig {
    /// Physical address of the PMC control register
    pub base: u64,
    /// Bytes to map
    pub size: usize,
    /// Bits to set to trigger a main reset
    pub mask: u32,
}

impl Default for ResetConfig {
    fn default() -> Self {
        Self {
            base: 0x7000_e400,
            size: 4,
            mask: 0x10,
        }
    }
}

/// Global platform configuration
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PlatformConfig {
    /// Legacy interrupt controller
    pub ictlr: IctlrConfig,
    /// Reset controller
    pub reset: ResetConfig,
}

impl PlatformConfig {
    /// Validate the whole configuration
    pub fn validate(&self) -> Result<()> {
        self.ictlr.validate()?;

        if self.reset.size < 4 || self.reset.mask == 0 {
            return Err(Error::InvalidArgument);
        }

        Ok(())
    }
}
