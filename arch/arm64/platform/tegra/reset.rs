//! Tegra board reset through the PMC

use bitflags::bitflags;

use crate::config::ResetConfig;
use crate::core::mm::{IoRemap, MmioAccess};
use crate::{Error, Result};

bitflags! {
    /// PMC_CNTRL bits
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct PmcControl: u32 {
        /// Assert the SoC main reset
        const MAIN_RST = 1 << 4;
    }
}

/// PMC main reset trigger
#[derive(Debug, Clone, Copy)]
pub struct ResetController {
    config: ResetConfig,
}

impl ResetController {
    /// Create a reset controller for `config`
    pub const fn new(config: ResetConfig) -> Self {
        Self { config }
    }

    /// Set the reset bits in the PMC control register
    ///
    /// On real hardware the board resets before this returns. The mapping
    /// is deliberately leaked.
    pub fn trigger<M: IoRemap>(&self, remap: &M) -> Result<()> {
        let Some(reg) = remap.ioremap_nocache(self.config.base, self.config.size) else {
            log::error!("Tegra: Unable to map tegra reset address. Reset failed!");
            return Err(Error::MapFailed);
        };

        let mut cntrl = PmcControl::from_bits_retain(reg.read32(0));
        cntrl.insert(PmcControl::from_bits_retain(self.config.mask));
        reg.write32(0, cntrl.bits());

        Ok(())
    }
}
