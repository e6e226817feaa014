//! Platform-specific support for ARM64
//!
//! A platform bundles the SoC quirks the generic interrupt layer must defer
//! to: which interrupt parents it can route through, what else has to
//! happen when a line is routed, and how to reset the board.

pub mod tegra;

use crate::arch::arm64::devtree::{DtDevice, RawIrq};
use crate::core::irq::IrqDesc;
use crate::core::vmm::DomainInfo;
use crate::Result;

/// Static platform description, matched against the root node
#[derive(Debug, Clone, Copy)]
pub struct PlatformDesc {
    /// Human readable name
    pub name: &'static str,
    /// Root node compatible strings this platform handles
    pub compatible: &'static [&'static str],
    /// Devices that must never be passed through to the hardware domain
    pub blacklist_dev: &'static [&'static str],
}

impl PlatformDesc {
    /// Whether the root node `root` describes this platform
    pub fn matches<N: DtDevice>(&self, root: &N) -> bool {
        self.compatible.iter().any(|c| root.is_compatible(c))
    }

    /// Whether `node` is on the passthrough blacklist
    pub fn is_blacklisted<N: DtDevice>(&self, node: &N) -> bool {
        self.blacklist_dev.iter().any(|c| node.is_compatible(c))
    }
}

/// Platform hooks called by the generic interrupt and boot code
pub trait Platform {
    /// Static description
    const DESC: PlatformDesc;

    /// Whether `rirq` can be routed through the primary interrupt
    /// controller described by `gic`
    fn irq_is_routable<N: DtDevice>(&self, rirq: &RawIrq<'_, N>, gic: &N) -> bool;

    /// Route `desc` to the hypervisor
    fn route_irq_to_hypervisor(&self, desc: &mut IrqDesc, priority: u32);

    /// Route `desc` to domain `d` as virtual IRQ `virq`
    fn route_irq_to_guest(
        &self,
        d: &dyn DomainInfo,
        virq: u32,
        desc: &mut IrqDesc,
        priority: u32,
    ) -> Result<()>;

    /// Reset the board. Never returns.
    fn reset(&self) -> !;
}
