//! ARM64 Device Tree Support
//!
//! The subset of device tree handling the platform layer relies on:
//! controller nodes, their `compatible` lists, and raw interrupt
//! specifiers as they come out of the `interrupts` property.
//!
//! Parsing the flattened tree itself happens elsewhere; this module only
//! describes what the parser hands over.
//!
//! ## References
//! - [Device Tree Specification](https://www.devicetree.org/)
//! - [Tegra ICTLR binding](https://www.kernel.org/doc/Documentation/devicetree/bindings/interrupt-controller/nvidia,tegra20-ictlr.txt)

use heapless::Vec;

use crate::core::irq::IrqNumber;
use crate::{Error, Result};

/// Device tree compatible strings
pub mod compat {
    /// ARM GIC-400 (GICv2)
    pub const GIC_400: &str = "arm,gic-400";
    /// Cortex-A15 GIC, as named on Tegra K1
    pub const CORTEX_A15_GIC: &str = "arm,cortex-a15-gic";

    /// Tegra K1 legacy interrupt controller
    pub const TEGRA124_ICTLR: &str = "nvidia,tegra124-ictlr";
    /// Tegra X1 legacy interrupt controller
    pub const TEGRA210_ICTLR: &str = "nvidia,tegra210-ictlr";

    /// Tegra K1 SoC
    pub const TEGRA120: &str = "nvidia,tegra120";
    /// Tegra X1 SoC
    pub const TEGRA210: &str = "nvidia,tegra210";

    /// Tegra 8250-style UART
    pub const TEGRA20_UART: &str = "nvidia,tegra20-uart";
}

/// Maximum number of entries kept from a `compatible` property
pub const MAX_COMPATIBLE: usize = 4;

/// A device tree node, as seen by interrupt routing
pub trait DtDevice {
    /// Whether the node's `compatible` list contains `compat`
    fn is_compatible(&self, compat: &str) -> bool;
}

/// Parsed device tree node
#[derive(Debug, Clone)]
pub struct DtNode<'a> {
    /// Node name
    pub name: &'a str,
    compatible: Vec<&'a str, MAX_COMPATIBLE>,
}

impl<'a> DtNode<'a> {
    /// Build a node from its `compatible` entries, most specific first
    pub fn new(name: &'a str, compatible: &[&'a str]) -> Result<Self> {
        let compatible = Vec::from_slice(compatible).map_err(|_| Error::InvalidArgument)?;
        Ok(Self { name, compatible })
    }

    /// Build a node from a raw `compatible` property: NUL separated strings,
    /// optionally NUL terminated
    pub fn from_stringlist(name: &'a str, raw: &'a str) -> Result<Self> {
        let mut compatible = Vec::new();
        for entry in raw.split('\0').filter(|s| !s.is_empty()) {
            compatible.push(entry).map_err(|_| Error::InvalidArgument)?;
        }
        Ok(Self { name, compatible })
    }

    /// `compatible` entries in property order
    pub fn compatible(&self) -> &[&'a str] {
        &self.compatible
    }
}

impl DtDevice for DtNode<'_> {
    fn is_compatible(&self, compat: &str) -> bool {
        self.compatible.iter().any(|c| *c == compat)
    }
}

/// Interrupt specifier as translated from the device tree
///
/// `controller` is the interrupt parent that produced the specifier; the
/// tree owns it.
#[derive(Debug)]
pub struct RawIrq<'a, N: DtDevice> {
    /// Interrupt parent node
    pub controller: &'a N,
    /// Global interrupt number
    pub irq: IrqNumber,
}

impl<N: DtDevice> Clone for RawIrq<'_, N> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<N: DtDevice> Copy for RawIrq<'_, N> {}

impl<'a, N: DtDevice> RawIrq<'a, N> {
    /// Create a raw interrupt
    pub const fn new(controller: &'a N, irq: IrqNumber) -> Self {
        Self { controller, irq }
    }

    /// Whether `node` is this interrupt's parent (same node, not merely an
    /// equal one)
    pub fn is_from(&self, node: &N) -> bool {
        core::ptr::eq(self.controller, node)
    }
}
