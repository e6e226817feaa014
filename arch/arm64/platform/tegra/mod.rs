//! NVIDIA Tegra K1 / X1 platform support
//!
//! Tegra puts a legacy interrupt controller (ICTLR) in front of the GIC for
//! every shared peripheral line. Routing a line therefore takes two steps:
//! program the GIC, then make sure the ICTLR does not gate the line for
//! whoever is meant to receive it.
//!
//! - The hypervisor masks through the GIC only, so its lines are always
//!   enabled in the ICTLR.
//! - The hardware domain runs its own ICTLR driver (through the mediator in
//!   [`mlic`]) and expects its lines to start out masked.
//! - Any other guest cannot see the ICTLR at all, so its lines are enabled
//!   on its behalf.

pub mod ictlr;
pub mod mlic;
pub mod reset;

#[cfg(test)]
pub(crate) mod testing;

use crate::arch::arm64::devtree::{compat, DtDevice, RawIrq};
use crate::arch::arm64::platform::{Platform, PlatformDesc};
use crate::config::PlatformConfig;
use crate::core::irq::{GicRouting, IrqDesc};
use crate::core::mm::IoRemap;
use crate::core::vmm::DomainInfo;
use crate::Result;

use self::ictlr::LegacyIctlr;
use self::mlic::{Mlic, MlicStats};
use self::reset::ResetController;

/// Legacy interrupt controllers lines may be routed through
///
/// The register interface is the same across these generations.
pub const ICTLR_COMPAT: &[&str] = &[compat::TEGRA124_ICTLR, compat::TEGRA210_ICTLR];

/// Root node compatibles handled by this platform
pub const TEGRA_DT_COMPAT: &[&str] = &[compat::TEGRA120, compat::TEGRA210];

/// Devices never passed through
///
/// The UARTs share a page, so handing any of them to the hardware domain
/// would also hand it the hypervisor console.
pub const TEGRA_BLACKLIST_DEV: &[&str] = &[compat::TEGRA20_UART];

/// Whether `rirq` comes from one of the supported legacy interrupt
/// controllers
pub fn irq_belongs_to_ictlr<N: DtDevice>(rirq: &RawIrq<'_, N>) -> bool {
    ICTLR_COMPAT.iter().any(|c| rirq.controller.is_compatible(c))
}

/// Tegra platform instance
///
/// Created once at boot by [`Tegra::init`]; the ICTLR mapping lives as long
/// as the hypervisor does.
pub struct Tegra<G: GicRouting, M: IoRemap> {
    gic: G,
    remap: M,
    ictlr: LegacyIctlr<M::Region>,
    reset: ResetController,
    mlic_stats: MlicStats,
}

impl<G: GicRouting, M: IoRemap> Tegra<G, M> {
    /// Bring up the Tegra platform
    ///
    /// Maps the ICTLR and masks every line it gates. The hypervisor cannot
    /// run safely without control over those lines, so failing to map it
    /// halts boot.
    pub fn init(gic: G, remap: M, config: PlatformConfig) -> Self {
        let ictlr = match LegacyIctlr::map(&remap, config.ictlr) {
            Ok(ictlr) => ictlr,
            Err(e) => panic!("Failed to map in the Tegra legacy interrupt controller: {}", e),
        };

        log::info!("Tegra platform initialized");

        Self {
            gic,
            remap,
            ictlr,
            reset: ResetController::new(config.reset),
            mlic_stats: MlicStats::default(),
        }
    }

    /// The legacy interrupt controller
    pub fn ictlr(&self) -> &LegacyIctlr<M::Region> {
        &self.ictlr
    }

    /// Mediator for the hardware domain's ICTLR accesses
    pub fn mlic(&self) -> Mlic<'_, M::Region> {
        Mlic::new(&self.ictlr, &self.mlic_stats)
    }

    /// Mediator access counters
    pub fn mlic_stats(&self) -> &MlicStats {
        &self.mlic_stats
    }
}

impl<G: GicRouting, M: IoRemap> Platform for Tegra<G, M> {
    const DESC: PlatformDesc = PlatformDesc {
        name: "Tegra",
        compatible: TEGRA_DT_COMPAT,
        blacklist_dev: TEGRA_BLACKLIST_DEV,
    };

    fn irq_is_routable<N: DtDevice>(&self, rirq: &RawIrq<'_, N>, gic: &N) -> bool {
        // Straight into the GIC.
        if rirq.is_from(gic) {
            return true;
        }

        // The ICTLR only gates GIC lines, so its interrupts are GIC
        // interrupts too.
        irq_belongs_to_ictlr(rirq)
    }

    fn route_irq_to_hypervisor(&self, desc: &mut IrqDesc, priority: u32) {
        self.gic.route_irq_to_hypervisor(desc, priority);

        if desc.is_local() {
            return;
        }

        self.ictlr.set_interrupt_enable(desc.irq, true);
    }

    fn route_irq_to_guest(
        &self,
        d: &dyn DomainInfo,
        virq: u32,
        desc: &mut IrqDesc,
        priority: u32,
    ) -> Result<()> {
        if let Err(rc) = self.gic.route_irq_to_guest(d, virq, desc, priority) {
            log::error!(
                "Tegra LIC: Couldn't program GIC to route vIRQ {} ({}).",
                desc.irq,
                rc
            );
            return Err(rc);
        }

        if desc.is_local() {
            return Ok(());
        }

        let enabled = !d.is_hardware_domain();
        log::debug!(
            "d{}: Tegra LIC: IRQ {} routed as vIRQ {}, {}",
            d.domain_id(),
            desc.irq,
            virq,
            if enabled { "unmasked" } else { "left masked" }
        );
        self.ictlr.set_interrupt_enable(desc.irq, enabled);

        Ok(())
    }

    fn reset(&self) -> ! {
        // Only returns if the PMC could not be mapped or the write did not
        // take; either way there is nothing left to do.
        let _ = self.reset.trigger(&self.remap);
        crate::utils::halt()
    }
}
