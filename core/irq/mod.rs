//! Interrupt handling interfaces
//!
//! Types shared between the generic interrupt layer and platform code, and
//! the GIC routing service the platform layer builds on.

use crate::core::vmm::{DomainId, DomainInfo};
use crate::Result;

/// Interrupt number type
pub type IrqNumber = u32;

/// SGIs and PPIs: GIC lines wired straight to each CPU interface
pub const NR_LOCAL_IRQS: IrqNumber = 32;

/// Interrupt descriptor
///
/// Owned by the generic interrupt layer. Platform code only looks at the
/// line number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IrqDesc {
    /// Global (GIC) interrupt number
    pub irq: IrqNumber,
}

impl IrqDesc {
    /// Create a new interrupt descriptor
    pub const fn new(irq: IrqNumber) -> Self {
        Self { irq }
    }

    /// Whether this line is wired directly to the GIC CPU interfaces
    pub const fn is_local(&self) -> bool {
        self.irq < NR_LOCAL_IRQS
    }
}

/// GIC routing primitives
///
/// Programs delivery and priority in the primary interrupt controller. The
/// implementation validates the line and the priority.
pub trait GicRouting {
    /// Deliver `desc` to the hypervisor at `priority`
    fn route_irq_to_hypervisor(&self, desc: &mut IrqDesc, priority: u32);

    /// Deliver `desc` to domain `d` as virtual IRQ `virq`
    fn route_irq_to_guest(
        &self,
        d: &dyn DomainInfo,
        virq: u32,
        desc: &mut IrqDesc,
        priority: u32,
    ) -> Result<()>;
}

/// Lookup of the domain a physical IRQ is currently routed to
pub trait IrqOwnership {
    /// Owning domain of `irq`, `None` for lines kept by the hypervisor or
    /// not routed at all
    fn irq_domain_id(&self, irq: IrqNumber) -> Option<DomainId>;

    /// Whether `irq` is routed to domain `d`
    fn irq_owned_by(&self, irq: IrqNumber, d: &dyn DomainInfo) -> bool {
        self.irq_domain_id(irq) == Some(d.domain_id())
    }
}
