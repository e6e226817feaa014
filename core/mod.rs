//! Core hypervisor interfaces
//!
//! The pieces of the hypervisor core the platform layer talks to: interrupt
//! descriptors and the GIC routing service, domains, and MMIO mapping.
//! Their implementations live outside this crate.

pub mod irq;
pub mod mm;
pub mod vmm;
