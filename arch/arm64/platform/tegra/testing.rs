//! Test doubles for the Tegra platform code
//!
//! `SimIctlr` behaves like the hardware register file: stores to the SET
//! and CLR registers update the enable status register instead of being
//! stored, and every store is counted.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, AtomicUsize, Ordering};
use std::sync::Mutex;

use super::ictlr::regs;
use crate::config::IctlrConfig;
use crate::core::irq::{GicRouting, IrqDesc, IrqNumber, IrqOwnership};
use crate::core::mm::{IoRemap, MmioAccess, PhysAddr};
use crate::core::vmm::{DomainId, DomainInfo, DomainMmio};
use crate::{Error, Result};

/// Simulated ICTLR register file
#[derive(Debug)]
pub struct SimIctlr {
    config: IctlrConfig,
    words: Vec<AtomicU32>,
    writes: AtomicUsize,
    log: Mutex<Vec<(usize, u32)>>,
}

impl SimIctlr {
    pub fn new(config: IctlrConfig) -> Self {
        Self {
            config,
            words: (0..config.region_size() / 4).map(|_| AtomicU32::new(0)).collect(),
            writes: AtomicUsize::new(0),
            log: Mutex::new(Vec::new()),
        }
    }

    /// Set every register to `value` behind the driver's back
    pub fn fill(&self, value: u32) {
        for word in &self.words {
            word.store(value, Ordering::SeqCst);
        }
    }

    /// Raw register value
    pub fn reg(&self, bank: usize, offset: usize) -> u32 {
        self.words[(bank * self.config.bank_size + offset) / 4].load(Ordering::SeqCst)
    }

    /// Set a register behind the driver's back
    pub fn poke(&self, bank: usize, offset: usize, value: u32) {
        self.words[(bank * self.config.bank_size + offset) / 4].store(value, Ordering::SeqCst);
    }

    /// Whole register file
    pub fn snapshot(&self) -> Vec<u32> {
        self.words.iter().map(|w| w.load(Ordering::SeqCst)).collect()
    }

    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    /// Stores as `(offset into the window, value)`
    pub fn log(&self) -> Vec<(usize, u32)> {
        self.log.lock().unwrap().clone()
    }

    pub fn clear_log(&self) {
        self.log.lock().unwrap().clear();
    }
}

impl MmioAccess for SimIctlr {
    fn read32(&self, offset: usize) -> u32 {
        match offset % self.config.bank_size {
            // Write-only registers read as zero.
            regs::CPU_IER_SET | regs::CPU_IER_CLR => 0,
            _ => self.words[offset / 4].load(Ordering::SeqCst),
        }
    }

    fn write32(&self, offset: usize, value: u32) {
        assert!(offset % 4 == 0 && offset < self.config.region_size());
        self.writes.fetch_add(1, Ordering::SeqCst);
        self.log.lock().unwrap().push((offset, value));

        let bank_base = offset - offset % self.config.bank_size;
        let ier = &self.words[(bank_base + regs::CPU_IER) / 4];
        match offset % self.config.bank_size {
            regs::CPU_IER_SET => {
                ier.fetch_or(value, Ordering::SeqCst);
            }
            regs::CPU_IER_CLR => {
                ier.fetch_and(!value, Ordering::SeqCst);
            }
            // Status is read-only.
            regs::CPU_IER => {}
            _ => self.words[offset / 4].store(value, Ordering::SeqCst),
        }
    }
}

/// Remapper handing out a simulated device
#[derive(Debug)]
pub struct SimRemap<'a, T> {
    device: &'a T,
    fail: bool,
    requests: Mutex<Vec<(PhysAddr, usize)>>,
}

impl<'a, T> SimRemap<'a, T> {
    pub fn new(device: &'a T) -> Self {
        Self {
            device,
            fail: false,
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(device: &'a T) -> Self {
        Self {
            fail: true,
            ..Self::new(device)
        }
    }

    pub fn requests(&self) -> Vec<(PhysAddr, usize)> {
        self.requests.lock().unwrap().clone()
    }
}

impl<'a, T: MmioAccess> IoRemap for SimRemap<'a, T> {
    type Region = &'a T;

    fn ioremap_nocache(&self, paddr: PhysAddr, size: usize) -> Option<&'a T> {
        self.requests.lock().unwrap().push((paddr, size));
        if self.fail {
            None
        } else {
            Some(self.device)
        }
    }
}

/// A single plain register, e.g. the PMC control register
#[derive(Debug, Default)]
pub struct SimRegister {
    value: AtomicU32,
    writes: Mutex<Vec<u32>>,
}

impl SimRegister {
    pub fn with_value(value: u32) -> Self {
        Self {
            value: AtomicU32::new(value),
            writes: Mutex::new(Vec::new()),
        }
    }

    pub fn writes(&self) -> Vec<u32> {
        self.writes.lock().unwrap().clone()
    }
}

impl MmioAccess for SimRegister {
    fn read32(&self, offset: usize) -> u32 {
        assert_eq!(offset, 0);
        self.value.load(Ordering::SeqCst)
    }

    fn write32(&self, offset: usize, value: u32) {
        assert_eq!(offset, 0);
        self.writes.lock().unwrap().push(value);
        self.value.store(value, Ordering::SeqCst);
    }
}

/// Recorded GIC routing request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GicCall {
    Hypervisor { irq: IrqNumber, priority: u32 },
    Guest { domain: DomainId, virq: u32, irq: IrqNumber, priority: u32 },
}

/// GIC routing service that records requests
#[derive(Debug, Default)]
pub struct FakeGic<'a> {
    fail_with: Option<Error>,
    calls: Mutex<Vec<GicCall>>,
    // ICTLR store count seen at each call, to check ordering.
    observed: Option<&'a SimIctlr>,
    writes_at_call: Mutex<Vec<usize>>,
}

impl<'a> FakeGic<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing(err: Error) -> Self {
        Self {
            fail_with: Some(err),
            ..Self::default()
        }
    }

    pub fn observing(sim: &'a SimIctlr) -> Self {
        Self {
            observed: Some(sim),
            ..Self::default()
        }
    }

    pub fn calls(&self) -> Vec<GicCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn writes_at_call(&self) -> Vec<usize> {
        self.writes_at_call.lock().unwrap().clone()
    }

    fn record(&self, call: GicCall) {
        self.calls.lock().unwrap().push(call);
        if let Some(sim) = self.observed {
            self.writes_at_call.lock().unwrap().push(sim.write_count());
        }
    }
}

impl GicRouting for FakeGic<'_> {
    fn route_irq_to_hypervisor(&self, desc: &mut IrqDesc, priority: u32) {
        self.record(GicCall::Hypervisor { irq: desc.irq, priority });
    }

    fn route_irq_to_guest(
        &self,
        d: &dyn DomainInfo,
        virq: u32,
        desc: &mut IrqDesc,
        priority: u32,
    ) -> Result<()> {
        self.record(GicCall::Guest {
            domain: d.domain_id(),
            virq,
            irq: desc.irq,
            priority,
        });
        match self.fail_with {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

/// Domain with a fixed id
#[derive(Debug, Clone, Copy)]
pub struct FakeDomain(pub DomainId);

impl DomainInfo for FakeDomain {
    fn domain_id(&self) -> DomainId {
        self.0
    }
}

/// IRQ ownership table
#[derive(Debug, Default)]
pub struct FakeOwners {
    owners: HashMap<IrqNumber, DomainId>,
}

impl FakeOwners {
    pub fn assign(&mut self, irq: IrqNumber, domain: DomainId) {
        self.owners.insert(irq, domain);
    }
}

impl IrqOwnership for FakeOwners {
    fn irq_domain_id(&self, irq: IrqNumber) -> Option<DomainId> {
        self.owners.get(&irq).copied()
    }
}

/// Recorded stage-2 / trap management request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MmioCall {
    Deny { start_pfn: u64, end_pfn: u64 },
    Unmap { gfn: u64, nr: u64, mfn: u64 },
    Register { addr: u64, size: usize },
}

/// Domain MMIO manager that records requests
#[derive(Debug, Default)]
pub struct FakeDomainMmio {
    fail_deny: Option<Error>,
    fail_unmap: Option<Error>,
    calls: Mutex<Vec<MmioCall>>,
}

impl FakeDomainMmio {
    pub fn failing_deny(err: Error) -> Self {
        Self {
            fail_deny: Some(err),
            ..Self::default()
        }
    }

    pub fn failing_unmap(err: Error) -> Self {
        Self {
            fail_unmap: Some(err),
            ..Self::default()
        }
    }

    pub fn calls(&self) -> Vec<MmioCall> {
        self.calls.lock().unwrap().clone()
    }
}

impl DomainMmio for FakeDomainMmio {
    fn iomem_deny_access(&self, start_pfn: u64, end_pfn: u64) -> Result<()> {
        self.calls.lock().unwrap().push(MmioCall::Deny { start_pfn, end_pfn });
        self.fail_deny.map_or(Ok(()), Err)
    }

    fn unmap_mmio_regions(&self, gfn: u64, nr: u64, mfn: u64) -> Result<()> {
        self.calls.lock().unwrap().push(MmioCall::Unmap { gfn, nr, mfn });
        self.fail_unmap.map_or(Ok(()), Err)
    }

    fn register_mmio_handler(&self, addr: u64, size: usize) {
        self.calls.lock().unwrap().push(MmioCall::Register { addr, size });
    }
}
