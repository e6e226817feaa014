//! Architecture support

// Platform code is plain MMIO and builds on any host; the `arch_arm64`
// feature selects it rather than the target triple.
#[cfg(feature = "arch_arm64")]
pub mod arm64;
