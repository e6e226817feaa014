//! ARM64 (AArch64) Architecture Support for Ferrovisor
//!
//! This module provides the ARM64 pieces the Tegra port needs:
//! - Device tree interrupt descriptions
//! - Board and SoC platform support
//!
//! ## References
//! - [ARM Generic Interrupt Controller Architecture Specification](https://developer.arm.com/documentation/ihi0069/latest)
//! - [Device Tree Specification](https://www.devicetree.org/)

pub mod devtree;
pub mod platform;

/// ARM64 architecture version
pub const ARCH_VERSION: &str = "arm64";
