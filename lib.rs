//! Ferrovisor Tegra platform support
//!
//! Interrupt routing for NVIDIA Tegra K1/X1 systems running under the
//! Ferrovisor hypervisor. The GIC is authoritative for delivery; the Tegra
//! legacy interrupt controller (ICTLR) sits in front of it for every shared
//! peripheral line and must be kept in step with every routing decision.

#![cfg_attr(not(test), no_std)]

// Core modules
pub mod utils;
pub mod config;

// Architecture-specific code
pub mod arch;

// Core hypervisor interfaces consumed by the platform layer
pub mod core;

#[cfg(feature = "arch_arm64")]
pub use arch::arm64::platform::{tegra::Tegra, Platform, PlatformDesc};
pub use config::{IctlrConfig, PlatformConfig, ResetConfig};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Common error type for Ferrovisor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// Invalid argument
    InvalidArgument,
    /// Not found
    NotFound,
    /// Permission denied
    PermissionDenied,
    /// Resource busy
    ResourceBusy,
    /// Not initialized
    NotInitialized,
    /// Invalid state
    InvalidState,
    /// An MMIO region could not be mapped
    MapFailed,
    /// A trapped guest access had a bad size or alignment
    InvalidAccess,
    /// Error code reported by the GIC routing layer
    Gic(i32),
}

impl ::core::fmt::Display for Error {
    fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
        match self {
            Error::InvalidArgument => f.write_str("invalid argument"),
            Error::NotFound => f.write_str("not found"),
            Error::PermissionDenied => f.write_str("permission denied"),
            Error::ResourceBusy => f.write_str("resource busy"),
            Error::NotInitialized => f.write_str("not initialized"),
            Error::InvalidState => f.write_str("invalid state"),
            Error::MapFailed => f.write_str("failed to map MMIO region"),
            Error::InvalidAccess => f.write_str("invalid MMIO access"),
            Error::Gic(rc) => write!(f, "GIC routing error {}", rc),
        }
    }
}

/// Result type alias
pub type Result<T> = ::core::result::Result<T, Error>;
