//! Utility functions
//!
//! Console and logging plumbing plus the CPU park loop used once the
//! platform has asked the hardware to reset.

pub mod console;
pub mod log;

pub use self::console::Console;
pub use self::log::ConsoleLogger;

/// Park the current CPU forever
#[inline]
pub fn halt() -> ! {
    loop {
        cfg_if::cfg_if! {
            if #[cfg(target_arch = "aarch64")] {
                aarch64_cpu::asm::wfe();
            } else {
                ::core::hint::spin_loop();
            }
        }
    }
}
