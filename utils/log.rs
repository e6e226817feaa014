//! Console logger for Ferrovisor
//!
//! A minimal `log::Log` backend suitable for a no_std hypervisor. Records
//! go straight to a [`Console`]; there is no buffering.

use core::fmt::Write;

use log::{LevelFilter, Log, Metadata, Record};

use crate::utils::console::{Console, ConsoleWriter};
use crate::{Error, Result};

/// Level selected by the `debug` / `verbose` features
pub const fn default_level() -> LevelFilter {
    if cfg!(feature = "verbose") {
        LevelFilter::Trace
    } else if cfg!(feature = "debug") {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    }
}

/// Logger writing `[LEVEL] target: message` lines to a console
pub struct ConsoleLogger<C: Console> {
    console: C,
    level: LevelFilter,
}

impl<C: Console> ConsoleLogger<C> {
    /// Create a logger at the feature-selected level
    pub const fn new(console: C) -> Self {
        Self {
            console,
            level: default_level(),
        }
    }

    /// Create a logger with an explicit level
    pub const fn with_level(console: C, level: LevelFilter) -> Self {
        Self { console, level }
    }

    /// Current maximum level
    pub fn level(&self) -> LevelFilter {
        self.level
    }
}

impl<C: Console + Send> Log for ConsoleLogger<C> {
    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record<'_>) {
        if !self.enabled(record.metadata()) {
            return;
        }

        let _ = writeln!(
            ConsoleWriter(&self.console),
            "[{:<5}] {}: {}",
            record.level(),
            record.target(),
            record.args()
        );
    }

    fn flush(&self) {
        self.console.flush();
    }
}

/// Install `logger` as the global logger
pub fn init<C: Console + Send>(logger: &'static ConsoleLogger<C>) -> Result<()> {
    log::set_logger(logger).map_err(|_| Error::InvalidState)?;
    log::set_max_level(logger.level());
    Ok(())
}
