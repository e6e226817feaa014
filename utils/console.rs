//! Console output functionality
//!
//! The sink the logger writes to. Board code supplies the UART behind it.

use core::fmt;

/// Console interface trait
pub trait Console: Sync {
    /// Write a single character
    fn write_char(&self, c: u8);

    /// Write a buffer of characters
    fn write(&self, buf: &[u8]) {
        for &c in buf {
            self.write_char(c);
        }
    }

    /// Flush any buffered output
    fn flush(&self) {}
}

/// Adapter so `core::fmt` machinery can target a [`Console`]
pub struct ConsoleWriter<'a, C: Console + ?Sized>(pub &'a C);

impl<C: Console + ?Sized> fmt::Write for ConsoleWriter<'_, C> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        for &c in s.as_bytes() {
            // Serial terminals expect CRLF.
            if c == b'\n' {
                self.0.write_char(b'\r');
            }
            self.0.write_char(c);
        }
        Ok(())
    }
}
