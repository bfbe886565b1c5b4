//! Hexadecimal helpers used for trace logging.
//!
//! `Hex` formats lazily, so wrapping a buffer in `log::trace!` costs nothing
//! unless the trace level is enabled.

use std::fmt;

/// Display adapter that renders a byte slice as spaced lowercase hex.
///
/// Example: `Hex(&[0xde, 0xad])` -> `"de ad"`
pub struct Hex<'a>(pub &'a [u8]);

impl fmt::Display for Hex<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, b) in self.0.iter().enumerate() {
            if i != 0 {
                f.write_str(" ")?;
            }
            write!(f, "{:02x}", b)?;
        }
        Ok(())
    }
}
