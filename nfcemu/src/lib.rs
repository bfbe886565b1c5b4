// nfcemu-rs/nfcemu/src/lib.rs

//! nfcemu
//!
//! Emulated memory-mapped NFC controller speaking NCI/HCI, with the LLCP
//! data-link layer that runs over its NFC-DEP data channel.

pub mod constants;
pub mod controller;
pub mod device;
pub mod error;
pub mod hci;
pub mod llcp;
pub mod nci;
pub mod prelude;
pub mod test_support;
pub mod types;
pub mod utils;

// Re-export common types at crate root so `crate::Error`, `crate::Result`,
// and the newtypes in `types` are available for consumers and for
// convenient `prelude` re-exports.
pub use crate::error::*;
pub use crate::types::*;

pub use prelude::*;
