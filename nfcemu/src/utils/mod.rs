//! Utilities for nfcemu: small, reusable helpers used across the crate.
//!
//! Currently only hex formatting for trace logging of register buffers and
//! LLCP PDUs.

pub mod hex;

pub use hex::*;
