// nfcemu-rs/nfcemu/src/types.rs

use crate::Error;
use derive_more::{Display, Into};
use std::convert::TryFrom;

/// LLCP service access point (6 bits)
#[derive(Debug, Display, Into, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Sap(u8);

impl Sap {
    /// Link management; never used for data transfer
    pub const LM: Self = Self(0x00);
    /// Service discovery protocol
    pub const SDP: Self = Self(0x01);
    /// Simple NDEF exchange protocol
    pub const SNEP: Self = Self(0x04);

    /// Number of addressable SAPs
    pub const COUNT: usize = 64;

    pub const fn new_unchecked(value: u8) -> Self {
        Self(value & 0x3f)
    }

    pub fn as_u8(&self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for Sap {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        if value as usize >= Self::COUNT {
            return Err(Error::InvalidSap(value));
        }
        Ok(Self(value))
    }
}

/// Identifier of an emulated controller instance in a registry
#[derive(Debug, Display, Into, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct InstanceId(u32);

impl InstanceId {
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    pub fn as_u32(&self) -> u32 {
        self.0
    }
}

/// Which exchange buffer a deferred delivery fills
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BufKind {
    Notification,
    Data,
}
