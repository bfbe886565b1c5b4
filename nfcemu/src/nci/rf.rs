// nfcemu-rs/nfcemu/src/nci/rf.rs
//! RF protocol, technology/mode and interface codes.

use crate::Error;
use std::convert::TryFrom;

macro_rules! nci_code {
    (
        $(#[$meta:meta])*
        pub enum $name:ident { $($variant:ident = $value:expr),+ $(,)? }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        #[repr(u8)]
        pub enum $name {
            $($variant = $value),+
        }

        impl TryFrom<u8> for $name {
            type Error = Error;

            fn try_from(value: u8) -> Result<Self, Self::Error> {
                match value {
                    $(v if v == $value => Ok(Self::$variant),)+
                    other => Err(Error::FrameFormat(format!(
                        concat!("unknown ", stringify!($name), " {:#04x}"),
                        other
                    ))),
                }
            }
        }
    };
}

nci_code! {
    /// RF protocol
    pub enum RfProtocol {
        Undetermined = 0x00,
        T1t = 0x01,
        T2t = 0x02,
        T3t = 0x03,
        IsoDep = 0x04,
        NfcDep = 0x05,
    }
}

nci_code! {
    /// RF technology and mode
    pub enum RfTechMode {
        PassivePollA = 0x00,
        PassivePollB = 0x01,
        PassivePollF = 0x02,
        ActivePollA = 0x03,
        ActivePollF = 0x05,
        PassiveListenA = 0x80,
        PassiveListenB = 0x81,
        PassiveListenF = 0x82,
        ActiveListenA = 0x83,
        ActiveListenF = 0x85,
    }
}

nci_code! {
    /// RF interface
    pub enum RfInterfaceType {
        NfceeDirect = 0x00,
        Frame = 0x01,
        IsoDep = 0x02,
        NfcDep = 0x03,
    }
}

impl RfTechMode {
    pub fn is_listen(&self) -> bool {
        (*self as u8) & 0x80 != 0
    }

    pub fn is_poll(&self) -> bool {
        !self.is_listen()
    }
}

/// RF_DISCOVER_MAP mode bits
pub const MAP_MODE_POLL: u8 = 0x01;
pub const MAP_MODE_LISTEN: u8 = 0x02;
