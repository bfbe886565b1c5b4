// nfcemu-rs/nfcemu/src/nci/commands.rs

use crate::Result;
use crate::nci::codes::*;
use crate::nci::parser::{byte_at, counted_entries, tlv_entries};
use crate::nci::rf::{RfInterfaceType, RfProtocol, RfTechMode};
use std::convert::TryFrom;

/// One entry of RF_DISCOVER_MAP_CMD
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiscoverMapping {
    pub protocol: RfProtocol,
    /// `MAP_MODE_POLL` and/or `MAP_MODE_LISTEN`
    pub mode: u8,
    pub interface: RfInterfaceType,
}

/// One entry of RF_DISCOVER_CMD
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiscoverConfig {
    pub tech_mode: RfTechMode,
    pub frequency: u8,
}

/// Decoded NCI control command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NciCommand {
    CoreReset { reset_type: u8 },
    CoreInit,
    CoreSetConfig { params: Vec<(u8, Vec<u8>)> },
    CoreGetConfig { ids: Vec<u8> },
    RfDiscoverMap { mappings: Vec<DiscoverMapping> },
    RfDiscover { configs: Vec<DiscoverConfig> },
    RfDeactivate { deactivation_type: u8 },
    /// A command this device does not implement
    Unsupported { gid: u8, oid: u8 },
}

impl NciCommand {
    /// Decode the payload of a command packet. Errors mean the payload does
    /// not match the layout required by `gid`/`oid`.
    pub fn decode(gid: u8, oid: u8, payload: &[u8]) -> Result<Self> {
        let cmd = match (gid, oid) {
            (GID_CORE, OID_CORE_RESET) => Self::CoreReset {
                reset_type: byte_at(payload, 0)?,
            },
            (GID_CORE, OID_CORE_INIT) => Self::CoreInit,
            (GID_CORE, OID_CORE_SET_CONFIG) => {
                let count = byte_at(payload, 0)? as usize;
                let params = tlv_entries(payload, 1, count)?
                    .into_iter()
                    .map(|(id, value)| (id, value.to_vec()))
                    .collect();
                Self::CoreSetConfig { params }
            }
            (GID_CORE, OID_CORE_GET_CONFIG) => Self::CoreGetConfig {
                ids: counted_entries(payload, 1)?.into_iter().map(|e| e[0]).collect(),
            },
            (GID_RF, OID_RF_DISCOVER_MAP) => {
                let mappings = counted_entries(payload, 3)?
                    .into_iter()
                    .map(|e| {
                        Ok(DiscoverMapping {
                            protocol: RfProtocol::try_from(e[0])?,
                            mode: e[1],
                            interface: RfInterfaceType::try_from(e[2])?,
                        })
                    })
                    .collect::<Result<Vec<_>>>()?;
                Self::RfDiscoverMap { mappings }
            }
            (GID_RF, OID_RF_DISCOVER) => {
                let configs = counted_entries(payload, 2)?
                    .into_iter()
                    .map(|e| {
                        Ok(DiscoverConfig {
                            tech_mode: RfTechMode::try_from(e[0])?,
                            frequency: e[1],
                        })
                    })
                    .collect::<Result<Vec<_>>>()?;
                Self::RfDiscover { configs }
            }
            (GID_RF, OID_RF_DEACTIVATE) => Self::RfDeactivate {
                deactivation_type: byte_at(payload, 0)?,
            },
            (gid, oid) => Self::Unsupported { gid, oid },
        };
        Ok(cmd)
    }

    /// Group and opcode this command was decoded from.
    pub fn gid_oid(&self) -> (u8, u8) {
        match self {
            Self::CoreReset { .. } => (GID_CORE, OID_CORE_RESET),
            Self::CoreInit => (GID_CORE, OID_CORE_INIT),
            Self::CoreSetConfig { .. } => (GID_CORE, OID_CORE_SET_CONFIG),
            Self::CoreGetConfig { .. } => (GID_CORE, OID_CORE_GET_CONFIG),
            Self::RfDiscoverMap { .. } => (GID_RF, OID_RF_DISCOVER_MAP),
            Self::RfDiscover { .. } => (GID_RF, OID_RF_DISCOVER),
            Self::RfDeactivate { .. } => (GID_RF, OID_RF_DEACTIVATE),
            Self::Unsupported { gid, oid } => (*gid, *oid),
        }
    }
}
