//! NFC device defaults and configuration-parameter layout

use crate::nci::rf::{RfInterfaceType, RfProtocol, RfTechMode};

/// RF interfaces reported in CORE_INIT_RSP
pub const SUPPORTED_INTERFACES: &[RfInterfaceType] =
    &[RfInterfaceType::Frame, RfInterfaceType::NfcDep];

/// Logical connections besides the static RF connection
pub const MAX_LOGICAL_CONNECTIONS: u8 = 1;

/// Credits granted for the static RF connection
pub const RF_CONN_CREDITS: u8 = 1;

/// Interface table installed at power-up, in lookup order.
pub const DEFAULT_RF_TABLE: [(RfProtocol, RfTechMode, RfInterfaceType); 8] = [
    (RfProtocol::NfcDep, RfTechMode::PassivePollA, RfInterfaceType::NfcDep),
    (RfProtocol::NfcDep, RfTechMode::PassivePollF, RfInterfaceType::NfcDep),
    (RfProtocol::NfcDep, RfTechMode::PassiveListenA, RfInterfaceType::NfcDep),
    (RfProtocol::NfcDep, RfTechMode::PassiveListenF, RfInterfaceType::NfcDep),
    (RfProtocol::T1t, RfTechMode::PassivePollA, RfInterfaceType::Frame),
    (RfProtocol::T2t, RfTechMode::PassivePollA, RfInterfaceType::Frame),
    (RfProtocol::T3t, RfTechMode::PassivePollF, RfInterfaceType::Frame),
    (RfProtocol::IsoDep, RfTechMode::PassivePollA, RfInterfaceType::Frame),
];

/// Configuration parameters known to CORE_SET_CONFIG/CORE_GET_CONFIG:
/// `(id, offset, max_len)`. Each parameter occupies a length byte at
/// `offset` followed by up to `max_len` value bytes in the 128-byte blob.
pub const CONFIG_PARAMS: &[(u8, usize, usize)] = &[
    (0x00, 0, 2),   // TOTAL_DURATION
    (0x01, 3, 1),   // CON_DEVICES_LIMIT
    (0x08, 5, 1),   // PA_BAIL_OUT
    (0x11, 7, 1),   // PB_BAIL_OUT
    (0x18, 9, 1),   // PF_BIT_RATE
    (0x28, 11, 1),  // PN_NFC_DEP_SPEED
    (0x29, 13, 20), // PN_ATR_REQ_GEN_BYTES
    (0x30, 34, 1),  // LA_BIT_FRAME_SDD
    (0x32, 36, 1),  // LA_SEL_INFO
    (0x50, 38, 1),  // LF_PROTOCOL_TYPE
    (0x58, 40, 1),  // LI_FWI
    (0x60, 42, 1),  // LN_WT
    (0x61, 44, 20), // LN_ATR_RES_GEN_BYTES
    (0x80, 65, 1),  // RF_FIELD_INFO
    (0x81, 67, 1),  // RF_NFCEE_ACTION
    (0x82, 69, 1),  // NFCDEP_OP
];

/// Look up the blob slot of a configuration parameter.
pub fn config_slot(id: u8) -> Option<(usize, usize)> {
    CONFIG_PARAMS
        .iter()
        .find(|(pid, _, _)| *pid == id)
        .map(|(_, off, len)| (*off, *len))
}
