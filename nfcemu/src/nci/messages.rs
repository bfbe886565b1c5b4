// nfcemu-rs/nfcemu/src/nci/messages.rs
//! Builders for the responses and notifications the device produces.

use crate::constants::MAX_NCI_PAYLOAD_LEN;
use crate::nci::codes::*;
use crate::nci::packet::NciPacket;
use crate::nci::rf::{RfInterfaceType, RfProtocol, RfTechMode};

/// Response carrying only a status byte.
pub fn status_rsp(gid: u8, oid: u8, status: u8) -> NciPacket {
    NciPacket::response(gid, oid, vec![status])
}

pub fn core_reset_rsp(status: u8, config_reset: bool) -> NciPacket {
    NciPacket::response(
        GID_CORE,
        OID_CORE_RESET,
        vec![status, NCI_VERSION_1_0, u8::from(config_reset)],
    )
}

/// CORE_INIT_RSP (NCI 1.0 layout).
pub fn core_init_rsp(status: u8, interfaces: &[RfInterfaceType], max_connections: u8) -> NciPacket {
    let mut p = Vec::with_capacity(17 + interfaces.len());
    p.push(status);
    // NFCC features: nothing optional supported
    p.extend_from_slice(&[0x00, 0x00, 0x00, 0x00]);
    p.push(interfaces.len() as u8);
    p.extend(interfaces.iter().map(|i| *i as u8));
    p.push(max_connections);
    // max routing table size
    p.extend_from_slice(&0u16.to_le_bytes());
    p.push(MAX_NCI_PAYLOAD_LEN as u8);
    // max size for large parameters
    p.extend_from_slice(&0u16.to_le_bytes());
    // manufacturer id, then 4 bytes manufacturer specific info
    p.push(0x00);
    p.extend_from_slice(&[0x00; 4]);
    NciPacket::response(GID_CORE, OID_CORE_INIT, p)
}

pub fn core_set_config_rsp(status: u8, invalid_ids: &[u8]) -> NciPacket {
    let mut p = vec![status, invalid_ids.len() as u8];
    p.extend_from_slice(invalid_ids);
    NciPacket::response(GID_CORE, OID_CORE_SET_CONFIG, p)
}

/// CORE_GET_CONFIG_RSP. On `STATUS_INVALID_PARAM` the entries are the
/// offending ids with zero-length values.
pub fn core_get_config_rsp(status: u8, params: &[(u8, Vec<u8>)]) -> NciPacket {
    let mut p = vec![status, params.len() as u8];
    for (id, value) in params {
        p.push(*id);
        p.push(value.len() as u8);
        p.extend_from_slice(value);
    }
    NciPacket::response(GID_CORE, OID_CORE_GET_CONFIG, p)
}

pub fn core_conn_credits_ntf(conn_id: u8, credits: u8) -> NciPacket {
    NciPacket::notification(GID_CORE, OID_CORE_CONN_CREDITS, vec![1, conn_id, credits])
}

pub fn core_generic_error_ntf(status: u8) -> NciPacket {
    NciPacket::notification(GID_CORE, OID_CORE_GENERIC_ERROR, vec![status])
}

pub fn core_interface_error_ntf(status: u8, conn_id: u8) -> NciPacket {
    NciPacket::notification(GID_CORE, OID_CORE_INTERFACE_ERROR, vec![status, conn_id])
}

pub fn rf_deactivate_ntf(deactivation_type: u8, reason: u8) -> NciPacket {
    NciPacket::notification(GID_RF, OID_RF_DEACTIVATE, vec![deactivation_type, reason])
}

/// Fields of RF_INTF_ACTIVATED_NTF
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Activation {
    pub discovery_id: u8,
    pub interface: RfInterfaceType,
    pub protocol: RfProtocol,
    pub tech_mode: RfTechMode,
    pub max_payload: u8,
    pub credits: u8,
    pub tech_params: Vec<u8>,
    pub exchange_mode: RfTechMode,
    pub tx_rate: u8,
    pub rx_rate: u8,
    pub activation_params: Vec<u8>,
}

pub fn rf_intf_activated_ntf(a: &Activation) -> NciPacket {
    let mut p = Vec::with_capacity(11 + a.tech_params.len() + a.activation_params.len());
    p.push(a.discovery_id);
    p.push(a.interface as u8);
    p.push(a.protocol as u8);
    p.push(a.tech_mode as u8);
    p.push(a.max_payload);
    p.push(a.credits);
    p.push(a.tech_params.len() as u8);
    p.extend_from_slice(&a.tech_params);
    p.push(a.exchange_mode as u8);
    p.push(a.tx_rate);
    p.push(a.rx_rate);
    p.push(a.activation_params.len() as u8);
    p.extend_from_slice(&a.activation_params);
    NciPacket::notification(GID_RF, OID_RF_INTF_ACTIVATED, p)
}

/// NFC-DEP activation parameters: length-prefixed ATR_RES starting at
/// NFCID3, followed by DID, BS, BR, TO, PP and the general bytes.
pub fn nfc_dep_activation_params(nfcid3: &[u8; 10], general_bytes: &[u8]) -> Vec<u8> {
    // DID 0, BS 0, BR 0, TO 0x0e, PP: LR=256 bytes, Gi present
    let atr_res_len = nfcid3.len() + 5 + general_bytes.len();
    let mut p = Vec::with_capacity(1 + atr_res_len);
    p.push(atr_res_len as u8);
    p.extend_from_slice(nfcid3);
    p.extend_from_slice(&[0x00, 0x00, 0x00, 0x0e, 0x32]);
    p.extend_from_slice(general_bytes);
    p
}
