// fixtures.rs - provides commonly used test packets and PDUs

use nfcemu::llcp::{Pdu, PduType};
use nfcemu::llcp::param::{Param, encode_params};
use nfcemu::nci::NciPacket;
use nfcemu::Sap;

pub fn sample_nfcid3() -> [u8; 10] {
    [0x01, 0xfe, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08, 0x09]
}

/// Peer SAP used for the first test connection
pub fn peer_sap() -> Sap {
    Sap::new_unchecked(0x20)
}

/// Second, independent peer SAP
pub fn other_peer_sap() -> Sap {
    Sap::new_unchecked(0x21)
}

/// CORE_RESET_CMD, reset configuration
pub fn core_reset_cmd() -> Vec<u8> {
    hex::decode("20000101").unwrap()
}

/// CORE_INIT_CMD
pub fn core_init_cmd() -> Vec<u8> {
    hex::decode("200100").unwrap()
}

/// RF_DISCOVER_CMD polling NFC-A passive once per period
pub fn rf_discover_cmd() -> Vec<u8> {
    hex::decode("210303010001").unwrap()
}

/// RF_DEACTIVATE_CMD to idle
pub fn rf_deactivate_idle_cmd() -> Vec<u8> {
    hex::decode("21060100").unwrap()
}

/// CONNECT from `ssap` to the SNEP server, advertising `rw`
pub fn connect_to_snep(ssap: Sap, rw: u8) -> Vec<u8> {
    Pdu::new(Sap::SNEP, PduType::Connect, ssap)
        .with_info(encode_params(&[Param::Rw(rw)]).unwrap())
        .encode()
        .unwrap()
}

/// CONNECT by service name through the SDP SAP
pub fn connect_by_name(ssap: Sap, name: &str) -> Vec<u8> {
    Pdu::new(Sap::SDP, PduType::Connect, ssap)
        .with_info(encode_params(&[Param::Sn(name.as_bytes().to_vec())]).unwrap())
        .encode()
        .unwrap()
}

pub fn i_frame_to_snep(ssap: Sap, ns: u8, nr: u8, info: &[u8]) -> Vec<u8> {
    Pdu::i_frame(Sap::SNEP, ssap, ns, nr, info.to_vec())
        .unwrap()
        .encode()
        .unwrap()
}

/// Wrap an LLCP PDU in an NCI data packet on the static RF connection
pub fn nci_data(pdu: Vec<u8>) -> NciPacket {
    NciPacket::data(0, pdu)
}
