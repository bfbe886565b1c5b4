//! Test support helpers intended for use by unit and integration tests.
//!
//! These helpers play the host driver side of the register protocol so
//! tests across the crate and tests/ directory can reuse the same logic.
#![allow(dead_code)]

use crate::constants::*;
use crate::controller::Controller;
use crate::device::{DeviceState, NfcDevice, RemoteEndpoint};
use crate::hci::HciPacket;
use crate::nci::codes::{GID_CORE, GID_RF, OID_CORE_INIT, OID_CORE_RESET, OID_RF_DISCOVER};
use crate::nci::packet::NciPacket;
use crate::nci::rf::RfTechMode;
use crate::{Error, Result};

/// Write `bytes` one at a time starting at `offset`.
#[doc(hidden)]
pub fn write_bytes(ctrl: &mut Controller, offset: usize, bytes: &[u8]) -> Result<()> {
    for (i, b) in bytes.iter().enumerate() {
        ctrl.try_write(offset + i, *b)?;
    }
    Ok(())
}

/// Read `len` bytes one at a time starting at `offset`.
#[doc(hidden)]
pub fn read_bytes(ctrl: &Controller, offset: usize, len: usize) -> Result<Vec<u8>> {
    (offset..offset + len).map(|o| ctrl.try_read(o)).collect()
}

/// Load an NCI packet into `cmnd` and signal it.
#[doc(hidden)]
pub fn submit_nci(ctrl: &mut Controller, packet: &NciPacket) -> Result<()> {
    write_bytes(ctrl, OFFSET_CMND, &packet.encode()?)?;
    ctrl.try_write(OFFSET_CTRL, CTRL_NCI_CMND_SNT)
}

/// Load an HCI command into `cmnd` and signal it.
#[doc(hidden)]
pub fn submit_hci(ctrl: &mut Controller, packet: &HciPacket) -> Result<()> {
    write_bytes(ctrl, OFFSET_CMND, &packet.encode()?)?;
    ctrl.try_write(OFFSET_CTRL, CTRL_HCI_CMND_SNT)
}

/// Decode the response buffer, then acknowledge the interrupt and free the
/// buffer the way a driver does. Any pending delivery fires here.
#[doc(hidden)]
pub fn take_response(ctrl: &mut Controller) -> Result<NciPacket> {
    if ctrl.status() & STATUS_NCI_RESP == 0 {
        return Err(Error::FrameFormat("no nci response loaded".into()));
    }
    let rsp = NciPacket::decode(&read_bytes(ctrl, OFFSET_RESP, BUFFER_LEN)?)?;
    ctrl.try_write(OFFSET_CTRL, CTRL_INTR_ACK)?;
    ctrl.try_write(OFFSET_CTRL, CTRL_RESP_RCV)?;
    Ok(rsp)
}

/// Decode and acknowledge the notification buffer.
#[doc(hidden)]
pub fn take_notification(ctrl: &mut Controller) -> Result<NciPacket> {
    if ctrl.status() & STATUS_NCI_NTFN == 0 {
        return Err(Error::FrameFormat("no notification loaded".into()));
    }
    let ntf = NciPacket::decode(ctrl.registers().ntfn())?;
    ctrl.try_write(OFFSET_CTRL, CTRL_INTR_ACK)?;
    ctrl.try_write(OFFSET_CTRL, CTRL_NTFN_RCV)?;
    Ok(ntf)
}

/// Decode and acknowledge the data buffer.
#[doc(hidden)]
pub fn take_data(ctrl: &mut Controller) -> Result<NciPacket> {
    if ctrl.status() & STATUS_NCI_DATA == 0 {
        return Err(Error::FrameFormat("no data loaded".into()));
    }
    let data = NciPacket::decode(ctrl.registers().data())?;
    ctrl.try_write(OFFSET_CTRL, CTRL_INTR_ACK)?;
    ctrl.try_write(OFFSET_CTRL, CTRL_DATA_RCV)?;
    Ok(data)
}

/// Convenience: a controller whose device went through CORE_RESET and
/// CORE_INIT, with `remotes` registered for later discovery.
#[doc(hidden)]
pub fn initialized_controller(remotes: Vec<RemoteEndpoint>) -> Result<Controller> {
    let mut device = NfcDevice::new();
    for re in remotes {
        device.add_remote(re);
    }
    let mut ctrl = Controller::new(device);
    submit_nci(&mut ctrl, &NciPacket::command(GID_CORE, OID_CORE_RESET, vec![0x01]))?;
    take_response(&mut ctrl)?;
    submit_nci(&mut ctrl, &NciPacket::command(GID_CORE, OID_CORE_INIT, vec![]))?;
    take_response(&mut ctrl)?;
    if ctrl.device().state() != DeviceState::Initialized {
        return Err(Error::UnsupportedOperation("device did not initialize".into()));
    }
    Ok(ctrl)
}

/// Convenience: an initialized controller that discovered and activated an
/// NFC-DEP peer with `nfcid3`. The activation notification is consumed.
#[doc(hidden)]
pub fn activated_controller(nfcid3: [u8; 10]) -> Result<Controller> {
    let mut ctrl = initialized_controller(vec![RemoteEndpoint::nfc_dep(nfcid3)])?;
    let discover = vec![0x01, RfTechMode::PassivePollA as u8, 0x01];
    submit_nci(&mut ctrl, &NciPacket::command(GID_RF, OID_RF_DISCOVER, discover))?;
    take_response(&mut ctrl)?;
    take_notification(&mut ctrl)?;
    Ok(ctrl)
}
