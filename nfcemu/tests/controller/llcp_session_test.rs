use nfcemu::constants::*;
use nfcemu::controller::Controller;
use nfcemu::device::{DeliveryAction, PendingDelivery};
use nfcemu::llcp::param::encode_params;
use nfcemu::llcp::{LinkStatus, Param, Pdu, PduType};
use nfcemu::nci::codes::{OID_CORE_CONN_CREDITS, OID_CORE_INTERFACE_ERROR};
use nfcemu::nci::{MessageType, NciPacket};
use nfcemu::test_support::*;
use nfcemu::Sap;

use crate::common::{self, fixtures};

/// Send one LLCP PDU from the peer and return the PDU the controller
/// answers with on the data buffer.
fn exchange(ctrl: &mut Controller, pdu: Vec<u8>) -> anyhow::Result<Pdu> {
    submit_nci(ctrl, &fixtures::nci_data(pdu))?;
    let credits = take_response(ctrl)?;
    assert_eq!(credits.message_type(), MessageType::Notification);
    assert_eq!(&credits.encode()?[..2], &[0x60, OID_CORE_CONN_CREDITS]);
    let data = take_data(ctrl)?;
    Ok(Pdu::decode(data.payload())?)
}

#[test]
fn connect_exchange_data_and_disconnect() -> anyhow::Result<()> {
    common::init_logger();
    let mut ctrl = activated_controller(fixtures::sample_nfcid3())?;
    let peer = fixtures::peer_sap();

    let cc = exchange(&mut ctrl, fixtures::connect_to_snep(peer, 2))?;
    assert_eq!(cc.ptype, PduType::Cc);
    assert_eq!((cc.dsap, cc.ssap), (peer, Sap::SNEP));

    let rr = exchange(&mut ctrl, fixtures::i_frame_to_snep(peer, 0, 0, b"hello"))?;
    assert_eq!(rr.ptype, PduType::Rr);
    assert_eq!(rr.sequence.map(|s| s.nr), Some(1));

    let llcp = ctrl.device_mut().llcp_mut()?;
    let link = llcp.link(Sap::SNEP, peer).expect("link exists");
    assert_eq!(link.status(), LinkStatus::Connected);
    assert_eq!(link.rw_r(), 2);
    let mut out = [0u8; 16];
    let n = link.read_rbuf(&mut out);
    assert_eq!(&out[..n], b"hello");

    let disc = Pdu::new(Sap::SNEP, PduType::Disc, peer).encode()?;
    let dm = exchange(&mut ctrl, disc)?;
    assert_eq!(dm.ptype, PduType::Dm);
    assert_eq!(dm.dm_reason(), Some(0x00));
    Ok(())
}

#[test]
fn idle_link_answers_symm() -> anyhow::Result<()> {
    let mut ctrl = activated_controller(fixtures::sample_nfcid3())?;
    let symm = exchange(&mut ctrl, vec![0x00, 0x00])?;
    assert_eq!(symm.ptype, PduType::Symm);
    Ok(())
}

#[test]
fn connect_by_service_name() -> anyhow::Result<()> {
    let mut ctrl = activated_controller(fixtures::sample_nfcid3())?;
    let peer = fixtures::peer_sap();
    let cc = exchange(&mut ctrl, fixtures::connect_by_name(peer, "urn:nfc:sn:snep"))?;
    assert_eq!(cc.ptype, PduType::Cc);
    assert_eq!(cc.ssap, Sap::SNEP);

    let dm = exchange(
        &mut ctrl,
        fixtures::connect_by_name(fixtures::other_peer_sap(), "urn:nfc:sn:unknown"),
    )?;
    assert_eq!(dm.ptype, PduType::Dm);
    assert_eq!(dm.dm_reason(), Some(0x02));
    Ok(())
}

#[test]
fn outbound_data_pushed_by_rf_layer() -> anyhow::Result<()> {
    let mut ctrl = activated_controller(fixtures::sample_nfcid3())?;
    let peer = fixtures::peer_sap();
    exchange(&mut ctrl, fixtures::connect_to_snep(peer, 4))?;

    ctrl.device_mut().llcp_mut()?.send(Sap::SNEP, peer, b"ndef")?;
    let llcp_data = PendingDelivery::data(DeliveryAction::LlcpData);
    ctrl.send_data(|dev, buf| dev.complete_delivery(&llcp_data, buf))?;

    let pdu = Pdu::decode(take_data(&mut ctrl)?.payload())?;
    assert_eq!(pdu.ptype, PduType::I);
    assert_eq!(pdu.info, b"ndef".to_vec());
    assert_eq!(pdu.sequence.map(|s| (s.ns, s.nr)), Some((0, 0)));
    Ok(())
}

#[test]
fn largest_i_frame_fits_the_data_buffer() -> anyhow::Result<()> {
    let mut ctrl = activated_controller(fixtures::sample_nfcid3())?;
    let peer = fixtures::peer_sap();
    let connect = Pdu::new(Sap::SNEP, PduType::Connect, peer)
        .with_info(encode_params(&[Param::Miux(200), Param::Rw(4)])?)
        .encode()?;
    assert_eq!(exchange(&mut ctrl, connect)?.ptype, PduType::Cc);

    let link = ctrl
        .device_mut()
        .llcp_mut()?
        .link_mut(Sap::SNEP, peer)
        .expect("link exists");
    let info = vec![0xab; link.max_info_len()];
    assert!(link.send(&info)?);

    let i = exchange(&mut ctrl, vec![0x00, 0x00])?;
    assert_eq!(i.ptype, PduType::I);
    assert_eq!(i.sequence.map(|s| s.ns), Some(0));
    assert_eq!(i.info, info);

    let link = ctrl
        .device_mut()
        .llcp_mut()?
        .link(Sap::SNEP, peer)
        .expect("link exists");
    assert_eq!(link.pending(), 0);
    assert_eq!(link.v_s(), 1);
    Ok(())
}

#[test]
fn data_without_nfc_dep_is_an_interface_error() -> anyhow::Result<()> {
    let mut ctrl = initialized_controller(vec![])?;
    submit_nci(&mut ctrl, &NciPacket::data(0, vec![0x00, 0x00]))?;
    assert!(ctrl.pending().is_none());
    let rsp = take_response(&mut ctrl)?;
    assert_eq!(&rsp.encode()?[..2], &[0x60, OID_CORE_INTERFACE_ERROR]);
    assert_eq!(ctrl.status() & STATUS_NCI_DATA, 0);
    Ok(())
}
