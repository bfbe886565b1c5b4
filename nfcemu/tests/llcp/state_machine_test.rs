use nfcemu::llcp::config::{DM_NO_ACTIVE_CONNECTION, FRMR_I, FRMR_S};
use nfcemu::llcp::{DataLink, FrmrInfo, LinkStatus, Pdu, PduType};
use nfcemu::Sap;

use crate::common::fixtures;

fn link() -> DataLink {
    DataLink::new(Sap::SNEP, fixtures::peer_sap())
}

fn from_peer(ptype: PduType) -> Pdu {
    Pdu::new(Sap::SNEP, ptype, fixtures::peer_sap())
}

fn pop(dl: &mut DataLink) -> Pdu {
    Pdu::decode(&dl.next_pdu().expect("queued pdu")).unwrap()
}

fn connected() -> DataLink {
    let mut dl = link();
    dl.handle_pdu(&from_peer(PduType::Connect)).unwrap();
    dl.accept().unwrap();
    pop(&mut dl);
    dl
}

#[test]
fn connect_received_while_disconnected_moves_to_connecting() {
    let mut dl = link();
    dl.handle_pdu(&from_peer(PduType::Connect)).unwrap();
    assert_eq!(dl.status(), LinkStatus::Connecting);
    assert!(!dl.is_initiator());
    assert_eq!(dl.pending(), 0);
}

#[test]
fn cc_received_while_connecting_moves_to_connected() {
    let mut dl = link();
    dl.connect().unwrap();
    assert_eq!(pop(&mut dl).ptype, PduType::Connect);
    dl.handle_pdu(&from_peer(PduType::Cc)).unwrap();
    assert_eq!(dl.status(), LinkStatus::Connected);
}

#[test]
fn anything_but_connect_or_dm_while_disconnected_yields_dm() {
    let peer = fixtures::peer_sap();
    let pdus = vec![
        from_peer(PduType::Disc),
        from_peer(PduType::Cc),
        from_peer(PduType::Frmr),
        Pdu::i_frame(Sap::SNEP, peer, 0, 0, b"x".to_vec()).unwrap(),
        Pdu::rr(Sap::SNEP, peer, 0).unwrap(),
        Pdu::rnr(Sap::SNEP, peer, 0).unwrap(),
    ];
    for pdu in pdus {
        let mut dl = link();
        dl.handle_pdu(&pdu).unwrap();
        assert_eq!(dl.status(), LinkStatus::Disconnected, "{:?}", pdu.ptype);
        let dm = pop(&mut dl);
        assert_eq!(dm.ptype, PduType::Dm);
        assert_eq!((dm.dsap, dm.ssap), (peer, Sap::SNEP));
        assert_eq!(dm.dm_reason(), Some(DM_NO_ACTIVE_CONNECTION));
    }
}

#[test]
fn disconnect_handshake_returns_to_disconnected() {
    let mut dl = connected();
    dl.disconnect().unwrap();
    assert_eq!(dl.status(), LinkStatus::Disconnecting);
    assert_eq!(pop(&mut dl).ptype, PduType::Disc);
    dl.handle_pdu(&from_peer(PduType::Dm).with_info(vec![0x00]))
        .unwrap();
    assert_eq!(dl.status(), LinkStatus::Disconnected);
}

#[test]
fn out_of_sequence_i_frame_is_rejected_with_frmr() {
    let mut dl = connected();
    let pdu = Pdu::i_frame(Sap::SNEP, fixtures::peer_sap(), 3, 0, b"late".to_vec()).unwrap();
    dl.handle_pdu(&pdu).unwrap();
    assert_eq!(dl.v_r(), 0);
    assert_eq!(dl.rlen(), 0);

    let frmr = pop(&mut dl);
    assert_eq!(frmr.ptype, PduType::Frmr);
    let info = FrmrInfo::from_bytes(&frmr.info).unwrap();
    assert_eq!(info.flags, FRMR_S);
    assert_eq!(info.ptype, PduType::I);
    assert_eq!(info.sequence, 0x30);
}

#[test]
fn receive_buffer_overflow_drops_frame() {
    let mut dl = connected();
    let peer = fixtures::peer_sap();
    let big = vec![0xaa; 200];
    dl.handle_pdu(&Pdu::i_frame(Sap::SNEP, peer, 0, 0, big.clone()).unwrap())
        .unwrap();
    assert_eq!(dl.rlen(), 200);

    dl.handle_pdu(&Pdu::i_frame(Sap::SNEP, peer, 1, 0, big).unwrap())
        .unwrap();
    assert_eq!(dl.rlen(), 200);
    assert_eq!(dl.v_r(), 1);
    let frmr = pop(&mut dl);
    assert_eq!(FrmrInfo::from_bytes(&frmr.info).unwrap().flags, FRMR_I);
}

#[test]
fn rbuf_reads_are_repeatable_until_consumed() {
    let mut dl = connected();
    dl.handle_pdu(&Pdu::i_frame(Sap::SNEP, fixtures::peer_sap(), 0, 0, b"abcdef".to_vec()).unwrap())
        .unwrap();

    let mut first = [0u8; 4];
    let mut second = [0u8; 4];
    assert_eq!(dl.read_rbuf(&mut first), 4);
    assert_eq!(dl.read_rbuf(&mut second), 4);
    assert_eq!(first, second);
    assert_eq!(&first, b"abcd");

    assert_eq!(dl.consume_rbuf(4), 4);
    let mut rest = [0u8; 8];
    let n = dl.read_rbuf(&mut rest);
    assert_eq!(&rest[..n], b"ef");
}
