use nfcemu::llcp::param::{Param, encode_params};
use nfcemu::llcp::{DataLink, LinkStatus, Pdu, PduType};
use nfcemu::Sap;

use crate::common::fixtures;

/// Link accepted from a peer that granted `rw_r`; the CC is drained.
fn connected(rw_r: u8) -> DataLink {
    let mut dl = DataLink::new(Sap::SNEP, fixtures::peer_sap());
    let connect = Pdu::new(Sap::SNEP, PduType::Connect, fixtures::peer_sap())
        .with_info(encode_params(&[Param::Rw(rw_r)]).unwrap());
    dl.handle_pdu(&connect).unwrap();
    dl.accept().unwrap();
    dl.next_pdu().unwrap();
    assert_eq!(dl.status(), LinkStatus::Connected);
    dl
}

fn rr(nr: u8) -> Pdu {
    Pdu::rr(Sap::SNEP, fixtures::peer_sap(), nr).unwrap()
}

fn fill_window(dl: &mut DataLink) -> usize {
    let mut sent = 0;
    while dl.send(&[sent as u8]).unwrap() {
        sent += 1;
    }
    sent
}

#[test]
fn sends_block_once_window_is_full() {
    let mut dl = connected(3);
    assert_eq!(fill_window(&mut dl), 3);
    assert_eq!(dl.outstanding(), dl.rw_r());
    assert_eq!(dl.pending(), 3);
    assert!(!dl.send(b"more").unwrap());
    assert_eq!(dl.pending(), 3);
}

#[test]
fn rr_with_nr_equal_v_s_unblocks_exactly_one_frame() {
    let mut dl = connected(1);
    assert_eq!(fill_window(&mut dl), 1);

    dl.handle_pdu(&rr(dl.v_s())).unwrap();
    assert_eq!(dl.v_sa(), dl.v_s());
    assert!(dl.send(b"next").unwrap());
    assert!(!dl.send(b"blocked").unwrap());
}

#[test]
fn partial_ack_opens_matching_slots() {
    let mut dl = connected(4);
    assert_eq!(fill_window(&mut dl), 4);

    dl.handle_pdu(&rr(1)).unwrap();
    assert_eq!(dl.outstanding(), 3);
    assert!(dl.send(b"a").unwrap());
    assert!(!dl.send(b"b").unwrap());
}

#[test]
fn window_survives_sequence_wrap() {
    let mut dl = connected(2);
    for round in 0..20u8 {
        assert_eq!(fill_window(&mut dl), 2, "round {}", round);
        dl.handle_pdu(&rr(dl.v_s())).unwrap();
        while dl.next_pdu().is_some() {}
    }
    assert_eq!(dl.v_s(), 40 % 16);
}

#[test]
fn stale_ack_is_refused() {
    let mut dl = connected(4);
    fill_window(&mut dl);
    dl.handle_pdu(&rr(3)).unwrap();
    while dl.next_pdu().is_some() {}

    // 1 lies behind v_sa
    dl.handle_pdu(&rr(1)).unwrap();
    assert_eq!(dl.v_sa(), 3);
    assert_eq!(dl.next_pdu().map(|b| Pdu::decode(&b).unwrap().ptype), Some(PduType::Frmr));
}

#[test]
fn rnr_suspends_sending_until_rr() {
    let mut dl = connected(4);
    assert!(dl.send(b"one").unwrap());
    dl.handle_pdu(&Pdu::rnr(Sap::SNEP, fixtures::peer_sap(), 1).unwrap())
        .unwrap();
    assert!(dl.remote_busy());
    assert!(!dl.send(b"two").unwrap());

    dl.handle_pdu(&rr(1)).unwrap();
    assert!(!dl.remote_busy());
    assert!(dl.send(b"two").unwrap());
}

#[test]
fn i_frames_carry_v_r_without_advancing_v_ra() {
    let mut dl = connected(4);
    let peer = fixtures::peer_sap();
    dl.handle_pdu(&Pdu::i_frame(Sap::SNEP, peer, 0, 0, b"in".to_vec()).unwrap())
        .unwrap();
    assert_eq!((dl.v_r(), dl.v_ra()), (1, 0));

    dl.send(b"out").unwrap();
    let out = Pdu::decode(&dl.next_pdu().unwrap()).unwrap();
    assert_eq!(out.sequence.map(|s| (s.ns, s.nr)), Some((0, 1)));
    assert_eq!(dl.v_ra(), 0);
}
