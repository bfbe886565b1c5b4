use nfcemu::constants::LLCP_MAX_PDU_LEN;
use nfcemu::llcp::param::{Param, encode_params, parse_params};
use nfcemu::llcp::pdu::Sequence;
use nfcemu::llcp::{Pdu, PduType, create_param_tail, decode_ptype, encode_dm, encode_i_frame, encode_pdu};
use nfcemu::{Error, Sap};
use proptest::prelude::*;

fn sap(v: u8) -> Sap {
    Sap::new_unchecked(v)
}

#[test]
fn header_bit_order_is_msb_first() {
    let mut buf = [0u8; 2];
    encode_pdu(&mut buf, sap(0x3f), PduType::Snl, sap(0x01)).unwrap();
    assert_eq!(buf, [0xfe, 0x41]);
    assert_eq!(decode_ptype(&buf).unwrap(), PduType::Snl);
}

#[test]
fn i_frame_and_dm_layout() {
    let mut buf = [0u8; 3];
    assert_eq!(encode_i_frame(&mut buf, sap(4), sap(0x20), 2, 5).unwrap(), 3);
    assert_eq!(buf, [0x13, 0x20, 0x25]);
    assert_eq!(encode_dm(&mut buf, sap(0x20), sap(4), 0x02).unwrap(), 3);
    assert_eq!(buf, [0x81, 0xc4, 0x02]);
}

#[test]
fn oversize_pdu_fails_instead_of_truncating() {
    let pdu = Pdu::new(sap(4), PduType::Ui, sap(4)).with_info(vec![0; LLCP_MAX_PDU_LEN - 1]);
    assert!(matches!(pdu.encode(), Err(Error::InvalidLength { .. })));
    assert!(Pdu::decode(&[0u8; LLCP_MAX_PDU_LEN + 1]).is_err());
}

#[test]
fn activation_param_tail_parses() {
    let tail = create_param_tail();
    assert_eq!(&tail[..3], &[0x46, 0x66, 0x6d]);
    let params = parse_params(&tail[3..]).unwrap();
    assert!(params.contains(&Param::Version { major: 1, minor: 1 }));
    assert!(params.iter().any(|p| matches!(p, Param::Lto(_))));
    assert!(params.iter().any(|p| matches!(p, Param::Wks(_))));
}

fn any_ptype() -> impl Strategy<Value = PduType> {
    prop::sample::select(PduType::ALL.to_vec())
}

proptest! {
    #[test]
    fn pdu_round_trip(
        dsap in 0u8..64,
        ssap in 0u8..64,
        ptype in any_ptype(),
        ns in 0u8..16,
        nr in 0u8..16,
        info in prop::collection::vec(any::<u8>(), 0..200),
    ) {
        let sequence = if ptype.is_sequenced() {
            Some(Sequence::new(ns, nr).unwrap())
        } else {
            None
        };
        let pdu = Pdu {
            dsap: sap(dsap),
            ptype,
            ssap: sap(ssap),
            sequence,
            info,
        };
        let bytes = pdu.encode().unwrap();
        prop_assert_eq!(decode_ptype(&bytes).unwrap(), ptype);
        prop_assert_eq!(Pdu::decode(&bytes).unwrap(), pdu);
    }

    #[test]
    fn params_round_trip(rw in 0u8..16, miux in 0u16..0x800, lto in any::<u8>()) {
        let params = vec![Param::Rw(rw), Param::Miux(miux), Param::Lto(lto)];
        let bytes = encode_params(&params).unwrap();
        prop_assert_eq!(parse_params(&bytes).unwrap(), params);
    }
}
