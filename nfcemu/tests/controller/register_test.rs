use nfcemu::constants::*;
use nfcemu::controller::Controller;

#[test]
fn write_then_read_every_buffer_offset() {
    let mut ctrl = Controller::default();
    for off in OFFSET_CMND..END_OFFSET {
        ctrl.write(off, (off % 251) as u8);
    }
    for off in OFFSET_CMND..END_OFFSET {
        assert_eq!(ctrl.read(off), (off % 251) as u8, "offset {:#05x}", off);
    }
}

#[test]
fn ctrl_always_reads_back_zero() {
    let mut ctrl = Controller::default();
    for value in 0..=u8::MAX {
        ctrl.write(OFFSET_CTRL, value);
        assert_eq!(ctrl.read(OFFSET_CTRL), 0, "ctrl value {:#04x}", value);
        // free the response slot so every command value is processed
        ctrl.write(OFFSET_CTRL, CTRL_RESP_RCV);
    }
}

#[test]
fn status_write_is_ignored() {
    let mut ctrl = Controller::default();
    ctrl.write(OFFSET_CTRL, CTRL_NCI_CMND_SNT);
    let status = ctrl.read(OFFSET_STATUS);
    ctrl.write(OFFSET_STATUS, 0x00);
    ctrl.write(OFFSET_STATUS, 0xff);
    assert_eq!(ctrl.read(OFFSET_STATUS), status);
}

#[test]
fn pu_and_ws_read_back_accepted_values() {
    let mut ctrl = Controller::default();
    for v in [1u8, 0] {
        ctrl.write(OFFSET_PU, v);
        assert_eq!(ctrl.read(OFFSET_PU), v);
        ctrl.write(OFFSET_WS, v);
        assert_eq!(ctrl.read(OFFSET_WS), v);
    }
    ctrl.write(OFFSET_PU, 2);
    assert_eq!(ctrl.read(OFFSET_PU), 0);
    ctrl.write(OFFSET_WS, WS_TOGGLE);
    assert_eq!(ctrl.read(OFFSET_WS), 1);
    ctrl.write(OFFSET_WS, 0x80);
    assert_eq!(ctrl.read(OFFSET_WS), 1);
}

#[test]
#[should_panic(expected = "bad register offset")]
fn write_past_window_is_fatal() {
    let mut ctrl = Controller::default();
    ctrl.write(END_OFFSET, 0);
}

#[test]
fn try_variants_report_bad_offset() {
    let mut ctrl = Controller::default();
    assert_eq!(
        ctrl.try_read(0x1234),
        Err(nfcemu::Error::BadOffset(0x1234))
    );
    assert!(ctrl.try_write(END_OFFSET + 1, 0).is_err());
    assert_eq!(ctrl.try_read(END_OFFSET - 1), Ok(0));
}
