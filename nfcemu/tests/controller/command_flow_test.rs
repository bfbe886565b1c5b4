use nfcemu::constants::*;
use nfcemu::controller::{Controller, RecordingIrq};
use nfcemu::device::{DeliveryAction, DeviceState, RemoteEndpoint, RfState};
use nfcemu::hci::{self, HciPacket};
use nfcemu::nci::codes::*;
use nfcemu::nci::{MessageType, NciPacket};
use nfcemu::test_support::*;

use crate::common::{self, fixtures};

fn load_cmnd(ctrl: &mut Controller, bytes: &[u8]) {
    write_bytes(ctrl, OFFSET_CMND, bytes).unwrap();
}

#[test]
fn nci_command_raises_resp_ready_and_irq() -> anyhow::Result<()> {
    common::init_logger();
    let irq = RecordingIrq::new();
    let mut ctrl = Controller::default().with_irq(irq.clone());

    load_cmnd(&mut ctrl, &fixtures::core_reset_cmd());
    ctrl.write(OFFSET_CTRL, CTRL_NCI_CMND_SNT);

    assert_eq!(ctrl.read(OFFSET_STATUS), STATUS_INTR | STATUS_NCI_RESP);
    assert_eq!(ctrl.read(OFFSET_CTRL), 0);
    assert_eq!(irq.levels(), vec![true]);

    let rsp = NciPacket::decode(&read_bytes(&ctrl, OFFSET_RESP, BUFFER_LEN)?)?;
    assert_eq!(rsp.message_type(), MessageType::Response);
    assert_eq!(rsp.payload()[0], STATUS_OK);
    assert_eq!(ctrl.device().state(), DeviceState::Reset);
    Ok(())
}

#[test]
fn resp_received_clears_resp_ready_and_irq() {
    let irq = RecordingIrq::new();
    let mut ctrl = Controller::default().with_irq(irq.clone());
    load_cmnd(&mut ctrl, &fixtures::core_reset_cmd());
    ctrl.write(OFFSET_CTRL, CTRL_NCI_CMND_SNT);

    ctrl.write(OFFSET_CTRL, CTRL_RESP_RCV);
    assert_eq!(ctrl.read(OFFSET_STATUS) & (STATUS_INTR | STATUS_NCI_RESP), 0);
    assert!(!irq.level());
}

#[test]
fn ack_then_resp_received() {
    let irq = RecordingIrq::new();
    let mut ctrl = Controller::default().with_irq(irq.clone());
    load_cmnd(&mut ctrl, &fixtures::core_reset_cmd());
    ctrl.write(OFFSET_CTRL, CTRL_NCI_CMND_SNT);

    ctrl.write(OFFSET_CTRL, CTRL_INTR_ACK);
    assert_eq!(ctrl.read(OFFSET_STATUS), STATUS_NCI_RESP);
    assert!(!irq.level());
    ctrl.write(OFFSET_CTRL, CTRL_RESP_RCV);
    assert_eq!(ctrl.read(OFFSET_STATUS), 0);
    assert_eq!(irq.levels(), vec![true, false]);
}

#[test]
fn command_while_response_loaded_is_noop() {
    let irq = RecordingIrq::new();
    let mut ctrl = Controller::default().with_irq(irq.clone());
    load_cmnd(&mut ctrl, &fixtures::core_reset_cmd());
    ctrl.write(OFFSET_CTRL, CTRL_NCI_CMND_SNT);

    let window = ctrl.save();
    load_cmnd(&mut ctrl, &fixtures::core_init_cmd());
    let before = ctrl.registers().clone();

    ctrl.write(OFFSET_CTRL, CTRL_NCI_CMND_SNT);
    ctrl.write(OFFSET_CTRL, CTRL_HCI_CMND_SNT);

    assert_eq!(ctrl.registers(), &before);
    assert_eq!(irq.levels(), vec![true]);
    assert_eq!(ctrl.device().state(), DeviceState::Reset);
    assert_eq!(ctrl.registers().resp(), &window.window()[OFFSET_RESP..OFFSET_NTFN]);
}

#[test]
fn command_while_hci_response_loaded_is_noop() {
    let mut ctrl = Controller::default();
    load_cmnd(
        &mut ctrl,
        &HciPacket::command(0x10, hci::ANY_OPEN_PIPE, vec![]).encode().unwrap(),
    );
    ctrl.write(OFFSET_CTRL, CTRL_HCI_CMND_SNT);
    assert_eq!(ctrl.status(), STATUS_INTR | STATUS_HCI_RESP);

    load_cmnd(&mut ctrl, &fixtures::core_reset_cmd());
    ctrl.write(OFFSET_CTRL, CTRL_NCI_CMND_SNT);
    assert_eq!(ctrl.device().state(), DeviceState::Idle);
    assert_eq!(ctrl.status(), STATUS_INTR | STATUS_HCI_RESP);
}

#[test]
fn rf_discover_in_initialized_state() -> anyhow::Result<()> {
    common::init_logger();
    let mut ctrl = initialized_controller(vec![])?;
    assert_eq!(ctrl.status(), 0);

    load_cmnd(&mut ctrl, &fixtures::rf_discover_cmd());
    ctrl.write(OFFSET_CTRL, CTRL_NCI_CMND_SNT);

    assert_eq!(ctrl.read(OFFSET_STATUS), STATUS_INTR | STATUS_NCI_RESP);
    assert_eq!(ctrl.read(OFFSET_CTRL), 0);
    assert_eq!(
        read_bytes(&ctrl, OFFSET_RESP, 5)?,
        vec![0x41, OID_RF_DISCOVER, 0x01, STATUS_OK, 0x00]
    );
    assert_eq!(ctrl.device().rf_state(), RfState::Discovery);
    assert!(ctrl.pending().is_none());
    Ok(())
}

#[test]
fn rf_discover_before_init_is_rejected_in_status_field() -> anyhow::Result<()> {
    let mut ctrl = Controller::default();
    submit_nci(&mut ctrl, &NciPacket::decode(&fixtures::rf_discover_cmd())?)?;
    let rsp = take_response(&mut ctrl)?;
    assert_eq!(rsp.payload(), &[STATUS_NOT_INITIALIZED]);
    assert_eq!(ctrl.status(), 0);
    Ok(())
}

#[test]
fn discovery_activation_is_delivered_after_resp_received() -> anyhow::Result<()> {
    common::init_logger();
    let mut ctrl = initialized_controller(vec![RemoteEndpoint::nfc_dep(fixtures::sample_nfcid3())])?;

    load_cmnd(&mut ctrl, &fixtures::rf_discover_cmd());
    ctrl.write(OFFSET_CTRL, CTRL_NCI_CMND_SNT);
    assert!(matches!(
        ctrl.pending().map(|d| &d.action),
        Some(DeliveryAction::RfActivated { discovery_id: 1, .. })
    ));
    assert_eq!(ctrl.status() & STATUS_NCI_NTFN, 0);

    take_response(&mut ctrl)?;
    assert_eq!(ctrl.status(), STATUS_INTR | STATUS_NCI_NTFN);
    assert!(ctrl.pending().is_none());

    let ntf = take_notification(&mut ctrl)?;
    assert_eq!(ntf.message_type(), MessageType::Notification);
    let p = ntf.payload();
    assert_eq!(p[0], 1, "discovery id");
    assert_eq!(p[1], 0x03, "nfc-dep interface");
    assert_eq!(p[2], 0x05, "nfc-dep protocol");
    assert_eq!(ctrl.status(), 0);
    assert_eq!(ctrl.device().rf_state(), RfState::PollActive);
    Ok(())
}

#[test]
fn deactivate_notifies_after_response() -> anyhow::Result<()> {
    let mut ctrl = activated_controller(fixtures::sample_nfcid3())?;
    submit_nci(&mut ctrl, &NciPacket::decode(&fixtures::rf_deactivate_idle_cmd())?)?;
    let rsp = take_response(&mut ctrl)?;
    assert_eq!(rsp.payload(), &[STATUS_OK]);

    let ntf = take_notification(&mut ctrl)?;
    assert_eq!(ntf.encode()?, vec![0x61, OID_RF_DEACTIVATE, 0x02, DEACTIVATE_IDLE, 0x00]);
    assert_eq!(ctrl.device().rf_state(), RfState::Idle);
    assert!(ctrl.device().active_re().is_none());
    Ok(())
}

#[test]
fn hci_pipe_through_registers() -> anyhow::Result<()> {
    let mut ctrl = initialized_controller(vec![])?;
    submit_hci(&mut ctrl, &HciPacket::command(0x12, hci::ANY_OPEN_PIPE, vec![]))?;
    assert_eq!(ctrl.status(), STATUS_INTR | STATUS_HCI_RESP);
    let rsp = HciPacket::decode(ctrl.registers().resp())?;
    assert_eq!(rsp.msg_type, hci::TYPE_RESPONSE);
    assert_eq!(rsp.instruction, hci::ANY_OK);
    assert!(ctrl.device().hci().is_open(0x12));

    ctrl.write(OFFSET_CTRL, CTRL_RESP_RCV);
    assert_eq!(ctrl.status(), 0);
    Ok(())
}

#[test]
fn unsolicited_notification_from_rf_layer() -> anyhow::Result<()> {
    let mut ctrl = initialized_controller(vec![])?;
    ctrl.send_notification(|_, buf| {
        let ntf = nfcemu::nci::messages::core_generic_error_ntf(STATUS_REJECTED);
        Ok(ntf.encode_into(buf)?)
    })?;
    let ntf = take_notification(&mut ctrl)?;
    assert_eq!(ntf.payload(), &[STATUS_REJECTED]);
    Ok(())
}
