use nfcemu::constants::*;
use nfcemu::controller::{Controller, RecordingIrq, Snapshot};
use nfcemu::test_support::*;
use nfcemu::Error;

use crate::common::fixtures;

#[test]
fn restore_reproduces_register_window() -> anyhow::Result<()> {
    let mut ctrl = initialized_controller(vec![])?;
    ctrl.write(OFFSET_PU, 1);
    ctrl.write(OFFSET_WS, 1);
    write_bytes(&mut ctrl, OFFSET_RESERVED0, b"keep")?;
    write_bytes(&mut ctrl, OFFSET_CMND, &fixtures::rf_discover_cmd())?;
    ctrl.write(OFFSET_CTRL, CTRL_NCI_CMND_SNT);

    let bytes = ctrl.save().to_bytes();
    assert_eq!(bytes.len(), 4 + END_OFFSET);
    assert_eq!(&bytes[..4], &SNAPSHOT_VERSION.to_le_bytes());

    let irq = RecordingIrq::new();
    let mut restored = Controller::default().with_irq(irq.clone());
    restored.load(&Snapshot::from_bytes(&bytes)?)?;
    for off in 0..END_OFFSET {
        assert_eq!(restored.read(off), ctrl.read(off), "offset {:#05x}", off);
    }
    assert_eq!(irq.levels(), vec![true]);
    Ok(())
}

#[test]
fn version_mismatch_is_rejected_and_state_kept() {
    let mut ctrl = Controller::default();
    ctrl.write(OFFSET_PU, 1);

    let mut bytes = Controller::default().save().to_bytes();
    bytes[..4].copy_from_slice(&(SNAPSHOT_VERSION + 1).to_le_bytes());
    let snap = Snapshot::from_bytes(&bytes).unwrap();

    assert_eq!(
        ctrl.load(&snap),
        Err(Error::SnapshotVersion {
            expected: SNAPSHOT_VERSION,
            actual: SNAPSHOT_VERSION + 1
        })
    );
    assert_eq!(ctrl.read(OFFSET_PU), 1);
}

#[test]
fn truncated_window_is_rejected() {
    let mut ctrl = Controller::default();
    let snap = Snapshot::from_parts(SNAPSHOT_VERSION, vec![0u8; END_OFFSET - 1]);
    assert!(matches!(
        ctrl.load(&snap),
        Err(Error::InvalidLength { expected: END_OFFSET, .. })
    ));
}
