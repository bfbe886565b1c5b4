// nfcemu-rs/nfcemu/src/controller/mod.rs
//! Memory-mapped controller front end.
//!
//! The host drives the controller one byte at a time through [`Controller::read`]
//! and [`Controller::write`]. Commands are placed in `cmnd` and started by a
//! write to `ctrl`; answers come back in `resp`, with notifications and data
//! published in `ntfn` and `data`. A command may leave a [`PendingDelivery`]
//! behind, which fires once the host has taken the response.

pub mod irq;
pub mod registers;
pub mod registry;
pub mod snapshot;

pub use irq::{IrqLine, NoIrq, RecordingIrq};
pub use registers::{Register, Registers};
pub use registry::ControllerRegistry;
pub use snapshot::Snapshot;

use log::{debug, trace, warn};

use crate::constants::*;
use crate::device::{NfcDevice, PendingDelivery};
use crate::types::BufKind;
use crate::utils::Hex;
use crate::Result;

/// Bytes a delivery may fill in `ntfn` or `data`.
const DELIVERY_MAX_LEN: usize = if BUFFER_LEN < MAX_NCI_PAYLOAD_LEN {
    BUFFER_LEN
} else {
    MAX_NCI_PAYLOAD_LEN
};

const READY_MASK: u8 = STATUS_NCI_RESP | STATUS_NCI_NTFN | STATUS_NCI_DATA | STATUS_HCI_RESP;

fn ready_bit(kind: BufKind) -> u8 {
    match kind {
        BufKind::Notification => STATUS_NCI_NTFN,
        BufKind::Data => STATUS_NCI_DATA,
    }
}

/// One emulated NFC controller: register file, device model, pending
/// delivery slot and interrupt line.
pub struct Controller {
    regs: Registers,
    device: NfcDevice,
    pending: Option<PendingDelivery>,
    irq: Box<dyn IrqLine>,
}

impl std::fmt::Debug for Controller {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Controller")
            .field("regs", &self.regs)
            .field("device", &self.device)
            .field("pending", &self.pending)
            .finish_non_exhaustive()
    }
}

impl Default for Controller {
    fn default() -> Self {
        Self::new(NfcDevice::new())
    }
}

impl Controller {
    pub fn new(device: NfcDevice) -> Self {
        Self {
            regs: Registers::default(),
            device,
            pending: None,
            irq: Box::new(NoIrq),
        }
    }

    /// Wire the interrupt output to `irq`.
    pub fn with_irq<I: IrqLine + 'static>(mut self, irq: I) -> Self {
        self.irq = Box::new(irq);
        self
    }

    pub fn registers(&self) -> &Registers {
        &self.regs
    }

    pub fn status(&self) -> u8 {
        self.regs.status
    }

    pub fn irq_pending(&self) -> bool {
        self.regs.status & STATUS_INTR != 0
    }

    pub fn device(&self) -> &NfcDevice {
        &self.device
    }

    pub fn device_mut(&mut self) -> &mut NfcDevice {
        &mut self.device
    }

    pub fn pending(&self) -> Option<&PendingDelivery> {
        self.pending.as_ref()
    }

    /// Read one byte of the register window.
    ///
    /// # Panics
    ///
    /// On offsets outside the 4096-byte window: the host broke the bus
    /// contract and emulation cannot continue.
    pub fn read(&self, offset: usize) -> u8 {
        match self.try_read(offset) {
            Ok(v) => v,
            Err(e) => panic!("nfc controller read: {}", e),
        }
    }

    pub fn try_read(&self, offset: usize) -> Result<u8> {
        Register::decode(offset).map(|reg| self.regs.get(reg))
    }

    /// Write one byte of the register window.
    ///
    /// # Panics
    ///
    /// On offsets outside the 4096-byte window, like [`Controller::read`].
    pub fn write(&mut self, offset: usize, value: u8) {
        if let Err(e) = self.try_write(offset, value) {
            panic!("nfc controller write: {}", e);
        }
    }

    pub fn try_write(&mut self, offset: usize, value: u8) -> Result<()> {
        let reg = Register::decode(offset)?;
        match reg {
            Register::Status => {}
            Register::Ctrl => {
                self.regs.ctrl = value;
                self.process_ctrl(value);
                self.regs.ctrl = 0;
            }
            Register::Pu => {
                if value <= 1 {
                    self.regs.pu = value;
                }
            }
            Register::Ws => match value {
                0 | 1 => self.regs.ws = value,
                WS_TOGGLE => self.regs.ws = u8::from(self.regs.ws == 0),
                _ => {}
            },
            _ => {
                self.regs.store(reg, value);
            }
        }
        Ok(())
    }

    /// Publish a notification produced outside command processing, e.g. by
    /// the RF layer. `create` fills the zeroed buffer and returns the number
    /// of bytes written; an error leaves the status untouched.
    pub fn send_notification<F>(&mut self, create: F) -> Result<()>
    where
        F: FnOnce(&mut NfcDevice, &mut [u8]) -> Result<usize>,
    {
        self.publish(BufKind::Notification, create)
    }

    /// Publish a data packet produced outside command processing.
    pub fn send_data<F>(&mut self, create: F) -> Result<()>
    where
        F: FnOnce(&mut NfcDevice, &mut [u8]) -> Result<usize>,
    {
        self.publish(BufKind::Data, create)
    }

    /// Hand inbound RF data to the device.
    pub fn receive_data<F, T>(&mut self, recv: F) -> Result<T>
    where
        F: FnOnce(&mut NfcDevice) -> Result<T>,
    {
        recv(&mut self.device)
    }

    pub fn save(&self) -> Snapshot {
        Snapshot::capture(&self.regs)
    }

    /// Restore the register file. A pending delivery does not survive a
    /// restore; the interrupt line follows the restored IRQ bit.
    pub fn load(&mut self, snapshot: &Snapshot) -> Result<()> {
        self.regs = snapshot.registers()?;
        self.pending = None;
        let level = self.irq_pending();
        self.irq.set_level(level);
        debug!("nfc controller restored (status {:#04x})", self.regs.status);
        Ok(())
    }

    fn process_ctrl(&mut self, ctrl: u8) {
        debug!("nfc ctrl {:#04x} (status {:#04x})", ctrl, self.regs.status);
        match ctrl {
            CTRL_INTR_ACK => {
                self.regs.status &= !STATUS_INTR;
                self.irq.set_level(false);
            }
            CTRL_RESP_RCV => {
                self.regs.status &= !(STATUS_NCI_RESP | STATUS_HCI_RESP);
                if self.regs.status & READY_MASK == 0 && self.irq_pending() {
                    self.regs.status &= !STATUS_INTR;
                    self.irq.set_level(false);
                }
                self.fire_pending();
            }
            CTRL_NTFN_RCV => self.regs.status ^= STATUS_NCI_NTFN,
            CTRL_DATA_RCV => self.regs.status ^= STATUS_NCI_DATA,
            CTRL_NCI_CMND_SNT => self.nci_command(),
            CTRL_HCI_CMND_SNT => self.hci_command(),
            other => debug!("nfc ctrl: ignoring {:#04x}", other),
        }
    }

    fn response_loaded(&self) -> bool {
        self.regs.status & (STATUS_NCI_RESP | STATUS_HCI_RESP) != 0
    }

    fn nci_command(&mut self) {
        if self.response_loaded() {
            warn!("nfc: nci command while response still loaded, ignored");
            return;
        }
        self.regs.status |= STATUS_NCI_CMND;
        self.regs.resp.fill(0);
        self.pending = None;

        let outcome = self.device.process_nci(&self.regs.cmnd);
        let ok = outcome.success && self.load_resp(&outcome.resp);
        if ok {
            self.pending = outcome.delivery;
        }

        self.regs.status &= !STATUS_NCI_CMND;
        self.set_status(STATUS_NCI_RESP, ok);
    }

    fn hci_command(&mut self) {
        if self.response_loaded() {
            warn!("nfc: hci command while response still loaded, ignored");
            return;
        }
        self.regs.status |= STATUS_HCI_CMND;
        self.regs.resp.fill(0);

        let outcome = self.device.process_hci(&self.regs.cmnd);
        let ok = outcome.success && self.load_resp(&outcome.resp);

        self.regs.status &= !STATUS_HCI_CMND;
        self.set_status(STATUS_HCI_RESP, ok);
    }

    fn load_resp(&mut self, resp: &[u8]) -> bool {
        if resp.len() > BUFFER_LEN {
            warn!("nfc: response of {} bytes does not fit", resp.len());
            return false;
        }
        self.regs.resp[..resp.len()].copy_from_slice(resp);
        trace!("nfc resp [{}]", Hex(resp));
        true
    }

    /// Raise IRQ, setting `bit` too when `set` holds.
    fn set_status(&mut self, bit: u8, set: bool) {
        if set {
            self.regs.status |= bit;
        }
        self.regs.status |= STATUS_INTR;
        self.irq.set_level(true);
    }

    fn fire_pending(&mut self) {
        let Some(delivery) = self.pending.take() else {
            return;
        };
        let buf = &mut self.regs.buffer_mut(delivery.kind)[..DELIVERY_MAX_LEN];
        buf.fill(0);
        let n = match self.device.complete_delivery(&delivery, buf) {
            Ok(n) => n,
            Err(e) => {
                warn!("nfc: delivery {:?} failed: {}", delivery.action, e);
                0
            }
        };
        self.set_status(ready_bit(delivery.kind), n > 0);
    }

    fn publish<F>(&mut self, kind: BufKind, create: F) -> Result<()>
    where
        F: FnOnce(&mut NfcDevice, &mut [u8]) -> Result<usize>,
    {
        let buf = &mut self.regs.buffer_mut(kind)[..DELIVERY_MAX_LEN];
        buf.fill(0);
        let n = create(&mut self.device, buf)?;
        trace!("nfc publish {:?}: {} bytes", kind, n);
        self.set_status(ready_bit(kind), n > 0);
        Ok(())
    }
}
