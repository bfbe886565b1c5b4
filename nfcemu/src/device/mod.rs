// nfcemu-rs/nfcemu/src/device/mod.rs
//! NFC device model.
//!
//! `NfcDevice` holds the session state, the RF interface table, the remote
//! endpoints reported by the RF layer and the configuration blob. NCI and
//! HCI command processing live in `nci_handler` and `hci_handler`; deferred
//! notification/data fills in `delivery`.

pub mod config;
pub mod delivery;
pub mod hci_handler;
pub mod nci_handler;
pub mod remote;
pub mod rf;

pub use delivery::{DeliveryAction, PendingDelivery};
pub use hci_handler::{HciOutcome, HciRegistry};
pub use nci_handler::NciOutcome;
pub use remote::{RemoteEndpoint, RemoteHandle};
pub use rf::{RfHandle, RfInterface, RfTable};

use log::debug;

use crate::constants::CONFIG_BLOB_LEN;
use crate::llcp::LinkManager;
use crate::nci::rf::{RfProtocol, RfTechMode};
use crate::{Error, Result};

/// Session lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DeviceState {
    Idle,
    Reset,
    Initialized,
}

/// RF lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RfState {
    Idle,
    Discovery,
    PollActive,
    ListenActive,
}

/// Emulated NFC controller behind the register engine.
#[derive(Debug)]
pub struct NfcDevice {
    state: DeviceState,
    rf_state: RfState,
    rf: RfTable,
    remotes: Vec<RemoteEndpoint>,
    active_re: Option<RemoteHandle>,
    active_rf: Option<RfHandle>,
    id: u8,
    config: [u8; CONFIG_BLOB_LEN],
    hci: HciRegistry,
}

impl Default for NfcDevice {
    fn default() -> Self {
        Self::new()
    }
}

impl NfcDevice {
    pub fn new() -> Self {
        Self {
            state: DeviceState::Idle,
            rf_state: RfState::Idle,
            rf: RfTable::default(),
            remotes: Vec::new(),
            active_re: None,
            active_rf: None,
            id: 0,
            config: [0u8; CONFIG_BLOB_LEN],
            hci: HciRegistry::default(),
        }
    }

    pub fn state(&self) -> DeviceState {
        self.state
    }

    pub fn rf_state(&self) -> RfState {
        self.rf_state
    }

    pub fn rf_table(&self) -> &RfTable {
        &self.rf
    }

    pub fn hci(&self) -> &HciRegistry {
        &self.hci
    }

    /// Advance the id counter and return the new value (wraps at 256).
    pub fn next_id(&mut self) -> u8 {
        self.id = self.id.wrapping_add(1);
        self.id
    }

    pub fn find_rf(&self, protocol: RfProtocol, tech_mode: RfTechMode) -> Option<RfHandle> {
        self.rf.find(protocol, tech_mode)
    }

    pub fn rf_interface(&self, handle: RfHandle) -> Option<&RfInterface> {
        self.rf.get(handle)
    }

    /// Write `data` into the configuration blob at `offset`.
    pub fn set_config(&mut self, offset: usize, data: &[u8]) -> Result<()> {
        let end = config_range(offset, data.len())?;
        self.config[offset..end].copy_from_slice(data);
        Ok(())
    }

    pub fn get_config(&self, offset: usize, len: usize) -> Result<&[u8]> {
        let end = config_range(offset, len)?;
        Ok(&self.config[offset..end])
    }

    /// Store a configuration parameter by NCI id in its blob slot.
    pub fn set_config_param(&mut self, id: u8, value: &[u8]) -> Result<()> {
        let (offset, max_len) = config::config_slot(id).ok_or(Error::InvalidParameter {
            kind: id,
            len: value.len(),
        })?;
        if value.len() > max_len {
            return Err(Error::InvalidParameter {
                kind: id,
                len: value.len(),
            });
        }
        let mut slot = vec![0u8; 1 + max_len];
        slot[0] = value.len() as u8;
        slot[1..1 + value.len()].copy_from_slice(value);
        self.set_config(offset, &slot)
    }

    /// Current value of a configuration parameter, `None` for unknown ids.
    pub fn config_param(&self, id: u8) -> Option<&[u8]> {
        let (offset, max_len) = config::config_slot(id)?;
        let len = (self.config[offset] as usize).min(max_len);
        self.get_config(offset + 1, len).ok()
    }

    pub fn add_remote(&mut self, remote: RemoteEndpoint) -> RemoteHandle {
        self.remotes.push(remote);
        RemoteHandle(self.remotes.len() - 1)
    }

    pub fn remote(&self, handle: RemoteHandle) -> Option<&RemoteEndpoint> {
        self.remotes.get(handle.0)
    }

    pub fn remote_mut(&mut self, handle: RemoteHandle) -> Option<&mut RemoteEndpoint> {
        self.remotes.get_mut(handle.0)
    }

    pub fn remotes(&self) -> impl Iterator<Item = &RemoteEndpoint> {
        self.remotes.iter()
    }

    pub fn active_re(&self) -> Option<RemoteHandle> {
        self.active_re
    }

    pub fn active_rf(&self) -> Option<RfHandle> {
        self.active_rf
    }

    pub fn active_remote(&self) -> Option<&RemoteEndpoint> {
        self.active_re.and_then(|h| self.remotes.get(h.0))
    }

    /// LLCP link of the active remote endpoint.
    pub fn llcp_mut(&mut self) -> Result<&mut LinkManager> {
        let handle = self.active_re.ok_or(Error::NoActiveEndpoint)?;
        self.remotes
            .get_mut(handle.0)
            .map(|re| &mut re.llcp)
            .ok_or(Error::NoActiveEndpoint)
    }

    fn activate(&mut self, remote: RemoteHandle, rf: RfHandle) {
        if let Some(re) = self.remotes.get_mut(remote.0) {
            re.llcp.reset();
            self.rf_state = if re.tech_mode.is_listen() {
                RfState::ListenActive
            } else {
                RfState::PollActive
            };
        }
        self.active_re = Some(remote);
        self.active_rf = Some(rf);
    }

    /// Drop the active handles and the LLCP state that ran over them.
    fn deactivate(&mut self) {
        if let Some(h) = self.active_re.take() {
            if let Some(re) = self.remotes.get_mut(h.0) {
                re.llcp.reset();
            }
        }
        self.active_rf = None;
    }

    /// CORE_RESET: back to `Reset`, keeping or clearing the configuration.
    pub fn reset(&mut self, reset_config: bool) {
        debug!("nfc reset (reset_config={})", reset_config);
        self.deactivate();
        for re in &mut self.remotes {
            re.llcp.reset();
        }
        self.state = DeviceState::Reset;
        self.rf_state = RfState::Idle;
        self.rf = RfTable::default();
        self.hci = HciRegistry::default();
        if reset_config {
            self.config.fill(0);
        }
    }
}

fn config_range(offset: usize, len: usize) -> Result<usize> {
    match offset.checked_add(len) {
        Some(end) if end <= CONFIG_BLOB_LEN => Ok(end),
        _ => Err(Error::ConfigOutOfRange { offset, len }),
    }
}
