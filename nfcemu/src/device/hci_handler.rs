// nfcemu-rs/nfcemu/src/device/hci_handler.rs

use std::collections::BTreeMap;

use log::{debug, warn};

use crate::device::{DeviceState, NfcDevice};
use crate::hci::*;

/// Result of processing one HCI command
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HciOutcome {
    pub resp: Vec<u8>,
    pub success: bool,
}

/// Open pipes and their registries.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HciRegistry {
    open: u128,
    params: BTreeMap<(u8, u8), Vec<u8>>,
}

impl HciRegistry {
    pub fn is_open(&self, pipe: u8) -> bool {
        pipe <= PIPE_ADMIN || self.open & (1u128 << (pipe & 0x7f)) != 0
    }

    pub fn param(&self, pipe: u8, index: u8) -> Option<&[u8]> {
        self.params.get(&(pipe, index)).map(Vec::as_slice)
    }

    fn open(&mut self, pipe: u8) {
        self.open |= 1u128 << (pipe & 0x7f);
    }

    fn close(&mut self, pipe: u8) {
        self.open &= !(1u128 << (pipe & 0x7f));
        self.params.retain(|(p, _), _| *p != pipe);
    }

    /// Execute a generic command; returns the response code and data.
    fn execute(&mut self, cmd: &HciPacket) -> (u8, Vec<u8>) {
        let pipe = cmd.pipe;
        match cmd.instruction {
            ANY_OPEN_PIPE => {
                self.open(pipe);
                (ANY_OK, Vec::new())
            }
            ANY_CLOSE_PIPE if self.is_open(pipe) => {
                self.close(pipe);
                (ANY_OK, Vec::new())
            }
            ANY_SET_PARAMETER | ANY_GET_PARAMETER | ANY_CLOSE_PIPE if !self.is_open(pipe) => {
                (ANY_E_PIPE_NOT_OPENED, Vec::new())
            }
            ANY_SET_PARAMETER => match cmd.data.split_first() {
                Some((index, value)) => {
                    self.params.insert((pipe, *index), value.to_vec());
                    (ANY_OK, Vec::new())
                }
                None => (ANY_E_CMD_PAR_UNKNOWN, Vec::new()),
            },
            ANY_GET_PARAMETER => match cmd.data.first().and_then(|i| self.param(pipe, *i)) {
                Some(value) => (ANY_OK, value.to_vec()),
                None => (ANY_E_REG_PAR_UNKNOWN, Vec::new()),
            },
            _ => (ANY_E_CMD_NOT_SUPPORTED, Vec::new()),
        }
    }
}

impl NfcDevice {
    /// Process the HCI command at the start of `cmnd`.
    pub fn process_hci(&mut self, cmnd: &[u8]) -> HciOutcome {
        let cmd = match HciPacket::decode(cmnd) {
            Ok(c) => c,
            Err(e) => {
                warn!("hci: undecodable command: {}", e);
                return HciOutcome::default();
            }
        };
        if cmd.msg_type != TYPE_COMMAND {
            debug!("hci: ignoring message type {} on pipe {}", cmd.msg_type, cmd.pipe);
            return HciOutcome::default();
        }

        let (code, data) = if !cmd.last {
            debug!("hci: fragmented command on pipe {}", cmd.pipe);
            (ANY_E_CMD_NOT_SUPPORTED, Vec::new())
        } else if self.state != DeviceState::Initialized {
            (ANY_E_INHIBITED, Vec::new())
        } else {
            self.hci.execute(&cmd)
        };
        debug!(
            "hci: pipe {} instr {:#04x} -> {:#04x}",
            cmd.pipe, cmd.instruction, code
        );

        match HciPacket::response(cmd.pipe, code, data).encode() {
            Ok(resp) => HciOutcome {
                resp,
                success: true,
            },
            Err(e) => {
                warn!("hci: response encoding failed: {}", e);
                HciOutcome::default()
            }
        }
    }
}
