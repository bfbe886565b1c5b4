// nfcemu-rs/nfcemu/src/hci/mod.rs
//! HCI (ETSI TS 102 622) message codec.
//!
//! In the exchange buffers an HCP message is preceded by one length byte,
//! since the register file carries no length of its own:
//! `[len] [CB | pipe(7)] [type(2) | instruction(6)] data…` where `len`
//! counts the HCP header and data.

use crate::nci::parser::{byte_at, ensure_len, slice_at};
use crate::{Error, Result};

/// Chaining bit: set on the last (or only) fragment
pub const CB_LAST: u8 = 0x80;

/// Message types
pub const TYPE_COMMAND: u8 = 0x00;
pub const TYPE_EVENT: u8 = 0x01;
pub const TYPE_RESPONSE: u8 = 0x02;

/// Generic commands
pub const ANY_SET_PARAMETER: u8 = 0x01;
pub const ANY_GET_PARAMETER: u8 = 0x02;
pub const ANY_OPEN_PIPE: u8 = 0x03;
pub const ANY_CLOSE_PIPE: u8 = 0x04;

/// Response codes
pub const ANY_OK: u8 = 0x00;
pub const ANY_E_NOT_CONNECTED: u8 = 0x01;
pub const ANY_E_CMD_PAR_UNKNOWN: u8 = 0x02;
pub const ANY_E_NOK: u8 = 0x03;
pub const ANY_E_REG_PAR_UNKNOWN: u8 = 0x05;
pub const ANY_E_PIPE_NOT_OPENED: u8 = 0x06;
pub const ANY_E_CMD_NOT_SUPPORTED: u8 = 0x07;
pub const ANY_E_INHIBITED: u8 = 0x08;

/// Static pipes that exist without OPEN_PIPE
pub const PIPE_LINK_MANAGEMENT: u8 = 0x00;
pub const PIPE_ADMIN: u8 = 0x01;

const HCP_HEADER_LEN: usize = 2;

/// One HCP message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HciPacket {
    /// False for a non-final fragment
    pub last: bool,
    pub pipe: u8,
    pub msg_type: u8,
    pub instruction: u8,
    pub data: Vec<u8>,
}

impl HciPacket {
    pub fn command(pipe: u8, instruction: u8, data: Vec<u8>) -> Self {
        Self {
            last: true,
            pipe: pipe & 0x7f,
            msg_type: TYPE_COMMAND,
            instruction: instruction & 0x3f,
            data,
        }
    }

    pub fn response(pipe: u8, code: u8, data: Vec<u8>) -> Self {
        Self {
            last: true,
            pipe: pipe & 0x7f,
            msg_type: TYPE_RESPONSE,
            instruction: code & 0x3f,
            data,
        }
    }

    pub fn encoded_len(&self) -> usize {
        1 + HCP_HEADER_LEN + self.data.len()
    }

    pub fn encode_into(&self, buf: &mut [u8]) -> Result<usize> {
        let hcp_len = HCP_HEADER_LEN + self.data.len();
        if hcp_len > u8::MAX as usize {
            return Err(Error::InvalidLength {
                expected: u8::MAX as usize,
                actual: hcp_len,
            });
        }
        let total = self.encoded_len();
        ensure_len(buf, total)?;
        buf[0] = hcp_len as u8;
        buf[1] = (if self.last { CB_LAST } else { 0 }) | (self.pipe & 0x7f);
        buf[2] = (self.msg_type << 6) | (self.instruction & 0x3f);
        buf[3..total].copy_from_slice(&self.data);
        Ok(total)
    }

    pub fn encode(&self) -> Result<Vec<u8>> {
        let mut out = vec![0u8; self.encoded_len()];
        let n = self.encode_into(&mut out)?;
        out.truncate(n);
        Ok(out)
    }

    pub fn decode(buf: &[u8]) -> Result<Self> {
        let hcp_len = byte_at(buf, 0)? as usize;
        if hcp_len < HCP_HEADER_LEN {
            return Err(Error::FrameFormat(format!(
                "hcp message too short: {}",
                hcp_len
            )));
        }
        let hcp = slice_at(buf, 1, hcp_len)?;
        Ok(Self {
            last: hcp[0] & CB_LAST != 0,
            pipe: hcp[0] & 0x7f,
            msg_type: hcp[1] >> 6,
            instruction: hcp[1] & 0x3f,
            data: hcp[HCP_HEADER_LEN..].to_vec(),
        })
    }
}
