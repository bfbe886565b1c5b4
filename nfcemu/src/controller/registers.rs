// nfcemu-rs/nfcemu/src/controller/registers.rs

use std::fmt;

use crate::constants::*;
use crate::types::BufKind;
use crate::{Error, Result};

/// A decoded MMIO offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Register {
    Status,
    Ctrl,
    Pu,
    Ws,
    Cmnd(usize),
    Resp(usize),
    Ntfn(usize),
    Data(usize),
    Reserved(usize),
}

impl Register {
    /// Map a byte offset in the register window to the register it hits.
    pub fn decode(offset: usize) -> Result<Self> {
        let reg = match offset {
            OFFSET_STATUS => Self::Status,
            OFFSET_CTRL => Self::Ctrl,
            OFFSET_PU => Self::Pu,
            OFFSET_WS => Self::Ws,
            o if o < OFFSET_RESP => Self::Cmnd(o - OFFSET_CMND),
            o if o < OFFSET_NTFN => Self::Resp(o - OFFSET_RESP),
            o if o < OFFSET_DATA => Self::Ntfn(o - OFFSET_NTFN),
            o if o < OFFSET_RESERVED0 => Self::Data(o - OFFSET_DATA),
            o if o < END_OFFSET => Self::Reserved(o - OFFSET_RESERVED0),
            _ => return Err(Error::BadOffset(offset)),
        };
        Ok(reg)
    }
}

/// The controller register file. Its in-memory order matches the MMIO
/// window, which is also the snapshot layout.
#[derive(Clone, PartialEq, Eq)]
pub struct Registers {
    pub(crate) status: u8,
    pub(crate) ctrl: u8,
    pub(crate) pu: u8,
    pub(crate) ws: u8,
    pub(crate) cmnd: [u8; BUFFER_LEN],
    pub(crate) resp: [u8; BUFFER_LEN],
    pub(crate) ntfn: [u8; BUFFER_LEN],
    pub(crate) data: [u8; BUFFER_LEN],
    reserved0: [u8; RESERVED0_LEN],
}

impl Default for Registers {
    fn default() -> Self {
        Self {
            status: 0,
            ctrl: 0,
            pu: 0,
            ws: 0,
            cmnd: [0u8; BUFFER_LEN],
            resp: [0u8; BUFFER_LEN],
            ntfn: [0u8; BUFFER_LEN],
            data: [0u8; BUFFER_LEN],
            reserved0: [0u8; RESERVED0_LEN],
        }
    }
}

impl fmt::Debug for Registers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registers")
            .field("status", &format_args!("{:#04x}", self.status))
            .field("ctrl", &self.ctrl)
            .field("pu", &self.pu)
            .field("ws", &self.ws)
            .finish_non_exhaustive()
    }
}

impl Registers {
    pub fn status(&self) -> u8 {
        self.status
    }

    pub fn ctrl(&self) -> u8 {
        self.ctrl
    }

    pub fn pu(&self) -> u8 {
        self.pu
    }

    pub fn ws(&self) -> u8 {
        self.ws
    }

    pub fn cmnd(&self) -> &[u8] {
        &self.cmnd
    }

    pub fn resp(&self) -> &[u8] {
        &self.resp
    }

    pub fn ntfn(&self) -> &[u8] {
        &self.ntfn
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn buffer(&self, kind: BufKind) -> &[u8] {
        match kind {
            BufKind::Notification => &self.ntfn,
            BufKind::Data => &self.data,
        }
    }

    pub(crate) fn buffer_mut(&mut self, kind: BufKind) -> &mut [u8] {
        match kind {
            BufKind::Notification => &mut self.ntfn,
            BufKind::Data => &mut self.data,
        }
    }

    /// Raw byte behind a register.
    pub fn get(&self, reg: Register) -> u8 {
        match reg {
            Register::Status => self.status,
            Register::Ctrl => self.ctrl,
            Register::Pu => self.pu,
            Register::Ws => self.ws,
            Register::Cmnd(i) => self.cmnd[i],
            Register::Resp(i) => self.resp[i],
            Register::Ntfn(i) => self.ntfn[i],
            Register::Data(i) => self.data[i],
            Register::Reserved(i) => self.reserved0[i],
        }
    }

    /// Plain storage write for buffer registers. Returns false for the
    /// control registers, which the engine handles itself.
    pub(crate) fn store(&mut self, reg: Register, value: u8) -> bool {
        let slot = match reg {
            Register::Cmnd(i) => &mut self.cmnd[i],
            Register::Resp(i) => &mut self.resp[i],
            Register::Ntfn(i) => &mut self.ntfn[i],
            Register::Data(i) => &mut self.data[i],
            Register::Reserved(i) => &mut self.reserved0[i],
            _ => return false,
        };
        *slot = value;
        true
    }

    /// Append the whole register window, `END_OFFSET` bytes.
    pub fn write_window(&self, out: &mut Vec<u8>) {
        out.reserve(END_OFFSET);
        out.extend_from_slice(&[self.status, self.ctrl, self.pu, self.ws]);
        out.extend_from_slice(&self.cmnd);
        out.extend_from_slice(&self.resp);
        out.extend_from_slice(&self.ntfn);
        out.extend_from_slice(&self.data);
        out.extend_from_slice(&self.reserved0);
    }

    /// Rebuild a register file from a window image written by
    /// [`Registers::write_window`].
    pub fn from_window(window: &[u8]) -> Result<Self> {
        if window.len() != END_OFFSET {
            return Err(Error::InvalidLength {
                expected: END_OFFSET,
                actual: window.len(),
            });
        }
        let mut regs = Self {
            status: window[OFFSET_STATUS],
            ctrl: window[OFFSET_CTRL],
            pu: window[OFFSET_PU],
            ws: window[OFFSET_WS],
            ..Self::default()
        };
        regs.cmnd
            .copy_from_slice(&window[OFFSET_CMND..OFFSET_RESP]);
        regs.resp
            .copy_from_slice(&window[OFFSET_RESP..OFFSET_NTFN]);
        regs.ntfn
            .copy_from_slice(&window[OFFSET_NTFN..OFFSET_DATA]);
        regs.data
            .copy_from_slice(&window[OFFSET_DATA..OFFSET_RESERVED0]);
        regs.reserved0
            .copy_from_slice(&window[OFFSET_RESERVED0..END_OFFSET]);
        Ok(regs)
    }
}
