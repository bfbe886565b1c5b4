// nfcemu-rs/nfcemu/src/nci/packet.rs

use crate::constants::{MAX_NCI_PAYLOAD_LEN, NCI_HEADER_LEN};
use crate::nci::codes::{MT_CMD, MT_DATA, MT_NTF, MT_RSP};
use crate::nci::parser::{byte_at, ensure_len};
use crate::{Error, Result};
use std::convert::TryFrom;

/// NCI message type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum MessageType {
    Data = MT_DATA,
    Command = MT_CMD,
    Response = MT_RSP,
    Notification = MT_NTF,
}

impl TryFrom<u8> for MessageType {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self> {
        match value {
            MT_DATA => Ok(Self::Data),
            MT_CMD => Ok(Self::Command),
            MT_RSP => Ok(Self::Response),
            MT_NTF => Ok(Self::Notification),
            other => Err(Error::FrameFormat(format!("reserved message type {}", other))),
        }
    }
}

/// NCI packet.
///
/// Header: `[MT(3) | PBF(1) | GID or ConnID(4)] [RFU(2) | OID(6)] [L]`
/// followed by `L` payload bytes. Data packets leave the second byte zero.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NciPacket {
    Control {
        mt: MessageType,
        pbf: bool,
        gid: u8,
        oid: u8,
        payload: Vec<u8>,
    },
    Data {
        pbf: bool,
        conn_id: u8,
        payload: Vec<u8>,
    },
}

impl NciPacket {
    pub fn command(gid: u8, oid: u8, payload: Vec<u8>) -> Self {
        Self::control(MessageType::Command, gid, oid, payload)
    }

    pub fn response(gid: u8, oid: u8, payload: Vec<u8>) -> Self {
        Self::control(MessageType::Response, gid, oid, payload)
    }

    pub fn notification(gid: u8, oid: u8, payload: Vec<u8>) -> Self {
        Self::control(MessageType::Notification, gid, oid, payload)
    }

    fn control(mt: MessageType, gid: u8, oid: u8, payload: Vec<u8>) -> Self {
        Self::Control {
            mt,
            pbf: false,
            gid: gid & 0x0f,
            oid: oid & 0x3f,
            payload,
        }
    }

    pub fn data(conn_id: u8, payload: Vec<u8>) -> Self {
        Self::Data {
            pbf: false,
            conn_id: conn_id & 0x0f,
            payload,
        }
    }

    pub fn message_type(&self) -> MessageType {
        match self {
            Self::Control { mt, .. } => *mt,
            Self::Data { .. } => MessageType::Data,
        }
    }

    pub fn payload(&self) -> &[u8] {
        match self {
            Self::Control { payload, .. } | Self::Data { payload, .. } => payload,
        }
    }

    pub fn encoded_len(&self) -> usize {
        NCI_HEADER_LEN + self.payload().len()
    }

    pub fn encode(&self) -> Result<Vec<u8>> {
        let mut out = vec![0u8; self.encoded_len()];
        let n = self.encode_into(&mut out)?;
        out.truncate(n);
        Ok(out)
    }

    /// Encode into `buf`, returning the number of bytes written.
    pub fn encode_into(&self, buf: &mut [u8]) -> Result<usize> {
        let payload = self.payload();
        if payload.len() > MAX_NCI_PAYLOAD_LEN {
            return Err(Error::InvalidLength {
                expected: MAX_NCI_PAYLOAD_LEN,
                actual: payload.len(),
            });
        }
        let total = self.encoded_len();
        ensure_len(buf, total)?;

        let (b0, b1) = match self {
            Self::Control {
                mt, pbf, gid, oid, ..
            } => (
                ((*mt as u8) << 5) | (u8::from(*pbf) << 4) | (gid & 0x0f),
                oid & 0x3f,
            ),
            Self::Data { pbf, conn_id, .. } => {
                ((MT_DATA << 5) | (u8::from(*pbf) << 4) | (conn_id & 0x0f), 0)
            }
        };
        buf[0] = b0;
        buf[1] = b1;
        buf[2] = payload.len() as u8;
        buf[NCI_HEADER_LEN..total].copy_from_slice(payload);
        Ok(total)
    }

    /// Decode the packet at the start of `buf`. Bytes past the announced
    /// payload length are ignored, since exchange buffers are zero padded.
    pub fn decode(buf: &[u8]) -> Result<Self> {
        ensure_len(buf, NCI_HEADER_LEN)?;
        let b0 = byte_at(buf, 0)?;
        let mt = MessageType::try_from(b0 >> 5)?;
        let pbf = b0 & 0x10 != 0;
        let len = buf[2] as usize;
        ensure_len(buf, NCI_HEADER_LEN + len)?;
        let payload = buf[NCI_HEADER_LEN..NCI_HEADER_LEN + len].to_vec();

        Ok(match mt {
            MessageType::Data => Self::Data {
                pbf,
                conn_id: b0 & 0x0f,
                payload,
            },
            mt => Self::Control {
                mt,
                pbf,
                gid: b0 & 0x0f,
                oid: buf[1] & 0x3f,
                payload,
            },
        })
    }
}
