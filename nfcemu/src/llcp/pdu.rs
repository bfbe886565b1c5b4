// nfcemu-rs/nfcemu/src/llcp/pdu.rs

use crate::constants::LLCP_MAX_PDU_LEN;
use crate::types::Sap;
use crate::{Error, Result};
use std::convert::TryFrom;

/// Length of the DSAP/PTYPE/SSAP header
pub const HEADER_LEN: usize = 2;

/// LLCP PDU type (4 bits)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum PduType {
    Symm = 0x0,
    Pax = 0x1,
    Agf = 0x2,
    Ui = 0x3,
    Connect = 0x4,
    Disc = 0x5,
    Cc = 0x6,
    Dm = 0x7,
    Frmr = 0x8,
    Snl = 0x9,
    I = 0xc,
    Rr = 0xd,
    Rnr = 0xe,
}

impl PduType {
    pub const ALL: [PduType; 13] = [
        PduType::Symm,
        PduType::Pax,
        PduType::Agf,
        PduType::Ui,
        PduType::Connect,
        PduType::Disc,
        PduType::Cc,
        PduType::Dm,
        PduType::Frmr,
        PduType::Snl,
        PduType::I,
        PduType::Rr,
        PduType::Rnr,
    ];

    /// I, RR and RNR carry a sequence byte after the header.
    pub fn is_sequenced(&self) -> bool {
        matches!(self, PduType::I | PduType::Rr | PduType::Rnr)
    }
}

impl TryFrom<u8> for PduType {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self> {
        PduType::ALL
            .iter()
            .copied()
            .find(|t| *t as u8 == value)
            .ok_or(Error::UnknownPduType(value))
    }
}

/// N(S)/N(R) pair. RR and RNR only use `nr`; `ns` is sent as zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sequence {
    pub ns: u8,
    pub nr: u8,
}

impl Sequence {
    pub fn new(ns: u8, nr: u8) -> Result<Self> {
        if ns > 0x0f || nr > 0x0f {
            return Err(Error::FrameFormat(format!(
                "sequence out of range: ns={}, nr={}",
                ns, nr
            )));
        }
        Ok(Self { ns, nr })
    }

    pub fn to_byte(&self) -> u8 {
        (self.ns << 4) | (self.nr & 0x0f)
    }

    pub fn from_byte(b: u8) -> Self {
        Self {
            ns: b >> 4,
            nr: b & 0x0f,
        }
    }
}

/// Information field of an FRMR PDU.
///
/// Layout: `[W I R S | PTYPE] [N(S) | N(R)] [V(S) | V(R)] [V(SA) | V(RA)]`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrmrInfo {
    pub flags: u8,
    pub ptype: PduType,
    pub sequence: u8,
    pub v_s: u8,
    pub v_r: u8,
    pub v_sa: u8,
    pub v_ra: u8,
}

impl FrmrInfo {
    pub fn to_bytes(&self) -> [u8; 4] {
        [
            (self.flags << 4) | (self.ptype as u8),
            self.sequence,
            (self.v_s << 4) | (self.v_r & 0x0f),
            (self.v_sa << 4) | (self.v_ra & 0x0f),
        ]
    }

    pub fn from_bytes(b: &[u8]) -> Result<Self> {
        if b.len() < 4 {
            return Err(Error::InvalidLength {
                expected: 4,
                actual: b.len(),
            });
        }
        Ok(Self {
            flags: b[0] >> 4,
            ptype: PduType::try_from(b[0] & 0x0f)?,
            sequence: b[1],
            v_s: b[2] >> 4,
            v_r: b[2] & 0x0f,
            v_sa: b[3] >> 4,
            v_ra: b[3] & 0x0f,
        })
    }
}

/// Check that `needed` bytes fit both the PDU ceiling and `buf`.
fn ensure_room(buf: &[u8], needed: usize) -> Result<()> {
    if needed > LLCP_MAX_PDU_LEN {
        return Err(Error::InvalidLength {
            expected: LLCP_MAX_PDU_LEN,
            actual: needed,
        });
    }
    if buf.len() < needed {
        return Err(Error::InvalidLength {
            expected: needed,
            actual: buf.len(),
        });
    }
    Ok(())
}

/// Write the 2-byte header. Bit order is MSB first on the wire:
/// `DDDDDDPP PPSSSSSS`.
pub fn encode_pdu(buf: &mut [u8], dsap: Sap, ptype: PduType, ssap: Sap) -> Result<usize> {
    ensure_room(buf, HEADER_LEN)?;
    let p = ptype as u8;
    buf[0] = (dsap.as_u8() << 2) | (p >> 2);
    buf[1] = ((p & 0x03) << 6) | ssap.as_u8();
    Ok(HEADER_LEN)
}

/// Header plus the N(S)/N(R) byte of an I-frame.
pub fn encode_i_frame(buf: &mut [u8], dsap: Sap, ssap: Sap, ns: u8, nr: u8) -> Result<usize> {
    let seq = Sequence::new(ns, nr)?;
    ensure_room(buf, HEADER_LEN + 1)?;
    encode_pdu(buf, dsap, PduType::I, ssap)?;
    buf[HEADER_LEN] = seq.to_byte();
    Ok(HEADER_LEN + 1)
}

/// RR or RNR acknowledging everything up to `nr`.
pub fn encode_receive_ready(
    buf: &mut [u8],
    ptype: PduType,
    dsap: Sap,
    ssap: Sap,
    nr: u8,
) -> Result<usize> {
    if !matches!(ptype, PduType::Rr | PduType::Rnr) {
        return Err(Error::FrameFormat(format!("{:?} is not RR/RNR", ptype)));
    }
    let seq = Sequence::new(0, nr)?;
    ensure_room(buf, HEADER_LEN + 1)?;
    encode_pdu(buf, dsap, ptype, ssap)?;
    buf[HEADER_LEN] = seq.to_byte();
    Ok(HEADER_LEN + 1)
}

pub fn encode_dm(buf: &mut [u8], dsap: Sap, ssap: Sap, reason: u8) -> Result<usize> {
    ensure_room(buf, HEADER_LEN + 1)?;
    encode_pdu(buf, dsap, PduType::Dm, ssap)?;
    buf[HEADER_LEN] = reason;
    Ok(HEADER_LEN + 1)
}

pub fn encode_frmr(buf: &mut [u8], dsap: Sap, ssap: Sap, info: &FrmrInfo) -> Result<usize> {
    ensure_room(buf, HEADER_LEN + 4)?;
    encode_pdu(buf, dsap, PduType::Frmr, ssap)?;
    buf[HEADER_LEN..HEADER_LEN + 4].copy_from_slice(&info.to_bytes());
    Ok(HEADER_LEN + 4)
}

/// Header followed by an arbitrary information field (CONNECT/CC params,
/// SNL, UI payloads).
pub fn encode_with_info(
    buf: &mut [u8],
    dsap: Sap,
    ptype: PduType,
    ssap: Sap,
    info: &[u8],
) -> Result<usize> {
    let total = HEADER_LEN + info.len();
    ensure_room(buf, total)?;
    encode_pdu(buf, dsap, ptype, ssap)?;
    buf[HEADER_LEN..total].copy_from_slice(info);
    Ok(total)
}

pub fn decode_ptype(buf: &[u8]) -> Result<PduType> {
    if buf.len() < HEADER_LEN {
        return Err(Error::InvalidLength {
            expected: HEADER_LEN,
            actual: buf.len(),
        });
    }
    PduType::try_from(((buf[0] & 0x03) << 2) | (buf[1] >> 6))
}

/// Decode `(dsap, ptype, ssap)` from the first two bytes.
pub fn decode_header(buf: &[u8]) -> Result<(Sap, PduType, Sap)> {
    let ptype = decode_ptype(buf)?;
    Ok((
        Sap::new_unchecked(buf[0] >> 2),
        ptype,
        Sap::new_unchecked(buf[1] & 0x3f),
    ))
}

/// Decoded PDU. The raw buffer is never reinterpreted in place; everything
/// goes through `encode`/`decode`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pdu {
    pub dsap: Sap,
    pub ptype: PduType,
    pub ssap: Sap,
    pub sequence: Option<Sequence>,
    pub info: Vec<u8>,
}

impl Pdu {
    pub fn new(dsap: Sap, ptype: PduType, ssap: Sap) -> Self {
        Self {
            dsap,
            ptype,
            ssap,
            sequence: None,
            info: Vec::new(),
        }
    }

    pub fn with_info(mut self, info: Vec<u8>) -> Self {
        self.info = info;
        self
    }

    pub fn i_frame(dsap: Sap, ssap: Sap, ns: u8, nr: u8, info: Vec<u8>) -> Result<Self> {
        Ok(Self {
            dsap,
            ptype: PduType::I,
            ssap,
            sequence: Some(Sequence::new(ns, nr)?),
            info,
        })
    }

    pub fn rr(dsap: Sap, ssap: Sap, nr: u8) -> Result<Self> {
        Ok(Self {
            dsap,
            ptype: PduType::Rr,
            ssap,
            sequence: Some(Sequence::new(0, nr)?),
            info: Vec::new(),
        })
    }

    pub fn rnr(dsap: Sap, ssap: Sap, nr: u8) -> Result<Self> {
        Ok(Self {
            ptype: PduType::Rnr,
            ..Self::rr(dsap, ssap, nr)?
        })
    }

    /// DM reason code, if this is a DM carrying one.
    pub fn dm_reason(&self) -> Option<u8> {
        match self.ptype {
            PduType::Dm => self.info.first().copied(),
            _ => None,
        }
    }

    pub fn encoded_len(&self) -> usize {
        HEADER_LEN + usize::from(self.sequence.is_some()) + self.info.len()
    }

    pub fn encode(&self) -> Result<Vec<u8>> {
        let mut out = vec![0u8; self.encoded_len()];
        let n = self.encode_into(&mut out)?;
        out.truncate(n);
        Ok(out)
    }

    pub fn encode_into(&self, buf: &mut [u8]) -> Result<usize> {
        ensure_room(buf, self.encoded_len())?;
        let mut pos = match (self.ptype.is_sequenced(), self.sequence) {
            (true, Some(seq)) => {
                encode_pdu(buf, self.dsap, self.ptype, self.ssap)?;
                buf[HEADER_LEN] = seq.to_byte();
                HEADER_LEN + 1
            }
            (false, None) => encode_pdu(buf, self.dsap, self.ptype, self.ssap)?,
            (true, None) => {
                return Err(Error::FrameFormat(format!(
                    "{:?} pdu without sequence",
                    self.ptype
                )));
            }
            (false, Some(_)) => {
                return Err(Error::FrameFormat(format!(
                    "{:?} pdu cannot carry a sequence",
                    self.ptype
                )));
            }
        };
        buf[pos..pos + self.info.len()].copy_from_slice(&self.info);
        pos += self.info.len();
        Ok(pos)
    }

    pub fn decode(buf: &[u8]) -> Result<Self> {
        if buf.len() > LLCP_MAX_PDU_LEN {
            return Err(Error::InvalidLength {
                expected: LLCP_MAX_PDU_LEN,
                actual: buf.len(),
            });
        }
        let (dsap, ptype, ssap) = decode_header(buf)?;
        let (sequence, info_start) = if ptype.is_sequenced() {
            if buf.len() < HEADER_LEN + 1 {
                return Err(Error::InvalidLength {
                    expected: HEADER_LEN + 1,
                    actual: buf.len(),
                });
            }
            (Some(Sequence::from_byte(buf[HEADER_LEN])), HEADER_LEN + 1)
        } else {
            (None, HEADER_LEN)
        };
        Ok(Self {
            dsap,
            ptype,
            ssap,
            sequence,
            info: buf[info_start..].to_vec(),
        })
    }
}
