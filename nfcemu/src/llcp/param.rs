// nfcemu-rs/nfcemu/src/llcp/param.rs

use crate::constants::{LLCP_MAGIC, LLCP_VERSION_MAJOR, LLCP_VERSION_MINOR};
use crate::llcp::config;
use crate::{Error, Result};

pub const PARAM_VERSION: u8 = 0x01;
pub const PARAM_MIUX: u8 = 0x02;
pub const PARAM_WKS: u8 = 0x03;
pub const PARAM_LTO: u8 = 0x04;
pub const PARAM_RW: u8 = 0x05;
pub const PARAM_SN: u8 = 0x06;
pub const PARAM_OPT: u8 = 0x07;
pub const PARAM_SDREQ: u8 = 0x08;
pub const PARAM_SDRES: u8 = 0x09;

/// LLCP TLV parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Param {
    Version { major: u8, minor: u8 },
    /// MIU extension, 11 bits
    Miux(u16),
    /// Well-known service list bitmap
    Wks(u16),
    /// Link timeout in 10 ms units
    Lto(u8),
    /// Receive window, 4 bits
    Rw(u8),
    /// Service name URI
    Sn(Vec<u8>),
    /// Link service class, 2 bits
    Opt(u8),
    SdReq { tid: u8, uri: Vec<u8> },
    SdRes { tid: u8, sap: u8 },
}

impl Param {
    pub fn kind(&self) -> u8 {
        match self {
            Param::Version { .. } => PARAM_VERSION,
            Param::Miux(_) => PARAM_MIUX,
            Param::Wks(_) => PARAM_WKS,
            Param::Lto(_) => PARAM_LTO,
            Param::Rw(_) => PARAM_RW,
            Param::Sn(_) => PARAM_SN,
            Param::Opt(_) => PARAM_OPT,
            Param::SdReq { .. } => PARAM_SDREQ,
            Param::SdRes { .. } => PARAM_SDRES,
        }
    }

    fn value(&self) -> Vec<u8> {
        match self {
            Param::Version { major, minor } => vec![(major << 4) | (minor & 0x0f)],
            Param::Miux(m) => (m & 0x07ff).to_be_bytes().to_vec(),
            Param::Wks(w) => w.to_be_bytes().to_vec(),
            Param::Lto(l) => vec![*l],
            Param::Rw(r) => vec![r & 0x0f],
            Param::Sn(uri) => uri.clone(),
            Param::Opt(lsc) => vec![lsc & 0x03],
            Param::SdReq { tid, uri } => {
                let mut v = Vec::with_capacity(1 + uri.len());
                v.push(*tid);
                v.extend_from_slice(uri);
                v
            }
            Param::SdRes { tid, sap } => vec![*tid, sap & 0x3f],
        }
    }

    /// Append the TLV encoding to `out`.
    pub fn encode_into(&self, out: &mut Vec<u8>) -> Result<()> {
        let value = self.value();
        if value.len() > u8::MAX as usize {
            return Err(Error::InvalidParameter {
                kind: self.kind(),
                len: value.len(),
            });
        }
        out.push(self.kind());
        out.push(value.len() as u8);
        out.extend_from_slice(&value);
        Ok(())
    }

    /// Decode a single parameter. Returns `Ok(None)` for parameter types
    /// this implementation does not know; LLCP requires those be ignored.
    pub fn decode(kind: u8, value: &[u8]) -> Result<Option<Self>> {
        let fixed = |n: usize| -> Result<()> {
            if value.len() != n {
                return Err(Error::InvalidParameter {
                    kind,
                    len: value.len(),
                });
            }
            Ok(())
        };
        let param = match kind {
            PARAM_VERSION => {
                fixed(1)?;
                Param::Version {
                    major: value[0] >> 4,
                    minor: value[0] & 0x0f,
                }
            }
            PARAM_MIUX => {
                fixed(2)?;
                Param::Miux(u16::from_be_bytes([value[0], value[1]]) & 0x07ff)
            }
            PARAM_WKS => {
                fixed(2)?;
                Param::Wks(u16::from_be_bytes([value[0], value[1]]))
            }
            PARAM_LTO => {
                fixed(1)?;
                Param::Lto(value[0])
            }
            PARAM_RW => {
                fixed(1)?;
                Param::Rw(value[0] & 0x0f)
            }
            PARAM_SN => Param::Sn(value.to_vec()),
            PARAM_OPT => {
                fixed(1)?;
                Param::Opt(value[0] & 0x03)
            }
            PARAM_SDREQ => {
                if value.is_empty() {
                    return Err(Error::InvalidParameter { kind, len: 0 });
                }
                Param::SdReq {
                    tid: value[0],
                    uri: value[1..].to_vec(),
                }
            }
            PARAM_SDRES => {
                fixed(2)?;
                Param::SdRes {
                    tid: value[0],
                    sap: value[1] & 0x3f,
                }
            }
            _ => return Ok(None),
        };
        Ok(Some(param))
    }
}

/// Walk a TLV block and decode every known parameter.
pub fn parse_params(mut data: &[u8]) -> Result<Vec<Param>> {
    let mut params = Vec::new();
    while !data.is_empty() {
        if data.len() < 2 {
            return Err(Error::InvalidLength {
                expected: 2,
                actual: data.len(),
            });
        }
        let kind = data[0];
        let len = data[1] as usize;
        if data.len() < 2 + len {
            return Err(Error::InvalidLength {
                expected: 2 + len,
                actual: data.len(),
            });
        }
        if let Some(p) = Param::decode(kind, &data[2..2 + len])? {
            params.push(p);
        }
        data = &data[2 + len..];
    }
    Ok(params)
}

pub fn encode_params(params: &[Param]) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    for p in params {
        p.encode_into(&mut out)?;
    }
    Ok(out)
}

/// General bytes used during link activation: LLCP magic followed by the
/// VERSION, WKS and LTO parameters.
pub fn create_param_tail() -> Vec<u8> {
    let mut out = LLCP_MAGIC.to_vec();
    let params = [
        Param::Version {
            major: LLCP_VERSION_MAJOR,
            minor: LLCP_VERSION_MINOR,
        },
        Param::Wks(config::DEFAULT_WKS),
        Param::Lto(config::DEFAULT_LTO),
    ];
    for p in &params {
        // fixed-size parameters always fit a TLV
        let _ = p.encode_into(&mut out);
    }
    out
}
