// nfcemu-rs/nfcemu/src/controller/snapshot.rs

use crate::constants::{END_OFFSET, SNAPSHOT_VERSION};
use crate::controller::registers::Registers;
use crate::{Error, Result};

const VERSION_LEN: usize = 4;

/// Saved register file: a format version plus the register window image.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Snapshot {
    version: u32,
    window: Vec<u8>,
}

impl Snapshot {
    pub(crate) fn capture(regs: &Registers) -> Self {
        let mut window = Vec::with_capacity(END_OFFSET);
        regs.write_window(&mut window);
        Self {
            version: SNAPSHOT_VERSION,
            window,
        }
    }

    /// Build a snapshot from raw parts, e.g. ones kept by an external store.
    pub fn from_parts(version: u32, window: Vec<u8>) -> Self {
        Self { version, window }
    }

    pub fn version(&self) -> u32 {
        self.version
    }

    /// Register window image, `END_OFFSET` bytes in MMIO order.
    pub fn window(&self) -> &[u8] {
        &self.window
    }

    /// Check the version and decode the register file.
    pub(crate) fn registers(&self) -> Result<Registers> {
        if self.version != SNAPSHOT_VERSION {
            return Err(Error::SnapshotVersion {
                expected: SNAPSHOT_VERSION,
                actual: self.version,
            });
        }
        Registers::from_window(&self.window)
    }

    /// `[version u32 LE][window]`
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(VERSION_LEN + self.window.len());
        out.extend_from_slice(&self.version.to_le_bytes());
        out.extend_from_slice(&self.window);
        out
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() < VERSION_LEN {
            return Err(Error::InvalidLength {
                expected: VERSION_LEN + END_OFFSET,
                actual: bytes.len(),
            });
        }
        let (head, window) = bytes.split_at(VERSION_LEN);
        let mut version = [0u8; VERSION_LEN];
        version.copy_from_slice(head);
        Ok(Self {
            version: u32::from_le_bytes(version),
            window: window.to_vec(),
        })
    }
}
