// nfcemu-rs/nfcemu/src/device/remote.rs

use crate::llcp::LinkManager;
use crate::nci::rf::{RfProtocol, RfTechMode};

/// Index of a registered remote endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RemoteHandle(pub(crate) usize);

impl RemoteHandle {
    pub fn index(&self) -> usize {
        self.0
    }
}

/// Remote endpoint as reported by the RF layer.
///
/// Each endpoint owns the LLCP link that runs over its NFC-DEP session.
#[derive(Debug)]
pub struct RemoteEndpoint {
    pub protocol: RfProtocol,
    pub tech_mode: RfTechMode,
    pub nfcid3: [u8; 10],
    pub llcp: LinkManager,
}

impl RemoteEndpoint {
    pub fn new(protocol: RfProtocol, tech_mode: RfTechMode, nfcid3: [u8; 10]) -> Self {
        Self {
            protocol,
            tech_mode,
            nfcid3,
            llcp: LinkManager::new(),
        }
    }

    /// NFC-DEP peer listening in passive mode A, the usual LLCP setup.
    pub fn nfc_dep(nfcid3: [u8; 10]) -> Self {
        Self::new(RfProtocol::NfcDep, RfTechMode::PassivePollA, nfcid3)
    }
}
