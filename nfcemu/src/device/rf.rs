// nfcemu-rs/nfcemu/src/device/rf.rs

use crate::constants::NUMBER_OF_RF_INTERFACES;
use crate::device::config::DEFAULT_RF_TABLE;
use crate::nci::commands::DiscoverMapping;
use crate::nci::rf::{MAP_MODE_LISTEN, MAP_MODE_POLL, RfInterfaceType, RfProtocol, RfTechMode};

/// Index of a slot in the RF interface table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RfHandle(pub(crate) usize);

impl RfHandle {
    pub fn index(&self) -> usize {
        self.0
    }
}

/// One RF interface slot: which interface serves `protocol` in `tech_mode`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RfInterface {
    pub protocol: RfProtocol,
    pub tech_mode: RfTechMode,
    pub interface: RfInterfaceType,
}

/// Fixed 8-slot RF interface table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RfTable {
    slots: [RfInterface; NUMBER_OF_RF_INTERFACES],
}

impl Default for RfTable {
    fn default() -> Self {
        Self {
            slots: DEFAULT_RF_TABLE.map(|(protocol, tech_mode, interface)| RfInterface {
                protocol,
                tech_mode,
                interface,
            }),
        }
    }
}

impl RfTable {
    pub fn get(&self, handle: RfHandle) -> Option<&RfInterface> {
        self.slots.get(handle.0)
    }

    pub fn iter(&self) -> impl Iterator<Item = &RfInterface> {
        self.slots.iter()
    }

    /// Linear scan; the first slot matching both protocol and mode wins.
    pub fn find(&self, protocol: RfProtocol, tech_mode: RfTechMode) -> Option<RfHandle> {
        self.slots
            .iter()
            .position(|s| s.protocol == protocol && s.tech_mode == tech_mode)
            .map(RfHandle)
    }

    /// Apply one RF_DISCOVER_MAP entry to every slot of its protocol whose
    /// mode is covered. Returns the number of slots changed.
    pub fn remap(&mut self, mapping: &DiscoverMapping) -> usize {
        let mut changed = 0;
        for slot in self.slots.iter_mut().filter(|s| s.protocol == mapping.protocol) {
            let covered = if slot.tech_mode.is_listen() {
                mapping.mode & MAP_MODE_LISTEN != 0
            } else {
                mapping.mode & MAP_MODE_POLL != 0
            };
            if covered {
                slot.interface = mapping.interface;
                changed += 1;
            }
        }
        changed
    }
}
