// nfcemu-rs/nfcemu/src/device/nci_handler.rs

use log::{debug, trace, warn};

use crate::constants::MAX_NCI_PAYLOAD_LEN;
use crate::device::config::{MAX_LOGICAL_CONNECTIONS, RF_CONN_CREDITS, SUPPORTED_INTERFACES};
use crate::device::{
    DeliveryAction, DeviceState, NfcDevice, PendingDelivery, RemoteHandle, RfHandle, RfState,
};
use crate::nci::codes::*;
use crate::nci::commands::{DiscoverConfig, DiscoverMapping, NciCommand};
use crate::nci::messages;
use crate::nci::packet::{MessageType, NciPacket};
use crate::nci::rf::RfInterfaceType;
use crate::utils::Hex;

/// Result of processing one NCI packet from the command buffer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NciOutcome {
    /// Encoded packet for the response buffer
    pub resp: Vec<u8>,
    /// False when nothing was produced and no response should be signalled
    pub success: bool,
    pub delivery: Option<PendingDelivery>,
}

impl NciOutcome {
    fn reply(packet: NciPacket) -> Self {
        match packet.encode() {
            Ok(resp) => Self {
                resp,
                success: true,
                delivery: None,
            },
            Err(e) => {
                warn!("nci response encoding failed: {}", e);
                Self::default()
            }
        }
    }

    fn with_delivery(mut self, delivery: PendingDelivery) -> Self {
        if self.success {
            self.delivery = Some(delivery);
        }
        self
    }
}

impl NfcDevice {
    /// Process the NCI packet at the start of `cmnd`.
    pub fn process_nci(&mut self, cmnd: &[u8]) -> NciOutcome {
        let packet = match NciPacket::decode(cmnd) {
            Ok(p) => p,
            Err(e) => {
                warn!("nci: undecodable command: {}", e);
                return NciOutcome::default();
            }
        };
        trace!("nci cmd {:?}", packet);

        match packet {
            NciPacket::Control {
                mt: MessageType::Command,
                gid,
                oid,
                payload,
                ..
            } => self.process_control(gid, oid, &payload),
            NciPacket::Data {
                conn_id, payload, ..
            } => self.process_data(conn_id, &payload),
            NciPacket::Control { mt, gid, oid, .. } => {
                warn!("nci: host sent {:?} gid={} oid={}", mt, gid, oid);
                NciOutcome::default()
            }
        }
    }

    fn process_control(&mut self, gid: u8, oid: u8, payload: &[u8]) -> NciOutcome {
        let cmd = match NciCommand::decode(gid, oid, payload) {
            Ok(cmd) => cmd,
            Err(e) => {
                debug!("nci: malformed command gid={} oid={}: {}", gid, oid, e);
                return NciOutcome::reply(messages::status_rsp(gid, oid, STATUS_SYNTAX_ERROR));
            }
        };
        debug!("nci: {:?} in {:?}", cmd, self.state);

        match cmd {
            NciCommand::CoreReset { reset_type } => self.core_reset(reset_type),
            NciCommand::CoreInit if self.state == DeviceState::Reset => self.core_init(),
            NciCommand::CoreInit => {
                NciOutcome::reply(messages::status_rsp(gid, oid, STATUS_SEMANTIC_ERROR))
            }
            _ if self.state != DeviceState::Initialized => {
                NciOutcome::reply(messages::status_rsp(gid, oid, STATUS_NOT_INITIALIZED))
            }
            NciCommand::CoreSetConfig { params } => self.core_set_config(&params),
            NciCommand::CoreGetConfig { ids } => self.core_get_config(&ids),
            NciCommand::RfDiscoverMap { mappings } => self.rf_discover_map(&mappings),
            NciCommand::RfDiscover { configs } => self.rf_discover(&configs),
            NciCommand::RfDeactivate { deactivation_type } => self.rf_deactivate(deactivation_type),
            NciCommand::Unsupported { gid, oid } => {
                debug!("nci: unsupported gid={} oid={}", gid, oid);
                NciOutcome::reply(messages::status_rsp(gid, oid, STATUS_REJECTED))
            }
        }
    }

    fn core_reset(&mut self, reset_type: u8) -> NciOutcome {
        let reset_config = reset_type == RESET_RESET_CONFIG;
        self.reset(reset_config);
        NciOutcome::reply(messages::core_reset_rsp(STATUS_OK, reset_config))
    }

    fn core_init(&mut self) -> NciOutcome {
        self.state = DeviceState::Initialized;
        NciOutcome::reply(messages::core_init_rsp(
            STATUS_OK,
            SUPPORTED_INTERFACES,
            MAX_LOGICAL_CONNECTIONS,
        ))
    }

    fn core_set_config(&mut self, params: &[(u8, Vec<u8>)]) -> NciOutcome {
        let mut invalid = Vec::new();
        for (id, value) in params {
            if let Err(e) = self.set_config_param(*id, value) {
                debug!("nci: set_config {:#04x}: {}", id, e);
                invalid.push(*id);
            }
        }
        let status = if invalid.is_empty() {
            STATUS_OK
        } else {
            STATUS_INVALID_PARAM
        };
        NciOutcome::reply(messages::core_set_config_rsp(status, &invalid))
    }

    fn core_get_config(&mut self, ids: &[u8]) -> NciOutcome {
        let mut found = Vec::new();
        let mut invalid = Vec::new();
        for id in ids {
            match self.config_param(*id) {
                Some(value) => found.push((*id, value.to_vec())),
                None => invalid.push((*id, Vec::new())),
            }
        }
        let (status, entries) = if invalid.is_empty() {
            (STATUS_OK, found)
        } else {
            (STATUS_INVALID_PARAM, invalid)
        };
        let len = 2 + entries.iter().map(|(_, v)| 2 + v.len()).sum::<usize>();
        if len > MAX_NCI_PAYLOAD_LEN {
            warn!("nci: get_config answer of {} bytes does not fit", len);
            return NciOutcome::reply(messages::status_rsp(
                GID_CORE,
                OID_CORE_GET_CONFIG,
                STATUS_REJECTED,
            ));
        }
        NciOutcome::reply(messages::core_get_config_rsp(status, &entries))
    }

    fn rf_discover_map(&mut self, mappings: &[DiscoverMapping]) -> NciOutcome {
        let supported = |m: &DiscoverMapping| {
            matches!(m.interface, RfInterfaceType::Frame | RfInterfaceType::NfcDep)
        };
        if !mappings.iter().all(supported) {
            return NciOutcome::reply(messages::status_rsp(
                GID_RF,
                OID_RF_DISCOVER_MAP,
                STATUS_REJECTED,
            ));
        }
        for m in mappings {
            self.rf.remap(m);
        }
        NciOutcome::reply(messages::status_rsp(GID_RF, OID_RF_DISCOVER_MAP, STATUS_OK))
    }

    /// Find the first registered endpoint that answers one of the requested
    /// technologies and has an RF interface for its protocol.
    fn match_remote(&self, configs: &[DiscoverConfig]) -> Option<(RemoteHandle, RfHandle)> {
        configs.iter().find_map(|c| {
            self.remotes.iter().enumerate().find_map(|(i, re)| {
                if re.tech_mode != c.tech_mode {
                    return None;
                }
                self.find_rf(re.protocol, re.tech_mode)
                    .map(|rf| (RemoteHandle(i), rf))
            })
        })
    }

    fn rf_discover(&mut self, configs: &[DiscoverConfig]) -> NciOutcome {
        if self.rf_state != RfState::Idle {
            debug!("nci: rf_discover in {:?}", self.rf_state);
            return NciOutcome::reply(messages::status_rsp(
                GID_RF,
                OID_RF_DISCOVER,
                STATUS_SEMANTIC_ERROR,
            ));
        }
        self.rf_state = RfState::Discovery;
        let outcome =
            NciOutcome::reply(messages::status_rsp(GID_RF, OID_RF_DISCOVER, STATUS_OK));

        match self.match_remote(configs) {
            Some((remote, rf)) => {
                self.activate(remote, rf);
                let discovery_id = self.next_id();
                debug!(
                    "nci: activating remote {} on rf slot {} (id {})",
                    remote.index(),
                    rf.index(),
                    discovery_id
                );
                outcome.with_delivery(PendingDelivery::notification(
                    DeliveryAction::RfActivated {
                        remote,
                        rf,
                        discovery_id,
                    },
                ))
            }
            None => outcome,
        }
    }

    fn rf_deactivate(&mut self, deactivation_type: u8) -> NciOutcome {
        if self.rf_state == RfState::Idle {
            return NciOutcome::reply(messages::status_rsp(
                GID_RF,
                OID_RF_DEACTIVATE,
                STATUS_SEMANTIC_ERROR,
            ));
        }
        let was_active = self.active_rf.is_some();
        self.deactivate();
        self.rf_state = if deactivation_type == DEACTIVATE_DISCOVERY {
            RfState::Discovery
        } else {
            RfState::Idle
        };

        let outcome =
            NciOutcome::reply(messages::status_rsp(GID_RF, OID_RF_DEACTIVATE, STATUS_OK));
        if was_active {
            outcome.with_delivery(PendingDelivery::notification(
                DeliveryAction::RfDeactivated {
                    deactivation_type,
                    reason: DEACTIVATE_REASON_DH_REQUEST,
                },
            ))
        } else {
            outcome
        }
    }

    /// Data on the static RF connection goes to the LLCP link of the active
    /// NFC-DEP endpoint; the answering PDU is delivered later through the
    /// data buffer.
    fn process_data(&mut self, conn_id: u8, payload: &[u8]) -> NciOutcome {
        let llcp = match (conn_id, self.nfc_dep_llcp()) {
            (CONN_ID_STATIC_RF, Some(llcp)) => llcp,
            _ => {
                debug!("nci: data on conn {} without nfc-dep interface", conn_id);
                return NciOutcome::reply(messages::core_interface_error_ntf(
                    STATUS_SEMANTIC_ERROR,
                    conn_id,
                ));
            }
        };
        trace!("nci: llcp in [{}]", Hex(payload));
        if let Err(e) = llcp.receive(payload) {
            warn!("nci: dropping llcp pdu: {}", e);
        }
        NciOutcome::reply(messages::core_conn_credits_ntf(CONN_ID_STATIC_RF, RF_CONN_CREDITS))
            .with_delivery(PendingDelivery::data(DeliveryAction::LlcpData))
    }
}
