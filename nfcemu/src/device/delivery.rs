// nfcemu-rs/nfcemu/src/device/delivery.rs

use log::trace;

use crate::constants::MAX_NCI_PAYLOAD_LEN;
use crate::device::config::RF_CONN_CREDITS;
use crate::device::{NfcDevice, RemoteHandle, RfHandle};
use crate::llcp::create_param_tail;
use crate::nci::codes::CONN_ID_STATIC_RF;
use crate::nci::messages::{self, Activation};
use crate::nci::packet::NciPacket;
use crate::nci::rf::RfInterfaceType;
use crate::types::BufKind;
use crate::utils::Hex;
use crate::{Error, Result};

/// What a deferred fill produces once it runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeliveryAction {
    /// RF_INTF_ACTIVATED_NTF for an endpoint found during discovery
    RfActivated {
        remote: RemoteHandle,
        rf: RfHandle,
        discovery_id: u8,
    },
    /// RF_DEACTIVATE_NTF
    RfDeactivated { deactivation_type: u8, reason: u8 },
    /// Next outbound LLCP PDU of the active endpoint as an NCI data packet
    LlcpData,
}

/// A fill of the `ntfn` or `data` buffer waiting for the host to free the
/// response buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingDelivery {
    pub kind: BufKind,
    pub action: DeliveryAction,
}

impl PendingDelivery {
    pub fn notification(action: DeliveryAction) -> Self {
        Self {
            kind: BufKind::Notification,
            action,
        }
    }

    pub fn data(action: DeliveryAction) -> Self {
        Self {
            kind: BufKind::Data,
            action,
        }
    }
}

impl NfcDevice {
    /// Run a pending delivery, encoding into `buf`. Returns the number of
    /// bytes produced; zero means there was nothing to deliver.
    pub fn complete_delivery(&mut self, delivery: &PendingDelivery, buf: &mut [u8]) -> Result<usize> {
        let packet = match &delivery.action {
            DeliveryAction::RfActivated {
                remote,
                rf,
                discovery_id,
            } => self.activation_ntf(*remote, *rf, *discovery_id)?,
            DeliveryAction::RfDeactivated {
                deactivation_type,
                reason,
            } => messages::rf_deactivate_ntf(*deactivation_type, *reason),
            DeliveryAction::LlcpData => {
                let Some(llcp) = self.nfc_dep_llcp() else {
                    return Ok(0);
                };
                let n = llcp.transmit_with(|pdu| {
                    NciPacket::data(CONN_ID_STATIC_RF, pdu.to_vec()).encode_into(buf)
                })?;
                trace!("nfc deliver {:?} [{}]", delivery.kind, Hex(&buf[..n]));
                return Ok(n);
            }
        };
        let n = packet.encode_into(buf)?;
        trace!("nfc deliver {:?} [{}]", delivery.kind, Hex(&buf[..n]));
        Ok(n)
    }

    fn activation_ntf(&self, remote: RemoteHandle, rf: RfHandle, discovery_id: u8) -> Result<NciPacket> {
        let re = self.remote(remote).ok_or(Error::NoActiveEndpoint)?;
        let slot = self.rf_interface(rf).ok_or(Error::NoActiveEndpoint)?;
        let activation_params = match slot.interface {
            RfInterfaceType::NfcDep => {
                messages::nfc_dep_activation_params(&re.nfcid3, &create_param_tail())
            }
            _ => Vec::new(),
        };
        Ok(messages::rf_intf_activated_ntf(&Activation {
            discovery_id,
            interface: slot.interface,
            protocol: re.protocol,
            tech_mode: re.tech_mode,
            max_payload: MAX_NCI_PAYLOAD_LEN as u8,
            credits: RF_CONN_CREDITS,
            tech_params: Vec::new(),
            exchange_mode: re.tech_mode,
            tx_rate: 0,
            rx_rate: 0,
            activation_params,
        }))
    }

    /// LLCP link of the active endpoint, if it is served by the NFC-DEP
    /// interface.
    pub(crate) fn nfc_dep_llcp(&mut self) -> Option<&mut crate::llcp::LinkManager> {
        let rf = self.active_rf?;
        if self.rf_interface(rf)?.interface != RfInterfaceType::NfcDep {
            return None;
        }
        self.llcp_mut().ok()
    }
}
