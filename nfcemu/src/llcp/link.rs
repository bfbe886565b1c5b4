// nfcemu-rs/nfcemu/src/llcp/link.rs

use std::collections::{BTreeMap, VecDeque};

use log::{debug, trace, warn};

use crate::llcp::config;
use crate::llcp::data_link::{DataLink, LinkStatus};
use crate::llcp::param::{Param, encode_params, parse_params};
use crate::llcp::pdu::{Pdu, PduType};
use crate::types::Sap;
use crate::utils::Hex;
use crate::{Error, Result};

/// SYMM PDU sent when a link has nothing else to transmit
const SYMM: [u8; 2] = [0x00, 0x00];

/// LLCP link of one remote endpoint.
///
/// Holds the data-link connections to that endpoint, keyed by
/// `(local SAP, remote SAP)`, the locally bound services and a queue for
/// link-level PDUs that belong to no connection (SNL answers, DM for unknown
/// addresses).
#[derive(Debug)]
pub struct LinkManager {
    links: BTreeMap<(Sap, Sap), DataLink>,
    services: BTreeMap<Sap, Vec<u8>>,
    control_q: VecDeque<Vec<u8>>,
    rw_l: u8,
}

impl Default for LinkManager {
    fn default() -> Self {
        Self::new()
    }
}

impl LinkManager {
    /// Create a manager with the SNEP default server bound on SAP 4.
    pub fn new() -> Self {
        let mut services = BTreeMap::new();
        services.insert(Sap::SNEP, config::SNEP_SERVICE_NAME.as_bytes().to_vec());
        Self {
            links: BTreeMap::new(),
            services,
            control_q: VecDeque::new(),
            rw_l: config::DEFAULT_RW,
        }
    }

    /// Receive window advertised by links created from now on.
    pub fn with_receive_window(mut self, rw_l: u8) -> Self {
        self.rw_l = rw_l & 0x0f;
        self
    }

    /// Bind a service name to a local SAP. SAP 0 and 1 are reserved for the
    /// link manager and service discovery.
    pub fn bind(&mut self, sap: Sap, name: &str) -> Result<()> {
        if sap == Sap::LM || sap == Sap::SDP {
            return Err(Error::InvalidSap(sap.as_u8()));
        }
        self.services.insert(sap, name.as_bytes().to_vec());
        Ok(())
    }

    pub fn unbind(&mut self, sap: Sap) -> bool {
        self.services.remove(&sap).is_some()
    }

    pub fn lookup_service(&self, name: &[u8]) -> Option<Sap> {
        self.services
            .iter()
            .find(|(_, n)| n.as_slice() == name)
            .map(|(sap, _)| *sap)
    }

    pub fn is_bound(&self, sap: Sap) -> bool {
        self.services.contains_key(&sap)
    }

    pub fn link(&self, local: Sap, remote: Sap) -> Option<&DataLink> {
        self.links.get(&(local, remote))
    }

    pub fn link_mut(&mut self, local: Sap, remote: Sap) -> Option<&mut DataLink> {
        self.links.get_mut(&(local, remote))
    }

    pub fn links(&self) -> impl Iterator<Item = &DataLink> {
        self.links.values()
    }

    /// Open a connection from `local` to the peer's `remote` SAP.
    pub fn connect(&mut self, local: Sap, remote: Sap) -> Result<&mut DataLink> {
        let rw_l = self.rw_l;
        let link = self
            .links
            .entry((local, remote))
            .or_insert_with(|| DataLink::new(local, remote).with_receive_window(rw_l));
        link.connect()?;
        Ok(link)
    }

    /// Queue application data on an existing connection. See
    /// [`DataLink::send`] for the backpressure contract.
    pub fn send(&mut self, local: Sap, remote: Sap, data: &[u8]) -> Result<bool> {
        match self.links.get_mut(&(local, remote)) {
            Some(link) => link.send(data),
            None => Err(Error::LinkNotConnected {
                local: local.as_u8(),
                remote: remote.as_u8(),
            }),
        }
    }

    /// Drop every connection and pending link-level PDU. Bound services stay.
    pub fn reset(&mut self) {
        self.links.clear();
        self.control_q.clear();
    }

    fn queue_control(&mut self, pdu: Pdu) -> Result<()> {
        let bytes = pdu.encode()?;
        trace!("llcp control queue [{}]", Hex(&bytes));
        self.control_q.push_back(bytes);
        Ok(())
    }

    fn queue_dm(&mut self, to: Sap, from: Sap, reason: u8) -> Result<()> {
        self.queue_control(Pdu::new(to, PduType::Dm, from).with_info(vec![reason]))
    }

    /// Process one PDU received from the peer.
    ///
    /// Malformed PDUs are returned as errors and change nothing; protocol
    /// errors are answered on the link.
    pub fn receive(&mut self, bytes: &[u8]) -> Result<()> {
        let pdu = Pdu::decode(bytes)?;
        trace!(
            "llcp recv {:?} {}->{} [{}]",
            pdu.ptype,
            pdu.ssap,
            pdu.dsap,
            Hex(&pdu.info)
        );

        match pdu.ptype {
            PduType::Symm => Ok(()),
            PduType::Snl => self.receive_snl(&pdu),
            PduType::Ui | PduType::Pax | PduType::Agf => {
                debug!("llcp ignoring {:?} from {}", pdu.ptype, pdu.ssap);
                Ok(())
            }
            PduType::Connect => self.receive_connect(&pdu),
            _ => self.receive_on_link(&pdu),
        }
    }

    fn receive_snl(&mut self, pdu: &Pdu) -> Result<()> {
        let mut answers = Vec::new();
        for param in parse_params(&pdu.info)? {
            if let Param::SdReq { tid, uri } = param {
                let sap = self.lookup_service(&uri).map(|s| s.as_u8()).unwrap_or(0);
                debug!(
                    "llcp sdreq tid={} '{}' -> sap {}",
                    tid,
                    String::from_utf8_lossy(&uri),
                    sap
                );
                answers.push(Param::SdRes { tid, sap });
            }
        }
        if answers.is_empty() {
            return Ok(());
        }
        let info = encode_params(&answers)?;
        self.queue_control(Pdu::new(pdu.ssap, PduType::Snl, Sap::SDP).with_info(info))
    }

    fn receive_connect(&mut self, pdu: &Pdu) -> Result<()> {
        let target = if pdu.dsap == Sap::SDP {
            let name = parse_params(&pdu.info)?.into_iter().find_map(|p| match p {
                Param::Sn(name) => Some(name),
                _ => None,
            });
            name.and_then(|n| self.lookup_service(&n))
        } else if self.is_bound(pdu.dsap) {
            Some(pdu.dsap)
        } else {
            None
        };

        let local = match target {
            Some(sap) => sap,
            None => {
                debug!("llcp connect {}->{}: no service bound", pdu.ssap, pdu.dsap);
                return self.queue_dm(pdu.ssap, pdu.dsap, config::DM_NO_SERVICE_BOUND);
            }
        };

        let rw_l = self.rw_l;
        let link = self
            .links
            .entry((local, pdu.ssap))
            .or_insert_with(|| DataLink::new(local, pdu.ssap).with_receive_window(rw_l));
        link.handle_pdu(pdu)?;
        if link.status() == LinkStatus::Connecting && !link.is_initiator() {
            link.accept()?;
        }
        Ok(())
    }

    fn receive_on_link(&mut self, pdu: &Pdu) -> Result<()> {
        let link = match self.links.get_mut(&(pdu.dsap, pdu.ssap)) {
            Some(link) => link,
            None if pdu.ptype == PduType::Dm => {
                debug!("llcp stray DM {}->{}", pdu.ssap, pdu.dsap);
                return Ok(());
            }
            None => {
                warn!(
                    "llcp {:?} for unknown connection {}->{}",
                    pdu.ptype, pdu.ssap, pdu.dsap
                );
                return self.queue_dm(pdu.ssap, pdu.dsap, config::DM_NO_ACTIVE_CONNECTION);
            }
        };

        let v_r = link.v_r();
        link.handle_pdu(pdu)?;
        if pdu.ptype == PduType::I && link.v_r() != v_r {
            link.acknowledge()?;
        }
        Ok(())
    }

    /// True when any PDU besides SYMM is waiting.
    pub fn has_outbound(&self) -> bool {
        !self.control_q.is_empty() || self.links.values().any(|l| l.pending() > 0)
    }

    /// Next PDU to transmit: link-level PDUs first, then each connection's
    /// queue in key order. A connection's queue is drained in FIFO order.
    pub fn next_outbound(&mut self) -> Option<Vec<u8>> {
        if let Some(pdu) = self.control_q.pop_front() {
            return Some(pdu);
        }
        self.links.values_mut().find_map(|l| l.next_pdu())
    }

    /// The PDU `next_outbound` would return, left in place.
    pub fn peek_outbound(&self) -> Option<&[u8]> {
        if let Some(pdu) = self.control_q.front() {
            return Some(pdu.as_slice());
        }
        self.links.values().find_map(|l| l.peek_pdu())
    }

    /// Hand the next outbound PDU, or SYMM, to `encode` and dequeue it only
    /// once `encode` succeeded. A failed encode leaves the queues untouched.
    pub fn transmit_with<F>(&mut self, encode: F) -> Result<usize>
    where
        F: FnOnce(&[u8]) -> Result<usize>,
    {
        let n = encode(self.peek_outbound().unwrap_or(&SYMM[..]))?;
        self.next_outbound();
        Ok(n)
    }

    /// Like `next_outbound`, but answers SYMM when nothing is queued.
    pub fn poll_outbound(&mut self) -> Vec<u8> {
        self.next_outbound().unwrap_or_else(|| SYMM.to_vec())
    }
}
