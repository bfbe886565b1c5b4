// nfcemu-rs/nfcemu/src/llcp/data_link.rs

use std::collections::VecDeque;

use log::{debug, trace, warn};

use crate::constants::{
    LLCP_DEFAULT_MIU, LLCP_RBUF_LEN, LLCP_SEQ_MODULUS, MAX_NCI_PAYLOAD_LEN, NCI_HEADER_LEN,
};
use crate::llcp::config;
use crate::llcp::param::{Param, encode_params, parse_params};
use crate::llcp::pdu::{self, FrmrInfo, Pdu, PduType};
use crate::llcp::pool::{PduBuf, PduPool};
use crate::types::Sap;
use crate::utils::Hex;
use crate::{Error, Result};

/// Data-link connection status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LinkStatus {
    Disconnected,
    Connecting,
    Connected,
    Disconnecting,
}

/// Information bytes left in one NCI data packet after the NCI header, the
/// LLCP header and the sequence byte.
const MAX_I_FRAME_INFO_LEN: usize = MAX_NCI_PAYLOAD_LEN - NCI_HEADER_LEN - pdu::HEADER_LEN - 1;

fn seq_inc(v: u8) -> u8 {
    (v + 1) % LLCP_SEQ_MODULUS
}

/// `to - from` in mod-16 arithmetic.
fn seq_distance(from: u8, to: u8) -> u8 {
    to.wrapping_sub(from) % LLCP_SEQ_MODULUS
}

/// One connection-oriented LLCP data link, addressed by its local and remote
/// SAP.
///
/// Outbound PDUs are queued in `xmit_q` in the order they were produced and
/// are taken out with `next_pdu`. Received information fields accumulate in
/// a 256-byte receive buffer which the application reads with `read_rbuf`
/// and drains with `consume_rbuf`.
#[derive(Debug)]
pub struct DataLink {
    local: Sap,
    remote: Sap,
    status: LinkStatus,
    initiator: bool,
    remote_busy: bool,

    // state variables; [LLCP] 5.6.1
    v_s: u8,
    v_sa: u8,
    v_r: u8,
    v_ra: u8,

    // negotiated parameters; [LLCP] 5.6.2
    miu: u16,
    rw_l: u8,
    rw_r: u8,

    rlen: usize,
    rbuf: [u8; LLCP_RBUF_LEN],

    xmit_q: VecDeque<PduBuf>,
    pool: PduPool,
}

impl DataLink {
    pub fn new(local: Sap, remote: Sap) -> Self {
        Self {
            local,
            remote,
            status: LinkStatus::Disconnected,
            initiator: false,
            remote_busy: false,
            v_s: 0,
            v_sa: 0,
            v_r: 0,
            v_ra: 0,
            miu: LLCP_DEFAULT_MIU,
            rw_l: config::DEFAULT_RW,
            rw_r: config::PEER_DEFAULT_RW,
            rlen: 0,
            rbuf: [0u8; LLCP_RBUF_LEN],
            xmit_q: VecDeque::new(),
            pool: PduPool::new(config::XMIT_QUEUE_DEPTH),
        }
    }

    /// Override the receive window advertised in CONNECT/CC.
    pub fn with_receive_window(mut self, rw_l: u8) -> Self {
        self.rw_l = rw_l & 0x0f;
        self
    }

    pub fn local(&self) -> Sap {
        self.local
    }
    pub fn remote(&self) -> Sap {
        self.remote
    }
    pub fn status(&self) -> LinkStatus {
        self.status
    }
    pub fn is_initiator(&self) -> bool {
        self.initiator
    }
    pub fn remote_busy(&self) -> bool {
        self.remote_busy
    }
    pub fn v_s(&self) -> u8 {
        self.v_s
    }
    pub fn v_sa(&self) -> u8 {
        self.v_sa
    }
    pub fn v_r(&self) -> u8 {
        self.v_r
    }
    pub fn v_ra(&self) -> u8 {
        self.v_ra
    }
    pub fn miu(&self) -> u16 {
        self.miu
    }
    pub fn rw_l(&self) -> u8 {
        self.rw_l
    }
    pub fn rw_r(&self) -> u8 {
        self.rw_r
    }
    pub fn rlen(&self) -> usize {
        self.rlen
    }

    /// Number of PDUs waiting in the transmit queue
    pub fn pending(&self) -> usize {
        self.xmit_q.len()
    }

    /// I-frames sent but not yet acknowledged by the peer
    pub fn outstanding(&self) -> u8 {
        seq_distance(self.v_sa, self.v_s)
    }

    /// I-frames received but not yet acknowledged to the peer
    pub fn unacknowledged(&self) -> u8 {
        seq_distance(self.v_ra, self.v_r)
    }

    /// Largest information field a single I-frame may carry. Bounded by the
    /// MIU and by what fits one NCI data packet in the delivery window.
    pub fn max_info_len(&self) -> usize {
        (self.miu as usize).min(MAX_I_FRAME_INFO_LEN)
    }

    /// Return the link to its initial disconnected state. Queued PDUs are
    /// dropped.
    pub fn clear(&mut self) {
        while let Some(buf) = self.xmit_q.pop_front() {
            self.pool.free(buf);
        }
        self.reset_state();
        self.rw_r = config::PEER_DEFAULT_RW;
        self.miu = LLCP_DEFAULT_MIU;
    }

    /// Reset sequence state and the receive buffer but keep the transmit
    /// queue, which may still hold the final DM.
    fn reset_state(&mut self) {
        self.status = LinkStatus::Disconnected;
        self.initiator = false;
        self.remote_busy = false;
        self.v_s = 0;
        self.v_sa = 0;
        self.v_r = 0;
        self.v_ra = 0;
        self.rlen = 0;
        self.rbuf.fill(0);
    }

    fn queue<F>(&mut self, encode: F) -> Result<()>
    where
        F: FnOnce(&mut [u8]) -> Result<usize>,
    {
        let mut buf = self.pool.alloc()?;
        if let Err(e) = buf.fill_with(encode) {
            self.pool.free(buf);
            return Err(e);
        }
        trace!(
            "llcp {}:{} queue [{}]",
            self.local,
            self.remote,
            Hex(buf.as_bytes())
        );
        self.xmit_q.push_back(buf);
        Ok(())
    }

    fn queue_with_params(&mut self, ptype: PduType) -> Result<()> {
        let info = encode_params(&[Param::Rw(self.rw_l)])?;
        let (dsap, ssap) = (self.remote, self.local);
        self.queue(|b| pdu::encode_with_info(b, dsap, ptype, ssap, &info))
    }

    fn queue_dm(&mut self, reason: u8) -> Result<()> {
        let (dsap, ssap) = (self.remote, self.local);
        self.queue(|b| pdu::encode_dm(b, dsap, ssap, reason))
    }

    /// Queue a DM on the way to DISCONNECTED. The transition happens even
    /// when no buffer is left for the DM.
    fn answer_dm(&mut self, reason: u8) {
        if let Err(e) = self.queue_dm(reason) {
            warn!("llcp {}:{} DM {:#04x} dropped: {}", self.local, self.remote, reason, e);
        }
    }

    fn queue_frmr(&mut self, flags: u8, rejected: &Pdu) -> Result<()> {
        let info = FrmrInfo {
            flags,
            ptype: rejected.ptype,
            sequence: rejected.sequence.map(|s| s.to_byte()).unwrap_or(0),
            v_s: self.v_s,
            v_r: self.v_r,
            v_sa: self.v_sa,
            v_ra: self.v_ra,
        };
        let (dsap, ssap) = (self.remote, self.local);
        self.queue(|b| pdu::encode_frmr(b, dsap, ssap, &info))
    }

    /// Send CONNECT; DISCONNECTED -> CONNECTING.
    pub fn connect(&mut self) -> Result<()> {
        if self.status != LinkStatus::Disconnected {
            return Err(Error::UnsupportedOperation(format!(
                "connect while {:?}",
                self.status
            )));
        }
        self.queue_with_params(PduType::Connect)?;
        self.status = LinkStatus::Connecting;
        self.initiator = true;
        Ok(())
    }

    /// Answer a received CONNECT with CC; CONNECTING -> CONNECTED.
    pub fn accept(&mut self) -> Result<()> {
        if self.status != LinkStatus::Connecting || self.initiator {
            return Err(Error::UnsupportedOperation(format!(
                "accept while {:?} (initiator={})",
                self.status, self.initiator
            )));
        }
        self.queue_with_params(PduType::Cc)?;
        self.status = LinkStatus::Connected;
        Ok(())
    }

    /// Refuse a received CONNECT with DM; CONNECTING -> DISCONNECTED.
    pub fn reject(&mut self) -> Result<()> {
        if self.status != LinkStatus::Connecting || self.initiator {
            return Err(Error::UnsupportedOperation(format!(
                "reject while {:?}",
                self.status
            )));
        }
        self.queue_dm(config::DM_CONNECT_REJECTED)?;
        self.reset_state();
        Ok(())
    }

    /// Send DISC; CONNECTED -> DISCONNECTING.
    pub fn disconnect(&mut self) -> Result<()> {
        if self.status != LinkStatus::Connected {
            return Err(Error::LinkNotConnected {
                local: self.local.as_u8(),
                remote: self.remote.as_u8(),
            });
        }
        let (dsap, ssap) = (self.remote, self.local);
        self.queue(|b| pdu::encode_pdu(b, dsap, PduType::Disc, ssap))?;
        self.status = LinkStatus::Disconnecting;
        Ok(())
    }

    /// Queue an I-frame carrying `data`.
    ///
    /// Returns `Ok(false)` without queuing anything while the peer's receive
    /// window is exhausted or the peer signalled RNR; retry after an RR.
    pub fn send(&mut self, data: &[u8]) -> Result<bool> {
        if self.status != LinkStatus::Connected {
            return Err(Error::LinkNotConnected {
                local: self.local.as_u8(),
                remote: self.remote.as_u8(),
            });
        }
        if data.len() > self.max_info_len() {
            return Err(Error::InvalidLength {
                expected: self.max_info_len(),
                actual: data.len(),
            });
        }
        if self.remote_busy || self.outstanding() >= self.rw_r {
            debug!(
                "llcp {}:{} send blocked (v_s={}, v_sa={}, rw_r={}, busy={})",
                self.local, self.remote, self.v_s, self.v_sa, self.rw_r, self.remote_busy
            );
            return Ok(false);
        }

        let (dsap, ssap, ns, nr) = (self.remote, self.local, self.v_s, self.v_r);
        self.queue(|b| {
            let n = pdu::encode_i_frame(b, dsap, ssap, ns, nr)?;
            b[n..n + data.len()].copy_from_slice(data);
            Ok(n + data.len())
        })?;
        self.v_s = seq_inc(self.v_s);
        Ok(true)
    }

    /// Queue RR acknowledging everything received so far.
    pub fn acknowledge(&mut self) -> Result<()> {
        let (dsap, ssap, nr) = (self.remote, self.local, self.v_r);
        self.queue(|b| pdu::encode_receive_ready(b, PduType::Rr, dsap, ssap, nr))?;
        self.v_ra = self.v_r;
        Ok(())
    }

    /// Head of the transmit queue, left in place.
    pub fn peek_pdu(&self) -> Option<&[u8]> {
        self.xmit_q.front().map(PduBuf::as_bytes)
    }

    /// Pop the head of the transmit queue.
    pub fn next_pdu(&mut self) -> Option<Vec<u8>> {
        let buf = self.xmit_q.pop_front()?;
        let bytes = buf.as_bytes().to_vec();
        self.pool.free(buf);
        Some(bytes)
    }

    /// Apply an `nr` acknowledgement. Only values in `[v_sa, v_s]` are
    /// accepted so an ack can never move `v_sa` backwards.
    fn ack(&mut self, nr: u8) -> bool {
        if seq_distance(self.v_sa, nr) <= seq_distance(self.v_sa, self.v_s) {
            self.v_sa = nr;
            true
        } else {
            false
        }
    }

    fn apply_params(&mut self, info: &[u8]) {
        let params = match parse_params(info) {
            Ok(p) => p,
            Err(e) => {
                warn!("llcp {}:{} ignoring parameters: {}", self.local, self.remote, e);
                return;
            }
        };
        for p in params {
            match p {
                Param::Miux(m) => self.miu = LLCP_DEFAULT_MIU + m,
                Param::Rw(r) => self.rw_r = r,
                _ => {}
            }
        }
    }

    /// Run one received PDU through the state machine. Protocol errors are
    /// answered with DM/FRMR in the transmit queue; only buffer or encoding
    /// failures are returned as errors.
    pub fn handle_pdu(&mut self, pdu: &Pdu) -> Result<()> {
        trace!(
            "llcp {}:{} {:?} recv {:?}",
            self.local, self.remote, self.status, pdu.ptype
        );
        match (self.status, pdu.ptype) {
            (LinkStatus::Disconnected, PduType::Connect) => {
                self.apply_params(&pdu.info);
                self.status = LinkStatus::Connecting;
                self.initiator = false;
            }
            (LinkStatus::Connecting, PduType::Cc) if self.initiator => {
                self.apply_params(&pdu.info);
                self.status = LinkStatus::Connected;
            }
            (LinkStatus::Connecting, PduType::Dm) if self.initiator => {
                debug!(
                    "llcp {}:{} connect refused, reason={:?}",
                    self.local,
                    self.remote,
                    pdu.dm_reason()
                );
                self.reset_state();
            }
            (LinkStatus::Connected, PduType::I) => self.receive_i(pdu)?,
            (LinkStatus::Connected, PduType::Rr | PduType::Rnr) => {
                let nr = pdu.sequence.map(|s| s.nr).unwrap_or(self.v_sa);
                if !self.ack(nr) {
                    warn!("llcp {}:{} invalid N(R)={}", self.local, self.remote, nr);
                    return self.queue_frmr(config::FRMR_R, pdu);
                }
                self.remote_busy = pdu.ptype == PduType::Rnr;
            }
            (LinkStatus::Connected, PduType::Disc) => {
                self.answer_dm(config::DM_DISC_RECEIVED);
                self.reset_state();
            }
            (LinkStatus::Connected, PduType::Frmr) => {
                warn!("llcp {}:{} peer sent FRMR", self.local, self.remote);
                self.reset_state();
            }
            (LinkStatus::Disconnecting, PduType::Dm) => self.reset_state(),
            (status, PduType::Dm) => {
                debug!(
                    "llcp {}:{} DM while {:?}, reason={:?}",
                    self.local,
                    self.remote,
                    status,
                    pdu.dm_reason()
                );
                self.reset_state();
            }
            (status, ptype) => {
                debug!(
                    "llcp {}:{} unexpected {:?} while {:?}",
                    self.local, self.remote, ptype, status
                );
                self.answer_dm(config::DM_NO_ACTIVE_CONNECTION);
                self.reset_state();
            }
        }
        Ok(())
    }

    fn receive_i(&mut self, pdu: &Pdu) -> Result<()> {
        let seq = match pdu.sequence {
            Some(s) => s,
            None => return self.queue_frmr(config::FRMR_W, pdu),
        };
        if seq.ns != self.v_r {
            warn!(
                "llcp {}:{} out of sequence N(S)={}, V(R)={}",
                self.local, self.remote, seq.ns, self.v_r
            );
            return self.queue_frmr(config::FRMR_S, pdu);
        }
        if seq_distance(self.v_sa, seq.nr) > seq_distance(self.v_sa, self.v_s) {
            warn!("llcp {}:{} invalid N(R)={}", self.local, self.remote, seq.nr);
            return self.queue_frmr(config::FRMR_R, pdu);
        }
        if self.rlen + pdu.info.len() > LLCP_RBUF_LEN {
            warn!(
                "llcp {}:{} receive buffer overflow ({} + {})",
                self.local,
                self.remote,
                self.rlen,
                pdu.info.len()
            );
            return self.queue_frmr(config::FRMR_I, pdu);
        }

        self.write_rbuf(&pdu.info);
        self.v_r = seq_inc(self.v_r);
        self.ack(seq.nr);
        Ok(())
    }

    /// Append to the receive buffer; returns the number of bytes stored,
    /// which is less than `data.len()` once the buffer fills up.
    pub fn write_rbuf(&mut self, data: &[u8]) -> usize {
        let n = data.len().min(LLCP_RBUF_LEN - self.rlen);
        self.rbuf[self.rlen..self.rlen + n].copy_from_slice(&data[..n]);
        self.rlen += n;
        n
    }

    /// Copy buffered data into `out` without consuming it. Repeated reads
    /// return the same bytes until `consume_rbuf` is called.
    pub fn read_rbuf(&self, out: &mut [u8]) -> usize {
        let n = out.len().min(self.rlen);
        out[..n].copy_from_slice(&self.rbuf[..n]);
        n
    }

    /// Drop up to `len` bytes from the front of the receive buffer.
    pub fn consume_rbuf(&mut self, len: usize) -> usize {
        let n = len.min(self.rlen);
        self.rbuf.copy_within(n..self.rlen, 0);
        self.rlen -= n;
        self.rbuf[self.rlen..].fill(0);
        n
    }
}
