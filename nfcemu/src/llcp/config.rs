//! LLCP link defaults

/// Receive window advertised by emulated links (RW parameter)
pub const DEFAULT_RW: u8 = 4;

/// Receive window assumed for a peer that did not send an RW parameter
pub const PEER_DEFAULT_RW: u8 = 1;

/// Link timeout advertised during activation, in units of 10 ms
pub const DEFAULT_LTO: u8 = 100;

/// Well-known services bitmap advertised during activation (LM, SDP, SNEP)
pub const DEFAULT_WKS: u16 = 0x0013;

/// Upper bound of PDU buffers a single data link may hold in its queue
pub const XMIT_QUEUE_DEPTH: usize = 32;

/// Service name of the SNEP default server
pub const SNEP_SERVICE_NAME: &str = "urn:nfc:sn:snep";

/// DM reason codes
pub const DM_DISC_RECEIVED: u8 = 0x00;
pub const DM_NO_ACTIVE_CONNECTION: u8 = 0x01;
pub const DM_NO_SERVICE_BOUND: u8 = 0x02;
pub const DM_CONNECT_REJECTED: u8 = 0x03;

/// FRMR flags
pub const FRMR_W: u8 = 0x08;
pub const FRMR_I: u8 = 0x04;
pub const FRMR_R: u8 = 0x02;
pub const FRMR_S: u8 = 0x01;
