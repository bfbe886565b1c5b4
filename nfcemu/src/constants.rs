// nfcemu-rs/nfcemu/src/constants.rs
//! Common register-layout and protocol constants used across the crate

/// MMIO register offsets, relative to the device base address.
pub const OFFSET_STATUS: usize = 0x000;
pub const OFFSET_CTRL: usize = 0x001;
pub const OFFSET_PU: usize = 0x002;
pub const OFFSET_WS: usize = 0x003;
pub const OFFSET_CMND: usize = 0x004;
pub const OFFSET_RESP: usize = 0x184;
pub const OFFSET_NTFN: usize = 0x304;
pub const OFFSET_DATA: usize = 0x484;
pub const OFFSET_RESERVED0: usize = 0x604;
/// No I/O at or past this offset; the window is 4096 bytes.
pub const END_OFFSET: usize = 0x1000;

/// Size of each exchange buffer (cmnd/resp/ntfn/data)
pub const BUFFER_LEN: usize = 384;
/// Padding that rounds the register window up to 4096 bytes
pub const RESERVED0_LEN: usize = END_OFFSET - OFFSET_RESERVED0;

/// Status register bits
pub const STATUS_INTR: u8 = 0x01;
pub const STATUS_NCI_CMND: u8 = 0x02;
pub const STATUS_NCI_RESP: u8 = 0x04;
pub const STATUS_NCI_NTFN: u8 = 0x08;
pub const STATUS_NCI_DATA: u8 = 0x10;
pub const STATUS_HCI_CMND: u8 = 0x20;
pub const STATUS_HCI_RESP: u8 = 0x40;

/// Control register values
pub const CTRL_INTR_ACK: u8 = 0x00;
pub const CTRL_NCI_CMND_SNT: u8 = 0x01;
pub const CTRL_RESP_RCV: u8 = 0x02;
pub const CTRL_NTFN_RCV: u8 = 0x03;
pub const CTRL_DATA_RCV: u8 = 0x04;
pub const CTRL_HCI_CMND_SNT: u8 = 0x05;

/// Wake-state value that flips `ws`
pub const WS_TOGGLE: u8 = 0x02;

/// Maximum NCI packet length the engine publishes into `ntfn`/`data`
pub const MAX_NCI_PAYLOAD_LEN: usize = 255;

/// NCI header length (MT/PBF/GID, OID, payload length)
pub const NCI_HEADER_LEN: usize = 3;

/// Size of the device configuration blob
pub const CONFIG_BLOB_LEN: usize = 128;

/// Number of RF interface slots held by the device
pub const NUMBER_OF_RF_INTERFACES: usize = 8;

/// Hard ceiling for a single LLCP PDU
pub const LLCP_MAX_PDU_LEN: usize = 256;

/// LLCP receive buffer size per data link
pub const LLCP_RBUF_LEN: usize = 256;

/// Default LLCP maximum information unit (before MIUX)
pub const LLCP_DEFAULT_MIU: u16 = 128;

/// Sequence numbers are 4 bits wide
pub const LLCP_SEQ_MODULUS: u8 = 16;

/// LLCP magic number prefixed to the general bytes of ATR_REQ/ATR_RES
pub const LLCP_MAGIC: [u8; 3] = [0x46, 0x66, 0x6D];

/// LLCP version advertised by the emulated endpoint (1.1)
pub const LLCP_VERSION_MAJOR: u8 = 0x01;
pub const LLCP_VERSION_MINOR: u8 = 0x01;

/// Snapshot format version; bump whenever the register file layout changes.
pub const SNAPSHOT_VERSION: u32 = 2;
