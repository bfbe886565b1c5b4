// nfcemu-rs/nfcemu/src/llcp/mod.rs
//! LLCP (Logical Link Control Protocol) data-link layer.
//!
//! The codec (`pdu`, `param`) is stateless. `pool` hands out fixed-size PDU
//! buffers, `data_link` is the per-connection state machine and `link` keeps
//! the connections of one remote endpoint apart.

pub mod config;
pub mod data_link;
pub mod link;
pub mod param;
pub mod pdu;
pub mod pool;

pub use data_link::{DataLink, LinkStatus};
pub use link::LinkManager;
pub use param::{Param, create_param_tail, parse_params};
pub use pdu::{
    FrmrInfo, Pdu, PduType, Sequence, decode_ptype, encode_dm, encode_i_frame, encode_pdu,
};
pub use pool::{PduBuf, PduPool};
