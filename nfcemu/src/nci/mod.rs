// nfcemu-rs/nfcemu/src/nci/mod.rs
//! NCI framing and message codec.

pub mod codes;
pub mod commands;
pub mod messages;
pub mod packet;
pub mod parser;
pub mod rf;

pub use commands::{DiscoverConfig, DiscoverMapping, NciCommand};
pub use messages::Activation;
pub use packet::{MessageType, NciPacket};
pub use rf::{RfInterfaceType, RfProtocol, RfTechMode};
