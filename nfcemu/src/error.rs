// nfcemu-rs/nfcemu/src/error.rs

use thiserror::Error;

/// 共通エラー型
#[derive(Error, Debug, PartialEq, Eq)]
pub enum Error {
    #[error("bad register offset {0:#05x}")]
    BadOffset(usize),

    #[error("invalid packet length: expected {expected}, got {actual}")]
    InvalidLength { expected: usize, actual: usize },

    #[error("frame format error: {0}")]
    FrameFormat(String),

    #[error("invalid service access point {0:#04x}")]
    InvalidSap(u8),

    #[error("unknown llcp pdu type {0:#03x}")]
    UnknownPduType(u8),

    #[error("malformed llcp parameter: type={kind:#04x}, len={len}")]
    InvalidParameter { kind: u8, len: usize },

    #[error("configuration access out of range: offset={offset}, len={len}")]
    ConfigOutOfRange { offset: usize, len: usize },

    #[error("pdu buffer pool exhausted (capacity {0})")]
    PoolExhausted(usize),

    #[error("data link {local}:{remote} is not connected")]
    LinkNotConnected { local: u8, remote: u8 },

    #[error("no active remote endpoint")]
    NoActiveEndpoint,

    #[error("unknown controller instance {0}")]
    UnknownInstance(u32),

    #[error("controller instance {0} already registered")]
    DuplicateInstance(u32),

    #[error("snapshot version mismatch: expected {expected}, got {actual}")]
    SnapshotVersion { expected: u32, actual: u32 },

    #[error("unsupported operation: {0}")]
    UnsupportedOperation(String),
}

pub type Result<T> = std::result::Result<T, Error>;
