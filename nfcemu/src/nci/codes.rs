//! NCI message type, group, opcode and status values (NCI 1.0)

/// Message types (MT field)
pub const MT_DATA: u8 = 0x00;
pub const MT_CMD: u8 = 0x01;
pub const MT_RSP: u8 = 0x02;
pub const MT_NTF: u8 = 0x03;

/// Group identifiers
pub const GID_CORE: u8 = 0x00;
pub const GID_RF: u8 = 0x01;
pub const GID_NFCEE: u8 = 0x02;
pub const GID_PROPRIETARY: u8 = 0x0f;

/// Core group opcodes
pub const OID_CORE_RESET: u8 = 0x00;
pub const OID_CORE_INIT: u8 = 0x01;
pub const OID_CORE_SET_CONFIG: u8 = 0x02;
pub const OID_CORE_GET_CONFIG: u8 = 0x03;
pub const OID_CORE_CONN_CREATE: u8 = 0x04;
pub const OID_CORE_CONN_CLOSE: u8 = 0x05;
pub const OID_CORE_CONN_CREDITS: u8 = 0x06;
pub const OID_CORE_GENERIC_ERROR: u8 = 0x07;
pub const OID_CORE_INTERFACE_ERROR: u8 = 0x08;

/// RF group opcodes
pub const OID_RF_DISCOVER_MAP: u8 = 0x00;
pub const OID_RF_SET_LISTEN_MODE_ROUTING: u8 = 0x01;
pub const OID_RF_GET_LISTEN_MODE_ROUTING: u8 = 0x02;
pub const OID_RF_DISCOVER: u8 = 0x03;
pub const OID_RF_DISCOVER_SELECT: u8 = 0x04;
pub const OID_RF_INTF_ACTIVATED: u8 = 0x05;
pub const OID_RF_DEACTIVATE: u8 = 0x06;

/// Status codes
pub const STATUS_OK: u8 = 0x00;
pub const STATUS_REJECTED: u8 = 0x01;
pub const STATUS_RF_FRAME_CORRUPTED: u8 = 0x02;
pub const STATUS_FAILED: u8 = 0x03;
pub const STATUS_NOT_INITIALIZED: u8 = 0x04;
pub const STATUS_SYNTAX_ERROR: u8 = 0x05;
pub const STATUS_SEMANTIC_ERROR: u8 = 0x06;
pub const STATUS_INVALID_PARAM: u8 = 0x09;
pub const STATUS_MESSAGE_SIZE_EXCEEDED: u8 = 0x0a;

/// CORE_RESET_CMD reset type
pub const RESET_KEEP_CONFIG: u8 = 0x00;
pub const RESET_RESET_CONFIG: u8 = 0x01;

/// RF_DEACTIVATE deactivation types
pub const DEACTIVATE_IDLE: u8 = 0x00;
pub const DEACTIVATE_SLEEP: u8 = 0x01;
pub const DEACTIVATE_SLEEP_AF: u8 = 0x02;
pub const DEACTIVATE_DISCOVERY: u8 = 0x03;

/// RF_DEACTIVATE_NTF reason: deactivated by the host
pub const DEACTIVATE_REASON_DH_REQUEST: u8 = 0x00;

/// Static RF connection used for the active interface
pub const CONN_ID_STATIC_RF: u8 = 0x00;

/// NCI version reported in CORE_RESET_RSP (1.0)
pub const NCI_VERSION_1_0: u8 = 0x10;
