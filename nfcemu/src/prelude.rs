// nfcemu-rs/nfcemu/src/prelude.rs

pub use crate::controller::{Controller, ControllerRegistry, IrqLine, RecordingIrq, Snapshot};
pub use crate::device::{DeliveryAction, DeviceState, NfcDevice, PendingDelivery, RemoteEndpoint};
pub use crate::llcp::{DataLink, LinkManager, LinkStatus, Pdu, PduType};
pub use crate::nci::{NciPacket, RfInterfaceType, RfProtocol, RfTechMode};
pub use crate::{BufKind, Error, InstanceId, Result, Sap};
