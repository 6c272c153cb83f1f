// WebSocket subscriber sessions and wire protocol

pub mod protocol;
pub mod session;

pub use protocol::{EntityFrame, ProtocolError};
pub use session::SubscriberSession;
