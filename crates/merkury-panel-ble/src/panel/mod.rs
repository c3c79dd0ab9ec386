//! LED matrix panel module.
//!
//! Frame encoding and the connection session for the 16x16 panel.

mod session;

pub mod protocol;

pub use protocol::{encode_frame, CommandPacket, PICTURE_MODE_COMMAND};
pub use session::{PanelSession, SessionConfig};
