//! Merkury Panel BLE Library
//!
//! Drives Merkury Innovations Multicolor Matrix LED Display panels (16x16
//! RGB) over a Bluetooth Low Energy GATT link: scans for a panel, manages
//! the connection, and streams pixel frames using the panel's command
//! protocol.

pub mod ble;
pub mod error;
pub mod panel;
pub mod pixel;
pub mod transport;

pub use ble::{BleCentral, BleLink};
pub use error::{Error, Result};
pub use panel::{PanelSession, SessionConfig};
pub use pixel::{Pixel, PixelGrid};

/// Panel dimensions in pixels.
pub const PANEL_WIDTH: usize = 16;
pub const PANEL_HEIGHT: usize = 16;
