//! BLE transport module.
//!
//! Panel discovery and characteristic writes via btleplug.

mod connection;
mod discovery;

pub use connection::BleLink;
pub use discovery::BleCentral;

use uuid::Uuid;

/// GATT service advertised by the panel.
pub const PANEL_SERVICE_UUID: Uuid = Uuid::from_u128(0x0000ffd0_0000_1000_8000_00805f9b34fb);

/// Write characteristic accepting panel commands.
pub const PANEL_CHARACTERISTIC_UUID: Uuid =
    Uuid::from_u128(0x0000ffd1_0000_1000_8000_00805f9b34fb);

/// Advertised local-name prefix of the panel.
pub const PANEL_NAME_PREFIX: &str = "MI_LED";
