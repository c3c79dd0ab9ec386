//! Error types for the Merkury panel library.

use thiserror::Error;
use uuid::Uuid;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur when driving the panel.
#[derive(Error, Debug)]
pub enum Error {
    /// Grid access outside the panel bounds.
    #[error("pixel ({x}, {y}) is outside the {width}x{height} grid")]
    OutOfBounds {
        x: usize,
        y: usize,
        width: usize,
        height: usize,
    },

    /// Row source does not match the grid shape.
    #[error("pixel source shape mismatch: expected {expected}, got {actual}")]
    GridShape { expected: usize, actual: usize },

    /// Grid does not hold exactly one panel frame.
    #[error("frame size mismatch: expected {expected} pixels, got {actual}")]
    FrameSize { expected: usize, actual: usize },

    /// Image path missing, a directory, or not decodable.
    #[error("cannot read image {path}: {reason}")]
    UnreadableImage { path: String, reason: String },

    /// Connect/disconnect/draw attempted without a paired panel.
    #[error("no panel paired (pair to a panel first)")]
    NotPaired,

    /// Implicit pairing inside a draw found no panel.
    #[error("panel not found (is it powered on, in range, and not already connected?)")]
    PanelNotFound,

    /// Write attempted on a link that is not connected.
    #[error("panel link is not connected")]
    NotConnected,

    /// No Bluetooth adapter present on this host.
    #[error("no Bluetooth adapter available")]
    NoAdapter,

    /// Connected peripheral does not expose the panel write characteristic.
    #[error("panel write characteristic {0} not found on device")]
    MissingCharacteristic(Uuid),

    /// Bluetooth transport error.
    #[error("bluetooth error: {0}")]
    Ble(#[from] btleplug::Error),
}
