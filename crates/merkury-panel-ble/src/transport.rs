//! Transport seam between the panel session and the radio.
//!
//! The session composes over these traits rather than a concrete BLE
//! client, so protocol logic stays independent of the transport stack.

use std::time::Duration;

use crate::error::Result;

/// A link to a panel's write characteristic.
#[allow(async_fn_in_trait)]
pub trait PanelLink {
    /// Opens the link and resolves the write characteristic.
    /// Idempotent when already connected.
    async fn connect(&mut self) -> Result<()>;

    /// Closes the link, releasing the transport resource.
    async fn disconnect(&mut self) -> Result<()>;

    /// Queries the live connection state.
    async fn is_connected(&self) -> Result<bool>;

    /// Fire-and-forget write of one command to the panel.
    async fn write(&mut self, payload: &[u8]) -> Result<()>;
}

/// Discovers panels and hands out links to them.
#[allow(async_fn_in_trait)]
pub trait PanelTransport {
    type Link: PanelLink;

    /// Scans for at most `timeout` and returns the first matching panel,
    /// or `None` when the scan completes without a match.
    async fn discover(&self, timeout: Duration) -> Result<Option<Self::Link>>;
}
