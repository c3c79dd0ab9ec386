//! Panel connection session.

use std::time::Duration;

use tracing::{debug, info};

use super::protocol::{self, CommandPacket};
use crate::ble::BleCentral;
use crate::error::{Error, Result};
use crate::pixel::PixelGrid;
use crate::transport::{PanelLink, PanelTransport};

/// Tuning knobs for the panel session.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// How long a single pairing scan runs before giving up.
    pub scan_timeout: Duration,
    /// Delay between frame packet writes.
    ///
    /// The protocol has no flow control or acknowledgment; writing faster
    /// than the panel processes packets drops or corrupts frames.
    pub packet_delay: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            scan_timeout: Duration::from_secs(20),
            packet_delay: Duration::from_millis(30),
        }
    }
}

/// Session with one panel.
///
/// Moves through three states: unpaired (no device), paired (device
/// discovered and held), and connected (transport link open). Pairing
/// failures leave the session unpaired; disconnecting keeps it paired.
///
/// Draw operations take `&mut self`, so two draws can never interleave
/// on the same session and packets always reach the panel in order.
pub struct PanelSession<T: PanelTransport> {
    transport: T,
    config: SessionConfig,
    link: Option<T::Link>,
}

impl PanelSession<BleCentral> {
    /// Creates a session on the host's first Bluetooth adapter.
    pub async fn new() -> Result<Self> {
        Ok(Self::with_transport(
            BleCentral::new().await?,
            SessionConfig::default(),
        ))
    }
}

impl<T: PanelTransport> PanelSession<T> {
    /// Creates a session over a specific transport.
    pub fn with_transport(transport: T, config: SessionConfig) -> Self {
        Self {
            transport,
            config,
            link: None,
        }
    }

    /// Whether a panel is currently paired.
    pub fn is_paired(&self) -> bool {
        self.link.is_some()
    }

    /// Whether the transport link is currently open.
    pub async fn is_connected(&self) -> Result<bool> {
        match &self.link {
            Some(link) => link.is_connected().await,
            None => Ok(false),
        }
    }

    /// Scans for a panel and stores it on success.
    ///
    /// Returns `Ok(false)` when the scan completes without a match,
    /// leaving the session unpaired; the caller owns retry policy.
    pub async fn pair(&mut self) -> Result<bool> {
        match self.transport.discover(self.config.scan_timeout).await? {
            Some(link) => {
                info!("Paired to panel");
                self.link = Some(link);
                Ok(true)
            }
            None => {
                debug!("No panel found within {:?}", self.config.scan_timeout);
                Ok(false)
            }
        }
    }

    /// Drops the paired panel, disconnecting first if the link is open.
    ///
    /// Returns false if no panel was paired.
    pub async fn unpair(&mut self) -> bool {
        match self.link.take() {
            Some(mut link) => {
                if link.disconnect().await.is_err() {
                    debug!("Disconnect failed while unpairing; dropping link anyway");
                }
                true
            }
            None => false,
        }
    }

    /// Opens the transport link to the paired panel. Idempotent.
    pub async fn connect(&mut self) -> Result<()> {
        let link = self.link.as_mut().ok_or(Error::NotPaired)?;
        link.connect().await
    }

    /// Closes the transport link. The panel stays paired.
    pub async fn disconnect(&mut self) -> Result<()> {
        let link = self.link.as_mut().ok_or(Error::NotPaired)?;
        link.disconnect().await
    }

    /// Draws a single frame to the panel.
    pub async fn draw(&mut self, grid: &PixelGrid) -> Result<()> {
        self.draw_frames(std::slice::from_ref(grid)).await
    }

    /// Draws an ordered sequence of frames to the panel.
    ///
    /// Pairs and connects implicitly when needed; a failed implicit
    /// pairing aborts with [`Error::PanelNotFound`]. Writes the
    /// picture-mode command, then each frame's 8 packets in ascending
    /// block order, pacing writes by the configured packet delay.
    ///
    /// A transport failure aborts the frame in progress; packets already
    /// written are not re-sent and the next draw starts a fresh frame.
    pub async fn draw_frames(&mut self, frames: &[PixelGrid]) -> Result<()> {
        let encoded: Vec<Vec<CommandPacket>> = frames
            .iter()
            .map(protocol::encode_frame)
            .collect::<Result<_>>()?;

        if self.link.is_none() && !self.pair().await? {
            return Err(Error::PanelNotFound);
        }
        self.connect().await?;
        let link = self.link.as_mut().ok_or(Error::NotPaired)?;

        link.write(&protocol::PICTURE_MODE_COMMAND).await?;
        for packets in &encoded {
            for packet in packets {
                link.write(packet).await?;
                tokio::time::sleep(self.config.packet_delay).await;
            }
        }
        debug!("Streamed {} frame(s)", encoded.len());
        Ok(())
    }

    /// Replays a frame sequence forever.
    ///
    /// Blocks the calling task until a draw fails; interactive callers
    /// should drive [`PanelSession::draw`] from their own loop instead.
    pub async fn play(&mut self, frames: &[PixelGrid]) -> Result<()> {
        loop {
            self.draw_frames(frames).await?;
        }
    }
}
