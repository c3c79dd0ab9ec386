//! Connected panel peripheral and characteristic writes.

use btleplug::api::{Characteristic, Peripheral as _, WriteType};
use btleplug::platform::Peripheral;
use tracing::{debug, info};

use super::PANEL_CHARACTERISTIC_UUID;
use crate::error::{Error, Result};
use crate::transport::PanelLink;

/// An owned link to a discovered panel.
pub struct BleLink {
    peripheral: Peripheral,
    write_char: Option<Characteristic>,
}

impl BleLink {
    /// Wraps a discovered peripheral.
    pub fn new(peripheral: Peripheral) -> Self {
        Self {
            peripheral,
            write_char: None,
        }
    }
}

impl PanelLink for BleLink {
    async fn connect(&mut self) -> Result<()> {
        if !self.peripheral.is_connected().await? {
            self.peripheral.connect().await?;
            info!("Connected to panel {}", self.peripheral.address());
        }
        if self.write_char.is_none() {
            self.peripheral.discover_services().await?;
            let characteristic = self
                .peripheral
                .characteristics()
                .into_iter()
                .find(|c| c.uuid == PANEL_CHARACTERISTIC_UUID)
                .ok_or(Error::MissingCharacteristic(PANEL_CHARACTERISTIC_UUID))?;
            self.write_char = Some(characteristic);
        }
        Ok(())
    }

    async fn disconnect(&mut self) -> Result<()> {
        self.write_char = None;
        if self.peripheral.is_connected().await? {
            self.peripheral.disconnect().await?;
            info!("Disconnected from panel {}", self.peripheral.address());
        }
        Ok(())
    }

    async fn is_connected(&self) -> Result<bool> {
        Ok(self.peripheral.is_connected().await?)
    }

    async fn write(&mut self, payload: &[u8]) -> Result<()> {
        let characteristic = self.write_char.as_ref().ok_or(Error::NotConnected)?;
        debug!("Writing {} bytes to panel", payload.len());
        self.peripheral
            .write(characteristic, payload, WriteType::WithoutResponse)
            .await?;
        Ok(())
    }
}
