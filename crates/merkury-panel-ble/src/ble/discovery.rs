//! Panel discovery via BLE advertisement scanning.

use std::time::Duration;

use btleplug::api::{Central, CentralEvent, Manager as _, Peripheral as _, ScanFilter};
use btleplug::platform::{Adapter, Manager, Peripheral};
use futures::stream::StreamExt;
use tracing::{debug, info};
use uuid::Uuid;

use super::connection::BleLink;
use super::{PANEL_NAME_PREFIX, PANEL_SERVICE_UUID};
use crate::error::{Error, Result};
use crate::transport::PanelTransport;

/// BLE central that scans for panels.
pub struct BleCentral {
    adapter: Adapter,
}

impl BleCentral {
    /// Opens the first Bluetooth adapter on the host.
    pub async fn new() -> Result<Self> {
        let manager = Manager::new().await?;
        let adapter = manager
            .adapters()
            .await?
            .into_iter()
            .next()
            .ok_or(Error::NoAdapter)?;
        Ok(Self { adapter })
    }

    /// Wraps a specific adapter.
    pub fn with_adapter(adapter: Adapter) -> Self {
        Self { adapter }
    }

    async fn scan(&self, duration: Duration) -> Result<Option<Peripheral>> {
        let mut events = self.adapter.events().await?;
        self.adapter.start_scan(ScanFilter::default()).await?;
        debug!("Scanning for panel advertisements for {:?}", duration);

        let found = tokio::time::timeout(duration, async {
            while let Some(event) = events.next().await {
                let id = match event {
                    CentralEvent::DeviceDiscovered(id) | CentralEvent::DeviceUpdated(id) => id,
                    _ => continue,
                };
                let Ok(peripheral) = self.adapter.peripheral(&id).await else {
                    continue;
                };
                let Ok(Some(props)) = peripheral.properties().await else {
                    continue;
                };
                if is_panel(props.local_name.as_deref(), &props.services) {
                    info!(
                        "Found panel {} ({})",
                        props.local_name.as_deref().unwrap_or("<unnamed>"),
                        peripheral.address()
                    );
                    return Some(peripheral);
                }
            }
            None
        })
        .await
        .unwrap_or(None);

        self.adapter.stop_scan().await?;
        if found.is_none() {
            debug!("Scan finished with no matching panel");
        }
        Ok(found)
    }
}

impl PanelTransport for BleCentral {
    type Link = BleLink;

    async fn discover(&self, timeout: Duration) -> Result<Option<BleLink>> {
        Ok(self.scan(timeout).await?.map(BleLink::new))
    }
}

/// Whether an advertisement matches the panel signature.
fn is_panel(name: Option<&str>, services: &[Uuid]) -> bool {
    services.contains(&PANEL_SERVICE_UUID)
        || name.is_some_and(|n| n.starts_with(PANEL_NAME_PREFIX))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matches_by_service_uuid() {
        assert!(is_panel(None, &[PANEL_SERVICE_UUID]));
        assert!(is_panel(Some("whatever"), &[PANEL_SERVICE_UUID]));
    }

    #[test]
    fn test_matches_by_name_prefix() {
        assert!(is_panel(Some("MI_LED-4A2F"), &[]));
        assert!(!is_panel(Some("KITCHEN_LAMP"), &[]));
    }

    #[test]
    fn test_no_signature_no_match() {
        assert!(!is_panel(None, &[]));
        assert!(!is_panel(None, &[Uuid::from_u128(0xdead_beef)]));
    }
}
