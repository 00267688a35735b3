//! Location resolver: picks a provider and performs the single request.
//!
//! Flow: provider call → success (position) | failure (logged, returned).
//! There is no fallback chain and no retry; a failed request ends the attempt.

use super::providers::{FixedLocationProvider, IpLocationProvider, LocationProvider, UnsupportedLocationProvider};
use super::types::{LocationError, Position};
use crate::config::LocationConfig;
use crate::geo::Coordinates;
use std::time::Instant;
use tracing::{error, info};

/// Owns one provider and resolves it at most once.
pub struct LocationResolver {
    provider: Box<dyn LocationProvider>,
}

impl LocationResolver {
    pub fn new(provider: Box<dyn LocationProvider>) -> Self {
        Self { provider }
    }

    /// IP-based auto-detection, configured from the `location` section.
    pub fn auto(config: &LocationConfig) -> Self {
        Self::new(Box::new(IpLocationProvider::new(
            config.ip_lookup_url(),
            config.user_agent(),
            config.timeout(),
        )))
    }

    /// Coordinates supplied by the user.
    pub fn manual(coords: Coordinates) -> Self {
        Self::new(Box::new(FixedLocationProvider::manual(coords)))
    }

    /// No geolocation capability is available.
    pub fn unsupported() -> Self {
        Self::new(Box::new(UnsupportedLocationProvider))
    }

    /// Perform the one request. Consuming `self` makes a second call on the
    /// same resolver impossible.
    pub async fn resolve(self) -> Result<Position, LocationError> {
        let start = Instant::now();
        let provider = self.provider.name();

        match self.provider.current_position().await {
            Ok(position) => {
                info!(
                    provider,
                    latitude = position.coords.latitude,
                    longitude = position.coords.longitude,
                    elapsed_ms = start.elapsed().as_secs_f64() * 1000.0,
                    "Acquired present location"
                );
                Ok(position)
            }
            Err(e) => {
                error!(provider, "Error getting present location: {}", e);
                Err(e)
            }
        }
    }
}
