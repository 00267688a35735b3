//! Location providers: IP API lookup, fixed coordinates, and the
//! "unsupported" stand-in.

use super::types::{LocationError, Position, PositionSource};
use crate::geo::Coordinates;
use async_trait::async_trait;
use serde::Deserialize;
use std::error::Error as _;
use std::time::Duration;
use tracing::debug;

/// A one-shot source of the caller's current position.
///
/// Each call is a single request: implementations never subscribe to
/// updates and never retry.
#[async_trait]
pub trait LocationProvider: Send + Sync {
    async fn current_position(&self) -> Result<Position, LocationError>;

    fn name(&self) -> &'static str;
}

// ─── IP-based geolocation ───────────────────────────────────────

#[derive(Deserialize)]
struct IpApiResult {
    latitude: Option<f64>,
    longitude: Option<f64>,
    city: Option<String>,
    country_name: Option<String>,
    #[serde(default)]
    error: bool,
    #[serde(default)]
    reason: Option<String>,
}

/// Locate via an ipapi.co-compatible JSON endpoint.
#[derive(Debug, Clone)]
pub struct IpLocationProvider {
    url: String,
    user_agent: String,
    timeout: Duration,
}

impl IpLocationProvider {
    pub fn new(url: impl Into<String>, user_agent: impl Into<String>, timeout: Duration) -> Self {
        Self {
            url: url.into(),
            user_agent: user_agent.into(),
            timeout,
        }
    }

    fn lookup_blocking(&self) -> Result<Position, LocationError> {
        debug!(url = %self.url, "Requesting IP geolocation");

        let response = ureq::get(&self.url)
            .set("User-Agent", &self.user_agent)
            .timeout(self.timeout)
            .call()
            .map_err(|e| {
                if is_timeout(&e) {
                    LocationError::Timeout
                } else {
                    LocationError::Network(e.to_string())
                }
            })?;

        let r: IpApiResult = response
            .into_json()
            .map_err(|e| LocationError::InvalidResponse(e.to_string()))?;

        if r.error {
            return Err(LocationError::PositionUnavailable(
                r.reason.unwrap_or_else(|| "lookup refused".into()),
            ));
        }

        let lat = r.latitude.ok_or_else(|| LocationError::InvalidResponse("no latitude".into()))?;
        let lon = r.longitude.ok_or_else(|| LocationError::InvalidResponse("no longitude".into()))?;
        let coords = Coordinates::new(lat, lon)?;

        let label = match (r.city, r.country_name) {
            (Some(city), Some(country)) if !country.is_empty() => Some(format!("{}, {}", city, country)),
            (Some(city), _) => Some(city),
            (None, Some(country)) => Some(country),
            (None, None) => None,
        };

        let position = Position::new(coords, PositionSource::IpApi);
        Ok(match label {
            Some(l) => position.with_label(l),
            None => position,
        })
    }
}

fn is_timeout(err: &ureq::Error) -> bool {
    let ureq::Error::Transport(transport) = err else {
        return false;
    };
    transport
        .source()
        .and_then(|s| s.downcast_ref::<std::io::Error>())
        .is_some_and(|io| matches!(io.kind(), std::io::ErrorKind::TimedOut | std::io::ErrorKind::WouldBlock))
}

#[async_trait]
impl LocationProvider for IpLocationProvider {
    async fn current_position(&self) -> Result<Position, LocationError> {
        let provider = self.clone();
        tokio::task::spawn_blocking(move || provider.lookup_blocking())
            .await
            .map_err(|e| LocationError::PositionUnavailable(e.to_string()))?
    }

    fn name(&self) -> &'static str {
        "ip-api"
    }
}

// ─── Fixed coordinates ──────────────────────────────────────────

/// Yields a position known up front, such as CLI `--lat/--lon`.
pub struct FixedLocationProvider {
    coords: Coordinates,
    source: PositionSource,
}

impl FixedLocationProvider {
    pub fn new(coords: Coordinates, source: PositionSource) -> Self {
        Self { coords, source }
    }

    pub fn manual(coords: Coordinates) -> Self {
        Self::new(coords, PositionSource::Manual)
    }
}

#[async_trait]
impl LocationProvider for FixedLocationProvider {
    async fn current_position(&self) -> Result<Position, LocationError> {
        Ok(Position::new(self.coords, self.source))
    }

    fn name(&self) -> &'static str {
        "fixed"
    }
}

// ─── Unsupported ────────────────────────────────────────────────

/// A client with no geolocation capability at all.
pub struct UnsupportedLocationProvider;

#[async_trait]
impl LocationProvider for UnsupportedLocationProvider {
    async fn current_position(&self) -> Result<Position, LocationError> {
        Err(LocationError::Unsupported)
    }

    fn name(&self) -> &'static str {
        "unsupported"
    }
}
