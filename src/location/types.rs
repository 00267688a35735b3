//! Core types for the location subsystem.

use crate::geo::{Coordinates, InvalidCoordinates};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Where a position came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PositionSource {
    IpApi,
    Manual,
}

impl fmt::Display for PositionSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::IpApi => write!(f, "IP"),
            Self::Manual => write!(f, "Manual"),
        }
    }
}

/// The caller's current position, produced once per request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Position {
    pub coords: Coordinates,
    pub source: PositionSource,
    pub acquired_at: DateTime<Utc>,
    /// Human-readable place label, when the provider knows one
    /// (e.g. "Pune, India").
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl Position {
    pub fn new(coords: Coordinates, source: PositionSource) -> Self {
        Self {
            coords,
            source,
            acquired_at: Utc::now(),
            label: None,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn display_line(&self) -> String {
        match &self.label {
            Some(label) => format!("\u{1F4CD} {} ({}) via {}", label, self.coords, self.source),
            None => format!("\u{1F4CD} {} via {}", self.coords, self.source),
        }
    }
}

/// Location acquisition errors.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LocationError {
    #[error("Geolocation is not supported by this client")]
    Unsupported,
    #[error("Permission to read the location was denied")]
    PermissionDenied,
    #[error("Position unavailable: {0}")]
    PositionUnavailable(String),
    #[error("Timed out while waiting for a position")]
    Timeout,
    #[error("Network error: {0}")]
    Network(String),
    #[error("Invalid API response: {0}")]
    InvalidResponse(String),
    #[error(transparent)]
    InvalidCoordinates(#[from] InvalidCoordinates),
}

impl LocationError {
    /// Map a W3C `GeolocationPositionError` code reported by a browser.
    pub fn from_geolocation_code(code: u16, message: impl Into<String>) -> Self {
        match code {
            1 => Self::PermissionDenied,
            3 => Self::Timeout,
            _ => Self::PositionUnavailable(message.into()),
        }
    }
}
