//! One map screen: view state, its marker layer and the SOS action.
//!
//! Lifecycle: world view → `locate` (one request) → located view with the
//! static markers → `show_nearest` any number of times.

use super::markers::{HighlightPolicy, Marker, MarkerLayer, MarkerStyle};
use crate::config::{MapConfig, RankingConfig};
use crate::geo::{Coordinates, GeoPoint};
use crate::location::{LocationError, LocationResolver, Position};
use crate::ranking::rank_nearest;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MapView {
    pub center: Coordinates,
    pub zoom: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", content = "detail", rename_all = "snake_case")]
pub enum LocateStatus {
    Pending,
    Located(Position),
    /// The request failed; the message is kept so callers can show it.
    Failed(String),
}

#[derive(Debug, Error, PartialEq)]
pub enum SessionError {
    #[error("present location is not known yet")]
    NotLocated,
    #[error(transparent)]
    Location(#[from] LocationError),
    #[error("location has already been requested for this map")]
    AlreadyRequested,
}

pub struct MapSession {
    points: &'static [GeoPoint],
    view: MapView,
    located_zoom: u8,
    limit: usize,
    policy: HighlightPolicy,
    layer: MarkerLayer,
    status: LocateStatus,
}

impl MapSession {
    pub fn new(points: &'static [GeoPoint], map: &MapConfig, ranking: &RankingConfig) -> Self {
        Self {
            points,
            view: MapView {
                center: Coordinates::origin(),
                zoom: map.world_zoom,
            },
            located_zoom: map.located_zoom,
            limit: ranking.limit(),
            policy: HighlightPolicy::new(ranking.highlighted()),
            layer: MarkerLayer::new(),
            status: LocateStatus::Pending,
        }
    }

    /// Run the single location request and apply its outcome.
    ///
    /// On failure the view stays at the world default and no marker is
    /// drawn; the error is recorded in [`LocateStatus::Failed`].
    pub async fn locate(&mut self, resolver: LocationResolver) -> Result<Coordinates, SessionError> {
        if !matches!(self.status, LocateStatus::Pending) {
            return Err(SessionError::AlreadyRequested);
        }

        match resolver.resolve().await {
            Ok(position) => Ok(self.apply_position(position)),
            Err(e) => {
                self.apply_failure(&e);
                Err(e.into())
            }
        }
    }

    /// Center on the position, mark it, and plot every static marker.
    pub fn apply_position(&mut self, position: Position) -> Coordinates {
        let coords = position.coords;
        self.view = MapView {
            center: coords,
            zoom: self.located_zoom,
        };
        self.layer.add(Marker::current_location(coords));
        self.layer
            .extend(self.points.iter().map(|p| Marker::city(p, MarkerStyle::Static)));
        debug!(markers = self.layer.len(), "Displayed static markers");

        self.status = LocateStatus::Located(position);
        coords
    }

    pub fn apply_failure(&mut self, error: &LocationError) {
        warn!("Map stays at world view: {}", error);
        self.status = LocateStatus::Failed(error.to_string());
    }

    /// The SOS action: clear all markers, then draw the nearest `limit`
    /// cities coloured by the highlight policy.
    pub fn show_nearest(&mut self) -> Result<&[Marker], SessionError> {
        let reference = match &self.status {
            LocateStatus::Located(p) => p.coords,
            _ => return Err(SessionError::NotLocated),
        };

        let removed = self.layer.clear();
        let ranked = rank_nearest(reference, self.points, self.limit);
        self.layer.extend(self.policy.apply(&ranked));

        info!(
            removed,
            shown = self.layer.len(),
            nearest = ranked.first().map(|r| r.point.name).unwrap_or("-"),
            "Showing nearest markers"
        );
        Ok(self.layer.markers())
    }

    pub fn view(&self) -> MapView {
        self.view
    }

    pub fn status(&self) -> &LocateStatus {
        &self.status
    }

    pub fn markers(&self) -> &[Marker] {
        self.layer.markers()
    }

    pub fn marker_labels(&self) -> Vec<&str> {
        self.layer.labels()
    }
}
