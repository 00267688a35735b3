//! Markers and the marker layer owned by a map session.

use crate::geo::{Coordinates, GeoPoint};
use crate::ranking::RankedPoint;
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MarkerColor {
    Blue,
    Red,
}

impl fmt::Display for MarkerColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Blue => write!(f, "blue"),
            Self::Red => write!(f, "red"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "color", rename_all = "snake_case")]
pub enum MarkerStyle {
    /// The "you are here" marker.
    CurrentLocation,
    /// A city marker before any ranking happened.
    Static,
    /// A city marker shown as a ranking result.
    Ranked(MarkerColor),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Marker {
    pub label: String,
    pub coords: Coordinates,
    pub style: MarkerStyle,
    pub popup: String,
    /// Planar distance to the reference point, set on ranked markers.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distance: Option<f64>,
}

impl Marker {
    pub fn current_location(coords: Coordinates) -> Self {
        Self {
            label: "You are here".to_string(),
            coords,
            style: MarkerStyle::CurrentLocation,
            popup: format!(
                "<b>You are here</b><br/>Latitude: {}<br/>Longitude: {}",
                coords.latitude, coords.longitude
            ),
            distance: None,
        }
    }

    pub fn city(point: &GeoPoint, style: MarkerStyle) -> Self {
        Self {
            label: point.name.to_string(),
            coords: point.coordinates(),
            style,
            popup: popup_html(point),
            distance: None,
        }
    }

    pub fn with_distance(mut self, distance: f64) -> Self {
        self.distance = Some(distance);
        self
    }
}

/// Popup content shown when a city marker is clicked.
pub fn popup_html(point: &GeoPoint) -> String {
    format!(
        "<b>{}</b><br/>Latitude: {}<br/>Longitude: {}",
        point.name, point.latitude, point.longitude
    )
}

/// Colouring of ranked markers: the first `highlighted` results are blue,
/// the rest red. Independent of how many results were requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HighlightPolicy {
    pub highlighted: usize,
}

impl Default for HighlightPolicy {
    fn default() -> Self {
        Self { highlighted: 5 }
    }
}

impl HighlightPolicy {
    pub fn new(highlighted: usize) -> Self {
        Self { highlighted }
    }

    pub fn color_for(&self, rank: usize) -> MarkerColor {
        if rank < self.highlighted {
            MarkerColor::Blue
        } else {
            MarkerColor::Red
        }
    }

    /// Turn a ranking into coloured markers, preserving rank order.
    pub fn apply(&self, ranked: &[RankedPoint<'_>]) -> Vec<Marker> {
        ranked
            .iter()
            .enumerate()
            .map(|(i, r)| {
                Marker::city(r.point, MarkerStyle::Ranked(self.color_for(i))).with_distance(r.distance)
            })
            .collect()
    }
}

/// The markers currently drawn on a map. Owned by exactly one session.
#[derive(Debug, Default)]
pub struct MarkerLayer {
    markers: Vec<Marker>,
}

impl MarkerLayer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, marker: Marker) {
        self.markers.push(marker);
    }

    pub fn extend(&mut self, markers: impl IntoIterator<Item = Marker>) {
        self.markers.extend(markers);
    }

    /// Remove every marker, including the current-location one.
    pub fn clear(&mut self) -> usize {
        let removed = self.markers.len();
        self.markers.clear();
        removed
    }

    pub fn markers(&self) -> &[Marker] {
        &self.markers
    }

    pub fn labels(&self) -> Vec<&str> {
        self.markers.iter().map(|m| m.label.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.markers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }
}
