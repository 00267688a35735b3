use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::http::{header, StatusCode};
use axum::response::{Html, IntoResponse, Json, Response};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;
use tracing::{error, info};

use crate::cities::{city_list, CityInfo, CITIES};
use crate::config::MapConfig;
use crate::geo::Coordinates;
use crate::location::{LocationError, LocationResolver, Position};
use crate::map::{popup_html, HighlightPolicy, MarkerColor};
use crate::ranking::rank_nearest;

use super::state::AppState;
use super::static_files;

// ─── Error response ──────────────────────────────────────────────

#[derive(Serialize)]
struct ApiErrorBody {
    error: String,
    code: u16,
}

pub(super) struct ApiError(StatusCode, String);

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ApiErrorBody {
            error: self.1,
            code: self.0.as_u16(),
        };
        (self.0, Json(body)).into_response()
    }
}

fn api_error(status: StatusCode, msg: impl Into<String>) -> ApiError {
    ApiError(status, msg.into())
}

// ─── Static file handlers ────────────────────────────────────────

pub async fn index() -> Html<&'static str> {
    Html(static_files::INDEX_HTML)
}

pub async fn style() -> Response {
    (
        [(header::CONTENT_TYPE, "text/css")],
        static_files::STYLE_CSS,
    )
        .into_response()
}

pub async fn script() -> Response {
    (
        [(header::CONTENT_TYPE, "application/javascript")],
        static_files::APP_JS,
    )
        .into_response()
}

// ─── GET /api/markers ────────────────────────────────────────────

#[derive(Serialize)]
pub struct MarkerInfo {
    #[serde(flatten)]
    pub city: CityInfo,
    pub popup: String,
}

pub async fn markers() -> Json<Vec<MarkerInfo>> {
    let markers = city_list()
        .into_iter()
        .zip(CITIES.iter())
        .map(|(city, point)| MarkerInfo {
            city,
            popup: popup_html(point),
        })
        .collect();
    Json(markers)
}

// ─── GET /api/nearest ────────────────────────────────────────────

#[derive(Deserialize)]
pub struct NearestQuery {
    pub lat: Option<f64>,
    pub lon: Option<f64>,
    pub limit: Option<usize>,
}

#[derive(Serialize)]
pub struct NearestMarker {
    pub rank: usize,
    pub name: String,
    pub lat: f64,
    pub lon: f64,
    /// Planar distance in degrees.
    pub distance: f64,
    pub color: MarkerColor,
    pub popup: String,
}

#[derive(Serialize)]
pub struct NearestResponse {
    pub reference: Coordinates,
    pub limit: usize,
    pub markers: Vec<NearestMarker>,
}

pub(super) async fn nearest(
    State(state): State<Arc<AppState>>,
    query: Result<Query<NearestQuery>, QueryRejection>,
) -> Result<Json<NearestResponse>, ApiError> {
    let start = Instant::now();

    // Malformed numbers get the same JSON error shape as missing ones.
    let Query(params) = query.map_err(|e| api_error(StatusCode::BAD_REQUEST, e.body_text()))?;

    let (lat, lon) = match (params.lat, params.lon) {
        (Some(lat), Some(lon)) => (lat, lon),
        _ => return Err(api_error(StatusCode::BAD_REQUEST, "Provide 'lat' and 'lon' parameters")),
    };
    let reference = Coordinates::new(lat, lon)
        .map_err(|_| api_error(StatusCode::BAD_REQUEST, "Invalid coordinates. Lat: -90..90, Lon: -180..180"))?;

    let ranking = state.config.ranking();
    let limit = params.limit.unwrap_or(ranking.limit());
    let policy = HighlightPolicy::new(ranking.highlighted());

    let markers: Vec<NearestMarker> = rank_nearest(reference, &CITIES, limit)
        .iter()
        .enumerate()
        .map(|(i, r)| NearestMarker {
            rank: i + 1,
            name: r.point.name.to_string(),
            lat: r.point.latitude,
            lon: r.point.longitude,
            distance: r.distance,
            color: policy.color_for(i),
            popup: popup_html(r.point),
        })
        .collect();

    info!(
        "GET /api/nearest lat={} lon={} limit={} -> {} ({:.1}ms)",
        lat,
        lon,
        limit,
        markers.first().map(|m| m.name.as_str()).unwrap_or("-"),
        start.elapsed().as_secs_f64() * 1000.0,
    );

    Ok(Json(NearestResponse {
        reference,
        limit,
        markers,
    }))
}

// ─── GET /api/locate ─────────────────────────────────────────────

pub(super) async fn locate(State(state): State<Arc<AppState>>) -> Result<Json<Position>, ApiError> {
    let start = Instant::now();

    let resolver = LocationResolver::auto(state.config.location());
    let position = resolver.resolve().await.map_err(|e| {
        let status = match e {
            LocationError::Timeout => StatusCode::GATEWAY_TIMEOUT,
            _ => StatusCode::BAD_GATEWAY,
        };
        api_error(status, e.to_string())
    })?;

    info!(
        "GET /api/locate -> {} ({:.1}ms)",
        position.coords,
        start.elapsed().as_secs_f64() * 1000.0,
    );

    Ok(Json(position))
}

// ─── GET /api/location-error ─────────────────────────────────────

#[derive(Deserialize)]
pub struct LocationErrorQuery {
    pub code: Option<u16>,
    pub message: Option<String>,
}

#[derive(Serialize)]
pub struct LocationErrorResponse {
    pub message: String,
}

/// The page reports a failed browser geolocation request here so it is
/// logged server-side and gets a consistent message to display.
pub async fn location_error(Query(params): Query<LocationErrorQuery>) -> Json<LocationErrorResponse> {
    let err = match params.code {
        Some(code) => LocationError::from_geolocation_code(code, params.message.unwrap_or_default()),
        None => LocationError::Unsupported,
    };
    error!("Browser reported: Error getting present location: {}", err);

    Json(LocationErrorResponse {
        message: err.to_string(),
    })
}

// ─── GET /api/config ─────────────────────────────────────────────

#[derive(Serialize)]
pub struct ConfigResponse {
    #[serde(flatten)]
    pub map: MapConfig,
    pub limit: usize,
    pub highlighted: usize,
}

pub async fn map_config(State(state): State<Arc<AppState>>) -> Json<ConfigResponse> {
    let ranking = state.config.ranking();
    Json(ConfigResponse {
        map: state.config.map().clone(),
        limit: ranking.limit(),
        highlighted: ranking.highlighted(),
    })
}
