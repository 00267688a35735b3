//! SOS Map: locate the user, plot a fixed set of city markers and rank
//! them by planar distance on demand.

pub mod cities;
pub mod config;
pub mod geo;
pub mod location;
pub mod map;
pub mod ranking;
pub mod server;
pub mod telemetry;
