//! Location acquisition for SOS Map.
//!
//! A single asynchronous request for the caller's current position, with
//! explicit success and error outcomes.

pub mod providers;
pub mod resolver;
pub mod types;

pub use providers::{FixedLocationProvider, IpLocationProvider, LocationProvider, UnsupportedLocationProvider};
pub use resolver::LocationResolver;
pub use types::{LocationError, Position, PositionSource};
