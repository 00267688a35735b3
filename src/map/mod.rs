//! The map screen model: an explicit session that owns its markers.

pub mod markers;
pub mod session;

pub use markers::{popup_html, HighlightPolicy, Marker, MarkerColor, MarkerLayer, MarkerStyle};
pub use session::{LocateStatus, MapSession, MapView, SessionError};
