//! Core library modules for nogo-router
//!
//! Request lifecycle, wire types and map framing. Nothing in here touches a
//! terminal.

pub mod avoid;
pub mod client;
pub mod error;
pub mod geojson;
pub mod map;
pub mod route;
pub mod session;

// Re-export main types for internal use
pub use avoid::{normalize, AvoidList};
pub use client::{ClientConfig, RouteClient};
pub use map::{MapRouteState, MapSynchronizer};
pub use session::{RequestStatus, Session};
