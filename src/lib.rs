//! # NoGo-router Library
//!
//! Client side of a street-avoidance router for Ottawa: collect a start
//! address, a destination and a list of streets to avoid, ask the routing
//! backend for a route, and frame the result on a map.
//!
//! ## Features
//!
//! - **Avoid-list normalization**: one street per line, blanks dropped, order kept
//! - **Request lifecycle**: validation, in-flight status, success and failure
//!   tracked in an explicit [`Session`]
//! - **Map framing**: viewport fit, route path and start/end markers pushed to
//!   any [`MapWidget`]
//! - **GeoJSON output**: render the route to a `FeatureCollection`
//!
//! ## Basic Usage
//!
//! ```rust,no_run
//! use nogo_router::{Msg, RouteClient, Session};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = RouteClient::new();
//!     let mut session = Session::new();
//!     session.update(Msg::StartChanged("1125 Colonel By Dr".into()))?;
//!     session.update(Msg::EndChanged("75 Laurier Avenue East".into()))?;
//!     session.update(Msg::AvoidChanged("Bank St\nRideau St".into()))?;
//!
//!     let route = nogo_router::submit(&mut session, &client).await?;
//!     println!("{} points, status: {}", route.coordinates.len(), session.status().describe());
//!     Ok(())
//! }
//! ```
//!
//! ## Rendering
//!
//! ```rust,no_run
//! # use nogo_router::{GeoJsonMap, MapSynchronizer, Session};
//! # fn demo(session: &Session) -> nogo_router::Result<()> {
//! let mut map = GeoJsonMap::new();
//! let mut sync = MapSynchronizer::new();
//! sync.sync(session.map(), &mut map);
//! map.write_to("route.geojson")?;
//! # Ok(())
//! # }
//! ```

// Re-export core types that users might need
pub use crate::core::avoid::{normalize, AvoidList};
pub use crate::core::client::{ClientConfig, RouteClient, DEFAULT_BASE_URL};
pub use crate::core::error::{Error, Result};
pub use crate::core::geojson::GeoJsonMap;
pub use crate::core::map::{
    frame, render, Bounds, Frame, MapRouteState, MapSynchronizer, MapWidget, Viewport,
};
pub use crate::core::route::{Coordinate, RouteFound, RouteRequest, RouteResult};
pub use crate::core::session::{submit, Command, FormState, Msg, RequestStatus, Session};

// Internal modules
pub mod core;
