//! Route request and reply types
//!
//! Mirrors the `/api/find_route` wire format and turns raw replies into a
//! tagged [`RouteResult`].

use std::sync::Arc;

use reqwest::StatusCode;
use serde::{Deserialize, Serialize};

use crate::core::avoid::AvoidList;
use crate::core::error::{Error, Result};

/// Geographic point, `[lat, lon]` on the wire
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct Coordinate {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinate {
    pub const fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }
}

impl From<[f64; 2]> for Coordinate {
    fn from([lat, lon]: [f64; 2]) -> Self {
        Self { lat, lon }
    }
}

impl From<Coordinate> for [f64; 2] {
    fn from(c: Coordinate) -> Self {
        [c.lat, c.lon]
    }
}

/// Body of a `POST /api/find_route` call.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RouteRequest {
    start_address: String,
    destination_address: String,
    avoid: AvoidList,
}

impl RouteRequest {
    /// Build a request, refusing blank addresses.
    pub fn new(start: &str, destination: &str, avoid: AvoidList) -> Result<Self> {
        let start = start.trim();
        let destination = destination.trim();

        match (start.is_empty(), destination.is_empty()) {
            (true, true) => Err(Error::Validation(
                "start and destination addresses are required".to_string(),
            )),
            (true, false) => Err(Error::Validation("start address is required".to_string())),
            (false, true) => Err(Error::Validation(
                "destination address is required".to_string(),
            )),
            (false, false) => Ok(Self {
                start_address: start.to_string(),
                destination_address: destination.to_string(),
                avoid,
            }),
        }
    }

    pub fn start_address(&self) -> &str {
        &self.start_address
    }

    pub fn destination_address(&self) -> &str {
        &self.destination_address
    }

    pub fn avoid(&self) -> &AvoidList {
        &self.avoid
    }
}

/// A route the backend found.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteFound {
    /// Route geometry, never empty
    pub coordinates: Arc<[Coordinate]>,
    /// Free-form explanation from the routing algorithm (may be empty)
    pub log: String,
}

/// Outcome of one submission: a route, or why there is none.
pub type RouteResult = Result<RouteFound>;

#[derive(Debug, Deserialize)]
struct RouteReply {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    route: Option<RouteFeature>,
    #[serde(default)]
    log: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RouteFeature {
    geometry: Geometry,
}

#[derive(Debug, Deserialize)]
struct Geometry {
    coordinates: Vec<Coordinate>,
}

/// Interpret a raw `/api/find_route` reply.
///
/// Non-2xx statuses and `success: false` bodies become [`Error::Backend`]
/// carrying the server's `error` text when it sent one. Undecodable bodies
/// become [`Error::Decode`].
pub fn interpret_reply(status: StatusCode, body: &str) -> RouteResult {
    let reply: RouteReply = match serde_json::from_str(body) {
        Ok(reply) => reply,
        Err(e) if status.is_success() => return Err(e.into()),
        Err(_) => {
            return Err(Error::Backend {
                status: Some(status.as_u16()),
                message: None,
            })
        }
    };

    if !status.is_success() {
        return Err(Error::Backend {
            status: Some(status.as_u16()),
            message: reply.error,
        });
    }

    if !reply.success {
        return Err(Error::Backend {
            status: None,
            message: reply.error,
        });
    }

    let coordinates = reply
        .route
        .map(|feature| feature.geometry.coordinates)
        .unwrap_or_default();
    if coordinates.is_empty() {
        return Err(Error::Decode(
            "successful reply carried no route geometry".to_string(),
        ));
    }

    Ok(RouteFound {
        coordinates: coordinates.into(),
        log: reply.log.unwrap_or_default(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::avoid::normalize;
    use crate::core::error::GENERIC_BACKEND_FAILURE;

    #[test]
    fn test_request_serializes_to_wire_shape() {
        let request = RouteRequest::new(
            " 1125 Colonel By Dr ",
            "75 Laurier Avenue East",
            normalize("Bank St\n\nRideau St"),
        )
        .unwrap();

        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            serde_json::json!({
                "start_address": "1125 Colonel By Dr",
                "destination_address": "75 Laurier Avenue East",
                "avoid": ["Bank St", "Rideau St"],
            })
        );
    }

    #[test]
    fn test_request_rejects_blank_addresses() {
        for (start, end) in [("", "anything"), ("anything", "   "), (" ", "\t")] {
            let err = RouteRequest::new(start, end, AvoidList::default()).unwrap_err();
            assert!(matches!(err, Error::Validation(_)), "{start:?} -> {end:?}");
        }
    }

    #[test]
    fn test_interpret_success() {
        let body = r#"{
            "success": true,
            "route": {"geometry": {"coordinates": [[45.40, -75.70], [45.41, -75.69], [45.42, -75.68]]}},
            "log": "avoided Bank St"
        }"#;
        let found = interpret_reply(StatusCode::OK, body).unwrap();

        assert_eq!(found.coordinates.len(), 3);
        assert_eq!(found.coordinates[0], Coordinate::new(45.40, -75.70));
        assert_eq!(found.coordinates[2], Coordinate::new(45.42, -75.68));
        assert_eq!(found.log, "avoided Bank St");
    }

    #[test]
    fn test_interpret_success_without_log() {
        let body = r#"{"success": true, "route": {"geometry": {"coordinates": [[45.0, -75.0]]}}}"#;
        let found = interpret_reply(StatusCode::OK, body).unwrap();
        assert_eq!(found.log, "");
        assert_eq!(found.coordinates.len(), 1);
    }

    #[test]
    fn test_interpret_success_flag_false() {
        let body = r#"{"success": false, "error": "no route found"}"#;
        let err = interpret_reply(StatusCode::OK, body).unwrap_err();
        assert_eq!(err.status_message(), "no route found");
    }

    #[test]
    fn test_interpret_missing_success_flag_is_failure() {
        let body = r#"{"route": {"geometry": {"coordinates": [[-75, 45], [-76, 46]]}}}"#;
        let err = interpret_reply(StatusCode::OK, body).unwrap_err();
        assert!(matches!(err, Error::Backend { status: None, message: None }));
        assert_eq!(err.status_message(), GENERIC_BACKEND_FAILURE);
    }

    #[test]
    fn test_interpret_http_error_with_message() {
        let body = r#"{"error": "start and end are required"}"#;
        let err = interpret_reply(StatusCode::BAD_REQUEST, body).unwrap_err();
        match err {
            Error::Backend { status, message } => {
                assert_eq!(status, Some(400));
                assert_eq!(message.as_deref(), Some("start and end are required"));
            }
            other => panic!("Expected backend error, got {other:?}"),
        }
    }

    #[test]
    fn test_interpret_http_error_with_html_body() {
        let err = interpret_reply(StatusCode::BAD_GATEWAY, "<html>Bad Gateway</html>").unwrap_err();
        assert_eq!(err.status_message(), GENERIC_BACKEND_FAILURE);
    }

    #[test]
    fn test_interpret_garbage_body() {
        let err = interpret_reply(StatusCode::OK, "not json at all").unwrap_err();
        assert!(matches!(err, Error::Decode(_)));
        assert_eq!(err.status_message(), GENERIC_BACKEND_FAILURE);
    }

    #[test]
    fn test_interpret_success_with_empty_geometry() {
        let body = r#"{"success": true, "route": {"geometry": {"coordinates": []}}}"#;
        let err = interpret_reply(StatusCode::OK, body).unwrap_err();
        assert!(matches!(err, Error::Decode(_)));
    }
}
