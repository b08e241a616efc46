//! GeoJSON map output
//!
//! A [`MapWidget`] that records what would be drawn and serializes it as a
//! GeoJSON `FeatureCollection`, ready for geojson.io, QGIS or Leaflet.
//! GeoJSON positions are `[lon, lat]`, the reverse of the backend's order.

use std::path::Path;

use serde_json::{json, Value};

use crate::core::error::Result;
use crate::core::map::{Bounds, MapWidget, MarkerKind, PathStyle};
use crate::core::route::Coordinate;

fn position(c: &Coordinate) -> Value {
    json!([c.lon, c.lat])
}

/// Camera state of a [`GeoJsonMap`]
#[derive(Debug, Clone, PartialEq)]
pub enum Camera {
    Center { center: Coordinate, zoom: u8 },
    Fit { bounds: Bounds, padding_px: u32 },
}

/// Map widget that renders to GeoJSON.
#[derive(Debug, Default)]
pub struct GeoJsonMap {
    camera: Option<Camera>,
    features: Vec<Value>,
}

impl GeoJsonMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn camera(&self) -> Option<&Camera> {
        self.camera.as_ref()
    }

    /// Number of drawn layers (path plus markers)
    pub fn layer_count(&self) -> usize {
        self.features.len()
    }

    pub fn to_feature_collection(&self) -> Value {
        let mut collection = json!({
            "type": "FeatureCollection",
            "features": self.features,
        });

        match &self.camera {
            Some(Camera::Fit { bounds, padding_px }) => {
                collection["bbox"] = json!([bounds.west, bounds.south, bounds.east, bounds.north]);
                collection["properties"] = json!({ "padding_px": padding_px });
            }
            Some(Camera::Center { center, zoom }) => {
                collection["properties"] = json!({ "center": position(center), "zoom": zoom });
            }
            None => {}
        }
        collection
    }

    /// Write the collection as pretty-printed JSON.
    pub fn write_to(&self, path: impl AsRef<Path>) -> Result<()> {
        let text = serde_json::to_string_pretty(&self.to_feature_collection())?;
        std::fs::write(path, text)?;
        Ok(())
    }
}

impl MapWidget for GeoJsonMap {
    fn set_view(&mut self, center: Coordinate, zoom: u8) {
        self.camera = Some(Camera::Center { center, zoom });
    }

    fn fit_bounds(&mut self, points: &[Coordinate], padding_px: u32) {
        match Bounds::from_points(points) {
            Some(bounds) => self.camera = Some(Camera::Fit { bounds, padding_px }),
            None => log::warn!("Ignoring fit request without points"),
        }
    }

    fn clear_layers(&mut self) {
        self.features.clear();
    }

    fn draw_path(&mut self, points: &[Coordinate], style: &PathStyle) {
        self.features.push(json!({
            "type": "Feature",
            "geometry": {
                "type": "LineString",
                "coordinates": points.iter().map(position).collect::<Vec<_>>(),
            },
            "properties": {
                "stroke": style.color,
                "stroke-width": style.weight,
                "stroke-opacity": style.opacity,
            },
        }));
    }

    fn add_marker(&mut self, at: Coordinate, radius_px: f32, label: &str) {
        let mut properties = json!({
            "label": label,
            "radius_px": radius_px,
        });
        if let Some(kind) = MarkerKind::from_label(label) {
            properties["marker-color"] = json!(kind.color());
        }

        self.features.push(json!({
            "type": "Feature",
            "geometry": { "type": "Point", "coordinates": position(&at) },
            "properties": properties,
        }));
    }
}
