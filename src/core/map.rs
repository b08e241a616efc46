//! Map synchronization
//!
//! Derives the camera, path and endpoint markers from the current route and
//! pushes them to a [`MapWidget`]. Frames are always recomputed wholesale.

use std::sync::Arc;

use crate::core::route::{Coordinate, RouteFound};

/// Map center used when there is no route: Ottawa City Hall
pub const DEFAULT_CENTER: Coordinate = Coordinate::new(45.4215, -75.6972);

/// Zoom level used when there is no route
pub const DEFAULT_ZOOM: u8 = 12;

/// Pixel padding around a fitted route
pub const FIT_PADDING_PX: u32 = 40;

/// Endpoint marker radius in pixels
pub const MARKER_RADIUS_PX: f32 = 8.0;

/// Route geometry and its endpoints, as shown on the map.
#[derive(Debug, Clone)]
pub struct MapRouteState {
    coordinates: Arc<[Coordinate]>,
    start_point: Option<Coordinate>,
    end_point: Option<Coordinate>,
}

impl Default for MapRouteState {
    fn default() -> Self {
        Self::empty()
    }
}

impl MapRouteState {
    /// No route: base map only
    pub fn empty() -> Self {
        Self {
            coordinates: Arc::from(Vec::<Coordinate>::new()),
            start_point: None,
            end_point: None,
        }
    }

    /// State for a route geometry. The start marker sits on the first point
    /// and the end marker on the last (the same point for a one-point route).
    pub fn from_coordinates(coordinates: Arc<[Coordinate]>) -> Self {
        let start_point = coordinates.first().copied();
        let end_point = coordinates.last().copied();
        Self {
            coordinates,
            start_point,
            end_point,
        }
    }

    pub fn from_route(route: &RouteFound) -> Self {
        Self::from_coordinates(Arc::clone(&route.coordinates))
    }

    pub fn is_empty(&self) -> bool {
        self.coordinates.is_empty()
    }

    pub fn coordinates(&self) -> &Arc<[Coordinate]> {
        &self.coordinates
    }

    pub fn start_point(&self) -> Option<Coordinate> {
        self.start_point
    }

    pub fn end_point(&self) -> Option<Coordinate> {
        self.end_point
    }
}

/// Axis-aligned lat/lon bounding box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub south: f64,
    pub west: f64,
    pub north: f64,
    pub east: f64,
}

impl Bounds {
    /// Smallest box containing every point, or `None` for no points.
    pub fn from_points<'a, I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = &'a Coordinate>,
    {
        let mut iter = points.into_iter();
        let first = iter.next()?;
        let init = Bounds {
            south: first.lat,
            west: first.lon,
            north: first.lat,
            east: first.lon,
        };
        Some(iter.fold(init, |b, p| Bounds {
            south: b.south.min(p.lat),
            west: b.west.min(p.lon),
            north: b.north.max(p.lat),
            east: b.east.max(p.lon),
        }))
    }

    pub fn contains(&self, point: &Coordinate) -> bool {
        (self.south..=self.north).contains(&point.lat) && (self.west..=self.east).contains(&point.lon)
    }

    /// South-west and north-east corners
    pub fn corners(&self) -> [Coordinate; 2] {
        [
            Coordinate::new(self.south, self.west),
            Coordinate::new(self.north, self.east),
        ]
    }
}

/// Camera placement for a frame
#[derive(Debug, Clone, PartialEq)]
pub enum Viewport {
    /// Fixed default view, used when there is no route
    Default { center: Coordinate, zoom: u8 },
    /// Fit the view to contain `bounds` plus pixel padding
    Fit { bounds: Bounds, padding_px: u32 },
}

/// Line style for the route path
#[derive(Debug, Clone, PartialEq)]
pub struct PathStyle {
    pub color: &'static str,
    pub weight: f32,
    pub opacity: f32,
}

impl Default for PathStyle {
    fn default() -> Self {
        Self {
            color: "#1d4ed8",
            weight: 5.0,
            opacity: 0.85,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerKind {
    Start,
    End,
}

impl MarkerKind {
    pub fn label(self) -> &'static str {
        match self {
            MarkerKind::Start => "Start",
            MarkerKind::End => "End",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "Start" => Some(MarkerKind::Start),
            "End" => Some(MarkerKind::End),
            _ => None,
        }
    }

    pub fn color(self) -> &'static str {
        match self {
            MarkerKind::Start => "#16a34a",
            MarkerKind::End => "#dc2626",
        }
    }
}

/// Circle marker at a route endpoint
#[derive(Debug, Clone, PartialEq)]
pub struct Marker {
    pub kind: MarkerKind,
    pub position: Coordinate,
    pub radius_px: f32,
}

/// Everything the map shows for one [`MapRouteState`].
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub viewport: Viewport,
    /// Route path; empty when there is no route
    pub path: Arc<[Coordinate]>,
    pub style: PathStyle,
    pub markers: Vec<Marker>,
}

/// Compute the frame for a route state.
pub fn frame(state: &MapRouteState) -> Frame {
    let viewport = match Bounds::from_points(state.coordinates.iter()) {
        Some(bounds) => Viewport::Fit {
            bounds,
            padding_px: FIT_PADDING_PX,
        },
        None => Viewport::Default {
            center: DEFAULT_CENTER,
            zoom: DEFAULT_ZOOM,
        },
    };

    let markers = [
        (MarkerKind::Start, state.start_point),
        (MarkerKind::End, state.end_point),
    ]
    .into_iter()
    .filter_map(|(kind, point)| {
        point.map(|position| Marker {
            kind,
            position,
            radius_px: MARKER_RADIUS_PX,
        })
    })
    .collect();

    Frame {
        viewport,
        path: Arc::clone(&state.coordinates),
        style: PathStyle::default(),
        markers,
    }
}

/// Map rendering collaborator.
pub trait MapWidget {
    /// Center the map on a point at a zoom level
    fn set_view(&mut self, center: Coordinate, zoom: u8);

    /// Move the camera so every point is visible, with pixel padding
    fn fit_bounds(&mut self, points: &[Coordinate], padding_px: u32);

    /// Remove every path and marker
    fn clear_layers(&mut self);

    fn draw_path(&mut self, points: &[Coordinate], style: &PathStyle);

    fn add_marker(&mut self, at: Coordinate, radius_px: f32, label: &str);
}

/// Push a frame to a widget, replacing whatever it showed before.
pub fn render<W: MapWidget + ?Sized>(frame: &Frame, widget: &mut W) {
    widget.clear_layers();

    match &frame.viewport {
        Viewport::Default { center, zoom } => widget.set_view(*center, *zoom),
        Viewport::Fit { bounds, padding_px } => {
            // The box corners span the same region as the full path
            widget.fit_bounds(&bounds.corners(), *padding_px);
        }
    }

    if frame.path.is_empty() {
        return;
    }
    widget.draw_path(&frame.path, &frame.style);
    for marker in &frame.markers {
        widget.add_marker(marker.position, marker.radius_px, marker.kind.label());
    }
}

/// Keeps a widget in step with the session's route.
///
/// Re-renders only when the coordinate sequence changed identity.
#[derive(Debug, Default)]
pub struct MapSynchronizer {
    rendered: Option<Arc<[Coordinate]>>,
}

impl MapSynchronizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Render `state` if its coordinates differ from the last rendered ones.
    /// Returns whether the widget was redrawn.
    pub fn sync<W: MapWidget + ?Sized>(&mut self, state: &MapRouteState, widget: &mut W) -> bool {
        if let Some(previous) = &self.rendered {
            if Arc::ptr_eq(previous, &state.coordinates) {
                return false;
            }
        }

        let frame = frame(state);
        render(&frame, widget);
        log::debug!("Map redrawn with {} point(s)", frame.path.len());
        self.rendered = Some(Arc::clone(&state.coordinates));
        true
    }
}
