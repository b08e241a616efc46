//! Text rendering of the session for the terminal

use nogo_router::core::map::{Frame, Viewport};
use nogo_router::{AvoidList, Coordinate, FormState, Session};

fn point(c: &Coordinate) -> String {
    format!("{:.5}, {:.5}", c.lat, c.lon)
}

/// "Avoid list preview (N)" followed by the streets, one per line
pub fn avoid_preview(list: &AvoidList) -> String {
    let mut out = format!("Avoid list preview ({})", list.len());
    if list.is_empty() {
        out.push_str("\n  Nothing to avoid yet.");
    }
    for street in list {
        out.push_str("\n  - ");
        out.push_str(street);
    }
    out
}

pub fn form_summary(form: &FormState) -> String {
    let field = |value: &str| {
        if value.trim().is_empty() {
            "(empty)".to_string()
        } else {
            value.to_string()
        }
    };
    format!(
        "Start:       {}\nDestination: {}\n{}",
        field(&form.start),
        field(&form.end),
        avoid_preview(&form.avoid_list())
    )
}

/// Status line plus the algorithm log when there is one
pub fn status_line(session: &Session) -> String {
    let mut out = format!("Status: {}", session.status().describe());
    if !session.log().is_empty() {
        out.push_str("\nLog: ");
        out.push_str(session.log());
    }
    out
}

pub fn frame_summary(frame: &Frame) -> String {
    match &frame.viewport {
        Viewport::Default { center, zoom } => {
            format!("Map: base view at {} (zoom {})", point(center), zoom)
        }
        Viewport::Fit { bounds, padding_px } => {
            let mut out = format!(
                "Map: {} point(s), lat {:.5}..{:.5}, lon {:.5}..{:.5} (padding {}px)",
                frame.path.len(),
                bounds.south,
                bounds.north,
                bounds.west,
                bounds.east,
                padding_px
            );
            for marker in &frame.markers {
                out.push_str(&format!("\n  {:<5}: {}", marker.kind.label(), point(&marker.position)));
            }
            out
        }
    }
}
