//! Waste hotspots and the flat projection used to lay them out on a map panel.

use serde::{Deserialize, Serialize};

use crate::collaborators::GeoLocation;

/// Fraction of the bounding span added on each side of the map.
const SPAN_PADDING_RATIO: f64 = 0.2;
/// Padding in degrees when every point shares a coordinate.
const DEGENERATE_PADDING: f64 = 0.2;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WasteHotspot {
    pub id: String,
    pub name: String,
    pub address: String,
    pub latitude: f64,
    pub longitude: f64,
    /// 1-10, higher means more surplus food observed.
    pub waste_score: u8,
    pub contact_email: String,
    pub contact_phone: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
    pub padding: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MapPointKind {
    Center,
    Hotspot,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectedPoint {
    pub id: String,
    pub name: String,
    pub kind: MapPointKind,
    pub x: f64,
    pub y: f64,
}

/// Project the center and hotspots into `viewport` pixel space.
///
/// North is up, so latitude maps to y inverted. Returns nothing for a
/// zero-sized viewport.
pub fn project_points(
    center: GeoLocation,
    hotspots: &[WasteHotspot],
    viewport: Viewport,
) -> Vec<ProjectedPoint> {
    if viewport.width <= 0.0 || viewport.height <= 0.0 {
        return Vec::new();
    }

    let mut points = vec![(
        "center-location".to_string(),
        "Your Location".to_string(),
        MapPointKind::Center,
        center.latitude,
        center.longitude,
    )];
    points.extend(hotspots.iter().map(|hotspot| {
        (
            hotspot.id.clone(),
            hotspot.name.clone(),
            MapPointKind::Hotspot,
            hotspot.latitude,
            hotspot.longitude,
        )
    }));

    let (mut min_lat, mut max_lat) = (f64::INFINITY, f64::NEG_INFINITY);
    let (mut min_lng, mut max_lng) = (f64::INFINITY, f64::NEG_INFINITY);
    for (_, _, _, lat, lng) in &points {
        min_lat = min_lat.min(*lat);
        max_lat = max_lat.max(*lat);
        min_lng = min_lng.min(*lng);
        max_lng = max_lng.max(*lng);
    }

    let lat_pad = padding_for(max_lat - min_lat);
    let lng_pad = padding_for(max_lng - min_lng);
    min_lat -= lat_pad;
    max_lat += lat_pad;
    min_lng -= lng_pad;
    max_lng += lng_pad;

    points
        .into_iter()
        .map(|(id, name, kind, lat, lng)| ProjectedPoint {
            id,
            name,
            kind,
            x: map_range(
                lng,
                min_lng,
                max_lng,
                viewport.padding,
                viewport.width - viewport.padding,
            ),
            y: map_range(
                lat,
                max_lat,
                min_lat,
                viewport.padding,
                viewport.height - viewport.padding,
            ),
        })
        .collect()
}

fn padding_for(span: f64) -> f64 {
    let padding = span * SPAN_PADDING_RATIO;
    if padding == 0.0 {
        DEGENERATE_PADDING
    } else {
        padding
    }
}

fn map_range(value: f64, in_min: f64, in_max: f64, out_min: f64, out_max: f64) -> f64 {
    (value - in_min) * (out_max - out_min) / (in_max - in_min) + out_min
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hotspot(id: &str, latitude: f64, longitude: f64) -> WasteHotspot {
        WasteHotspot {
            id: id.to_string(),
            name: id.to_string(),
            address: "101 City Center".to_string(),
            latitude,
            longitude,
            waste_score: 8,
            contact_email: "mgr@example.org".to_string(),
            contact_phone: "555-0101".to_string(),
        }
    }

    fn viewport() -> Viewport {
        Viewport {
            width: 400.0,
            height: 300.0,
            padding: 20.0,
        }
    }

    #[test]
    fn points_stay_inside_padded_viewport() {
        let center = GeoLocation {
            latitude: 40.7128,
            longitude: -74.0060,
        };
        let projected = project_points(
            center,
            &[hotspot("north", 40.80, -73.95), hotspot("south", 40.60, -74.10)],
            viewport(),
        );

        assert_eq!(projected.len(), 3);
        assert_eq!(projected[0].kind, MapPointKind::Center);
        for point in &projected {
            assert!(point.x > 20.0 && point.x < 380.0, "x out of bounds: {point:?}");
            assert!(point.y > 20.0 && point.y < 280.0, "y out of bounds: {point:?}");
        }
        let north = &projected[1];
        let south = &projected[2];
        assert!(north.y < south.y, "north renders above south");
        assert!(north.x > south.x, "east renders right of west");
    }

    #[test]
    fn single_point_sits_in_the_middle() {
        let center = GeoLocation {
            latitude: 25.7617,
            longitude: -80.1918,
        };
        let projected = project_points(center, &[], viewport());
        assert!((projected[0].x - 200.0).abs() < 1e-9);
        assert!((projected[0].y - 150.0).abs() < 1e-9);
    }

    #[test]
    fn empty_viewport_projects_nothing() {
        let center = GeoLocation {
            latitude: 0.0,
            longitude: 0.0,
        };
        let flat = Viewport {
            width: 0.0,
            height: 300.0,
            padding: 20.0,
        };
        assert!(project_points(center, &[hotspot("a", 1.0, 1.0)], flat).is_empty());
    }
}
