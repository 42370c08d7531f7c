use crate::colors::magnitude_color;
use crate::feed::{BoundaryFeed, LonLat, QuakeFeed};
use crate::time_format::format_event_time;

/// Marker radius in pixels per unit of magnitude.
pub const MARKER_RADIUS_SCALE: f64 = 3.0;
pub const MARKER_OUTLINE_COLOR: &str = "black";
pub const MARKER_OUTLINE_WEIGHT: f64 = 1.0;
pub const MARKER_FILL_OPACITY: f64 = 0.6;

pub const BOUNDARY_COLOR: &str = "orange";
pub const BOUNDARY_WEIGHT: f64 = 3.0;

/// A styled circle marker for one earthquake. Immutable once built; handed
/// to the composer exactly once.
#[derive(Debug, Clone, PartialEq)]
pub struct QuakeMarker {
    pub lon: f64,
    pub lat: f64,
    pub magnitude: f64,
    /// `magnitude * MARKER_RADIUS_SCALE`. Degenerate radii (<= 0) from
    /// zero/negative magnitudes are kept as-is, not rejected.
    pub radius: f64,
    pub fill_color: &'static str,
    pub popup: Popup,
}

/// Popup content for one marker.
#[derive(Debug, Clone, PartialEq)]
pub struct Popup {
    pub place: String,
    pub time: String,
    pub magnitude: f64,
    pub tsunami: bool,
}

/// Point transform: one styled marker per earthquake feature.
///
/// Features without point geometry, properties, or a magnitude are skipped;
/// a bad record never fails the batch.
pub fn quake_markers(feed: &QuakeFeed) -> Vec<QuakeMarker> {
    feed.features
        .iter()
        .filter_map(|feature| {
            let props = feature.properties.as_ref()?;
            let [lon, lat] = feature.geometry.as_ref()?.point()?;
            let magnitude = props.mag?;
            Some(QuakeMarker {
                lon,
                lat,
                magnitude,
                radius: magnitude * MARKER_RADIUS_SCALE,
                fill_color: magnitude_color(magnitude),
                popup: Popup {
                    place: props.place.clone().unwrap_or_default(),
                    time: format_event_time(props.time),
                    magnitude,
                    tsunami: props.tsunami != 0,
                },
            })
        })
        .collect()
}

/// A styled polyline for one line or ring of a plate boundary.
#[derive(Debug, Clone, PartialEq)]
pub struct BoundaryPath {
    pub plate: String,
    pub points: Vec<LonLat>,
    pub color: &'static str,
    pub weight: f64,
}

/// Boundary transform: orange stroke, weight 3, no fill. One path per
/// line/ring; degenerate lines (fewer than two points) are dropped.
pub fn boundary_paths(feed: &BoundaryFeed) -> Vec<BoundaryPath> {
    feed.features
        .iter()
        .flat_map(|feature| {
            let plate = feature
                .properties
                .as_ref()
                .and_then(|p| p.plate_name.clone())
                .unwrap_or_default();
            let lines = feature
                .geometry
                .as_ref()
                .map(|g| g.polylines())
                .unwrap_or_default();
            lines
                .into_iter()
                .filter(|points| points.len() >= 2)
                .map(move |points| BoundaryPath {
                    plate: plate.clone(),
                    points,
                    color: BOUNDARY_COLOR,
                    weight: BOUNDARY_WEIGHT,
                })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{BOUNDARY_COLOR, BOUNDARY_WEIGHT, boundary_paths, quake_markers};
    use crate::feed::{
        BoundaryFeature, BoundaryFeed, BoundaryProperties, Geometry, QuakeFeature, QuakeFeed,
        QuakeProperties,
    };

    fn quake(mag: Option<f64>, lon: f64, lat: f64) -> QuakeFeature {
        QuakeFeature {
            properties: Some(QuakeProperties {
                place: Some("somewhere".into()),
                time: 1_590_343_325_000,
                mag,
                tsunami: 0,
            }),
            geometry: Some(Geometry::Point {
                coordinates: vec![lon, lat, 10.0],
            }),
        }
    }

    #[test]
    fn radius_is_three_times_the_magnitude() {
        let feed = QuakeFeed {
            features: vec![quake(Some(2.0), 0.0, 0.0), quake(Some(6.0), 1.0, 1.0)],
        };
        let markers = quake_markers(&feed);
        assert_eq!(markers.len(), 2);
        assert_eq!(markers[0].radius, 6.0);
        assert_eq!(markers[0].fill_color, "#FFF176");
        assert_eq!(markers[1].radius, 18.0);
        assert_eq!(markers[1].fill_color, "red");
    }

    #[test]
    fn degenerate_radii_are_accepted() {
        let feed = QuakeFeed {
            features: vec![quake(Some(0.0), 0.0, 0.0), quake(Some(-1.0), 0.0, 0.0)],
        };
        let markers = quake_markers(&feed);
        assert_eq!(markers[0].radius, 0.0);
        assert_eq!(markers[1].radius, -3.0);
        assert_eq!(markers[1].fill_color, "#81C784");
    }

    #[test]
    fn records_without_magnitude_or_geometry_are_skipped() {
        let mut no_geometry = quake(Some(3.0), 0.0, 0.0);
        no_geometry.geometry = None;
        let mut no_properties = quake(Some(3.0), 0.0, 0.0);
        no_properties.properties = None;

        let feed = QuakeFeed {
            features: vec![
                quake(None, 0.0, 0.0),
                no_geometry,
                no_properties,
                quake(Some(3.0), 5.0, 6.0),
            ],
        };
        let markers = quake_markers(&feed);
        assert_eq!(markers.len(), 1);
        assert_eq!((markers[0].lon, markers[0].lat), (5.0, 6.0));
    }

    #[test]
    fn popup_carries_place_time_and_tsunami() {
        let mut feature = quake(Some(4.2), 0.0, 0.0);
        feature.properties.as_mut().unwrap().tsunami = 1;
        let feed = QuakeFeed {
            features: vec![feature],
        };
        let popup = &quake_markers(&feed)[0].popup;
        assert_eq!(popup.place, "somewhere");
        assert_eq!(popup.time, "2020-05-24 18:02:05 UTC");
        assert_eq!(popup.magnitude, 4.2);
        assert!(popup.tsunami);
    }

    #[test]
    fn boundary_style_is_fixed() {
        let feed = BoundaryFeed {
            features: vec![BoundaryFeature {
                properties: Some(BoundaryProperties {
                    plate_name: Some("Pacific".into()),
                }),
                geometry: Some(Geometry::LineString {
                    coordinates: vec![vec![0.0, 0.0], vec![1.0, 1.0]],
                }),
            }],
        };
        let paths = boundary_paths(&feed);
        assert_eq!(paths.len(), 1);
        assert_eq!(paths[0].plate, "Pacific");
        assert_eq!(paths[0].color, BOUNDARY_COLOR);
        assert_eq!(paths[0].weight, BOUNDARY_WEIGHT);
    }

    #[test]
    fn polygon_rings_become_separate_paths() {
        let feed = BoundaryFeed {
            features: vec![BoundaryFeature {
                properties: None,
                geometry: Some(Geometry::Polygon {
                    coordinates: vec![
                        vec![vec![0.0, 0.0], vec![1.0, 0.0], vec![0.0, 0.0]],
                        vec![vec![0.2, 0.2], vec![0.8, 0.2], vec![0.2, 0.2]],
                    ],
                }),
            }],
        };
        let paths = boundary_paths(&feed);
        assert_eq!(paths.len(), 2);
        assert_eq!(paths[0].plate, "");
    }

    #[test]
    fn degenerate_lines_are_dropped() {
        let feed = BoundaryFeed {
            features: vec![BoundaryFeature {
                properties: None,
                geometry: Some(Geometry::LineString {
                    coordinates: vec![vec![3.0, 4.0]],
                }),
            }],
        };
        assert!(boundary_paths(&feed).is_empty());
    }
}
