use serde::{Deserialize, Serialize};

/// A `[longitude, latitude]` pair in decimal degrees.
pub type LonLat = [f64; 2];

/// GeoJSON geometry, tagged by its `type` member. Extra coordinate
/// dimensions (depth on quake points) are carried but ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Geometry {
    Point { coordinates: Vec<f64> },
    LineString { coordinates: Vec<Vec<f64>> },
    MultiLineString { coordinates: Vec<Vec<Vec<f64>>> },
    Polygon { coordinates: Vec<Vec<Vec<f64>>> },
    MultiPolygon { coordinates: Vec<Vec<Vec<Vec<f64>>>> },
}

impl Geometry {
    /// Longitude/latitude of a point geometry. `None` for non-point
    /// geometries or points with fewer than two coordinates.
    pub fn point(&self) -> Option<LonLat> {
        match self {
            Geometry::Point { coordinates } if coordinates.len() >= 2 => {
                Some([coordinates[0], coordinates[1]])
            }
            _ => None,
        }
    }

    /// Every line or ring of the geometry, flattened to a list of
    /// polylines. Positions with fewer than two coordinates are dropped.
    pub fn polylines(&self) -> Vec<Vec<LonLat>> {
        fn line(positions: &[Vec<f64>]) -> Vec<LonLat> {
            positions
                .iter()
                .filter(|p| p.len() >= 2)
                .map(|p| [p[0], p[1]])
                .collect()
        }

        match self {
            Geometry::Point { .. } => Vec::new(),
            Geometry::LineString { coordinates } => vec![line(coordinates)],
            Geometry::MultiLineString { coordinates } | Geometry::Polygon { coordinates } => {
                coordinates.iter().map(|l| line(l)).collect()
            }
            Geometry::MultiPolygon { coordinates } => coordinates
                .iter()
                .flat_map(|polygon| polygon.iter().map(|l| line(l)))
                .collect(),
        }
    }
}

/// The USGS catalog response. A payload without a `features` array is
/// rejected at parse time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuakeFeed {
    pub features: Vec<QuakeFeature>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuakeFeature {
    #[serde(default)]
    pub properties: Option<QuakeProperties>,
    #[serde(default)]
    pub geometry: Option<Geometry>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct QuakeProperties {
    #[serde(default)]
    pub place: Option<String>,
    /// Event time in epoch milliseconds.
    #[serde(default)]
    pub time: i64,
    /// Absent for some events; such records are skipped by the point
    /// transform.
    #[serde(default)]
    pub mag: Option<f64>,
    /// 0/1 flag in the feed.
    #[serde(default)]
    pub tsunami: i64,
}

/// The tectonic-plate boundary dataset (PB2002).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoundaryFeed {
    pub features: Vec<BoundaryFeature>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoundaryFeature {
    #[serde(default)]
    pub properties: Option<BoundaryProperties>,
    #[serde(default)]
    pub geometry: Option<Geometry>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct BoundaryProperties {
    #[serde(default, rename = "PlateName")]
    pub plate_name: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::{BoundaryFeed, Geometry, QuakeFeed};

    const QUAKE_PAYLOAD: &str = r#"{
        "type": "FeatureCollection",
        "metadata": {"generated": 1590400000000, "count": 2},
        "features": [
            {
                "type": "Feature",
                "properties": {"mag": 4.3, "place": "20km SSE of Somewhere", "time": 1590343325000, "tsunami": 0},
                "geometry": {"type": "Point", "coordinates": [-117.5, 35.7, 8.2]}
            },
            {
                "type": "Feature",
                "properties": {"mag": null, "place": null, "time": 1590343000000, "tsunami": 1},
                "geometry": {"type": "Point", "coordinates": [142.1, 38.3, 30.0]}
            }
        ]
    }"#;

    #[test]
    fn parses_a_catalog_payload() {
        let feed: QuakeFeed = serde_json::from_str(QUAKE_PAYLOAD).unwrap();
        assert_eq!(feed.features.len(), 2);

        let first = feed.features[0].properties.as_ref().unwrap();
        assert_eq!(first.mag, Some(4.3));
        assert_eq!(first.place.as_deref(), Some("20km SSE of Somewhere"));
        assert_eq!(first.time, 1_590_343_325_000);
        assert_eq!(first.tsunami, 0);
        assert_eq!(
            feed.features[0].geometry.as_ref().unwrap().point(),
            Some([-117.5, 35.7])
        );

        // Null magnitude and place survive parsing; skipping happens later.
        let second = feed.features[1].properties.as_ref().unwrap();
        assert_eq!(second.mag, None);
        assert_eq!(second.place, None);
    }

    #[test]
    fn payload_without_features_is_rejected() {
        let err = serde_json::from_str::<QuakeFeed>(r#"{"type": "FeatureCollection"}"#);
        assert!(err.is_err());
    }

    #[test]
    fn parses_a_boundary_payload() {
        let feed: BoundaryFeed = serde_json::from_str(
            r#"{
                "features": [{
                    "properties": {"LAYER": "plate", "Code": "OK", "PlateName": "Okhotsk"},
                    "geometry": {"type": "Polygon", "coordinates": [[[130.0, 45.0], [131.0, 46.0], [130.0, 45.0]]]}
                }]
            }"#,
        )
        .unwrap();

        let feature = &feed.features[0];
        assert_eq!(
            feature.properties.as_ref().unwrap().plate_name.as_deref(),
            Some("Okhotsk")
        );
        let lines = feature.geometry.as_ref().unwrap().polylines();
        assert_eq!(lines, vec![vec![[130.0, 45.0], [131.0, 46.0], [130.0, 45.0]]]);
    }

    #[test]
    fn point_geometry_has_no_polylines() {
        let geometry = Geometry::Point {
            coordinates: vec![1.0, 2.0, 3.0],
        };
        assert!(geometry.polylines().is_empty());
        assert_eq!(geometry.point(), Some([1.0, 2.0]));
    }

    #[test]
    fn short_point_coordinates_yield_none() {
        let geometry = Geometry::Point {
            coordinates: vec![1.0],
        };
        assert_eq!(geometry.point(), None);
    }

    #[test]
    fn multi_polygon_flattens_every_ring() {
        let geometry = Geometry::MultiPolygon {
            coordinates: vec![
                vec![vec![vec![0.0, 0.0], vec![1.0, 0.0]]],
                vec![
                    vec![vec![10.0, 10.0], vec![11.0, 10.0]],
                    vec![vec![10.2, 10.2], vec![10.8, 10.2]],
                ],
            ],
        };
        assert_eq!(geometry.polylines().len(), 3);
    }

    #[test]
    fn multi_line_string_keeps_line_order() {
        let geometry = Geometry::MultiLineString {
            coordinates: vec![
                vec![vec![0.0, 1.0], vec![2.0, 3.0]],
                vec![vec![4.0, 5.0], vec![6.0, 7.0]],
            ],
        };
        assert_eq!(
            geometry.polylines(),
            vec![vec![[0.0, 1.0], [2.0, 3.0]], vec![[4.0, 5.0], [6.0, 7.0]]]
        );
    }
}
