/// Fixed earthquake-catalog endpoint and query window.
pub const QUAKE_HOST: &str = "earthquake.usgs.gov";
pub const QUAKE_PATH: &str = "/fdsnws/event/1/query";
pub const QUERY_FORMAT: &str = "geojson";
pub const QUERY_START_TIME: &str = "2020-05-23";
pub const QUERY_END_TIME: &str = "2020-05-31";

/// Whole-globe bounding box.
pub const MAX_LONGITUDE: f64 = 180.0;
pub const MIN_LONGITUDE: f64 = -180.0;
pub const MAX_LATITUDE: f64 = 90.0;
pub const MIN_LATITUDE: f64 = -90.0;

/// Tectonic-plate boundary dataset (PB2002 plates).
pub const BOUNDARY_URL: &str =
    "https://raw.githubusercontent.com/fraxen/tectonicplates/master/GeoJSON/PB2002_plates.json";

/// Build the catalog query URL for the fixed date range and bounding box.
pub fn quake_query_url() -> String {
    format!(
        "https://{QUAKE_HOST}{QUAKE_PATH}?format={QUERY_FORMAT}\
         &starttime={QUERY_START_TIME}&endtime={QUERY_END_TIME}\
         &maxlongitude={MAX_LONGITUDE}&minlongitude={MIN_LONGITUDE}\
         &maxlatitude={MAX_LATITUDE}&minlatitude={MIN_LATITUDE}"
    )
}

#[cfg(test)]
mod tests {
    use super::quake_query_url;

    #[test]
    fn url_has_the_fixed_host_and_path() {
        assert!(quake_query_url().starts_with("https://earthquake.usgs.gov/fdsnws/event/1/query?"));
    }

    #[test]
    fn url_has_exactly_the_fixed_parameters() {
        let url = quake_query_url();
        let query = url.split_once('?').unwrap().1;
        let params: Vec<&str> = query.split('&').collect();
        assert_eq!(
            params,
            [
                "format=geojson",
                "starttime=2020-05-23",
                "endtime=2020-05-31",
                "maxlongitude=180",
                "minlongitude=-180",
                "maxlatitude=90",
                "minlatitude=-90",
            ]
        );
    }
}
