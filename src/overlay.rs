use chrono::SecondsFormat;
use geojson::{Feature, FeatureCollection, Geometry, Value};
use serde_json::{Map, Value as JsonValue};

use crate::format::{
    format_distance, format_duration, format_elevation, format_elevation_range, tour_stats_line,
};
use crate::options::{GpxElementType, OverlayOptions};
use crate::tour::{Point, Route, Segment, Tour, Waypoint};

pub const LINE_WEIGHT: u32 = 3;
pub const LINE_OPACITY: f64 = 0.8;
pub const ROUTE_DASH_ARRAY: &str = "5, 5";
pub const WAYPOINT_RADIUS: u32 = 5;
pub const WAYPOINT_OUTLINE: &str = "#fff";

/// Convert a tour into map overlay features drawn in `color`.
///
/// Tracks come first (one line per segment), then routes, then waypoints.
/// Lines need at least two points; shorter ones are not drawn.
pub fn tour_to_feature_collection(
    tour: &Tour,
    color: &str,
    opts: &OverlayOptions,
) -> FeatureCollection {
    let mut features = Vec::new();
    let popup = if opts.include_metadata {
        tour_popup(tour)
    } else {
        Map::new()
    };

    if opts.should_include(GpxElementType::Track) {
        for track in &tour.tracks {
            for segment in track.segments.iter().filter(|s| s.points.len() >= 2) {
                let mut props = line_props(tour, GpxElementType::Track, color, &popup);
                if opts.include_metadata && !track.name.is_empty() {
                    props.insert("name".to_string(), JsonValue::String(track.name.clone()));
                }
                if opts.include_time {
                    insert_coordinate_times(&mut props, &segment.points);
                }
                features.push(line_feature(segment_coords(segment, opts), props));
            }
        }
    }

    if opts.should_include(GpxElementType::Route) {
        for route in tour.routes.iter().filter(|r| r.points.len() >= 2) {
            features.push(route_to_feature(tour, route, color, &popup, opts));
        }
    }

    if opts.should_include(GpxElementType::Waypoint) {
        for wpt in &tour.waypoints {
            features.push(waypoint_to_feature(tour, wpt, color, opts));
        }
    }

    FeatureCollection {
        bbox: tour.stats.bounding_box.map(|b| b.to_bbox()),
        features,
        foreign_members: None,
    }
}

fn route_to_feature(
    tour: &Tour,
    route: &Route,
    color: &str,
    popup: &Map<String, JsonValue>,
    opts: &OverlayOptions,
) -> Feature {
    let coords: Vec<Vec<f64>> = route
        .points
        .iter()
        .map(|rp| point_coords(&rp.point, opts.include_elevation))
        .collect();

    let mut props = line_props(tour, GpxElementType::Route, color, popup);
    props.insert(
        "dashArray".to_string(),
        JsonValue::String(ROUTE_DASH_ARRAY.to_string()),
    );
    if opts.include_metadata && !route.name.is_empty() {
        props.insert("name".to_string(), JsonValue::String(route.name.clone()));
    }

    line_feature(coords, props)
}

fn waypoint_to_feature(tour: &Tour, wpt: &Waypoint, color: &str, opts: &OverlayOptions) -> Feature {
    let geometry = Geometry::new(Value::Point(point_coords(&wpt.point, opts.include_elevation)));

    let mut props = Map::new();
    insert_identity(&mut props, tour, GpxElementType::Waypoint);
    props.insert("radius".to_string(), WAYPOINT_RADIUS.into());
    props.insert("fillColor".to_string(), JsonValue::String(color.to_string()));
    props.insert("color".to_string(), JsonValue::String(WAYPOINT_OUTLINE.to_string()));
    props.insert("weight".to_string(), 2.into());
    props.insert("opacity".to_string(), number(1.0));
    props.insert("fillOpacity".to_string(), number(LINE_OPACITY));

    if opts.include_metadata {
        let name = if wpt.name.is_empty() { "Waypoint" } else { &wpt.name };
        props.insert("name".to_string(), JsonValue::String(name.to_string()));
        if !wpt.description.is_empty() {
            props.insert(
                "description".to_string(),
                JsonValue::String(wpt.description.clone()),
            );
        }
        if let Some(ele) = wpt.point.elevation {
            props.insert("ele".to_string(), number(ele));
            props.insert("elevation".to_string(), JsonValue::String(format_elevation(ele)));
        }
    }

    Feature {
        bbox: None,
        geometry: Some(geometry),
        id: None,
        properties: Some(props),
        foreign_members: None,
    }
}

fn line_feature(coords: Vec<Vec<f64>>, props: Map<String, JsonValue>) -> Feature {
    Feature {
        bbox: None,
        geometry: Some(Geometry::new(Value::LineString(coords))),
        id: None,
        properties: Some(props),
        foreign_members: None,
    }
}

fn line_props(
    tour: &Tour,
    gpx_type: GpxElementType,
    color: &str,
    popup: &Map<String, JsonValue>,
) -> Map<String, JsonValue> {
    let mut props = Map::new();
    insert_identity(&mut props, tour, gpx_type);
    props.insert("color".to_string(), JsonValue::String(color.to_string()));
    props.insert("weight".to_string(), LINE_WEIGHT.into());
    props.insert("opacity".to_string(), number(LINE_OPACITY));
    props.extend(popup.iter().map(|(k, v)| (k.clone(), v.clone())));
    props
}

fn insert_identity(props: &mut Map<String, JsonValue>, tour: &Tour, gpx_type: GpxElementType) {
    props.insert("sourceId".to_string(), JsonValue::String(tour.source_id.clone()));
    props.insert(
        "gpxType".to_string(),
        JsonValue::String(gpx_type.as_str().to_string()),
    );
}

/// Popup content shared by every line of a tour, as data rather than markup.
fn tour_popup(tour: &Tour) -> Map<String, JsonValue> {
    let stats = &tour.stats;
    let mut popup = Map::new();
    popup.insert("tourName".to_string(), JsonValue::String(tour.name.clone()));
    if !tour.description.is_empty() {
        popup.insert(
            "tourDescription".to_string(),
            JsonValue::String(tour.description.clone()),
        );
    }
    popup.insert(
        "distance".to_string(),
        JsonValue::String(format_distance(stats.total_distance_km)),
    );
    if let Some(range) = format_elevation_range(&stats.elevation) {
        popup.insert("elevationRange".to_string(), JsonValue::String(range));
    }
    if stats.elevation.gain > 0.0 {
        popup.insert(
            "elevationGain".to_string(),
            JsonValue::String(format_elevation(stats.elevation.gain)),
        );
    }
    if let Some(duration) = stats.time.duration.filter(|d| !d.is_zero()) {
        popup.insert(
            "duration".to_string(),
            JsonValue::String(format_duration(duration)),
        );
    }
    popup.insert("statsLine".to_string(), JsonValue::String(tour_stats_line(tour)));
    popup
}

fn segment_coords(segment: &Segment, opts: &OverlayOptions) -> Vec<Vec<f64>> {
    segment
        .points
        .iter()
        .map(|pt| point_coords(pt, opts.include_elevation))
        .collect()
}

/// Build [lon, lat] or [lon, lat, ele] coordinate array.
fn point_coords(pt: &Point, include_elevation: bool) -> Vec<f64> {
    match (include_elevation, pt.elevation) {
        (true, Some(ele)) => vec![pt.longitude, pt.latitude, ele],
        _ => vec![pt.longitude, pt.latitude],
    }
}

fn number(v: f64) -> JsonValue {
    serde_json::Number::from_f64(v).map_or(JsonValue::Null, JsonValue::Number)
}

fn insert_coordinate_times(props: &mut Map<String, JsonValue>, points: &[Point]) {
    let times: Vec<JsonValue> = points
        .iter()
        .map(|pt| match &pt.timestamp {
            Some(t) => JsonValue::String(t.to_rfc3339_opts(SecondsFormat::AutoSi, true)),
            None => JsonValue::Null,
        })
        .collect();

    // Only include if at least one time is present
    if times.iter().any(|t| !t.is_null()) {
        let mut coord_props = Map::new();
        coord_props.insert("times".to_string(), JsonValue::Array(times));
        props.insert(
            "coordinateProperties".to_string(),
            JsonValue::Object(coord_props),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_tour;

    const TOUR: &str = r#"<?xml version="1.0"?>
<gpx version="1.1">
  <metadata><name>Harbour loop</name><desc>Sunday ride</desc></metadata>
  <wpt lat="35.6762" lon="139.6503">
    <ele>40.4</ele>
    <name>Tokyo</name>
  </wpt>
  <wpt lat="35.5" lon="139.5"/>
  <rte>
    <name>Plan</name>
    <rtept lat="35.0" lon="139.0"/>
    <rtept lat="36.0" lon="140.0"/>
  </rte>
  <rte><rtept lat="35.0" lon="139.0"/></rte>
  <trk>
    <name>Run</name>
    <trkseg>
      <trkpt lat="35.0" lon="139.0"><ele>10</ele><time>2025-01-01T00:00:00Z</time></trkpt>
      <trkpt lat="35.001" lon="139.001"><ele>15</ele><time>2025-01-01T00:01:00Z</time></trkpt>
    </trkseg>
    <trkseg>
      <trkpt lat="36.0" lon="140.0"/>
    </trkseg>
  </trk>
</gpx>"#;

    fn feature_types(fc: &FeatureCollection) -> Vec<&str> {
        fc.features
            .iter()
            .map(|f| f.properties.as_ref().unwrap()["gpxType"].as_str().unwrap())
            .collect()
    }

    #[test]
    fn test_feature_order_and_filtering() {
        let tour = parse_tour(TOUR, "harbour.gpx").unwrap();
        let fc = tour_to_feature_collection(&tour, "#e74c3c", &OverlayOptions::default());
        // single-point segment and single-point route are not drawn
        assert_eq!(feature_types(&fc), vec!["track", "route", "waypoint", "waypoint"]);
    }

    #[test]
    fn test_track_line_properties() {
        let tour = parse_tour(TOUR, "harbour.gpx").unwrap();
        let fc = tour_to_feature_collection(&tour, "#e74c3c", &OverlayOptions::default());
        let f = &fc.features[0];

        if let Value::LineString(coords) = &f.geometry.as_ref().unwrap().value {
            assert_eq!(coords.len(), 2);
            assert_eq!(coords[0], vec![139.0, 35.0, 10.0]);
        } else {
            panic!("Expected LineString");
        }

        let props = f.properties.as_ref().unwrap();
        assert_eq!(props["sourceId"], "harbour.gpx");
        assert_eq!(props["color"], "#e74c3c");
        assert_eq!(props["weight"], 3);
        assert_eq!(props["opacity"], 0.8);
        assert_eq!(props["name"], "Run");
        assert_eq!(props["tourName"], "Harbour loop");
        assert_eq!(props["tourDescription"], "Sunday ride");
        assert_eq!(props["elevationRange"], "10m - 15m");
        assert_eq!(props["elevationGain"], "5m");
        assert_eq!(props["duration"], "1m");
        let times = props["coordinateProperties"]["times"].as_array().unwrap();
        assert_eq!(times[1], "2025-01-01T00:01:00Z");
    }

    #[test]
    fn test_route_is_dashed() {
        let tour = parse_tour(TOUR, "harbour.gpx").unwrap();
        let fc = tour_to_feature_collection(&tour, "#123456", &OverlayOptions::default());
        let props = fc.features[1].properties.as_ref().unwrap();
        assert_eq!(props["dashArray"], "5, 5");
        assert_eq!(props["name"], "Plan");
        assert!(props.get("coordinateProperties").is_none());
    }

    #[test]
    fn test_waypoint_markers() {
        let tour = parse_tour(TOUR, "harbour.gpx").unwrap();
        let fc = tour_to_feature_collection(&tour, "#123456", &OverlayOptions::default());

        let named = fc.features[2].properties.as_ref().unwrap();
        assert_eq!(named["name"], "Tokyo");
        assert_eq!(named["fillColor"], "#123456");
        assert_eq!(named["color"], "#fff");
        assert_eq!(named["ele"], 40.4);
        assert_eq!(named["elevation"], "40m");

        let unnamed = fc.features[3].properties.as_ref().unwrap();
        assert_eq!(unnamed["name"], "Waypoint");
        assert!(unnamed.get("ele").is_none());
    }

    #[test]
    fn test_collection_bbox() {
        let tour = parse_tour(TOUR, "harbour.gpx").unwrap();
        let fc = tour_to_feature_collection(&tour, "#000", &OverlayOptions::default());
        // Waypoints do not widen the tour bounds.
        assert_eq!(fc.bbox, Some(vec![139.0, 35.0, 140.0, 36.0]));
    }

    #[test]
    fn test_no_elevation_no_metadata() {
        let tour = parse_tour(TOUR, "harbour.gpx").unwrap();
        let opts = OverlayOptions {
            include_elevation: false,
            include_metadata: false,
            include_time: false,
            ..Default::default()
        };
        let fc = tour_to_feature_collection(&tour, "#000", &opts);
        let f = &fc.features[0];
        if let Value::LineString(coords) = &f.geometry.as_ref().unwrap().value {
            assert_eq!(coords[0].len(), 2);
        }
        let props = f.properties.as_ref().unwrap();
        assert!(props.get("tourName").is_none());
        assert!(props.get("name").is_none());
        assert!(props.get("coordinateProperties").is_none());
        assert_eq!(props["gpxType"], "track");
    }

    #[test]
    fn test_type_filter() {
        let tour = parse_tour(TOUR, "harbour.gpx").unwrap();
        let opts = OverlayOptions {
            types: Some(vec![GpxElementType::Waypoint]),
            ..Default::default()
        };
        let fc = tour_to_feature_collection(&tour, "#000", &opts);
        assert_eq!(feature_types(&fc), vec!["waypoint", "waypoint"]);
    }

    #[test]
    fn test_empty_tour() {
        let tour = parse_tour(r#"<gpx version="1.1"></gpx>"#, "empty.gpx").unwrap();
        let fc = tour_to_feature_collection(&tour, "#000", &OverlayOptions::default());
        assert!(fc.features.is_empty());
        assert!(fc.bbox.is_none());
    }
}
