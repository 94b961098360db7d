use crate::tour::Point;

/// Raw contents of a `<gpx>` document, in document order.
///
/// Points that failed coordinate parsing and segments left without points are
/// already gone; tracks and routes are kept even when empty so that name and
/// description lookup sees every candidate.
#[derive(Debug, Default)]
pub struct GpxDocument {
    pub metadata: GpxMetadata,
    pub waypoints: Vec<GpxWaypoint>,
    pub routes: Vec<GpxRoute>,
    pub tracks: Vec<GpxTrack>,
}

/// Document-level `<metadata>`.
#[derive(Debug, Default)]
pub struct GpxMetadata {
    pub name: Option<String>,
    pub desc: Option<String>,
}

/// A point element (`wpt`, `rtept`, `trkpt`) with its descriptive children.
#[derive(Debug, Clone)]
pub struct GpxPoint {
    pub point: Point,
    pub name: Option<String>,
    pub desc: Option<String>,
}

impl GpxPoint {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self {
            point: Point::new(lat, lon),
            name: None,
            desc: None,
        }
    }
}

pub type GpxWaypoint = GpxPoint;

/// A GPX route (<rte>).
#[derive(Debug, Default)]
pub struct GpxRoute {
    pub name: Option<String>,
    pub desc: Option<String>,
    pub points: Vec<GpxPoint>,
}

/// A GPX track (<trk>).
#[derive(Debug, Default)]
pub struct GpxTrack {
    pub name: Option<String>,
    pub desc: Option<String>,
    pub segments: Vec<GpxSegment>,
}

/// A GPX track segment (<trkseg>).
#[derive(Debug, Default)]
pub struct GpxSegment {
    pub points: Vec<Point>,
}
