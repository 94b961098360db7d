//! The parsed, statistics-carrying representation of one GPX document.

use chrono::{DateTime, Utc};
use log::debug;
use serde::Serialize;

use crate::gpx_types::{GpxDocument, GpxPoint, GpxRoute, GpxTrack};
use crate::stats::TourStats;

/// A single geodetic sample.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Point {
    pub latitude: f64,
    pub longitude: f64,
    pub elevation: Option<f64>,
    pub timestamp: Option<DateTime<Utc>>,
}

impl Point {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
            elevation: None,
            timestamp: None,
        }
    }

    pub fn with_elevation(mut self, elevation: f64) -> Self {
        self.elevation = Some(elevation);
        self
    }

    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = Some(timestamp);
        self
    }
}

/// A contiguous run of recorded points. Never empty once part of a [`Track`].
#[derive(Debug, Clone, Default, Serialize)]
pub struct Segment {
    pub points: Vec<Point>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct Track {
    pub name: String,
    pub segments: Vec<Segment>,
}

impl Track {
    fn from_gpx(track: GpxTrack) -> Option<Self> {
        if track.segments.is_empty() {
            debug!("dropping track {:?} without points", track.name);
            return None;
        }
        Some(Self {
            name: track.name.unwrap_or_default(),
            segments: track
                .segments
                .into_iter()
                .map(|seg| Segment { points: seg.points })
                .collect(),
        })
    }
}

/// A route point: a [`Point`] plus its own label.
#[derive(Debug, Clone, Serialize)]
pub struct RoutePoint {
    #[serde(flatten)]
    pub point: Point,
    pub name: String,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct Route {
    pub name: String,
    pub points: Vec<RoutePoint>,
}

impl Route {
    fn from_gpx(route: GpxRoute) -> Option<Self> {
        if route.points.is_empty() {
            debug!("dropping route {:?} without points", route.name);
            return None;
        }
        Some(Self {
            name: route.name.unwrap_or_default(),
            points: route
                .points
                .into_iter()
                .map(|pt| RoutePoint {
                    point: pt.point,
                    name: pt.name.unwrap_or_default(),
                })
                .collect(),
        })
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Waypoint {
    #[serde(flatten)]
    pub point: Point,
    pub name: String,
    pub description: String,
}

impl From<GpxPoint> for Waypoint {
    fn from(pt: GpxPoint) -> Self {
        Self {
            point: pt.point,
            name: pt.name.unwrap_or_default(),
            description: pt.desc.unwrap_or_default(),
        }
    }
}

/// Everything read from one document, plus its derived statistics.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Tour {
    pub source_id: String,
    pub name: String,
    pub description: String,
    pub tracks: Vec<Track>,
    pub routes: Vec<Route>,
    pub waypoints: Vec<Waypoint>,
    #[serde(flatten)]
    pub stats: TourStats,
}

impl Tour {
    /// Build a tour from a parsed document: resolve its name and description,
    /// drop tracks and routes without points and compute statistics.
    pub fn from_document(doc: GpxDocument, source_id: &str) -> Self {
        let name = resolve_name(&doc, source_id);
        let description = resolve_description(&doc);

        let tracks: Vec<Track> = doc.tracks.into_iter().filter_map(Track::from_gpx).collect();
        let routes: Vec<Route> = doc.routes.into_iter().filter_map(Route::from_gpx).collect();
        let waypoints = doc.waypoints.into_iter().map(Waypoint::from).collect();
        let stats = TourStats::compute(&tracks, &routes);

        Self {
            source_id: source_id.to_string(),
            name,
            description,
            tracks,
            routes,
            waypoints,
            stats,
        }
    }

    /// Refresh `stats` after tracks or routes were edited in place.
    pub fn recompute_stats(&mut self) {
        self.stats = TourStats::compute(&self.tracks, &self.routes);
    }

    pub fn point_count(&self) -> usize {
        let track_points: usize = self
            .tracks
            .iter()
            .flat_map(|t| &t.segments)
            .map(|s| s.points.len())
            .sum();
        let route_points: usize = self.routes.iter().map(|r| r.points.len()).sum();
        track_points + route_points
    }
}

fn first_non_empty<'a>(candidates: impl IntoIterator<Item = Option<&'a str>>) -> Option<&'a str> {
    candidates
        .into_iter()
        .flatten()
        .map(str::trim)
        .find(|s| !s.is_empty())
}

/// Document title, then the first named track, then the first named route,
/// then the source id without its extension.
pub fn resolve_name(doc: &GpxDocument, source_id: &str) -> String {
    first_non_empty(
        std::iter::once(doc.metadata.name.as_deref())
            .chain(doc.tracks.iter().map(|t| t.name.as_deref()))
            .chain(doc.routes.iter().map(|r| r.name.as_deref())),
    )
    .unwrap_or_else(|| strip_extension(source_id))
    .to_string()
}

pub fn resolve_description(doc: &GpxDocument) -> String {
    first_non_empty(
        std::iter::once(doc.metadata.desc.as_deref())
            .chain(doc.tracks.iter().map(|t| t.desc.as_deref()))
            .chain(doc.routes.iter().map(|r| r.desc.as_deref())),
    )
    .unwrap_or_default()
    .to_string()
}

/// Strip a trailing `.ext` (non-empty, no path separator) from an identifier.
pub fn strip_extension(source_id: &str) -> &str {
    match source_id.rsplit_once('.') {
        Some((stem, ext)) if !ext.is_empty() && !ext.contains('/') => stem,
        _ => source_id,
    }
}
