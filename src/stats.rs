//! Trip statistics: distance, elevation profile, time span and bounds.
//!
//! Distance and gain/loss only follow consecutive points inside one track
//! segment. Bounds and elevation min/max look at every track and route point.
//! Waypoints take part in neither.

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Serialize, Serializer};

use crate::tour::{Point, Route, Track};

/// Mean Earth radius used by the haversine formula, in kilometers.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Great-circle distance between two points in kilometers.
pub fn haversine_km(a: &Point, b: &Point) -> f64 {
    haversine_distance(a.latitude, a.longitude, b.latitude, b.longitude)
}

pub fn haversine_distance(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let dlat = (lat2 - lat1).to_radians();
    let dlon = (lon2 - lon1).to_radians();
    let a = (dlat / 2.0).sin().powi(2)
        + lat1.to_radians().cos() * lat2.to_radians().cos() * (dlon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
    EARTH_RADIUS_KM * c
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BoundingBox {
    pub north: f64,
    pub south: f64,
    pub east: f64,
    pub west: f64,
}

impl BoundingBox {
    pub fn around(point: &Point) -> Self {
        Self {
            north: point.latitude,
            south: point.latitude,
            east: point.longitude,
            west: point.longitude,
        }
    }

    pub fn extend(&mut self, point: &Point) {
        self.north = self.north.max(point.latitude);
        self.south = self.south.min(point.latitude);
        self.east = self.east.max(point.longitude);
        self.west = self.west.min(point.longitude);
    }

    pub fn union(self, other: BoundingBox) -> Self {
        Self {
            north: self.north.max(other.north),
            south: self.south.min(other.south),
            east: self.east.max(other.east),
            west: self.west.min(other.west),
        }
    }

    pub fn contains(&self, latitude: f64, longitude: f64) -> bool {
        (self.south..=self.north).contains(&latitude) && (self.west..=self.east).contains(&longitude)
    }

    /// GeoJSON ordering: `[west, south, east, north]`.
    pub fn to_bbox(&self) -> Vec<f64> {
        vec![self.west, self.south, self.east, self.north]
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct ElevationStats {
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub gain: f64,
    pub loss: f64,
}

impl ElevationStats {
    fn observe(&mut self, elevation: Option<f64>) {
        if let Some(ele) = elevation {
            self.min = Some(self.min.map_or(ele, |m| m.min(ele)));
            self.max = Some(self.max.map_or(ele, |m| m.max(ele)));
        }
    }

    fn climb(&mut self, delta: f64) {
        if delta > 0.0 {
            self.gain += delta;
        } else {
            self.loss += delta.abs();
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct TimeSpan {
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
    /// Serialized as whole milliseconds.
    #[serde(serialize_with = "serialize_millis")]
    pub duration: Option<TimeDelta>,
}

impl TimeSpan {
    fn observe(&mut self, timestamp: Option<DateTime<Utc>>) {
        if let Some(ts) = timestamp {
            self.start = Some(self.start.map_or(ts, |s| s.min(ts)));
            self.end = Some(self.end.map_or(ts, |e| e.max(ts)));
        }
    }

    fn close(&mut self) {
        self.duration = match (self.start, self.end) {
            (Some(start), Some(end)) => Some(end - start),
            _ => None,
        };
    }
}

fn serialize_millis<S: Serializer>(
    duration: &Option<TimeDelta>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    match duration {
        Some(d) => serializer.serialize_some(&d.num_milliseconds()),
        None => serializer.serialize_none(),
    }
}

/// Derived statistics of a tour.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TourStats {
    pub bounding_box: Option<BoundingBox>,
    pub total_distance_km: f64,
    pub elevation: ElevationStats,
    pub time: TimeSpan,
}

impl TourStats {
    pub fn compute(tracks: &[Track], routes: &[Route]) -> Self {
        let mut stats = TourStats::default();

        for segment in tracks.iter().flat_map(|t| &t.segments) {
            for point in &segment.points {
                stats.include_in_bounds(point);
                stats.elevation.observe(point.elevation);
                stats.time.observe(point.timestamp);
            }
            for pair in segment.points.windows(2) {
                stats.total_distance_km += haversine_km(&pair[0], &pair[1]);
                if let (Some(prev), Some(next)) = (pair[0].elevation, pair[1].elevation) {
                    stats.elevation.climb(next - prev);
                }
            }
        }

        for point in routes.iter().flat_map(|r| &r.points).map(|rp| &rp.point) {
            stats.include_in_bounds(point);
            stats.elevation.observe(point.elevation);
        }

        stats.time.close();
        stats
    }

    fn include_in_bounds(&mut self, point: &Point) {
        match &mut self.bounding_box {
            Some(bbox) => bbox.extend(point),
            None => self.bounding_box = Some(BoundingBox::around(point)),
        }
    }
}
