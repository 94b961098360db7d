//! Display strings for sidebars and popups.

use chrono::TimeDelta;

use crate::stats::ElevationStats;
use crate::tour::Tour;

/// `"850 m"` below one kilometer, `"12.3 km"` above.
pub fn format_distance(km: f64) -> String {
    if km < 1.0 {
        format!("{} m", (km * 1000.0).round() as i64)
    } else {
        format!("{} km", to_fixed(km, 1))
    }
}

/// `"2h 5m"`, or `"45m"` under an hour. A zero duration formats as `""`.
pub fn format_duration(duration: TimeDelta) -> String {
    if duration.is_zero() {
        return String::new();
    }
    let hours = duration.num_hours();
    let minutes = duration.num_minutes() % 60;
    if hours > 0 {
        format!("{hours}h {minutes}m")
    } else {
        format!("{minutes}m")
    }
}

pub fn format_elevation(meters: f64) -> String {
    format!("{}m", to_fixed(meters, 0))
}

/// Fixed-point text with ties rounded away from zero, unlike `{:.N}` which
/// rounds them to even.
fn to_fixed(value: f64, digits: usize) -> String {
    let scale = 10f64.powi(digits as i32);
    let rounded = (value * scale).round() / scale;
    format!("{rounded:.digits$}")
}

pub fn format_elevation_range(elevation: &ElevationStats) -> Option<String> {
    match (elevation.min, elevation.max) {
        (Some(min), Some(max)) => Some(format!(
            "{} - {}",
            format_elevation(min),
            format_elevation(max)
        )),
        _ => None,
    }
}

/// One-line summary: distance, then duration and climb when there is any.
pub fn tour_stats_line(tour: &Tour) -> String {
    let stats = &tour.stats;
    let mut parts = vec![format_distance(stats.total_distance_km)];
    if let Some(duration) = stats.time.duration.filter(|d| !d.is_zero()) {
        parts.push(format!("• {}", format_duration(duration)));
    }
    if stats.elevation.gain > 0.0 {
        parts.push(format!("• ↗{}", format_elevation(stats.elevation.gain)));
    }
    parts.join(" ")
}
