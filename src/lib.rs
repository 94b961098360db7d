pub mod batch;
pub mod error;
pub mod format;
pub mod gpx_types;
pub mod options;
pub mod overlay;
pub mod parser;
pub mod session;
pub mod stats;
pub mod tour;

use chrono::TimeDelta;
use serde::Serialize;
use wasm_bindgen::prelude::*;

use crate::batch::SourceDocument;
use crate::options::OverlayOptions;
use crate::session::{Session, SessionConfig};

pub use crate::batch::{parse_batch, BatchFailure, BatchReport};
pub use crate::error::{GpxError, SessionError, TourError};
pub use crate::parser::parse_tour;
pub use crate::stats::TourStats;
pub use crate::tour::Tour;

/// Parse one GPX document into a tour object with statistics.
#[wasm_bindgen(js_name = parseTour)]
pub fn parse_tour_js(gpx_string: &str, source_id: &str) -> Result<JsValue, JsValue> {
    console_error_panic_hook::set_once();

    let tour = parser::parse_tour(gpx_string, source_id)?;
    to_js(&tour)
}

/// Parse `[{sourceId, text}, ...]`, returning `{tours, failures}`.
#[wasm_bindgen(js_name = parseTours)]
pub fn parse_tours_js(documents: JsValue) -> Result<JsValue, JsValue> {
    console_error_panic_hook::set_once();

    let documents: Vec<SourceDocument> = from_js(documents)?;
    to_js(&batch::parse_batch(&documents))
}

/// Parse a GPX document and return its map overlay as a GeoJSON string.
#[wasm_bindgen(js_name = tourToGeoJson)]
pub fn tour_to_geojson(
    gpx_string: &str,
    source_id: &str,
    color: &str,
    options: JsValue,
) -> Result<String, JsValue> {
    console_error_panic_hook::set_once();

    let opts = parse_options(options)?;
    let tour = parser::parse_tour(gpx_string, source_id)?;
    let fc = overlay::tour_to_feature_collection(&tour, color, &opts);
    serde_json::to_string(&fc).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Format a distance given in kilometers.
#[wasm_bindgen(js_name = formatDistance)]
pub fn format_distance_js(km: f64) -> String {
    format::format_distance(km)
}

/// Format a duration given in milliseconds.
#[wasm_bindgen(js_name = formatDuration)]
pub fn format_duration_js(millis: f64) -> String {
    if !millis.is_finite() {
        return String::new();
    }
    TimeDelta::try_milliseconds(millis as i64)
        .map(format::format_duration)
        .unwrap_or_default()
}

/// Loaded tours with their colors and visibility, owned by the page.
#[wasm_bindgen]
pub struct TourSession {
    inner: Session,
}

#[wasm_bindgen]
impl TourSession {
    #[wasm_bindgen(constructor)]
    pub fn new(config: JsValue) -> Result<TourSession, JsValue> {
        console_error_panic_hook::set_once();

        let config: SessionConfig = if config.is_undefined() || config.is_null() {
            SessionConfig::default()
        } else {
            from_js(config)?
        };
        Ok(Self {
            inner: Session::new(config),
        })
    }

    /// Load `[{sourceId, text}, ...]`; returns the batch report.
    pub fn load(&mut self, documents: JsValue) -> Result<JsValue, JsValue> {
        let documents: Vec<SourceDocument> = from_js(documents)?;
        let report = self.inner.load(documents)?;
        to_js(&report)
    }

    /// Extensions `load` accepts, e.g. for a file input's `accept` attribute.
    #[wasm_bindgen(getter, js_name = acceptedExtensions)]
    pub fn accepted_extensions(&self) -> Vec<String> {
        self.inner.config().accepted_extensions.clone()
    }

    #[wasm_bindgen(js_name = setVisible)]
    pub fn set_visible(&mut self, source_id: &str, visible: bool) -> bool {
        self.inner.set_visible(source_id, visible)
    }

    #[wasm_bindgen(js_name = isVisible)]
    pub fn is_visible(&self, source_id: &str) -> bool {
        self.inner.is_visible(source_id)
    }

    #[wasm_bindgen(js_name = colorOf)]
    pub fn color_of(&self, source_id: &str) -> Option<String> {
        self.inner.color_of(source_id).map(str::to_string)
    }

    pub fn remove(&mut self, source_id: &str) -> bool {
        self.inner.remove(source_id).is_some()
    }

    pub fn clear(&mut self) {
        self.inner.clear();
    }

    pub fn totals(&self) -> Result<JsValue, JsValue> {
        to_js(&self.inner.totals())
    }

    /// `{north, south, east, west}` over every loaded tour, or `null`.
    #[wasm_bindgen(js_name = fitBounds)]
    pub fn fit_bounds(&self) -> Result<JsValue, JsValue> {
        to_js(&self.inner.fit_bounds())
    }

    /// Loaded tours in load order, each with its `color` and `visible` flag.
    pub fn tours(&self) -> Result<js_sys::Array, JsValue> {
        let out = js_sys::Array::new();
        for entry in self.inner.entries() {
            out.push(&to_js(&SessionTourView {
                tour: &entry.tour,
                color: &entry.color,
                visible: entry.visible,
            })?);
        }
        Ok(out)
    }

    /// Overlay GeoJSON for one loaded tour, drawn in its session color.
    #[wasm_bindgen(js_name = geoJson)]
    pub fn geo_json(&self, source_id: &str, options: JsValue) -> Result<Option<String>, JsValue> {
        let opts = parse_options(options)?;
        let Some(entry) = self.inner.entry(source_id) else {
            return Ok(None);
        };
        let fc = overlay::tour_to_feature_collection(&entry.tour, &entry.color, &opts);
        serde_json::to_string(&fc)
            .map(Some)
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }
}

#[derive(Serialize)]
struct SessionTourView<'a> {
    #[serde(flatten)]
    tour: &'a Tour,
    color: &'a str,
    visible: bool,
}

/// Serialize as plain JS objects (not `Map`s), with `null` for missing values.
fn to_js<T: Serialize + ?Sized>(value: &T) -> Result<JsValue, JsValue> {
    value
        .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
        .map_err(|e| JsValue::from_str(&e.to_string()))
}

fn from_js<T: serde::de::DeserializeOwned>(value: JsValue) -> Result<T, JsValue> {
    serde_wasm_bindgen::from_value(value).map_err(|e| JsValue::from_str(&e.to_string()))
}

fn parse_options(options: JsValue) -> Result<OverlayOptions, JsValue> {
    if options.is_undefined() || options.is_null() {
        Ok(OverlayOptions::default())
    } else {
        from_js(options)
    }
}
