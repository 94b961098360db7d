use serde::Deserialize;

/// Options for exporting a tour as map overlay GeoJSON.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OverlayOptions {
    /// Include elevation as the 3rd coordinate value (default: true)
    #[serde(default = "default_true")]
    pub include_elevation: bool,

    /// Include timestamps in coordinateProperties.times on track lines (default: true)
    #[serde(default = "default_true")]
    pub include_time: bool,

    /// Include tour name, stats and popup fields in properties (default: true)
    #[serde(default = "default_true")]
    pub include_metadata: bool,

    /// Which element types become features (default: all)
    #[serde(default)]
    pub types: Option<Vec<GpxElementType>>,
}

impl Default for OverlayOptions {
    fn default() -> Self {
        Self {
            include_elevation: true,
            include_time: true,
            include_metadata: true,
            types: None,
        }
    }
}

impl OverlayOptions {
    pub fn should_include(&self, element_type: GpxElementType) -> bool {
        match &self.types {
            None => true,
            Some(types) => types.contains(&element_type),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GpxElementType {
    Waypoint,
    Route,
    Track,
}

impl GpxElementType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Waypoint => "waypoint",
            Self::Route => "route",
            Self::Track => "track",
        }
    }
}

fn default_true() -> bool {
    true
}
