use thiserror::Error;
use wasm_bindgen::JsValue;

/// Why a document could not be read as GPX markup.
#[derive(Debug, Error)]
pub enum GpxError {
    #[error("XML parse error: {0}")]
    Xml(#[from] quick_xml::Error),
    #[error("document has no root element")]
    MissingRoot,
    #[error("unexpected root element <{0}>, expected <gpx>")]
    InvalidRoot(String),
    #[error("element <{0}> is not closed before end of input")]
    UnclosedElement(String),
    #[error("content found outside the root element")]
    ContentOutsideRoot,
}

impl From<quick_xml::events::attributes::AttrError> for GpxError {
    fn from(e: quick_xml::events::attributes::AttrError) -> Self {
        Self::Xml(e.into())
    }
}

#[derive(Debug, Error)]
pub enum TourError {
    #[error("{source_id}: {reason}")]
    MalformedDocument {
        source_id: String,
        #[source]
        reason: GpxError,
    },
}

impl TourError {
    pub fn malformed(source_id: impl Into<String>, reason: GpxError) -> Self {
        Self::MalformedDocument {
            source_id: source_id.into(),
            reason,
        }
    }

    pub fn source_id(&self) -> &str {
        match self {
            Self::MalformedDocument { source_id, .. } => source_id,
        }
    }

    /// Human-readable reason, without the source id prefix.
    pub fn reason(&self) -> String {
        match self {
            Self::MalformedDocument { reason, .. } => reason.to_string(),
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("No GPX files selected. Please select files with .gpx extension.")]
    NoAcceptedDocuments,
}

impl From<TourError> for JsValue {
    fn from(e: TourError) -> Self {
        JsValue::from_str(&e.to_string())
    }
}

impl From<SessionError> for JsValue {
    fn from(e: SessionError) -> Self {
        JsValue::from_str(&e.to_string())
    }
}
