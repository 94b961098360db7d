//! Per-viewer state: loaded tours, their colors and visibility.

use log::debug;
use serde::{Deserialize, Serialize};

use crate::batch::{parse_batch, BatchReport, SourceDocument};
use crate::error::SessionError;
use crate::stats::BoundingBox;
use crate::tour::Tour;

pub const DEFAULT_PALETTE: [&str; 20] = [
    "#e74c3c", "#c0392b", "#a93226", "#922b21", "#7b241c", "#ff5733", "#ff4757", "#ff3838",
    "#ff2f2f", "#e55039", "#ff6b6b", "#ee5a52", "#ff4757", "#ff3742", "#ff2e63", "#d63031",
    "#b33939", "#a55eea", "#fd79a8", "#e84393",
];

/// Session settings, usually handed over from JS as a plain object.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionConfig {
    /// Colors assigned to tours round-robin, in load order.
    #[serde(default = "default_palette")]
    pub palette: Vec<String>,

    /// File extensions accepted by [`Session::load`], compared case-insensitively.
    #[serde(default = "default_extensions")]
    pub accepted_extensions: Vec<String>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            palette: default_palette(),
            accepted_extensions: default_extensions(),
        }
    }
}

impl SessionConfig {
    pub fn accepts(&self, source_id: &str) -> bool {
        source_id.rsplit_once('.').is_some_and(|(_, ext)| {
            self.accepted_extensions
                .iter()
                .any(|accepted| accepted.eq_ignore_ascii_case(ext))
        })
    }
}

fn default_palette() -> Vec<String> {
    DEFAULT_PALETTE.iter().map(|c| c.to_string()).collect()
}

fn default_extensions() -> Vec<String> {
    vec!["gpx".to_string()]
}

#[derive(Debug, Clone)]
pub struct SessionEntry {
    pub tour: Tour,
    pub color: String,
    pub visible: bool,
}

/// Aggregates over the session, as shown in the sidebar header.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionTotals {
    pub total_tours: usize,
    pub active_tours: usize,
    pub visible_distance_km: f64,
}

#[derive(Debug)]
pub struct Session {
    config: SessionConfig,
    entries: Vec<SessionEntry>,
    color_index: usize,
}

impl Default for Session {
    fn default() -> Self {
        Self::new(SessionConfig::default())
    }
}

impl Session {
    pub fn new(mut config: SessionConfig) -> Self {
        if config.palette.is_empty() {
            config.palette = default_palette();
        }
        Self {
            config,
            entries: Vec::new(),
            color_index: 0,
        }
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Parse the accepted documents and add every successful tour.
    ///
    /// Documents whose source id lacks an accepted extension are skipped; if
    /// none is left the whole call fails.
    pub fn load(&mut self, documents: Vec<SourceDocument>) -> Result<BatchReport, SessionError> {
        let (accepted, skipped): (Vec<_>, Vec<_>) = documents
            .into_iter()
            .partition(|doc| self.config.accepts(&doc.source_id));
        for doc in &skipped {
            debug!("skipping {}: extension not accepted", doc.source_id);
        }
        if accepted.is_empty() {
            return Err(SessionError::NoAcceptedDocuments);
        }

        let report = parse_batch(&accepted);
        for tour in &report.tours {
            self.add(tour.clone());
        }
        Ok(report)
    }

    /// Add a tour and return its color. Reloading a known source id replaces
    /// the tour but keeps color and visibility.
    pub fn add(&mut self, tour: Tour) -> &str {
        if let Some(pos) = self.position(&tour.source_id) {
            let entry = &mut self.entries[pos];
            entry.tour = tour;
            return &entry.color;
        }

        let color = self.config.palette[self.color_index % self.config.palette.len()].clone();
        self.color_index += 1;
        self.entries.push(SessionEntry {
            tour,
            color,
            visible: true,
        });
        &self.entries[self.entries.len() - 1].color
    }

    fn position(&self, source_id: &str) -> Option<usize> {
        self.entries.iter().position(|e| e.tour.source_id == source_id)
    }

    pub fn entry(&self, source_id: &str) -> Option<&SessionEntry> {
        self.position(source_id).map(|pos| &self.entries[pos])
    }

    pub fn entries(&self) -> &[SessionEntry] {
        &self.entries
    }

    pub fn tour(&self, source_id: &str) -> Option<&Tour> {
        self.entry(source_id).map(|e| &e.tour)
    }

    pub fn tours(&self) -> impl Iterator<Item = &Tour> {
        self.entries.iter().map(|e| &e.tour)
    }

    pub fn color_of(&self, source_id: &str) -> Option<&str> {
        self.entry(source_id).map(|e| e.color.as_str())
    }

    pub fn is_visible(&self, source_id: &str) -> bool {
        self.entry(source_id).is_some_and(|e| e.visible)
    }

    /// Returns false when no tour has this source id.
    pub fn set_visible(&mut self, source_id: &str, visible: bool) -> bool {
        match self.position(source_id) {
            Some(pos) => {
                self.entries[pos].visible = visible;
                true
            }
            None => false,
        }
    }

    pub fn remove(&mut self, source_id: &str) -> Option<Tour> {
        self.position(source_id).map(|pos| self.entries.remove(pos).tour)
    }

    /// Drop all tours and restart color assignment.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.color_index = 0;
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Bounds enclosing every loaded tour, visible or not.
    pub fn fit_bounds(&self) -> Option<BoundingBox> {
        self.tours()
            .filter_map(|t| t.stats.bounding_box)
            .reduce(BoundingBox::union)
    }

    pub fn totals(&self) -> SessionTotals {
        let visible: Vec<&SessionEntry> = self.entries.iter().filter(|e| e.visible).collect();
        SessionTotals {
            total_tours: self.entries.len(),
            active_tours: visible.len(),
            visible_distance_km: visible.iter().map(|e| e.tour.stats.total_distance_km).sum(),
        }
    }
}
