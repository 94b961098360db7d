use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::error::TourError;
use crate::parser::parse_tour;
use crate::tour::Tour;

/// Raw text of one document and the identifier it was submitted under.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceDocument {
    pub source_id: String,
    pub text: String,
}

impl SourceDocument {
    pub fn new(source_id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            source_id: source_id.into(),
            text: text.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchFailure {
    pub source_id: String,
    pub reason: String,
}

impl From<TourError> for BatchFailure {
    fn from(e: TourError) -> Self {
        Self {
            source_id: e.source_id().to_string(),
            reason: e.reason(),
        }
    }
}

/// Outcome of a batch: successful tours and failures, each in submission order.
#[derive(Debug, Clone, Default, Serialize)]
pub struct BatchReport {
    pub tours: Vec<Tour>,
    pub failures: Vec<BatchFailure>,
}

impl BatchReport {
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn failure_message(&self) -> Option<String> {
        if self.failures.is_empty() {
            return None;
        }
        let details: Vec<String> = self
            .failures
            .iter()
            .map(|f| format!("{}: {}", f.source_id, f.reason))
            .collect();
        Some(format!(
            "Failed to parse {} file(s): {}",
            self.failures.len(),
            details.join("; ")
        ))
    }
}

/// Parse every document independently and collect all outcomes.
///
/// A malformed document only produces a failure entry; it never stops the
/// other documents from being parsed.
pub fn parse_batch(documents: &[SourceDocument]) -> BatchReport {
    let mut report = BatchReport::default();

    for outcome in run_pipelines(documents) {
        match outcome {
            Ok(tour) => report.tours.push(tour),
            Err(e) => {
                warn!("failed to parse {}", e);
                report.failures.push(e.into());
            }
        }
    }

    info!(
        "parsed {} document(s): {} tour(s), {} failure(s)",
        documents.len(),
        report.tours.len(),
        report.failures.len()
    );
    report
}

#[cfg(feature = "parallel")]
fn run_pipelines(documents: &[SourceDocument]) -> Vec<Result<Tour, TourError>> {
    use rayon::prelude::*;

    documents
        .par_iter()
        .map(|doc| parse_tour(&doc.text, &doc.source_id))
        .collect()
}

#[cfg(not(feature = "parallel"))]
fn run_pipelines(documents: &[SourceDocument]) -> Vec<Result<Tour, TourError>> {
    documents
        .iter()
        .map(|doc| parse_tour(&doc.text, &doc.source_id))
        .collect()
}
