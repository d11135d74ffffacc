//! Import of floor-plan analysis results.
//!
//! The analysis service reports candidate rectangles as percentages
//! (0-100) of the analysed image, each with a confidence score (0-100).
//! This module turns them into layout elements (pixel space) or position
//! records (millimetres).

use async_trait::async_trait;
use floorkit_core::units::{percent_to_pixels, to_millimeters};
use floorkit_core::{AnalysisError, Scale};
use serde::{Deserialize, Serialize};

use crate::layout_store::LayoutStore;
use crate::model::{positive_dimension, Element, ElementKind, ElementStatus};
use crate::reconciliation::PositionRecord;

/// One detected rectangle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisCandidate {
    pub position_number: String,
    /// Left edge, percent of image width
    pub x: f64,
    /// Top edge, percent of image height
    pub y: f64,
    pub width: f64,
    pub height: f64,
    #[serde(default)]
    pub status: ElementStatus,
    pub confidence: f64,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub candidates: Vec<AnalysisCandidate>,
    pub overall_confidence: f64,
}

impl AnalysisResult {
    /// Candidates at or above `min_confidence`
    pub fn accepted(&self, min_confidence: f64) -> impl Iterator<Item = &AnalysisCandidate> {
        self.candidates
            .iter()
            .filter(move |c| c.confidence >= min_confidence)
    }
}

/// Opaque producer of analysis results
#[async_trait]
pub trait FloorplanAnalyzer: Send + Sync {
    async fn analyze(&self, image: &[u8]) -> Result<AnalysisResult, AnalysisError>;
}

fn clamp_percent(value: f64) -> f64 {
    if value.is_finite() {
        value.clamp(0.0, 100.0)
    } else {
        0.0
    }
}

/// Pixel-space elements for accepted candidates on a layout of the given
/// boundary.
pub fn candidates_to_elements(
    result: &AnalysisResult,
    boundary_width: f64,
    boundary_height: f64,
    min_confidence: f64,
) -> Vec<Element> {
    result
        .accepted(min_confidence)
        .map(|c| {
            Element::new(
                ElementKind::default(),
                c.position_number.clone(),
                percent_to_pixels(clamp_percent(c.x), boundary_width),
                percent_to_pixels(clamp_percent(c.y), boundary_height),
                positive_dimension(percent_to_pixels(clamp_percent(c.width), boundary_width)),
                positive_dimension(percent_to_pixels(clamp_percent(c.height), boundary_height)),
            )
            .with_status(c.status)
        })
        .collect()
}

/// Position records for accepted candidates on an image of the given size
/// in millimetres.
pub fn candidates_to_positions(
    result: &AnalysisResult,
    store_id: &str,
    image_width_mm: f64,
    image_height_mm: f64,
    min_confidence: f64,
) -> Vec<PositionRecord> {
    result
        .accepted(min_confidence)
        .map(|c| PositionRecord {
            store_id: store_id.to_string(),
            position_number: c.position_number.clone(),
            x: percent_to_pixels(clamp_percent(c.x), image_width_mm),
            y: percent_to_pixels(clamp_percent(c.y), image_height_mm),
            width: percent_to_pixels(clamp_percent(c.width), image_width_mm),
            height: percent_to_pixels(clamp_percent(c.height), image_height_mm),
            status: c.status,
            tenant: None,
            expiry_date: None,
            format: None,
            display_type: None,
            department: None,
            category: None,
        })
        .collect()
}

/// Run the analyzer and add its accepted candidates to the active layout as
/// one undoable step.
pub async fn import_analysis<A: FloorplanAnalyzer + ?Sized>(
    analyzer: &A,
    image: &[u8],
    store: &mut LayoutStore,
    min_confidence: f64,
) -> Result<usize, AnalysisError> {
    let result = analyzer.analyze(image).await?;
    let layout = store.layout();
    let elements = candidates_to_elements(
        &result,
        layout.boundary_width,
        layout.boundary_height,
        min_confidence,
    );
    if elements.is_empty() {
        return Err(AnalysisError::NoCandidates { min_confidence });
    }
    let count = elements.len();
    tracing::info!(
        "Imported {} of {} analysed positions (overall confidence {:.0}%)",
        count,
        result.candidates.len(),
        result.overall_confidence
    );
    store.add_elements(elements);
    Ok(count)
}

/// Millimetre size of a layout boundary at the given scale
pub fn boundary_in_millimeters(width_px: f64, height_px: f64, scale: Scale) -> (f64, f64) {
    (to_millimeters(width_px, scale), to_millimeters(height_px, scale))
}
