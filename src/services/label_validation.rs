//! Validation of image-based occupancy predictions against labelled images
//!
//! Labelled images are split into an occupied and a vacant folder. A labelled
//! occupied image missing from the occupied predictions is a false negative,
//! a labelled vacant image missing from the vacant predictions a false positive.

use chrono::NaiveDateTime;
use rustc_hash::FxHashSet;

/// One prediction row as written by the image classifier
#[derive(Debug, Clone, PartialEq)]
pub struct Prediction {
    pub timestamp: NaiveDateTime,
    pub occupied: u8,
    pub probability: Option<f64>,
}

/// Confusion counts for one hub
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConfusionSummary {
    pub fp: usize,
    pub tp: usize,
    pub fn_: usize,
    pub tn: usize,
}

impl ConfusionSummary {
    pub fn total(&self) -> usize {
        self.fp + self.tp + self.fn_ + self.tn
    }

    /// Fraction of labelled images classified correctly
    pub fn accuracy(&self) -> Option<f64> {
        let total = self.total();
        (total > 0).then(|| (self.tp + self.tn) as f64 / total as f64)
    }
}

/// Merged prediction / label row
#[derive(Debug, Clone, PartialEq)]
pub struct LabelRow {
    pub timestamp: NaiveDateTime,
    pub predicted: u8,
    pub probability: Option<f64>,
    pub actual: u8,
}

/// Result of validating one hub
#[derive(Debug, Clone)]
pub struct HubValidation {
    pub hub: String,
    pub summary: ConfusionSummary,
    pub labels: Vec<LabelRow>,
}

fn missing_from(actual: &[NaiveDateTime], predicted: &[Prediction]) -> usize {
    let predicted: FxHashSet<NaiveDateTime> = predicted.iter().map(|p| p.timestamp).collect();
    actual.iter().filter(|t| !predicted.contains(*t)).collect::<FxHashSet<_>>().len()
}

/// Compare labelled image times with the occupied / vacant prediction files
pub fn validate_hub(
    hub: &str,
    labelled_occupied: &[NaiveDateTime],
    labelled_vacant: &[NaiveDateTime],
    predicted_occupied: &[Prediction],
    predicted_vacant: &[Prediction],
) -> HubValidation {
    let false_negatives = missing_from(labelled_occupied, predicted_occupied);
    let false_positives = missing_from(labelled_vacant, predicted_vacant);

    let summary = ConfusionSummary {
        fp: false_positives,
        tp: labelled_occupied.len().saturating_sub(false_negatives),
        fn_: false_negatives,
        tn: labelled_vacant.len().saturating_sub(false_positives),
    };

    let positives: FxHashSet<NaiveDateTime> = labelled_occupied.iter().copied().collect();
    let mut labels: Vec<LabelRow> = predicted_occupied
        .iter()
        .chain(predicted_vacant)
        .map(|p| LabelRow {
            timestamp: p.timestamp,
            predicted: p.occupied,
            probability: p.probability,
            actual: u8::from(positives.contains(&p.timestamp)),
        })
        .collect();
    labels.sort_by_key(|r| r.timestamp);

    HubValidation { hub: hub.to_string(), summary, labels }
}
