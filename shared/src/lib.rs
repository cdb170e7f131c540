pub mod chart;
pub mod report;

use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter, EnumString};

pub use report::{LabelCount, Proportion, ReportView, SessionState};

/// Verdict of the binary retina classifier.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, EnumIter,
)]
pub enum PredictionLabel {
    Glaucoma,
    Normal,
}

impl PredictionLabel {
    /// Label names in output-score order.
    pub fn class_labels() -> Vec<String> {
        PredictionLabel::iter().map(|l| l.to_string()).collect()
    }

    /// Colour the table and both charts use for this label.
    pub fn color(&self) -> &'static str {
        match self {
            PredictionLabel::Glaucoma => "red",
            PredictionLabel::Normal => "green",
        }
    }

    /// Message shown to the user right after an upload.
    pub fn verdict_message(&self) -> &'static str {
        match self {
            PredictionLabel::Glaucoma => {
                "Your eye is diagnosed with Glaucoma. Please consult an ophthalmologist."
            }
            PredictionLabel::Normal => "Your eyes are healthy.",
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ResultRecord {
    pub image: String,
    #[serde(rename = "prediction")]
    pub label: PredictionLabel,
}

impl ResultRecord {
    pub fn new(image: impl Into<String>, label: PredictionLabel) -> Self {
        Self {
            image: image.into(),
            label,
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct InferenceResponse {
    pub image: String,
    pub prediction: PredictionLabel,
    /// Raw model output as (glaucoma, normal).
    pub scores: [f32; 2],
    pub class_labels: Vec<String>,
    pub message: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct StatusResponse {
    pub model_loaded: bool,
    pub model_error: Option<String>,
    pub model_sha256: Option<String>,
    pub records: usize,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ErrorResponse {
    pub error: String,
}
