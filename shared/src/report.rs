//! Aggregations over a session's ledger.
//!
//! Everything here is a pure function of the record slice it is given. Nothing is
//! cached; callers recompute on every request.

use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;

use crate::{PredictionLabel, ResultRecord};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionState {
    /// Nothing uploaded yet.
    Idle,
    HasResults,
}

impl SessionState {
    pub fn of(records: &[ResultRecord]) -> Self {
        if records.is_empty() {
            SessionState::Idle
        } else {
            SessionState::HasResults
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelCount {
    pub label: PredictionLabel,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Proportion {
    pub label: PredictionLabel,
    pub percent: f64,
    /// `percent` rounded to one decimal, e.g. `"50.0%"`.
    pub display: String,
}

/// Counts per label in enumeration order. Labels that never occur are left out.
pub fn label_distribution(records: &[ResultRecord]) -> Vec<LabelCount> {
    PredictionLabel::iter()
        .map(|label| LabelCount {
            label,
            count: records.iter().filter(|r| r.label == label).count(),
        })
        .filter(|entry| entry.count > 0)
        .collect()
}

pub fn proportions(records: &[ResultRecord]) -> Vec<Proportion> {
    let total = records.len();
    if total == 0 {
        return Vec::new();
    }

    label_distribution(records)
        .into_iter()
        .map(|LabelCount { label, count }| {
            let percent = count as f64 / total as f64 * 100.0;
            Proportion {
                label,
                percent,
                display: format_percent(percent),
            }
        })
        .collect()
}

pub fn format_percent(percent: f64) -> String {
    format!("{:.1}%", percent)
}

/// Everything the results page renders, derived from one ledger snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportView {
    pub state: SessionState,
    pub records: Vec<ResultRecord>,
    pub distribution: Vec<LabelCount>,
    pub proportions: Vec<Proportion>,
}

impl ReportView {
    pub fn from_records(records: &[ResultRecord]) -> Self {
        Self {
            state: SessionState::of(records),
            records: records.to_vec(),
            distribution: label_distribution(records),
            proportions: proportions(records),
        }
    }

    pub fn total(&self) -> usize {
        self.records.len()
    }
}
