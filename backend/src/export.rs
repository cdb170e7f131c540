use std::str::FromStr;

use shared::{PredictionLabel, ResultRecord};

pub const REPORT_FILE_NAME: &str = "prediction_report.csv";
pub const REPORT_HEADER: [&str; 2] = ["Image", "Prediction"];

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("CSV output is not UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
    #[error("Expected header Image,Prediction")]
    Header,
    #[error("Unknown prediction {value:?} on line {line}")]
    UnknownLabel { value: String, line: u64 },
}

/// Ledger order is kept, so the newest upload is the first data row.
pub fn export_csv(records: &[ResultRecord]) -> Result<String, ExportError> {
    let mut wtr = csv::Writer::from_writer(Vec::new());
    wtr.write_record(REPORT_HEADER)?;

    for record in records {
        let label = record.label.to_string();
        wtr.write_record([record.image.as_str(), label.as_str()])?;
    }

    let bytes = wtr
        .into_inner()
        .map_err(|e| csv::Error::from(e.into_error()))?;
    Ok(String::from_utf8(bytes)?)
}

pub fn parse_csv(text: &str) -> Result<Vec<ResultRecord>, ExportError> {
    let mut rdr = csv::Reader::from_reader(text.as_bytes());
    if rdr.headers()?.iter().ne(REPORT_HEADER) {
        return Err(ExportError::Header);
    }

    let mut records = Vec::new();
    for row in rdr.records() {
        let row = row?;
        let line = row.position().map(|p| p.line()).unwrap_or_default();
        let (image, prediction) = (row.get(0).unwrap_or_default(), row.get(1).unwrap_or_default());
        let label = PredictionLabel::from_str(prediction).map_err(|_| ExportError::UnknownLabel {
            value: prediction.to_string(),
            line,
        })?;
        records.push(ResultRecord::new(image, label));
    }
    Ok(records)
}
