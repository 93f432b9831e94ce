use std::path::Path;

use anyhow::Result;

use crate::export::names::measure_name;
use crate::models::{MeasureCode, QualityAssessment};

/// Field separator of the delimited export.
pub const DELIMITER: char = ';';

/// Score written for a measurement that did not succeed.
pub const FAILED_RAW_SCORE: f64 = -1.0;
pub const FAILED_SCALAR: i32 = -1;

/// One line of the assessment table.
#[derive(Debug, Clone, PartialEq)]
pub struct AssessmentRow {
    pub code: MeasureCode,
    pub name: &'static str,
    pub raw_score: f64,
    pub scalar: i32,
}

/// Table rows in assessment order. Failed measurements keep their row and
/// carry sentinel scores so column positions stay fixed between runs.
pub fn to_rows(assessment: &QualityAssessment) -> Vec<AssessmentRow> {
    assessment
        .iter()
        .map(|(code, result)| {
            let (raw_score, scalar) = if result.is_success() {
                (result.raw_score, result.scalar.round() as i32)
            } else {
                (FAILED_RAW_SCORE, FAILED_SCALAR)
            };
            AssessmentRow {
                code,
                name: measure_name(code),
                raw_score,
                scalar,
            }
        })
        .collect()
}

/// Two-line delimited document: a header of `Filename`, every name, every
/// name suffixed `.scalar`; then the image path and the matching scores.
///
/// The path is written verbatim (no quoting or escaping).
pub fn to_delimited_text(assessment: &QualityAssessment, source_image: &str) -> String {
    let rows = to_rows(assessment);
    let delimiter = DELIMITER.to_string();

    let header: Vec<String> = std::iter::once("Filename".to_string())
        .chain(rows.iter().map(|row| row.name.to_string()))
        .chain(rows.iter().map(|row| format!("{}.scalar", row.name)))
        .collect();
    let data: Vec<String> = std::iter::once(source_image.to_string())
        .chain(rows.iter().map(|row| row.raw_score.to_string()))
        .chain(rows.iter().map(|row| row.scalar.to_string()))
        .collect();

    format!("{}\n{}\n", header.join(delimiter.as_str()), data.join(delimiter.as_str()))
}

/// Write the delimited export to `path` as UTF-8.
pub fn write_delimited(path: &Path, assessment: &QualityAssessment, source_image: &str) -> Result<()> {
    std::fs::write(path, to_delimited_text(assessment, source_image))
        .map_err(|e| anyhow::anyhow!("Failed to write assessment to {}: {}", path.display(), e))
}
