pub mod names;
pub mod table;

pub use names::{MeasureCategory, MeasureId, QualityMeasure, measure_name};
pub use table::{AssessmentRow, DELIMITER, to_delimited_text, to_rows, write_delimited};
