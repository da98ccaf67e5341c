use crate::column_type::ColumnType;
use crate::record::Record;
use crate::value::{parse_boolean, parse_date, parse_number};

/// Number of leading rows sampled per column
pub const SAMPLE_ROWS: usize = 50;

/// Share of the sample a specific type must reach
pub const TYPE_THRESHOLD: f64 = 0.7;

/// Infer the type of the column at `position` from the first [SAMPLE_ROWS] rows.
pub fn infer_column_type(rows: &[Record], position: usize) -> ColumnType {
    infer_from_sample(
        rows.iter()
            .take(SAMPLE_ROWS)
            .map(|row| row.get(position))
    )
}

/// Classify each sampled value as boolean, else number, else date, else string, and pick
/// the first of BOOLEAN, NUMBER, DATE whose count reaches [TYPE_THRESHOLD] of the sample.
///
/// Null values are not classified but still count in the sample size, so a sparse column
/// needs proportionally more agreeing values. A column with no non-null sample is STRING.
pub fn infer_from_sample<'a, I>(sample: I) -> ColumnType
    where I: IntoIterator<Item=Option<&'a str>> {
    let mut samples = 0;
    let mut booleans = 0;
    let mut numbers = 0;
    let mut dates = 0;
    let mut non_null = 0;
    for value in sample.into_iter().take(SAMPLE_ROWS) {
        samples += 1;
        let value = match value {
            None => { continue; }
            Some(value) => { value }
        };
        non_null += 1;
        if parse_boolean(value).is_some() {
            booleans += 1;
        } else if parse_number(value).is_some() {
            numbers += 1;
        } else if parse_date(value).is_some() {
            dates += 1;
        }
    }

    if non_null == 0 {
        return ColumnType::String;
    }

    let threshold = samples as f64 * TYPE_THRESHOLD;
    if booleans as f64 >= threshold {
        ColumnType::Boolean
    } else if numbers as f64 >= threshold {
        ColumnType::Number
    } else if dates as f64 >= threshold {
        ColumnType::Date
    } else {
        ColumnType::String
    }
}
