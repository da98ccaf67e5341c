use std::sync::OnceLock;

use chrono::NaiveDate;
use regex::Regex;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

use crate::column_type::ColumnType;

const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%d/%m/%Y", "%m/%d/%Y"];
const TRUE_WORDS: [&str; 6] = ["true", "t", "yes", "y", "1", "sim"];
const FALSE_WORDS: [&str; 6] = ["false", "f", "no", "n", "0", "nao"];

/// A field value coerced to a declared [ColumnType].
///
/// Text that cannot be coerced to the declared type becomes [Value::Null].
#[derive(Clone, Debug, PartialEq)]
pub enum Value<'a> {
    String(&'a str),
    Number(f64),
    Date(NaiveDate),
    Boolean(bool),
    Null,
}

impl<'a> Value<'a> {
    pub fn coerce(text: Option<&'a str>, column_type: ColumnType) -> Value<'a> {
        let text = match text {
            None => { return Value::Null; }
            Some(text) => { text }
        };
        let value = match column_type {
            ColumnType::String => { Some(Value::String(text)) }
            ColumnType::Number => { parse_number(text).map(Value::Number) }
            ColumnType::Date => { parse_date(text).map(Value::Date) }
            ColumnType::Boolean => { parse_boolean(text).map(Value::Boolean) }
        };
        value.unwrap_or(Value::Null)
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }
}

fn number_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^[+-]?(NaN|Infinity|(\d+\.?\d*|\.\d+)([eE][+-]?\d+)?)$").unwrap()
    })
}

/// Parse a decimal number, treating every comma as a decimal point.
///
/// `"1,5"` and `"1.5"` both parse to 1.5, `"1,000.5"` does not parse.
pub fn parse_number(text: &str) -> Option<f64> {
    let normalized = text.trim().replace(',', ".");
    if number_pattern().is_match(&normalized) {
        normalized.parse::<f64>().ok()
    } else {
        None
    }
}

/// Parse a date trying ISO-8601, then dd/mm/yyyy, then mm/dd/yyyy. The first format that
/// parses wins, so `03/04/2024` is the 3rd of April.
pub fn parse_date(text: &str) -> Option<NaiveDate> {
    let trimmed = text.trim();
    DATE_FORMATS.iter()
        .find_map(|format| NaiveDate::parse_from_str(trimmed, format).ok())
}

/// Parse a boolean word, ignoring case, accents and surrounding blanks.
pub fn parse_boolean(text: &str) -> Option<bool> {
    let folded = fold(text);
    if TRUE_WORDS.contains(&folded.as_str()) {
        Some(true)
    } else if FALSE_WORDS.contains(&folded.as_str()) {
        Some(false)
    } else {
        None
    }
}

/// Strip accents, lowercase and trim.
pub(crate) fn fold(text: &str) -> String {
    text.trim()
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
        .collect()
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use crate::column_type::ColumnType;
    use crate::value::{parse_boolean, parse_date, parse_number, Value};

    #[test]
    fn test_comma_decimal_separator() {
        assert_eq!(parse_number("1,5"), Some(1.5));
        assert_eq!(parse_number(" 1.5 "), Some(1.5));
        assert_eq!(parse_number("-2e3"), Some(-2000.0));
        assert_eq!(parse_number("1,000.5"), None);
        assert_eq!(parse_number("abc"), None);
        assert_eq!(parse_number(""), None);
        assert_eq!(parse_number("inf"), None);
        assert!(parse_number("NaN").unwrap().is_nan());
    }

    #[test]
    fn test_date_formats() {
        let expected = NaiveDate::from_ymd_opt(2024, 4, 3);
        assert_eq!(parse_date("2024-04-03"), expected);
        assert_eq!(parse_date("03/04/2024"), expected);
        // not a valid dd/mm, falls through to mm/dd
        assert_eq!(parse_date("12/31/2024"), NaiveDate::from_ymd_opt(2024, 12, 31));
        assert_eq!(parse_date("2024/04/03"), None);
    }

    #[test]
    fn test_boolean_vocabulary() {
        assert_eq!(parse_boolean("YES"), Some(true));
        assert_eq!(parse_boolean(" y "), Some(true));
        assert_eq!(parse_boolean("Sim"), Some(true));
        assert_eq!(parse_boolean("0"), Some(false));
        assert_eq!(parse_boolean("NÃO"), Some(false));
        assert_eq!(parse_boolean("não"), Some(false));
        assert_eq!(parse_boolean("maybe"), None);
    }

    #[test]
    fn test_coerce_unparsable_is_null() {
        assert_eq!(Value::coerce(Some("x"), ColumnType::Number), Value::Null);
        assert_eq!(Value::coerce(None, ColumnType::String), Value::Null);
        assert_eq!(Value::coerce(Some(""), ColumnType::String), Value::String(""));
        assert_eq!(Value::coerce(Some("true"), ColumnType::Boolean), Value::Boolean(true));
    }
}
