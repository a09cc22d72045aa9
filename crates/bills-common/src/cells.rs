//! Polars cell helpers.
//!
//! Portfolio tables are read with every column typed as text, but frames built
//! in memory (and older stores) may carry integer or float columns. These
//! helpers give one canonical reading of a cell regardless of its dtype.

use polars::prelude::{AnyValue, DataFrame};

/// Converts a Polars `AnyValue` to a `String` representation.
///
/// Returns an empty string for `Null`; floats are rendered without trailing
/// zeros so `1002003.0` and `1002003` print the same.
///
/// # Examples
///
/// ```
/// use polars::prelude::AnyValue;
/// use bills_common::any_to_string;
///
/// assert_eq!(any_to_string(AnyValue::Null), "");
/// assert_eq!(any_to_string(AnyValue::Float64(1002003.0)), "1002003");
/// assert_eq!(any_to_string(AnyValue::String("ΛΟΓΑΡ. ΥΔΡΕΥΣΗΣ")), "ΛΟΓΑΡ. ΥΔΡΕΥΣΗΣ");
/// ```
pub fn any_to_string(value: AnyValue<'_>) -> String {
    match value {
        AnyValue::Null => String::new(),
        AnyValue::Int8(v) => v.to_string(),
        AnyValue::Int16(v) => v.to_string(),
        AnyValue::Int32(v) => v.to_string(),
        AnyValue::Int64(v) => v.to_string(),
        AnyValue::UInt8(v) => v.to_string(),
        AnyValue::UInt16(v) => v.to_string(),
        AnyValue::UInt32(v) => v.to_string(),
        AnyValue::UInt64(v) => v.to_string(),
        AnyValue::Float32(v) => format_numeric(f64::from(v)),
        AnyValue::Float64(v) => format_numeric(v),
        AnyValue::String(s) => s.to_string(),
        AnyValue::StringOwned(s) => s.to_string(),
        AnyValue::Boolean(b) => b.to_string(),
        other => other.to_string(),
    }
}

/// Text tokens spreadsheet exports use for an empty cell.
const NA_TOKENS: [&str; 5] = ["nan", "na", "n/a", "null", "none"];

/// True for nulls, float NaN, and text cells that are blank or an NA token
/// (`nan`, `NA`, `N/A`, `null`, `None`) after trimming.
pub fn is_missing(value: &AnyValue<'_>) -> bool {
    match value {
        AnyValue::Null => true,
        AnyValue::Float32(v) => v.is_nan(),
        AnyValue::Float64(v) => v.is_nan(),
        AnyValue::String(s) => is_missing_text(s),
        AnyValue::StringOwned(s) => is_missing_text(s),
        _ => false,
    }
}

/// True for blank text and NA tokens, ignoring case.
pub fn is_missing_text(value: &str) -> bool {
    let trimmed = value.trim();
    trimmed.is_empty()
        || NA_TOKENS
            .iter()
            .any(|token| trimmed.eq_ignore_ascii_case(token))
}

/// Canonical identifier rendering used for keys (invoice ids, supply ids,
/// addresses). Returns `None` for missing cells.
pub fn any_to_key(value: AnyValue<'_>) -> Option<String> {
    if is_missing(&value) {
        return None;
    }
    let rendered = any_to_string(value);
    Some(rendered.trim().to_string())
}

/// Formats a floating-point number as a string without trailing zeros.
///
/// # Examples
///
/// ```
/// use bills_common::format_numeric;
///
/// assert_eq!(format_numeric(12.0), "12");
/// assert_eq!(format_numeric(12.50), "12.5");
/// assert_eq!(format_numeric(0.0), "0");
/// ```
pub fn format_numeric(v: f64) -> String {
    if v == 0.0 {
        return "0".to_string();
    }
    let s = format!("{v}");
    if !s.contains('.') {
        return s;
    }
    let trimmed = s.trim_end_matches('0').trim_end_matches('.');
    if trimmed.is_empty() || trimmed == "-" {
        "0".to_string()
    } else {
        trimmed.to_string()
    }
}

/// Converts an `AnyValue` to `f64`, returning `None` for null or unparseable cells.
pub fn any_to_f64(value: AnyValue<'_>) -> Option<f64> {
    match value {
        AnyValue::Null => None,
        AnyValue::Int8(v) => Some(f64::from(v)),
        AnyValue::Int16(v) => Some(f64::from(v)),
        AnyValue::Int32(v) => Some(f64::from(v)),
        AnyValue::Int64(v) => Some(v as f64),
        AnyValue::UInt8(v) => Some(f64::from(v)),
        AnyValue::UInt16(v) => Some(f64::from(v)),
        AnyValue::UInt32(v) => Some(f64::from(v)),
        AnyValue::UInt64(v) => Some(v as f64),
        AnyValue::Float32(v) => Some(f64::from(v)).filter(|v| v.is_finite()),
        AnyValue::Float64(v) => Some(v).filter(|v| v.is_finite()),
        AnyValue::String(s) => parse_f64(s),
        AnyValue::StringOwned(s) => parse_f64(&s),
        _ => None,
    }
}

/// Converts an `AnyValue` to `i64`; floats are accepted only when integral.
pub fn any_to_i64(value: AnyValue<'_>) -> Option<i64> {
    match value {
        AnyValue::Null => None,
        AnyValue::Int8(v) => Some(i64::from(v)),
        AnyValue::Int16(v) => Some(i64::from(v)),
        AnyValue::Int32(v) => Some(i64::from(v)),
        AnyValue::Int64(v) => Some(v),
        AnyValue::UInt8(v) => Some(i64::from(v)),
        AnyValue::UInt16(v) => Some(i64::from(v)),
        AnyValue::UInt32(v) => Some(i64::from(v)),
        AnyValue::UInt64(v) => i64::try_from(v).ok(),
        AnyValue::Float32(v) => integral(f64::from(v)),
        AnyValue::Float64(v) => integral(v),
        AnyValue::String(s) => parse_i64(s),
        AnyValue::StringOwned(s) => parse_i64(&s),
        _ => None,
    }
}

fn integral(v: f64) -> Option<i64> {
    if v.is_finite() && v.fract() == 0.0 {
        Some(v as i64)
    } else {
        None
    }
}

/// Parses a decimal amount.
///
/// Besides plain decimals, grouped amounts are accepted in both conventions:
/// `"1.234,56"` (Greek locale) and `"1,234.56"`. A lone comma followed by
/// other than three digits is a decimal separator (`"12,5"`), while
/// `"1,234"` and `"1.234.567"` are read as thousands. NA tokens and
/// non-finite results (`inf`, `NaN`) yield `None`.
pub fn parse_f64(value: &str) -> Option<f64> {
    if is_missing_text(value) {
        return None;
    }
    let trimmed = value.trim();
    let normalized = normalize_decimal(trimmed)?;
    normalized
        .parse::<f64>()
        .ok()
        .filter(|parsed| parsed.is_finite())
}

/// Rewrites a grouped or comma-decimal amount into plain `1234.56` form.
fn normalize_decimal(text: &str) -> Option<String> {
    let (sign, body) = match text.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", text.strip_prefix('+').unwrap_or(text)),
    };
    if body.is_empty()
        || !body
            .chars()
            .all(|ch| ch.is_ascii_digit() || ch == '.' || ch == ',')
    {
        // leaves exponents and anything else to the plain parser
        return Some(text.to_string());
    }

    let dots = body.matches('.').count();
    let commas = body.matches(',').count();
    let (integer, fraction) = match (dots, commas) {
        (0, 0) | (1, 0) => return Some(text.to_string()),
        (_, 0) => (ungroup(body, '.')?, None),
        (0, 1) => {
            let (head, tail) = body.split_once(',')?;
            if tail.len() == 3 && is_group_head(head) {
                (format!("{head}{tail}"), None)
            } else {
                (head.to_string(), Some(tail))
            }
        }
        (0, _) => (ungroup(body, ',')?, None),
        _ => {
            let decimal = if body.rfind(',') > body.rfind('.') { ',' } else { '.' };
            let group = if decimal == ',' { '.' } else { ',' };
            let (head, tail) = body.rsplit_once(decimal)?;
            if tail.contains(group) || head.contains(decimal) {
                return None;
            }
            (ungroup(head, group)?, Some(tail))
        }
    };
    match fraction {
        Some(tail) if tail.is_empty() || !tail.chars().all(|ch| ch.is_ascii_digit()) => None,
        Some(tail) => Some(format!("{sign}{integer}.{tail}")),
        None => Some(format!("{sign}{integer}")),
    }
}

/// Removes `separator` from `1.234.567`-style text; `None` unless every group
/// after the first has exactly three digits.
fn ungroup(text: &str, separator: char) -> Option<String> {
    let mut parts = text.split(separator);
    let head = parts.next()?;
    if !is_group_head(head) {
        return None;
    }
    let mut digits = head.to_string();
    for part in parts {
        if part.len() != 3 || !part.chars().all(|ch| ch.is_ascii_digit()) {
            return None;
        }
        digits.push_str(part);
    }
    Some(digits)
}

fn is_group_head(head: &str) -> bool {
    (1..=3).contains(&head.len()) && head.chars().all(|ch| ch.is_ascii_digit())
}

/// Parses an integer; integral decimal text such as `"202403.0"` is accepted.
pub fn parse_i64(value: &str) -> Option<i64> {
    if is_missing_text(value) {
        return None;
    }
    let trimmed = value.trim();
    if let Ok(parsed) = trimmed.parse::<i64>() {
        return Some(parsed);
    }
    trimmed.parse::<f64>().ok().and_then(integral)
}

/// Cell value at `(column, row)`, `Null` when the column or row is absent.
pub fn cell<'a>(df: &'a DataFrame, column: &str, row: usize) -> AnyValue<'a> {
    df.column(column)
        .ok()
        .and_then(|series| series.get(row).ok())
        .unwrap_or(AnyValue::Null)
}

/// Canonical key at `(column, row)`.
pub fn cell_key(df: &DataFrame, column: &str, row: usize) -> Option<String> {
    any_to_key(cell(df, column, row))
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::prelude::{NamedFrom, Series};

    #[test]
    fn test_any_to_string_null() {
        assert_eq!(any_to_string(AnyValue::Null), "");
    }

    #[test]
    fn test_any_to_string_numbers() {
        assert_eq!(any_to_string(AnyValue::Int64(-100)), "-100");
        assert_eq!(any_to_string(AnyValue::Float64(1.0)), "1");
        assert_eq!(any_to_string(AnyValue::Float64(1.50)), "1.5");
    }

    #[test]
    fn test_format_numeric_keeps_integer_zeros() {
        assert_eq!(format_numeric(100.0), "100");
        assert_eq!(format_numeric(1500.0), "1500");
        assert_eq!(format_numeric(-0.0), "0");
    }

    #[test]
    fn test_is_missing() {
        assert!(is_missing(&AnyValue::Null));
        assert!(is_missing(&AnyValue::String("   ")));
        assert!(!is_missing(&AnyValue::String("0")));
        assert!(!is_missing(&AnyValue::Float64(0.0)));
    }

    #[test]
    fn test_any_to_key_normalizes() {
        assert_eq!(any_to_key(AnyValue::Float64(1002003.0)), Some("1002003".to_string()));
        assert_eq!(any_to_key(AnyValue::String(" 77 ")), Some("77".to_string()));
        assert_eq!(any_to_key(AnyValue::Null), None);
        assert_eq!(any_to_key(AnyValue::String("")), None);
    }

    #[test]
    fn test_any_to_f64() {
        assert_eq!(any_to_f64(AnyValue::Null), None);
        assert_eq!(any_to_f64(AnyValue::Int32(42)), Some(42.0));
        assert_eq!(any_to_f64(AnyValue::String("2.5")), Some(2.5));
        assert_eq!(any_to_f64(AnyValue::String("12,5")), Some(12.5));
        assert_eq!(any_to_f64(AnyValue::String("n/a")), None);
    }

    #[test]
    fn test_na_tokens_are_missing() {
        for token in ["nan", "NaN", " NA ", "N/A", "null", "None"] {
            assert!(is_missing(&AnyValue::String(token)), "{token}");
        }
        assert!(is_missing(&AnyValue::Float64(f64::NAN)));
        assert!(!is_missing(&AnyValue::String("NAFPLIOU 3")));
        assert_eq!(any_to_key(AnyValue::String("nan")), None);
    }

    #[test]
    fn test_parse_f64_rejects_non_finite() {
        assert_eq!(parse_f64("NaN"), None);
        assert_eq!(parse_f64("inf"), None);
        assert_eq!(parse_f64("-infinity"), None);
        assert_eq!(parse_f64("1e400"), None);
        assert_eq!(any_to_f64(AnyValue::Float64(f64::INFINITY)), None);
    }

    #[test]
    fn test_parse_f64_grouped_amounts() {
        assert_eq!(parse_f64("1.234,56"), Some(1234.56));
        assert_eq!(parse_f64("-1.234.567,5"), Some(-1234567.5));
        assert_eq!(parse_f64("1,234.56"), Some(1234.56));
        assert_eq!(parse_f64("1,234"), Some(1234.0));
        assert_eq!(parse_f64("1.234.567"), Some(1234567.0));
        assert_eq!(parse_f64("12,5"), Some(12.5));
        assert_eq!(parse_f64("0,50"), Some(0.5));
        assert_eq!(parse_f64("1.5"), Some(1.5));
        assert_eq!(parse_f64("2.5e3"), Some(2500.0));
    }

    #[test]
    fn test_parse_f64_rejects_malformed_grouping() {
        assert_eq!(parse_f64("1.23,4.5"), None);
        assert_eq!(parse_f64("12.34.56"), None);
        assert_eq!(parse_f64("1,2,3"), None);
        assert_eq!(parse_f64("1.234,"), None);
        assert_eq!(parse_f64("abc"), None);
    }

    #[test]
    fn test_any_to_i64() {
        assert_eq!(any_to_i64(AnyValue::Int32(202403)), Some(202403));
        assert_eq!(any_to_i64(AnyValue::Float64(202403.0)), Some(202403));
        assert_eq!(any_to_i64(AnyValue::Float64(3.9)), None);
        assert_eq!(any_to_i64(AnyValue::String("202403.0")), Some(202403));
        assert_eq!(any_to_i64(AnyValue::String("invalid")), None);
    }

    #[test]
    fn test_cell_lookup() {
        let df = DataFrame::new(vec![Series::new("A".into(), vec!["x", "y"]).into()]).unwrap();
        assert_eq!(cell_key(&df, "A", 1), Some("y".to_string()));
        assert_eq!(cell_key(&df, "A", 5), None);
        assert_eq!(cell_key(&df, "B", 0), None);
    }
}
