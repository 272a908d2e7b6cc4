//! Measurement cell parsing.
//!
//! Compositional data cells are free text written by hand: they mix
//! missing-data sentinels (`nd`, `bdl`, `LOD`, ...), "less than" markers
//! (`<0.5`, `≤3`), inline precision (`4.5±0.2`) and the unicode minus sign.
//! [`parse_value`] turns such a cell into a [`ParsedValue`]; anything that is
//! neither a sentinel nor a decimal literal is a hard [`ValueError`].

use thiserror::Error;

/// Text values meaning "no value" in a measurement cell.
///
/// Alphabetic entries are matched case-insensitively.
pub const MEASUREMENT_SENTINELS: &[&str] = &[
    "", "nd", "bdl", "LOD", "-", "n.d.", "NA", "*", "1\u{3c3}", "2\u{3c3}",
];

const UNICODE_MINUS: char = '\u{2212}';
const LESS_THAN_MARKERS: &[char] = &['<', '\u{2264}'];
const PLUS_MINUS: char = '\u{b1}';
const SIGMA: char = '\u{3c3}';

/// Errors raised while parsing cell values.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValueError {
    /// The cell is neither a sentinel nor a decimal literal.
    #[error("malformed numeric value '{value}'")]
    Malformed { value: String },

    /// The sigma level could not be read as an integer.
    #[error("malformed sigma level '{value}'")]
    MalformedSigma { value: String },
}

pub type Result<T> = std::result::Result<T, ValueError>;

/// A raw cell as handed over by a reader.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RawValue<'a> {
    Missing,
    Text(&'a str),
    Number(f64),
}

impl<'a> From<Option<&'a str>> for RawValue<'a> {
    fn from(value: Option<&'a str>) -> Self {
        match value {
            Some(text) => RawValue::Text(text),
            None => RawValue::Missing,
        }
    }
}

impl<'a> From<&'a str> for RawValue<'a> {
    fn from(value: &'a str) -> Self {
        RawValue::Text(value)
    }
}

impl From<f64> for RawValue<'_> {
    fn from(value: f64) -> Self {
        RawValue::Number(value)
    }
}

/// Result of parsing a measurement cell.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ParsedValue {
    /// Numeric value, `None` when the cell holds a sentinel.
    pub value: Option<f64>,
    /// True when the cell carried a `<` or `≤` marker.
    pub less: bool,
    /// Inline precision written as `value±precision`.
    pub precision: Option<f64>,
}

impl ParsedValue {
    pub fn missing(less: bool) -> Self {
        Self {
            value: None,
            less,
            precision: None,
        }
    }

    pub fn is_missing(&self) -> bool {
        self.value.is_none()
    }
}

/// Returns true if `text` is one of the [`MEASUREMENT_SENTINELS`].
pub fn is_sentinel(text: &str) -> bool {
    MEASUREMENT_SENTINELS.iter().any(|sentinel| {
        if sentinel.chars().any(|ch| ch.is_ascii_alphabetic()) {
            sentinel.eq_ignore_ascii_case(text)
        } else {
            *sentinel == text
        }
    })
}

/// Parses a measurement cell.
///
/// # Examples
///
/// ```
/// use pofatu_common::{RawValue, parse_value};
///
/// let parsed = parse_value(RawValue::Text("<5.2")).unwrap();
/// assert_eq!(parsed.value, Some(5.2));
/// assert!(parsed.less);
///
/// assert!(parse_value(RawValue::Text("bdl")).unwrap().is_missing());
/// ```
pub fn parse_value(raw: RawValue<'_>) -> Result<ParsedValue> {
    let text = match raw {
        RawValue::Missing => return Ok(ParsedValue::missing(false)),
        RawValue::Number(value) => {
            return Ok(ParsedValue {
                value: Some(value),
                ..ParsedValue::default()
            });
        }
        RawValue::Text(text) => text.replace(UNICODE_MINUS, "-"),
    };

    let mut rest = text.trim();
    let mut less = false;
    if let Some(stripped) = rest.strip_prefix(LESS_THAN_MARKERS) {
        less = true;
        rest = stripped.trim();
    }

    if is_sentinel(rest) {
        return Ok(ParsedValue::missing(less));
    }

    let (value_text, precision) = match rest.split_once(PLUS_MINUS) {
        Some((value, precision)) => (value.trim(), Some(parse_decimal(precision.trim())?)),
        None => (rest, None),
    };

    Ok(ParsedValue {
        value: Some(parse_decimal(value_text)?),
        less,
        precision,
    })
}

/// Parses a coordinate-like cell, tolerating a trailing decimal comma.
///
/// Empty cells and the legacy `NA` / `*` markers yield `None`.
pub fn almost_float(raw: Option<&str>) -> Result<Option<f64>> {
    let Some(text) = raw else {
        return Ok(None);
    };
    let trimmed = text.trim();
    if matches!(trimmed, "NA" | "*") {
        return Ok(None);
    }
    let trimmed = trimmed.strip_suffix(',').unwrap_or(trimmed).trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    parse_decimal(trimmed).map(Some)
}

/// Parses a sigma level such as `2σ` or `1`.
pub fn parse_sigma(raw: &str) -> Result<Option<u8>> {
    let cleaned: String = raw
        .chars()
        .filter(|ch| *ch != SIGMA && !ch.is_whitespace())
        .collect();
    if cleaned.is_empty() {
        return Ok(None);
    }
    cleaned
        .parse::<u8>()
        .map(Some)
        .map_err(|_| ValueError::MalformedSigma {
            value: raw.to_string(),
        })
}

/// Formats a decimal for display.
///
/// Integral values keep one fractional digit (`1.0`); other values use the
/// shortest representation that round-trips.
pub fn format_decimal(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 {
        format!("{value:.1}")
    } else {
        format!("{value}")
    }
}

fn parse_decimal(text: &str) -> Result<f64> {
    text.parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
        .ok_or_else(|| ValueError::Malformed {
            value: text.to_string(),
        })
}
