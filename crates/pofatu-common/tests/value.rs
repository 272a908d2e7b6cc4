//! Property tests for the measurement value parser.

use pofatu_common::{RawValue, almost_float, format_decimal, parse_value};
use proptest::prelude::*;

proptest! {
    #[test]
    fn decimal_literals_parse_back(value in -1.0e6f64..1.0e6f64) {
        let text = format!("{value}");
        let parsed = parse_value(RawValue::Text(&text)).unwrap();
        prop_assert_eq!(parsed.value, Some(value));
        prop_assert!(!parsed.less);
    }

    #[test]
    fn less_than_prefix_sets_flag(value in 0.0f64..1.0e4f64, spaces in 0usize..3) {
        let text = format!("<{}{value}", " ".repeat(spaces));
        let parsed = parse_value(RawValue::Text(&text)).unwrap();
        prop_assert_eq!(parsed.value, Some(value));
        prop_assert!(parsed.less);
    }

    #[test]
    fn unicode_minus_matches_ascii(value in 0.001f64..1.0e4f64) {
        let unicode = format!("\u{2212}{value}");
        let ascii = format!("-{value}");
        prop_assert_eq!(
            parse_value(RawValue::Text(&unicode)).unwrap(),
            parse_value(RawValue::Text(&ascii)).unwrap()
        );
    }

    #[test]
    fn trailing_comma_is_ignored(value in -180.0f64..180.0f64) {
        let text = format!("{value},");
        prop_assert_eq!(almost_float(Some(text.as_str())).unwrap(), Some(value));
    }
}

#[test]
fn rendered_decimals() {
    let rendered = [1.0, 4.5, 0.25, 12.0]
        .into_iter()
        .map(format_decimal)
        .collect::<Vec<_>>()
        .join(" ");
    insta::assert_snapshot!(rendered, @"1.0 4.5 0.25 12.0");
}
