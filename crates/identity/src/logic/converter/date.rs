use chrono::{NaiveDate, NaiveDateTime, Utc};
use serde_json::Value;
use shared::error::CommonError;
use shared::primitives::WrappedChronoDateTime;

use super::{AttributeConverter, Conversion};
use crate::logic::profile::AttributeValue;

const FILLER_SEPARATOR: char = '|';

/// Which calendar and clock fields a pattern carries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct DateShape {
    year: bool,
    month: bool,
    day: bool,
    time: bool,
    zone: bool,
}

/// Parses text timestamps with a `yyyy-MM-dd'T'HH:mm:ssz` style pattern.
///
/// The pattern is translated once into a chrono format string. Results are
/// normalized to UTC; date-only patterns yield midnight UTC and patterns
/// without a month or day fill in the first one.
#[derive(Debug, Clone)]
pub struct DateConverter {
    format: String,
    filler: String,
    shape: DateShape,
}

impl DateConverter {
    pub fn new(pattern: &str) -> Result<Self, CommonError> {
        let (mut format, shape) = translate_pattern(pattern)?;

        if !shape.year {
            return Err(CommonError::InvalidRequest {
                msg: format!("Date pattern '{pattern}' has no year field"),
                source: None,
            });
        }

        let mut filler = String::new();
        if !shape.month {
            format.push(FILLER_SEPARATOR);
            format.push_str("%m");
            filler.push(FILLER_SEPARATOR);
            filler.push('1');
        }
        if !shape.day {
            format.push(FILLER_SEPARATOR);
            format.push_str("%d");
            filler.push(FILLER_SEPARATOR);
            filler.push('1');
        }

        Ok(Self {
            format,
            filler,
            shape,
        })
    }

    /// Parse `raw` against the pattern. `None` when it does not match.
    pub fn parse(&self, raw: &str) -> Option<WrappedChronoDateTime> {
        let input = format!("{}{}", raw.trim(), self.filler);

        if self.shape.zone {
            chrono::DateTime::parse_from_str(&input, &self.format)
                .ok()
                .map(|dt| WrappedChronoDateTime::new(dt.with_timezone(&Utc)))
        } else if self.shape.time {
            NaiveDateTime::parse_from_str(&input, &self.format)
                .ok()
                .map(|naive| WrappedChronoDateTime::new(naive.and_utc()))
        } else {
            NaiveDate::parse_from_str(&input, &self.format)
                .ok()
                .map(WrappedChronoDateTime::from_date)
        }
    }
}

impl AttributeConverter for DateConverter {
    fn convert(&self, raw: &Value) -> Conversion {
        raw.as_str()
            .and_then(|text| self.parse(text))
            .map(AttributeValue::Date)
            .into()
    }
}

fn push_literal(format: &mut String, c: char) {
    if c == '%' {
        format.push_str("%%");
    } else {
        format.push(c);
    }
}

fn unsupported(pattern: &str, detail: String) -> CommonError {
    CommonError::InvalidRequest {
        msg: format!("Unsupported date pattern '{pattern}': {detail}"),
        source: None,
    }
}

fn translate_pattern(pattern: &str) -> Result<(String, DateShape), CommonError> {
    let chars: Vec<char> = pattern.chars().collect();
    let mut format = String::with_capacity(pattern.len() * 2);
    let mut shape = DateShape::default();
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];

        if c == '\'' {
            // '' outside a quoted section is a literal quote
            if chars.get(i + 1) == Some(&'\'') {
                format.push('\'');
                i += 2;
                continue;
            }
            let mut j = i + 1;
            loop {
                match chars.get(j) {
                    None => {
                        return Err(unsupported(pattern, "unterminated quote".to_string()));
                    }
                    Some('\'') if chars.get(j + 1) == Some(&'\'') => {
                        format.push('\'');
                        j += 2;
                    }
                    Some('\'') => break,
                    Some(&literal) => {
                        push_literal(&mut format, literal);
                        j += 1;
                    }
                }
            }
            i = j + 1;
            continue;
        }

        if !c.is_ascii_alphabetic() {
            push_literal(&mut format, c);
            i += 1;
            continue;
        }

        let mut run = 1;
        while chars.get(i + run) == Some(&c) {
            run += 1;
        }

        let spec = match (c, run) {
            ('y', 2) => {
                shape.year = true;
                "%y"
            }
            ('y', _) => {
                shape.year = true;
                "%Y"
            }
            ('M', 1 | 2) => {
                shape.month = true;
                "%m"
            }
            ('M', 3) => {
                shape.month = true;
                "%b"
            }
            ('M', _) => {
                shape.month = true;
                "%B"
            }
            ('d', 1 | 2) => {
                shape.day = true;
                "%d"
            }
            ('H', 1 | 2) => {
                shape.time = true;
                "%H"
            }
            ('h', 1 | 2) => {
                shape.time = true;
                "%I"
            }
            ('m', 1 | 2) => {
                shape.time = true;
                "%M"
            }
            ('s', 1 | 2) => {
                shape.time = true;
                "%S"
            }
            ('S', 3) => "%3f",
            ('S', 6) => "%6f",
            ('S', 9) => "%9f",
            ('a', 1) => "%p",
            ('E', 1..=3) => "%a",
            ('E', _) => "%A",
            ('z' | 'Z', _) => {
                shape.zone = true;
                "%z"
            }
            ('X', _) => {
                shape.zone = true;
                "%#z"
            }
            (letter, count) => {
                return Err(unsupported(
                    pattern,
                    format!("field '{}' is not supported", letter.to_string().repeat(count)),
                ));
            }
        };

        format.push_str(spec);
        i += run;
    }

    Ok((format, shape))
}

#[cfg(all(test, feature = "unit_test"))]
mod unit_test {
    use super::*;
    use chrono::{Datelike, Timelike};
    use serde_json::json;

    fn parse(pattern: &str, raw: &str) -> Option<WrappedChronoDateTime> {
        DateConverter::new(pattern).unwrap().parse(raw)
    }

    #[test]
    fn test_translate_iso_pattern() {
        let (format, shape) = translate_pattern("yyyy-MM-dd'T'HH:mm:ssz").unwrap();
        assert_eq!(format, "%Y-%m-%dT%H:%M:%S%z");
        assert!(shape.year && shape.month && shape.day && shape.time && shape.zone);
    }

    #[test]
    fn test_translate_escapes() {
        let (format, _) = translate_pattern("yyyy'%''s' dd''").unwrap();
        assert_eq!(format, "%Y%%'s %d'");
    }

    #[test]
    fn test_translate_rejects_unknown_field() {
        assert!(DateConverter::new("yyyy-QQ").is_err());
        assert!(DateConverter::new("yyyy 'open").is_err());
        assert!(DateConverter::new("MM/dd").is_err());
    }

    #[test]
    fn test_parse_date_only() {
        let date = parse("yyyy-MM-dd", "1980-02-29").unwrap();
        assert_eq!(date.to_string(), "1980-02-29T00:00:00+00:00");
    }

    #[test]
    fn test_parse_us_birthday() {
        let date = parse("MM/dd/yyyy", "08/15/1985").unwrap();
        assert_eq!(date.get_inner().year(), 1985);
        assert_eq!(date.get_inner().month(), 8);
        assert_eq!(date.get_inner().day(), 15);
    }

    #[test]
    fn test_parse_with_offset_normalizes_to_utc() {
        let date = parse("yyyy-MM-dd'T'HH:mm:ssz", "2012-03-04T10:20:30+0200").unwrap();
        assert_eq!(date.get_inner().hour(), 8);
        assert_eq!(date.get_inner().minute(), 20);
        assert_eq!(date.get_inner().second(), 30);
    }

    #[test]
    fn test_parse_local_time() {
        let date = parse("yyyy-MM-dd HH:mm", "2012-03-04 23:59").unwrap();
        assert_eq!(date.get_inner().hour(), 23);
    }

    #[test]
    fn test_parse_year_month_fills_first_day() {
        let date = parse("yyyy-MM", "2007-01").unwrap();
        assert_eq!(date.to_string(), "2007-01-01T00:00:00+00:00");
        assert_eq!(parse("yyyy-MM", "0000-00"), None);
        assert!(parse("yyyy", "2001").is_some());
    }

    #[test]
    fn test_convert_unparseable_is_unconvertible() {
        let converter = DateConverter::new("yyyy-MM-dd").unwrap();
        assert_eq!(converter.convert(&json!("not-a-date")), Conversion::Unconvertible);
        assert_eq!(converter.convert(&json!(19800229)), Conversion::Unconvertible);
        assert_eq!(converter.convert(&Value::Null), Conversion::Unconvertible);
    }

    #[test]
    fn test_convert_produces_date_value() {
        let converter = DateConverter::new("MM/dd/yyyy").unwrap();
        let Conversion::Converted(value) = converter.convert(&json!("01/31/2000")) else {
            panic!("expected a converted date");
        };
        assert_eq!(
            value.as_date().map(|d| d.to_string()).as_deref(),
            Some("2000-01-31T00:00:00+00:00")
        );
    }
}
