//! CSL-style structured dates

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// A date in CSL-JSON form: `{"date-parts": [[year, month?, day?]], "raw": "..."}`.
///
/// The parts never have gaps: a day is only present when a month is.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructuredDate {
    #[serde(rename = "date-parts")]
    pub date_parts: Vec<Vec<i32>>,
    #[serde(default)]
    pub raw: String,
}

impl StructuredDate {
    /// Build a date from its parts. `day` is dropped when `month` is absent.
    pub fn new(year: i32, month: Option<u32>, day: Option<u32>) -> Self {
        let mut parts = vec![year];
        if let Some(month) = month {
            parts.push(month as i32);
            if let Some(day) = day {
                parts.push(day as i32);
            }
        }
        let raw = format_raw(&parts);
        Self {
            date_parts: vec![parts],
            raw,
        }
    }

    pub fn from_naive(date: NaiveDate) -> Self {
        Self::new(date.year(), Some(date.month()), Some(date.day()))
    }

    /// The current day, used to stamp `accessed`
    pub fn now() -> Self {
        Self::from_naive(Utc::now().date_naive())
    }

    /// Parse the free-form dates found in page metadata and catalog records.
    ///
    /// Accepts RFC 3339 timestamps, ISO `YYYY-MM-DD`/`YYYY-MM`/`YYYY`, and
    /// English month-name forms such as `March 5, 2024`, `5 March 2024`,
    /// `Mar 5, 2024` and `March 2024`.
    pub fn parse(text: &str) -> Option<Self> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }

        if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
            return Some(Self::from_naive(dt.date_naive()));
        }

        // Timestamps without an offset, e.g. "2024-03-05T10:00:00"
        let date_portion = text.split(['T', ' ']).next().unwrap_or(text);
        if let Ok(date) = NaiveDate::parse_from_str(date_portion, "%Y-%m-%d") {
            return Some(Self::from_naive(date));
        }

        for format in ["%B %d, %Y", "%b %d, %Y", "%d %B %Y", "%d %b %Y", "%Y/%m/%d"] {
            if let Ok(date) = NaiveDate::parse_from_str(text, format) {
                return Some(Self::from_naive(date));
            }
        }

        parse_year_month(text)
    }

    /// Normalize a CSL date value from a metadata source.
    ///
    /// Parts that are not integers, or are out of range for a month or day,
    /// truncate the list so the no-gap rule holds.
    pub fn from_csl_value(value: &serde_json::Value) -> Option<Self> {
        let first = value.get("date-parts")?.as_array()?.first()?.as_array()?;
        let ints: Vec<i64> = first
            .iter()
            .map_while(|part| match part {
                serde_json::Value::Number(n) => n.as_i64(),
                serde_json::Value::String(s) => s.trim().parse().ok(),
                _ => None,
            })
            .collect();

        let year = i32::try_from(*ints.first()?).ok()?;
        let month = ints
            .get(1)
            .and_then(|m| u32::try_from(*m).ok())
            .filter(|m| (1..=12).contains(m));
        let day = month.and_then(|_| {
            ints.get(2)
                .and_then(|d| u32::try_from(*d).ok())
                .filter(|d| (1..=31).contains(d))
        });
        Some(Self::new(year, month, day))
    }

    pub fn year(&self) -> Option<i32> {
        self.date_parts.first().and_then(|p| p.first()).copied()
    }

    pub fn month(&self) -> Option<u32> {
        self.date_parts
            .first()
            .and_then(|p| p.get(1))
            .map(|m| *m as u32)
    }

    pub fn day(&self) -> Option<u32> {
        self.date_parts
            .first()
            .and_then(|p| p.get(2))
            .map(|d| *d as u32)
    }
}

fn format_raw(parts: &[i32]) -> String {
    match parts {
        [year] => format!("{year:04}"),
        [year, month] => format!("{year:04}-{month:02}"),
        [year, month, day, ..] => format!("{year:04}-{month:02}-{day:02}"),
        [] => String::new(),
    }
}

const MONTHS: [&str; 12] = [
    "january",
    "february",
    "march",
    "april",
    "may",
    "june",
    "july",
    "august",
    "september",
    "october",
    "november",
    "december",
];

fn month_from_name(name: &str) -> Option<u32> {
    let name = name.trim_end_matches('.').to_lowercase();
    if name.len() < 3 {
        return None;
    }
    MONTHS
        .iter()
        .position(|m| m.starts_with(&name))
        .map(|i| i as u32 + 1)
}

/// `YYYY`, `YYYY-MM`, or `Month YYYY`
fn parse_year_month(text: &str) -> Option<StructuredDate> {
    if let Some((year, month)) = text.split_once('-') {
        let year: i32 = year.parse().ok()?;
        let month: u32 = month.parse().ok()?;
        return (1..=12)
            .contains(&month)
            .then(|| StructuredDate::new(year, Some(month), None));
    }

    if text.len() == 4 {
        return text
            .parse()
            .ok()
            .map(|year| StructuredDate::new(year, None, None));
    }

    let mut words = text.split_whitespace();
    let month = month_from_name(words.next()?)?;
    let year: i32 = words.next()?.parse().ok()?;
    if words.next().is_some() {
        return None;
    }
    Some(StructuredDate::new(year, Some(month), None))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_year_only_has_single_part() {
        let date = StructuredDate::new(2008, None, Some(10));
        assert_eq!(date.date_parts, vec![vec![2008]]);
        assert_eq!(date.raw, "2008");
    }

    #[test]
    fn test_full_date_raw() {
        let date = StructuredDate::new(2008, Some(8), Some(3));
        assert_eq!(date.date_parts, vec![vec![2008, 8, 3]]);
        assert_eq!(date.raw, "2008-08-03");
    }

    #[test]
    fn test_parse_formats() {
        let expect = StructuredDate::new(2024, Some(3), Some(5));
        assert_eq!(StructuredDate::parse("2024-03-05T10:00:00Z"), Some(expect.clone()));
        assert_eq!(StructuredDate::parse("2024-03-05T10:00:00"), Some(expect.clone()));
        assert_eq!(StructuredDate::parse("2024-03-05"), Some(expect.clone()));
        assert_eq!(StructuredDate::parse("March 5, 2024"), Some(expect.clone()));
        assert_eq!(StructuredDate::parse("Mar 05, 2024"), Some(expect.clone()));
        assert_eq!(StructuredDate::parse("5 March 2024"), Some(expect));
        assert_eq!(
            StructuredDate::parse("March 2024"),
            Some(StructuredDate::new(2024, Some(3), None))
        );
        assert_eq!(
            StructuredDate::parse("1998"),
            Some(StructuredDate::new(1998, None, None))
        );
        assert_eq!(StructuredDate::parse("not a date"), None);
        assert_eq!(StructuredDate::parse(""), None);
    }

    #[test]
    fn test_from_csl_value_truncates_at_gap() {
        let value = serde_json::json!({"date-parts": [[2008, null, 3]]});
        let date = StructuredDate::from_csl_value(&value).unwrap();
        assert_eq!(date.date_parts, vec![vec![2008]]);

        let value = serde_json::json!({"date-parts": [["2019", "7", "1"]]});
        let date = StructuredDate::from_csl_value(&value).unwrap();
        assert_eq!(date.raw, "2019-07-01");
    }

    #[test]
    fn test_from_csl_value_rejects_out_of_range_parts() {
        let value = serde_json::json!({"date-parts": [[2020, 13, 5]]});
        let date = StructuredDate::from_csl_value(&value).unwrap();
        assert_eq!(date.date_parts, vec![vec![2020]]);

        let value = serde_json::json!({"date-parts": [[2020, 0]]});
        assert_eq!(StructuredDate::from_csl_value(&value).unwrap().month(), None);

        let value = serde_json::json!({"date-parts": [[2020, 2, -1]]});
        let date = StructuredDate::from_csl_value(&value).unwrap();
        assert_eq!(date.date_parts, vec![vec![2020, 2]]);

        let value = serde_json::json!({"date-parts": [[2020, 4, 32]]});
        assert_eq!(StructuredDate::from_csl_value(&value).unwrap().day(), None);

        let value = serde_json::json!({"date-parts": [[4_294_967_296_i64]]});
        assert_eq!(StructuredDate::from_csl_value(&value), None);
    }
}
