use std::sync::OnceLock;

use chrono::{Datelike, NaiveDate, Weekday};
use regex::Regex;

/// How far (in days) a year-less date may lie from the reference date before it is moved into
/// the neighbouring year.
const YEAR_WRAP_DAYS: i64 = 180;

fn weekday_from_slovenian(name: &str) -> Option<Weekday> {
    match name.to_lowercase().as_str() {
        "ponedeljek" => Some(Weekday::Mon),
        "torek" => Some(Weekday::Tue),
        "sreda" => Some(Weekday::Wed),
        "četrtek" | "cetrtek" => Some(Weekday::Thu),
        "petek" => Some(Weekday::Fri),
        "sobota" => Some(Weekday::Sat),
        "nedelja" => Some(Weekday::Sun),
        _ => None,
    }
}

/// Recognises a weekday block header such as `PONEDELJEK, 14. 10. 2019` or `Torek 15.10.` and
/// returns the date it announces.
///
/// Headers without a year get the year of `reference`, shifted by one when that would put the
/// date more than half a year away (menus published over New Year).
pub fn parse_day_header(line: &str, reference: NaiveDate) -> Option<NaiveDate> {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = RE.get_or_init(|| {
        Regex::new(
            r"(?i)^(?:(ponedeljek|torek|sreda|[čc]etrtek|petek|sobota|nedelja)[\s,:\-]*)?(\d{1,2})\s*\.\s*(\d{1,2})\s*\.?\s*(\d{4})?\s*[:\-]?$",
        )
        .expect("regex should be valid")
    });
    let caps = re.captures(line.trim())?;

    let day: u32 = caps[2].parse().ok()?;
    let month: u32 = caps[3].parse().ok()?;
    let date = match caps.get(4) {
        Some(year) => NaiveDate::from_ymd_opt(year.as_str().parse().ok()?, month, day)?,
        None => infer_year(day, month, reference)?,
    };

    if let Some(written) = caps.get(1).and_then(|m| weekday_from_slovenian(m.as_str())) {
        if written != date.weekday() {
            log::warn!(
                "Header {line:?} names {written} but {date} is a {}, using the date",
                date.weekday()
            );
        }
    }
    Some(date)
}

fn infer_year(day: u32, month: u32, reference: NaiveDate) -> Option<NaiveDate> {
    let year = reference.year();
    let date = NaiveDate::from_ymd_opt(year, month, day)?;
    let offset = date.signed_duration_since(reference).num_days();
    if offset < -YEAR_WRAP_DAYS {
        NaiveDate::from_ymd_opt(year + 1, month, day)
    } else if offset > YEAR_WRAP_DAYS {
        NaiveDate::from_ymd_opt(year - 1, month, day)
    } else {
        Some(date)
    }
}
