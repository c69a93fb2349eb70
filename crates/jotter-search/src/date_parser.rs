//! Date-reference extraction from free-text queries.
//!
//! Scans a query for the first recognisable date expression and resolves it
//! to an absolute UTC instant. Supported forms:
//!
//! - ISO 8601 / RFC 3339: `2024-01-15`, `2024-01-15T10:30:00Z`, `2024-01-15 10:30`
//! - US numeric dates: `3/4/2024` (month first)
//! - Keywords: `today`, `tonight`, `this morning`, `yesterday`,
//!   `day before yesterday`, `tomorrow`
//! - Relative periods: `last week`, `past month`, `this week`, `this year`
//! - Spans: `last 3 days`, `past two weeks`
//! - Offsets: `3 days ago`, `a week ago`, `two hours ago`, `30 seconds ago`
//! - Month names: `March 5`, `5th of March`, `5 March 2023`, `June 10, 2023`,
//!   `Jan 2024`. A bare `5 may` needs a year, so "version 2 may break" is not
//!   a date.
//! - Weekdays: `monday`, `last friday`
//!
//! Day-granular phrases resolve to midnight UTC. Months count as 30 days and
//! years as 365 when used as offsets.

use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveDateTime, Utc, Weekday};
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use tracing::trace;

use jotter_core::DateReference;

const MONTHS: &str = "jan(?:uary)?|feb(?:ruary)?|mar(?:ch)?|apr(?:il)?|may|june?|july?|aug(?:ust)?|sep(?:t(?:ember)?)?|oct(?:ober)?|nov(?:ember)?|dec(?:ember)?";

const COUNTS: &str = r"\d+|an?|one|two|three|four|five|six|seven|eight|nine|ten|eleven|twelve";

const UNITS: &str = "second|minute|hour|day|week|month|year";

/// Alternatives are tried in order at each position; the leftmost match in
/// the text wins.
static DATE_PATTERN: Lazy<Regex> = Lazy::new(|| {
    let pattern = format!(
        r"(?ix)\b(?:
            (?P<iso>\d{{4}}-\d{{2}}-\d{{2}}(?:[t\ ]\d{{2}}:\d{{2}}(?::\d{{2}}(?:\.\d+)?)?(?:z|[+-]\d{{2}}:?\d{{2}})?)?)
          | (?P<slash>\d{{1,2}}/\d{{1,2}}/\d{{4}})
          | (?P<dby>day\s+before\s+yesterday)
          | (?P<keyword>yesterday|today|tonight|tomorrow)
          | (?P<day_part>this\s+(?:morning|afternoon|evening))
          | (?P<period_dir>last|past|previous|this)\s+(?P<period_unit>week|month|year)
          | (?:last|past)\s+(?P<span_n>{counts})\s+(?P<span_unit>{units})s?
          | (?P<ago_n>{counts})\s+(?P<ago_unit>{units})s?\s+ago
          | (?P<md_month>{months})\.?\s+(?P<md_day>\d{{1,2}})(?:st|nd|rd|th)?(?:,?\s+(?P<md_year>\d{{4}}))?
          | (?P<dm_day>\d{{1,2}})(?:(?:st|nd|rd|th)\s+(?:of\s+)?|\s+of\s+)(?P<dm_month>{months})\.?(?:,?\s+(?P<dm_year>\d{{4}}))?
          | (?P<dmy_day>\d{{1,2}})\s+(?P<dmy_month>{months})\.?,?\s+(?P<dmy_year>\d{{4}})
          | (?P<my_month>{months})\.?\s+(?P<my_year>\d{{4}})
          | (?P<wd_last>last\s+)?(?P<weekday>monday|tuesday|wednesday|thursday|friday|saturday|sunday)
        )\b",
        counts = COUNTS,
        units = UNITS,
        months = MONTHS,
    );
    Regex::new(&pattern).expect("date pattern is valid")
});

/// Extract the first date reference in `text`, resolved against the current time.
pub fn parse(text: &str) -> Option<DateReference> {
    parse_relative_to(text, Utc::now())
}

/// Extract the first date reference in `text`, resolving relative phrases
/// against `now`.
///
/// Matches that do not form a valid calendar date (e.g. `2024-13-45`) are
/// skipped and scanning continues.
pub fn parse_relative_to(text: &str, now: DateTime<Utc>) -> Option<DateReference> {
    DATE_PATTERN.captures_iter(text).find_map(|caps| {
        let matched = caps.get(0)?.as_str().trim().to_string();
        let at = resolve(&caps, now);
        trace!(matched = %matched, resolved = ?at, "Date candidate");
        at.map(|at| DateReference { at, matched })
    })
}

fn resolve(caps: &Captures<'_>, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
    let today = now.date_naive();

    if let Some(m) = caps.name("iso") {
        return parse_iso(m.as_str());
    }
    if let Some(m) = caps.name("slash") {
        let mut parts = m.as_str().split('/').map(|p| p.parse::<u32>().ok());
        let (month, day, year) = (parts.next()??, parts.next()??, parts.next()??);
        return start_of_day(NaiveDate::from_ymd_opt(year as i32, month, day)?);
    }
    if caps.name("dby").is_some() {
        return start_of_day(today - Duration::days(2));
    }
    if caps.name("day_part").is_some() {
        return start_of_day(today);
    }
    if let Some(m) = caps.name("keyword") {
        let date = match m.as_str().to_lowercase().as_str() {
            "yesterday" => today - Duration::days(1),
            "tomorrow" => today + Duration::days(1),
            _ => today,
        };
        return start_of_day(date);
    }
    if let (Some(dir), Some(unit)) = (caps.name("period_dir"), caps.name("period_unit")) {
        let unit = unit.as_str().to_lowercase();
        if dir.as_str().eq_ignore_ascii_case("this") {
            let start = match unit.as_str() {
                "week" => {
                    today - Duration::days(i64::from(today.weekday().num_days_from_monday()))
                }
                "month" => NaiveDate::from_ymd_opt(today.year(), today.month(), 1)?,
                _ => NaiveDate::from_ymd_opt(today.year(), 1, 1)?,
            };
            return start_of_day(start);
        }
        return now.checked_sub_signed(unit_duration(&unit, 1)?);
    }
    if let (Some(n), Some(unit)) = (caps.name("span_n"), caps.name("span_unit")) {
        let offset = unit_duration(&unit.as_str().to_lowercase(), parse_count(n.as_str())?)?;
        return now.checked_sub_signed(offset);
    }
    if let (Some(n), Some(unit)) = (caps.name("ago_n"), caps.name("ago_unit")) {
        let offset = unit_duration(&unit.as_str().to_lowercase(), parse_count(n.as_str())?)?;
        return now.checked_sub_signed(offset);
    }
    if let (Some(month), Some(day)) = (caps.name("md_month"), caps.name("md_day")) {
        let year = optional_year(caps.name("md_year"), now)?;
        return month_day(year, month.as_str(), day.as_str());
    }
    if let (Some(day), Some(month)) = (caps.name("dm_day"), caps.name("dm_month")) {
        let year = optional_year(caps.name("dm_year"), now)?;
        return month_day(year, month.as_str(), day.as_str());
    }
    if let (Some(day), Some(month), Some(year)) =
        (caps.name("dmy_day"), caps.name("dmy_month"), caps.name("dmy_year"))
    {
        return month_day(year.as_str().parse().ok()?, month.as_str(), day.as_str());
    }
    if let (Some(month), Some(year)) = (caps.name("my_month"), caps.name("my_year")) {
        let year = year.as_str().parse().ok()?;
        return start_of_day(NaiveDate::from_ymd_opt(year, month_number(month.as_str())?, 1)?);
    }
    if let Some(m) = caps.name("weekday") {
        let target: Weekday = m.as_str().parse().ok()?;
        let mut back = (7 + today.weekday().num_days_from_monday()
            - target.num_days_from_monday())
            % 7;
        if back == 0 && caps.name("wd_last").is_some() {
            back = 7;
        }
        return start_of_day(today - Duration::days(i64::from(back)));
    }
    None
}

fn parse_iso(s: &str) -> Option<DateTime<Utc>> {
    let s = s.replacen(' ', "T", 1);

    if let Ok(dt) = DateTime::parse_from_rfc3339(&s) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = DateTime::parse_from_str(&s, "%Y-%m-%dT%H:%M:%S%.f%z") {
        return Some(dt.with_timezone(&Utc));
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(&s, fmt) {
            return Some(naive.and_utc());
        }
    }
    start_of_day(NaiveDate::parse_from_str(&s, "%Y-%m-%d").ok()?)
}

fn start_of_day(date: NaiveDate) -> Option<DateTime<Utc>> {
    date.and_hms_opt(0, 0, 0).map(|n| n.and_utc())
}

fn optional_year(year: Option<regex::Match<'_>>, now: DateTime<Utc>) -> Option<i32> {
    match year {
        Some(y) => y.as_str().parse().ok(),
        None => Some(now.year()),
    }
}

fn month_day(year: i32, month: &str, day: &str) -> Option<DateTime<Utc>> {
    let day = day.parse().ok()?;
    start_of_day(NaiveDate::from_ymd_opt(year, month_number(month)?, day)?)
}

fn month_number(name: &str) -> Option<u32> {
    let prefix: String = name.chars().take(3).collect::<String>().to_lowercase();
    let month = match prefix.as_str() {
        "jan" => 1,
        "feb" => 2,
        "mar" => 3,
        "apr" => 4,
        "may" => 5,
        "jun" => 6,
        "jul" => 7,
        "aug" => 8,
        "sep" => 9,
        "oct" => 10,
        "nov" => 11,
        "dec" => 12,
        _ => return None,
    };
    Some(month)
}

fn parse_count(s: &str) -> Option<i64> {
    let n = match s.to_lowercase().as_str() {
        "a" | "an" | "one" => 1,
        "two" => 2,
        "three" => 3,
        "four" => 4,
        "five" => 5,
        "six" => 6,
        "seven" => 7,
        "eight" => 8,
        "nine" => 9,
        "ten" => 10,
        "eleven" => 11,
        "twelve" => 12,
        digits => digits.parse().ok()?,
    };
    Some(n)
}

fn unit_duration(unit: &str, n: i64) -> Option<Duration> {
    match unit {
        "second" => Duration::try_seconds(n),
        "minute" => Duration::try_minutes(n),
        "hour" => Duration::try_hours(n),
        "day" => Duration::try_days(n),
        "week" => Duration::try_weeks(n),
        "month" => Duration::try_days(n.checked_mul(30)?),
        "year" => Duration::try_days(n.checked_mul(365)?),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    /// Wednesday, 2024-06-12 15:30 UTC.
    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 12, 15, 30, 0).unwrap()
    }

    fn at(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 0, 0, 0).unwrap()
    }

    fn resolved(text: &str) -> Option<DateTime<Utc>> {
        parse_relative_to(text, now()).map(|r| r.at)
    }

    // =========================================================================
    // Keywords
    // =========================================================================

    #[test]
    fn test_yesterday() {
        let reference = parse_relative_to("notes from yesterday", now()).unwrap();
        assert_eq!(reference.at, at(2024, 6, 11));
        assert_eq!(reference.matched, "yesterday");
    }

    #[test]
    fn test_keywords() {
        assert_eq!(resolved("today's notes"), Some(at(2024, 6, 12)));
        assert_eq!(resolved("what did I write tonight"), Some(at(2024, 6, 12)));
        assert_eq!(resolved("due tomorrow"), Some(at(2024, 6, 13)));
        assert_eq!(resolved("day before yesterday"), Some(at(2024, 6, 10)));
    }

    #[test]
    fn test_case_insensitive() {
        assert_eq!(resolved("YESTERDAY"), Some(at(2024, 6, 11)));
        assert_eq!(resolved("Last Week"), Some(now() - Duration::weeks(1)));
    }

    // =========================================================================
    // Relative periods and offsets
    // =========================================================================

    #[test]
    fn test_last_period() {
        assert_eq!(resolved("notes from last week"), Some(now() - Duration::weeks(1)));
        assert_eq!(resolved("past month"), Some(now() - Duration::days(30)));
        assert_eq!(resolved("previous year"), Some(now() - Duration::days(365)));
    }

    #[test]
    fn test_this_period() {
        assert_eq!(resolved("this week"), Some(at(2024, 6, 10)));
        assert_eq!(resolved("this month"), Some(at(2024, 6, 1)));
        assert_eq!(resolved("this year"), Some(at(2024, 1, 1)));
    }

    #[test]
    fn test_spans() {
        assert_eq!(resolved("last 3 days"), Some(now() - Duration::days(3)));
        assert_eq!(resolved("past two weeks"), Some(now() - Duration::weeks(2)));
    }

    #[test]
    fn test_ago() {
        assert_eq!(resolved("3 days ago"), Some(now() - Duration::days(3)));
        assert_eq!(resolved("a week ago"), Some(now() - Duration::weeks(1)));
        assert_eq!(resolved("two hours ago"), Some(now() - Duration::hours(2)));
        assert_eq!(resolved("1 month ago"), Some(now() - Duration::days(30)));
        assert_eq!(resolved("45 minutes ago"), Some(now() - Duration::minutes(45)));
        assert_eq!(resolved("5 seconds ago"), Some(now() - Duration::seconds(5)));
    }

    #[test]
    fn test_huge_offset_is_no_match() {
        assert_eq!(resolved("99999999999999999999 days ago"), None);
        assert_eq!(resolved("9999999999999 years ago"), None);
    }

    // =========================================================================
    // Absolute dates
    // =========================================================================

    #[test]
    fn test_iso_dates() {
        assert_eq!(resolved("since 2024-01-15"), Some(at(2024, 1, 15)));
        assert_eq!(
            resolved("after 2024-01-15T10:30:00Z"),
            Some(Utc.with_ymd_and_hms(2024, 1, 15, 10, 30, 0).unwrap())
        );
        assert_eq!(
            resolved("after 2024-01-15T10:30:00+05:00"),
            Some(Utc.with_ymd_and_hms(2024, 1, 15, 5, 30, 0).unwrap())
        );
        assert_eq!(
            resolved("2024-01-15 10:30"),
            Some(Utc.with_ymd_and_hms(2024, 1, 15, 10, 30, 0).unwrap())
        );
    }

    #[test]
    fn test_slash_date_is_month_first() {
        assert_eq!(resolved("notes since 3/4/2024"), Some(at(2024, 3, 4)));
    }

    #[test]
    fn test_month_names() {
        assert_eq!(resolved("meeting on March 5"), Some(at(2024, 3, 5)));
        assert_eq!(resolved("5th of March 2023"), Some(at(2023, 3, 5)));
        assert_eq!(resolved("June 10, 2023"), Some(at(2023, 6, 10)));
        assert_eq!(resolved("Jan 2023"), Some(at(2023, 1, 1)));
        assert_eq!(resolved("sept. 9"), Some(at(2024, 9, 9)));
        assert_eq!(resolved("2nd may"), Some(at(2024, 5, 2)));
        assert_eq!(resolved("2 of may"), Some(at(2024, 5, 2)));
        assert_eq!(resolved("since 5 March 2023"), Some(at(2023, 3, 5)));
    }

    #[test]
    fn test_bare_day_month_without_year_is_not_a_date() {
        assert_eq!(resolved("version 2 may break"), None);
        assert_eq!(resolved("page 3 dec notes"), None);
    }

    #[test]
    fn test_parts_of_today() {
        assert_eq!(resolved("what I wrote this morning"), Some(at(2024, 6, 12)));
        assert_eq!(resolved("this afternoon"), Some(at(2024, 6, 12)));
        assert_eq!(resolved("This Evening"), Some(at(2024, 6, 12)));
    }

    #[test]
    fn test_weekdays() {
        assert_eq!(resolved("monday"), Some(at(2024, 6, 10)));
        assert_eq!(resolved("last friday"), Some(at(2024, 6, 7)));
        assert_eq!(resolved("wednesday"), Some(at(2024, 6, 12)));
        assert_eq!(resolved("last wednesday"), Some(at(2024, 6, 5)));
    }

    // =========================================================================
    // Scan order and non-matches
    // =========================================================================

    #[test]
    fn test_first_match_wins() {
        assert_eq!(resolved("yesterday or 2024-01-01"), Some(at(2024, 6, 11)));
        assert_eq!(resolved("2024-01-01 or yesterday"), Some(at(2024, 1, 1)));
    }

    #[test]
    fn test_invalid_calendar_date_is_skipped() {
        assert_eq!(resolved("2024-13-45 or yesterday"), Some(at(2024, 6, 11)));
        assert_eq!(resolved("February 30"), None);
    }

    #[test]
    fn test_no_match() {
        assert_eq!(resolved("meeting project"), None);
        assert_eq!(resolved(""), None);
        assert_eq!(resolved("todayish nowhere mondays"), None);
        assert_eq!(resolved("I may go"), None);
    }

    #[test]
    fn test_parse_uses_current_time() {
        let reference = parse("yesterday").unwrap();
        let expected = start_of_day(Utc::now().date_naive() - Duration::days(1)).unwrap();
        // Allow for a midnight rollover between the two clock reads.
        assert!(reference.at == expected || reference.at == expected + Duration::days(1));
    }
}
