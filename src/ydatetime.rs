//! Listing date/time parsing.
//!
//! Listings give the airing date and time as two separate fragments, e.g.
//! `"1/1（水）"` and `"23:00～25:00"`. Hours past 23 continue the broadcast
//! day into the next calendar day, so `25:00` is 01:00 the following morning.
//!
//! The year is never part of the input. It is taken from the current date at
//! the requested offset, so `"12/31"` parsed in January lands in the current
//! year rather than the previous one.

use chrono::{DateTime, Datelike, Duration, FixedOffset, NaiveDate, NaiveTime, Utc};
use regex::{Captures, Regex};
use serde::Serialize;

use crate::config::default_offset;
use crate::errors::*;

// A `/` right after the day may not start a third numeric field ("1/1/2024").
const DATE_PATTERN: &str = r"^(\d{1,2})/(\d{1,2})(?:$|/$|/[^\d]|[^\d/])";
// A single trailing newline is tolerated, as scraped fields often carry one.
const TIME_PATTERN: &str = r"^(\d{1,2}):(\d{1,2})[^\d]+(\d{1,2}):(\d{1,2})\n?$";
const DECIMAL_DIGIT_PATTERN: &str = r"^\p{Nd}$";

/// Start and end of an airing, both at the listing offset.
///
/// The pair is kept exactly as computed; `end` is not forced to follow `start`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateTimeRange {
    pub start: DateTime<FixedOffset>,
    pub end: DateTime<FixedOffset>,
}

impl DateTimeRange {
    /// Length of the airing. Negative when the listing ends before it starts.
    pub fn duration(&self) -> Duration {
        self.end - self.start
    }

    /// Whether the airing ends on a later calendar day than it starts.
    pub fn spans_midnight(&self) -> bool {
        self.end.date_naive() > self.start.date_naive()
    }

    /// Inclusive bounds check.
    pub fn contains<Tz: chrono::TimeZone>(&self, instant: &DateTime<Tz>) -> bool {
        *instant >= self.start && *instant <= self.end
    }
}

impl From<(DateTime<FixedOffset>, DateTime<FixedOffset>)> for DateTimeRange {
    fn from((start, end): (DateTime<FixedOffset>, DateTime<FixedOffset>)) -> Self {
        DateTimeRange { start, end }
    }
}

/// Convert a listing date and time range into start and end timestamps.
///
/// # Arguments
/// * `ydate` - Date fragment such as `"1/1（水）"`
/// * `ytime` - Time range fragment such as `"23:00～25:00"`
/// * `offset` - Offset the listing times are expressed in
pub fn convert_to_datetimes(
    ydate: &str,
    ytime: &str,
    offset: FixedOffset,
) -> Result<(DateTime<FixedOffset>, DateTime<FixedOffset>)> {
    convert_to_datetimes_at(ydate, ytime, Utc::now().with_timezone(&offset))
}

/// [`convert_to_datetimes`] at the default +09:00 offset.
pub fn convert_to_datetimes_default(
    ydate: &str,
    ytime: &str,
) -> Result<(DateTime<FixedOffset>, DateTime<FixedOffset>)> {
    convert_to_datetimes(ydate, ytime, default_offset())
}

/// Same as [`convert_to_datetimes`], with the clock supplied by the caller.
/// The year comes from `now` and results use `now`'s offset.
pub fn convert_to_datetimes_at(
    ydate: &str,
    ytime: &str,
    now: DateTime<FixedOffset>,
) -> Result<(DateTime<FixedOffset>, DateTime<FixedOffset>)> {
    if ydate.is_empty() || ytime.is_empty() {
        return Err(Error::invalid("ydate and ytime are required"));
    }

    let date = parse_date(ydate, now)?;
    let (start, end) = parse_time_range(ytime)?;

    let midnight = date
        .and_time(NaiveTime::MIN)
        .and_local_timezone(*now.offset())
        .single()
        .context(&format!("ydate is invalid: {}", ydate))?;

    let range = (midnight + start, midnight + end);
    log::debug!(
        "Converted {:?} {:?} to {} - {}",
        ydate,
        ytime,
        range.0.to_rfc3339(),
        range.1.to_rfc3339()
    );
    Ok(range)
}

/// Month and day from the start of `ydate`, in the year of `now`.
pub(crate) fn parse_date(ydate: &str, now: DateTime<FixedOffset>) -> Result<NaiveDate> {
    let re = Regex::new(DATE_PATTERN)?;
    let decimal = Regex::new(DECIMAL_DIGIT_PATTERN)?;
    let invalid = || Error::invalid(format!("ydate is invalid: {}", ydate));

    let caps = re.captures(ydate).ok_or_else(invalid)?;
    let month = capture_number(&caps, 1, &decimal).ok_or_else(invalid)?;
    let day = capture_number(&caps, 2, &decimal).ok_or_else(invalid)?;

    NaiveDate::from_ymd_opt(now.year(), month, day).ok_or_else(invalid)
}

/// Start and end of `ytime` as offsets from midnight. Hours are not capped at 23.
pub(crate) fn parse_time_range(ytime: &str) -> Result<(Duration, Duration)> {
    let re = Regex::new(TIME_PATTERN)?;
    let decimal = Regex::new(DECIMAL_DIGIT_PATTERN)?;
    let invalid = || Error::invalid(format!("ytime is invalid: {}", ytime));

    let caps = re.captures(ytime).ok_or_else(invalid)?;
    let mut fields = [0u32; 4];
    for (i, field) in fields.iter_mut().enumerate() {
        *field = capture_number(&caps, i + 1, &decimal).ok_or_else(invalid)?;
    }
    let [start_hour, start_minute, end_hour, end_minute] = fields;

    Ok((
        hours_minutes(start_hour, start_minute),
        hours_minutes(end_hour, end_minute),
    ))
}

fn hours_minutes(hours: u32, minutes: u32) -> Duration {
    Duration::hours(hours as i64) + Duration::minutes(minutes as i64)
}

// `\d` matches any Unicode decimal digit, not just ASCII.
fn capture_number(caps: &Captures, index: usize, decimal: &Regex) -> Option<u32> {
    caps.get(index)?
        .as_str()
        .chars()
        .try_fold(0u32, |acc, c| Some(acc * 10 + digit_value(c, decimal)?))
}

// Decimal digits are encoded in contiguous runs of ten, zero first, so a
// digit's value is its distance from the start of its block modulo ten.
fn digit_value(c: char, decimal: &Regex) -> Option<u32> {
    if let Some(d) = c.to_digit(10) {
        return Some(d);
    }

    let is_decimal = |c: char| decimal.is_match(c.encode_utf8(&mut [0u8; 4]));
    if !is_decimal(c) {
        return None;
    }

    let mut zero = c as u32;
    while let Some(prev) = zero.checked_sub(1).and_then(char::from_u32) {
        if !is_decimal(prev) {
            break;
        }
        zero -= 1;
    }
    Some((c as u32 - zero) % 10)
}
