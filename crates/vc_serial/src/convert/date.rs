//! Date and duration text forms.

use alloc::format;
use alloc::string::String;
use core::fmt::Write;

use chrono::{
    DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta, Timelike, Utc,
};

use crate::Format;
use crate::config::{Config, DateHandler, TimeSpanHandler};
use crate::value::DateValue;

const NANOS_PER_TICK: u32 = 100;
const TICKS_PER_SECOND: i64 = 10_000_000;
const SECONDS_PER_DAY: i64 = 86_400;

// -----------------------------------------------------------------------------
// Dates

/// A date lowered for one format.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DateToken {
    /// Plain text, escaped and quoted by the writer.
    Text(String),
    /// JSON string content that is already escaped, such as `\/Date(0)\/`.
    Escaped(String),
    /// A number, written unquoted.
    Number(i64),
}

/// Formats `date` for `format` under the date settings of `config`.
///
/// ```
/// use chrono::DateTime;
/// use vc_serial::{Format, config::Config, convert::date::{DateToken, format_date}};
/// use vc_serial::value::DateValue;
///
/// let utc = DateValue::Utc(DateTime::from_timestamp_millis(1_000).unwrap());
/// let config = Config::default();
/// assert_eq!(format_date(utc, &config, Format::Json), DateToken::Escaped(r"\/Date(1000)\/".into()));
/// assert_eq!(format_date(utc, &config, Format::Jsv), DateToken::Text("1970-01-01T00:00:01Z".into()));
/// ```
pub fn format_date(date: DateValue, config: &Config, format: Format) -> DateToken {
    match config.date_handler {
        DateHandler::TimestampOffset | DateHandler::DcjsCompatible => {
            if format == Format::Json {
                DateToken::Escaped(wcf_date(date, config))
            } else {
                DateToken::Text(xsd_short(date))
            }
        }
        DateHandler::Iso8601 => DateToken::Text(iso8601(date, config)),
        DateHandler::Iso8601DateOnly => {
            DateToken::Text(format!("{}", date.to_naive().format("%Y-%m-%d")))
        }
        DateHandler::Iso8601DateTime => {
            DateToken::Text(format!("{}", date.to_naive().format("%Y-%m-%d %H:%M:%S")))
        }
        DateHandler::Rfc1123 => {
            DateToken::Text(format!("{}", date.to_utc().format("%a, %d %b %Y %H:%M:%S GMT")))
        }
        DateHandler::UnixTime => DateToken::Number(date.to_utc().timestamp()),
        DateHandler::UnixTimeMs => DateToken::Number(date.to_utc().timestamp_millis()),
    }
}

fn wcf_date(date: DateValue, config: &Config) -> String {
    let (millis, suffix) = match date {
        DateValue::Utc(v) if config.append_utc_offset => (v.timestamp_millis(), String::from("+0000")),
        DateValue::Utc(v) => (v.timestamp_millis(), String::new()),
        DateValue::Offset(v) => (v.timestamp_millis(), compact_offset(*v.offset())),
        DateValue::Naive(_) | DateValue::Date(_) => {
            let millis = date.to_utc().timestamp_millis();
            match config.date_handler {
                DateHandler::DcjsCompatible => (millis, String::new()),
                _ => (millis, String::from("-0000")),
            }
        }
    };
    format!(r"\/Date({millis}{suffix})\/")
}

/// `yyyy-MM-dd` at midnight, otherwise ISO-8601 with trimmed fraction.
fn xsd_short(date: DateValue) -> String {
    let naive = date.to_naive();
    let midnight = naive.time() == NaiveTime::MIN;
    match date {
        DateValue::Date(v) => format!("{}", v.format("%Y-%m-%d")),
        DateValue::Naive(_) | DateValue::Utc(_) if midnight => {
            format!("{}", naive.format("%Y-%m-%d"))
        }
        DateValue::Naive(v) => iso_local(v),
        DateValue::Utc(v) => iso_local(v.naive_utc()) + "Z",
        DateValue::Offset(v) => iso_local(v.naive_local()) + &iso_offset(*v.offset()),
    }
}

fn iso8601(date: DateValue, config: &Config) -> String {
    match date {
        DateValue::Date(v) => format!("{}", v.format("%Y-%m-%d")),
        DateValue::Naive(v) if config.assume_utc => iso_local(v) + "Z",
        DateValue::Naive(v) => iso_local(v),
        DateValue::Utc(v) => iso_local(v.naive_utc()) + "Z",
        DateValue::Offset(v) if config.skip_date_time_conversion => {
            iso_local(v.naive_local()) + &iso_offset(*v.offset())
        }
        DateValue::Offset(v) => iso_local(v.naive_utc()) + "Z",
    }
}

fn iso_local(v: NaiveDateTime) -> String {
    let mut text = format!("{}", v.format("%Y-%m-%dT%H:%M:%S"));
    push_fraction(&mut text, v.nanosecond());
    text
}

/// Appends `.f` with at most seven digits and no trailing zeros.
fn push_fraction(text: &mut String, nanos: u32) {
    let ticks = (nanos / NANOS_PER_TICK).min(9_999_999);
    if ticks == 0 {
        return;
    }
    let digits = format!("{ticks:07}");
    text.push('.');
    text.push_str(digits.trim_end_matches('0'));
}

fn compact_offset(offset: FixedOffset) -> String {
    let seconds = offset.local_minus_utc();
    let sign = if seconds < 0 { '-' } else { '+' };
    let seconds = seconds.unsigned_abs();
    format!("{sign}{:02}{:02}", seconds / 3600, seconds % 3600 / 60)
}

fn iso_offset(offset: FixedOffset) -> String {
    let seconds = offset.local_minus_utc();
    let sign = if seconds < 0 { '-' } else { '+' };
    let seconds = seconds.unsigned_abs();
    format!("{sign}{:02}:{:02}", seconds / 3600, seconds % 3600 / 60)
}

/// Reads any date form produced by [`format_date`], plus RFC 1123 and
/// ISO-8601 with a space separator.
///
/// Bare numbers are not dates here; see [`from_unix`].
pub fn parse_date(text: &str) -> Option<DateValue> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    if let Some(date) = parse_wcf(text) {
        return Some(date);
    }
    if text.len() == 10
        && let Ok(date) = NaiveDate::parse_from_str(text, "%Y-%m-%d")
    {
        return Some(DateValue::Date(date));
    }
    if let Some(local) = text.strip_suffix(['Z', 'z'])
        && let Some(v) = parse_naive(local)
    {
        return Some(DateValue::Utc(v.and_utc()));
    }
    if let Some(v) = parse_naive(text) {
        return Some(DateValue::Naive(v));
    }
    for pattern in ["%Y-%m-%dT%H:%M:%S%.f%:z", "%Y-%m-%d %H:%M:%S%.f%:z", "%Y-%m-%dT%H:%M:%S%.f%z"] {
        if let Ok(v) = DateTime::parse_from_str(text, pattern) {
            return Some(offset_or_utc(v));
        }
    }
    if (text.contains(',') || text.ends_with("GMT"))
        && let Ok(v) = DateTime::parse_from_rfc2822(text)
    {
        return Some(offset_or_utc(v));
    }
    None
}

fn offset_or_utc(v: DateTime<FixedOffset>) -> DateValue {
    if v.offset().local_minus_utc() == 0 {
        DateValue::Utc(v.with_timezone(&Utc))
    } else {
        DateValue::Offset(v)
    }
}

fn parse_naive(text: &str) -> Option<NaiveDateTime> {
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"]
        .into_iter()
        .find_map(|pattern| NaiveDateTime::parse_from_str(text, pattern).ok())
}

fn parse_wcf(text: &str) -> Option<DateValue> {
    let body = text
        .strip_prefix(r"\/Date(")
        .or_else(|| text.strip_prefix("/Date("))?;
    let body = body
        .strip_suffix(r")\/")
        .or_else(|| body.strip_suffix(")/"))
        .or_else(|| body.strip_suffix(')'))?;

    // the millisecond part may itself start with `-`
    let split = body
        .char_indices()
        .skip(1)
        .find(|(_, c)| matches!(c, '+' | '-'))
        .map(|(i, _)| i);
    let (millis, offset) = match split {
        Some(i) => body.split_at(i),
        None => (body, ""),
    };
    let instant = DateTime::from_timestamp_millis(millis.parse().ok()?)?;

    match offset {
        "" | "+0000" => Some(DateValue::Utc(instant)),
        "-0000" => Some(DateValue::Naive(instant.naive_utc())),
        _ => {
            let sign = if offset.starts_with('-') { -1 } else { 1 };
            let digits = &offset[1..];
            if digits.len() != 4 {
                return None;
            }
            let hours: i32 = digits[..2].parse().ok()?;
            let minutes: i32 = digits[2..].parse().ok()?;
            let offset = FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))?;
            Some(DateValue::Offset(instant.with_timezone(&offset)))
        }
    }
}

/// A date from a unix timestamp: seconds under
/// [`DateHandler::UnixTime`], milliseconds otherwise.
pub fn from_unix(value: i64, config: &Config) -> Option<DateValue> {
    let instant = match config.date_handler {
        DateHandler::UnixTime => DateTime::from_timestamp(value, 0)?,
        _ => DateTime::from_timestamp_millis(value)?,
    };
    Some(DateValue::Utc(instant))
}

// -----------------------------------------------------------------------------
// Durations

/// Formats a duration under `handler`.
///
/// ```
/// use chrono::TimeDelta;
/// use vc_serial::config::TimeSpanHandler;
/// use vc_serial::convert::date::format_time_span;
///
/// let span = TimeDelta::hours(26) + TimeDelta::milliseconds(1500);
/// assert_eq!(format_time_span(span, TimeSpanHandler::DurationFormat), "P1DT2H1.5S");
/// assert_eq!(format_time_span(span, TimeSpanHandler::StandardFormat), "1.02:00:01.5000000");
/// assert_eq!(format_time_span(TimeDelta::zero(), TimeSpanHandler::DurationFormat), "PT0S");
/// ```
pub fn format_time_span(span: TimeDelta, handler: TimeSpanHandler) -> String {
    let negative = span < TimeDelta::zero();
    let span = span.abs();
    let total_seconds = span.num_seconds();
    let ticks = i64::from(span.subsec_nanos().unsigned_abs() / NANOS_PER_TICK);

    let days = total_seconds / SECONDS_PER_DAY;
    let hours = total_seconds % SECONDS_PER_DAY / 3600;
    let minutes = total_seconds % 3600 / 60;
    let seconds = total_seconds % 60;

    let mut text = String::new();
    if negative {
        text.push('-');
    }

    match handler {
        TimeSpanHandler::DurationFormat => {
            if total_seconds == 0 && ticks == 0 {
                return String::from("PT0S");
            }
            text.push('P');
            if days > 0 {
                let _ = write!(text, "{days}D");
            }
            if hours > 0 || minutes > 0 || seconds > 0 || ticks > 0 {
                text.push('T');
                if hours > 0 {
                    let _ = write!(text, "{hours}H");
                }
                if minutes > 0 {
                    let _ = write!(text, "{minutes}M");
                }
                if seconds > 0 || ticks > 0 {
                    let _ = write!(text, "{seconds}");
                    if ticks > 0 {
                        let digits = format!("{ticks:07}");
                        text.push('.');
                        text.push_str(digits.trim_end_matches('0'));
                    }
                    text.push('S');
                }
            }
        }
        TimeSpanHandler::StandardFormat => {
            if days > 0 {
                let _ = write!(text, "{days}.");
            }
            let _ = write!(text, "{hours:02}:{minutes:02}:{seconds:02}");
            if ticks > 0 {
                let _ = write!(text, ".{ticks:07}");
            }
        }
    }
    text
}

/// Reads the XSD and standard duration forms.
pub fn parse_time_span(text: &str) -> Option<TimeDelta> {
    let text = text.trim();
    let (negative, body) = match text.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, text),
    };
    let ticks = if let Some(body) = body.strip_prefix('P') {
        parse_xsd_ticks(body)?
    } else {
        parse_standard_ticks(body)?
    };
    let ticks = if negative { -ticks } else { ticks };
    Some(from_ticks(ticks))
}

/// A duration from a count of 100ns ticks.
pub fn from_ticks(ticks: i64) -> TimeDelta {
    TimeDelta::seconds(ticks / TICKS_PER_SECOND)
        + TimeDelta::nanoseconds(ticks % TICKS_PER_SECOND * i64::from(NANOS_PER_TICK))
}

/// Parses a digit run with an optional fraction into ticks of `unit` seconds.
fn component_ticks(number: &str, unit_seconds: i64) -> Option<i64> {
    let (whole, fraction) = number.split_once('.').unwrap_or((number, ""));
    if whole.is_empty() && fraction.is_empty() {
        return None;
    }
    let whole: i64 = if whole.is_empty() { 0 } else { whole.parse().ok()? };
    let mut ticks = whole.checked_mul(unit_seconds)?.checked_mul(TICKS_PER_SECOND)?;
    if !fraction.is_empty() {
        if !fraction.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        let digits: String = fraction.chars().chain(core::iter::repeat('0')).take(7).collect();
        let fraction_ticks: i64 = digits.parse().ok()?;
        ticks = ticks.checked_add(fraction_ticks.checked_mul(unit_seconds)?)?;
    }
    Some(ticks)
}

fn parse_xsd_ticks(body: &str) -> Option<i64> {
    let mut ticks = 0_i64;
    let mut in_time = false;
    let mut number = String::new();
    let mut any = false;
    for c in body.chars() {
        match c {
            'T' => in_time = true,
            '0'..='9' | '.' => number.push(c),
            unit => {
                let seconds = match (unit, in_time) {
                    ('D', false) => SECONDS_PER_DAY,
                    ('H', true) => 3600,
                    ('M', true) => 60,
                    ('S', true) => 1,
                    _ => return None,
                };
                ticks = ticks.checked_add(component_ticks(&number, seconds)?)?;
                number.clear();
                any = true;
            }
        }
    }
    (any && number.is_empty()).then_some(ticks)
}

fn parse_standard_ticks(body: &str) -> Option<i64> {
    let (days, clock) = match body.split_once('.') {
        Some((days, rest)) if rest.contains(':') && !days.contains(':') => (days.parse::<i64>().ok()?, rest),
        _ => (0, body),
    };
    let mut parts = clock.splitn(3, ':');
    let hours: i64 = parts.next()?.parse().ok()?;
    let minutes: i64 = parts.next()?.parse().ok()?;
    let seconds = component_ticks(parts.next().unwrap_or("0"), 1)?;
    let whole = days
        .checked_mul(SECONDS_PER_DAY)?
        .checked_add(hours * 3600 + minutes * 60)?
        .checked_mul(TICKS_PER_SECOND)?;
    whole.checked_add(seconds)
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use chrono::{DateTime, FixedOffset, NaiveDate, TimeDelta};

    use super::{DateToken, format_date, format_time_span, parse_date, parse_time_span};
    use crate::Format;
    use crate::config::{Config, DateHandler, TimeSpanHandler};
    use crate::value::DateValue;

    fn utc(millis: i64) -> DateValue {
        DateValue::Utc(DateTime::from_timestamp_millis(millis).unwrap())
    }

    #[test]
    fn wcf_forms() {
        let config = Config::default();
        let naive = DateValue::Naive(DateTime::from_timestamp_millis(5).unwrap().naive_utc());
        let offset = FixedOffset::east_opt(5 * 3600 + 30 * 60).unwrap();
        let zoned = DateValue::Offset(DateTime::from_timestamp_millis(5).unwrap().with_timezone(&offset));

        assert_eq!(format_date(naive, &config, Format::Json), DateToken::Escaped(r"\/Date(5-0000)\/".into()));
        assert_eq!(format_date(zoned, &config, Format::Json), DateToken::Escaped(r"\/Date(5+0530)\/".into()));

        let appended = Config { append_utc_offset: true, ..Config::default() };
        assert_eq!(format_date(utc(5), &appended, Format::Json), DateToken::Escaped(r"\/Date(5+0000)\/".into()));

        for date in [utc(5), naive, zoned, utc(-86_400_000)] {
            let DateToken::Escaped(text) = format_date(date, &config, Format::Json) else {
                panic!("expected escaped text");
            };
            assert_eq!(parse_date(&text), Some(date));
        }
    }

    #[test]
    fn xsd_short_forms() {
        let config = Config::default();
        let midnight = DateValue::Naive(NaiveDate::from_ymd_opt(2024, 2, 29).unwrap().and_hms_opt(0, 0, 0).unwrap());
        assert_eq!(format_date(midnight, &config, Format::Jsv), DateToken::Text("2024-02-29".into()));

        let precise = DateValue::Utc(
            NaiveDate::from_ymd_opt(2024, 2, 29).unwrap().and_hms_nano_opt(1, 2, 3, 120_000_000).unwrap().and_utc(),
        );
        let DateToken::Text(text) = format_date(precise, &config, Format::Csv) else {
            panic!("expected text");
        };
        assert_eq!(text, "2024-02-29T01:02:03.12Z");
        assert_eq!(parse_date(&text), Some(precise));
    }

    #[test]
    fn other_handlers() {
        let date = utc(1_700_000_000_123);
        let with = |handler| Config { date_handler: handler, ..Config::default() };

        assert_eq!(
            format_date(date, &with(DateHandler::Iso8601), Format::Json),
            DateToken::Text("2023-11-14T22:13:20.123Z".into())
        );
        assert_eq!(format_date(date, &with(DateHandler::UnixTime), Format::Json), DateToken::Number(1_700_000_000));
        assert_eq!(format_date(date, &with(DateHandler::UnixTimeMs), Format::Jsv), DateToken::Number(1_700_000_000_123));

        let DateToken::Text(rfc) = format_date(date, &with(DateHandler::Rfc1123), Format::Json) else {
            panic!("expected text");
        };
        assert_eq!(rfc, "Tue, 14 Nov 2023 22:13:20 GMT");
        assert_eq!(parse_date(&rfc), Some(utc(1_700_000_000_000)));
    }

    #[test]
    fn durations() {
        let cases = [
            (TimeDelta::zero(), "PT0S"),
            (TimeDelta::seconds(90), "PT1M30S"),
            (TimeDelta::days(2), "P2D"),
            (-TimeDelta::minutes(5), "-PT5M"),
            (TimeDelta::nanoseconds(100), "PT0.0000001S"),
        ];
        for (span, text) in cases {
            assert_eq!(format_time_span(span, TimeSpanHandler::DurationFormat), text);
            assert_eq!(parse_time_span(text), Some(span));
        }

        let span = -(TimeDelta::days(3) + TimeDelta::seconds(61));
        let text = format_time_span(span, TimeSpanHandler::StandardFormat);
        assert_eq!(text, "-3.00:01:01");
        assert_eq!(parse_time_span(&text), Some(span));
        assert_eq!(parse_time_span("01:30:00"), Some(TimeDelta::minutes(90)));
        assert_eq!(parse_time_span("P1X"), None);
    }
}
