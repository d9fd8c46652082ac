//! Cron expression parser and next-occurrence projection.
//! Supports: "MIN HOUR DOM MON DOW" (5-field, no seconds)
//! Field syntax: *, N, N-M, */S, N-M/S, and comma lists of those.
//! DOW accepts 0-7 where both 0 and 7 mean Sunday.
//!
//! No cron crate dependency, and no timezone conversion: the result lives
//! in the same reference frame as the `after` instant.

use chrono::{DateTime, Datelike, Duration, NaiveDate, TimeZone, Timelike, Utc};

/// Days scanned before giving up. Four years covers any leap-day schedule;
/// anything unmatched past that (e.g. "0 0 31 2 *") can never fire.
const SEARCH_DAYS: i64 = 4 * 366;

/// Compute the earliest occurrence strictly after `after`, with seconds
/// zeroed. Returns `None` for an invalid expression or one that can never
/// match.
pub fn next_occurrence(expression: &str, after: DateTime<Utc>) -> Option<DateTime<Utc>> {
    let parts: Vec<&str> = expression.split_whitespace().collect();
    if parts.len() != 5 {
        tracing::debug!(
            "Invalid cron expression: '{}' (need 5 fields: MIN HOUR DOM MON DOW)",
            expression
        );
        return None;
    }

    let minutes = parse_field(parts[0], 0, 59)?;
    let hours = parse_field(parts[1], 0, 23)?;
    let dom = parse_field(parts[2], 1, 31)?;
    let months = parse_field(parts[3], 1, 12)?;
    let dow = parse_dow(parts[4])?;

    // First candidate is the next whole minute strictly after `after`.
    let start = (after + Duration::minutes(1))
        .with_second(0)?
        .with_nanosecond(0)?;
    let start_day = start.date_naive();

    let mut day = start_day;
    let horizon = start_day + Duration::days(SEARCH_DAYS);
    while day <= horizon {
        if day_matches(day, &dom, &months, &dow) {
            // On the first day, slots before `start` are already in the past.
            let floor = (day == start_day).then(|| (start.hour(), start.minute()));
            if let Some((hour, minute)) = first_slot(&hours, &minutes, floor) {
                let naive = day.and_hms_opt(hour, minute, 0)?;
                return Some(Utc.from_utc_datetime(&naive));
            }
        }
        day += Duration::days(1);
    }
    None
}

/// A parsed cron field: the matching values, plus whether the field was a
/// bare `*` (which matters for the day-of-month/day-of-week rule).
struct Field {
    values: Vec<u32>,
    is_wildcard: bool,
}

impl Field {
    fn contains(&self, value: u32) -> bool {
        self.values.binary_search(&value).is_ok()
    }
}

/// Parse a cron field into its sorted list of matching values.
fn parse_field(field: &str, min: u32, max: u32) -> Option<Field> {
    let mut values = Vec::new();
    for item in field.split(',') {
        values.extend(parse_item(item.trim(), min, max)?);
    }
    if values.is_empty() {
        return None;
    }
    values.sort_unstable();
    values.dedup();
    Some(Field {
        values,
        is_wildcard: field == "*",
    })
}

/// Parse one comma-list item: *, N, N-M, */S, or N-M/S.
fn parse_item(item: &str, min: u32, max: u32) -> Option<Vec<u32>> {
    let (range, step) = match item.split_once('/') {
        Some((range, step)) => {
            let step: u32 = step.parse().ok()?;
            if step == 0 {
                return None;
            }
            (range, step as usize)
        }
        None => (item, 1),
    };

    let (lo, hi) = if range == "*" {
        (min, max)
    } else if let Some((a, b)) = range.split_once('-') {
        (a.parse().ok()?, b.parse().ok()?)
    } else {
        let n: u32 = range.parse().ok()?;
        (n, n)
    };

    if lo < min || hi > max || lo > hi {
        return None;
    }
    Some((lo..=hi).step_by(step).collect())
}

/// Day-of-week field: 0-7 allowed, 7 folded onto Sunday (0).
fn parse_dow(field: &str) -> Option<Field> {
    let mut parsed = parse_field(field, 0, 7)?;
    if parsed.values.contains(&7) {
        parsed.values.retain(|&v| v != 7);
        parsed.values.insert(0, 0);
        parsed.values.dedup();
    }
    Some(parsed)
}

/// Conventional cron day rule: month must match; when both DOM and DOW are
/// restricted (neither is `*`), the day matches if either one does,
/// otherwise both apply.
fn day_matches(day: NaiveDate, dom: &Field, months: &Field, dow: &Field) -> bool {
    if !months.contains(day.month()) {
        return false;
    }
    let dom_hit = dom.contains(day.day());
    let dow_hit = dow.contains(day.weekday().num_days_from_sunday());
    if !dom.is_wildcard && !dow.is_wildcard {
        dom_hit || dow_hit
    } else {
        dom_hit && dow_hit
    }
}

/// Earliest (hour, minute) pair at or after `floor`, if any.
fn first_slot(hours: &Field, minutes: &Field, floor: Option<(u32, u32)>) -> Option<(u32, u32)> {
    for &hour in &hours.values {
        for &minute in &minutes.values {
            match floor {
                Some((fh, fm)) if hour < fh || (hour == fh && minute < fm) => continue,
                _ => return Some((hour, minute)),
            }
        }
    }
    None
}
