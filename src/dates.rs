//! Calendar helpers: start-of-day and week boundaries, lenient timestamp
//! parsing for stored records, and natural-language due-date entry.
//!
//! Nothing in here reads the wall clock. Callers pass `today` or `now` in,
//! so every date-relative rule can be pinned in tests.

use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime, Weekday};

/// Midnight at the start of the day containing `now`.
pub fn start_of_day(now: NaiveDateTime) -> NaiveDateTime {
    now.date().and_time(NaiveTime::MIN)
}

/// Monday and Sunday of the week containing `today`.
pub fn week_bounds(today: NaiveDate) -> (NaiveDate, NaiveDate) {
    let week = today.week(Weekday::Mon);
    (week.first_day(), week.last_day())
}

/// Parse a timestamp as stored by the record API.
///
/// Accepts RFC 3339 (the offset is dropped, keeping the local wall time),
/// `YYYY-MM-DDTHH:MM[:SS[.fff]]`, the same with a space separator, and a bare
/// `YYYY-MM-DD`, which becomes an all-day value at midnight. Anything else is
/// malformed and yields `None`.
pub fn parse_timestamp(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_local());
    }
    const FORMATS: [&str; 4] = [
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%d %H:%M",
    ];
    for fmt in FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt);
        }
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .map(|d| d.and_time(NaiveTime::MIN))
}

/// Format a timestamp the way the record API stores it.
pub fn format_timestamp(dt: NaiveDateTime) -> String {
    if dt.time() == NaiveTime::MIN {
        dt.format("%Y-%m-%d").to_string()
    } else {
        dt.format("%Y-%m-%dT%H:%M:%S").to_string()
    }
}

/// Parse human-readable due date input relative to `today`.
///
/// Supports:
/// - "today", "tomorrow", "yesterday"
/// - "monday" .. "sunday" (and short forms), "next friday", "this friday"
/// - "end of week", "end of month", "this weekend"
/// - "in 3d", "in 2w", "in 1m"
/// - "YYYY-MM-DD", or any stored timestamp format
///
/// A trailing "HH:MM" sets the time of day ("tomorrow 14:30"); without it the
/// result is an all-day value at midnight.
pub fn parse_due_input(s: &str, today: NaiveDate) -> Option<NaiveDateTime> {
    if let Some(dt) = parse_timestamp(s) {
        return Some(dt);
    }
    let s = s.trim().to_lowercase();

    let (day_part, time) = match s.rsplit_once(' ') {
        Some((head, tail)) => match NaiveTime::parse_from_str(tail, "%H:%M") {
            Ok(t) => (head.trim().to_string(), t),
            Err(_) => (s.clone(), NaiveTime::MIN),
        },
        None => (s.clone(), NaiveTime::MIN),
    };

    parse_due_day(&day_part, today).map(|d| d.and_time(time))
}

fn parse_due_day(s: &str, today: NaiveDate) -> Option<NaiveDate> {
    match s {
        "today" => return Some(today),
        "tomorrow" => return Some(today + Duration::days(1)),
        "yesterday" => return Some(today - Duration::days(1)),
        "end of week" | "eow" => {
            let (_, end) = week_bounds(today);
            return Some(end);
        }
        "end of month" | "eom" => {
            let (year, month) = if today.month() == 12 {
                (today.year() + 1, 1)
            } else {
                (today.year(), today.month() + 1)
            };
            let first_of_next = NaiveDate::from_ymd_opt(year, month, 1)?;
            return Some(first_of_next - Duration::days(1));
        }
        "this weekend" | "weekend" => {
            let days_until_saturday = (5 + 7 - today.weekday().num_days_from_monday()) % 7;
            return Some(today + Duration::days(days_until_saturday as i64));
        }
        _ => {}
    }

    if let Some(rest) = s.strip_prefix("in ") {
        let rest = rest.trim();
        let split = rest.char_indices().last().map_or(0, |(i, _)| i);
        let (num, unit) = rest.split_at(split);
        if let Ok(n) = num.trim().parse::<i64>() {
            // Out-of-range offsets are unrecognised input, not a panic.
            let delta = match unit {
                "d" => Duration::try_days(n),
                "w" => Duration::try_weeks(n),
                // Approximate: 30 days per month
                "m" => n.checked_mul(30).and_then(Duration::try_days),
                _ => return None,
            };
            return delta.and_then(|d| today.checked_add_signed(d));
        }
    }

    let weekdays = [
        ("monday", 0), ("tuesday", 1), ("wednesday", 2), ("thursday", 3),
        ("friday", 4), ("saturday", 5), ("sunday", 6),
        ("mon", 0), ("tue", 1), ("wed", 2), ("thu", 3),
        ("fri", 4), ("sat", 5), ("sun", 6),
    ];
    let current = today.weekday().num_days_from_monday() as i64;
    for (name, target) in weekdays {
        let days_ahead = (target + 7 - current) % 7;
        if s == name || s == format!("this {name}") {
            return Some(today + Duration::days(days_ahead));
        }
        if s == format!("next {name}") {
            let days = if days_ahead == 0 { 7 } else { days_ahead + 7 };
            return Some(today + Duration::days(days));
        }
    }

    None
}

/// Format a due timestamp relative to today ("Today, 14:30", "Tomorrow",
/// "in 3d", "2d late").
pub fn format_due_relative(due: Option<NaiveDateTime>, today: NaiveDate) -> String {
    let Some(due) = due else {
        return "No due date".into();
    };
    let days = (due.date() - today).num_days();
    let day = match days {
        0 => "Today".to_string(),
        1 => "Tomorrow".to_string(),
        d if d > 1 => format!("in {d}d"),
        d => format!("{}d late", -d),
    };
    if due.time() == NaiveTime::MIN {
        day
    } else {
        format!("{day}, {}", due.format("%H:%M"))
    }
}
