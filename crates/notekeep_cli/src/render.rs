//! Terminal rendering for notes.

use chrono::{DateTime, Utc};
use notekeep_core::Note;

const EXCERPT_CHARS: usize = 120;

/// Human distance between `then` and `now`, e.g. `5 minutes ago`.
pub fn relative_to(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let seconds = (now - then).num_seconds();
    let words = distance_words(seconds.abs());
    if seconds < 0 {
        format!("in {words}")
    } else {
        format!("{words} ago")
    }
}

/// Buckets follow date-fns `formatDistance` without seconds: minutes are
/// rounded, then 45 min, 90 min, 24 h, 42 h, 30 days, 60 days and 365 days
/// mark the unit changes, with quarter-year qualifiers past one year.
fn distance_words(seconds: i64) -> String {
    const HOUR: i64 = 60;
    const DAY: i64 = 24 * HOUR;
    const MONTH: i64 = 30 * DAY;
    const YEAR: i64 = 365 * DAY;

    let minutes = rounded_div(seconds, 60);
    match minutes {
        0 => "less than a minute".to_string(),
        1 => "1 minute".to_string(),
        2..=44 => format!("{minutes} minutes"),
        45..=89 => "about 1 hour".to_string(),
        90..=1439 => format!("about {} hours", rounded_div(minutes, HOUR)),
        1440..=2519 => "1 day".to_string(),
        2520..=43199 => format!("{} days", rounded_div(minutes, DAY)),
        43200..=86399 => {
            let months = rounded_div(minutes, MONTH);
            if months == 1 {
                "about 1 month".to_string()
            } else {
                format!("about {months} months")
            }
        }
        86400..=525599 => format!("{} months", rounded_div(minutes, MONTH)),
        _ => {
            let years = minutes / YEAR;
            let months_over = (minutes % YEAR) / MONTH;
            let unit = |n: i64| if n == 1 { "year" } else { "years" };
            match months_over {
                0..=2 => format!("about {years} {}", unit(years)),
                3..=8 => format!("over {years} {}", unit(years)),
                _ => format!("almost {} years", years + 1),
            }
        }
    }
}

fn rounded_div(value: i64, divisor: i64) -> i64 {
    (value + divisor / 2) / divisor
}

/// One list entry: id, title, age, then an indented excerpt.
pub fn note_summary(note: &Note, now: DateTime<Utc>) -> String {
    format!(
        "{}  {}  (updated {})\n    {}",
        note.id,
        note.display_title(),
        relative_to(note.updated_at, now),
        note.excerpt(EXCERPT_CHARS)
    )
}

/// Full note view.
pub fn note_detail(note: &Note, now: DateTime<Utc>) -> String {
    format!(
        "{}\n{}\ncreated {} · updated {}\n\n{}",
        note.display_title(),
        note.id,
        note.created_at.format("%Y-%m-%d %H:%M UTC"),
        relative_to(note.updated_at, now),
        note.content
    )
}
