use lazy_static::lazy_static;
use regex::Regex;
use time::{macros::format_description, Date, OffsetDateTime, PrimitiveDateTime, Time, UtcOffset};
use tracing::debug;

lazy_static! {
    static ref START_RE: Regex = Regex::new(r"([0-9]{1,2}):([0-9]{2})").unwrap();
}

/// Start time of a slot such as `"13:30–15:00"`: the first `H:MM` in the text.
pub fn slot_start(time_slot: &str) -> Option<Time> {
    let caps = START_RE.captures(time_slot)?;
    let hour: u8 = caps[1].parse().ok()?;
    let minute: u8 = caps[2].parse().ok()?;
    Time::from_hms(hour, minute, 0).ok()
}

/// Combines a `YYYY-MM-DD` date with the start of `time_slot`, read as wall
/// clock time at `offset`. Falls back to `now` if either part is unusable.
pub fn booked_time(
    date: &str,
    time_slot: &str,
    offset: UtcOffset,
    now: OffsetDateTime,
) -> OffsetDateTime {
    let date = date.trim();
    let parsed = Date::parse(date, format_description!("[year]-[month]-[day]")).ok();
    match (parsed, slot_start(time_slot)) {
        (Some(d), Some(t)) => PrimitiveDateTime::new(d, t).assume_offset(offset),
        _ => {
            debug!(%date, %time_slot, "unparseable booking slot, using now");
            now
        }
    }
}
