use chrono::{NaiveTime, Timelike};

fn minute_of_day(t: NaiveTime) -> i64 {
    (t.hour() * 60 + t.minute()) as i64
}

/// Splits a window into back-to-back slots of `duration_minutes`, starting at
/// `start`. A slot that would run past `end` is dropped, never shortened.
/// Seconds are ignored.
pub fn generate_slots(start: NaiveTime, end: NaiveTime, duration_minutes: i32) -> Vec<NaiveTime> {
    if duration_minutes <= 0 {
        return Vec::new();
    }

    let duration = duration_minutes as i64;
    let window_start = minute_of_day(start);
    let window_end = minute_of_day(end);

    let mut slots = Vec::new();
    let mut cursor = window_start;
    while cursor + duration <= window_end {
        if let Some(t) = NaiveTime::from_hms_opt((cursor / 60) as u32, (cursor % 60) as u32, 0) {
            slots.push(t);
        }
        cursor += duration;
    }
    slots
}
