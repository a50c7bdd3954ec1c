use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;
use crate::domain::models::appointment::Appointment;
use crate::domain::models::availability::{weekday_index, AvailabilityWindow};
use crate::domain::services::slots::generate_slots;

/// Converts a provider-local wall clock time to UTC. Times that fall into a
/// DST gap or repeat in a DST overlap are not bookable and yield `None`.
pub fn local_to_utc(tz: &Tz, naive: NaiveDateTime) -> Option<DateTime<Utc>> {
    tz.from_local_datetime(&naive).single().map(|dt| dt.with_timezone(&Utc))
}

fn start_of_day_utc(tz: &Tz, date: NaiveDate) -> DateTime<Utc> {
    let mut naive = date.and_time(NaiveTime::MIN);
    // Midnight itself may not exist on a DST change day
    for _ in 0..8 {
        if let Some(dt) = tz.from_local_datetime(&naive).earliest() {
            return dt.with_timezone(&Utc);
        }
        naive += Duration::minutes(30);
    }
    naive.and_utc()
}

/// The UTC instants bounding one local calendar day, `[start, end)`.
pub fn day_bounds_utc(tz: &Tz, date: NaiveDate) -> (DateTime<Utc>, DateTime<Utc>) {
    let next = date.succ_opt().unwrap_or(date);
    (start_of_day_utc(tz, date), start_of_day_utc(tz, next))
}

/// Bookable start times for `date`.
///
/// Candidates come from the weekday window. A candidate is dropped when its
/// full interval overlaps any non-cancelled appointment, or when it does not
/// start strictly after `now`.
pub fn resolve_slots(
    window: Option<&AvailabilityWindow>,
    date: NaiveDate,
    duration_minutes: i32,
    existing: &[Appointment],
    tz: &Tz,
    now: DateTime<Utc>,
) -> Vec<NaiveTime> {
    let window = match window {
        Some(w) if w.is_available && w.weekday == weekday_index(date) => w,
        _ => return Vec::new(),
    };

    let duration = Duration::minutes(duration_minutes as i64);

    generate_slots(window.start_time, window.end_time, duration_minutes)
        .into_iter()
        .filter(|candidate| {
            let Some(start) = local_to_utc(tz, date.and_time(*candidate)) else {
                return false;
            };
            let end = start + duration;

            start > now
                && !existing
                    .iter()
                    .any(|a| a.status.blocks_timeline() && a.overlaps(start, end))
        })
        .collect()
}
