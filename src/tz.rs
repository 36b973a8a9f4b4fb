//! Timezone conversion helpers
//!
//! Thin helpers over chrono's `TimeZone` machinery. The aware/naive split
//! the original dynamic code handled at runtime is expressed in the types:
//! [`to_timezone`] re-anchors an already-aware value, [`localize`] attaches
//! a zone to a naive wall-clock value and deals with DST transitions.

use chrono::offset::LocalResult;
use chrono::{DateTime, NaiveDateTime, TimeZone};
use thiserror::Error;

/// Errors from localizing naive datetimes
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TimezoneError {
    /// The wall-clock value falls inside a DST transition gap
    #[error("local time {0} does not exist in the target timezone")]
    NonexistentLocalTime(NaiveDateTime),
}

/// Re-anchor an aware datetime in another timezone.
///
/// The instant is unchanged; only the offset and calendar representation
/// move.
pub fn to_timezone<Src, Dst>(value: &DateTime<Src>, tz: &Dst) -> DateTime<Dst>
where
    Src: TimeZone,
    Dst: TimeZone,
{
    value.with_timezone(tz)
}

/// Attach a timezone to a naive (wall-clock) datetime.
///
/// Values that are ambiguous during a backward transition resolve to the
/// later, standard-time instant. Values inside a forward transition gap do
/// not exist in the zone and are rejected.
pub fn localize<Tz>(value: NaiveDateTime, tz: &Tz) -> Result<DateTime<Tz>, TimezoneError>
where
    Tz: TimeZone,
{
    match tz.from_local_datetime(&value) {
        LocalResult::Single(datetime) => Ok(datetime),
        LocalResult::Ambiguous(_, latest) => Ok(latest),
        LocalResult::None => Err(TimezoneError::NonexistentLocalTime(value)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, NaiveDate, Offset, Utc};
    use chrono_tz::America::New_York;

    fn naive(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, mo, d)
            .unwrap()
            .and_hms_opt(h, mi, 0)
            .unwrap()
    }

    #[test]
    fn conversion_preserves_the_instant() {
        let utc = Utc.with_ymd_and_hms(2026, 8, 7, 12, 0, 0).unwrap();
        let eastern = to_timezone(&utc, &New_York);

        assert_eq!(eastern, utc);
        assert_eq!(eastern.naive_local(), naive(2026, 8, 7, 8, 0));
    }

    #[test]
    fn conversion_between_fixed_offsets() {
        let plus_two = FixedOffset::east_opt(2 * 3600).unwrap();
        let source = plus_two.with_ymd_and_hms(2026, 1, 1, 10, 0, 0).unwrap();
        let utc = to_timezone(&source, &Utc);

        assert_eq!(utc.naive_local(), naive(2026, 1, 1, 8, 0));
    }

    #[test]
    fn localize_plain_wall_clock_time() {
        let localized = localize(naive(2026, 8, 7, 9, 30), &New_York).unwrap();
        assert_eq!(localized.naive_local(), naive(2026, 8, 7, 9, 30));
        // August in New York is daylight time, UTC-4.
        assert_eq!(localized.offset().fix().local_minus_utc(), -4 * 3600);
    }

    #[test]
    fn localize_rejects_nonexistent_time_in_dst_gap() {
        // Clocks jumped from 02:00 to 03:00 on 2026-03-08.
        let gap = naive(2026, 3, 8, 2, 30);
        assert_eq!(
            localize(gap, &New_York),
            Err(TimezoneError::NonexistentLocalTime(gap))
        );
    }

    #[test]
    fn localize_resolves_ambiguous_time_to_standard_time() {
        // 01:30 happened twice on 2026-11-01; the later instant is EST.
        let overlap = naive(2026, 11, 1, 1, 30);
        let localized = localize(overlap, &New_York).unwrap();
        assert_eq!(localized.offset().fix().local_minus_utc(), -5 * 3600);
    }
}
