//! System wall clock

use chrono::{DateTime, Datelike, FixedOffset, Local, Utc};
use studybox_host_api::WallClockSource;
use studybox_util::CalendarTime;
use tracing::warn;

/// Earliest year the system clock is trusted to be synchronized
pub const MIN_SYNCED_YEAR: i32 = 2021;

/// Wall clock backed by the system time
///
/// Readings before [`MIN_SYNCED_YEAR`] are treated as "not yet synced",
/// which is what an unset RTC reports after power-up.
#[derive(Debug, Clone)]
pub struct SystemWallClock {
    utc_offset: Option<FixedOffset>,
}

impl SystemWallClock {
    /// Use a fixed UTC offset, or the local time zone when `None`
    pub fn new(utc_offset_seconds: Option<i32>) -> Self {
        let utc_offset = utc_offset_seconds.and_then(|secs| {
            let offset = FixedOffset::east_opt(secs);
            if offset.is_none() {
                warn!(utc_offset_seconds = secs, "Invalid UTC offset, using local time zone");
            }
            offset
        });
        Self { utc_offset }
    }

    pub fn calendar_at(&self, utc: DateTime<Utc>) -> Option<CalendarTime> {
        if utc.year() < MIN_SYNCED_YEAR {
            return None;
        }
        Some(match self.utc_offset {
            Some(offset) => CalendarTime::from_datetime(&utc.with_timezone(&offset)),
            None => CalendarTime::from_datetime(&utc.with_timezone(&Local)),
        })
    }
}

impl WallClockSource for SystemWallClock {
    fn calendar_now(&self) -> Option<CalendarTime> {
        self.calendar_at(studybox_util::now_utc())
    }
}
