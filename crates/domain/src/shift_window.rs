// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! The duty-shift window used to filter the live dashboard.
//!
//! A shift runs from 09:00 local time to 09:00 the following day. All
//! arithmetic is done on naive local timestamps in the configured
//! municipal timezone.
//!
//! ## Invariants
//!
//! - The window is half-open: `[start, end)`
//! - `end - start` is exactly 24 hours
//! - Records whose date or time cannot be parsed are never inside a window

use chrono::{NaiveDate, NaiveDateTime, NaiveTime, TimeDelta, Utc};
use chrono_tz::Tz;

/// Hour of day at which one shift ends and the next begins.
pub const SHIFT_BOUNDARY_HOUR: u32 = 9;

const SHIFT_BOUNDARY: NaiveTime = match NaiveTime::from_hms_opt(SHIFT_BOUNDARY_HOUR, 0, 0) {
    Some(time) => time,
    None => NaiveTime::MIN,
};

const DATE_FORMATS: [&str; 2] = ["%Y-%m-%d", "%d/%m/%Y"];
const TIME_FORMATS: [&str; 2] = ["%H:%M:%S", "%H:%M"];

/// A 24-hour duty shift.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShiftWindow {
    start: NaiveDateTime,
    end: NaiveDateTime,
}

impl ShiftWindow {
    /// Returns the shift that contains `now`.
    ///
    /// Before 09:00 this is the shift that started at 09:00 the previous day.
    #[must_use]
    pub fn containing(now: NaiveDateTime) -> Self {
        let boundary_today: NaiveDateTime = now.date().and_time(SHIFT_BOUNDARY);
        let start: NaiveDateTime = if now < boundary_today {
            boundary_today
                .checked_sub_signed(TimeDelta::days(1))
                .unwrap_or(NaiveDateTime::MIN)
        } else {
            boundary_today
        };
        let end: NaiveDateTime = start
            .checked_add_signed(TimeDelta::days(1))
            .unwrap_or(NaiveDateTime::MAX);
        Self { start, end }
    }

    /// Inclusive start of the shift.
    #[must_use]
    pub const fn start(&self) -> NaiveDateTime {
        self.start
    }

    /// Exclusive end of the shift.
    #[must_use]
    pub const fn end(&self) -> NaiveDateTime {
        self.end
    }

    /// Returns true if `timestamp` falls inside this shift.
    #[must_use]
    pub fn contains(&self, timestamp: NaiveDateTime) -> bool {
        timestamp >= self.start && timestamp < self.end
    }
}

/// Combines a stored start date and start time into a local timestamp.
///
/// Dates are accepted as `YYYY-MM-DD` or `DD/MM/YYYY`; times as `HH:MM` or
/// `HH:MM:SS`. Returns `None` if either part does not parse.
#[must_use]
pub fn parse_record_timestamp(date: &str, time: &str) -> Option<NaiveDateTime> {
    let date: &str = date.trim();
    let time: &str = time.trim();

    let parsed_date: NaiveDate = DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(date, format).ok())?;
    let parsed_time: NaiveTime = TIME_FORMATS
        .iter()
        .find_map(|format| NaiveTime::parse_from_str(time, format).ok())?;

    Some(parsed_date.and_time(parsed_time))
}

/// Returns true if a record started at `date` `time` belongs to the shift
/// containing `now`.
#[must_use]
pub fn in_current_shift(date: &str, time: &str, now: NaiveDateTime) -> bool {
    parse_record_timestamp(date, time)
        .is_some_and(|timestamp| ShiftWindow::containing(now).contains(timestamp))
}

/// Returns the current wall-clock time in `timezone`.
#[must_use]
pub fn local_now(timezone: Tz) -> NaiveDateTime {
    Utc::now().with_timezone(&timezone).naive_local()
}
