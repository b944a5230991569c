//! Daily time-of-day schedule evaluation.
//!
//! A schedule is a set of wall-clock times (`"HH:mm"`) at which a shutdown countdown
//! should begin. Times carry no date: each one is re-evaluated against the date of the
//! reference instant every time it is checked.
//!
//! Two questions are answered here, and both use the same rule for an occurrence that
//! coincides exactly with the reference instant: it counts as *upcoming*, not passed.
//! - [`Schedule::matching_occurrence`] / [`Schedule::should_fire_now`]: is a scheduled
//!   time within the tolerance window of now?
//! - [`Schedule::next_upcoming`]: when is the next scheduled time (for display)?
//!
//! Nothing in this module reads the system clock. Every function takes the reference
//! instant as an argument and is generic over [`chrono::TimeZone`], so production code
//! passes `DateTime<Local>` and tests can pass fixed offsets.
//!
//! # Example
//!
//! ```rust
//! use shutdown_scheduler::scheduler::{Schedule, TimeOfDay};
//! use chrono::{TimeZone, Utc};
//!
//! let schedule = Schedule::from_entries(["21:00", "not a time", "06:30"]);
//! assert_eq!(schedule.len(), 2);
//!
//! let now = Utc.with_ymd_and_hms(2026, 6, 15, 20, 59, 45).unwrap();
//! assert!(schedule.should_fire_now(&now, 30));
//!
//! let next = schedule.next_upcoming(&now).unwrap();
//! assert_eq!(next, Utc.with_ymd_and_hms(2026, 6, 15, 21, 0, 0).unwrap());
//! assert_eq!(TimeOfDay::parse("21:00").unwrap().to_string(), "21:00");
//! ```

use chrono::{DateTime, NaiveDate, NaiveTime, TimeZone, Timelike};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use tracing::debug;

/// A wall-clock hour and minute, parsed from `"HH:mm"` (24-hour)
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimeOfDay(NaiveTime);

/// Reasons a string is not a valid `"HH:mm"` time of day
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ParseTimeOfDayError {
    /// Not two digits, a colon, and two digits
    #[error("expected HH:mm, got {0:?}")]
    Format(String),

    /// Well-formed but hour > 23 or minute > 59
    #[error("time out of range: {0:?}")]
    OutOfRange(String),
}

impl TimeOfDay {
    /// Create a time of day, or `None` if hour > 23 or minute > 59
    pub fn new(hour: u32, minute: u32) -> Option<Self> {
        NaiveTime::from_hms_opt(hour, minute, 0).map(Self)
    }

    /// Parse `"HH:mm"`, returning `None` for anything else
    ///
    /// Surrounding whitespace is ignored. Both fields must be exactly two ASCII digits,
    /// so `"9:05"`, `"09:5"`, `"09:05:00"` and `"24:00"` are all rejected.
    pub fn parse(text: &str) -> Option<Self> {
        text.parse().ok()
    }

    /// Hour in `0..=23`
    pub fn hour(&self) -> u32 {
        self.0.hour()
    }

    /// Minute in `0..=59`
    pub fn minute(&self) -> u32 {
        self.0.minute()
    }

    /// The time as a `NaiveTime` with zero seconds
    pub fn as_naive_time(&self) -> NaiveTime {
        self.0
    }

    /// This time of day on `date` in the time zone `tz`
    ///
    /// Ambiguous local times (clocks going back) resolve to the earliest instant. Local
    /// times that do not exist (clocks going forward) resolve to the same wall time one
    /// hour later, i.e. the first instant after the gap.
    pub fn on_date<Tz: TimeZone>(&self, date: NaiveDate, tz: &Tz) -> Option<DateTime<Tz>> {
        let naive = date.and_time(self.0);
        tz.from_local_datetime(&naive).earliest().or_else(|| {
            let shifted = naive.checked_add_signed(chrono::Duration::hours(1))?;
            tz.from_local_datetime(&shifted).earliest()
        })
    }
}

impl FromStr for TimeOfDay {
    type Err = ParseTimeOfDayError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let format_err = || ParseTimeOfDayError::Format(s.to_string());

        let (hh, mm) = trimmed.split_once(':').ok_or_else(format_err)?;
        let two_digits = |part: &str| part.len() == 2 && part.bytes().all(|b| b.is_ascii_digit());
        if !two_digits(hh) || !two_digits(mm) {
            return Err(format_err());
        }

        let hour: u32 = hh.parse().map_err(|_| format_err())?;
        let minute: u32 = mm.parse().map_err(|_| format_err())?;

        TimeOfDay::new(hour, minute).ok_or_else(|| ParseTimeOfDayError::OutOfRange(s.to_string()))
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour(), self.minute())
    }
}

impl Serialize for TimeOfDay {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for TimeOfDay {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// The earliest instant at or after `reference` whose wall clock reads `time`
///
/// If today's occurrence is earlier than `reference` the result rolls forward exactly
/// one calendar day. An occurrence equal to `reference` is returned as-is.
///
/// Returns `None` only when the next calendar date cannot be represented.
pub fn next_occurrence<Tz: TimeZone>(
    time: TimeOfDay,
    reference: &DateTime<Tz>,
) -> Option<DateTime<Tz>> {
    let tz = reference.timezone();
    let today = reference.date_naive();

    if let Some(candidate) = time.on_date(today, &tz)
        && candidate >= *reference
    {
        return Some(candidate);
    }

    // Wall times inside a DST gap can resolve to a point past the next day's slot,
    // so look one further day ahead before giving up.
    let mut date = today;
    for _ in 0..2 {
        date = date.succ_opt()?;
        if let Some(candidate) = time.on_date(date, &tz)
            && candidate >= *reference
        {
            return Some(candidate);
        }
    }
    None
}

/// A set of daily shutdown times
///
/// Duplicates are tolerated and order is irrelevant to every query.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Schedule {
    times: Vec<TimeOfDay>,
}

impl Schedule {
    /// Create a schedule from already-parsed times
    pub fn new(times: Vec<TimeOfDay>) -> Self {
        Self { times }
    }

    /// Build a schedule from raw `"HH:mm"` strings
    ///
    /// Entries that do not parse are dropped so that one malformed entry cannot
    /// disable the others.
    pub fn from_entries<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let times = entries
            .into_iter()
            .filter_map(|entry| {
                let entry = entry.as_ref();
                let parsed = TimeOfDay::parse(entry);
                if parsed.is_none() {
                    debug!(entry, "Ignoring unparseable schedule entry");
                }
                parsed
            })
            .collect();
        Self { times }
    }

    /// The parsed times, in configuration order
    pub fn times(&self) -> &[TimeOfDay] {
        &self.times
    }

    /// Number of parsed times
    pub fn len(&self) -> usize {
        self.times.len()
    }

    /// Whether no time parsed
    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    /// The scheduled occurrence within `tolerance_secs` of `reference`, if any
    ///
    /// The window is symmetric and inclusive: an occurrence 30 seconds before or after
    /// `reference` matches a 30 second tolerance. Occurrences are taken on the
    /// reference date and on both neighbouring dates, so a window that straddles
    /// midnight still matches. When several occurrences match, the closest wins.
    ///
    /// The returned instant identifies the occurrence, which lets a poller fire each
    /// occurrence at most once even if it polls more than once inside the window.
    pub fn matching_occurrence<Tz: TimeZone>(
        &self,
        reference: &DateTime<Tz>,
        tolerance_secs: u32,
    ) -> Option<DateTime<Tz>> {
        let tz = reference.timezone();
        let today = reference.date_naive();
        let window = chrono::Duration::seconds(i64::from(tolerance_secs));
        let dates = [today.pred_opt(), Some(today), today.succ_opt()];

        self.times
            .iter()
            .flat_map(|time| {
                let tz = &tz;
                dates
                    .iter()
                    .flatten()
                    .filter_map(move |date| time.on_date(*date, tz))
            })
            .filter_map(|occurrence| {
                let offset = occurrence.clone().signed_duration_since(reference.clone());
                (offset >= -window && offset <= window).then(|| (offset.abs(), occurrence))
            })
            .min_by_key(|(distance, _)| *distance)
            .map(|(_, occurrence)| occurrence)
    }

    /// Whether a scheduled time lies within `tolerance_secs` of `reference`
    ///
    /// With a once-per-minute poll and a 30 second tolerance, every scheduled time is
    /// observed by at least one poll as long as poll jitter stays under 30 seconds.
    pub fn should_fire_now<Tz: TimeZone>(
        &self,
        reference: &DateTime<Tz>,
        tolerance_secs: u32,
    ) -> bool {
        self.matching_occurrence(reference, tolerance_secs).is_some()
    }

    /// The soonest occurrence at or after `reference`, for display
    ///
    /// Returns `None` if the schedule is empty.
    pub fn next_upcoming<Tz: TimeZone>(&self, reference: &DateTime<Tz>) -> Option<DateTime<Tz>> {
        self.times
            .iter()
            .filter_map(|time| next_occurrence(*time, reference))
            .min()
    }
}

impl FromIterator<TimeOfDay> for Schedule {
    fn from_iter<I: IntoIterator<Item = TimeOfDay>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests;
