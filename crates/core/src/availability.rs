//! # Availability Calculator
//!
//! Computes the free appointment start times for one doctor on one day.
//!
//! All values here are wall-clock times measured in minutes since midnight.
//! The calculator is a pure function: callers fetch the working-hours window
//! and the existing bookings, reduce them to [`AvailabilityWindow`] and
//! [`Interval`] values, and get back an ascending list of [`TimeOfDay`] slots.
//!
//! ## Occupancy check
//!
//! A candidate start `t` is rejected only when it falls *inside* an occupied
//! span `[start, start + duration)`. The candidate's own span is not checked
//! against bookings that begin after `t`, and the final candidate may run past
//! the window's close. Both behaviours are observable in the slot lists the
//! service has always returned.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

/// Slot length used when the caller does not configure one.
pub const DEFAULT_SLOT_LENGTH_MINUTES: u32 = 30;

const MINUTES_PER_DAY: u16 = 24 * 60;

/// A wall-clock time of day, stored as minutes since midnight (0..=1439).
///
/// The textual form is `HH:MM`, 24-hour and zero-padded. Serde uses that form,
/// so `TimeOfDay` values appear in JSON as plain strings.
///
/// ```
/// use hospital_core::availability::TimeOfDay;
///
/// let t: TimeOfDay = "9:30".parse().unwrap();
/// assert_eq!(t.minutes(), 570);
/// assert_eq!(t.to_string(), "09:30");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TimeOfDay(u16);

impl TimeOfDay {
    /// Builds a time from minutes since midnight, or `None` past 23:59.
    pub fn from_minutes(minutes: u32) -> Option<Self> {
        u16::try_from(minutes)
            .ok()
            .filter(|m| *m < MINUTES_PER_DAY)
            .map(Self)
    }

    pub fn from_hm(hour: u32, minute: u32) -> Option<Self> {
        if hour >= 24 || minute >= 60 {
            return None;
        }
        Self::from_minutes(hour * 60 + minute)
    }

    pub fn minutes(self) -> u32 {
        u32::from(self.0)
    }

    pub fn hour(self) -> u32 {
        self.minutes() / 60
    }

    pub fn minute(self) -> u32 {
        self.minutes() % 60
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour(), self.minute())
    }
}

/// Error returned when a string is not a valid `HH:MM` time.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid time of day '{0}', expected HH:MM")]
pub struct ParseTimeError(String);

impl FromStr for TimeOfDay {
    type Err = ParseTimeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ParseTimeError(s.to_string());

        let (hour, minute) = s.trim().split_once(':').ok_or_else(invalid)?;
        if hour.is_empty() || hour.len() > 2 || minute.len() != 2 {
            return Err(invalid());
        }
        if !hour.bytes().chain(minute.bytes()).all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }

        let hour: u32 = hour.parse().map_err(|_| invalid())?;
        let minute: u32 = minute.parse().map_err(|_| invalid())?;
        Self::from_hm(hour, minute).ok_or_else(invalid)
    }
}

impl TryFrom<String> for TimeOfDay {
    type Error = ParseTimeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<TimeOfDay> for String {
    fn from(value: TimeOfDay) -> Self {
        value.to_string()
    }
}

/// An occupied span `[start, start + duration)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Interval {
    pub start: TimeOfDay,
    pub duration: u32,
}

impl Interval {
    pub fn new(start: TimeOfDay, duration: u32) -> Self {
        Self { start, duration }
    }

    /// Builds an interval from stored booking values.
    ///
    /// Returns `None` when the start is missing or unparsable, or when the
    /// duration is not positive. Such bookings cannot be checked for conflicts
    /// and are left out of the occupied set.
    pub fn from_raw(start: Option<&str>, duration_minutes: i32) -> Option<Self> {
        let start = start?.parse().ok()?;
        let duration = u32::try_from(duration_minutes).ok().filter(|d| *d > 0)?;
        Some(Self { start, duration })
    }

    /// End of the span in minutes since midnight; saturates for oversized durations.
    pub fn end_minutes(&self) -> u32 {
        self.start.minutes().saturating_add(self.duration)
    }

    /// Whether the instant `t` falls inside this half-open span.
    pub fn contains(&self, t: TimeOfDay) -> bool {
        t.minutes() >= self.start.minutes() && t.minutes() < self.end_minutes()
    }
}

/// A doctor's working hours for one calendar day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AvailabilityWindow {
    pub open: TimeOfDay,
    pub close: TimeOfDay,
}

impl AvailabilityWindow {
    pub fn new(open: TimeOfDay, close: TimeOfDay) -> Self {
        Self { open, close }
    }

    /// Parses a window from stored `HH:MM` strings.
    ///
    /// An unparsable bound yields `None`, meaning no availability that day.
    /// An inverted window still parses but produces no slots.
    pub fn parse(open: &str, close: &str) -> Option<Self> {
        Some(Self {
            open: open.parse().ok()?,
            close: close.parse().ok()?,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.open >= self.close
    }

    /// Whether `t` lies in `[open, close)`.
    pub fn contains(&self, t: TimeOfDay) -> bool {
        t >= self.open && t < self.close
    }
}

/// Lists the free slot start times inside `window`.
///
/// Candidates step from `window.open` by `slot_length_minutes` while the
/// candidate is before `window.close`. A candidate is kept unless it falls
/// inside one of the `occupied` intervals. The result is ascending.
///
/// An inverted or zero-width window, or a zero slot length, yields no slots.
///
/// ```
/// use hospital_core::availability::{compute_available_slots, AvailabilityWindow, Interval};
///
/// let window = AvailabilityWindow::parse("09:00", "11:00").unwrap();
/// let occupied = [Interval::from_raw(Some("09:00"), 60).unwrap()];
///
/// let slots: Vec<String> = compute_available_slots(&window, &occupied, 30)
///     .into_iter()
///     .map(|s| s.to_string())
///     .collect();
/// assert_eq!(slots, ["10:00", "10:30"]);
/// ```
pub fn compute_available_slots(
    window: &AvailabilityWindow,
    occupied: &[Interval],
    slot_length_minutes: u32,
) -> Vec<TimeOfDay> {
    if window.is_empty() || slot_length_minutes == 0 {
        return Vec::new();
    }

    let close = window.close.minutes();
    (window.open.minutes()..close)
        .step_by(slot_length_minutes as usize)
        .filter_map(TimeOfDay::from_minutes)
        .filter(|t| !occupied.iter().any(|interval| interval.contains(*t)))
        .collect()
}
