//! Activity heatmap data model.
//!
//! Converts the sparse `{date, count}` list returned by the backend into a
//! dense day-by-day series. Day stepping uses calendar arithmetic on
//! `NaiveDate`, never fixed 86400s increments, so DST and leap days cannot
//! skip or repeat a day.

use std::collections::HashMap;

use chrono::{DateTime, Datelike, Days, Months, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};

pub const DEFAULT_COMPACT_DAYS: u32 = 100;
/// Ten years; longer compact windows are rejected.
pub const MAX_COMPACT_DAYS: u32 = 3660;
pub const DEFAULT_THRESHOLDS: [u32; 4] = [1, 3, 6, 10];
/// Viewports narrower than this render the compact window.
pub const COMPACT_BREAKPOINT_PX: u32 = 600;

/// Raw record as served by the activity endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityRecord {
    pub date: String,
    pub count: u32,
}

impl ActivityRecord {
    pub fn new(date: impl Into<String>, count: u32) -> Self {
        Self {
            date: date.into(),
            count,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewportClass {
    Compact,
    Full,
}

impl ViewportClass {
    pub fn for_width(width_px: u32) -> Self {
        if width_px < COMPACT_BREAKPOINT_PX {
            ViewportClass::Compact
        } else {
            ViewportClass::Full
        }
    }
}

/// Inclusive day range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Window {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl Window {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    /// Number of days covered; zero when `start` is after `end`.
    pub fn len(&self) -> usize {
        if self.start > self.end {
            0
        } else {
            (self.end - self.start).num_days() as usize + 1
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// One day of the dense series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DaySlot {
    pub date: NaiveDate,
    pub count: u32,
    pub level: u8,
}

/// Window ending at `reference`: `compact_days` back for compact
/// viewports, one calendar year back for full ones (29 Feb clamps to
/// 28 Feb).
///
/// Fails when `compact_days` exceeds [`MAX_COMPACT_DAYS`] or the start would
/// fall before the earliest representable date.
pub fn compute_window(
    reference: NaiveDate,
    viewport: ViewportClass,
    compact_days: u32,
) -> Result<Window> {
    let start = match viewport {
        ViewportClass::Compact => {
            if compact_days > MAX_COMPACT_DAYS {
                return Err(Error::InvalidArgument(format!(
                    "compact window of {compact_days} days exceeds {MAX_COMPACT_DAYS}"
                )));
            }
            reference.checked_sub_days(Days::new(u64::from(compact_days)))
        }
        ViewportClass::Full => reference.checked_sub_months(Months::new(12)),
    };
    let start = start.ok_or_else(|| {
        Error::InvalidArgument(format!("activity window before {reference} is out of range"))
    })?;
    Ok(Window::new(start, reference))
}

/// Parse `YYYY-MM-DD`, or an RFC 3339 timestamp truncated to its UTC day.
pub fn parse_day(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if let Ok(day) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(day);
    }
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|stamp| stamp.with_timezone(&Utc).date_naive())
}

/// Maps raw counts onto a bounded intensity scale.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntensityScale {
    thresholds: Vec<u32>,
}

impl Default for IntensityScale {
    fn default() -> Self {
        Self {
            thresholds: DEFAULT_THRESHOLDS.to_vec(),
        }
    }
}

impl IntensityScale {
    /// `thresholds[i]` is the lowest count rendered at level `i + 1`.
    /// Expects strictly increasing, non-zero values (see config validation).
    pub fn new(thresholds: Vec<u32>) -> Self {
        Self { thresholds }
    }

    pub fn max_level(&self) -> u8 {
        self.thresholds.len().min(u8::MAX as usize) as u8
    }

    /// 0 for no activity, otherwise the highest level whose threshold the
    /// count reaches. Counts past the top threshold all share `max_level`,
    /// so a scale without thresholds renders everything at 0.
    pub fn classify(&self, count: u32) -> u8 {
        if count == 0 {
            return 0;
        }
        let reached = self
            .thresholds
            .iter()
            .take_while(|threshold| count >= **threshold)
            .count();
        (reached.max(1) as u8).min(self.max_level())
    }
}

/// Dense, chronological series with one slot per day of `window`.
///
/// Duplicate dates resolve last-write-wins. Unparseable dates are dropped
/// from the lookup; their day (if any) still appears with count 0.
pub fn bucketize(records: &[ActivityRecord], window: Window, scale: &IntensityScale) -> Vec<DaySlot> {
    let mut lookup: HashMap<NaiveDate, u32> = HashMap::with_capacity(records.len());
    for record in records {
        match parse_day(&record.date) {
            Some(day) => {
                lookup.insert(day, record.count);
            }
            None => debug!(date = %record.date, "skipping unparseable activity date"),
        }
    }

    let mut series = Vec::with_capacity(window.len());
    let mut day = window.start;
    while day <= window.end {
        let count = lookup.get(&day).copied().unwrap_or(0);
        series.push(DaySlot {
            date: day,
            count,
            level: scale.classify(count),
        });
        match day.succ_opt() {
            Some(next) => day = next,
            None => break,
        }
    }
    series
}

/// Sunday-first week columns, as painted by contribution graphs. The first
/// and last weeks are padded with `None`.
pub fn week_grid(series: &[DaySlot]) -> Vec<[Option<DaySlot>; 7]> {
    let mut weeks = Vec::new();
    let mut week: [Option<DaySlot>; 7] = Default::default();
    for slot in series {
        let weekday = slot.date.weekday().num_days_from_sunday() as usize;
        if weekday == 0 && week.iter().any(Option::is_some) {
            weeks.push(week);
            week = Default::default();
        }
        week[weekday] = Some(*slot);
    }
    if week.iter().any(Option::is_some) {
        weeks.push(week);
    }
    weeks
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ActivitySummary {
    pub total: u64,
    pub active_days: usize,
    pub longest_streak: usize,
    pub current_streak: usize,
}

/// Totals and streaks over a dense series.
///
/// The current streak ends on the last day of the series; a zero on that
/// last day alone does not break it, since the day may not be over yet.
pub fn summarize(series: &[DaySlot]) -> ActivitySummary {
    let mut summary = ActivitySummary::default();
    let mut run = 0usize;
    for slot in series {
        summary.total += u64::from(slot.count);
        if slot.count > 0 {
            summary.active_days += 1;
            run += 1;
            summary.longest_streak = summary.longest_streak.max(run);
        } else {
            run = 0;
        }
    }

    let tail = match series.split_last() {
        Some((last, rest)) if last.count == 0 => rest,
        _ => series,
    };
    summary.current_streak = tail
        .iter()
        .rev()
        .take_while(|slot| slot.count > 0)
        .count();
    summary
}
