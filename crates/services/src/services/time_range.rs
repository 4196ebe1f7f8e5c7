//! Runs of consecutive quarters marked with the same activity.

use db::models::quarter::QUARTERS_PER_DAY;
use serde::Serialize;
use thiserror::Error;
use tracing::debug;
use ts_rs::TS;

#[derive(Debug, Error, PartialEq)]
pub enum TimeRangeError {
    #[error("time range cannot start at {start} and contain {length} quarters")]
    RangeTooBig { start: i32, length: i32 },
    #[error("time range must start between 0 and 95, got {0}")]
    InvalidStart(i32),
    #[error("time range length must not be negative, got {0}")]
    InvalidLength(i32),
}

/// Quarters `start..start + length` of a single day, all marked with the same
/// activity. 13:00 to 14:30 is `start = 52, length = 6`.
///
/// Always satisfies `0 <= start <= 95`, `length >= 0` and
/// `start + length <= 96`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, TS)]
pub struct TimeRange {
    start: i32,
    length: i32,
    activity_id: Option<i64>,
}

impl TimeRange {
    pub fn new(start: i32, length: i32, activity_id: Option<i64>) -> Result<Self, TimeRangeError> {
        if start + length > QUARTERS_PER_DAY {
            return Err(TimeRangeError::RangeTooBig { start, length });
        }
        if !(0..QUARTERS_PER_DAY).contains(&start) {
            return Err(TimeRangeError::InvalidStart(start));
        }
        if length < 0 {
            return Err(TimeRangeError::InvalidLength(length));
        }

        Ok(Self {
            start,
            length,
            activity_id,
        })
    }

    pub fn start(&self) -> i32 {
        self.start
    }

    pub fn length(&self) -> i32 {
        self.length
    }

    pub fn activity_id(&self) -> Option<i64> {
        self.activity_id
    }

    /// First quarter after the range.
    pub fn ends(&self) -> i32 {
        self.start + self.length
    }

    pub fn is_empty(&self) -> bool {
        self.length == 0
    }

    /// Shrinks this range so it stops where `other` begins, if `other` starts
    /// strictly inside it.
    pub fn adjust(&mut self, other: &TimeRange) {
        if self.start < other.start && self.ends() > other.start {
            let length = other.start - self.start;
            debug!(
                start = self.start,
                from = self.length,
                to = length,
                "Adjusting time range"
            );
            self.length = length;
        }
    }

    /// Absorbs `other` into this range. `other` is left with a length of zero.
    pub fn merge(&mut self, other: &mut TimeRange) -> Result<(), TimeRangeError> {
        let length = self.length + other.length;
        if self.start + length > QUARTERS_PER_DAY {
            return Err(TimeRangeError::RangeTooBig {
                start: self.start,
                length,
            });
        }

        debug!(
            start = self.start,
            length = self.length,
            merged = other.length,
            "Merging time ranges"
        );
        self.length = length;
        other.length = 0;
        Ok(())
    }
}
