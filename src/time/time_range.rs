//! TimeRange: half-open interval `[start_time, start_time + duration)`.
//!
//! A range may be constructed with a negative duration, but the predicates
//! below are written for non-negative durations and give unspecified answers
//! otherwise.
//!
//! The relation predicates implement James F. Allen's interval algebra. Every
//! comparison goes through `RationalTime`'s ordering, so operands may use
//! different rates.

use std::fmt;

use super::rational_time::RationalTime;

fn min_time(a: RationalTime, b: RationalTime) -> RationalTime {
    if b < a { b } else { a }
}

fn max_time(a: RationalTime, b: RationalTime) -> RationalTime {
    if b > a { b } else { a }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TimeRange {
    start_time: RationalTime,
    duration: RationalTime,
}

impl TimeRange {
    pub fn new(start_time: RationalTime, duration: RationalTime) -> Self {
        Self { start_time, duration }
    }

    /// Zero-length range at `start_time`.
    pub fn from_start(start_time: RationalTime) -> Self {
        Self::new(start_time, RationalTime::zero(start_time.rate()))
    }

    pub fn range_from_start_end_time(start_time: RationalTime, end_time_exclusive: RationalTime) -> Self {
        Self::new(
            start_time,
            RationalTime::duration_from_start_end_time(start_time, end_time_exclusive),
        )
    }

    pub fn start_time(&self) -> RationalTime {
        self.start_time
    }

    pub fn duration(&self) -> RationalTime {
        self.duration
    }

    /// First instant after the range, at the duration's rate.
    pub fn end_time_exclusive(&self) -> RationalTime {
        self.duration + self.start_time.rescaled_to(self.duration.rate())
    }

    /// Last tick inside the range.
    ///
    /// For an integral duration this is one tick (at the duration's rate)
    /// before the exclusive end; a fractional duration floors the exclusive
    /// end instead. Ranges of one tick or less end where they start.
    pub fn end_time_inclusive(&self) -> RationalTime {
        let et = self.end_time_exclusive();
        let span = et - self.start_time.rescaled_to(self.duration.rate());
        if span.value() > 1.0 {
            if self.duration.value() != self.duration.value().floor() {
                et.floor()
            } else {
                et - RationalTime::new(1.0, self.duration.rate())
            }
        } else {
            self.start_time
        }
    }

    pub fn duration_extended_by(&self, other: RationalTime) -> Self {
        Self::new(self.start_time, self.duration + other)
    }

    /// Smallest range covering both `self` and `other`.
    pub fn extended_by(&self, other: TimeRange) -> Self {
        let start = min_time(self.start_time, other.start_time);
        let end = max_time(self.end_time_exclusive(), other.end_time_exclusive());
        Self::range_from_start_end_time(start, end)
    }

    /// Clip an instant into `[start_time, end_time_inclusive]`.
    pub fn clamped_time(&self, other: RationalTime) -> RationalTime {
        min_time(max_time(other, self.start_time), self.end_time_inclusive())
    }

    /// Intersect with another range.
    ///
    /// The duration comes out non-positive when the ranges do not overlap;
    /// check `overlaps()` first when that matters.
    pub fn clamped(&self, other: TimeRange) -> TimeRange {
        let start = max_time(other.start_time, self.start_time);
        let end = min_time(other.end_time_exclusive(), self.end_time_exclusive());
        TimeRange::range_from_start_end_time(start, end)
    }

    /// `start <= other < end_exclusive`
    pub fn contains_time(&self, other: RationalTime) -> bool {
        self.start_time <= other && other < self.end_time_exclusive()
    }

    /// `other` lies entirely within `self`. Converse: `other.contains(self)`.
    pub fn contains(&self, other: TimeRange) -> bool {
        self.start_time <= other.start_time && self.end_time_exclusive() >= other.end_time_exclusive()
    }

    pub fn overlaps_time(&self, other: RationalTime) -> bool {
        self.contains_time(other)
    }

    /// Strict: ranges that only touch at a boundary do not overlap.
    pub fn overlaps(&self, other: TimeRange) -> bool {
        self.start_time < other.end_time_exclusive() && other.start_time < self.end_time_exclusive()
    }

    /// `self` ends at or before `other` starts.
    pub fn before(&self, other: TimeRange) -> bool {
        self.start_time < other.start_time && self.end_time_exclusive() <= other.start_time
    }

    pub fn before_time(&self, other: RationalTime) -> bool {
        self.end_time_exclusive() < other
    }

    /// One range ends exactly where the other starts (either order).
    pub fn meets(&self, other: TimeRange) -> bool {
        self.end_time_exclusive() == other.start_time || self.start_time == other.end_time_exclusive()
    }

    /// Same start, strictly earlier end.
    pub fn begins(&self, other: TimeRange) -> bool {
        self.start_time == other.start_time && self.end_time_exclusive() < other.end_time_exclusive()
    }

    pub fn begins_time(&self, other: RationalTime) -> bool {
        self.start_time == other
    }

    /// Same end, strictly later start.
    pub fn finishes(&self, other: TimeRange) -> bool {
        self.end_time_exclusive() == other.end_time_exclusive() && self.start_time > other.start_time
    }

    pub fn finishes_time(&self, other: RationalTime) -> bool {
        self.end_time_exclusive() == other
    }
}

impl fmt::Display for TimeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{} +{}]", self.start_time, self.duration)
    }
}
