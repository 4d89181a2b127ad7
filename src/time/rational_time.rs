//! RationalTime: a point in time expressed as `value / rate` seconds.
//!
//! Values and rates are `f64`, but the algebra treats them as fractions:
//! - Comparisons cross-multiply (`a.value * b.rate` vs `b.value * a.rate`),
//!   which is the same as rescaling both sides to `a.rate * b.rate`.
//! - `rescaled_to()` never rounds. Rounding is explicit: `floor()`, `ceil()`,
//!   `round()`, `to_frames()`.
//! - `+` / `-` produce a result at the finer (larger) of the two rates.

use std::cmp::Ordering;
use std::fmt;
use std::ops::{Add, AddAssign, Mul, Neg, Sub, SubAssign};

use crate::error::{Error, Result};

/// Instant on a timeline: `value` ticks at `rate` ticks per second.
///
/// `rate` is always positive. [`RationalTime::new`] panics otherwise (a
/// programmer error); use [`RationalTime::try_new`] for untrusted input.
#[derive(Debug, Clone, Copy)]
pub struct RationalTime {
    value: f64,
    rate: f64,
}

impl RationalTime {
    /// Create a new instant. Panics if `rate` is not a positive finite number.
    pub fn new(value: f64, rate: f64) -> Self {
        assert!(
            rate.is_finite() && rate > 0.0,
            "RationalTime rate must be positive, got {rate}"
        );
        Self { value, rate }
    }

    /// Checked constructor for values read from files or host bindings.
    pub fn try_new(value: f64, rate: f64) -> Result<Self> {
        if rate.is_finite() && rate > 0.0 {
            Ok(Self { value, rate })
        } else {
            Err(Error::InvalidRate(format!("{rate} (value {value})")))
        }
    }

    /// Zero at the given rate.
    pub fn zero(rate: f64) -> Self {
        Self::new(0.0, rate)
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn rate(&self) -> f64 {
        self.rate
    }

    /// True if the value is not a finite number.
    pub fn is_invalid_time(&self) -> bool {
        !self.value.is_finite()
    }

    /// Value expressed at another rate, without rounding.
    pub fn value_rescaled_to(&self, new_rate: f64) -> f64 {
        if new_rate == self.rate {
            self.value
        } else {
            self.value * new_rate / self.rate
        }
    }

    /// Same instant expressed at `new_rate`.
    pub fn rescaled_to(&self, new_rate: f64) -> Self {
        Self::new(self.value_rescaled_to(new_rate), new_rate)
    }

    /// Same instant expressed at `other`'s rate.
    pub fn rescaled_to_time(&self, other: RationalTime) -> Self {
        self.rescaled_to(other.rate)
    }

    /// Largest whole tick not after this instant (same rate).
    pub fn floor(&self) -> Self {
        Self::new(self.value.floor(), self.rate)
    }

    pub fn ceil(&self) -> Self {
        Self::new(self.value.ceil(), self.rate)
    }

    pub fn round(&self) -> Self {
        Self::new(self.value.round(), self.rate)
    }

    /// Compare with a tolerance in ticks of `self`'s rate.
    pub fn almost_equal(&self, other: RationalTime, delta: f64) -> bool {
        (self.value - other.value_rescaled_to(self.rate)).abs() <= delta
    }

    /// Duration between two instants, at `start_time`'s rate.
    pub fn duration_from_start_end_time(start_time: RationalTime, end_time_exclusive: RationalTime) -> Self {
        if start_time.rate == end_time_exclusive.rate {
            Self::new(end_time_exclusive.value - start_time.value, start_time.rate)
        } else {
            Self::new(
                end_time_exclusive.value_rescaled_to(start_time.rate) - start_time.value,
                start_time.rate,
            )
        }
    }

    pub fn from_seconds(seconds: f64, rate: f64) -> Self {
        Self::new(seconds * rate, rate)
    }

    pub fn to_seconds(&self) -> f64 {
        self.value / self.rate
    }

    pub fn from_frames(frame: i64, rate: f64) -> Self {
        Self::new(frame as f64, rate)
    }

    /// Whole frame count at the current rate (floor).
    pub fn to_frames(&self) -> i64 {
        self.value.floor() as i64
    }

    /// Whole frame count at another rate (floor).
    pub fn to_frames_at(&self, rate: f64) -> i64 {
        self.value_rescaled_to(rate).floor() as i64
    }

    /// Sum expressed at a caller-chosen rate.
    pub fn add_at_rate(&self, other: RationalTime, rate: f64) -> Self {
        Self::new(self.value_rescaled_to(rate) + other.value_rescaled_to(rate), rate)
    }

    /// Difference expressed at a caller-chosen rate.
    pub fn sub_at_rate(&self, other: RationalTime, rate: f64) -> Self {
        Self::new(self.value_rescaled_to(rate) - other.value_rescaled_to(rate), rate)
    }
}

impl Default for RationalTime {
    fn default() -> Self {
        Self { value: 0.0, rate: 1.0 }
    }
}

impl fmt::Display for RationalTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.value, self.rate)
    }
}

impl PartialEq for RationalTime {
    fn eq(&self, other: &Self) -> bool {
        self.value * other.rate == other.value * self.rate
    }
}

impl PartialOrd for RationalTime {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        (self.value * other.rate).partial_cmp(&(other.value * self.rate))
    }
}

impl Add for RationalTime {
    type Output = RationalTime;

    fn add(self, rhs: RationalTime) -> RationalTime {
        if self.rate == rhs.rate {
            RationalTime::new(self.value + rhs.value, self.rate)
        } else if self.rate > rhs.rate {
            RationalTime::new(self.value + rhs.value_rescaled_to(self.rate), self.rate)
        } else {
            RationalTime::new(self.value_rescaled_to(rhs.rate) + rhs.value, rhs.rate)
        }
    }
}

impl Sub for RationalTime {
    type Output = RationalTime;

    fn sub(self, rhs: RationalTime) -> RationalTime {
        self + (-rhs)
    }
}

impl AddAssign for RationalTime {
    fn add_assign(&mut self, rhs: RationalTime) {
        *self = *self + rhs;
    }
}

impl SubAssign for RationalTime {
    fn sub_assign(&mut self, rhs: RationalTime) {
        *self = *self - rhs;
    }
}

impl Neg for RationalTime {
    type Output = RationalTime;

    fn neg(self) -> RationalTime {
        RationalTime::new(-self.value, self.rate)
    }
}

impl Mul<f64> for RationalTime {
    type Output = RationalTime;

    fn mul(self, scalar: f64) -> RationalTime {
        RationalTime::new(self.value * scalar, self.rate)
    }
}
