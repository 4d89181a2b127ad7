//! TimeTransform: offset + scale (+ optional rate change) applied to time.

use super::rational_time::RationalTime;
use super::time_range::TimeRange;

/// `t' = t * scale + offset`, then rescaled to `rate` when set.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeTransform {
    offset: RationalTime,
    scale: f64,
    rate: Option<f64>,
}

impl Default for TimeTransform {
    fn default() -> Self {
        Self { offset: RationalTime::default(), scale: 1.0, rate: None }
    }
}

impl TimeTransform {
    pub fn new(offset: RationalTime, scale: f64, rate: Option<f64>) -> Self {
        Self { offset, scale, rate: rate.filter(|r| *r > 0.0) }
    }

    pub fn offset(&self) -> RationalTime {
        self.offset
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// Target rate, `None` keeps the input's rate.
    pub fn rate(&self) -> Option<f64> {
        self.rate
    }

    pub fn applied_to_time(&self, other: RationalTime) -> RationalTime {
        let result = RationalTime::new(other.value() * self.scale, other.rate()) + self.offset;
        match self.rate {
            Some(rate) => result.rescaled_to(rate),
            None => result,
        }
    }

    pub fn applied_to_range(&self, other: TimeRange) -> TimeRange {
        TimeRange::range_from_start_end_time(
            self.applied_to_time(other.start_time()),
            self.applied_to_time(other.end_time_exclusive()),
        )
    }

    /// Compose: the result applies `other` first, then `self`.
    pub fn applied_to_transform(&self, other: TimeTransform) -> TimeTransform {
        TimeTransform {
            offset: self.offset + other.offset,
            scale: self.scale * other.scale,
            rate: self.rate.or(other.rate),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity() {
        let t = RationalTime::new(10.0, 24.0);
        assert_eq!(TimeTransform::default().applied_to_time(t), t);
    }

    #[test]
    fn test_offset_and_scale() {
        let tx = TimeTransform::new(RationalTime::new(10.0, 24.0), 2.0, None);
        let out = tx.applied_to_time(RationalTime::new(5.0, 24.0));
        assert_eq!(out, RationalTime::new(20.0, 24.0));

        let range = tx.applied_to_range(TimeRange::new(RationalTime::new(0.0, 24.0), RationalTime::new(5.0, 24.0)));
        assert_eq!(range.start_time(), RationalTime::new(10.0, 24.0));
        assert_eq!(range.duration(), RationalTime::new(10.0, 24.0));
    }

    #[test]
    fn test_rate_change() {
        let tx = TimeTransform::new(RationalTime::default(), 1.0, Some(48.0));
        let out = tx.applied_to_time(RationalTime::new(1.0, 24.0));
        assert_eq!(out.rate(), 48.0);
        assert_eq!(out.value(), 2.0);
        assert_eq!(TimeTransform::new(RationalTime::default(), 1.0, Some(-1.0)).rate(), None);
    }

    #[test]
    fn test_compose() {
        let a = TimeTransform::new(RationalTime::new(1.0, 24.0), 2.0, None);
        let b = TimeTransform::new(RationalTime::new(2.0, 24.0), 3.0, None);
        let c = a.applied_to_transform(b);
        assert_eq!(c.offset(), RationalTime::new(3.0, 24.0));
        assert_eq!(c.scale(), 6.0);
    }
}
