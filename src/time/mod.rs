//! Time algebra: instants, ranges and transforms.

pub mod rational_time;
pub mod time_range;
pub mod time_transform;

pub use rational_time::RationalTime;
pub use time_range::TimeRange;
pub use time_transform::TimeTransform;
