//! Types for use as [crate::Read::Cfg].

use crate::Error;
use core::ops::{Bound, RangeBounds};

/// Configuration for limiting the range of a decoded length or count.
///
/// Lengths and counts come from untrusted input, so every variable-length item is decoded
/// against a range chosen by the caller.
///
/// # Examples
///
/// ```
/// use rpc_pack::RangeCfg;
///
/// // Strings of at most 256 bytes
/// let cfg = RangeCfg::up_to(256);
/// assert!(cfg.contains(&256));
/// assert!(!cfg.contains(&257));
///
/// // At least one element
/// let cfg: RangeCfg<usize> = (1..).into();
/// assert!(!cfg.contains(&0));
/// ```
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub struct RangeCfg<T: Copy + PartialOrd> {
    start: Bound<T>,
    end: Bound<T>,
}

macro_rules! impl_from_range {
    ($($range:ty),*) => {
        $(
            impl<T: Copy + PartialOrd> From<$range> for RangeCfg<T> {
                fn from(r: $range) -> Self {
                    Self::new(r)
                }
            }
        )*
    };
}

impl_from_range!(
    core::ops::Range<T>,
    core::ops::RangeInclusive<T>,
    core::ops::RangeFrom<T>,
    core::ops::RangeTo<T>,
    core::ops::RangeToInclusive<T>
);

impl<T: Copy + PartialOrd> From<core::ops::RangeFull> for RangeCfg<T> {
    fn from(_: core::ops::RangeFull) -> Self {
        Self::new(..)
    }
}

impl<T: Copy + PartialOrd> RangeCfg<T> {
    /// Creates a new `RangeCfg` from any type implementing `RangeBounds<T>`.
    pub fn new(r: impl RangeBounds<T>) -> Self {
        RangeCfg {
            start: r.start_bound().cloned(),
            end: r.end_bound().cloned(),
        }
    }

    /// Creates a `RangeCfg` that accepts any value up to and including `max`.
    pub fn up_to(max: T) -> Self {
        Self {
            start: Bound::Unbounded,
            end: Bound::Included(max),
        }
    }

    /// Creates a `RangeCfg` that only accepts exactly `value`.
    pub fn exact(value: T) -> Self {
        Self {
            start: Bound::Included(value),
            end: Bound::Included(value),
        }
    }

    /// Returns true if the value is within this range.
    pub fn contains(&self, value: &T) -> bool {
        match &self.start {
            Bound::Included(s) if value < s => return false,
            Bound::Excluded(s) if value <= s => return false,
            _ => {}
        }
        match &self.end {
            Bound::Included(e) if value > e => return false,
            Bound::Excluded(e) if value >= e => return false,
            _ => {}
        }
        true
    }
}

impl RangeCfg<usize> {
    /// Checks a decoded length against this range.
    #[inline]
    pub fn check(&self, len: usize) -> Result<usize, Error> {
        if !self.contains(&len) {
            return Err(Error::InvalidLength(len));
        }
        Ok(len)
    }

    /// Returns true if `len` lies above the upper bound, so no larger length can match.
    #[inline]
    pub fn exceeded_by(&self, len: usize) -> bool {
        match self.end {
            Bound::Included(end) => len > end,
            Bound::Excluded(end) => len >= end,
            Bound::Unbounded => false,
        }
    }
}

impl<T: Copy + PartialOrd> Default for RangeCfg<T> {
    fn default() -> Self {
        Self::new(..)
    }
}

impl<T: Copy + PartialOrd> RangeBounds<T> for RangeCfg<T> {
    fn start_bound(&self) -> Bound<&T> {
        self.start.as_ref()
    }

    fn end_bound(&self) -> Bound<&T> {
        self.end.as_ref()
    }
}
