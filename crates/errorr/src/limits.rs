use crate::error::{Error, Result};

use nucov_utils::SliceExt;

use std::ops::{Range, RangeInclusive};

/// Optional energy bounds (eV) applied to every section of an output
///
/// Either side may be left unset, meaning the grid's own extreme is used.
///
/// ```rust
/// # use nucov_errorr::EnergyLimits;
/// let limits = EnergyLimits::new().with_lower(11.5).with_upper(2.88e7);
/// assert_eq!(limits.lower, Some(11.5));
///
/// assert!(EnergyLimits::new().is_unbounded());
/// assert_eq!(EnergyLimits::between(1.0, 2.0), limits.with_lower(1.0).with_upper(2.0));
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct EnergyLimits {
    /// Lower bound (eV)
    pub lower: Option<f64>,
    /// Upper bound (eV)
    pub upper: Option<f64>,
}

impl EnergyLimits {
    /// No bound on either side
    pub fn new() -> Self {
        Self::default()
    }

    /// Bounded on both sides
    pub fn between(lower: f64, upper: f64) -> Self {
        Self {
            lower: Some(lower),
            upper: Some(upper),
        }
    }

    /// Set the lower bound
    pub fn with_lower(mut self, lower: f64) -> Self {
        self.lower = Some(lower);
        self
    }

    /// Set the upper bound
    pub fn with_upper(mut self, upper: f64) -> Self {
        self.upper = Some(upper);
        self
    }

    /// True if neither bound is set
    pub fn is_unbounded(&self) -> bool {
        self.lower.is_none() && self.upper.is_none()
    }

    fn invalid(&self) -> Error {
        Error::InvalidEnergyLimits {
            lower: self.lower,
            upper: self.upper,
        }
    }

    /// Half-open range of groups retained by these limits
    ///
    /// Groups that are only partly inside the limits are kept whole, so the
    /// range only ever widens to the nearest boundary that contains a limit. A
    /// limit exactly on a boundary does not pull in the neighbouring group.
    /// Limits outside the grid are clamped to its extremes.
    ///
    /// ```rust
    /// # use nucov_errorr::{EnergyLimits, GroupRange};
    /// let bounds = [0.1, 10.0, 100.0, 1.0e6];
    ///
    /// // group 1 (10-100 eV) is partly above 50 eV and is kept
    /// let range = EnergyLimits::new().with_lower(50.0).group_range(&bounds).unwrap();
    /// assert_eq!(range, GroupRange::new(1, 3));
    ///
    /// // exactly on a boundary
    /// let range = EnergyLimits::between(10.0, 100.0).group_range(&bounds).unwrap();
    /// assert_eq!(range, GroupRange::new(1, 2));
    /// ```
    pub fn group_range(&self, bounds: &[f64]) -> Result<GroupRange> {
        let (e_min, e_max) = match (bounds.first(), bounds.last()) {
            (Some(l), Some(u)) if bounds.len() >= 2 => (*l, *u),
            _ => return Err(nucov_utils::Error::SliceContainsNoValues.into()),
        };
        let n_groups = bounds.len() - 1;

        if self.lower.is_some_and(|l| !l.is_finite()) || self.upper.is_some_and(|u| !u.is_finite())
        {
            return Err(self.invalid());
        }

        // low <= lower < high, so a lower limit on a boundary starts that group
        let start = match self.lower {
            Some(lower) if lower > e_min => bounds.find_bin_exclusive(lower.min(e_max))?,
            _ => 0,
        };

        // low < upper <= high, so an upper limit on a boundary ends that group
        let end = match self.upper {
            Some(upper) if upper < e_max => bounds.find_bin_inclusive(upper.max(e_min))? + 1,
            _ => n_groups,
        };

        if start >= end {
            return Err(self.invalid());
        }

        Ok(GroupRange::new(start, end))
    }
}

/// Half-open range of group indices `[start, end)`
///
/// The retained boundaries of the same crop are `start..=end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GroupRange {
    /// First retained group
    pub start: usize,
    /// One past the last retained group
    pub end: usize,
}

impl GroupRange {
    /// Range covering groups `start` to `end - 1`
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Range covering every one of `n_groups`
    pub fn full(n_groups: usize) -> Self {
        Self::new(0, n_groups)
    }

    /// Number of groups in the range
    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    /// True if the range holds no groups
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Indices of the groups in the range
    pub fn groups(&self) -> Range<usize> {
        self.start..self.end
    }

    /// Indices of the boundaries enclosing the groups in the range
    pub fn boundaries(&self) -> RangeInclusive<usize> {
        self.start..=self.end
    }

    /// True if this range spans all of `n_groups`
    pub fn is_full(&self, n_groups: usize) -> bool {
        self.start == 0 && self.end == n_groups
    }
}

impl std::fmt::Display for GroupRange {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "groups {}..{}", self.start, self.end)
    }
}
