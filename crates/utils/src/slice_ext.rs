use crate::error::{Error, Result};

/// Extends functionality for slices of float arrays
pub trait SliceExt<T> {
    /// Find the minimum value in float arrays
    ///
    /// Only provides the minimum value from a collection of valid numbers. Any
    /// NAN values, infinite values, or empty slices will return an error.
    ///
    /// ```rust
    /// # use nucov_utils::SliceExt;
    /// # use nucov_utils::Error;
    /// // Successful cases
    /// assert_eq!([1.1, 0.5, 2.2].try_min(), Ok(0.5));
    ///
    /// // Error cases
    /// assert_eq!([1.1, f64::NAN, 2.2].try_min(), Err(Error::SliceContainsUndefinedValues));
    /// assert_eq!(Vec::<f64>::new().try_min(), Err(Error::SliceContainsNoValues));
    /// ```
    fn try_min(&self) -> Result<T>;

    /// Find the maximum value in float arrays
    ///
    /// Only provides the maximum value from a collection of valid numbers. Any
    /// NAN values, infinite values, or empty slices will return an error.
    ///
    /// ```rust
    /// # use nucov_utils::SliceExt;
    /// # use nucov_utils::Error;
    /// // Successful cases
    /// assert_eq!([1.1, 0.5, 2.2].try_max(), Ok(2.2));
    ///
    /// // Error cases
    /// assert_eq!([1.1, f64::INFINITY, 2.2].try_max(), Err(Error::SliceContainsUndefinedValues));
    /// assert_eq!(Vec::<f64>::new().try_max(), Err(Error::SliceContainsNoValues));
    /// ```
    ///
    /// The float primitives do not implement `Ord` due to `NaN` being
    /// incomparable, so this uses `total_cmp` on the validated values.
    fn try_max(&self) -> Result<T>;

    /// Find the position and value of the largest element
    ///
    /// The first occurrence wins when the maximum appears more than once.
    ///
    /// ```rust
    /// # use nucov_utils::SliceExt;
    /// assert_eq!([0.1, 0.7, 0.3, 0.7].try_argmax(), Ok((1, 0.7)));
    /// assert!(Vec::<f64>::new().try_argmax().is_err());
    /// ```
    fn try_argmax(&self) -> Result<(usize, T)>;

    /// Check that every value is strictly larger than the one before it
    ///
    /// ```rust
    /// # use nucov_utils::SliceExt;
    /// assert!([1.0e-5, 1.0, 2.0e7].is_strictly_increasing());
    /// assert!(![1.0, 1.0, 2.0].is_strictly_increasing());
    /// assert!(![2.0, 1.0].is_strictly_increasing());
    /// ```
    fn is_strictly_increasing(&self) -> bool;

    /// Find index bin containing 'value', where bins are low < value <= high
    ///
    /// A value on a bin edge returns the bin below. Values equal to the lowest
    /// bound are considered part of the first bin.
    ///
    /// # Example
    /// ```text
    ///     Boundaries: 1.0e-5 1.0e-1 1.0e+0 2.0e+1
    /// ```
    ///
    /// view of the groups
    /// ```text
    ///     1e-5 <= group 0 <= 0.1
    ///     0.1  <  group 1 <= 1.0
    ///     1.0  <  group 2 <= 20.0
    /// ```
    ///
    /// ```rust
    /// # use nucov_utils::SliceExt;
    /// let bounds = vec![1.0e-5, 0.1, 1.0, 20.0];
    ///
    /// // Find values in the array
    /// assert_eq!(bounds.find_bin_inclusive(1.0e-5), Ok(0));
    /// assert_eq!(bounds.find_bin_inclusive(0.5 ), Ok(1));
    /// assert_eq!(bounds.find_bin_inclusive(1.0 ), Ok(1));
    /// assert_eq!(bounds.find_bin_inclusive(20.0), Ok(2));
    ///
    /// // Values outside the bin bounds are an error case
    /// assert!(bounds.find_bin_inclusive(0.0).is_err());
    /// assert!(bounds.find_bin_inclusive(21.0).is_err());
    /// ```
    fn find_bin_inclusive(&self, value: T) -> Result<usize>;

    /// Find index bin containing 'value', where bins are low <= value < high
    ///
    /// A value on a bin edge returns the bin above. Values equal to the highest
    /// bound are considered part of the last bin.
    ///
    /// ```rust
    /// # use nucov_utils::SliceExt;
    /// let bounds = vec![1.0e-5, 0.1, 1.0, 20.0];
    ///
    /// // Find values in the array
    /// assert_eq!(bounds.find_bin_exclusive(1.0e-5), Ok(0));
    /// assert_eq!(bounds.find_bin_exclusive(0.5 ), Ok(1));
    /// assert_eq!(bounds.find_bin_exclusive(1.0 ), Ok(2));
    /// assert_eq!(bounds.find_bin_exclusive(20.0), Ok(2));
    ///
    /// // Values outside the bin bounds are an error case
    /// assert!(bounds.find_bin_exclusive(0.0).is_err());
    /// assert!(bounds.find_bin_exclusive(21.0).is_err());
    /// ```
    fn find_bin_exclusive(&self, value: T) -> Result<usize>;
}

impl SliceExt<f64> for [f64] {
    fn try_min(&self) -> Result<f64> {
        if self.iter().any(|v| !v.is_finite()) {
            return Err(Error::SliceContainsUndefinedValues);
        };

        self.iter()
            .min_by(|a, b| a.total_cmp(b))
            .copied()
            .ok_or(Error::SliceContainsNoValues)
    }

    fn try_max(&self) -> Result<f64> {
        self.try_argmax().map(|(_, v)| v)
    }

    fn try_argmax(&self) -> Result<(usize, f64)> {
        if self.iter().any(|v| !v.is_finite()) {
            return Err(Error::SliceContainsUndefinedValues);
        };

        // max_by keeps the last of equal elements, so fold to keep the first
        self.iter()
            .copied()
            .enumerate()
            .fold(None, |best: Option<(usize, f64)>, (i, v)| match best {
                Some((_, b)) if v <= b => best,
                _ => Some((i, v)),
            })
            .ok_or(Error::SliceContainsNoValues)
    }

    fn is_strictly_increasing(&self) -> bool {
        self.windows(2).all(|w| w[0] < w[1])
    }

    fn find_bin_inclusive(&self, value: f64) -> Result<usize> {
        let (lower_bound, upper_bound) = edges(self, value)?;

        // special case for being on the lowest edge
        if value == lower_bound {
            return Ok(0);
        }

        // range INCLUSIVE of the upper edge
        self.windows(2)
            .position(|w| w[0] < value && value <= w[1])
            .ok_or(Error::ValueOutsideOfBounds {
                value,
                lower_bound,
                upper_bound,
            })
    }

    fn find_bin_exclusive(&self, value: f64) -> Result<usize> {
        let (lower_bound, upper_bound) = edges(self, value)?;

        // special case for being on the upper edge
        if value == upper_bound {
            return Ok(self.len() - 2);
        }

        // range EXCLUSIVE of the upper edge
        self.windows(2)
            .position(|w| w[0] <= value && value < w[1])
            .ok_or(Error::UncapturedErrorCondition)
    }
}

/// Check there are bin edges to search and that the value lies within them
fn edges(bounds: &[f64], value: f64) -> Result<(f64, f64)> {
    let (lower_bound, upper_bound) = match (bounds.first(), bounds.last()) {
        (Some(l), Some(u)) if bounds.len() >= 2 => (*l, *u),
        _ => {
            return Err(Error::BelowMinimumSliceLength {
                length: bounds.len(),
                minimum_required: 2,
            })
        }
    };

    if value < lower_bound || value > upper_bound {
        return Err(Error::ValueOutsideOfBounds {
            value,
            lower_bound,
            upper_bound,
        });
    }

    Ok((lower_bound, upper_bound))
}
