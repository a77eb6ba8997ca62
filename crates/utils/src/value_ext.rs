use crate::f;

/// Extends primitives with more specific formatting options
pub trait ValueExt {
    /// Better scientific number formatting
    ///
    /// The default is not very consistent for scientific in particular, so this
    /// allows the fixed-width style used across nuclear data listings.
    ///
    /// Works for anything that can be represented as scientific using the
    /// `LowerExp` trait, which is pretty much every numerical primitive.
    ///
    /// ```rust
    /// # use nucov_utils::ValueExt;
    /// assert_eq!((1.39e-4).sci(5, 2), "1.39000e-04".to_string());
    /// assert_eq!((-2.0e7).sci(3, 2), "-2.000e+07".to_string());
    /// ```
    fn sci(&self, precision: usize, exp_pad: usize) -> String;
}

impl<T: std::fmt::LowerExp> ValueExt for T {
    fn sci(&self, precision: usize, exp_pad: usize) -> String {
        let formatted = f!("{:.precision$e}", &self, precision = precision);

        // LowerExp always writes an 'e', fall back to the raw string regardless
        let Some((mantissa, exp)) = formatted.split_once('e') else {
            return formatted;
        };

        // Make sure the exponent is signed and padded
        let (sign, exp) = match exp.strip_prefix('-') {
            Some(exp) => ('-', exp),
            None => ('+', exp),
        };
        f!("{mantissa}e{sign}{exp:0>exp_pad$}")
    }
}
