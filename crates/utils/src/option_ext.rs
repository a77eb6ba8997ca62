use crate::f;

/// Extends Option for easy display formatting
pub trait OptionExt {
    /// Better option outputs
    ///
    /// Generic over anything that implements `Display`, this will either be the
    /// value contained within `Some()` or "none" for the `None` variant. Handy
    /// for logging optional energy bounds.
    ///
    /// ```rust
    /// # use nucov_utils::OptionExt;
    /// let upper: Option<f64> = Some(2.0e7);
    /// assert_eq!(upper.display(), "20000000");
    ///
    /// let lower: Option<f64> = None;
    /// assert_eq!(lower.display(), "none");
    /// ```
    fn display(&self) -> String;
}

impl<T: std::fmt::Display> OptionExt for Option<T> {
    fn display(&self) -> String {
        match self {
            Some(value) => f!("{value}"),
            None => "none".to_string(),
        }
    }
}
