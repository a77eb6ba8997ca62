//! `nucov` is a small toolkit for turning ERRORR multigroup covariance output
//! into validated numeric artifacts for uncertainty quantification
//!
#![doc = include_str!("../readme.md")]
#![deny(missing_docs, missing_debug_implementations)]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]

// Re-exports of toolkit crates.
#[doc(inline)]
pub use nucov_records as records;

#[doc(inline)]
pub use nucov_utils as utils;

#[cfg(feature = "errorr")]
#[cfg_attr(docsrs, doc(cfg(feature = "errorr")))]
#[doc(inline)]
pub use nucov_errorr as errorr;
