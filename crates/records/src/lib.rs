//! Fixed-width record decoding for ERRORR section bodies
//!
//! Every line of an ENDF-style file is an 80 column record. Numbers are packed
//! into fixed columns with no delimiters, and real values are usually written
//! in the compact Fortran form that drops the exponent letter (`1.234567-5`).
//!
//! - [Layout] - Column layout of a record, with the [CONTROL] and [VALUES]
//!   layouts used throughout
//! - [LineCursor] - Read-only cursor over the lines of one section body
//! - [ControlRecord] - The two-line header common to every section
//!
//! The remaining fields of a control record mean different things depending on
//! where it appears, so each context has a named schema:
//!
//! | Schema               | Used for                                          |
//! | -------------------- | ------------------------------------------------- |
//! | [EnergyHeader]       | group structure in MF1/MT451                      |
//! | [CrossSectionHeader] | mean values of cross-section-like data in MF3     |
//! | [SpectrumHeader]     | mean values of spectrum-like data in MF5          |
//! | [CovarianceHeader]   | covariance blocks in MF33/MF35                    |
//! | [SubControl]         | each compressed row of a covariance block         |
//!
//! # Quickstart example
//!
//! ```rust
//! # use nucov_records::{EnergyHeader, LineCursor};
//! let lines = [
//!     " 9.223500+4 2.330248+2          6          0          0          09228 1451    1",
//!     " 0.000000+0 0.000000+0          2          0          3          09228 1451    2",
//!     " 1.000000-5 1.000000+0 2.000000+7 0.000000+0                      9228 1451    3",
//! ];
//!
//! let mut cursor = LineCursor::new(&lines);
//! let header = EnergyHeader::read(&mut cursor).unwrap();
//! let bounds = cursor.values(header.num_boundaries).unwrap();
//!
//! assert_eq!(bounds, vec![1.0e-5, 1.0, 2.0e7]);
//! ```

mod control;
mod cursor;
mod error;
mod layout;
mod number;

#[doc(inline)]
pub use error::{Error, Result};

#[doc(inline)]
pub use layout::{Field, FieldKind, Layout, CONTROL, VALUES};

#[doc(inline)]
pub use cursor::LineCursor;

#[doc(inline)]
pub use control::{
    ControlRecord, CovarianceHeader, CrossSectionHeader, EnergyHeader, SectionId, SpectrumHeader,
    SubControl,
};
