//! Module for reading NJOY ERRORR multigroup covariance output
//!
//! An ERRORR output holds, for one material, the group structure used in
//! processing (MF1/MT451), mean values per group for each reaction (MF3) or
//! spectrum (MF5), and the relative covariance between groups (MF33/MF35).
//!
//! - [ErrorrOutput] - Every reaction of an output, keyed by MT number
//! - [Section] - One reaction with all of its derived statistics
//! - [EnergyLimits] - Optional energy bounds used to crop every section
//!
//! Each [Section] is built from three blocks:
//!
//! | Block              | File      | Description                                  |
//! | ------------------ | --------- | -------------------------------------------- |
//! | [EnergyGrid]       | MF1       | group boundaries shared by every section     |
//! | [MeanBlock]        | MF3, MF5  | mean value in each group                     |
//! | [CovarianceMatrix] | MF33, MF35 | relative covariance, stored as one triangle |
//!
//! The derived quantities (uncertainties, correlation, absolute covariance and
//! the sorted eigen-decomposition) are computed once when the section is
//! built. Rank-k reconstruction, PCA sampling, and the uncertainty convergence
//! table are computed on request.
//!
//! # Quickstart example
//!
//! ```rust, no_run
//! # use nucov_errorr::{EnergyLimits, ErrorrOutput, MemoryArchive};
//! let mut archive = MemoryArchive::new();
//! archive.load_section(1, 451, "data/nubar/mf1_mt451.txt").unwrap();
//! archive.load_section(3, 452, "data/nubar/mf3_mt452.txt").unwrap();
//! archive.load_section(33, 452, "data/nubar/mf33_mt452.txt").unwrap();
//!
//! // Keep only the groups above 1 keV
//! let limits = EnergyLimits::new().with_lower(1.0e3);
//! let output = ErrorrOutput::new(&archive, limits).unwrap();
//!
//! // Total nubar
//! let nubar = output.get(452).unwrap();
//! let table = nubar.uncertainty_convergence();
//! println!("{table}");
//!
//! // Reproduce the uncertainty to 1% with as few components as possible
//! let k = table.minimal_rank(0.01).unwrap_or(nubar.num_groups());
//! let samples = nubar.pca_realizations_seeded(500, k, 42);
//! ```

mod archive;
mod covariance;
mod energy;
mod error;
mod limits;
mod mean;
mod output;
mod section;
mod statistics;

#[doc(inline)]
pub use error::{Error, Result};

#[doc(inline)]
pub use archive::{ArchiveReader, MemoryArchive};

#[doc(inline)]
pub use output::ErrorrOutput;

#[doc(inline)]
pub use section::Section;

#[doc(inline)]
pub use limits::{EnergyLimits, GroupRange};

#[doc(inline)]
pub use energy::EnergyGrid;

#[doc(inline)]
pub use mean::{MeanBlock, MeanKind};

#[doc(inline)]
pub use covariance::CovarianceMatrix;

#[doc(inline)]
pub use statistics::{ConvergenceRow, ConvergenceTable, Eigen};
