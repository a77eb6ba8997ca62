use crate::error::{Error, Result};
use crate::limits::{EnergyLimits, GroupRange};

use nucov_records::{EnergyHeader, LineCursor};
use nucov_utils::{OptionExt, SliceExt, ValueExt};

use log::debug;

/// Energy group structure of an ERRORR output (MF1/MT451)
///
/// The boundaries are held for the full grid as read from the file, along
/// with the [GroupRange] selected by any energy limits. Every accessor
/// reflects the cropped grid unless stated otherwise.
#[derive(Debug, Clone, PartialEq)]
pub struct EnergyGrid {
    header: EnergyHeader,
    boundaries: Vec<f64>,
    range: GroupRange,
}

impl EnergyGrid {
    /// Parse the group structure, cropping to the given limits
    ///
    /// The value block carries a trailing zero after the last boundary, which
    /// is discarded along with any other padding.
    pub fn parse<S: AsRef<str>>(lines: &[S], limits: EnergyLimits) -> Result<Self> {
        let mut cursor = LineCursor::new(lines);
        let header = EnergyHeader::read(&mut cursor)?;

        let expected = header.num_groups + 1;
        if header.num_groups == 0 || header.num_boundaries != expected {
            return Err(Error::InvalidBoundaryCount {
                groups: header.num_groups,
                expected,
                found: header.num_boundaries,
            });
        }

        let boundaries = cursor.values(expected)?;
        if !boundaries.is_strictly_increasing() {
            let index = boundaries
                .windows(2)
                .position(|w| w[0] >= w[1])
                .map_or(0, |i| i + 1);
            return Err(Error::NonIncreasingBoundaries {
                index,
                value: boundaries[index],
            });
        }

        let range = limits.group_range(&boundaries)?;
        debug!(
            "Energy grid MAT{} with {} groups, {:.3e} to {:.3e} eV",
            header.control.mat,
            header.num_groups,
            boundaries[0],
            boundaries[header.num_groups]
        );
        if !range.is_full(header.num_groups) {
            debug!(
                "  limits {} to {} eV retain {range}",
                limits.lower.display(),
                limits.upper.display()
            );
        }

        Ok(Self {
            header,
            boundaries,
            range,
        })
    }

    /// Decoded header
    pub fn header(&self) -> &EnergyHeader {
        &self.header
    }

    /// Material number
    pub fn mat(&self) -> u32 {
        self.header.control.mat
    }

    /// Processing temperature (K)
    pub fn temperature(&self) -> f64 {
        self.header.temperature
    }

    /// Range of the full grid retained by the energy limits
    pub fn range(&self) -> GroupRange {
        self.range
    }

    /// Number of retained groups
    pub fn num_groups(&self) -> usize {
        self.range.len()
    }

    /// Number of groups in the full grid
    pub fn full_num_groups(&self) -> usize {
        self.header.num_groups
    }

    /// Retained group boundaries (eV), one more than the number of groups
    pub fn group_boundaries(&self) -> &[f64] {
        &self.boundaries[self.range.boundaries()]
    }

    /// Every group boundary of the full grid (eV)
    pub fn all_boundaries(&self) -> &[f64] {
        &self.boundaries
    }

    /// Human readable summary of the retained energy range
    pub fn describe(&self) -> String {
        let bounds = self.group_boundaries();
        format!(
            "{} groups from {} to {} eV",
            self.num_groups(),
            bounds[0].sci(4, 2),
            bounds[bounds.len() - 1].sci(4, 2)
        )
    }
}
