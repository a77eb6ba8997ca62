use crate::error::{Error, Result};
use crate::limits::GroupRange;

use nucov_records::{CrossSectionHeader, LineCursor, SectionId, SpectrumHeader};

use log::{debug, warn};

/// Kind of mean quantity, decided by the file it was read from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MeanKind {
    /// Cross-section-like data such as nubar or reaction cross sections (MF3)
    CrossSection,
    /// Spectrum-like data for a given incident energy (MF5)
    Spectrum,
}

impl MeanKind {
    /// Kind of data held in file `mf`
    ///
    /// ```rust
    /// # use nucov_errorr::MeanKind;
    /// assert_eq!(MeanKind::from_mf(3).unwrap(), MeanKind::CrossSection);
    /// assert_eq!(MeanKind::from_mf(5).unwrap(), MeanKind::Spectrum);
    /// assert!(MeanKind::from_mf(33).is_err());
    /// ```
    pub fn from_mf(mf: u32) -> Result<Self> {
        match mf {
            3 => Ok(Self::CrossSection),
            5 => Ok(Self::Spectrum),
            _ => Err(Error::UnsupportedFile(mf)),
        }
    }

    /// Infer the kind from the file number carried on the first line
    pub fn detect<S: AsRef<str>>(lines: &[S]) -> Result<Self> {
        let first = LineCursor::new(lines).next_line()?;
        Self::from_mf(SectionId::from_line(first)?.mf)
    }

    /// File number the kind is stored under
    pub fn mf(&self) -> u32 {
        match self {
            Self::CrossSection => 3,
            Self::Spectrum => 5,
        }
    }
}

/// Mean value of the quantity in every group
#[derive(Debug, Clone, PartialEq)]
pub struct MeanBlock {
    kind: MeanKind,
    mat: u32,
    mf: u32,
    mt: u32,
    incident_energy: Option<f64>,
    values: Vec<f64>,
    range: GroupRange,
}

impl MeanBlock {
    /// Parse a mean value block, keeping only the groups in `range`
    ///
    /// Spectrum sections may hold blocks for several incident energies, only
    /// the first is read.
    pub fn parse<S: AsRef<str>>(lines: &[S], range: GroupRange) -> Result<Self> {
        let kind = MeanKind::detect(lines)?;
        let mut cursor = LineCursor::new(lines);

        let mut block = match kind {
            MeanKind::CrossSection => {
                let header = CrossSectionHeader::read(&mut cursor)?;
                Self {
                    kind,
                    mat: header.control.mat,
                    mf: header.control.mf,
                    mt: header.control.mt,
                    incident_energy: None,
                    values: cursor.values(header.num_groups)?,
                    range,
                }
            }
            MeanKind::Spectrum => {
                let header = SpectrumHeader::read(&mut cursor)?;
                Self {
                    kind,
                    mat: header.mat,
                    mf: header.mf,
                    mt: header.mt,
                    incident_energy: Some(header.incident_energy),
                    values: cursor.values(header.num_groups)?,
                    range,
                }
            }
        };

        if range.end > block.values.len() {
            return Err(Error::GroupCountMismatch {
                what: "mean value block",
                expected: range.end,
                found: block.values.len(),
            });
        }

        if !cursor.is_exhausted() {
            match kind {
                MeanKind::Spectrum => debug!(
                    "MT{} has further incident energy blocks, only {:?} eV is used",
                    block.mt, block.incident_energy
                ),
                MeanKind::CrossSection => warn!(
                    "MT{} has {} unread lines after the mean values",
                    block.mt,
                    cursor.remaining()
                ),
            }
        }

        block.values.shrink_to_fit();
        Ok(block)
    }

    /// Kind of quantity
    pub fn kind(&self) -> MeanKind {
        self.kind
    }

    /// Material number
    pub fn mat(&self) -> u32 {
        self.mat
    }

    /// File number
    pub fn mf(&self) -> u32 {
        self.mf
    }

    /// Section/reaction number
    pub fn mt(&self) -> u32 {
        self.mt
    }

    /// Incident energy (eV) of a spectrum, `None` for cross sections
    pub fn incident_energy(&self) -> Option<f64> {
        self.incident_energy
    }

    /// Mean values of the retained groups
    pub fn values(&self) -> &[f64] {
        &self.values[self.range.groups()]
    }

    /// Number of values in the uncropped block
    pub fn full_num_groups(&self) -> usize {
        self.values.len()
    }
}
