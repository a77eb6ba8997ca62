//! Control records and the per-context header schemas built from them
//!
//! Every section starts with control records in the [CONTROL] layout. The
//! first five identifying values are common to all of them, but the meaning of
//! the remaining fields depends on where the record appears. Rather than
//! indexing into the flat field list everywhere, each context gets a named
//! schema that is decoded once.
//!
//! | Schema                 | Lines | Fields of interest (flat offsets)            |
//! | ---------------------- | ----- | -------------------------------------------- |
//! | [EnergyHeader]         | 2     | temperature (10), groups (12), bounds (14)   |
//! | [CrossSectionHeader]   | 2     | groups (14)                                  |
//! | [SpectrumHeader]       | 1     | incident energy (1), groups (4)              |
//! | [CovarianceHeader]     | 2     | cross-reaction MT (13), sections (15)        |
//! | [SubControl]           | 1     | count (2), column start (3), echo (4), row (5) |
//!
//! The identifiers (MAT 6, MF 7, MT 8) are on every line and can be read on
//! their own with [SectionId].

use crate::cursor::LineCursor;
use crate::error::{Error, Result};
use crate::layout::{Field, CONTROL};

use log::{trace, warn};

/// Flat offsets of the identifying fields within a control line
const ZA: usize = 0;
const AWR: usize = 1;
const MAT: usize = 6;
const MF: usize = 7;
const MT: usize = 8;

/// Convert a decoded integer field into an index or count
fn count(name: &'static str, field: Field) -> Result<usize> {
    let value = field.as_i64();
    usize::try_from(value).map_err(|_| Error::OutOfRange { name, value })
}

/// Convert a decoded integer field into a MAT/MF/MT identifier
fn identifier(name: &'static str, field: Field) -> Result<u32> {
    let value = field.as_i64();
    u32::try_from(value).map_err(|_| Error::OutOfRange { name, value })
}

/// Material, file and section identifiers carried on every record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SectionId {
    /// Material number
    pub mat: u32,
    /// File number
    pub mf: u32,
    /// Section/reaction number
    pub mt: u32,
}

impl SectionId {
    /// Identify the section a control line belongs to
    ///
    /// ```rust
    /// # use nucov_records::SectionId;
    /// let line = " 0.000000+0 2.500000+5          0          0         30          19228 5 18    1";
    /// let id = SectionId::from_line(line).unwrap();
    /// assert_eq!((id.mat, id.mf, id.mt), (9228, 5, 18));
    /// ```
    pub fn from_line(line: &str) -> Result<Self> {
        let fields = CONTROL.decode(line)?;
        Ok(Self {
            mat: identifier("MAT", fields[MAT])?,
            mf: identifier("MF", fields[MF])?,
            mt: identifier("MT", fields[MT])?,
        })
    }
}

/// Common decoded header of a section
///
/// Built from two consecutive [CONTROL] lines, giving a flat list of 20
/// fields. The identifying values are taken from the first line.
#[derive(Debug, Clone, PartialEq)]
pub struct ControlRecord {
    /// Nuclide identifier, `1000*Z + A`
    pub za: f64,
    /// Atomic weight ratio to the neutron mass
    pub awr: f64,
    /// Material number
    pub mat: u32,
    /// File number
    pub mf: u32,
    /// Section/reaction number
    pub mt: u32,
    fields: Vec<Field>,
}

impl ControlRecord {
    /// Number of physical lines in a control block
    pub const LINES: usize = 2;

    /// Decode a control block from its two lines
    ///
    /// ```rust
    /// # use nucov_records::ControlRecord;
    /// let control = ControlRecord::from_lines(
    ///     " 9.223500+4 2.330248+2          6          0          0          09228 1451    1",
    ///     " 0.000000+0 0.000000+0         30          0         31          09228 1451    2",
    /// ).unwrap();
    /// assert_eq!(control.za, 92235.0);
    /// assert_eq!(control.mt, 451);
    /// assert_eq!(control.fields().len(), 20);
    /// ```
    pub fn from_lines(first: &str, second: &str) -> Result<Self> {
        let lines = [first, second];
        Self::read(&mut LineCursor::new(&lines))
    }

    /// Decode a control block at the cursor
    pub fn read<S: AsRef<str>>(cursor: &mut LineCursor<'_, S>) -> Result<Self> {
        let mut fields = cursor.decode_next(&CONTROL)?;
        fields.extend(cursor.decode_next(&CONTROL)?);
        Self::from_fields(fields)
    }

    fn from_fields(fields: Vec<Field>) -> Result<Self> {
        Ok(Self {
            za: fields[ZA].as_f64(),
            awr: fields[AWR].as_f64(),
            mat: identifier("MAT", fields[MAT])?,
            mf: identifier("MF", fields[MF])?,
            mt: identifier("MT", fields[MT])?,
            fields,
        })
    }

    /// Every decoded field across both lines
    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    fn field(&self, offset: usize) -> Field {
        self.fields[offset]
    }
}

/// Header of the energy group structure (MF1/MT451)
#[derive(Debug, Clone, PartialEq)]
pub struct EnergyHeader {
    /// Common identifying fields
    pub control: ControlRecord,
    /// Processing temperature (K)
    pub temperature: f64,
    /// Number of energy groups
    pub num_groups: usize,
    /// Number of group boundaries, expected to be `num_groups + 1`
    pub num_boundaries: usize,
}

impl EnergyHeader {
    /// Decode the energy header at the cursor
    pub fn read<S: AsRef<str>>(cursor: &mut LineCursor<'_, S>) -> Result<Self> {
        let control = ControlRecord::read(cursor)?;
        let header = Self {
            temperature: control.field(10).as_f64(),
            num_groups: count("number of groups", control.field(12))?,
            num_boundaries: count("number of boundaries", control.field(14))?,
            control,
        };
        trace!("{header:?}");
        Ok(header)
    }
}

/// Header of a cross-section-like mean value block (MF3)
#[derive(Debug, Clone, PartialEq)]
pub struct CrossSectionHeader {
    /// Common identifying fields
    pub control: ControlRecord,
    /// Number of values in the block
    pub num_groups: usize,
}

impl CrossSectionHeader {
    /// Decode the cross section header at the cursor
    pub fn read<S: AsRef<str>>(cursor: &mut LineCursor<'_, S>) -> Result<Self> {
        let control = ControlRecord::read(cursor)?;
        let header = Self {
            num_groups: count("number of groups", control.field(14))?,
            control,
        };
        trace!("{header:?}");
        Ok(header)
    }
}

/// Single-line header of a spectrum-like mean value block (MF5)
///
/// Spectrum sections carry no leading section header, the incident energy
/// list record comes first.
#[derive(Debug, Clone, PartialEq)]
pub struct SpectrumHeader {
    /// Incident energy of this spectrum block (eV)
    pub incident_energy: f64,
    /// Number of values in the block
    pub num_groups: usize,
    /// Material number
    pub mat: u32,
    /// File number
    pub mf: u32,
    /// Section/reaction number
    pub mt: u32,
}

impl SpectrumHeader {
    /// Decode the spectrum header at the cursor
    ///
    /// ```rust
    /// # use nucov_records::{LineCursor, SpectrumHeader};
    /// let lines = [" 0.000000+0 2.500000+5          0          0         30          19228 5 18    1"];
    /// let header = SpectrumHeader::read(&mut LineCursor::new(&lines)).unwrap();
    /// assert_eq!(header.incident_energy, 2.5e5);
    /// assert_eq!(header.num_groups, 30);
    /// assert_eq!(header.mt, 18);
    /// ```
    pub fn read<S: AsRef<str>>(cursor: &mut LineCursor<'_, S>) -> Result<Self> {
        let fields = cursor.decode_next(&CONTROL)?;
        let header = Self {
            incident_energy: fields[1].as_f64(),
            num_groups: count("number of groups", fields[4])?,
            mat: identifier("MAT", fields[MAT])?,
            mf: identifier("MF", fields[MF])?,
            mt: identifier("MT", fields[MT])?,
        };
        trace!("{header:?}");
        Ok(header)
    }
}

/// Header of a covariance block (MF33/MF35)
#[derive(Debug, Clone, PartialEq)]
pub struct CovarianceHeader {
    /// Common identifying fields
    pub control: ControlRecord,
    /// Reaction the covariance is taken against, equal to `MT` for the
    /// covariance of a reaction with itself
    pub cross_reaction: u32,
    /// Number of compressed row records that follow
    pub num_sections: usize,
}

impl CovarianceHeader {
    /// Decode the covariance header at the cursor
    pub fn read<S: AsRef<str>>(cursor: &mut LineCursor<'_, S>) -> Result<Self> {
        let control = ControlRecord::read(cursor)?;
        let header = Self {
            cross_reaction: identifier("MT1", control.field(13))?,
            num_sections: count("number of sections", control.field(15))?,
            control,
        };
        trace!("{header:?}");
        Ok(header)
    }

    /// True when the block is the covariance of a reaction with itself
    pub fn is_self_covariance(&self) -> bool {
        self.cross_reaction == self.control.mt
    }
}

/// Control line preceding each compressed row of a covariance matrix
///
/// Groups are 1-based, as written in the file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubControl {
    /// Row of the matrix the values belong to
    pub row_group: usize,
    /// Column of the first value
    pub col_group_start: usize,
    /// Number of consecutive values in the row
    pub value_count: usize,
}

impl SubControl {
    /// Decode a row sub-control at the cursor
    ///
    /// ```rust
    /// # use nucov_records::{LineCursor, SubControl};
    /// let lines = [" 0.000000+0 0.000000+0          3          1          3          4922833452   10"];
    /// let sub = SubControl::read(&mut LineCursor::new(&lines)).unwrap();
    /// assert_eq!(sub.row_group, 4);
    /// assert_eq!(sub.col_group_start, 1);
    /// assert_eq!(sub.value_count, 3);
    /// ```
    pub fn read<S: AsRef<str>>(cursor: &mut LineCursor<'_, S>) -> Result<Self> {
        let index = cursor.position();
        let fields = cursor.decode_next(&CONTROL)?;
        let sub = Self {
            value_count: count("number of values", fields[2])?,
            col_group_start: count("first column group", fields[3])?,
            row_group: count("row group", fields[5])?,
        };

        // the count is written twice, only the first is used
        let echo = fields[4].as_i64();
        if echo != sub.value_count as i64 {
            warn!(
                "Line {index}: value count {} does not match its echo {echo}",
                sub.value_count
            );
        }

        Ok(sub)
    }

    /// Half-open range of 0-based columns covered by the values
    pub fn columns(&self) -> std::ops::Range<usize> {
        let start = self.col_group_start.saturating_sub(1);
        start..start + self.value_count
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ENERGY: [&str; 2] = [
        " 9.223500+4 2.330248+2          6          0          0          09228 1451    1",
        " 2.936000+2 0.000000+0         30          0         31          09228 1451    2",
    ];

    const COVARIANCE: [&str; 2] = [
        " 9.223500+4 2.330248+2          0          0          0          1922833452    1",
        " 0.000000+0 0.000000+0          0        452          0         30922833452    2",
    ];

    #[test]
    fn identifiers() {
        let control = ControlRecord::from_lines(ENERGY[0], ENERGY[1]).unwrap();
        assert_eq!(control.za, 92235.0);
        assert_eq!(control.awr, 233.0248);
        assert_eq!(control.mat, 9228);
        assert_eq!(control.mf, 1);
        assert_eq!(control.mt, 451);
    }

    #[test]
    fn energy_header() {
        let header = EnergyHeader::read(&mut LineCursor::new(&ENERGY)).unwrap();
        assert_eq!(header.temperature, 293.6);
        assert_eq!(header.num_groups, 30);
        assert_eq!(header.num_boundaries, 31);
    }

    #[test]
    fn covariance_header() {
        let header = CovarianceHeader::read(&mut LineCursor::new(&COVARIANCE)).unwrap();
        assert_eq!(header.control.mf, 33);
        assert_eq!(header.control.mt, 452);
        assert_eq!(header.cross_reaction, 452);
        assert_eq!(header.num_sections, 30);
        assert!(header.is_self_covariance());
    }

    #[test]
    fn negative_count() {
        let lines = [
            " 0.000000+0 0.000000+0          0          0         -5          09228 3452    1",
        ];
        let result = SpectrumHeader::read(&mut LineCursor::new(&lines));
        assert_eq!(
            result,
            Err(Error::OutOfRange {
                name: "number of groups",
                value: -5
            })
        );
    }

    #[test]
    fn bad_line_is_located() {
        let lines = [ENERGY[0], &ENERGY[1][..40]];
        match ControlRecord::read(&mut LineCursor::new(&lines)) {
            Err(Error::AtLine { index, .. }) => assert_eq!(index, 1),
            other => panic!("expected AtLine, got {other:?}"),
        }
    }

    #[test]
    fn sub_control_columns() {
        let sub = SubControl {
            row_group: 5,
            col_group_start: 2,
            value_count: 4,
        };
        assert_eq!(sub.columns(), 1..5);
    }
}
