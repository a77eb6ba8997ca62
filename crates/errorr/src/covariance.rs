use crate::error::{Error, Result};
use crate::limits::GroupRange;

use nucov_records::{CovarianceHeader, LineCursor, SubControl};

use log::{debug, trace};
use nalgebra::{DMatrix, DVector};

/// Relative covariance matrix of a reaction (MF33/MF35)
///
/// The file only stores one triangle of the symmetric matrix as compressed
/// rows. The missing triangle is filled in from its mirror as soon as the
/// rows are assembled, so [CovarianceMatrix::matrix] is always fully
/// symmetric. Where both triangles are populated, the lower triangle wins.
///
/// Every diagonal entry of the retained groups is strictly positive.
#[derive(Debug, Clone, PartialEq)]
pub struct CovarianceMatrix {
    header: CovarianceHeader,
    matrix: DMatrix<f64>,
    range: GroupRange,
}

impl CovarianceMatrix {
    /// Assemble the `num_groups` square matrix and crop it to `range`
    ///
    /// Rows are read until the number of sections declared in the header is
    /// reached or the block runs out of lines.
    pub fn parse<S: AsRef<str>>(lines: &[S], num_groups: usize, range: GroupRange) -> Result<Self> {
        let mut cursor = LineCursor::new(lines);
        let header = CovarianceHeader::read(&mut cursor)?;
        debug!(
            "Covariance MF{}/MT{} against MT{} with {} rows",
            header.control.mf, header.control.mt, header.cross_reaction, header.num_sections
        );

        if range.end > num_groups {
            return Err(Error::GroupCountMismatch {
                what: "covariance matrix",
                expected: range.end,
                found: num_groups,
            });
        }

        let mut matrix = assemble(&mut cursor, header.num_sections, num_groups)?;
        complete_symmetry(&mut matrix);

        let matrix = matrix
            .view((range.start, range.start), (range.len(), range.len()))
            .into_owned();
        check_diagonal(&matrix)?;

        Ok(Self {
            header,
            matrix,
            range,
        })
    }

    /// Decoded header
    pub fn header(&self) -> &CovarianceHeader {
        &self.header
    }

    /// Full symmetric relative covariance of the retained groups
    pub fn matrix(&self) -> &DMatrix<f64> {
        &self.matrix
    }

    /// Number of retained groups
    pub fn size(&self) -> usize {
        self.matrix.nrows()
    }

    /// Relative variance of each retained group
    pub fn diagonal(&self) -> DVector<f64> {
        self.matrix.diagonal()
    }

    /// Groups of the full grid retained in the matrix
    pub fn range(&self) -> GroupRange {
        self.range
    }
}

/// Write every compressed row into a zeroed square matrix
fn assemble<S: AsRef<str>>(
    cursor: &mut LineCursor<'_, S>,
    num_sections: usize,
    num_groups: usize,
) -> Result<DMatrix<f64>> {
    let mut matrix = DMatrix::<f64>::zeros(num_groups, num_groups);

    for _ in 0..num_sections {
        if cursor.is_exhausted() {
            break;
        }

        let sub = SubControl::read(cursor)?;
        let columns = sub.columns();

        if sub.row_group == 0
            || sub.row_group > num_groups
            || sub.col_group_start == 0
            || columns.end > num_groups
        {
            return Err(Error::RecordOutOfBounds {
                row: sub.row_group,
                col_start: sub.col_group_start,
                count: sub.value_count,
                groups: num_groups,
            });
        }

        let values = cursor.values(sub.value_count)?;
        trace!(
            "  row {} columns {}..={}",
            sub.row_group,
            sub.col_group_start,
            columns.end
        );
        let row = sub.row_group - 1;
        for (col, value) in columns.zip(values) {
            matrix[(row, col)] = value;
        }
    }

    Ok(matrix)
}

/// Fill each unpopulated element from its mirror across the diagonal
fn complete_symmetry(matrix: &mut DMatrix<f64>) {
    let n = matrix.nrows();
    for i in 0..n {
        for j in 0..i {
            let lower = matrix[(i, j)];
            if lower == 0.0 {
                matrix[(i, j)] = matrix[(j, i)];
            } else {
                matrix[(j, i)] = lower;
            }
        }
    }
}

/// Every variance must be strictly positive
fn check_diagonal(matrix: &DMatrix<f64>) -> Result<()> {
    let entries: Vec<(usize, f64)> = matrix
        .diagonal()
        .iter()
        .copied()
        .enumerate()
        .filter(|(_, v)| !(*v > 0.0))
        .collect();

    if entries.is_empty() {
        Ok(())
    } else {
        Err(Error::NonPositiveDiagonal {
            size: matrix.nrows(),
            entries,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: [&str; 2] = [
        " 9.223500+4 2.330248+2          0          0          0          1922833452    1",
        " 0.000000+0 0.000000+0          0        452          0          3922833452    2",
    ];

    /// Lower triangle of a 3 group matrix, one row per record
    fn lower_rows() -> Vec<&'static str> {
        let mut lines = HEADER.to_vec();
        lines.extend([
            " 0.000000+0 0.000000+0          1          1          1          1922833452    3",
            " 4.000000-4                                                       922833452    4",
            " 0.000000+0 0.000000+0          2          1          2          2922833452    5",
            " 1.000000-4 9.000000-4                                            922833452    6",
            " 0.000000+0 0.000000+0          3          1          3          3922833452    7",
            " 2.000000-5 3.000000-4 1.600000-3                                 922833452    8",
        ]);
        lines
    }

    #[test]
    fn mirrors_lower_triangle() {
        let cov = CovarianceMatrix::parse(&lower_rows(), 3, GroupRange::full(3)).unwrap();
        let m = cov.matrix();
        assert_eq!(cov.size(), 3);
        assert_eq!(m[(0, 0)], 4.0e-4);
        assert_eq!(m[(1, 0)], 1.0e-4);
        assert_eq!(m[(0, 1)], 1.0e-4);
        assert_eq!(m[(2, 0)], 2.0e-5);
        assert_eq!(m[(0, 2)], 2.0e-5);
        assert_eq!(m[(1, 2)], 3.0e-4);
        assert_eq!(m, &m.transpose());
        assert!(cov.header().is_self_covariance());
    }

    #[test]
    fn mirrors_upper_triangle() {
        let mut lines = HEADER.to_vec();
        lines.extend([
            " 0.000000+0 0.000000+0          3          1          3          1922833452    3",
            " 4.000000-4 1.000000-4 2.000000-5                                 922833452    4",
            " 0.000000+0 0.000000+0          2          2          2          2922833452    5",
            " 9.000000-4 3.000000-4                                            922833452    6",
            " 0.000000+0 0.000000+0          1          3          1          3922833452    7",
            " 1.600000-3                                                       922833452    8",
        ]);
        let upper = CovarianceMatrix::parse(&lines, 3, GroupRange::full(3)).unwrap();
        let lower = CovarianceMatrix::parse(&lower_rows(), 3, GroupRange::full(3)).unwrap();
        assert_eq!(upper.matrix(), lower.matrix());
    }

    #[test]
    fn cropped_both_axes() {
        let cov = CovarianceMatrix::parse(&lower_rows(), 3, GroupRange::new(1, 3)).unwrap();
        assert_eq!(cov.size(), 2);
        assert_eq!(cov.matrix()[(0, 0)], 9.0e-4);
        assert_eq!(cov.matrix()[(1, 0)], 3.0e-4);
        assert_eq!(cov.diagonal().as_slice(), &[9.0e-4, 1.6e-3]);
    }

    #[test]
    fn stops_at_declared_sections() {
        // declare only two rows, the third is never read
        let header = HEADER[1].replacen("          3922833452", "          2922833452", 1);
        let mut lines: Vec<&str> = lower_rows();
        lines[1] = header.as_str();
        let cov = CovarianceMatrix::parse(&lines, 3, GroupRange::new(0, 2)).unwrap();
        assert_eq!(cov.header().num_sections, 2);
        assert_eq!(cov.matrix()[(1, 1)], 9.0e-4);
    }

    #[test]
    fn zero_diagonal_is_fatal() {
        // the last row is missing, leaving the final variance at zero
        let lines = lower_rows();
        match CovarianceMatrix::parse(&lines[..6], 3, GroupRange::full(3)) {
            Err(Error::NonPositiveDiagonal { size, entries }) => {
                assert_eq!(size, 3);
                assert_eq!(entries, vec![(2, 0.0)]);
            }
            other => panic!("expected NonPositiveDiagonal, got {other:?}"),
        }
    }

    #[test]
    fn crop_can_drop_bad_groups() {
        // the zero variance of the last group is outside the retained range
        let lines = lower_rows();
        assert!(CovarianceMatrix::parse(&lines[..6], 3, GroupRange::new(0, 2)).is_ok());
    }

    #[test]
    fn record_outside_matrix() {
        let lines = lower_rows();
        assert!(matches!(
            CovarianceMatrix::parse(&lines, 2, GroupRange::full(2)),
            Err(Error::RecordOutOfBounds { row: 3, .. })
        ));
    }

    #[test]
    fn oversized_value_count() {
        let mut lines = lower_rows();
        lines[2] = " 0.000000+0 0.000000+099999999999          1          1          1922833452    3";
        assert!(matches!(
            CovarianceMatrix::parse(&lines, 3, GroupRange::full(3)),
            Err(Error::RecordOutOfBounds {
                row: 1,
                count: 99_999_999_999,
                ..
            })
        ));
    }
}
