//! Derived statistics of a covariance matrix
//!
//! Everything here works on plain `nalgebra` types so that the same routines
//! serve a whole section or any energy sub-range of it.

use crate::limits::GroupRange;

use nucov_utils::ValueExt;

use log::trace;
use nalgebra::{DMatrix, DVector, SymmetricEigen};
use rand::Rng;
use rand_distr::StandardNormal;

/// Standard deviation of every group, the root of the variances
pub fn uncertainty(covariance: &DMatrix<f64>) -> DVector<f64> {
    covariance.diagonal().map(f64::sqrt)
}

/// Correlation matrix from a covariance and its uncertainties
///
/// The diagonal is exactly one.
pub fn correlation(covariance: &DMatrix<f64>, uncertainty: &DVector<f64>) -> DMatrix<f64> {
    let n = covariance.nrows();
    DMatrix::from_fn(n, n, |i, j| {
        if i == j {
            1.0
        } else {
            covariance[(i, j)] / (uncertainty[i] * uncertainty[j])
        }
    })
}

/// Covariance from a correlation matrix scaled by per-group uncertainties
pub fn scale_correlation(correlation: &DMatrix<f64>, uncertainty: &DVector<f64>) -> DMatrix<f64> {
    let n = correlation.nrows();
    DMatrix::from_fn(n, n, |i, j| {
        uncertainty[i] * correlation[(i, j)] * uncertainty[j]
    })
}

/// Eigen-decomposition of a symmetric matrix, largest eigenvalue first
#[derive(Debug, Clone, PartialEq)]
pub struct Eigen {
    /// Eigenvalues in descending order
    pub values: DVector<f64>,
    /// Unit eigenvectors, column `i` belongs to `values[i]`
    pub vectors: DMatrix<f64>,
}

impl Eigen {
    /// Decompose a symmetric matrix
    ///
    /// Only the lower triangle and diagonal of `matrix` are read.
    pub fn new(matrix: &DMatrix<f64>) -> Self {
        let n = matrix.nrows();
        let eigen = SymmetricEigen::new(matrix.clone());

        let mut order: Vec<usize> = (0..n).collect();
        order.sort_by(|&a, &b| eigen.eigenvalues[b].total_cmp(&eigen.eigenvalues[a]));

        let values = DVector::from_iterator(n, order.iter().map(|&i| eigen.eigenvalues[i]));
        let vectors = DMatrix::from_fn(n, n, |row, col| eigen.eigenvectors[(row, order[col])]);

        Self { values, vectors }
    }

    /// Full rank of the decomposition
    pub fn rank(&self) -> usize {
        self.values.len()
    }

    /// Rebuild the matrix from the `k` largest eigenpairs
    ///
    /// `k` is clamped to the full rank, and zero gives a zero matrix.
    pub fn reconstruct(&self, k: usize) -> DMatrix<f64> {
        let n = self.rank();
        let k = k.min(n);
        if k == 0 {
            return DMatrix::zeros(n, n);
        }

        let basis = self.vectors.columns(0, k).into_owned();
        let weighted = DMatrix::from_fn(n, k, |row, col| basis[(row, col)] * self.values[col]);
        weighted * basis.transpose()
    }

    /// Draw `n` random samples around `mean` from the `k` largest components
    ///
    /// Each row of the result is `mean + sum(sqrt(value_i) * z_i * vector_i)`
    /// with independent standard normal `z_i`. Negative eigenvalues from
    /// round-off are treated as zero variance.
    pub fn realizations<R: Rng + ?Sized>(
        &self,
        mean: &[f64],
        n: usize,
        k: usize,
        rng: &mut R,
    ) -> DMatrix<f64> {
        let groups = self.rank();
        let k = k.min(groups);

        let normals = DMatrix::<f64>::from_fn(n, k, |_, _| rng.sample(StandardNormal));
        let components = DMatrix::from_fn(k, groups, |component, group| {
            self.values[component].max(0.0).sqrt() * self.vectors[(group, component)]
        });

        let mut samples = normals * components;
        for (group, value) in mean.iter().enumerate().take(groups) {
            samples.column_mut(group).add_scalar_mut(*value);
        }
        samples
    }

    /// Sweep the rank and compare the relative uncertainty against full rank
    ///
    /// The decomposition must be of an absolute covariance matching `mean`
    /// group for group. Reported groups are offset by `range.start` so they
    /// index the grid the range was taken from.
    pub fn uncertainty_convergence(&self, mean: &[f64], range: GroupRange) -> ConvergenceTable {
        let n = self.rank();

        // variance of each group accumulated one component at a time
        let mut partial = vec![0.0; n];
        let mut steps = Vec::with_capacity(n);
        for k in 0..n {
            for (group, variance) in partial.iter_mut().enumerate() {
                *variance += self.values[k] * self.vectors[(group, k)].powi(2);
            }
            steps.push(relative_uncertainty(&partial, mean));
        }

        let Some(reference) = steps.last().cloned() else {
            return ConvergenceTable {
                range,
                rows: Vec::new(),
            };
        };

        let rows = steps
            .iter()
            .enumerate()
            .map(|(k, step)| {
                let row = ConvergenceRow::compare(k + 1, step, &reference, range.start);
                trace!("  rank {} max relative difference {:.3e}", row.rank, row.max_rel_diff);
                row
            })
            .collect();

        ConvergenceTable { range, rows }
    }
}

/// Relative uncertainty per group, `None` where the mean is zero
fn relative_uncertainty(variance: &[f64], mean: &[f64]) -> Vec<Option<f64>> {
    variance
        .iter()
        .zip(mean)
        .map(|(v, m)| (*m != 0.0).then(|| v.max(0.0).sqrt() / m.abs()))
        .collect()
}

/// Largest deviations from the full-rank relative uncertainty at one rank
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConvergenceRow {
    /// Number of components kept
    pub rank: usize,
    /// Largest absolute difference in relative uncertainty
    pub max_abs_diff: f64,
    /// Group where the absolute difference is largest
    pub abs_group: usize,
    /// Largest difference relative to the full-rank relative uncertainty
    pub max_rel_diff: f64,
    /// Group where the relative difference is largest
    pub rel_group: usize,
}

impl ConvergenceRow {
    fn compare(rank: usize, step: &[Option<f64>], reference: &[Option<f64>], offset: usize) -> Self {
        let mut row = Self {
            rank,
            max_abs_diff: 0.0,
            abs_group: offset,
            max_rel_diff: 0.0,
            rel_group: offset,
        };

        for (group, (value, full)) in step.iter().zip(reference).enumerate() {
            let (Some(value), Some(full)) = (value, full) else {
                continue;
            };

            let abs_diff = (value - full).abs();
            if abs_diff > row.max_abs_diff {
                row.max_abs_diff = abs_diff;
                row.abs_group = group + offset;
            }

            if *full > 0.0 && abs_diff / full > row.max_rel_diff {
                row.max_rel_diff = abs_diff / full;
                row.rel_group = group + offset;
            }
        }

        row
    }
}

/// Uncertainty convergence for every rank from one up to full rank
#[derive(Debug, Clone, PartialEq)]
pub struct ConvergenceTable {
    /// Groups covered by the sweep
    pub range: GroupRange,
    /// One row per rank, in increasing order
    pub rows: Vec<ConvergenceRow>,
}

impl ConvergenceTable {
    /// Smallest rank that reproduces every relative uncertainty within `tol`
    ///
    /// The tolerance is a fraction of the full-rank relative uncertainty.
    pub fn minimal_rank(&self, tol: f64) -> Option<usize> {
        self.rows
            .iter()
            .find(|row| row.max_rel_diff <= tol)
            .map(|row| row.rank)
    }

    /// Row for rank `k`
    pub fn row(&self, k: usize) -> Option<&ConvergenceRow> {
        k.checked_sub(1).and_then(|i| self.rows.get(i))
    }
}

impl std::fmt::Display for ConvergenceTable {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        writeln!(f, "Uncertainty convergence over {}", self.range)?;
        writeln!(
            f,
            "{:>5} {:>12} {:>6} {:>12} {:>6}",
            "rank", "max abs", "group", "max rel", "group"
        )?;
        for row in &self.rows {
            writeln!(
                f,
                "{:>5} {:>12} {:>6} {:>12} {:>6}",
                row.rank,
                row.max_abs_diff.sci(4, 2),
                row.abs_group,
                row.max_rel_diff.sci(4, 2),
                row.rel_group
            )?;
        }
        Ok(())
    }
}
