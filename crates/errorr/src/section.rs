use crate::covariance::CovarianceMatrix;
use crate::energy::EnergyGrid;
use crate::error::{Error, Result};
use crate::limits::{EnergyLimits, GroupRange};
use crate::mean::MeanBlock;
use crate::statistics::{self, ConvergenceTable, Eigen};

use nucov_utils::SliceExt;

use log::{debug, warn};
use nalgebra::{DMatrix, DVector};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Full numeric picture of one reaction
///
/// Combines the energy grid, mean values and relative covariance of a single
/// (MAT, MF, MT) key. Everything is cropped to the same [GroupRange], and the
/// derived statistics are computed once on construction.
///
/// ```rust
/// # use nucov_errorr::{EnergyLimits, Section};
/// let energy = [
///     " 9.223500+4 2.330248+2          6          0          0          09228 1451    1",
///     " 2.936000+2 0.000000+0          2          0          3          09228 1451    2",
///     " 1.000000+0 1.000000+3 2.000000+7 0.000000+0                      9228 1451    3",
/// ];
/// let mean = [
///     " 9.223500+4 2.330248+2          0          0          0          09228 3452    1",
///     " 0.000000+0 0.000000+0          0          0          2          29228 3452    2",
///     " 2.000000+0 4.000000+0                                            9228 3452    3",
/// ];
/// let covariance = [
///     " 9.223500+4 2.330248+2          0          0          0          1922833452    1",
///     " 0.000000+0 0.000000+0          0        452          0          2922833452    2",
///     " 0.000000+0 0.000000+0          1          1          1          1922833452    3",
///     " 2.500000-1                                                       922833452    4",
///     " 0.000000+0 0.000000+0          2          1          2          2922833452    5",
///     " 0.000000+0 6.250000-2                                            922833452    6",
/// ];
///
/// let section = Section::new(&energy, &mean, &covariance, EnergyLimits::new()).unwrap();
/// assert_eq!(section.mt(), 452);
/// assert_eq!(section.uncertainty().as_slice(), &[0.5, 0.25]);
/// assert_eq!(section.abs_uncertainty().as_slice(), &[1.0, 1.0]);
/// assert_eq!(section.correlation_matrix()[(1, 0)], 0.0);
/// ```
#[derive(Debug, Clone)]
pub struct Section {
    energy: EnergyGrid,
    mean: MeanBlock,
    covariance: CovarianceMatrix,
    uncertainty: DVector<f64>,
    abs_uncertainty: DVector<f64>,
    correlation: DMatrix<f64>,
    abs_covariance: DMatrix<f64>,
    eigen: Eigen,
}

impl Section {
    /// Build a section from the energy, mean, and covariance line blocks
    ///
    /// The energy limits decide the retained groups for all three blocks.
    pub fn new<S: AsRef<str>>(
        energy_lines: &[S],
        mean_lines: &[S],
        covariance_lines: &[S],
        limits: EnergyLimits,
    ) -> Result<Self> {
        let energy = EnergyGrid::parse(energy_lines, limits)?;
        let range = energy.range();
        let full = energy.full_num_groups();

        let mean = MeanBlock::parse(mean_lines, range)?;
        if mean.full_num_groups() != full {
            return Err(Error::GroupCountMismatch {
                what: "mean value block",
                expected: full,
                found: mean.full_num_groups(),
            });
        }

        let covariance = CovarianceMatrix::parse(covariance_lines, full, range)?;
        let mt = mean.mt();
        if covariance.header().control.mt != mt {
            warn!(
                "Mean values of MT{mt} are paired with the covariance of MT{}",
                covariance.header().control.mt
            );
        }

        let values = mean.values();
        if values.len() != energy.num_groups() || covariance.size() != energy.num_groups() {
            return Err(Error::GroupCountMismatch {
                what: "cropped section",
                expected: energy.num_groups(),
                found: values.len().max(covariance.size()),
            });
        }

        let uncertainty = statistics::uncertainty(covariance.matrix());
        let abs_uncertainty = uncertainty.component_mul(&DVector::from_column_slice(values));
        let correlation = statistics::correlation(covariance.matrix(), &uncertainty);
        let abs_covariance = statistics::scale_correlation(&correlation, &abs_uncertainty);
        let eigen = Eigen::new(&abs_covariance);

        debug!("MF{}/MT{mt} ready with {}", mean.mf(), energy.describe());
        if let Ok((group, largest)) = uncertainty.as_slice().try_argmax() {
            debug!("  largest relative uncertainty {largest:.3e} in group {group}");
        }

        let eig_vals = eigen.values.as_slice();
        if let (Ok(min), Ok(max)) = (eig_vals.try_min(), eig_vals.try_max()) {
            debug!("  eigenvalues from {min:.4e} to {max:.4e}");
            if min < 0.0 {
                warn!("MT{mt} absolute covariance is not positive definite ({min:e})");
            }
        }

        Ok(Self {
            energy,
            mean,
            covariance,
            uncertainty,
            abs_uncertainty,
            correlation,
            abs_covariance,
            eigen,
        })
    }

    /// Material number
    pub fn mat(&self) -> u32 {
        self.mean.mat()
    }

    /// File number of the mean values (3 or 5)
    pub fn mf(&self) -> u32 {
        self.mean.mf()
    }

    /// Reaction number
    pub fn mt(&self) -> u32 {
        self.mean.mt()
    }

    /// Incident energy (eV) of a spectrum section
    pub fn incident_energy(&self) -> Option<f64> {
        self.mean.incident_energy()
    }

    /// Number of retained groups
    pub fn num_groups(&self) -> usize {
        self.energy.num_groups()
    }

    /// Groups of the full grid retained by the energy limits
    pub fn range(&self) -> GroupRange {
        self.energy.range()
    }

    /// Retained group boundaries (eV)
    pub fn group_boundaries(&self) -> &[f64] {
        self.energy.group_boundaries()
    }

    /// Mean value per group
    pub fn mean_values(&self) -> &[f64] {
        self.mean.values()
    }

    /// Relative covariance matrix
    pub fn covariance_matrix(&self) -> &DMatrix<f64> {
        self.covariance.matrix()
    }

    /// Relative uncertainty per group
    pub fn uncertainty(&self) -> &DVector<f64> {
        &self.uncertainty
    }

    /// Absolute uncertainty per group
    pub fn abs_uncertainty(&self) -> &DVector<f64> {
        &self.abs_uncertainty
    }

    /// Correlation matrix, with a unit diagonal
    pub fn correlation_matrix(&self) -> &DMatrix<f64> {
        &self.correlation
    }

    /// Absolute covariance matrix
    pub fn abs_covariance_matrix(&self) -> &DMatrix<f64> {
        &self.abs_covariance
    }

    /// Eigenvalues of the absolute covariance, largest first
    pub fn eig_vals(&self) -> &DVector<f64> {
        &self.eigen.values
    }

    /// Eigenvectors of the absolute covariance as columns, in eigenvalue order
    pub fn eig_vects(&self) -> &DMatrix<f64> {
        &self.eigen.vectors
    }

    /// Energy grid, with the full boundaries available
    pub fn energy(&self) -> &EnergyGrid {
        &self.energy
    }

    /// Mean value block
    pub fn mean(&self) -> &MeanBlock {
        &self.mean
    }

    /// Relative covariance block
    pub fn covariance(&self) -> &CovarianceMatrix {
        &self.covariance
    }

    /// Absolute covariance rebuilt from the `rank` largest eigenpairs
    ///
    /// `None` uses the full rank, and larger values are clamped to it.
    pub fn reconstruct_covariance(&self, rank: Option<usize>) -> DMatrix<f64> {
        self.eigen.reconstruct(rank.unwrap_or(self.eigen.rank()))
    }

    /// Sample `n` sets of group values from the `k` leading components
    ///
    /// Returns an `n x num_groups` matrix, one realization per row. The sample
    /// covariance tends to the rank `k` reconstruction as `n` grows.
    pub fn pca_realizations<R: Rng + ?Sized>(&self, n: usize, k: usize, rng: &mut R) -> DMatrix<f64> {
        self.eigen.realizations(self.mean_values(), n, k, rng)
    }

    /// Same as [Section::pca_realizations], from a seeded generator
    pub fn pca_realizations_seeded(&self, n: usize, k: usize, seed: u64) -> DMatrix<f64> {
        let mut rng = StdRng::seed_from_u64(seed);
        self.pca_realizations(n, k, &mut rng)
    }

    /// Rank sweep of the relative uncertainty over all retained groups
    pub fn uncertainty_convergence(&self) -> ConvergenceTable {
        let range = GroupRange::full(self.num_groups());
        self.eigen.uncertainty_convergence(self.mean_values(), range)
    }

    /// Rank sweep restricted to the groups selected by `limits`
    ///
    /// The absolute covariance of the sub-range is decomposed on its own.
    /// Limits apply to the retained grid of this section, and reported groups
    /// index that grid.
    pub fn uncertainty_convergence_within(&self, limits: EnergyLimits) -> Result<ConvergenceTable> {
        let range = limits.group_range(self.group_boundaries())?;
        let sub = self
            .abs_covariance
            .view((range.start, range.start), (range.len(), range.len()))
            .into_owned();

        debug!("MT{} convergence within {range}", self.mt());
        let eigen = Eigen::new(&sub);
        Ok(eigen.uncertainty_convergence(&self.mean_values()[range.groups()], range))
    }
}
