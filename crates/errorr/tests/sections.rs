//! Integration tests for single sections built from fixture data

use nalgebra::DMatrix;
use nucov_errorr::{EnergyGrid, EnergyLimits, Error, GroupRange, MeanKind, Section};
use rstest::{fixture, rstest};

fn read_lines(path: &str) -> Vec<String> {
    std::fs::read_to_string(path)
        .unwrap()
        .lines()
        .map(String::from)
        .collect()
}

fn nubar_section(mt: u32, limits: EnergyLimits) -> Result<Section, Error> {
    Section::new(
        &read_lines("./data/nubar/mf1_mt451.txt"),
        &read_lines(&format!("./data/nubar/mf3_mt{mt}.txt")),
        &read_lines(&format!("./data/nubar/mf33_mt{mt}.txt")),
        limits,
    )
}

#[fixture]
fn nubar() -> Section {
    nubar_section(452, EnergyLimits::new()).unwrap()
}

#[fixture]
fn pfns() -> Section {
    Section::new(
        &read_lines("./data/pfns/mf1_mt451.txt"),
        &read_lines("./data/pfns/mf5_mt18.txt"),
        &read_lines("./data/pfns/mf35_mt18.txt"),
        EnergyLimits::new(),
    )
    .unwrap()
}

/// Fully expanded relative covariance of MT452, written out row by row
#[fixture]
fn reference_matrix() -> DMatrix<f64> {
    let rows: Vec<Vec<f64>> = read_lines("./data/nubar/mt452_matrix.txt")
        .iter()
        .filter(|l| !l.trim().is_empty())
        .map(|l| l.split_whitespace().map(|v| v.parse().unwrap()).collect())
        .collect();
    let n = rows.len();
    DMatrix::from_fn(n, n, |i, j| rows[i][j])
}

fn assert_close(a: &DMatrix<f64>, b: &DMatrix<f64>, rel: f64) {
    assert_eq!(a.shape(), b.shape());
    let scale = b.amax();
    for (x, y) in a.iter().zip(b.iter()) {
        assert!((x - y).abs() <= rel * scale, "{x:e} != {y:e}");
    }
}

#[rstest]
fn nubar_literal_values(nubar: Section) {
    assert_eq!(nubar.mat(), 9228);
    assert_eq!((nubar.mf(), nubar.mt()), (3, 452));
    assert_eq!(nubar.incident_energy(), None);
    assert_eq!(nubar.num_groups(), 30);

    assert_eq!(nubar.mean_values()[0], 2.48754);
    assert_eq!(nubar.group_boundaries()[0], 1.39e-4);
    assert_eq!(nubar.group_boundaries()[30], 1.7e7);

    let cov = nubar.covariance_matrix();
    assert_eq!(cov[(0, 0)], 2.996458e-4);
    assert_eq!(cov[(28, 28)], 2.530043e-4);
    assert_eq!(cov[(29, 0)], 9.161621e-6);
    assert_eq!(cov[(0, 29)], 9.161621e-6);
}

#[rstest]
fn nubar_full_matrix(nubar: Section, reference_matrix: DMatrix<f64>) {
    assert_eq!(nubar.covariance_matrix(), &reference_matrix);
}

#[rstest]
fn consistent_lengths(nubar: Section, pfns: Section) {
    for section in [&nubar, &pfns] {
        let n = section.num_groups();
        assert_eq!(section.mean_values().len(), n);
        assert_eq!(section.group_boundaries().len(), n + 1);
        assert_eq!(section.covariance_matrix().shape(), (n, n));
        assert_eq!(section.uncertainty().len(), n);
        assert_eq!(section.abs_uncertainty().len(), n);
        assert_eq!(section.eig_vals().len(), n);
        assert_eq!(section.eig_vects().shape(), (n, n));
    }
}

#[rstest]
fn derived_quantities(nubar: Section) {
    let corr = nubar.correlation_matrix();
    assert!(corr.diagonal().iter().all(|v| *v == 1.0));
    assert!(corr.iter().all(|v| v.abs() <= 1.0 + 1e-12));
    assert_eq!(corr, &corr.transpose());

    let u = nubar.uncertainty();
    assert_eq!(u[0], 2.996458e-4_f64.sqrt());
    assert_eq!(nubar.abs_uncertainty()[0], u[0] * 2.48754);

    // absolute covariance is the relative one scaled by the means
    let mean = nubar.mean_values();
    let expected = DMatrix::from_fn(30, 30, |i, j| {
        nubar.covariance_matrix()[(i, j)] * mean[i] * mean[j]
    });
    assert_close(nubar.abs_covariance_matrix(), &expected, 1e-12);
}

#[rstest]
fn eigen_decomposition(nubar: Section) {
    let values = nubar.eig_vals();
    assert!(values.as_slice().windows(2).all(|w| w[0] >= w[1]));
    assert!(values.iter().all(|v| *v > 0.0));

    let trace = nubar.abs_covariance_matrix().trace();
    assert!((values.sum() - trace).abs() <= 1e-10 * trace);

    // orthonormal basis
    let v = nubar.eig_vects();
    assert_close(&(v.transpose() * v), &DMatrix::identity(30, 30), 1e-10);
}

#[rstest]
fn reconstruction(nubar: Section) {
    let full = nubar.reconstruct_covariance(None);
    assert_close(&full, nubar.abs_covariance_matrix(), 1e-10);
    assert_close(&nubar.reconstruct_covariance(Some(100)), &full, 1e-14);
    assert_eq!(nubar.reconstruct_covariance(Some(0)), DMatrix::zeros(30, 30));

    // each added component can only add variance
    let mut previous = 0.0;
    for k in 1..=30 {
        let trace = nubar.reconstruct_covariance(Some(k)).trace();
        assert!(trace >= previous);
        previous = trace;
    }
}

#[rstest]
#[case(30)]
#[case(4)]
fn pca_sample_covariance(nubar: Section, #[case] k: usize) {
    let n = 20_000;
    let samples = nubar.pca_realizations_seeded(n, k, 42);
    assert_eq!(samples.shape(), (n, 30));

    let mean = samples.row_mean();
    for (sample_mean, expected) in mean.iter().zip(nubar.mean_values()) {
        assert!((sample_mean - expected).abs() < 0.01 * expected);
    }

    let mut centred = samples.clone();
    for mut row in centred.row_iter_mut() {
        row -= &mean;
    }
    let empirical = centred.transpose() * &centred / (n as f64 - 1.0);
    let expected = nubar.reconstruct_covariance(Some(k));

    // sampling noise scales with the full variances
    let d = nubar.abs_covariance_matrix().diagonal();
    for i in 0..30 {
        for j in 0..30 {
            let tol = 0.1 * (d[i] * d[j]).sqrt();
            assert!(
                (empirical[(i, j)] - expected[(i, j)]).abs() <= tol,
                "({i}, {j}) {:e} != {:e}",
                empirical[(i, j)],
                expected[(i, j)]
            );
        }
    }
}

#[rstest]
fn pca_is_reproducible(nubar: Section) {
    let a = nubar.pca_realizations_seeded(10, 5, 7);
    let b = nubar.pca_realizations_seeded(10, 5, 7);
    let c = nubar.pca_realizations_seeded(10, 5, 8);
    assert_eq!(a, b);
    assert_ne!(a, c);
}

#[rstest]
fn uncertainty_convergence(nubar: Section) {
    let table = nubar.uncertainty_convergence();
    assert_eq!(table.range, GroupRange::full(30));
    assert_eq!(table.rows.len(), 30);
    assert!(table.rows.iter().enumerate().all(|(i, r)| r.rank == i + 1));

    let rel: Vec<f64> = table.rows.iter().map(|r| r.max_rel_diff).collect();
    assert!(rel.windows(2).all(|w| w[1] <= w[0] + 1e-12));
    assert!(rel[29] < 1e-12);
    assert!(rel[0] > 0.0);

    let k = table.minimal_rank(0.05).unwrap();
    assert!((1..=30).contains(&k));
    assert!(table.rows[k - 1].max_rel_diff <= 0.05);
    assert!(k == 1 || table.rows[k - 2].max_rel_diff > 0.05);

    assert_eq!(table.to_string().lines().count(), 32);
}

#[rstest]
fn uncertainty_convergence_within(nubar: Section) {
    let limits = EnergyLimits::between(266.6209, 1.0e6);
    let table = nubar.uncertainty_convergence_within(limits).unwrap();

    assert_eq!(table.range, GroupRange::new(17, 27));
    assert_eq!(table.rows.len(), 10);
    assert!(table
        .rows
        .iter()
        .all(|r| table.range.groups().contains(&r.abs_group)));
    assert!(table.rows[9].max_rel_diff < 1e-12);

    assert!(matches!(
        nubar.uncertainty_convergence_within(EnergyLimits::between(1.0e3, 1.0e2)),
        Err(Error::InvalidEnergyLimits { .. })
    ));
}

#[rstest]
#[case(EnergyLimits::new(), 0, 30)]
#[case(EnergyLimits::between(1.0e-5, 2.0e7), 0, 30)]
#[case(EnergyLimits::new().with_lower(1.0), 10, 30)]
#[case(EnergyLimits::new().with_upper(1.0e6), 0, 27)]
#[case(EnergyLimits::between(266.6209, 1462.367), 17, 19)]
fn cropped_section(
    reference_matrix: DMatrix<f64>,
    #[case] limits: EnergyLimits,
    #[case] start: usize,
    #[case] end: usize,
) {
    let full = nubar_section(452, EnergyLimits::new()).unwrap();
    let section = nubar_section(452, limits).unwrap();
    let n = end - start;

    assert_eq!(section.range(), GroupRange::new(start, end));
    assert_eq!(section.num_groups(), n);
    assert_eq!(section.mean_values(), &full.mean_values()[start..end]);
    assert_eq!(section.group_boundaries(), &full.group_boundaries()[start..=end]);
    assert_eq!(section.energy().all_boundaries().len(), 31);

    let expected = reference_matrix.view((start, start), (n, n)).into_owned();
    assert_eq!(section.covariance_matrix(), &expected);
}

#[rstest]
fn other_nubar_components() {
    for mt in [455, 456] {
        let section = nubar_section(mt, EnergyLimits::new()).unwrap();
        assert_eq!(section.mt(), mt);
        assert_eq!(section.covariance().header().cross_reaction, mt);
        assert!(section.covariance().header().is_self_covariance());
    }
}

#[rstest]
fn coarse_covariance_is_rejected() {
    let result = Section::new(
        &read_lines("./data/nubar/mf1_mt451.txt"),
        &read_lines("./data/nubar/mf3_mt455.txt"),
        &read_lines("./data/nubar/mf33_mt455_coarse.txt"),
        EnergyLimits::new(),
    );
    match result {
        Err(Error::NonPositiveDiagonal { size, entries }) => {
            assert_eq!(size, 30);
            assert_eq!(entries, vec![(16, 0.0)]);
        }
        other => panic!("expected NonPositiveDiagonal, got {other:?}"),
    }
}

#[rstest]
fn coarse_covariance_cropped_away() {
    // group 16 ends at 266.6209 eV, so it is dropped entirely
    let section = Section::new(
        &read_lines("./data/nubar/mf1_mt451.txt"),
        &read_lines("./data/nubar/mf3_mt455.txt"),
        &read_lines("./data/nubar/mf33_mt455_coarse.txt"),
        EnergyLimits::new().with_lower(266.6209),
    )
    .unwrap();
    assert_eq!(section.range(), GroupRange::new(17, 30));
}

#[rstest]
fn spectrum_section(pfns: Section) {
    assert_eq!(pfns.mean().kind(), MeanKind::Spectrum);
    assert_eq!((pfns.mf(), pfns.mt()), (5, 18));
    assert_eq!(pfns.incident_energy(), Some(2.5e5));
    assert_eq!(pfns.mean_values()[0], 1.05276e-11);
    assert_eq!(pfns.num_groups(), 30);
    assert!(pfns.correlation_matrix().diagonal().iter().all(|v| *v == 1.0));
}

#[rstest]
fn mismatched_group_count() {
    // two group mean values against the thirty group grid
    let mean = [
        " 9.223500+4 2.330248+2          0          0          0          09228 3452    1",
        " 0.000000+0 0.000000+0          0          0          2          29228 3452    2",
        " 2.000000+0 4.000000+0                                            9228 3452    3",
    ]
    .map(String::from);

    let result = Section::new(
        &read_lines("./data/nubar/mf1_mt451.txt"),
        &mean,
        &read_lines("./data/nubar/mf33_mt452.txt"),
        EnergyLimits::new(),
    );
    assert!(matches!(result, Err(Error::GroupCountMismatch { .. })));
}

#[rstest]
fn energy_grid_summary() {
    let grid = EnergyGrid::parse(
        &read_lines("./data/nubar/mf1_mt451.txt"),
        EnergyLimits::new(),
    )
    .unwrap();
    assert_eq!(grid.temperature(), 293.6);
    assert_eq!(grid.describe(), "30 groups from 1.3900e-04 to 1.7000e+07 eV");
}
