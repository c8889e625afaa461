//! JSON report produced by `msmkit analyze`.

use nalgebra::{DMatrix, DVector};
use num_complex::Complex64;
use serde::Serialize;

use msmkit_analysis::{Coverage, RdlDecomposition, Spectrum};
use msmkit_matrix::Matrix;

/// Full analysis report. Sections that could not be computed are `null` and
/// explained in `notes`.
#[derive(Debug, Serialize)]
pub struct Report {
    pub n: usize,
    pub storage: String,
    pub assessment: Assessment,
    pub stationary_distribution: Option<Vec<f64>>,
    pub spectrum: Option<SpectrumReport>,
    pub timescales: Option<Vec<Option<f64>>>,
    pub decomposition: Option<DecompositionReport>,
    pub expected_counts: Option<Vec<Vec<f64>>>,
    pub stationary_counts: Option<Vec<Vec<f64>>>,
    pub notes: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct Assessment {
    pub transition_matrix: bool,
    pub rate_matrix: bool,
    pub ergodic: bool,
    pub reversible: Option<bool>,
}

#[derive(Debug, Serialize)]
pub struct ComplexValue {
    pub re: f64,
    pub im: f64,
}

impl From<Complex64> for ComplexValue {
    fn from(z: Complex64) -> Self {
        Self { re: z.re, im: z.im }
    }
}

#[derive(Debug, Serialize)]
pub struct SpectrumReport {
    pub eigenvalues: Vec<ComplexValue>,
    pub coverage: String,
}

impl From<&Spectrum> for SpectrumReport {
    fn from(spectrum: &Spectrum) -> Self {
        Self {
            eigenvalues: spectrum.values().iter().map(|&z| z.into()).collect(),
            coverage: coverage_label(spectrum.coverage()),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct DecompositionReport {
    pub norm: String,
    pub computed: usize,
    /// Max-norm of `Lᵀ R - I`.
    pub biorthogonality_error: f64,
    /// First left eigenvector (real parts).
    pub leading_left: Vec<f64>,
}

impl From<&RdlDecomposition> for DecompositionReport {
    fn from(rdl: &RdlDecomposition) -> Self {
        let k = rdl.values().len();
        let gram = rdl.left().transpose() * rdl.right();
        let identity = DMatrix::<Complex64>::identity(k, k);
        let biorthogonality_error = (gram - identity)
            .iter()
            .fold(0.0_f64, |acc, z| acc.max(z.norm()));
        let leading_left = if k > 0 {
            rdl.left().column(0).iter().map(|z| z.re).collect()
        } else {
            Vec::new()
        };
        Self {
            norm: rdl.norm().to_string(),
            computed: k,
            biorthogonality_error,
            leading_left,
        }
    }
}

pub fn coverage_label(coverage: Coverage) -> String {
    match coverage {
        Coverage::Complete => "complete".to_string(),
        Coverage::Partial {
            computed,
            dimension,
        } => format!("partial ({computed} of {dimension})"),
    }
}

/// JSON has no infinity; unbounded timescales become `null`.
pub fn finite_or_none(values: &[f64]) -> Vec<Option<f64>> {
    values
        .iter()
        .map(|&v| v.is_finite().then_some(v))
        .collect()
}

pub fn vector_to_vec(v: &DVector<f64>) -> Vec<f64> {
    v.iter().copied().collect()
}

pub fn matrix_rows(m: &Matrix) -> Vec<Vec<f64>> {
    let dense = m.to_dense_matrix();
    dense
        .row_iter()
        .map(|row| row.iter().copied().collect())
        .collect()
}
