//! Sparse backend over CSR `sprs::CsMat<f64>`.

pub mod assessment;
pub mod decomposition;
pub mod expectations;
