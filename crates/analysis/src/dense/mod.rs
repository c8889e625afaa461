//! Dense backend over `nalgebra::DMatrix<f64>`.

pub mod assessment;
pub mod decomposition;
pub mod expectations;
