//! Pure conversion functions: TOML config structs -> library types.

use anyhow::{Context, Result, bail};
use nalgebra::DVector;

use msmkit_analysis::{DecompositionConfig, Norm, storage_kind};
use msmkit_matrix::{Matrix, StorageKind};

use crate::config::{AnalysisToml, MatrixToml};

/// Builds a [`Matrix`] from the `[matrix]` section.
///
/// Dense storage needs `rows`. Sparse storage takes either `rows` or `n`
/// together with `entries`.
pub fn build_matrix(matrix: &MatrixToml) -> Result<Matrix> {
    let kind = storage_kind(&matrix.storage).context("invalid [matrix].storage")?;
    match (&matrix.rows, &matrix.entries) {
        (Some(_), Some(_)) => bail!("[matrix] sets both rows and entries; use one"),
        (Some(rows), None) => {
            Matrix::from_rows_as(kind, rows).context("invalid [matrix].rows")
        }
        (None, Some(entries)) => {
            if kind == StorageKind::Dense {
                bail!("[matrix].entries requires storage = \"sparse\"");
            }
            let n = matrix
                .n
                .context("[matrix].n is required together with entries")?;
            Matrix::from_triplets(n, entries).context("invalid [matrix].entries")
        }
        (None, None) => bail!("[matrix] needs rows or entries"),
    }
}

/// Builds a [`DecompositionConfig`] from the `[analysis]` section.
pub fn build_decomposition_config(analysis: &AnalysisToml) -> Result<DecompositionConfig> {
    let norm: Norm = analysis.norm.parse().context("invalid [analysis].norm")?;
    let mut cfg = DecompositionConfig::new().with_norm(norm);
    if let Some(k) = analysis.k {
        cfg = cfg.with_k(k);
    }
    Ok(cfg)
}

/// Returns the initial distribution, if one is configured.
pub fn build_initial_distribution(analysis: &AnalysisToml) -> Option<DVector<f64>> {
    analysis
        .p0
        .as_ref()
        .map(|p0| DVector::from_column_slice(p0))
}
