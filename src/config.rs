use serde::Deserialize;

/// Top-level `analyze` input file.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AnalyzeConfig {
    /// The matrix to analyze.
    pub matrix: MatrixToml,

    /// Analysis parameters.
    #[serde(default)]
    pub analysis: AnalysisToml,
}

/// Matrix given either as dense rows or as sparse `(row, col, value)` triplets.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MatrixToml {
    #[serde(default = "default_storage")]
    pub storage: String,
    #[serde(default)]
    pub rows: Option<Vec<Vec<f64>>>,
    #[serde(default)]
    pub n: Option<usize>,
    #[serde(default)]
    pub entries: Option<Vec<(usize, usize, f64)>>,
}

fn default_storage() -> String {
    "dense".to_string()
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AnalysisToml {
    #[serde(default = "default_tol")]
    pub tol: f64,
    #[serde(default)]
    pub k: Option<usize>,
    #[serde(default = "default_norm")]
    pub norm: String,
    #[serde(default = "default_tau")]
    pub tau: f64,
    #[serde(default = "default_n_steps")]
    pub n_steps: usize,
    #[serde(default)]
    pub p0: Option<Vec<f64>>,
}

impl Default for AnalysisToml {
    fn default() -> Self {
        Self {
            tol: default_tol(),
            k: None,
            norm: default_norm(),
            tau: default_tau(),
            n_steps: default_n_steps(),
            p0: None,
        }
    }
}

fn default_tol() -> f64 {
    msmkit_analysis::DEFAULT_TOL
}
fn default_norm() -> String {
    "standard".to_string()
}
fn default_tau() -> f64 {
    1.0
}
fn default_n_steps() -> usize {
    1
}
