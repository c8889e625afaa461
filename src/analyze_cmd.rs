//! Analyze command: assess a matrix and report its spectral properties.

use std::fmt::Display;

use anyhow::{Context, Result};
use tracing::{info, info_span, warn};

use msmkit_analysis::{self as analysis, ReversibilityConfig};

use crate::cli::AnalyzeArgs;
use crate::config::AnalyzeConfig;
use crate::convert;
use crate::report::{
    Assessment, DecompositionReport, Report, SpectrumReport, finite_or_none, matrix_rows,
    vector_to_vec,
};

/// Run the analysis and write the JSON report.
pub fn run(args: AnalyzeArgs) -> Result<()> {
    let _cmd = info_span!("analyze").entered();

    // 1. Load the TOML description
    let toml_str = std::fs::read_to_string(&args.input)
        .with_context(|| format!("failed to read matrix file: {}", args.input.display()))?;
    let config: AnalyzeConfig =
        toml::from_str(&toml_str).context("failed to parse matrix TOML")?;

    // 2. Analyze
    let report = analyze(&config)?;

    // 3. Emit
    let json = serde_json::to_string_pretty(&report).context("failed to serialize report")?;
    match args.output {
        Some(path) => {
            std::fs::write(&path, json + "\n")
                .with_context(|| format!("failed to write report: {}", path.display()))?;
            info!(path = %path.display(), "report written");
        }
        None => println!("{json}"),
    }
    Ok(())
}

/// Builds the report for one configuration.
///
/// Invalid input fails the whole run. Sections that do not apply to the
/// matrix, or whose computation fails, are left empty with a note.
pub fn analyze(config: &AnalyzeConfig) -> Result<Report> {
    let matrix = convert::build_matrix(&config.matrix)?;
    let decomposition_cfg = convert::build_decomposition_config(&config.analysis)?;
    let p0 = convert::build_initial_distribution(&config.analysis);
    let tol = config.analysis.tol;
    info!(n = matrix.dim(), storage = %matrix.kind(), nnz = matrix.nnz(), "matrix loaded");

    let mut notes = Vec::new();

    let transition_matrix = analysis::is_transition_matrix(&matrix, tol)?;
    let rate_matrix = analysis::is_rate_matrix(&matrix, tol)?;
    let ergodic = analysis::is_ergodic(&matrix, tol)?;
    let reversible = if transition_matrix {
        section(
            &mut notes,
            "reversibility",
            analysis::is_reversible(&matrix, &ReversibilityConfig::new().with_tol(tol)),
        )
    } else {
        None
    };

    let markov = transition_matrix || rate_matrix;
    if !markov {
        skip(
            &mut notes,
            "matrix is neither a transition nor a rate matrix; spectral sections skipped",
        );
    }

    let stationary = if markov {
        section(
            &mut notes,
            "stationary distribution",
            analysis::stationary_distribution(&matrix),
        )
    } else {
        None
    };

    let k = decomposition_cfg.k();
    let spectrum = section(&mut notes, "eigenvalues", analysis::eigenvalues(&matrix, k));

    let timescales = if markov {
        section(
            &mut notes,
            "timescales",
            analysis::timescales(&matrix, config.analysis.tau, k),
        )
    } else {
        None
    };

    let decomposition = if markov {
        section(
            &mut notes,
            "decomposition",
            analysis::rdl_decomposition(&matrix, &decomposition_cfg),
        )
    } else {
        None
    };

    let expected_counts = match (&p0, transition_matrix) {
        (Some(p0), true) => section(
            &mut notes,
            "expected counts",
            analysis::expected_counts(p0, &matrix, config.analysis.n_steps),
        ),
        (Some(_), false) => {
            skip(&mut notes, "expected counts need a transition matrix");
            None
        }
        (None, _) => None,
    };

    let stationary_counts = if transition_matrix {
        section(
            &mut notes,
            "stationary counts",
            analysis::expected_counts_stationary(
                &matrix,
                config.analysis.n_steps,
                stationary.as_ref(),
            ),
        )
    } else {
        None
    };

    Ok(Report {
        n: matrix.dim(),
        storage: matrix.kind().to_string(),
        assessment: Assessment {
            transition_matrix,
            rate_matrix,
            ergodic,
            reversible,
        },
        stationary_distribution: stationary.as_ref().map(vector_to_vec),
        spectrum: spectrum.as_ref().map(SpectrumReport::from),
        timescales: timescales.as_deref().map(finite_or_none),
        decomposition: decomposition.as_ref().map(DecompositionReport::from),
        expected_counts: expected_counts.as_ref().map(matrix_rows),
        stationary_counts: stationary_counts.as_ref().map(matrix_rows),
        notes,
    })
}

/// Keeps a section's value, or records why it is missing.
fn section<T, E: Display>(notes: &mut Vec<String>, name: &str, result: Result<T, E>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(e) => {
            warn!(section = name, error = %e, "section skipped");
            notes.push(format!("{name}: {e}"));
            None
        }
    }
}

fn skip(notes: &mut Vec<String>, note: &str) {
    warn!("{note}");
    notes.push(note.to_string());
}
