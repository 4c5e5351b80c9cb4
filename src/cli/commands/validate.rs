//! `validate` command
//!
//! Loads each component library and reports errors and warnings without
//! rendering anything.

use std::path::Path;

use serde_json::{Value, json};

use crate::cli::args::{OutputFormat, ValidateArgs};
use crate::config::{ConfigLoader, LoadWarning};
use crate::error::{ConfigError, MdxError, Severity, ValidationIssue};

/// Outcome of validating one file.
#[derive(Debug)]
struct FileReport {
    file: String,
    errors: Vec<String>,
    warnings: Vec<String>,
    failure: Option<ConfigError>,
}

/// Validate component library files.
///
/// Every file is checked before returning; the first failure decides the
/// returned error.
///
/// # Errors
///
/// Returns a config error if any file fails to load, or, with `--strict`,
/// produces warnings.
pub fn run(args: &ValidateArgs) -> Result<(), MdxError> {
    let loader = ConfigLoader::with_defaults();
    let reports: Vec<FileReport> = args
        .files
        .iter()
        .map(|path| check_file(&loader, path, args.strict))
        .collect();

    match args.format {
        OutputFormat::Human => {
            for report in &reports {
                print_human(report);
            }
        }
        OutputFormat::Json => {
            let value: Vec<Value> = reports.iter().map(report_json).collect();
            println!("{}", serde_json::to_string_pretty(&value)?);
        }
    }

    match reports.into_iter().find_map(|r| r.failure) {
        Some(err) => Err(err.into()),
        None => Ok(()),
    }
}

fn check_file(loader: &ConfigLoader, path: &Path, strict: bool) -> FileReport {
    tracing::info!(file = %path.display(), "validating component library");
    let file = path.display().to_string();

    match loader.load(path) {
        Ok(result) => {
            let warnings: Vec<String> = result.warnings.iter().map(format_warning).collect();
            let failure = (strict && !result.warnings.is_empty()).then(|| {
                ConfigError::ValidationError {
                    path: file.clone(),
                    errors: result.warnings.iter().map(promote).collect(),
                }
            });
            FileReport {
                file,
                errors: Vec::new(),
                warnings,
                failure,
            }
        }
        Err(err) => {
            let errors = match &err {
                ConfigError::ValidationError { errors, .. } => {
                    errors.iter().map(ToString::to_string).collect()
                }
                other => vec![other.to_string()],
            };
            FileReport {
                file,
                errors,
                warnings: Vec::new(),
                failure: Some(err),
            }
        }
    }
}

fn format_warning(warning: &LoadWarning) -> String {
    match &warning.location {
        Some(location) => format!("warning: {} at {location}", warning.message),
        None => format!("warning: {}", warning.message),
    }
}

fn promote(warning: &LoadWarning) -> ValidationIssue {
    ValidationIssue {
        path: warning.location.clone().unwrap_or_default(),
        message: warning.message.clone(),
        severity: Severity::Error,
    }
}

fn print_human(report: &FileReport) {
    let status = if report.failure.is_some() { "FAIL" } else { "ok" };
    println!("{}: {status}", report.file);
    for line in report.errors.iter().chain(&report.warnings) {
        println!("  {line}");
    }
}

fn report_json(report: &FileReport) -> Value {
    json!({
        "file": report.file,
        "valid": report.failure.is_none(),
        "errors": report.errors,
        "warnings": report.warnings,
    })
}
