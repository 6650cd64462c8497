//! Command implementations behind the `testport` binary.
//!
//! Each `run_*` function loads what it needs, runs the engine and returns the
//! response envelope; `main.rs` only parses arguments and prints. All
//! functions return `Result<T, PortError>` so failures map onto the stable
//! exit codes of [`OutputErrorCode`](testport_core::OutputErrorCode).
//!
//! ## Inputs
//!
//! A compiled unit is a JSON [`Compilation`]. Documents that arrive without
//! bound operations are bound against the unit's metadata before analysis.
//! Configuration comes from `--config <path>` or, when absent, from
//! `testport.toml` in the working directory.

use std::fs;
use std::io;
use std::path::Path;

use testport_core::config::Config;
use testport_core::output::{AnalyzeResponse, FixResponse, RulesResponse};
use testport_core::PortError;
use testport_mstest::{
    apply_fixes, fix_compilation, report_compilation, MigrationOptions, RuleId, DESCRIPTORS,
};
use testport_syntax::Compilation;
use tracing::{debug, info};

// ============================================================================
// Loading
// ============================================================================

/// Load the configuration named on the command line, or `./testport.toml`.
pub fn load_config(explicit: Option<&Path>) -> Result<Config, PortError> {
    let config = match explicit {
        Some(path) => Config::load(path)?,
        None => {
            let cwd = std::env::current_dir()
                .map_err(|e| PortError::internal(format!("cannot read working directory: {}", e)))?;
            Config::load_from_dir(&cwd)?
        }
    };
    Ok(config)
}

/// Read a compiled unit and bind the documents that carry no operations.
pub fn load_unit(path: &Path) -> Result<Compilation, PortError> {
    let display = path.display().to_string();
    let json = fs::read_to_string(path).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => PortError::file_not_found(display.clone()),
        _ => PortError::internal(format!("cannot read {}: {}", display, e)),
    })?;
    let mut compilation: Compilation =
        serde_json::from_str(&json).map_err(|e| PortError::InvalidInput {
            message: format!("malformed compiled unit: {}", e),
            file: Some(display.clone()),
        })?;

    let bound = compilation.bind_unbound_documents();
    debug!(
        unit = %path.display(),
        documents = compilation.documents.len(),
        bound,
        "loaded compiled unit"
    );
    Ok(compilation)
}

/// Parse `--rule` values. Unknown ids are rejected before any work is done.
pub fn parse_rule_ids(ids: &[String]) -> Result<Vec<RuleId>, PortError> {
    ids.iter()
        .map(|id| id.parse::<RuleId>().map_err(PortError::from))
        .collect()
}

// ============================================================================
// Commands
// ============================================================================

/// `testport rules`
pub fn run_rules(config: &Config) -> Result<RulesResponse, PortError> {
    let options = MigrationOptions::from_config(config)?;
    let rules = DESCRIPTORS
        .iter()
        .map(|descriptor| descriptor.to_info(options.is_enabled(descriptor.id)))
        .collect();
    Ok(RulesResponse::new(rules))
}

/// `testport analyze <unit.json>`
pub fn run_analyze(config: &Config, unit: &Path) -> Result<AnalyzeResponse, PortError> {
    let options = MigrationOptions::from_config(config)?;
    let compilation = load_unit(unit)?;
    let findings = report_compilation(&compilation, &options);
    info!(findings = findings.len(), "analysis complete");
    Ok(AnalyzeResponse::new(
        findings.iter().map(|f| f.to_info()).collect(),
        compilation.documents.len(),
    ))
}

/// Arguments of `testport fix`.
#[derive(Debug, Clone)]
pub struct FixRequest<'a> {
    pub unit: &'a Path,
    /// Restrict fixing to these rule ids.
    pub rules: &'a [String],
    pub dry_run: bool,
    /// Write the edited unit here.
    pub write: Option<&'a Path>,
}

/// `testport fix <unit.json>`
pub fn run_fix(config: &Config, request: &FixRequest<'_>) -> Result<FixResponse, PortError> {
    let only = parse_rule_ids(request.rules)?;
    let options = MigrationOptions::from_config(config)?.with_only(only);
    let mut compilation = load_unit(request.unit)?;

    let fixes = fix_compilation(&compilation, &options)?;
    let documents = fixes.iter().map(|fix| fix.to_result(request.dry_run)).collect();
    let mut response = FixResponse::new(documents, request.dry_run);

    if let Some(out) = request.write.filter(|_| !request.dry_run) {
        apply_fixes(&mut compilation, fixes);
        let json = serde_json::to_string_pretty(&compilation)
            .map_err(|e| PortError::internal(format!("cannot serialize unit: {}", e)))?;
        fs::write(out, json).map_err(|e| {
            PortError::internal(format!("cannot write {}: {}", out.display(), e))
        })?;
        info!(out = %out.display(), "wrote edited unit");
        response.written_to = Some(out.display().to_string());
    }
    Ok(response)
}
