//! Rendering of computed matrices into GitHub Actions output lines
//!
//! The wire contract downstream is `<name>=<json>` assignments appended to
//! `$GITHUB_OUTPUT`, so the machine-readable form must never contain an
//! embedded newline. The human-readable form pretty-prints the same structure
//! for CI logs.

use std::collections::BTreeMap;
use std::fmt::Write as _;

use serde::Serialize;

use crate::error::ExtbuildResult;
use crate::matrix::PlatformMatrix;

/// Rendering style for GitHub output lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// Compact JSON, safe for `$GITHUB_OUTPUT` assignments.
    Machine,
    /// Two-space-indented JSON for log readability.
    Human,
}

/// Render one `<platform>_matrix=<json>` line per platform, platforms in
/// ascending name order.
pub fn render_github_output_lines(
    matrices: &BTreeMap<String, PlatformMatrix>,
    mode: OutputMode,
) -> ExtbuildResult<String> {
    let mut out = String::new();
    for (platform, matrix) in matrices {
        let payload = match mode {
            OutputMode::Machine => serde_json::to_string(matrix)?,
            OutputMode::Human => serde_json::to_string_pretty(matrix)?,
        };
        let _ = writeln!(out, "{platform}_matrix={payload}");
    }
    Ok(out)
}

#[derive(Debug, Clone, PartialEq, Serialize, Default)]
struct DeployOutput {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    include: Vec<DeployOutputEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
struct DeployOutputEntry {
    duckdb_arch: String,
}

/// Render the flattened cross-platform deploy line:
/// `deploy_matrix={"include":[{"duckdb_arch":...},...]}`.
pub fn render_deploy_github_output_line(
    matrices: &BTreeMap<String, PlatformMatrix>,
) -> ExtbuildResult<String> {
    let deploy = build_deploy_output(matrices);
    let payload = serde_json::to_string(&deploy)?;
    Ok(format!("deploy_matrix={payload}\n"))
}

/// Human form of the deploy aggregation: one bare `duckdb_arch` per line.
pub fn render_deploy_readable_lines(matrices: &BTreeMap<String, PlatformMatrix>) -> String {
    let deploy = build_deploy_output(matrices);
    let mut out = String::new();
    for entry in deploy.include {
        let _ = writeln!(out, "{}", entry.duckdb_arch);
    }
    out
}

fn build_deploy_output(matrices: &BTreeMap<String, PlatformMatrix>) -> DeployOutput {
    let mut include: Vec<DeployOutputEntry> = matrices
        .values()
        .flat_map(|matrix| matrix.include.iter())
        .map(|entry| DeployOutputEntry {
            duckdb_arch: entry.duckdb_arch.clone(),
        })
        .collect();
    // Sorted across the union of platforms, not grouped per platform.
    include.sort_by(|a, b| a.duckdb_arch.cmp(&b.duckdb_arch));
    DeployOutput { include }
}

/// Split a `;`- or `,`-delimited selection list into trimmed, non-empty parts.
pub fn split_delimited_list(raw: &str) -> Vec<String> {
    raw.split([';', ','])
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(str::to_string)
        .collect()
}
