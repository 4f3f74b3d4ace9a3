//! Declarative distribution-matrix configuration
//!
//! Defines the in-memory model for the matrix file
//! (`config/distribution_matrix.json`) and its strict parser:
//! - `MatrixFile`: platform name -> `PlatformConfig`
//! - `PlatformConfig`: the `include` list of build targets
//! - `Entry`: one build target with its CI metadata

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{ExtbuildError, ExtbuildResult};

/// Mapping from platform name (e.g. "linux", "osx") to its build targets.
pub type MatrixFile = BTreeMap<String, PlatformConfig>;

/// Per-platform section of the matrix file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct PlatformConfig {
    #[serde(default)]
    pub include: Vec<Entry>,
}

/// One build target inside a platform's include list.
///
/// `duckdb_arch` identifies the target within its platform. It is
/// serde-defaulted rather than required so that a malformed entry surfaces as
/// a filtered-out row instead of a parse failure; the filter engine drops
/// entries with an empty `duckdb_arch`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Entry {
    #[serde(default)]
    pub duckdb_arch: String,

    /// GitHub runner label, e.g. "ubuntu-latest".
    #[serde(default)]
    pub runner: Option<String>,

    /// macOS-only: the arch passed to the compiler, e.g. "x86_64".
    #[serde(default)]
    pub osx_build_arch: Option<String>,

    #[serde(default)]
    pub vcpkg_target_triplet: Option<String>,

    #[serde(default)]
    pub vcpkg_host_triplet: Option<String>,

    /// Whether this target stays selected when reduced CI mode is active.
    #[serde(default)]
    pub run_in_reduced_ci_mode: bool,

    /// Opt-in targets are excluded unless explicitly allowlisted.
    #[serde(default)]
    pub opt_in: bool,
}

/// Parse the raw matrix file, rejecting unknown fields and trailing content.
///
/// Strictness is deliberate: a typo like `opt_on` would otherwise silently
/// change which targets get built. Unknown fields fail with the full path of
/// the offending key (e.g. `linux.include.0.opt_on`).
pub fn parse_matrix_file(data: &str) -> ExtbuildResult<MatrixFile> {
    let mut deserializer = serde_json::Deserializer::from_str(data);

    let mut unknown_paths: Vec<String> = Vec::new();
    let matrix: MatrixFile = serde_ignored::deserialize(&mut deserializer, |path| {
        unknown_paths.push(path.to_string());
    })?;

    if let Some(field) = unknown_paths.into_iter().next() {
        return Err(ExtbuildError::UnknownField { field });
    }

    // A second top-level value means a concatenated or corrupted file.
    deserializer.end().map_err(|_| ExtbuildError::TrailingData)?;

    Ok(matrix)
}
