//! Filter engine for distribution matrices
//!
//! `compute_platform_matrices` takes the parsed matrix file plus the caller's
//! selection criteria and produces the rendering-ready per-platform result.
//! Everything here is a pure function of its inputs; ordering of the output
//! is fully deterministic (sorted map keys, entries sorted by `duckdb_arch`).

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::config::{Entry, MatrixFile};
use crate::error::{ExtbuildError, ExtbuildResult};

/// Arch tokens accepted by `--arch`.
const VALID_ARCH_TOKENS: [&str; 2] = ["amd64", "arm64"];

/// Reduced CI mode as requested on the command line.
///
/// `Auto` is resolved against the triggering GitHub event at the CLI boundary;
/// by the time options reach the filter engine it behaves like `Disabled`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReducedCIMode {
    #[default]
    Auto,
    Enabled,
    Disabled,
}

impl ReducedCIMode {
    /// Whether filtering should keep only reduced-CI targets.
    pub fn is_reduced(self) -> bool {
        self == ReducedCIMode::Enabled
    }
}

impl FromStr for ReducedCIMode {
    type Err = ExtbuildError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw {
            "" | "auto" => Ok(ReducedCIMode::Auto),
            "enabled" => Ok(ReducedCIMode::Enabled),
            "disabled" => Ok(ReducedCIMode::Disabled),
            other => Err(ExtbuildError::InvalidReducedCiMode {
                mode: other.to_string(),
            }),
        }
    }
}

impl fmt::Display for ReducedCIMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ReducedCIMode::Auto => "auto",
            ReducedCIMode::Enabled => "enabled",
            ReducedCIMode::Disabled => "disabled",
        };
        f.write_str(s)
    }
}

/// Selection criteria for one matrix computation.
#[derive(Debug, Clone, Default)]
pub struct ComputeOptions {
    /// Platforms to compute (must be non-empty after normalization).
    pub platforms: Vec<String>,
    /// Arch tokens to keep; empty means no arch filtering.
    pub arch_tokens: Vec<String>,
    /// `duckdb_arch` values to drop unconditionally.
    pub exclude: Vec<String>,
    /// `duckdb_arch` values allowed through the opt-in gate.
    pub opt_in: Vec<String>,
    pub reduced_ci_mode: ReducedCIMode,
}

/// Filtered result for one platform, ready for rendering.
///
/// An empty include list serializes as `{}` - the downstream workflow treats
/// `fromJSON(output).include` being absent as "nothing to build".
#[derive(Debug, Clone, PartialEq, Serialize, Default)]
pub struct PlatformMatrix {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub include: Vec<PlatformOutput>,
}

/// One surviving build target with its pass-through metadata.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlatformOutput {
    pub duckdb_arch: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub runner: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub osx_build_arch: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub vcpkg_target_triplet: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub vcpkg_host_triplet: Option<String>,
}

impl From<&Entry> for PlatformOutput {
    fn from(entry: &Entry) -> Self {
        PlatformOutput {
            duckdb_arch: entry.duckdb_arch.clone(),
            runner: entry.runner.clone(),
            osx_build_arch: entry.osx_build_arch.clone(),
            vcpkg_target_triplet: entry.vcpkg_target_triplet.clone(),
            vcpkg_host_triplet: entry.vcpkg_host_triplet.clone(),
        }
    }
}

/// Compute the filtered matrix for every requested platform.
///
/// Validates the selection first (platform list non-empty, arch tokens in the
/// supported vocabulary), then applies the inclusion predicate entry by entry.
/// A requested platform missing from the configuration is an error; a
/// platform whose entries all get filtered out still appears in the result
/// with an empty include list.
pub fn compute_platform_matrices(
    matrix: &MatrixFile,
    opts: &ComputeOptions,
) -> ExtbuildResult<BTreeMap<String, PlatformMatrix>> {
    let platforms = normalize_values(&opts.platforms);
    if platforms.is_empty() {
        return Err(ExtbuildError::NoPlatform);
    }

    let arch_tokens = normalize_arch_tokens(&opts.arch_tokens)?;
    let reduced = opts.reduced_ci_mode.is_reduced();
    let exclude_set: BTreeSet<String> = normalize_values(&opts.exclude).into_iter().collect();
    let opt_in_set: BTreeSet<String> = normalize_values(&opts.opt_in).into_iter().collect();

    let mut results = BTreeMap::new();
    for platform in platforms {
        let cfg = matrix
            .get(&platform)
            .ok_or_else(|| ExtbuildError::UnknownPlatform {
                platform: platform.clone(),
            })?;

        let mut include: Vec<PlatformOutput> = cfg
            .include
            .iter()
            .filter(|entry| includes_entry(entry, &arch_tokens, reduced, &exclude_set, &opt_in_set))
            .map(PlatformOutput::from)
            .collect();

        include.sort_by(|a, b| a.duckdb_arch.cmp(&b.duckdb_arch));
        results.insert(platform, PlatformMatrix { include });
    }

    Ok(results)
}

fn includes_entry(
    entry: &Entry,
    arch_tokens: &BTreeSet<String>,
    reduced: bool,
    exclude_set: &BTreeSet<String>,
    opt_in_set: &BTreeSet<String>,
) -> bool {
    let duckdb_arch = entry.duckdb_arch.as_str();

    // Malformed entry guard.
    if duckdb_arch.is_empty() {
        return false;
    }

    if exclude_set.contains(duckdb_arch) {
        return false;
    }

    if !arch_tokens.is_empty() && !matches_arch_token(duckdb_arch, arch_tokens) {
        return false;
    }

    if reduced && !entry.run_in_reduced_ci_mode {
        return false;
    }

    if entry.opt_in && !opt_in_set.contains(duckdb_arch) {
        return false;
    }

    true
}

/// A token matches when it appears in the arch identifier preceded by an
/// underscore: `amd64` matches `linux_amd64_musl` but not `linuxamd64`.
fn matches_arch_token(duckdb_arch: &str, tokens: &BTreeSet<String>) -> bool {
    tokens
        .iter()
        .any(|token| duckdb_arch.contains(&format!("_{token}")))
}

fn normalize_arch_tokens(tokens: &[String]) -> ExtbuildResult<BTreeSet<String>> {
    let mut result = BTreeSet::new();
    for token in normalize_values(tokens) {
        if !VALID_ARCH_TOKENS.contains(&token.as_str()) {
            return Err(ExtbuildError::UnknownArchToken { token });
        }
        result.insert(token);
    }
    Ok(result)
}

/// Trim whitespace, drop empties, dedupe keeping first occurrence.
pub(crate) fn normalize_values(values: &[String]) -> Vec<String> {
    let mut seen = BTreeSet::new();
    values
        .iter()
        .map(|value| value.trim())
        .filter(|value| !value.is_empty())
        .filter(|value| seen.insert(value.to_string()))
        .map(str::to_string)
        .collect()
}
