//! extbuild - CI distribution-matrix helper
//!
//! extbuild reads a declarative JSON description of every supported build
//! target (platform x architecture, plus build metadata), filters it against
//! the caller's selection criteria, and renders the result as GitHub Actions
//! output lines for the release workflow to consume.

pub mod config;
pub mod error;
pub mod event;
pub mod logging;
pub mod matrix;
pub mod output;

// Re-exports for convenience
pub use config::{parse_matrix_file, Entry, MatrixFile, PlatformConfig};
pub use error::{ExtbuildError, ExtbuildResult};
pub use event::{detect_github_event_from_env, detect_github_event_from_file, GithubEventType};
pub use logging::Logger;
pub use matrix::{
    compute_platform_matrices, ComputeOptions, PlatformMatrix, PlatformOutput, ReducedCIMode,
};
pub use output::{
    render_deploy_github_output_line, render_deploy_readable_lines, render_github_output_lines,
    split_delimited_list, OutputMode,
};
