//! extbuild CLI - CI distribution-matrix helper
//!
//! Usage: extbuild <COMMAND>
//!
//! Commands:
//!   matrix  Compute distribution matrices and emit GitHub output lines

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use extbuild::{
    compute_platform_matrices, detect_github_event_from_env, parse_matrix_file,
    render_deploy_github_output_line, render_deploy_readable_lines, render_github_output_lines,
    split_delimited_list, ComputeOptions, GithubEventType, Logger, OutputMode, ReducedCIMode,
};

/// extbuild - CI distribution-matrix helper
#[derive(Parser, Debug)]
#[command(name = "extbuild")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Compute distribution matrices and emit GitHub output lines
    Matrix {
        /// Input distribution matrix JSON file
        #[arg(long, default_value = "config/distribution_matrix.json")]
        input: PathBuf,

        /// Platforms to select (';' or ',' separated)
        #[arg(long, default_value = "")]
        platform: String,

        /// Arch tokens to keep (';' or ',' separated; amd64, arm64)
        #[arg(long, default_value = "")]
        arch: String,

        /// duckdb_arch values to exclude (';' or ',' separated)
        #[arg(long, default_value = "")]
        exclude: String,

        /// Opt-in duckdb_arch values to allow (';' or ',' separated)
        #[arg(long, default_value = "")]
        opt_in: String,

        /// Reduced CI mode: auto|enabled|disabled (auto follows the event type)
        #[arg(long, default_value = "")]
        reduced_ci_mode: String,

        /// Path to write machine-readable GitHub output lines
        #[arg(long)]
        out: Option<PathBuf>,

        /// Also emit the flattened deploy matrix
        #[arg(long)]
        deploy: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Matrix {
            input,
            platform,
            arch,
            exclude,
            opt_in,
            reduced_ci_mode,
            out,
            deploy,
        } => cmd_matrix(
            &input,
            &platform,
            &arch,
            &exclude,
            &opt_in,
            &reduced_ci_mode,
            out.as_deref(),
            deploy,
        ),
    }
}

#[allow(clippy::too_many_arguments)]
fn cmd_matrix(
    input: &std::path::Path,
    platform: &str,
    arch: &str,
    exclude: &str,
    opt_in: &str,
    reduced_ci_mode: &str,
    out: Option<&std::path::Path>,
    deploy: bool,
) -> Result<()> {
    let logger = Logger::stderr();

    let event_type =
        detect_github_event_from_env(&logger).context("detect GitHub event type")?;
    logger.info(
        "Detected GitHub event type",
        &[("event_type", &event_type.to_string())],
    );

    let mut mode: ReducedCIMode = reduced_ci_mode.parse()?;
    if event_type == GithubEventType::PullRequest && mode == ReducedCIMode::Auto {
        mode = ReducedCIMode::Enabled;
        logger.info(
            "Enabled reduced CI mode for pull_request event when mode is auto",
            &[],
        );
    }

    let data = fs::read_to_string(input)
        .with_context(|| format!("read input matrix '{}'", input.display()))?;
    let matrix = parse_matrix_file(&data)
        .with_context(|| format!("parse input matrix '{}'", input.display()))?;

    let result = compute_platform_matrices(
        &matrix,
        &ComputeOptions {
            platforms: split_delimited_list(platform),
            arch_tokens: split_delimited_list(arch),
            exclude: split_delimited_list(exclude),
            opt_in: split_delimited_list(opt_in),
            reduced_ci_mode: mode,
        },
    )
    .context("compute platform matrices")?;

    let mut content =
        render_github_output_lines(&result, OutputMode::Machine).context("render output lines")?;
    if deploy {
        content.push_str(&render_deploy_github_output_line(&result)?);
    }

    if let Some(out_path) = out {
        fs::write(out_path, &content)
            .with_context(|| format!("write output file '{}'", out_path.display()))?;
    }

    if deploy {
        print!("{}", render_deploy_readable_lines(&result));
    } else {
        let readable = render_github_output_lines(&result, OutputMode::Human)
            .context("render readable output")?;
        print!("{readable}");
    }

    Ok(())
}
