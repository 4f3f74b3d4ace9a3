//! Property tests for the filter engine and renderers.

use proptest::prelude::*;

use extbuild::{
    compute_platform_matrices, render_deploy_github_output_line, render_github_output_lines,
    ComputeOptions, Entry, MatrixFile, OutputMode, PlatformConfig, ReducedCIMode,
};

fn arch_name() -> impl Strategy<Value = String> {
    // Identifiers shaped like the real ones: platform prefix + arch token.
    (
        prop_oneof!["linux", "osx", "windows", "wasm"],
        prop_oneof!["amd64", "arm64", "mvp", "eh"],
        proptest::option::of("[a-z]{2,6}"),
    )
        .prop_map(|(platform, arch, suffix)| match suffix {
            Some(suffix) => format!("{platform}_{arch}_{suffix}"),
            None => format!("{platform}_{arch}"),
        })
}

fn entry() -> impl Strategy<Value = Entry> {
    (arch_name(), any::<bool>(), any::<bool>()).prop_map(|(duckdb_arch, reduced, opt_in)| Entry {
        duckdb_arch,
        run_in_reduced_ci_mode: reduced,
        opt_in,
        ..Entry::default()
    })
}

fn matrix() -> impl Strategy<Value = MatrixFile> {
    proptest::collection::btree_map(
        prop_oneof!["linux", "osx", "windows", "wasm"].prop_map(String::from),
        proptest::collection::vec(entry(), 0..=6).prop_map(|include| PlatformConfig { include }),
        1..=4,
    )
}

fn mode() -> impl Strategy<Value = ReducedCIMode> {
    prop_oneof![
        Just(ReducedCIMode::Auto),
        Just(ReducedCIMode::Enabled),
        Just(ReducedCIMode::Disabled),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 96,
        .. ProptestConfig::default()
    })]

    /// PROPERTY: Repeated computation renders byte-identical output.
    #[test]
    fn property_rendering_is_deterministic(matrix in matrix(), mode in mode()) {
        let platforms: Vec<String> = matrix.keys().cloned().collect();
        let opts = ComputeOptions {
            platforms,
            reduced_ci_mode: mode,
            ..ComputeOptions::default()
        };

        let first = compute_platform_matrices(&matrix, &opts).unwrap();
        let second = compute_platform_matrices(&matrix, &opts).unwrap();

        let rendered_first = render_github_output_lines(&first, OutputMode::Machine).unwrap();
        let rendered_second = render_github_output_lines(&second, OutputMode::Machine).unwrap();
        prop_assert_eq!(&rendered_first, &rendered_second);

        let deploy_first = render_deploy_github_output_line(&first).unwrap();
        let deploy_second = render_deploy_github_output_line(&second).unwrap();
        prop_assert_eq!(&deploy_first, &deploy_second);
    }

    /// PROPERTY: Entries within a platform come out sorted by duckdb_arch,
    /// and platform lines come out sorted by platform name.
    #[test]
    fn property_output_is_sorted(matrix in matrix()) {
        let platforms: Vec<String> = matrix.keys().cloned().collect();
        let result = compute_platform_matrices(
            &matrix,
            &ComputeOptions { platforms, ..ComputeOptions::default() },
        )
        .unwrap();

        for matrix_result in result.values() {
            let archs: Vec<&String> =
                matrix_result.include.iter().map(|e| &e.duckdb_arch).collect();
            let mut sorted = archs.clone();
            sorted.sort();
            prop_assert_eq!(&archs, &sorted);
        }

        let rendered = render_github_output_lines(&result, OutputMode::Machine).unwrap();
        let line_platforms: Vec<&str> = rendered
            .lines()
            .filter_map(|line| line.split("_matrix=").next())
            .collect();
        let mut sorted_platforms = line_platforms.clone();
        sorted_platforms.sort();
        prop_assert_eq!(&line_platforms, &sorted_platforms);
    }

    /// PROPERTY: Without an allowlist, no opt-in entry ever appears.
    #[test]
    fn property_opt_in_entries_need_an_allowlist_hit(matrix in matrix()) {
        let platforms: Vec<String> = matrix.keys().cloned().collect();
        let result = compute_platform_matrices(
            &matrix,
            &ComputeOptions { platforms, ..ComputeOptions::default() },
        )
        .unwrap();

        for (platform, matrix_result) in &result {
            for out in &matrix_result.include {
                // Duplicated arch names can mix opt-in and non-opt-in rows, so
                // require a non-opt-in source row rather than checking the first.
                let has_non_opt_in_source = matrix[platform]
                    .include
                    .iter()
                    .any(|e| e.duckdb_arch == out.duckdb_arch && !e.opt_in);
                prop_assert!(
                    has_non_opt_in_source,
                    "opt-in entry {} leaked through",
                    out.duckdb_arch
                );
            }
        }
    }

    /// PROPERTY: Excluded arch identifiers never appear in any rendering.
    #[test]
    fn property_excluded_entries_never_appear(matrix in matrix(), exclude_index in any::<prop::sample::Index>()) {
        let all_archs: Vec<String> = matrix
            .values()
            .flat_map(|cfg| cfg.include.iter().map(|e| e.duckdb_arch.clone()))
            .collect();
        prop_assume!(!all_archs.is_empty());
        let excluded = all_archs[exclude_index.index(all_archs.len())].clone();

        let platforms: Vec<String> = matrix.keys().cloned().collect();
        let result = compute_platform_matrices(
            &matrix,
            &ComputeOptions {
                platforms,
                exclude: vec![excluded.clone()],
                ..ComputeOptions::default()
            },
        )
        .unwrap();

        for matrix_result in result.values() {
            for out in &matrix_result.include {
                prop_assert_ne!(&out.duckdb_arch, &excluded);
            }
        }
    }

    /// PROPERTY: Reduced mode only ever narrows the selection.
    #[test]
    fn property_reduced_mode_is_a_subset(matrix in matrix()) {
        let platforms: Vec<String> = matrix.keys().cloned().collect();
        let full = compute_platform_matrices(
            &matrix,
            &ComputeOptions {
                platforms: platforms.clone(),
                ..ComputeOptions::default()
            },
        )
        .unwrap();
        let reduced = compute_platform_matrices(
            &matrix,
            &ComputeOptions {
                platforms,
                reduced_ci_mode: ReducedCIMode::Enabled,
                ..ComputeOptions::default()
            },
        )
        .unwrap();

        for (platform, reduced_result) in &reduced {
            let full_archs: Vec<&String> =
                full[platform].include.iter().map(|e| &e.duckdb_arch).collect();
            for out in &reduced_result.include {
                prop_assert!(full_archs.contains(&&out.duckdb_arch));
            }
        }
    }
}
