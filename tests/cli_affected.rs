//! `weft affected` end to end

mod common;

use common::*;

/// a.md -> shared/x.md -> shared/y.md <- b.md ; c.md standalone
fn diamond() -> TestEnv {
    let env = TestEnv::new();
    env.write_workflow("a.md", &["shared/x.md"]);
    env.write_workflow("b.md", &["shared/y.md"]);
    env.write_workflow("c.md", &[]);
    env.write_project_file(
        ".github/workflows/shared/x.md",
        &fragment_with_directive("y.md"),
    );
    env.write_workflow("shared/y.md", &[]);
    env
}

#[test]
fn affected_fragment_lists_transitive_importers() {
    let env = diamond();

    let result = env.run(&["affected", ".github/workflows/shared/y.md"]);

    assert!(result.success, "{}", result.combined_output());
    assert_eq!(result.stdout_lines(), vec!["a.md", "b.md"]);
}

#[test]
fn affected_top_level_is_only_itself() {
    let env = diamond();

    let result = env.run(&["affected", ".github/workflows/c.md"]);

    assert!(result.success, "{}", result.combined_output());
    assert_eq!(result.stdout_lines(), vec!["c.md"]);
}

#[test]
fn affected_unknown_fragment_rebuilds_everything() {
    let env = diamond();

    let result = env.run(&["affected", ".github/workflows/shared/new.md"]);

    assert!(result.success, "{}", result.combined_output());
    assert_eq!(result.stdout_lines(), vec!["a.md", "b.md", "c.md"]);
}

#[test]
fn affected_excluded_readme_includes_its_importers() {
    let env = diamond();
    env.write_workflow("d.md", &["README.md"]);
    env.write_project_file(".github/workflows/README.md", "# Workflows\n");

    let result = env.run(&["affected", ".github/workflows/README.md"]);

    assert!(result.success, "{}", result.combined_output());
    assert_eq!(result.stdout_lines(), vec!["README.md", "d.md"]);
}

#[test]
fn affected_unions_multiple_paths() {
    let env = diamond();

    let result = env.run(&[
        "affected",
        ".github/workflows/shared/x.md",
        ".github/workflows/c.md",
    ]);

    assert!(result.success, "{}", result.combined_output());
    assert_eq!(result.stdout_lines(), vec!["a.md", "c.md"]);
}

#[test]
fn affected_paths_are_relative_to_working_directory() {
    let env = diamond();

    let result = env.run_from(&env.workflow_path("shared"), &["affected", "x.md"]);

    assert!(result.success, "{}", result.combined_output());
    assert_eq!(result.stdout_lines(), vec!["a.md"]);
}

#[test]
fn affected_json_output() {
    let env = diamond();

    let result = env.run(&["--json", "affected", ".github/workflows/shared/y.md"]);

    assert!(result.success, "{}", result.combined_output());
    let events = result.json_lines();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0]["event"], "affected");
    assert_eq!(events[0]["command"], "affected");
    assert_eq!(events[0]["affected"], serde_json::json!(["a.md", "b.md"]));
}

#[test]
fn affected_with_explicit_root() {
    let env = TestEnv::new();
    env.write_project_file("flows/main.md", &workflow(&["parts/step.md"]));
    env.write_project_file("flows/parts/step.md", "# step\n");

    let result = env.run(&["affected", "--root", "flows", "flows/parts/step.md"]);

    assert!(result.success, "{}", result.combined_output());
    assert_eq!(result.stdout_lines(), vec!["main.md"]);
}

#[test]
fn affected_missing_root_fails() {
    let env = TestEnv::new();

    let result = env.run(&["affected", "--root", "nowhere", "x.md"]);

    assert!(!result.success);
    assert!(result.stderr.contains("nowhere"), "{}", result.stderr);
}
