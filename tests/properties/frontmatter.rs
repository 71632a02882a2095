//! Property tests for frontmatter extraction and import parsing.

use proptest::prelude::*;
use std::path::Path;

use weft::parser::{extract_frontmatter, parse_body_directives, parse_imports};

fn small_line() -> impl Strategy<Value = String> {
    // Exclude lines that are exactly "---" to avoid conflicting with frontmatter delimiters.
    proptest::string::string_regex("[A-Za-z0-9 _:#\\-]{0,40}")
        .unwrap()
        .prop_filter("not a delimiter", |s| s.trim() != "---")
}

fn reference() -> impl Strategy<Value = String> {
    let segment = proptest::string::string_regex("[a-z0-9_-]{1,10}").unwrap();
    proptest::collection::vec(segment, 1..=3).prop_map(|s| format!("{}.md", s.join("/")))
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 96,
        .. ProptestConfig::default()
    })]

    /// PROPERTY: well-formed frontmatter splits into the exact yaml and body lines.
    #[test]
    fn property_extract_frontmatter_splits_lines(
        yaml_lines in proptest::collection::vec(small_line(), 0..=8),
        body_lines in proptest::collection::vec(small_line(), 0..=12),
    ) {
        // `str::lines()` cannot round-trip a trailing empty line.
        prop_assume!(body_lines.last().map_or(true, |l| !l.is_empty()));

        let mut content_lines = vec!["---".to_string()];
        content_lines.extend(yaml_lines.clone());
        content_lines.push("---".to_string());
        content_lines.extend(body_lines.clone());
        let content = content_lines.join("\n");

        let extracted = extract_frontmatter(&content, Path::new("test.md"))
            .expect("constructed frontmatter is closed")
            .expect("content starts with a delimiter");

        prop_assert_eq!(extracted.yaml, yaml_lines.join("\n"));
        prop_assert_eq!(extracted.body, body_lines.join("\n"));
        prop_assert_eq!(extracted.end_line, 2 + yaml_lines.len());
    }

    /// PROPERTY: frontmatter import lists come back in declaration order.
    #[test]
    fn property_frontmatter_imports_preserve_order(
        refs in proptest::collection::vec(reference(), 0..=6),
    ) {
        let mut content = String::from("---\n");
        if !refs.is_empty() {
            content.push_str("imports:\n");
            for r in &refs {
                content.push_str(&format!("  - {}\n", r));
            }
        }
        content.push_str("---\n# body\n");

        let imports = parse_imports(&content, Path::new("test.md")).unwrap();
        let parsed: Vec<String> = imports.iter().map(|i| i.reference.clone()).collect();
        prop_assert_eq!(parsed, refs);
        prop_assert!(imports.iter().all(|i| !i.optional));
    }

    /// PROPERTY: directives inside fenced code blocks are never imports.
    #[test]
    fn property_fenced_directives_ignored(
        inside in proptest::collection::vec(reference(), 1..=4),
        outside in reference(),
    ) {
        let mut body = String::from("```markdown\n");
        for r in &inside {
            body.push_str(&format!("{{{{#import {}}}}}\n", r));
        }
        body.push_str("```\n");
        body.push_str(&format!("@include {}\n", outside));

        let imports = parse_body_directives(&body);
        prop_assert_eq!(imports.len(), 1);
        prop_assert_eq!(&imports[0].reference, &outside);
    }

    /// PROPERTY: `parse_imports` never panics on arbitrary input.
    #[test]
    fn property_parse_imports_never_panics(
        content in "(?s).{0,512}"
    ) {
        let _ = parse_imports(&content, Path::new("test.md"));
    }
}
