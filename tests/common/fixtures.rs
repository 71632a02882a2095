//! Test fixtures - reusable workflow documents.

/// Workflow document importing `imports` through frontmatter
pub fn workflow(imports: &[&str]) -> String {
    let mut content = String::from("---\non: push\n");
    if !imports.is_empty() {
        content.push_str("imports:\n");
        for import in imports {
            content.push_str(&format!("  - {}\n", import));
        }
    }
    content.push_str("---\n# Workflow\n\nDo the thing.\n");
    content
}

/// A fragment pulling in another through a body directive
pub fn fragment_with_directive(target: &str) -> String {
    format!("# Shared instructions\n\n{{{{#import {}}}}}\n", target)
}

/// Frontmatter that does not parse
pub const BROKEN_FRONTMATTER: &str = "---\nimports: [unclosed\n---\n# Broken\n";
