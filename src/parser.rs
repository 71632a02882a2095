//! Import extraction for workflow documents
//!
//! A document declares imports in two places:
//! - the `imports:` key of its optional YAML frontmatter
//! - body directives: `{{#import path}}`, `@include path`, `@import path`
//!   (append `?` to the keyword to mark the import optional)
//!
//! Directives inside fenced code blocks are documentation, not imports.

use std::fs;
use std::path::Path;

use crate::error::{WeftError, WeftResult};
use crate::models::{Frontmatter, ImportRef};

/// Delimiter for frontmatter sections
const FRONTMATTER_DELIMITER: &str = "---";

/// Reads a document and returns the import references it declares.
///
/// Implementations must return `Ok(vec![])` for a document that declares
/// nothing, and an error only when the document cannot be read or parsed.
pub trait ImportExtractor {
    fn extract_imports(&self, path: &Path) -> WeftResult<Vec<ImportRef>>;
}

/// Default extractor: frontmatter `imports:` plus body directives
#[derive(Debug, Clone, Copy, Default)]
pub struct FrontmatterExtractor;

impl FrontmatterExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl ImportExtractor for FrontmatterExtractor {
    fn extract_imports(&self, path: &Path) -> WeftResult<Vec<ImportRef>> {
        let content = fs::read_to_string(path)?;
        parse_imports(&content, path)
    }
}

/// Result of splitting frontmatter from file content
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractedFrontmatter {
    /// The raw YAML content of the frontmatter
    pub yaml: String,
    /// The content body after the frontmatter
    pub body: String,
    /// Line number where frontmatter ends (for error reporting)
    pub end_line: usize,
}

/// Split frontmatter from file content.
///
/// Returns `Ok(None)` when the file does not start with `---`; frontmatter
/// is optional for imported fragments.
pub fn extract_frontmatter(content: &str, file: &Path) -> WeftResult<Option<ExtractedFrontmatter>> {
    let lines: Vec<&str> = content.lines().collect();

    if lines.is_empty() || lines[0].trim() != FRONTMATTER_DELIMITER {
        return Ok(None);
    }

    let closing_line = lines
        .iter()
        .enumerate()
        .skip(1)
        .find(|(_, line)| line.trim() == FRONTMATTER_DELIMITER)
        .map(|(i, _)| i)
        .ok_or_else(|| WeftError::UnclosedFrontmatter {
            file: file.to_path_buf(),
        })?;

    let yaml = lines[1..closing_line].join("\n");
    let body = if closing_line + 1 < lines.len() {
        lines[closing_line + 1..].join("\n")
    } else {
        String::new()
    };

    Ok(Some(ExtractedFrontmatter {
        yaml,
        body,
        end_line: closing_line + 1,
    }))
}

/// Parse frontmatter YAML into a [`Frontmatter`]
pub fn parse_frontmatter(yaml: &str, file: &Path) -> WeftResult<Frontmatter> {
    if yaml.trim().is_empty() {
        return Ok(Frontmatter::default());
    }

    serde_yaml_ng::from_str(yaml).map_err(|e| WeftError::InvalidFrontmatter {
        file: file.to_path_buf(),
        message: format_yaml_error(&e),
    })
}

/// Collect every import reference declared in `content`.
///
/// Frontmatter imports come first, then body directives in order.
pub fn parse_imports(content: &str, file: &Path) -> WeftResult<Vec<ImportRef>> {
    let (mut imports, body) = match extract_frontmatter(content, file)? {
        Some(extracted) => {
            let frontmatter = parse_frontmatter(&extracted.yaml, file)?;
            let imports: Vec<ImportRef> = frontmatter
                .imports
                .0
                .into_iter()
                .map(ImportRef::required)
                .collect();
            (imports, extracted.body)
        }
        None => (Vec::new(), content.to_string()),
    };

    imports.extend(parse_body_directives(&body));
    Ok(imports)
}

/// Scan a document body for import directives
pub fn parse_body_directives(body: &str) -> Vec<ImportRef> {
    let mut imports = Vec::new();
    let mut fence: Option<&str> = None;

    for line in body.lines() {
        let trimmed = line.trim();

        if let Some(marker) = fence {
            if trimmed.starts_with(marker) {
                fence = None;
            }
            continue;
        }
        if trimmed.starts_with("```") {
            fence = Some("```");
            continue;
        }
        if trimmed.starts_with("~~~") {
            fence = Some("~~~");
            continue;
        }

        if let Some(import) = parse_directive(trimmed) {
            imports.push(import);
        }
    }

    imports
}

fn parse_directive(line: &str) -> Option<ImportRef> {
    if let Some(rest) = line.strip_prefix("{{#import") {
        let inner = rest.strip_suffix("}}")?;
        return directive_argument(inner);
    }

    ["@include", "@import"]
        .iter()
        .find_map(|keyword| line.strip_prefix(keyword))
        .and_then(directive_argument)
}

/// Parse `[?] <path>` following a directive keyword
fn directive_argument(rest: &str) -> Option<ImportRef> {
    let (optional, rest) = match rest.strip_prefix('?') {
        Some(stripped) => (true, stripped),
        None => (false, rest),
    };

    // `@includes` or `{{#imported}}` are not directives
    if !rest.starts_with(char::is_whitespace) {
        return None;
    }

    let reference = rest.trim();
    if reference.is_empty() {
        return None;
    }

    Some(ImportRef {
        reference: reference.to_string(),
        optional,
    })
}

fn format_yaml_error(err: &serde_yaml_ng::Error) -> String {
    match err.location() {
        Some(loc) => format!("line {}: {}", loc.line(), err),
        None => err.to_string(),
    }
}
