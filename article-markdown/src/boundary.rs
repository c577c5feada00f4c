//! Locating the fold of an article.
//!
//! The cut point must agree byte-for-byte with the abbreviation stored
//! server-side, so the window sizes below are fixed.

use crate::references::collect_references;

const MARKERS: [&str; 4] = ["---\n", "<hr>\n", "<hr/>\n", "<hr />\n"];

/// Explicit markers starting at or after this many characters are ignored.
const EXPLICIT_MARKER_LIMIT: usize = 1000;
/// Characters scanned by the paragraph heuristic.
const PARAGRAPH_WINDOW: usize = 1000;
/// Maximum length of the accumulated paragraphs.
const PARAGRAPH_BUDGET: usize = 500;

#[derive(Debug, Clone, Default)]
pub struct BoundaryOptions {
    /// Keep the marker text at the end of the truncated body.
    pub include_boundary_in_body: bool,
    /// Append every reference definition of the full body.
    pub include_references: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Boundary {
    pub truncated_body: String,
    pub used_explicit_marker: bool,
    pub matched_marker_text: Option<String>,
}

pub fn find_boundary(body: &str, options: &BoundaryOptions) -> Boundary {
    let mut boundary = match find_marker(body) {
        Some((start, end))
            if body[..start].chars().count() < EXPLICIT_MARKER_LIMIT =>
        {
            let truncated_body = if options.include_boundary_in_body {
                body[..end].to_string()
            } else {
                body[..start].trim_end().to_string()
            };
            Boundary {
                truncated_body,
                used_explicit_marker: true,
                matched_marker_text: Some(body[start..end].to_string()),
            }
        }
        _ => Boundary {
            truncated_body: leading_paragraphs(body),
            used_explicit_marker: false,
            matched_marker_text: None,
        },
    };

    if options.include_references {
        let references = collect_references(body);
        if !references.is_empty() {
            boundary.truncated_body.push_str("\n\n");
            boundary.truncated_body.push_str(&references.join("\n"));
        }
    }
    boundary
}

/// Byte range of the earliest marker, with a dash marker extended over any
/// dashes directly before it.
fn find_marker(body: &str) -> Option<(usize, usize)> {
    let (mut start, marker) = MARKERS
        .iter()
        .filter_map(|marker| body.find(marker).map(|start| (start, *marker)))
        .min_by_key(|(start, _)| *start)?;
    let end = start + marker.len();
    if marker == "---\n" {
        while body[..start].ends_with('-') {
            start -= 1;
        }
    }
    Some((start, end))
}

fn leading_paragraphs(body: &str) -> String {
    let window: String = body.chars().take(PARAGRAPH_WINDOW).collect();
    let window = window.replace("\r\n", "\n");

    let mut kept = Vec::new();
    let mut total = 0;
    for paragraph in window.split("\n\n") {
        let length = paragraph.chars().count();
        if !kept.is_empty() && total + length > PARAGRAPH_BUDGET {
            break;
        }
        kept.push(paragraph);
        total += length;
    }
    kept.join("\n\n").trim_end().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_earliest_marker_wins() {
        assert_eq!(find_marker("a\n<hr>\nb\n---\n"), Some((2, 7)));
    }

    #[test]
    fn test_dash_run_is_one_marker() {
        let body = "intro\n------\nrest";
        let (start, end) = find_marker(body).unwrap();
        assert_eq!(&body[start..end], "------\n");
    }

    #[test]
    fn test_first_paragraph_always_kept() {
        let long = "x".repeat(700);
        assert_eq!(leading_paragraphs(&format!("{long}\n\nnext")), long);
    }
}
