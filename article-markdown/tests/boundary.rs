use article_markdown::{BoundaryOptions, collect_references, find_boundary};

fn boundary(body: &str) -> article_markdown::Boundary {
    find_boundary(body, &BoundaryOptions::default())
}

#[test]
fn test_explicit_marker_precedence() {
    let result = boundary("A\n\n---\n\nB");
    assert_eq!(result.truncated_body, "A");
    assert!(result.used_explicit_marker);
    assert_eq!(result.matched_marker_text.as_deref(), Some("---\n"));
}

#[test]
fn test_multi_dash_marker() {
    let result = boundary("Intro\n\n------\n\nMore");
    assert_eq!(result.truncated_body, "Intro");
    assert_eq!(result.matched_marker_text.as_deref(), Some("------\n"));

    let kept = find_boundary(
        "Intro\n\n------\n\nMore",
        &BoundaryOptions {
            include_boundary_in_body: true,
            include_references: false,
        },
    );
    assert_eq!(kept.truncated_body, "Intro\n\n------\n");
}

#[test]
fn test_earliest_marker_kind_wins() {
    let result = boundary("A\n<hr />\nB\n---\nC");
    assert_eq!(result.truncated_body, "A");
    assert_eq!(result.matched_marker_text.as_deref(), Some("<hr />\n"));

    let result = boundary("A\n-----\nB<hr>\nC");
    assert_eq!(result.truncated_body, "A");
    assert_eq!(result.matched_marker_text.as_deref(), Some("-----\n"));
}

#[test]
fn test_short_document_is_returned_whole() {
    let result = boundary("Hello world");
    assert_eq!(result.truncated_body, "Hello world");
    assert!(!result.used_explicit_marker);
    assert_eq!(result.matched_marker_text, None);
}

#[test]
fn test_marker_past_limit_is_ignored() {
    let body = format!("{}\n---\nrest", "a".repeat(1200));
    let result = boundary(&body);
    assert!(!result.used_explicit_marker);
    assert_eq!(result.truncated_body, "a".repeat(1000));
}

#[test]
fn test_paragraph_accumulation() {
    let paragraph = |c: char| c.to_string().repeat(200);
    let body = ['a', 'b', 'c', 'd']
        .map(paragraph)
        .join("\r\n\r\n");
    let result = boundary(&body);
    assert_eq!(
        result.truncated_body,
        format!("{}\n\n{}", paragraph('a'), paragraph('b'))
    );
}

#[test]
fn test_boundary_is_idempotent() {
    let bodies = [
        "Short one.\n\nShort two.\n\n".to_string(),
        format!("{}\n\n{}\n\n{}", "x".repeat(300), "y".repeat(150), "z".repeat(100)),
        format!("{}\n\nnext", "w".repeat(1500)),
    ];
    for body in bodies {
        let first = boundary(&body);
        let second = boundary(&first.truncated_body);
        assert_eq!(second, first);
    }
}

#[test]
fn test_references_are_reattached() {
    let body = "Intro [link][1].\n\n---\n\nMore\n\n[1]: https://x \"t\"\n[^1]: note";
    let result = find_boundary(
        body,
        &BoundaryOptions {
            include_boundary_in_body: false,
            include_references: true,
        },
    );
    assert_eq!(result.truncated_body, "Intro [link][1].\n\n[1]: https://x \"t\"");
}

#[test]
fn test_reference_collector_skips_footnotes() {
    let body = "Text\n\n[1]: https://x \"t\"\n[^1]: footnote text\n[docs]: https://docs.example\n";
    assert_eq!(
        collect_references(body),
        ["[1]: https://x \"t\"", "[docs]: https://docs.example"]
    );
}
