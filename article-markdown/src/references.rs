use std::sync::LazyLock;

use regex::Regex;

/// Link and image reference definitions, one per line. The first
/// character inside the brackets must not be `^`, which keeps footnote
/// definitions out.
static REFERENCE_DEFINITION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?mR)^\[[^^\r\n].*\]: .*$").expect("valid regex")
});

/// Returns every reference definition line of `body`, verbatim and in
/// document order.
pub fn collect_references(body: &str) -> Vec<&str> {
    REFERENCE_DEFINITION
        .find_iter(body)
        .map(|found| found.as_str())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_crlf_lines_are_matched_without_carriage_return() {
        assert_eq!(
            collect_references("[a]: https://a\r\n[b]: https://b\r\n"),
            ["[a]: https://a", "[b]: https://b"]
        );
    }
}
