//! Syntax highlighting for code blocks.
//!
//! Produces coloured tokens rather than markup so each surface can decide
//! how to present them (class-free inline styles for both, today).

use std::sync::LazyLock;

use syntect::easy::HighlightLines;
use syntect::highlighting::{Color, ThemeSet};
use syntect::parsing::SyntaxSet;
use syntect::util::LinesWithEndings;

use crate::Theme;

static SYNTAX_SET: LazyLock<SyntaxSet> =
    LazyLock::new(SyntaxSet::load_defaults_newlines);
static THEME_SET: LazyLock<ThemeSet> = LazyLock::new(ThemeSet::load_defaults);

fn theme_name(theme: Theme) -> &'static str {
    match theme {
        Theme::Light => "InspiredGitHub",
        Theme::Dark => "base16-ocean.dark",
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub text: String,
    /// `#rrggbb`, or `None` for unclassified text.
    pub color: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Highlighted {
    pub background: Option<String>,
    /// Tokens per source line; each line keeps its trailing newline.
    pub lines: Vec<Vec<Token>>,
}

impl Highlighted {
    /// Unclassified output, one token per line.
    pub fn plain(code: &str) -> Self {
        Self {
            background: None,
            lines: LinesWithEndings::from(code)
                .map(|line| {
                    vec![Token {
                        text: line.to_string(),
                        color: None,
                    }]
                })
                .collect(),
        }
    }

    pub fn text(&self) -> String {
        self.lines
            .iter()
            .flatten()
            .map(|token| token.text.as_str())
            .collect()
    }
}

/// Highlights `code`, falling back to plain output for unknown languages.
pub fn highlight(code: &str, language: Option<&str>, theme: Theme) -> Highlighted {
    let syntax = language.and_then(|language| SYNTAX_SET.find_syntax_by_token(language));
    let (Some(syntax), Some(theme)) =
        (syntax, THEME_SET.themes.get(theme_name(theme)))
    else {
        return Highlighted::plain(code);
    };

    let mut highlighter = HighlightLines::new(syntax, theme);
    let mut lines = Vec::new();
    for line in LinesWithEndings::from(code) {
        let ranges = match highlighter.highlight_line(line, &SYNTAX_SET) {
            Ok(ranges) => ranges,
            Err(e) => {
                tracing::debug!(?language, "highlighting failed: {e}");
                return Highlighted::plain(code);
            }
        };
        lines.push(
            ranges
                .into_iter()
                .map(|(style, text)| Token {
                    text: text.to_string(),
                    color: Some(hex(style.foreground)),
                })
                .collect(),
        );
    }

    Highlighted {
        background: theme.settings.background.map(hex),
        lines,
    }
}

fn hex(color: Color) -> String {
    format!("#{:02x}{:02x}{:02x}", color.r, color.g, color.b)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_breaks_survive_highlighting() {
        let code = "fn main() {\n    println!(\"hi\");\n}\n";
        let highlighted = highlight(code, Some("rust"), Theme::Light);
        assert_eq!(highlighted.text(), code);
        assert_eq!(highlighted.lines.len(), 3);
        assert!(highlighted.lines[0].iter().any(|token| token.color.is_some()));
    }

    #[test]
    fn test_unknown_language_is_plain() {
        let highlighted = highlight("a\nb", Some("no-such-language"), Theme::Dark);
        assert_eq!(highlighted, Highlighted::plain("a\nb"));
        assert_eq!(highlighted.lines.len(), 2);
    }
}
