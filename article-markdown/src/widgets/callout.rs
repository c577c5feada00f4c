//! GitHub-style alert blockquotes (`> [!NOTE]`).

use std::sync::LazyLock;

use regex::Regex;

use crate::node::{Element, Node};
use crate::parse::{Attributes, ParseNode};
use crate::sanitize::{CalloutProps, SanitizedNode};
use crate::surface::RenderScope;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CalloutKind {
    Note,
    Tip,
    Important,
    Warning,
    Caution,
}

impl CalloutKind {
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "note" => Some(CalloutKind::Note),
            "tip" => Some(CalloutKind::Tip),
            "important" => Some(CalloutKind::Important),
            "warning" => Some(CalloutKind::Warning),
            "caution" => Some(CalloutKind::Caution),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            CalloutKind::Note => "note",
            CalloutKind::Tip => "tip",
            CalloutKind::Important => "important",
            CalloutKind::Warning => "warning",
            CalloutKind::Caution => "caution",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            CalloutKind::Note => "Note",
            CalloutKind::Tip => "Tip",
            CalloutKind::Important => "Important",
            CalloutKind::Warning => "Warning",
            CalloutKind::Caution => "Caution",
        }
    }

    pub fn border_color(self) -> &'static str {
        match self {
            CalloutKind::Note => "#0969da",
            CalloutKind::Tip => "#1a7f37",
            CalloutKind::Important => "#8250df",
            CalloutKind::Warning => "#9a6700",
            CalloutKind::Caution => "#d1242f",
        }
    }

    /// Header color, a darker shade of the border.
    pub fn text_color(self) -> &'static str {
        match self {
            CalloutKind::Note => "#0550ae",
            CalloutKind::Tip => "#116329",
            CalloutKind::Important => "#6639ba",
            CalloutKind::Warning => "#7d4e00",
            CalloutKind::Caution => "#a40e26",
        }
    }

    /// Octicon name used on the web page.
    pub fn icon(self) -> &'static str {
        match self {
            CalloutKind::Note => "info",
            CalloutKind::Tip => "light-bulb",
            CalloutKind::Important => "report",
            CalloutKind::Warning => "alert",
            CalloutKind::Caution => "stop",
        }
    }

    /// Emoji used where icon fonts cannot be loaded.
    pub fn emoji(self) -> &'static str {
        match self {
            CalloutKind::Note => "ℹ️",
            CalloutKind::Tip => "💡",
            CalloutKind::Important => "❗",
            CalloutKind::Warning => "⚠️",
            CalloutKind::Caution => "🛑",
        }
    }
}

static ALERT_MARKER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^\s*\[!(note|tip|important|warning|caution)\][ \t]*(?:\r?\n)?")
        .expect("valid regex")
});

/// Turns a blockquote whose first line is an alert marker into a
/// `callout` element. The marker is removed; the rest of the quote is
/// kept as the callout's content.
pub(crate) fn rewrite_blockquote(node: ParseNode) -> ParseNode {
    let (name, attrs, mut children) = match node {
        ParseNode::Element {
            name,
            attrs,
            children,
        } => (name, attrs, children),
        text => return text,
    };
    if name != "blockquote" {
        return ParseNode::Element {
            name,
            attrs,
            children,
        };
    }

    let kind = strip_marker(&mut children);
    match kind {
        Some(kind) => {
            let mut attrs = Attributes::new();
            attrs.insert("type".into(), kind.as_str().into());
            ParseNode::element("callout", attrs, children)
        }
        None => ParseNode::Element {
            name,
            attrs,
            children,
        },
    }
}

fn strip_marker(children: &mut Vec<ParseNode>) -> Option<CalloutKind> {
    let index = children
        .iter()
        .position(|child| !matches!(child, ParseNode::Text(text) if text.trim().is_empty()))?;
    let ParseNode::Element {
        name,
        children: paragraph,
        ..
    } = &mut children[index]
    else {
        return None;
    };
    if name.as_str() != "p" {
        return None;
    }
    let Some(ParseNode::Text(first)) = paragraph.first_mut() else {
        return None;
    };

    let (kind, end) = {
        let captures = ALERT_MARKER.captures(first)?;
        let kind = CalloutKind::from_name(&captures[1])?;
        (kind, captures.get(0)?.end())
    };
    first.replace_range(..end, "");

    if first.is_empty() {
        paragraph.remove(0);
    }
    if paragraph.iter().all(|child| {
        matches!(child, ParseNode::Text(text) if text.trim().is_empty())
    }) {
        children.remove(index);
    }
    Some(kind)
}

pub(crate) fn interactive(
    scope: &mut RenderScope<'_>,
    props: &CalloutProps,
    children: Option<&SanitizedNode>,
) -> Node {
    let kind = props.kind;
    let title = Element::new("p")
        .attr("className", "callout-title")
        .attr("style", format!("color:{}", kind.text_color()))
        .child(
            Element::new("span")
                .attr("className", format!("octicon octicon-{}", kind.icon())),
        )
        .child(Element::new("strong").child(kind.label()));
    Element::new("div")
        .attr("className", format!("callout callout-{}", kind.as_str()))
        .attr(
            "style",
            format!("border-left:4px solid {}", kind.border_color()),
        )
        .child(title)
        .children(scope.resolve_children(children))
        .into()
}

pub(crate) fn email(
    scope: &mut RenderScope<'_>,
    props: &CalloutProps,
    children: Option<&SanitizedNode>,
) -> Node {
    let kind = props.kind;
    let title = Element::new("p")
        .attr(
            "style",
            format!("margin:0 0 8px;font-weight:600;color:{}", kind.text_color()),
        )
        .child(format!("{} {}", kind.emoji(), kind.label()));
    Element::new("div")
        .attr(
            "style",
            format!(
                "border-left:4px solid {};padding:8px 16px;margin:16px 0",
                kind.border_color()
            ),
        )
        .child(title)
        .children(scope.resolve_children(children))
        .into()
}

pub(crate) fn preview(
    scope: &mut RenderScope<'_>,
    _props: &CalloutProps,
    children: Option<&SanitizedNode>,
) -> Node {
    let mut content = scope.resolve_children(children);
    content.push(Node::Text("\n\n".to_string()));
    Node::Fragment(content)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quote(children: Vec<ParseNode>) -> ParseNode {
        ParseNode::element("blockquote", Attributes::new(), children)
    }

    fn paragraph(text: &str) -> ParseNode {
        ParseNode::element(
            "p",
            Attributes::new(),
            vec![ParseNode::Text(text.to_string())],
        )
    }

    #[test]
    fn test_marker_is_stripped_and_content_kept() {
        let rewritten = rewrite_blockquote(quote(vec![paragraph(
            "[!warning]\nMind the gap.",
        )]));
        assert_eq!(rewritten.name(), Some("callout"));
        assert_eq!(rewritten.text_content(), "Mind the gap.");
        let ParseNode::Element { attrs, .. } = &rewritten else {
            panic!("expected element");
        };
        assert_eq!(attrs.get("type"), Some(&"warning".into()));
    }

    #[test]
    fn test_marker_only_paragraph_is_removed() {
        let rewritten = rewrite_blockquote(quote(vec![
            paragraph("[!TIP]"),
            paragraph("Use a fork."),
        ]));
        let ParseNode::Element { children, .. } = &rewritten else {
            panic!("expected element");
        };
        assert_eq!(children.len(), 1);
        assert_eq!(rewritten.text_content(), "Use a fork.");
    }

    #[test]
    fn test_each_kind_has_its_own_colors() {
        let kinds = [
            CalloutKind::Note,
            CalloutKind::Tip,
            CalloutKind::Important,
            CalloutKind::Warning,
            CalloutKind::Caution,
        ];
        for kind in kinds {
            assert_ne!(kind.text_color(), kind.border_color(), "{kind:?}");
        }
        let mut text: Vec<_> = kinds.iter().map(|kind| kind.text_color()).collect();
        text.sort_unstable();
        text.dedup();
        assert_eq!(text.len(), kinds.len());
    }

    #[test]
    fn test_plain_blockquote_is_untouched() {
        let original = quote(vec![paragraph("[!SHOUT] Not an alert")]);
        assert_eq!(rewrite_blockquote(original.clone()), original);
    }
}
