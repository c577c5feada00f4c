use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;

use crate::Theme;
use crate::highlight::{Highlighted, highlight};
use crate::node::{Action, Element, EventKind, Node};
use crate::sanitize::{CodeProps, SanitizedNode};
use crate::surface::RenderScope;

const MERMAID: &str = "mermaid";

fn is_mermaid(props: &CodeProps) -> bool {
    props
        .language
        .as_deref()
        .is_some_and(|language| language.eq_ignore_ascii_case(MERMAID))
}

pub(crate) fn interactive(
    scope: &mut RenderScope<'_>,
    props: &CodeProps,
    _children: Option<&SanitizedNode>,
) -> Node {
    if is_mermaid(props) {
        // Rendered client side once the container scrolls into view.
        return Element::new("div")
            .attr("className", "mermaid-diagram")
            .on(EventKind::Visible, Action::RenderDiagram(props.code.clone()))
            .child(Element::new("pre").child(props.code.as_str()))
            .into();
    }
    let highlighted = highlight(&props.code, props.language.as_deref(), scope.ctx.theme);
    Element::new("div")
        .attr("className", "code-block")
        .child(
            Element::new("button")
                .attr("type", "button")
                .attr("className", "copy-code")
                .on(EventKind::Click, Action::CopyToClipboard(props.code.clone()))
                .child("Copy"),
        )
        .child(highlighted_pre(&highlighted, props.language.as_deref()))
        .into()
}

pub(crate) fn email(
    scope: &mut RenderScope<'_>,
    props: &CodeProps,
    _children: Option<&SanitizedNode>,
) -> Node {
    if is_mermaid(props) {
        let encoded = URL_SAFE_NO_PAD.encode(props.code.as_bytes());
        return Element::new("img")
            .attr("src", format!("{}{encoded}", scope.ctx.diagram_base_url))
            .attr("alt", "Diagram")
            .attr("style", "display:block;max-width:100%;height:auto")
            .into();
    }
    // Always the light palette in email.
    let highlighted = highlight(&props.code, props.language.as_deref(), Theme::Light);
    highlighted_pre(&highlighted, props.language.as_deref()).into()
}

fn highlighted_pre(highlighted: &Highlighted, language: Option<&str>) -> Element {
    let mut style = String::from(
        "margin:0;padding:16px;overflow-x:auto;border-radius:6px;\
         font-family:monospace;font-size:13px;line-height:1.5",
    );
    if let Some(background) = &highlighted.background {
        style.push_str(&format!(";background-color:{background}"));
    }

    let tokens = highlighted.lines.iter().flatten().map(|token| match &token.color {
        Some(color) => Element::new("span")
            .attr("style", format!("color:{color}"))
            .child(token.text.as_str())
            .into(),
        None => Node::Text(token.text.clone()),
    });
    let mut code = Element::new("code").children(tokens);
    if let Some(language) = language {
        code = code.attr("className", format!("lang-{language}"));
    }
    Element::new("pre").attr("style", style).child(code)
}
