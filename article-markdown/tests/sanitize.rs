use article_markdown::email;
use article_markdown::interactive::POLICY;
use article_markdown::parse::{AttrValue, Attributes, ParseNode};
use article_markdown::sanitize::{
    ComponentProps, HtmlTag, SanitizedNode, Sanitizer,
};
use article_markdown::surface::sanitize_body;
use test_helpers::context;

fn attrs(pairs: &[(&str, &str)]) -> Attributes {
    pairs
        .iter()
        .map(|(name, value)| (name.to_string(), AttrValue::from(*value)))
        .collect()
}

fn text(value: &str) -> SanitizedNode {
    SanitizedNode::Text(value.to_string())
}

#[test]
fn test_unknown_tags_are_dropped_with_children() {
    let ctx = context("");
    let mut sanitizer = Sanitizer::new(&POLICY, &ctx);
    for name in ["script", "style", "object", "marquee", "form", "svg"] {
        let node = sanitizer.create_element(
            name,
            &attrs(&[("src", "https://example.com"), ("className", "x")]),
            vec![text("payload")],
        );
        assert_eq!(node, SanitizedNode::Empty, "{name}");
    }

    let nested = ParseNode::element(
        "section",
        Attributes::new(),
        vec![ParseNode::element(
            "p",
            Attributes::new(),
            vec![ParseNode::Text("hidden".into())],
        )],
    );
    assert_eq!(sanitizer.sanitize(nested), SanitizedNode::Empty);
}

#[test]
fn test_anchor_scheme_filter() {
    let ctx = context("");
    let mut sanitizer = Sanitizer::new(&POLICY, &ctx);

    let dropped = sanitizer.create_element(
        "a",
        &attrs(&[("href", "javascript:alert(1)")]),
        vec![text("x")],
    );
    assert_eq!(dropped, SanitizedNode::Empty);

    let relative = sanitizer.create_element(
        "a",
        &attrs(&[("href", "/relative")]),
        vec![text("x")],
    );
    assert_eq!(relative, SanitizedNode::Empty);

    let kept = sanitizer.create_element(
        "a",
        &attrs(&[("href", "https://polar.sh"), ("target", "_blank")]),
        vec![text("x")],
    );
    assert_eq!(
        kept,
        SanitizedNode::Element {
            tag: HtmlTag::A,
            attrs: attrs(&[("href", "https://polar.sh")]),
            children: Some(Box::new(text("x"))),
        }
    );

    for href in ["http://polar.sh", "mailto://team@polar.sh", "#section"] {
        let node = sanitizer.create_element(
            "a",
            &attrs(&[("href", href)]),
            vec![text("x")],
        );
        assert!(matches!(node, SanitizedNode::Element { .. }), "{href}");
    }
}

#[test]
fn test_attributes_are_filtered() {
    let html = email::render_html(&context(
        r#"<div class="note" data-x="1" onclick="evil()" style="color: red">text</div>"#,
    ));
    assert_eq!(html, r#"<div class="note" style="color: red">text</div>"#);
}

#[test]
fn test_unsafe_style_is_stripped() {
    let html = email::render_html(&context(
        r#"a <span style="background:url(https://x)">b</span>"#,
    ));
    assert_eq!(html, "<p>a <span>b</span></p>");
}

#[test]
fn test_checkbox_inputs_only() {
    let ctx = context("");
    let mut sanitizer = Sanitizer::new(&POLICY, &ctx);

    let text_input = sanitizer.create_element(
        "input",
        &attrs(&[("type", "text"), ("value", "x")]),
        Vec::new(),
    );
    assert_eq!(text_input, SanitizedNode::Empty);

    let checkbox = sanitizer.create_element(
        "input",
        &attrs(&[("type", "checkbox")]),
        vec![text("ignored")],
    );
    let SanitizedNode::Element { attrs, children, .. } = checkbox else {
        panic!("expected checkbox element");
    };
    assert_eq!(attrs.get("disabled"), Some(&AttrValue::Bool(true)));
    assert_eq!(children, None);
}

#[test]
fn test_image_component_requires_http_source() {
    let ctx = context("");
    let mut sanitizer = Sanitizer::new(&POLICY, &ctx);

    let blocked = sanitizer.create_element(
        "IMG",
        &attrs(&[("src", "javascript:alert(1)")]),
        Vec::new(),
    );
    assert_eq!(blocked, SanitizedNode::Empty);

    let image = sanitizer.create_element(
        "img",
        &attrs(&[("src", "https://cdn.example/a.png"), ("alt", "A")]),
        vec![text("ignored")],
    );
    let SanitizedNode::Component {
        props: ComponentProps::Image(props),
        children,
    } = image
    else {
        panic!("expected image component");
    };
    assert_eq!(props.src, "https://cdn.example/a.png");
    assert_eq!(props.alt.as_deref(), Some("A"));
    assert_eq!(children, None);
}

#[test]
fn test_paywall_props_come_from_context() {
    let ctx = context("").with_paywall(true, true);
    let mut sanitizer = Sanitizer::new(&POLICY, &ctx);
    let node = sanitizer.create_element(
        "Paywall",
        &attrs(&[("showpaywalledcontent", "false"), ("issubscriber", "false")]),
        Vec::new(),
    );
    let SanitizedNode::Component {
        props: ComponentProps::Paywall(props),
        ..
    } = node
    else {
        panic!("expected paywall component");
    };
    assert!(props.show_paywalled_content);
    assert!(props.is_subscriber);
    assert_eq!(props.organization.slug, test_helpers::ORGANIZATION_SLUG);
}

#[test]
fn test_scripts_never_render() {
    let html = email::render_html(&context("<script>alert(1)</script>\n\nok"));
    assert_eq!(html, "<p>ok</p>");
}

#[test]
fn test_relative_links_are_removed_with_their_text() {
    let html =
        email::render_html(&context("[x](/relative) and [y](https://polar.sh)"));
    assert_eq!(html, r#"<p> and <a href="https://polar.sh">y</a></p>"#);
}

fn collect_keys(node: &SanitizedNode, keys: &mut Vec<u64>) {
    match node {
        SanitizedNode::Fragment(children) => {
            for child in children {
                keys.push(child.key);
                collect_keys(&child.node, keys);
            }
        }
        SanitizedNode::Element { children, .. }
        | SanitizedNode::Component { children, .. } => {
            if let Some(child) = children {
                collect_keys(child, keys);
            }
        }
        SanitizedNode::Empty | SanitizedNode::Text(_) => {}
    }
}

#[test]
fn test_fragment_keys_are_unique_within_a_render() {
    let body = "One *a* and *b*.\n\nTwo **c** and **d**.\n\n- x\n- y\n- z";
    let ctx = context(body);
    let sanitized = sanitize_body(body, &POLICY, &ctx);

    let mut keys = Vec::new();
    collect_keys(&sanitized, &mut keys);
    let mut unique = keys.clone();
    unique.sort_unstable();
    unique.dedup();
    assert!(keys.len() > 3);
    assert_eq!(unique.len(), keys.len());

    // Every render starts its own counter.
    let again = sanitize_body(body, &POLICY, &ctx);
    assert_eq!(again, sanitized);
}

#[test]
fn test_single_child_is_not_wrapped() {
    let body = "just text";
    let ctx = context(body);
    let sanitized = sanitize_body(body, &POLICY, &ctx);
    assert_eq!(
        sanitized,
        SanitizedNode::Element {
            tag: HtmlTag::P,
            attrs: Attributes::new(),
            children: Some(Box::new(text("just text"))),
        }
    );
}
