//! Allow-list sanitization of parsed article trees.
//!
//! Every element the parser produces passes through
//! [`Sanitizer::create_element`], children first. Anything that is not an
//! allow-listed HTML tag or a custom tag recognised by the active
//! [`SurfacePolicy`] is dropped together with its subtree, and the
//! attributes of kept elements are filtered down to a short per-tag list.
//! The sanitizer never fails: malformed input becomes
//! [`SanitizedNode::Empty`].

use payloads::Organization;

use crate::RenderContext;
use crate::parse::{AttrValue, Attributes, ParseNode};
use crate::policy::SurfacePolicy;
use crate::widgets::callout::CalloutKind;

/// Generic HTML tags that may be rendered verbatim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HtmlTag {
    A,
    B,
    Blockquote,
    Br,
    Code,
    Del,
    Div,
    Em,
    Figcaption,
    Figure,
    Footer,
    H1,
    H2,
    H3,
    H4,
    H5,
    H6,
    Hr,
    Img,
    Input,
    Li,
    Ol,
    P,
    Picture,
    Pre,
    Source,
    Span,
    Strong,
    Sub,
    Sup,
    Table,
    Tbody,
    Td,
    Th,
    Thead,
    Tr,
    Ul,
}

impl HtmlTag {
    pub const ALL: &'static [HtmlTag] = &[
        HtmlTag::A,
        HtmlTag::B,
        HtmlTag::Blockquote,
        HtmlTag::Br,
        HtmlTag::Code,
        HtmlTag::Del,
        HtmlTag::Div,
        HtmlTag::Em,
        HtmlTag::Figcaption,
        HtmlTag::Figure,
        HtmlTag::Footer,
        HtmlTag::H1,
        HtmlTag::H2,
        HtmlTag::H3,
        HtmlTag::H4,
        HtmlTag::H5,
        HtmlTag::H6,
        HtmlTag::Hr,
        HtmlTag::Img,
        HtmlTag::Input,
        HtmlTag::Li,
        HtmlTag::Ol,
        HtmlTag::P,
        HtmlTag::Picture,
        HtmlTag::Pre,
        HtmlTag::Source,
        HtmlTag::Span,
        HtmlTag::Strong,
        HtmlTag::Sub,
        HtmlTag::Sup,
        HtmlTag::Table,
        HtmlTag::Tbody,
        HtmlTag::Td,
        HtmlTag::Th,
        HtmlTag::Thead,
        HtmlTag::Tr,
        HtmlTag::Ul,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            HtmlTag::A => "a",
            HtmlTag::B => "b",
            HtmlTag::Blockquote => "blockquote",
            HtmlTag::Br => "br",
            HtmlTag::Code => "code",
            HtmlTag::Del => "del",
            HtmlTag::Div => "div",
            HtmlTag::Em => "em",
            HtmlTag::Figcaption => "figcaption",
            HtmlTag::Figure => "figure",
            HtmlTag::Footer => "footer",
            HtmlTag::H1 => "h1",
            HtmlTag::H2 => "h2",
            HtmlTag::H3 => "h3",
            HtmlTag::H4 => "h4",
            HtmlTag::H5 => "h5",
            HtmlTag::H6 => "h6",
            HtmlTag::Hr => "hr",
            HtmlTag::Img => "img",
            HtmlTag::Input => "input",
            HtmlTag::Li => "li",
            HtmlTag::Ol => "ol",
            HtmlTag::P => "p",
            HtmlTag::Picture => "picture",
            HtmlTag::Pre => "pre",
            HtmlTag::Source => "source",
            HtmlTag::Span => "span",
            HtmlTag::Strong => "strong",
            HtmlTag::Sub => "sub",
            HtmlTag::Sup => "sup",
            HtmlTag::Table => "table",
            HtmlTag::Tbody => "tbody",
            HtmlTag::Td => "td",
            HtmlTag::Th => "th",
            HtmlTag::Thead => "thead",
            HtmlTag::Tr => "tr",
            HtmlTag::Ul => "ul",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        HtmlTag::ALL
            .iter()
            .copied()
            .find(|tag| tag.as_str().eq_ignore_ascii_case(name))
    }

    /// Tags that never carry children.
    pub fn is_void(self) -> bool {
        matches!(
            self,
            HtmlTag::Br
                | HtmlTag::Hr
                | HtmlTag::Img
                | HtmlTag::Input
                | HtmlTag::Source
        )
    }
}

/// Custom tags that are rebuilt into widgets rather than rendered as-is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CustomTag {
    Embed,
    Iframe,
    Img,
    Pre,
    Poll,
    Paywall,
    SubscribeNow,
    Ad,
    Callout,
}

impl CustomTag {
    pub const ALL: &'static [CustomTag] = &[
        CustomTag::Embed,
        CustomTag::Iframe,
        CustomTag::Img,
        CustomTag::Pre,
        CustomTag::Poll,
        CustomTag::Paywall,
        CustomTag::SubscribeNow,
        CustomTag::Ad,
        CustomTag::Callout,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            CustomTag::Embed => "embed",
            CustomTag::Iframe => "iframe",
            CustomTag::Img => "img",
            CustomTag::Pre => "pre",
            CustomTag::Poll => "poll",
            CustomTag::Paywall => "paywall",
            CustomTag::SubscribeNow => "subscribenow",
            CustomTag::Ad => "ad",
            CustomTag::Callout => "callout",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        CustomTag::ALL
            .iter()
            .copied()
            .find(|tag| tag.as_str().eq_ignore_ascii_case(name))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct EmbedProps {
    pub src: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct IframeProps {
    pub src: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ImageProps {
    pub src: String,
    pub alt: Option<String>,
    pub width: Option<String>,
    pub height: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CodeProps {
    pub language: Option<String>,
    pub code: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PollProps {
    pub options: Vec<String>,
}

/// Paywall and subscribe button props. Always taken from the render
/// context, never from the tag's attributes.
#[derive(Debug, Clone, PartialEq)]
pub struct PaywallProps {
    pub organization: Organization,
    pub show_paywalled_content: bool,
    pub is_subscriber: bool,
    pub paid_articles_benefit_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AdProps {
    /// Kept untyped so the widget can reject non-string ids visibly.
    pub benefit_id: Option<AttrValue>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CalloutProps {
    pub kind: CalloutKind,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ComponentProps {
    Embed(EmbedProps),
    Iframe(IframeProps),
    Image(ImageProps),
    Code(CodeProps),
    Poll(PollProps),
    Paywall(PaywallProps),
    SubscribeNow(PaywallProps),
    Ad(AdProps),
    Callout(CalloutProps),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Keyed<T> {
    pub key: u64,
    pub node: T,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SanitizedNode {
    Empty,
    Text(String),
    Element {
        tag: HtmlTag,
        attrs: Attributes,
        children: Option<Box<SanitizedNode>>,
    },
    Component {
        props: ComponentProps,
        children: Option<Box<SanitizedNode>>,
    },
    Fragment(Vec<Keyed<SanitizedNode>>),
}

impl SanitizedNode {
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        self.write_text(&mut out);
        out
    }

    fn write_text(&self, out: &mut String) {
        match self {
            SanitizedNode::Text(text) => out.push_str(text),
            SanitizedNode::Element { children, .. }
            | SanitizedNode::Component { children, .. } => {
                if let Some(child) = children {
                    child.write_text(out);
                }
            }
            SanitizedNode::Fragment(children) => {
                for child in children {
                    child.node.write_text(out);
                }
            }
            SanitizedNode::Empty => {}
        }
    }

    /// Direct children, looking through fragments.
    pub fn children(&self) -> Vec<&SanitizedNode> {
        match self {
            SanitizedNode::Element { children, .. }
            | SanitizedNode::Component { children, .. } => {
                children.as_deref().map(flatten).unwrap_or_default()
            }
            SanitizedNode::Fragment(_) => flatten(self),
            _ => Vec::new(),
        }
    }

    /// Pre-order walk over every node in the subtree.
    pub fn descendants(&self) -> Vec<&SanitizedNode> {
        let mut out = vec![self];
        for child in self.children() {
            out.extend(child.descendants());
        }
        out
    }
}

fn flatten(node: &SanitizedNode) -> Vec<&SanitizedNode> {
    match node {
        SanitizedNode::Fragment(children) => children
            .iter()
            .flat_map(|child| flatten(&child.node))
            .collect(),
        other => vec![other],
    }
}

const BASE_ATTRIBUTES: [&str; 5] = ["key", "style", "align", "className", "id"];

const ANCHOR_SCHEMES: [&str; 4] = ["https://", "http://", "mailto://", "#"];

/// A single render's sanitizer.
///
/// Owns the fragment key counter, so two renders never share keys or
/// observe each other's state.
pub struct Sanitizer<'a> {
    policy: &'a SurfacePolicy,
    ctx: &'a RenderContext,
    next_key: u64,
}

impl<'a> Sanitizer<'a> {
    pub fn new(policy: &'a SurfacePolicy, ctx: &'a RenderContext) -> Self {
        Self {
            policy,
            ctx,
            next_key: 0,
        }
    }

    /// Sanitizes a parsed document into a single root node.
    pub fn sanitize_document(&mut self, nodes: Vec<ParseNode>) -> SanitizedNode {
        let children = nodes.into_iter().map(|node| self.sanitize(node)).collect();
        match self.normalize(children) {
            Some(node) => *node,
            None => SanitizedNode::Empty,
        }
    }

    pub fn sanitize(&mut self, node: ParseNode) -> SanitizedNode {
        match node {
            ParseNode::Text(text) if text.is_empty() => SanitizedNode::Empty,
            ParseNode::Text(text) => SanitizedNode::Text(text),
            ParseNode::Element {
                name,
                attrs,
                children,
            } => {
                if !self.is_known(&name) {
                    tracing::trace!(tag = %name, "dropping unknown element");
                    return SanitizedNode::Empty;
                }
                let children = children
                    .into_iter()
                    .map(|child| self.sanitize(child))
                    .collect();
                self.create_element(&name, &attrs, children)
            }
        }
    }

    fn is_known(&self, name: &str) -> bool {
        CustomTag::from_name(name)
            .is_some_and(|tag| self.policy.recognizes(tag))
            || HtmlTag::from_name(name).is_some()
    }

    /// Builds a safe node from an element whose children are already
    /// sanitized. Custom tags the policy recognises win over generic tags
    /// of the same name.
    pub fn create_element(
        &mut self,
        name: &str,
        attrs: &Attributes,
        children: Vec<SanitizedNode>,
    ) -> SanitizedNode {
        if let Some(tag) = CustomTag::from_name(name) {
            if self.policy.recognizes(tag) {
                return self.create_component(tag, attrs, children);
            }
        }
        match HtmlTag::from_name(name) {
            Some(tag) => self.create_html(tag, attrs, children),
            None => {
                tracing::trace!(tag = %name, "dropping unknown element");
                SanitizedNode::Empty
            }
        }
    }

    fn create_html(
        &mut self,
        tag: HtmlTag,
        attrs: &Attributes,
        children: Vec<SanitizedNode>,
    ) -> SanitizedNode {
        let mut kept = base_attributes(attrs);
        match tag {
            HtmlTag::A => {
                let href = attrs.get("href").and_then(AttrValue::as_str);
                match href {
                    Some(href) if is_allowed_anchor(href) => {
                        kept.insert("href".into(), href.into());
                    }
                    _ => {
                        tracing::trace!(?href, "dropping anchor");
                        return SanitizedNode::Empty;
                    }
                }
            }
            HtmlTag::Img => {
                let src = attrs.get("src").and_then(AttrValue::as_str);
                match src {
                    Some(src) if is_http_url(src) => {
                        kept.insert("src".into(), src.into());
                    }
                    _ => return SanitizedNode::Empty,
                }
                copy_attributes(attrs, &mut kept, &["height", "width", "alt"]);
            }
            HtmlTag::Input => {
                if attrs.get("type").and_then(AttrValue::as_str)
                    != Some("checkbox")
                {
                    return SanitizedNode::Empty;
                }
                kept.insert("type".into(), "checkbox".into());
                copy_attributes(attrs, &mut kept, &["checked"]);
                kept.insert("disabled".into(), true.into());
            }
            HtmlTag::Source => {
                copy_attributes(attrs, &mut kept, &["media", "srcSet"]);
            }
            _ => {}
        }

        let children = if tag.is_void() {
            None
        } else {
            self.normalize(children)
        };
        SanitizedNode::Element {
            tag,
            attrs: kept,
            children,
        }
    }

    fn create_component(
        &mut self,
        tag: CustomTag,
        attrs: &Attributes,
        children: Vec<SanitizedNode>,
    ) -> SanitizedNode {
        let (props, children) = match tag {
            CustomTag::Embed => {
                let src = string_attribute(attrs, "src");
                (ComponentProps::Embed(EmbedProps { src }), None)
            }
            CustomTag::Iframe => {
                let src = string_attribute(attrs, "src");
                (ComponentProps::Iframe(IframeProps { src }), None)
            }
            CustomTag::Img => {
                let Some(src) =
                    string_attribute(attrs, "src").filter(|src| is_http_url(src))
                else {
                    return SanitizedNode::Empty;
                };
                let props = ImageProps {
                    src,
                    alt: text_attribute(attrs, "alt"),
                    width: text_attribute(attrs, "width"),
                    height: text_attribute(attrs, "height"),
                };
                (ComponentProps::Image(props), None)
            }
            CustomTag::Pre => {
                let props = code_props(&children);
                (ComponentProps::Code(props), None)
            }
            CustomTag::Poll => {
                let props = PollProps {
                    options: poll_options(&children),
                };
                (ComponentProps::Poll(props), None)
            }
            CustomTag::Paywall => (
                ComponentProps::Paywall(self.paywall_props()),
                self.normalize(children),
            ),
            CustomTag::SubscribeNow => {
                (ComponentProps::SubscribeNow(self.paywall_props()), None)
            }
            CustomTag::Ad => {
                let props = AdProps {
                    benefit_id: attrs.get("subscriptionbenefitid").cloned(),
                };
                (ComponentProps::Ad(props), None)
            }
            CustomTag::Callout => {
                let kind = attrs
                    .get("type")
                    .and_then(AttrValue::as_str)
                    .and_then(CalloutKind::from_name);
                let Some(kind) = kind else {
                    tracing::trace!("dropping callout without a valid type");
                    return SanitizedNode::Empty;
                };
                (
                    ComponentProps::Callout(CalloutProps { kind }),
                    self.normalize(children),
                )
            }
        };
        SanitizedNode::Component { props, children }
    }

    fn paywall_props(&self) -> PaywallProps {
        PaywallProps {
            organization: self.ctx.article.organization.clone(),
            show_paywalled_content: self.ctx.show_paywalled_content,
            is_subscriber: self.ctx.is_subscriber,
            paid_articles_benefit_name: self
                .ctx
                .paid_articles_benefit_name
                .clone(),
        }
    }

    /// Drops empty children; one child is returned as-is, several are
    /// wrapped in a fragment with fresh keys.
    fn normalize(
        &mut self,
        children: Vec<SanitizedNode>,
    ) -> Option<Box<SanitizedNode>> {
        let mut children: Vec<SanitizedNode> = children
            .into_iter()
            .filter(|child| *child != SanitizedNode::Empty)
            .collect();
        match children.len() {
            0 => None,
            1 => children.pop().map(Box::new),
            _ => {
                let keyed = children
                    .into_iter()
                    .map(|node| {
                        let key = self.next_key;
                        self.next_key += 1;
                        Keyed { key, node }
                    })
                    .collect();
                Some(Box::new(SanitizedNode::Fragment(keyed)))
            }
        }
    }
}

fn base_attributes(attrs: &Attributes) -> Attributes {
    let mut kept = Attributes::new();
    for name in BASE_ATTRIBUTES {
        let Some(value) = attrs.get(name) else {
            continue;
        };
        if value.to_text().is_none() {
            continue;
        }
        if name == "style" && !is_safe_style(value) {
            tracing::trace!("dropping unsafe style attribute");
            continue;
        }
        kept.insert(name.to_string(), value.clone());
    }
    kept
}

fn copy_attributes(from: &Attributes, to: &mut Attributes, names: &[&str]) {
    for name in names {
        if let Some(value) = from.get(*name) {
            to.insert(name.to_string(), value.clone());
        }
    }
}

fn is_safe_style(value: &AttrValue) -> bool {
    let Some(style) = value.as_str() else {
        return false;
    };
    let style = style.to_ascii_lowercase();
    !style.contains("url(") && !style.contains("expression(")
}

fn is_allowed_anchor(href: &str) -> bool {
    ANCHOR_SCHEMES.iter().any(|scheme| href.starts_with(scheme))
}

fn is_http_url(src: &str) -> bool {
    src.starts_with("http://") || src.starts_with("https://")
}

fn string_attribute(attrs: &Attributes, name: &str) -> Option<String> {
    attrs.get(name).and_then(AttrValue::as_str).map(str::to_string)
}

fn text_attribute(attrs: &Attributes, name: &str) -> Option<String> {
    attrs.get(name).and_then(AttrValue::to_text)
}

/// Language comes from the `lang-`/`language-` class of the first `<code>`;
/// the code is the first non-empty text below the `<pre>`.
fn code_props(children: &[SanitizedNode]) -> CodeProps {
    let nodes: Vec<&SanitizedNode> = children
        .iter()
        .flat_map(SanitizedNode::descendants)
        .collect();

    let language = nodes.iter().find_map(|node| match node {
        SanitizedNode::Element {
            tag: HtmlTag::Code,
            attrs,
            ..
        } => attrs
            .get("className")
            .and_then(AttrValue::as_str)
            .and_then(language_from_class),
        _ => None,
    });
    let code = nodes
        .iter()
        .find_map(|node| match node {
            SanitizedNode::Text(text) if !text.is_empty() => Some(text.clone()),
            _ => None,
        })
        .unwrap_or_default();

    CodeProps { language, code }
}

fn language_from_class(class_name: &str) -> Option<String> {
    class_name.split_whitespace().find_map(|class| {
        class
            .strip_prefix("lang-")
            .or_else(|| class.strip_prefix("language-"))
            .filter(|language| !language.is_empty())
            .map(str::to_string)
    })
}

/// Options are the `<li>` items of the poll, or failing that its
/// non-empty text lines with any list bullet removed.
fn poll_options(children: &[SanitizedNode]) -> Vec<String> {
    let items: Vec<String> = children
        .iter()
        .flat_map(SanitizedNode::descendants)
        .filter(|node| {
            matches!(node, SanitizedNode::Element { tag: HtmlTag::Li, .. })
        })
        .map(|node| node.text_content().trim().to_string())
        .filter(|text| !text.is_empty())
        .collect();
    if !items.is_empty() {
        return items;
    }

    let text: String = children.iter().map(SanitizedNode::text_content).collect();
    text.lines()
        .map(|line| {
            let line = line.trim();
            ["- ", "* ", "+ "]
                .iter()
                .find_map(|bullet| line.strip_prefix(bullet))
                .unwrap_or(line)
                .trim()
                .to_string()
        })
        .filter(|line| !line.is_empty())
        .collect()
}
