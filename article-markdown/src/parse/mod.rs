//! Markdown parsing into an unsanitized element tree.
//!
//! `pulldown-cmark` handles the markdown itself but hands embedded HTML
//! over as opaque strings. Those strings are tokenized here and folded into
//! the same tree, so `<Paywall>` opened in one HTML block and closed in a
//! later one wraps the markdown in between.
//!
//! Nothing in this module decides what is safe. The tree it produces is
//! passed through [`crate::sanitize::Sanitizer`] before anything renders
//! it.

mod raw_html;

use std::collections::BTreeMap;

use pulldown_cmark::{
    Alignment, CodeBlockKind, Event, HeadingLevel, Options, Parser, Tag,
    TagEnd,
};

use raw_html::Token;
pub use raw_html::canonical_attribute_name;

/// An attribute value as written in the source.
///
/// Raw HTML attributes without a value (`<input checked>`) are
/// `Bool(true)`.
#[derive(Debug, Clone, PartialEq)]
pub enum AttrValue {
    Str(String),
    Bool(bool),
    Num(f64),
}

impl AttrValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            AttrValue::Str(s) => Some(s),
            _ => None,
        }
    }

    /// String form for attributes that accept either text or numbers.
    pub fn to_text(&self) -> Option<String> {
        match self {
            AttrValue::Str(s) => Some(s.clone()),
            AttrValue::Num(n) => Some(n.to_string()),
            AttrValue::Bool(_) => None,
        }
    }
}

impl From<&str> for AttrValue {
    fn from(value: &str) -> Self {
        AttrValue::Str(value.to_string())
    }
}

impl From<String> for AttrValue {
    fn from(value: String) -> Self {
        AttrValue::Str(value)
    }
}

impl From<bool> for AttrValue {
    fn from(value: bool) -> Self {
        AttrValue::Bool(value)
    }
}

pub type Attributes = BTreeMap<String, AttrValue>;

#[derive(Debug, Clone, PartialEq)]
pub enum ParseNode {
    Text(String),
    Element {
        name: String,
        attrs: Attributes,
        children: Vec<ParseNode>,
    },
}

impl ParseNode {
    pub fn element(
        name: impl Into<String>,
        attrs: Attributes,
        children: Vec<ParseNode>,
    ) -> Self {
        ParseNode::Element {
            name: name.into(),
            attrs,
            children,
        }
    }

    pub fn name(&self) -> Option<&str> {
        match self {
            ParseNode::Element { name, .. } => Some(name),
            ParseNode::Text(_) => None,
        }
    }

    pub fn text_content(&self) -> String {
        match self {
            ParseNode::Text(text) => text.clone(),
            ParseNode::Element { children, .. } => {
                children.iter().map(ParseNode::text_content).collect()
            }
        }
    }

    fn is_blank(&self) -> bool {
        matches!(self, ParseNode::Text(text) if text.trim().is_empty())
    }
}

/// Rewrites a block element once it is complete, e.g. turning an alert
/// blockquote into a callout.
pub type BlockRule = fn(ParseNode) -> ParseNode;

#[derive(Debug, Clone, Copy)]
pub struct ParseOptions {
    /// When false, embedded HTML is kept as literal text.
    pub parse_raw_html: bool,
    /// When false, a document made of a single paragraph is returned as
    /// that paragraph's inline content.
    pub force_block: bool,
    pub block_rule: Option<BlockRule>,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            parse_raw_html: true,
            force_block: true,
            block_rule: None,
        }
    }
}

/// Elements that should not end up wrapped in a `<p>` when they are the
/// only thing on a line.
const BLOCK_NAMES: [&str; 20] = [
    "ad",
    "blockquote",
    "callout",
    "div",
    "embed",
    "figure",
    "footer",
    "h1",
    "h2",
    "h3",
    "h4",
    "h5",
    "h6",
    "iframe",
    "ol",
    "paywall",
    "poll",
    "pre",
    "subscribenow",
    "table",
];

const INLINE_NAMES: [&str; 12] = [
    "a", "b", "code", "del", "em", "i", "small", "span", "strong", "sub",
    "sup", "u",
];

const VOID_NAMES: [&str; 8] =
    ["area", "br", "col", "embed", "hr", "img", "input", "source"];

fn markdown_options() -> Options {
    // Smart punctuation stays off: previews must keep the author's quotes.
    Options::ENABLE_TABLES
        | Options::ENABLE_STRIKETHROUGH
        | Options::ENABLE_FOOTNOTES
        | Options::ENABLE_TASKLISTS
}

/// Parses a markdown body into a forest of unsanitized nodes.
pub fn parse(source: &str, options: &ParseOptions) -> Vec<ParseNode> {
    let mut builder = TreeBuilder::new(options);
    for event in Parser::new_ext(source, markdown_options()) {
        builder.event(event);
    }
    builder.finish()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Origin {
    Markdown,
    Html,
    /// Opened on behalf of a markdown element (`<code>` inside `<pre>`,
    /// `<tbody>`); closed together with it.
    Implicit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FrameKind {
    Plain,
    Footnote,
    Image,
}

struct Frame {
    name: String,
    attrs: Attributes,
    children: Vec<ParseNode>,
    origin: Origin,
    kind: FrameKind,
}

struct TreeBuilder<'o> {
    options: &'o ParseOptions,
    stack: Vec<Frame>,
    root: Vec<ParseNode>,
    footnotes: Vec<ParseNode>,
    alignments: Vec<Alignment>,
    cell: usize,
    in_table_head: bool,
    /// Text of the HTML block being read. Its lines arrive as separate
    /// events and are tokenized together once the block ends.
    html_block: Option<String>,
}

impl<'o> TreeBuilder<'o> {
    fn new(options: &'o ParseOptions) -> Self {
        Self {
            options,
            stack: Vec::new(),
            root: Vec::new(),
            footnotes: Vec::new(),
            alignments: Vec::new(),
            cell: 0,
            in_table_head: false,
            html_block: None,
        }
    }

    fn event(&mut self, event: Event<'_>) {
        match event {
            Event::Start(tag) => self.start(tag),
            Event::End(TagEnd::HtmlBlock) => {
                if let Some(html) = self.html_block.take() {
                    self.raw_html(&html);
                }
            }
            Event::End(TagEnd::TableHead) => {
                self.close_markdown();
                self.in_table_head = false;
            }
            Event::End(_) => self.close_markdown(),
            Event::Text(text) => self.push_text(&text),
            Event::Code(code) => self.push(ParseNode::element(
                "code",
                Attributes::new(),
                vec![ParseNode::Text(code.into_string())],
            )),
            Event::Html(html) => match self.html_block.as_mut() {
                Some(buffer) => buffer.push_str(&html),
                None => self.raw_html(&html),
            },
            Event::InlineHtml(html) => self.raw_html(&html),
            Event::SoftBreak => self.push_text("\n"),
            Event::HardBreak => self.push_empty("br", Attributes::new()),
            Event::Rule => self.push_empty("hr", Attributes::new()),
            Event::TaskListMarker(checked) => {
                let mut attrs = Attributes::new();
                attrs.insert("type".into(), "checkbox".into());
                attrs.insert("checked".into(), checked.into());
                self.push_empty("input", attrs);
            }
            Event::FootnoteReference(label) => {
                let mut attrs = Attributes::new();
                attrs.insert("href".into(), format!("#{}", footnote_id(&label)).into());
                let sup = ParseNode::element(
                    "sup",
                    Attributes::new(),
                    vec![ParseNode::Text(label.into_string())],
                );
                self.push(ParseNode::element("a", attrs, vec![sup]));
            }
            // Math extensions are not enabled.
            _ => {}
        }
    }

    fn start(&mut self, tag: Tag<'_>) {
        match tag {
            Tag::HtmlBlock => self.html_block = Some(String::new()),
            Tag::Paragraph => self.open("p", Attributes::new()),
            Tag::Heading { level, id, .. } => {
                let mut attrs = Attributes::new();
                if let Some(id) = id {
                    attrs.insert("id".into(), id.into_string().into());
                }
                self.open(heading_name(level), attrs);
            }
            Tag::BlockQuote(_) => self.open("blockquote", Attributes::new()),
            Tag::CodeBlock(kind) => {
                self.open("pre", Attributes::new());
                let mut attrs = Attributes::new();
                if let CodeBlockKind::Fenced(info) = kind {
                    if let Some(language) = info.split_whitespace().next() {
                        attrs.insert(
                            "className".into(),
                            format!("lang-{language}").into(),
                        );
                    }
                }
                self.open_implicit("code", attrs);
            }
            Tag::List(Some(_)) => self.open("ol", Attributes::new()),
            Tag::List(None) => self.open("ul", Attributes::new()),
            Tag::Item => self.open("li", Attributes::new()),
            Tag::FootnoteDefinition(label) => {
                let mut attrs = Attributes::new();
                attrs.insert("id".into(), footnote_id(&label).into());
                self.stack.push(Frame {
                    name: "div".into(),
                    attrs,
                    children: Vec::new(),
                    origin: Origin::Markdown,
                    kind: FrameKind::Footnote,
                });
            }
            Tag::Table(alignments) => {
                self.alignments = alignments;
                self.open("table", Attributes::new());
            }
            Tag::TableHead => {
                self.in_table_head = true;
                self.cell = 0;
                self.open("thead", Attributes::new());
                self.open_implicit("tr", Attributes::new());
            }
            Tag::TableRow => {
                self.cell = 0;
                if self.stack.last().is_some_and(|frame| frame.name == "table")
                {
                    self.open_implicit("tbody", Attributes::new());
                }
                self.open("tr", Attributes::new());
            }
            Tag::TableCell => {
                let mut attrs = Attributes::new();
                if let Some(align) = alignment_name(self.alignments.get(self.cell))
                {
                    attrs.insert("align".into(), align.into());
                }
                self.cell += 1;
                let name = if self.in_table_head { "th" } else { "td" };
                self.open(name, attrs);
            }
            Tag::Emphasis => self.open("em", Attributes::new()),
            Tag::Strong => self.open("strong", Attributes::new()),
            Tag::Strikethrough => self.open("del", Attributes::new()),
            Tag::Link { dest_url, .. } => {
                let mut attrs = Attributes::new();
                attrs.insert("href".into(), dest_url.into_string().into());
                self.open("a", attrs);
            }
            Tag::Image { dest_url, .. } => {
                let mut attrs = Attributes::new();
                attrs.insert("src".into(), dest_url.into_string().into());
                self.stack.push(Frame {
                    name: "img".into(),
                    attrs,
                    children: Vec::new(),
                    origin: Origin::Markdown,
                    kind: FrameKind::Image,
                });
            }
            _ => self.open("div", Attributes::new()),
        }
    }

    fn open(&mut self, name: &str, attrs: Attributes) {
        self.open_with(name, attrs, Origin::Markdown);
    }

    fn open_implicit(&mut self, name: &str, attrs: Attributes) {
        self.open_with(name, attrs, Origin::Implicit);
    }

    fn open_with(&mut self, name: &str, attrs: Attributes, origin: Origin) {
        self.stack.push(Frame {
            name: name.to_string(),
            attrs,
            children: Vec::new(),
            origin,
            kind: FrameKind::Plain,
        });
    }

    /// Closes the innermost markdown element, auto-closing any HTML or
    /// implicit elements left open inside it.
    fn close_markdown(&mut self) {
        if !self.stack.iter().any(|frame| frame.origin == Origin::Markdown) {
            return;
        }
        if self.lift_open_blocks() {
            return;
        }
        while let Some(frame) = self.stack.pop() {
            let origin = frame.origin;
            self.close(frame);
            if origin == Origin::Markdown {
                break;
            }
        }
    }

    /// A paragraph that only opened a block element (`<Paywall` with its
    /// attributes on later lines) is dropped and the element stays open,
    /// so it can wrap the blocks that follow.
    fn lift_open_blocks(&mut self) -> bool {
        let Some(index) = self
            .stack
            .iter()
            .rposition(|frame| frame.origin == Origin::Markdown)
        else {
            return false;
        };
        let paragraph = &self.stack[index];
        let lifts = paragraph.name == "p"
            && paragraph.children.iter().all(ParseNode::is_blank)
            && self.stack.get(index + 1).is_some_and(|frame| {
                frame.origin == Origin::Html
                    && BLOCK_NAMES.contains(&frame.name.as_str())
            })
            && self.stack[index + 1..]
                .iter()
                .all(|frame| frame.origin == Origin::Html);
        if lifts {
            let open = self.stack.split_off(index + 1);
            self.stack.pop();
            self.stack.extend(open);
        }
        lifts
    }

    /// Closes the innermost open HTML element with this name. A closing
    /// tag never reaches past an enclosing markdown element; stray ones
    /// are ignored.
    fn close_html(&mut self, name: &str) {
        let mut found = None;
        for (index, frame) in self.stack.iter().enumerate().rev() {
            match frame.origin {
                Origin::Markdown => break,
                Origin::Html if frame.name == name => {
                    found = Some(index);
                    break;
                }
                _ => {}
            }
        }
        let Some(index) = found else {
            tracing::trace!(tag = name, "ignoring unmatched closing tag");
            return;
        };
        while self.stack.len() > index {
            if let Some(frame) = self.stack.pop() {
                self.close(frame);
            }
        }
    }

    fn close(&mut self, frame: Frame) {
        let Frame {
            name,
            mut attrs,
            children,
            origin,
            kind,
        } = frame;
        let node = if kind == FrameKind::Image {
            let alt: String =
                children.iter().map(ParseNode::text_content).collect();
            if !alt.is_empty() {
                attrs.insert("alt".into(), alt.into());
            }
            ParseNode::element(name, attrs, Vec::new())
        } else {
            ParseNode::element(name, attrs, children)
        };
        let node = if origin == Origin::Markdown {
            self.finish_block(node)
        } else {
            node
        };
        if kind == FrameKind::Footnote {
            self.footnotes.push(node);
        } else {
            self.push(node);
        }
    }

    fn finish_block(&self, node: ParseNode) -> ParseNode {
        let node = unwrap_lone_block(node);
        match self.options.block_rule {
            Some(rule) => rule(node),
            None => node,
        }
    }

    fn raw_html(&mut self, html: &str) {
        if !self.options.parse_raw_html {
            self.push_text(html);
            return;
        }
        for token in raw_html::tokenize(html) {
            match token {
                Token::Text(text) => {
                    if text.contains('\n')
                        && text.trim().is_empty()
                        && !self.in_inline_element()
                    {
                        continue;
                    }
                    self.push_text(&text);
                }
                Token::Start {
                    name,
                    attrs,
                    self_closing,
                } => {
                    if self_closing || VOID_NAMES.contains(&name.as_str()) {
                        self.push_empty(&name, attrs);
                    } else {
                        self.open_with(&name, attrs, Origin::Html);
                    }
                }
                Token::End { name } => self.close_html(&name),
            }
        }
    }

    fn in_inline_element(&self) -> bool {
        self.stack
            .last()
            .is_some_and(|frame| {
                frame.name == "p" || INLINE_NAMES.contains(&frame.name.as_str())
            })
    }

    fn push_empty(&mut self, name: &str, attrs: Attributes) {
        self.push(ParseNode::element(name, attrs, Vec::new()));
    }

    fn push_text(&mut self, text: &str) {
        self.push(ParseNode::Text(text.to_string()));
    }

    /// Appends to the innermost open element, merging adjacent text.
    fn push(&mut self, node: ParseNode) {
        let siblings = match self.stack.last_mut() {
            Some(frame) => &mut frame.children,
            None => &mut self.root,
        };
        if let ParseNode::Text(text) = &node {
            if let Some(ParseNode::Text(previous)) = siblings.last_mut() {
                previous.push_str(text);
                return;
            }
        }
        siblings.push(node);
    }

    fn finish(mut self) -> Vec<ParseNode> {
        if let Some(html) = self.html_block.take() {
            self.raw_html(&html);
        }
        while let Some(frame) = self.stack.pop() {
            self.close(frame);
        }
        if !self.footnotes.is_empty() {
            let footnotes = std::mem::take(&mut self.footnotes);
            self.root
                .push(ParseNode::element("footer", Attributes::new(), footnotes));
        }
        if !self.options.force_block && self.root.len() == 1 {
            if let Some(ParseNode::Element { name, children, .. }) =
                self.root.first()
            {
                if name == "p" {
                    return children.clone();
                }
            }
        }
        self.root
    }
}

/// A paragraph holding nothing but one block element (typically a custom
/// tag written inline) is replaced by that element.
fn unwrap_lone_block(node: ParseNode) -> ParseNode {
    let (name, attrs, mut children) = match node {
        ParseNode::Element {
            name,
            attrs,
            children,
        } => (name, attrs, children),
        text => return text,
    };
    if name == "p" {
        let mut meaningful = children.iter().filter(|child| !child.is_blank());
        let lone = match (meaningful.next(), meaningful.next()) {
            (Some(child), None) => child
                .name()
                .is_some_and(|child_name| BLOCK_NAMES.contains(&child_name)),
            _ => false,
        };
        if lone {
            if let Some(index) =
                children.iter().position(|child| !child.is_blank())
            {
                return children.swap_remove(index);
            }
        }
    }
    ParseNode::Element {
        name,
        attrs,
        children,
    }
}

fn footnote_id(label: &str) -> String {
    format!("fn-{label}")
}

fn heading_name(level: HeadingLevel) -> &'static str {
    match level {
        HeadingLevel::H1 => "h1",
        HeadingLevel::H2 => "h2",
        HeadingLevel::H3 => "h3",
        HeadingLevel::H4 => "h4",
        HeadingLevel::H5 => "h5",
        HeadingLevel::H6 => "h6",
    }
}

fn alignment_name(alignment: Option<&Alignment>) -> Option<&'static str> {
    match alignment? {
        Alignment::None => None,
        Alignment::Left => Some("left"),
        Alignment::Center => Some("center"),
        Alignment::Right => Some("right"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(nodes: &[ParseNode]) -> Vec<&str> {
        nodes.iter().filter_map(ParseNode::name).collect()
    }

    #[test]
    fn test_custom_tag_spans_markdown_blocks() {
        let nodes = parse(
            "Intro\n\n<Paywall>\n\nSecret **stuff**\n\n</Paywall>\n\nOutro",
            &ParseOptions::default(),
        );
        assert_eq!(names(&nodes), ["p", "paywall", "p"]);
        let ParseNode::Element { children, .. } = &nodes[1] else {
            panic!("expected paywall element");
        };
        assert_eq!(names(children), ["p"]);
        assert_eq!(nodes[1].text_content(), "Secret stuff");
    }

    #[test]
    fn test_inline_custom_tag_is_lifted_out_of_paragraph() {
        let nodes = parse("<Paywall></Paywall>", &ParseOptions::default());
        assert_eq!(names(&nodes), ["paywall"]);
    }

    #[test]
    fn test_fenced_code_language_class() {
        let nodes = parse("```rust\nfn main() {}\n```", &ParseOptions::default());
        let ParseNode::Element { name, children, .. } = &nodes[0] else {
            panic!("expected pre");
        };
        assert_eq!(name, "pre");
        let ParseNode::Element { name, attrs, .. } = &children[0] else {
            panic!("expected code");
        };
        assert_eq!(name, "code");
        assert_eq!(attrs.get("className"), Some(&"lang-rust".into()));
        assert_eq!(nodes[0].text_content(), "fn main() {}\n");
    }

    #[test]
    fn test_raw_html_disabled_keeps_literal_text() {
        let options = ParseOptions {
            parse_raw_html: false,
            ..ParseOptions::default()
        };
        let nodes = parse("a <b>bold</b> move", &options);
        assert_eq!(nodes[0].text_content(), "a <b>bold</b> move");
    }

    #[test]
    fn test_inline_mode_without_force_block() {
        let options = ParseOptions {
            force_block: false,
            ..ParseOptions::default()
        };
        let nodes = parse("just *text*", &options);
        assert_eq!(nodes.len(), 2);
        assert_eq!(nodes[0], ParseNode::Text("just ".into()));
        assert_eq!(nodes[1].text_content(), "text");
    }

    #[test]
    fn test_footnotes_collected_into_footer() {
        let nodes = parse(
            "Claim[^1].\n\n[^1]: Source.",
            &ParseOptions::default(),
        );
        assert_eq!(names(&nodes), ["p", "footer"]);
    }

    #[test]
    fn test_multiline_comment_is_hidden() {
        let nodes = parse(
            "Public\n\n<!--\nsecret draft\n-->\n\nEnd",
            &ParseOptions::default(),
        );
        assert_eq!(names(&nodes), ["p", "p"]);
        let text: String = nodes.iter().map(ParseNode::text_content).collect();
        assert!(!text.contains("secret"), "{text}");
    }

    #[test]
    fn test_tag_attributes_on_following_lines() {
        let nodes = parse(
            "<div\n  class=\"note\"\n  id=\"n1\">\nkept\n</div>",
            &ParseOptions::default(),
        );
        let ParseNode::Element { name, attrs, .. } = &nodes[0] else {
            panic!("expected div, got {nodes:?}");
        };
        assert_eq!(name, "div");
        assert_eq!(attrs.get("className"), Some(&"note".into()));
        assert_eq!(attrs.get("id"), Some(&"n1".into()));
        assert_eq!(nodes[0].text_content().trim(), "kept");
    }

    #[test]
    fn test_multiline_iframe_tag() {
        let nodes = parse(
            "<iframe\n src=\"https://www.youtube.com/embed/abc\"></iframe>",
            &ParseOptions::default(),
        );
        let iframe = nodes
            .iter()
            .find(|node| node.name() == Some("iframe"))
            .expect("iframe element");
        let ParseNode::Element { attrs, .. } = iframe else {
            unreachable!();
        };
        assert_eq!(
            attrs.get("src"),
            Some(&"https://www.youtube.com/embed/abc".into())
        );
        assert!(!nodes.iter().any(|node| node.text_content().contains("iframe")));
    }

    #[test]
    fn test_custom_tag_with_attributes_on_later_lines_wraps_blocks() {
        let nodes = parse(
            "<Paywall\n  class=\"locked\">\n\nSecret\n\n</Paywall>\n\nOutro",
            &ParseOptions::default(),
        );
        assert_eq!(names(&nodes), ["paywall", "p"]);
        assert_eq!(nodes[0].text_content(), "Secret");
        assert_eq!(nodes[1].text_content(), "Outro");
    }

    #[test]
    fn test_table_sections() {
        let nodes = parse(
            "| a | b |\n|:--|--:|\n| 1 | 2 |",
            &ParseOptions::default(),
        );
        let ParseNode::Element { children, .. } = &nodes[0] else {
            panic!("expected table");
        };
        assert_eq!(names(children), ["thead", "tbody"]);
    }
}
