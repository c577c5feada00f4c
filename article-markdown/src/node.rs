//! Rendered output tree.
//!
//! Surfaces resolve sanitized nodes into [`Node`]s. Interactive widgets
//! attach [`Handler`]s to elements; the host dispatches the bound
//! [`Action`] back into the document when the event fires.

use html_escape::{encode_double_quoted_attribute_to_string, encode_text_to_string};

use crate::parse::AttrValue;

#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Empty,
    Text(String),
    Element(Element),
    Fragment(Vec<Node>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    Click,
    /// The element scrolled into view.
    Visible,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    SelectPollOption { poll: usize, option: usize },
    CopyToClipboard(String),
    RenderDiagram(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Handler {
    pub event: EventKind,
    pub action: Action,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    pub tag: &'static str,
    pub key: Option<u64>,
    pub attrs: Vec<(String, AttrValue)>,
    pub children: Vec<Node>,
    pub handlers: Vec<Handler>,
}

const VOID_ELEMENTS: [&str; 5] = ["br", "hr", "img", "input", "source"];

impl Element {
    pub fn new(tag: &'static str) -> Self {
        Self {
            tag,
            key: None,
            attrs: Vec::new(),
            children: Vec::new(),
            handlers: Vec::new(),
        }
    }

    pub fn attr(
        mut self,
        name: impl Into<String>,
        value: impl Into<AttrValue>,
    ) -> Self {
        self.attrs.push((name.into(), value.into()));
        self
    }

    pub fn child(mut self, child: impl Into<Node>) -> Self {
        self.children.push(child.into());
        self
    }

    pub fn children(mut self, children: impl IntoIterator<Item = Node>) -> Self {
        self.children.extend(children);
        self
    }

    pub fn on(mut self, event: EventKind, action: Action) -> Self {
        self.handlers.push(Handler { event, action });
        self
    }

    pub fn get_attr(&self, name: &str) -> Option<&AttrValue> {
        self.attrs
            .iter()
            .find(|(attr, _)| attr == name)
            .map(|(_, value)| value)
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.get_attr("className")
            .and_then(AttrValue::as_str)
            .is_some_and(|classes| classes.split_whitespace().any(|c| c == class))
    }
}

impl Node {
    pub fn with_key(self, key: u64) -> Self {
        match self {
            Node::Element(mut element) => {
                element.key = Some(key);
                Node::Element(element)
            }
            other => other,
        }
    }

    pub fn text_content(&self) -> String {
        match self {
            Node::Empty => String::new(),
            Node::Text(text) => text.clone(),
            Node::Element(element) => {
                element.children.iter().map(Node::text_content).collect()
            }
            Node::Fragment(children) => {
                children.iter().map(Node::text_content).collect()
            }
        }
    }

    /// Every element in the tree, in document order.
    pub fn elements(&self) -> Vec<&Element> {
        let mut out = Vec::new();
        self.collect_elements(&mut out);
        out
    }

    fn collect_elements<'n>(&'n self, out: &mut Vec<&'n Element>) {
        match self {
            Node::Element(element) => {
                out.push(element);
                for child in &element.children {
                    child.collect_elements(out);
                }
            }
            Node::Fragment(children) => {
                for child in children {
                    child.collect_elements(out);
                }
            }
            Node::Empty | Node::Text(_) => {}
        }
    }

    pub fn find(&self, tag: &str) -> Option<&Element> {
        self.elements().into_iter().find(|element| element.tag == tag)
    }

    pub fn find_class(&self, class: &str) -> Option<&Element> {
        self.elements()
            .into_iter()
            .find(|element| element.has_class(class))
    }

    /// Serializes the tree to HTML. Handlers and keys are not part of
    /// the markup.
    pub fn to_html(&self) -> String {
        let mut out = String::new();
        self.write_html(&mut out);
        out
    }

    fn write_html(&self, out: &mut String) {
        match self {
            Node::Empty => {}
            Node::Text(text) => {
                encode_text_to_string(text, out);
            }
            Node::Element(element) => element.write_html(out),
            Node::Fragment(children) => {
                for child in children {
                    child.write_html(out);
                }
            }
        }
    }
}

impl Element {
    fn write_html(&self, out: &mut String) {
        out.push('<');
        out.push_str(self.tag);
        for (name, value) in &self.attrs {
            if name == "key" {
                continue;
            }
            let name = html_attribute_name(name);
            match value {
                AttrValue::Bool(false) => {}
                AttrValue::Bool(true) => {
                    out.push(' ');
                    out.push_str(name);
                }
                AttrValue::Str(value) => {
                    push_attribute(out, name, value);
                }
                AttrValue::Num(value) => {
                    push_attribute(out, name, &value.to_string());
                }
            }
        }
        out.push('>');
        if VOID_ELEMENTS.contains(&self.tag) {
            return;
        }
        for child in &self.children {
            child.write_html(out);
        }
        out.push_str("</");
        out.push_str(self.tag);
        out.push('>');
    }
}

fn push_attribute(out: &mut String, name: &str, value: &str) {
    out.push(' ');
    out.push_str(name);
    out.push_str("=\"");
    encode_double_quoted_attribute_to_string(value, out);
    out.push('"');
}

fn html_attribute_name(name: &str) -> &str {
    match name {
        "className" => "class",
        "srcSet" => "srcset",
        "htmlFor" => "for",
        other => other,
    }
}

impl From<Element> for Node {
    fn from(element: Element) -> Self {
        Node::Element(element)
    }
}

impl From<&str> for Node {
    fn from(text: &str) -> Self {
        Node::Text(text.to_string())
    }
}

impl From<String> for Node {
    fn from(text: String) -> Self {
        Node::Text(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_html_escapes_and_maps_attribute_names() {
        let node: Node = Element::new("p")
            .attr("className", "lead")
            .attr("key", "3")
            .child("a < b & \"c\"")
            .into();
        assert_eq!(
            node.to_html(),
            "<p class=\"lead\">a &lt; b &amp; \"c\"</p>"
        );
    }

    #[test]
    fn test_boolean_attributes_and_void_elements() {
        let node: Node = Element::new("input")
            .attr("type", "checkbox")
            .attr("checked", false)
            .attr("disabled", true)
            .into();
        assert_eq!(node.to_html(), "<input type=\"checkbox\" disabled>");
    }

    #[test]
    fn test_elements_in_document_order() {
        let node = Node::Fragment(vec![
            Element::new("div").child(Element::new("span")).into(),
            Element::new("p").into(),
        ]);
        let tags: Vec<&str> =
            node.elements().iter().map(|element| element.tag).collect();
        assert_eq!(tags, ["div", "span", "p"]);
    }
}
