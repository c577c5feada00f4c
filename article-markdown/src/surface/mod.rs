//! Surface renderers and the per-render scope they share.

pub mod email;
pub mod interactive;
pub mod preview;

use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use rand::SeedableRng;

use crate::RenderContext;
use crate::node::{Element, Node};
use crate::parse;
use crate::policy::{GenericOverride, SurfacePolicy};
use crate::sanitize::{SanitizedNode, Sanitizer};
use interactive::{LiveRequest, LiveState};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Surface {
    Interactive,
    Preview,
    Email,
}

impl Surface {
    pub fn from_string(s: &str) -> Option<Self> {
        match s {
            "interactive" | "web" => Some(Surface::Interactive),
            "preview" | "text" => Some(Surface::Preview),
            "email" => Some(Surface::Email),
            _ => None,
        }
    }
}

/// Parses and sanitizes a body under a policy. Each call gets its own
/// sanitizer and key counter.
#[tracing::instrument(skip_all, fields(surface = ?policy.surface))]
pub fn sanitize_body(
    body: &str,
    policy: &SurfacePolicy,
    ctx: &RenderContext,
) -> SanitizedNode {
    let nodes = parse::parse(body, &policy.parse);
    Sanitizer::new(policy, ctx).sanitize_document(nodes)
}

/// State threaded through widget resolvers during one render.
pub struct RenderScope<'r> {
    pub ctx: &'r RenderContext,
    policy: &'r SurfacePolicy,
    live: Option<&'r LiveState>,
    rng: StdRng,
    polls: usize,
    pending: Vec<LiveRequest>,
}

impl<'r> RenderScope<'r> {
    pub(crate) fn new(
        ctx: &'r RenderContext,
        policy: &'r SurfacePolicy,
        live: Option<&'r LiveState>,
    ) -> Self {
        let rng = match ctx.ad_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Self {
            ctx,
            policy,
            live,
            rng,
            polls: 0,
            pending: Vec::new(),
        }
    }

    pub fn resolve(&mut self, node: &SanitizedNode) -> Node {
        match node {
            SanitizedNode::Empty => Node::Empty,
            SanitizedNode::Text(text) => Node::Text(text.clone()),
            SanitizedNode::Element {
                tag,
                attrs,
                children,
            } => match self.policy.generic_override(*tag) {
                Some(GenericOverride::Suppress) => Node::Empty,
                Some(GenericOverride::Unwrap(separator)) => {
                    let mut nodes = self.resolve_children(children.as_deref());
                    if !separator.is_empty() {
                        nodes.push(Node::Text(separator.to_string()));
                    }
                    Node::Fragment(nodes)
                }
                None => {
                    let mut element = Element::new(tag.as_str())
                        .children(self.resolve_children(children.as_deref()));
                    for (name, value) in attrs {
                        element = element.attr(name.as_str(), value.clone());
                    }
                    Node::Element(element)
                }
            },
            SanitizedNode::Component { props, children } => {
                let policy = self.policy;
                policy.resolve_component(self, props, children.as_deref())
            }
            SanitizedNode::Fragment(children) => Node::Fragment(
                children
                    .iter()
                    .map(|child| self.resolve(&child.node).with_key(child.key))
                    .collect(),
            ),
        }
    }

    /// Resolves optional children into a flat list.
    pub fn resolve_children(
        &mut self,
        children: Option<&SanitizedNode>,
    ) -> Vec<Node> {
        match children {
            None => Vec::new(),
            Some(SanitizedNode::Fragment(children)) => children
                .iter()
                .map(|child| self.resolve(&child.node).with_key(child.key))
                .collect(),
            Some(child) => vec![self.resolve(child)],
        }
    }

    /// Results of earlier lookups; only set for interactive renders.
    pub(crate) fn live(&self) -> Option<&'r LiveState> {
        self.live
    }

    /// Index of the next poll in document order.
    pub(crate) fn next_poll(&mut self) -> usize {
        let index = self.polls;
        self.polls += 1;
        index
    }

    /// Asks for a lookup whose result will trigger a re-render.
    pub(crate) fn request(&mut self, request: LiveRequest) {
        if !self.pending.contains(&request) {
            self.pending.push(request);
        }
    }

    pub(crate) fn choose<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T> {
        items.choose(&mut self.rng)
    }

    pub(crate) fn into_requests(self) -> Vec<LiveRequest> {
        self.pending
    }
}
