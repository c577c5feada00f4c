//! Per-surface rendering policies.
//!
//! Every surface shares the parser options, the set of recognised custom
//! tags and the sanitizer allow-list. A policy only adds an override table:
//! which resolver each custom tag goes through, and which generic tags are
//! suppressed or unwrapped.

use std::collections::HashMap;

use crate::node::Node;
use crate::parse::ParseOptions;
use crate::sanitize::{
    AdProps, CalloutProps, CodeProps, ComponentProps, CustomTag, EmbedProps,
    HtmlTag, IframeProps, ImageProps, PaywallProps, PollProps, SanitizedNode,
};
use crate::surface::{RenderScope, Surface};
use crate::widgets::callout;

/// Turns a recognised custom tag into output for one surface.
pub type Resolver<P> =
    fn(&mut RenderScope<'_>, &P, Option<&SanitizedNode>) -> Node;

/// Resolvers per custom tag. A tag without a resolver renders nothing on
/// that surface.
#[derive(Default)]
pub struct Overrides {
    pub embed: Option<Resolver<EmbedProps>>,
    pub iframe: Option<Resolver<IframeProps>>,
    pub image: Option<Resolver<ImageProps>>,
    pub code: Option<Resolver<CodeProps>>,
    pub poll: Option<Resolver<PollProps>>,
    pub paywall: Option<Resolver<PaywallProps>>,
    pub subscribe_now: Option<Resolver<PaywallProps>>,
    pub ad: Option<Resolver<AdProps>>,
    pub callout: Option<Resolver<CalloutProps>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenericOverride {
    /// The element and its children render nothing.
    Suppress,
    /// Only the children render, followed by the separator.
    Unwrap(&'static str),
}

pub struct SurfacePolicy {
    pub surface: Surface,
    pub parse: ParseOptions,
    pub components: &'static [CustomTag],
    overrides: Overrides,
    generic: HashMap<HtmlTag, GenericOverride>,
}

impl SurfacePolicy {
    pub fn new(surface: Surface, overrides: Overrides) -> Self {
        Self {
            surface,
            parse: ParseOptions {
                parse_raw_html: true,
                force_block: true,
                block_rule: Some(callout::rewrite_blockquote),
            },
            components: CustomTag::ALL,
            overrides,
            generic: HashMap::new(),
        }
    }

    pub fn override_tags(
        mut self,
        tags: &[HtmlTag],
        behaviour: GenericOverride,
    ) -> Self {
        for tag in tags {
            self.generic.insert(*tag, behaviour);
        }
        self
    }

    pub fn recognizes(&self, tag: CustomTag) -> bool {
        self.components.contains(&tag)
    }

    pub fn generic_override(&self, tag: HtmlTag) -> Option<GenericOverride> {
        self.generic.get(&tag).copied()
    }

    pub fn resolve_component(
        &self,
        scope: &mut RenderScope<'_>,
        props: &ComponentProps,
        children: Option<&SanitizedNode>,
    ) -> Node {
        let overrides = &self.overrides;
        let resolved = match props {
            ComponentProps::Embed(props) => {
                overrides.embed.map(|resolve| resolve(scope, props, children))
            }
            ComponentProps::Iframe(props) => {
                overrides.iframe.map(|resolve| resolve(scope, props, children))
            }
            ComponentProps::Image(props) => {
                overrides.image.map(|resolve| resolve(scope, props, children))
            }
            ComponentProps::Code(props) => {
                overrides.code.map(|resolve| resolve(scope, props, children))
            }
            ComponentProps::Poll(props) => {
                overrides.poll.map(|resolve| resolve(scope, props, children))
            }
            ComponentProps::Paywall(props) => overrides
                .paywall
                .map(|resolve| resolve(scope, props, children)),
            ComponentProps::SubscribeNow(props) => overrides
                .subscribe_now
                .map(|resolve| resolve(scope, props, children)),
            ComponentProps::Ad(props) => {
                overrides.ad.map(|resolve| resolve(scope, props, children))
            }
            ComponentProps::Callout(props) => overrides
                .callout
                .map(|resolve| resolve(scope, props, children)),
        };
        resolved.unwrap_or(Node::Empty)
    }
}
