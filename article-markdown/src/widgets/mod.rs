//! Surface-specific renderings of the custom tags.

pub(crate) mod ad;
pub(crate) mod callout;
pub(crate) mod code;
pub(crate) mod embed;
pub(crate) mod iframe;
pub(crate) mod image;
pub(crate) mod paywall;
pub(crate) mod poll;
pub(crate) mod subscribe;

use crate::node::{Element, Node};

/// Inline error box shown in place of a malformed custom tag.
pub(crate) fn invalid(message: &str) -> Node {
    Element::new("div")
        .attr("className", "invalid-widget")
        .attr(
            "style",
            "border:1px solid #d1242f;border-radius:6px;color:#d1242f;padding:8px 12px",
        )
        .child(message)
        .into()
}
