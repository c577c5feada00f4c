use crate::node::{Element, Node};
use crate::sanitize::{PaywallProps, SanitizedNode};
use crate::surface::RenderScope;

/// `<SubscribeNow>` button. Only rendered on the web page.
pub(crate) fn interactive(
    _scope: &mut RenderScope<'_>,
    props: &PaywallProps,
    _children: Option<&SanitizedNode>,
) -> Node {
    Element::new("a")
        .attr("className", "subscribe-button")
        .attr(
            "href",
            format!("/{}/subscriptions", props.organization.slug),
        )
        .child(format!("Subscribe to {}", props.organization.name))
        .into()
}
