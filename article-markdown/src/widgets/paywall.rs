use crate::node::{Element, Node};
use crate::sanitize::{PaywallProps, SanitizedNode};
use crate::surface::RenderScope;

pub const DEFAULT_BENEFIT_NAME: &str = "Premium Articles";

struct LockedMessage {
    title: String,
    body: String,
    cta: &'static str,
}

fn locked_message(props: &PaywallProps) -> LockedMessage {
    let organization = &props.organization.name;
    if props.is_subscriber {
        let benefit = props
            .paid_articles_benefit_name
            .as_deref()
            .unwrap_or(DEFAULT_BENEFIT_NAME);
        LockedMessage {
            title: "Upgrade to get access".to_string(),
            body: format!(
                "This section is only available with {benefit}. Upgrade your \
                 subscription to {organization} to read it."
            ),
            cta: "Upgrade",
        }
    } else {
        LockedMessage {
            title: format!("Subscribe to {organization} to get access"),
            body: "This section is for premium subscribers only.".to_string(),
            cta: "Subscribe",
        }
    }
}

fn subscriptions_path(props: &PaywallProps) -> String {
    format!("/{}/subscriptions", props.organization.slug)
}

/// Paywalled children, when the reader may see them.
fn unlocked(
    scope: &mut RenderScope<'_>,
    props: &PaywallProps,
    children: Option<&SanitizedNode>,
) -> Option<Node> {
    match children {
        Some(children) if props.show_paywalled_content => {
            Some(Node::Fragment(scope.resolve_children(Some(children))))
        }
        _ => None,
    }
}

pub(crate) fn interactive(
    scope: &mut RenderScope<'_>,
    props: &PaywallProps,
    children: Option<&SanitizedNode>,
) -> Node {
    if let Some(content) = unlocked(scope, props, children) {
        return content;
    }
    let message = locked_message(props);
    Element::new("div")
        .attr("className", "paywall")
        .child(
            Element::new("p")
                .attr("className", "paywall-title")
                .child(message.title),
        )
        .child(Element::new("p").child(message.body))
        .child(
            Element::new("a")
                .attr("className", "paywall-cta")
                .attr("href", subscriptions_path(props))
                .child(message.cta),
        )
        .into()
}

pub(crate) fn email(
    scope: &mut RenderScope<'_>,
    props: &PaywallProps,
    children: Option<&SanitizedNode>,
) -> Node {
    if let Some(content) = unlocked(scope, props, children) {
        return content;
    }
    let message = locked_message(props);
    let href = scope.ctx.absolute_url(&subscriptions_path(props));
    let cell = Element::new("td")
        .attr(
            "style",
            "padding:24px;border:1px solid #e5e7eb;border-radius:8px;text-align:center",
        )
        .child(
            Element::new("p")
                .attr("style", "margin:0 0 8px;font-weight:600")
                .child(message.title),
        )
        .child(
            Element::new("p")
                .attr("style", "margin:0 0 16px;color:#6b7280")
                .child(message.body),
        )
        .child(
            Element::new("a")
                .attr("href", href)
                .attr(
                    "style",
                    "display:inline-block;padding:8px 16px;border-radius:6px;\
                     background:#0062ff;color:#ffffff;text-decoration:none",
                )
                .child(message.cta),
        );
    Element::new("table")
        .attr("role", "presentation")
        .attr("width", "100%")
        .child(Element::new("tbody").child(Element::new("tr").child(cell)))
        .into()
}
