use payloads::Advertisement;

use crate::node::{Element, Node};
use crate::parse::AttrValue;
use crate::sanitize::{AdProps, SanitizedNode};
use crate::surface::RenderScope;
use crate::surface::interactive::LiveRequest;
use crate::widgets::invalid;

const DARK_MEDIA_QUERY: &str = "(prefers-color-scheme: dark)";

fn benefit_id(props: &AdProps) -> Option<&str> {
    props.benefit_id.as_ref().and_then(AttrValue::as_str)
}

pub(crate) fn interactive(
    scope: &mut RenderScope<'_>,
    props: &AdProps,
    _children: Option<&SanitizedNode>,
) -> Node {
    let Some(benefit_id) = benefit_id(props) else {
        return invalid("Invalid Ad");
    };
    let Some(candidates) = scope.live().and_then(|live| live.ads.get(benefit_id))
    else {
        scope.request(LiveRequest::Ads(benefit_id.to_string()));
        return Node::Empty;
    };
    match scope.choose(candidates) {
        Some(ad) => advertisement(ad, Element::new("a").attr("className", "ad")),
        None => Node::Empty,
    }
}

pub(crate) fn email(
    scope: &mut RenderScope<'_>,
    props: &AdProps,
    _children: Option<&SanitizedNode>,
) -> Node {
    let Some(benefit_id) = benefit_id(props) else {
        return invalid("Invalid Ad");
    };
    let ctx = scope.ctx;
    let candidates = ctx.ads.get(benefit_id).map(Vec::as_slice).unwrap_or_default();
    match scope.choose(candidates) {
        Some(ad) => advertisement(
            ad,
            Element::new("a").attr("style", "display:block;text-decoration:none"),
        ),
        None => Node::Empty,
    }
}

/// Wraps the ad's picture and text in `link`, pointing it at the ad.
fn advertisement(ad: &Advertisement, link: Element) -> Node {
    let mut picture = Element::new("picture");
    if let Some(dark) = &ad.image_url_dark {
        picture = picture.child(
            Element::new("source")
                .attr("media", DARK_MEDIA_QUERY)
                .attr("srcSet", dark.as_str()),
        );
    }
    picture = picture.child(
        Element::new("img")
            .attr("src", ad.image_url.as_str())
            .attr("alt", ad.text.as_str()),
    );
    link.attr("href", ad.link_url.as_str())
        .child(picture)
        .child(Element::new("span").child(ad.text.as_str()))
        .into()
}
