use crate::node::{Element, Node};
use crate::sanitize::{ImageProps, SanitizedNode};
use crate::surface::RenderScope;

fn image(props: &ImageProps) -> Element {
    let mut img = Element::new("img").attr("src", props.src.as_str());
    for (name, value) in [
        ("alt", &props.alt),
        ("width", &props.width),
        ("height", &props.height),
    ] {
        if let Some(value) = value {
            img = img.attr(name, value.as_str());
        }
    }
    img
}

pub(crate) fn interactive(
    _scope: &mut RenderScope<'_>,
    props: &ImageProps,
    _children: Option<&SanitizedNode>,
) -> Node {
    image(props).attr("loading", "lazy").into()
}

pub(crate) fn email(
    _scope: &mut RenderScope<'_>,
    props: &ImageProps,
    _children: Option<&SanitizedNode>,
) -> Node {
    image(props)
        .attr("style", "display:block;max-width:100%;height:auto")
        .into()
}
