use crate::node::{Element, Node};
use crate::sanitize::{IframeProps, SanitizedNode};
use crate::surface::RenderScope;

const ALLOWED_PREFIXES: [&str; 3] = [
    "//www.youtube.com/embed/",
    "https://www.youtube.com/embed/",
    "https://www.youtube-nocookie.com/embed/",
];

/// Video id of an allowed YouTube embed URL.
pub fn youtube_video_id(src: &str) -> Option<&str> {
    let rest = ALLOWED_PREFIXES
        .iter()
        .find_map(|prefix| src.strip_prefix(prefix))?;
    let id = rest.split(['?', '&', '#', '/']).next()?;
    (!id.is_empty()).then_some(id)
}

pub(crate) fn interactive(
    _scope: &mut RenderScope<'_>,
    props: &IframeProps,
    _children: Option<&SanitizedNode>,
) -> Node {
    let Some(src) = props.src.as_deref() else {
        return Node::Empty;
    };
    if youtube_video_id(src).is_none() {
        tracing::trace!(src, "dropping iframe with disallowed source");
        return Node::Empty;
    }
    let src = match src.strip_prefix("//") {
        Some(rest) => format!("https://{rest}"),
        None => src.to_string(),
    };
    Element::new("iframe")
        .attr("src", src)
        .attr("width", "560")
        .attr("height", "315")
        .attr("title", "YouTube video player")
        .attr(
            "allow",
            "accelerometer; clipboard-write; encrypted-media; picture-in-picture",
        )
        .attr("allowfullscreen", true)
        .attr("style", "border:0;max-width:100%")
        .into()
}

pub(crate) fn email(
    _scope: &mut RenderScope<'_>,
    props: &IframeProps,
    _children: Option<&SanitizedNode>,
) -> Node {
    let Some(id) = props.src.as_deref().and_then(youtube_video_id) else {
        return Node::Empty;
    };
    Element::new("a")
        .attr("href", format!("https://www.youtube.com/watch?v={id}"))
        .child(
            Element::new("img")
                .attr("src", format!("https://img.youtube.com/vi/{id}/hqdefault.jpg"))
                .attr("alt", "YouTube video")
                .attr("width", "480")
                .attr("style", "display:block;max-width:100%;height:auto;border:0"),
        )
        .into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_youtube_video_id() {
        assert_eq!(
            youtube_video_id("https://www.youtube.com/embed/dQw4w9WgXcQ?si=x"),
            Some("dQw4w9WgXcQ")
        );
        assert_eq!(
            youtube_video_id("//www.youtube.com/embed/abc123"),
            Some("abc123")
        );
        assert_eq!(
            youtube_video_id("https://www.youtube-nocookie.com/embed/xyz#t=3"),
            Some("xyz")
        );
        assert_eq!(youtube_video_id("https://evil.example/embed/abc"), None);
        assert_eq!(youtube_video_id("https://www.youtube.com/embed/"), None);
    }
}
