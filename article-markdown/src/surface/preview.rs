//! Plain-text rendering for summaries and `<meta>` descriptions.

use std::sync::LazyLock;

use html_escape::decode_html_entities;
use regex::Regex;

use crate::boundary::{BoundaryOptions, find_boundary};
use crate::policy::{GenericOverride, Overrides, SurfacePolicy};
use crate::sanitize::HtmlTag;
use crate::surface::{RenderScope, Surface, sanitize_body};
use crate::widgets::callout;
use crate::RenderContext;

pub static POLICY: LazyLock<SurfacePolicy> = LazyLock::new(|| {
    use GenericOverride::{Suppress, Unwrap};
    use HtmlTag::*;

    SurfacePolicy::new(
        Surface::Preview,
        Overrides {
            callout: Some(callout::preview),
            ..Overrides::default()
        },
    )
    .override_tags(&[Img, Picture, Source, Input, Hr, Footer], Suppress)
    .override_tags(
        &[A, B, Code, Del, Em, Span, Strong, Sub, Sup],
        Unwrap(""),
    )
    .override_tags(&[Td, Th], Unwrap(" "))
    .override_tags(&[Li, Tr, Br], Unwrap("\n"))
    .override_tags(
        &[
            P, H1, H2, H3, H4, H5, H6, Blockquote, Div, Ul, Ol, Table, Thead,
            Tbody, Figure, Figcaption, Pre,
        ],
        Unwrap("\n\n"),
    )
});

static EXTRA_NEWLINES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n{3,}").expect("valid regex"));

/// Renders a markdown body as decoded plain text.
#[tracing::instrument(skip_all)]
pub fn render_text(body: &str, ctx: &RenderContext) -> String {
    let policy = &*POLICY;
    let sanitized = sanitize_body(body, policy, ctx);
    let mut scope = RenderScope::new(ctx, policy, None);
    let html = scope.resolve(&sanitized).to_html();
    let text = decode_html_entities(&html);
    EXTRA_NEWLINES
        .replace_all(text.trim(), "\n\n")
        .into_owned()
}

/// Preview text for the context's article, optionally cut at the fold.
///
/// When abbreviating, reference definitions from the whole body are
/// re-attached so links in the kept paragraphs still resolve.
pub fn preview_text(ctx: &RenderContext, abbreviate: bool) -> String {
    let body = &ctx.article.body;
    if !abbreviate {
        return render_text(body, ctx);
    }
    let boundary = find_boundary(
        body,
        &BoundaryOptions {
            include_boundary_in_body: false,
            include_references: true,
        },
    );
    render_text(&boundary.truncated_body, ctx)
}
