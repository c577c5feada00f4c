//! Static markup for email clients.
//!
//! Everything here must work without scripts or external stylesheets:
//! styles are inlined, links are absolute, code is highlighted ahead of
//! time and diagrams become images.

use std::sync::LazyLock;

use crate::RenderContext;
use crate::node::Node;
use crate::policy::{Overrides, SurfacePolicy};
use crate::surface::{RenderScope, Surface, sanitize_body};
use crate::widgets::{ad, callout, code, embed, iframe, image, paywall, poll};

pub static POLICY: LazyLock<SurfacePolicy> = LazyLock::new(|| {
    SurfacePolicy::new(
        Surface::Email,
        Overrides {
            embed: Some(embed::email),
            iframe: Some(iframe::email),
            image: Some(image::email),
            code: Some(code::email),
            poll: Some(poll::email),
            paywall: Some(paywall::email),
            subscribe_now: None,
            ad: Some(ad::email),
            callout: Some(callout::email),
        },
    )
});

#[tracing::instrument(skip_all, fields(article = %ctx.article.id))]
pub fn render(ctx: &RenderContext) -> Node {
    let policy = &*POLICY;
    let sanitized = sanitize_body(&ctx.article.body, policy, ctx);
    RenderScope::new(ctx, policy, None).resolve(&sanitized)
}

pub fn render_html(ctx: &RenderContext) -> String {
    render(ctx).to_html()
}
