//! Renders a single article from the command line.
//!
//! The input is either a JSON-encoded [`Article`] or a bare markdown file,
//! which is wrapped in an article published by the configured
//! organization.

pub mod config;
pub mod telemetry;

use std::path::Path;

use anyhow::{Context, bail};
use article_markdown::{RenderContext, Surface, email, interactive, preview};
use payloads::{APIClient, Article, ArticleId, Byline, Organization, OrganizationId};
use uuid::Uuid;

pub use config::Config;

/// Reads the article at `path`. Files ending in `.json` are decoded as an
/// [`Article`]; anything else is taken as the markdown body.
pub fn load_article(path: &Path, config: &Config) -> anyhow::Result<Article> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))?;
    if path.extension().is_some_and(|ext| ext == "json") {
        return serde_json::from_str(&contents)
            .with_context(|| format!("decoding article from {}", path.display()));
    }

    let title = path
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default();
    Ok(Article {
        id: ArticleId(Uuid::new_v4()),
        slug: title.to_lowercase().replace(' ', "-"),
        title,
        body: contents,
        byline: Byline {
            name: config.organization_name.clone(),
            avatar_url: None,
        },
        organization: Organization {
            id: OrganizationId(Uuid::new_v4()),
            name: config.organization_name.clone(),
            slug: config.organization_slug.clone(),
            avatar_url: None,
        },
        published_at: None,
        is_preview: false,
        paid_subscribers_only: false,
    })
}

pub fn render_context(article: Article, config: &Config) -> RenderContext {
    let mut ctx = RenderContext::new(article)
        .with_base_url(config.base_url.as_str())
        .with_theme(config.theme)
        .with_paywall(config.show_paywalled_content, config.is_subscriber);
    ctx.paid_articles_benefit_name = config.paid_articles_benefit_name.clone();
    ctx.diagram_base_url = config.diagram_base_url.clone();
    ctx
}

pub fn api_client(config: &Config) -> Option<APIClient> {
    let address = config.api_base_url.as_deref()?;
    let client = APIClient::new(address.trim_end_matches('/'));
    Some(match &config.api_access_token {
        Some(token) => client.with_access_token(token.clone()),
        None => client,
    })
}

/// Parses the surface argument. `preview` renders the full text;
/// `summary` cuts it at the fold.
pub fn parse_surface(name: &str) -> anyhow::Result<(Surface, bool)> {
    if name == "summary" {
        return Ok((Surface::Preview, true));
    }
    match Surface::from_string(name) {
        Some(surface) => Ok((surface, false)),
        None => bail!(
            "unknown surface {name:?}, expected interactive, preview, summary or email"
        ),
    }
}

/// Renders `ctx` for `surface`. Interactive output is enhanced with live
/// lookups when a client is available.
#[tracing::instrument(skip(ctx, client), fields(article = %ctx.article.id))]
pub async fn render(
    surface: Surface,
    abbreviate: bool,
    ctx: &RenderContext,
    client: Option<&APIClient>,
) -> String {
    match surface {
        Surface::Interactive => {
            let mut document = interactive::render(ctx);
            match client {
                Some(client) => document.enhance(client).await,
                None if !document.pending_lookups().is_empty() => {
                    tracing::info!(
                        pending = document.pending_lookups().len(),
                        "no API configured, leaving placeholders"
                    );
                }
                None => {}
            }
            document.to_html()
        }
        Surface::Preview => preview::preview_text(ctx, abbreviate),
        Surface::Email => email::render_html(ctx),
    }
}
