pub mod mock;

use article_markdown::{AdsContext, RenderContext};
use payloads::{
    Advertisement, AdvertisementId, Article, ArticleId, Byline, Organization,
    OrganizationId,
};
use tracing_log::LogTracer;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Registry, fmt, layer::SubscriberExt};
use uuid::Uuid;

pub use mock::MockServices;

pub const BASE_URL: &str = "https://polar.example";
pub const ORGANIZATION_NAME: &str = "Acme Inc";
pub const ORGANIZATION_SLUG: &str = "acme";
pub const BENEFIT_ID: &str = "b3c2a1f0-ads";

/// Route test logs through the test writer. Safe to call from every test;
/// only the first call installs anything. `RUST_LOG` overrides the default
/// `error` level.
pub fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("error"));
    let subscriber = Registry::default()
        .with(env_filter)
        .with(fmt::Layer::new().with_test_writer());
    let _ = LogTracer::init();
    let _ = subscriber.try_init();
}

pub fn organization() -> Organization {
    Organization {
        id: OrganizationId(Uuid::new_v4()),
        name: ORGANIZATION_NAME.to_string(),
        slug: ORGANIZATION_SLUG.to_string(),
        avatar_url: None,
    }
}

pub fn article(body: &str) -> Article {
    Article {
        id: ArticleId(Uuid::new_v4()),
        title: "Test article".to_string(),
        slug: "test-article".to_string(),
        body: body.to_string(),
        byline: Byline {
            name: "Alice".to_string(),
            avatar_url: None,
        },
        organization: organization(),
        published_at: Some("2025-01-01T00:00:00Z".parse().unwrap()),
        is_preview: false,
        paid_subscribers_only: false,
    }
}

/// A render context for `body` with a fixed ad seed and base URL.
pub fn context(body: &str) -> RenderContext {
    init_tracing();
    RenderContext::new(article(body))
        .with_base_url(BASE_URL)
        .with_ad_seed(7)
}

pub fn advertisement(text: &str, dark_image: bool) -> Advertisement {
    let slug = text.to_lowercase().replace(' ', "-");
    Advertisement {
        id: AdvertisementId(Uuid::new_v4()),
        text: text.to_string(),
        link_url: format!("https://ads.example/{slug}"),
        image_url: format!("https://cdn.example/{slug}.png"),
        image_url_dark: dark_image
            .then(|| format!("https://cdn.example/{slug}-dark.png")),
    }
}

/// Ads context holding the given advertisements under [`BENEFIT_ID`].
pub fn ads_context(ads: Vec<Advertisement>) -> AdsContext {
    AdsContext::from([(BENEFIT_ID.to_string(), ads)])
}
