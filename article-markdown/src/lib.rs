//! Sanitizing markdown renderer for user-authored articles.
//!
//! An article body is markdown mixed with a handful of custom tags
//! (`<Paywall>`, `<poll>`, `<Ad>`, `<embed>`, ...). Every body is parsed,
//! sanitized against a fixed allow-list, and then rendered for one of three
//! surfaces:
//!
//! - [`interactive`]: the full web page, with live widgets.
//! - [`preview`]: decoded plain text for summaries and `<meta>` tags.
//! - [`email`]: static markup with inline styles and absolute URLs.
//!
//! All surfaces share the parser and the [`sanitize::Sanitizer`]; they only
//! differ in what each recognised custom tag becomes.
//!
//! ```rust,ignore
//! use article_markdown::{RenderContext, email};
//!
//! let ctx = RenderContext::new(article).with_base_url("https://example.com");
//! let html = email::render_html(&ctx);
//! ```

pub mod boundary;
pub mod highlight;
pub mod lookup;
pub mod node;
pub mod parse;
pub mod policy;
pub mod references;
pub mod sanitize;
pub mod surface;
mod widgets;

use std::collections::HashMap;

use payloads::{Advertisement, Article};

pub use boundary::{Boundary, BoundaryOptions, find_boundary};
pub use lookup::{AdLookup, IssueLookup, LookupError};
pub use node::{Action, Element, EventKind, Handler, Node};
pub use references::collect_references;
pub use surface::interactive::{self, InteractiveDocument};
pub use surface::{RenderScope, Surface, email, preview};
pub use widgets::callout::CalloutKind;
pub use widgets::embed::parse_issue_url;
pub use widgets::iframe::youtube_video_id;
pub use widgets::paywall::DEFAULT_BENEFIT_NAME;
pub use widgets::poll::PLACEHOLDER_TALLY;

/// Advertisement candidates keyed by the benefit they are attached to.
pub type AdsContext = HashMap<String, Vec<Advertisement>>;

pub const DEFAULT_DIAGRAM_BASE_URL: &str = "https://mermaid.ink/img/";

/// Colour scheme used for syntax highlighting and image variants.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn from_string(s: &str) -> Self {
        match s {
            "dark" => Theme::Dark,
            _ => Theme::Light,
        }
    }
}

/// Everything a render needs besides the markdown itself.
///
/// Widgets never look at ambient state; anything that varies between
/// readers (subscription status, colour scheme, ads) is carried here.
#[derive(Debug, Clone)]
pub struct RenderContext {
    pub article: Article,
    pub show_paywalled_content: bool,
    pub is_subscriber: bool,
    /// Name of the benefit that unlocks paid articles, shown to
    /// subscribers who need to upgrade.
    pub paid_articles_benefit_name: Option<String>,
    /// Absolute origin used wherever relative links are not acceptable
    /// (email).
    pub base_url: String,
    pub theme: Theme,
    pub ads: AdsContext,
    /// Fixes the advertisement pick. Interactive documents generate one
    /// when unset so re-renders stay stable.
    pub ad_seed: Option<u64>,
    pub diagram_base_url: String,
}

impl RenderContext {
    pub fn new(article: Article) -> Self {
        Self {
            article,
            show_paywalled_content: false,
            is_subscriber: false,
            paid_articles_benefit_name: None,
            base_url: "http://localhost:3000".to_string(),
            theme: Theme::Light,
            ads: AdsContext::new(),
            ad_seed: None,
            diagram_base_url: DEFAULT_DIAGRAM_BASE_URL.to_string(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_theme(mut self, theme: Theme) -> Self {
        self.theme = theme;
        self
    }

    pub fn with_paywall(
        mut self,
        show_paywalled_content: bool,
        is_subscriber: bool,
    ) -> Self {
        self.show_paywalled_content = show_paywalled_content;
        self.is_subscriber = is_subscriber;
        self
    }

    pub fn with_ads(mut self, ads: AdsContext) -> Self {
        self.ads = ads;
        self
    }

    pub fn with_ad_seed(mut self, seed: u64) -> Self {
        self.ad_seed = Some(seed);
        self
    }

    /// Joins the configured base URL and an absolute path.
    pub fn absolute_url(&self, path: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }
}
