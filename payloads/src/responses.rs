use crate::{AdvertisementId, ArticleId, OrganizationId};
use jiff::Timestamp;
use serde::{Deserialize, Serialize};

/// The organization publishing an article.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Organization {
    pub id: OrganizationId,
    pub name: String,
    /// Path segment used for public pages, e.g. `/{slug}/subscriptions`.
    pub slug: String,
    pub avatar_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Byline {
    pub name: String,
    pub avatar_url: Option<String>,
}

/// A user-authored post. The body is markdown with a small set of custom
/// tags and is untrusted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Article {
    pub id: ArticleId,
    pub title: String,
    pub slug: String,
    pub body: String,
    pub byline: Byline,
    pub organization: Organization,
    pub published_at: Option<Timestamp>,
    /// Set when the body was already abbreviated server side.
    pub is_preview: bool,
    pub paid_subscribers_only: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueState {
    Open,
    Closed,
}

/// Issue metadata shown in embed cards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issue {
    pub number: u64,
    pub title: String,
    pub state: IssueState,
    pub html_url: String,
    pub author: Option<String>,
    pub comments: u32,
}

/// An ad campaign attached to a benefit. `image_url_dark` is served to
/// readers with a dark colour scheme when present.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Advertisement {
    pub id: AdvertisementId,
    pub text: String,
    pub link_url: String,
    pub image_url: String,
    pub image_url_dark: Option<String>,
}
