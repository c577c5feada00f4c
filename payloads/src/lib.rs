//! Request and response contracts shared between the article renderer and
//! the backend API.
//!
//! The renderer never talks to the database or the payment provider; it
//! only consumes the records defined here, either supplied by the caller
//! (`Article`, `Advertisement`) or fetched through [`APIClient`].

mod api_client;
pub mod requests;
pub mod responses;

pub use api_client::{APIClient, ClientError, ok_body};
pub use responses::{
    Advertisement, Article, Byline, Issue, IssueState, Organization,
};

use derive_more::Display;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Serialize, Deserialize,
)]
pub struct ArticleId(pub Uuid);

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Serialize, Deserialize,
)]
pub struct OrganizationId(pub Uuid);

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Serialize, Deserialize,
)]
pub struct AdvertisementId(pub Uuid);
