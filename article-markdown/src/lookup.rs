//! Data services the interactive surface uses after its first render.

use std::future::Future;

use payloads::requests::{IssueReference, ListAdvertisements};
use payloads::{APIClient, Advertisement, ClientError, Issue};

#[derive(Debug, thiserror::Error)]
pub enum LookupError {
    #[error(transparent)]
    Client(#[from] ClientError),
    #[error("{0} not found")]
    NotFound(String),
}

pub trait IssueLookup {
    fn lookup_issue(
        &self,
        issue: &IssueReference,
    ) -> impl Future<Output = Result<Issue, LookupError>> + Send;
}

pub trait AdLookup {
    fn lookup_ads(
        &self,
        benefit_id: &str,
    ) -> impl Future<Output = Result<Vec<Advertisement>, LookupError>> + Send;
}

impl IssueLookup for APIClient {
    async fn lookup_issue(
        &self,
        issue: &IssueReference,
    ) -> Result<Issue, LookupError> {
        Ok(self.get_issue(issue).await?)
    }
}

impl AdLookup for APIClient {
    async fn lookup_ads(
        &self,
        benefit_id: &str,
    ) -> Result<Vec<Advertisement>, LookupError> {
        let details = ListAdvertisements {
            benefit_id: benefit_id.to_string(),
        };
        Ok(self.list_advertisements(&details).await?)
    }
}
