//! In-memory lookup services.
//!
//! Stand in for the API client in interactive rendering tests. Every call
//! is recorded so tests can assert which lookups a document performed.

use std::collections::HashMap;
use std::sync::Mutex;

use article_markdown::{AdLookup, IssueLookup, LookupError};
use payloads::requests::IssueReference;
use payloads::{Advertisement, Issue, IssueState};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Issue(IssueReference),
    Ads(String),
}

#[derive(Default)]
pub struct MockServices {
    issues: HashMap<IssueReference, Issue>,
    ads: HashMap<String, Vec<Advertisement>>,
    calls: Mutex<Vec<Call>>,
}

impl MockServices {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_issue(mut self, reference: IssueReference, issue: Issue) -> Self {
        self.issues.insert(reference, issue);
        self
    }

    pub fn with_ads(
        mut self,
        benefit_id: &str,
        ads: Vec<Advertisement>,
    ) -> Self {
        self.ads.insert(benefit_id.to_string(), ads);
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().map(|calls| calls.clone()).unwrap_or_default()
    }

    fn record(&self, call: Call) {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(call);
        }
    }
}

impl IssueLookup for MockServices {
    async fn lookup_issue(
        &self,
        issue: &IssueReference,
    ) -> Result<Issue, LookupError> {
        self.record(Call::Issue(issue.clone()));
        self.issues
            .get(issue)
            .cloned()
            .ok_or_else(|| LookupError::NotFound(issue.to_string()))
    }
}

impl AdLookup for MockServices {
    async fn lookup_ads(
        &self,
        benefit_id: &str,
    ) -> Result<Vec<Advertisement>, LookupError> {
        self.record(Call::Ads(benefit_id.to_string()));
        self.ads
            .get(benefit_id)
            .cloned()
            .ok_or_else(|| LookupError::NotFound(benefit_id.to_string()))
    }
}

/// An open issue as the API would return it for `reference`.
pub fn issue(reference: &IssueReference, title: &str) -> Issue {
    Issue {
        number: reference.number,
        title: title.to_string(),
        state: IssueState::Open,
        html_url: reference.html_url(),
        author: Some("octocat".to_string()),
        comments: 3,
    }
}
