use crate::{Advertisement, Issue, requests};
use reqwest::StatusCode;
use secrecy::{ExposeSecret, SecretString};

type ReqwestResult = Result<reqwest::Response, reqwest::Error>;

/// An API client for the lookups the renderer performs after the initial
/// synchronous render.
pub struct APIClient {
    pub address: String,
    pub inner_client: reqwest::Client,
    pub access_token: Option<SecretString>,
}

/// Helper methods for http actions
impl APIClient {
    pub fn new(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            inner_client: reqwest::Client::new(),
            access_token: None,
        }
    }

    pub fn with_access_token(mut self, token: SecretString) -> Self {
        self.access_token = Some(token);
        self
    }

    fn format_url(&self, path: &str) -> String {
        format!("{}/api/{path}", &self.address)
    }

    async fn get(&self, path: &str, query: &[(&str, &str)]) -> ReqwestResult {
        let mut request =
            self.inner_client.get(self.format_url(path)).query(query);

        if let Some(token) = &self.access_token {
            request = request.bearer_auth(token.expose_secret());
        }

        request.send().await
    }
}

/// Methods on the backend API
impl APIClient {
    /// Fetch metadata for an issue referenced by an embed.
    #[tracing::instrument(skip(self), fields(issue = %issue))]
    pub async fn get_issue(
        &self,
        issue: &requests::IssueReference,
    ) -> Result<Issue, ClientError> {
        let path = format!(
            "v1/issues/{}/{}/{}",
            issue.owner, issue.repo, issue.number
        );
        let response = self.get(&path, &[]).await?;
        ok_body(response).await
    }

    /// List the advertisement candidates attached to a benefit.
    #[tracing::instrument(skip(self))]
    pub async fn list_advertisements(
        &self,
        details: &requests::ListAdvertisements,
    ) -> Result<Vec<Advertisement>, ClientError> {
        let response = self
            .get(
                "v1/advertisements",
                &[("benefit_id", details.benefit_id.as_str())],
            )
            .await?;
        ok_body(response).await
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// An unhandled API error to display, containing response text.
    #[error("{1}")]
    APIError(StatusCode, String),
    #[error("Network error. Please check your connection.")]
    Network(#[from] reqwest::Error),
}

/// Deserialize a successful request into the desired type, or return an
/// appropriate error.
pub async fn ok_body<T: serde::de::DeserializeOwned>(
    response: reqwest::Response,
) -> Result<T, ClientError> {
    if !response.status().is_success() {
        return Err(ClientError::APIError(
            response.status(),
            response.text().await?,
        ));
    }
    Ok(response.json::<T>().await?)
}
