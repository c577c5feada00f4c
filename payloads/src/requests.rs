use derive_more::Display;
use serde::{Deserialize, Serialize};

/// Identifies a single GitHub issue, as extracted from an embed URL.
#[derive(
    Debug, Clone, PartialEq, Eq, Hash, Display, Serialize, Deserialize,
)]
#[display("{owner}/{repo}#{number}")]
pub struct IssueReference {
    pub owner: String,
    pub repo: String,
    pub number: u64,
}

impl IssueReference {
    /// Canonical github.com URL of the issue.
    pub fn html_url(&self) -> String {
        format!(
            "https://github.com/{}/{}/issues/{}",
            self.owner, self.repo, self.number
        )
    }
}

/// Query for the advertisements attached to a subscription benefit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListAdvertisements {
    pub benefit_id: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_issue_reference_formats() {
        let issue = IssueReference {
            owner: "polarsource".to_string(),
            repo: "polar".to_string(),
            number: 42,
        };
        assert_eq!(issue.to_string(), "polarsource/polar#42");
        assert_eq!(
            issue.html_url(),
            "https://github.com/polarsource/polar/issues/42"
        );
    }
}
