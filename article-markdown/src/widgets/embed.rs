use std::sync::LazyLock;

use payloads::requests::IssueReference;
use payloads::{Issue, IssueState};
use regex::Regex;

use crate::node::{Element, Node};
use crate::sanitize::{EmbedProps, SanitizedNode};
use crate::surface::RenderScope;
use crate::surface::interactive::LiveRequest;
use crate::widgets::invalid;

static GITHUB_ISSUE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^https://github\.com/([A-Za-z0-9_.-]+)/([A-Za-z0-9_.-]+)/issues/(\d+)$",
    )
    .expect("valid regex")
});

/// Extracts owner, repository and number from a GitHub issue URL.
pub fn parse_issue_url(url: &str) -> Option<IssueReference> {
    let captures = GITHUB_ISSUE.captures(url)?;
    Some(IssueReference {
        owner: captures[1].to_string(),
        repo: captures[2].to_string(),
        number: captures[3].parse().ok()?,
    })
}

fn reference(props: &EmbedProps) -> Option<IssueReference> {
    props.src.as_deref().and_then(parse_issue_url)
}

pub(crate) fn interactive(
    scope: &mut RenderScope<'_>,
    props: &EmbedProps,
    _children: Option<&SanitizedNode>,
) -> Node {
    let Some(reference) = reference(props) else {
        return invalid("Invalid embed");
    };
    match scope.live().and_then(|live| live.issues.get(&reference)) {
        Some(Some(issue)) => issue_card(&reference, issue),
        // A failed lookup keeps the placeholder.
        Some(None) => placeholder_card(&reference),
        None => {
            let card = placeholder_card(&reference);
            scope.request(LiveRequest::Issue(reference));
            card
        }
    }
}

pub(crate) fn email(
    _scope: &mut RenderScope<'_>,
    props: &EmbedProps,
    _children: Option<&SanitizedNode>,
) -> Node {
    let Some(reference) = reference(props) else {
        return invalid("Invalid embed");
    };
    let link = Element::new("a")
        .attr("href", reference.html_url())
        .attr("style", "color:#0062ff;text-decoration:none;font-weight:600")
        .child(reference.to_string());
    Element::new("table")
        .attr("role", "presentation")
        .attr("width", "100%")
        .child(
            Element::new("tbody").child(
                Element::new("tr").child(
                    Element::new("td")
                        .attr(
                            "style",
                            "padding:12px 16px;border:1px solid #e5e7eb;border-radius:8px",
                        )
                        .child(link)
                        .child(
                            Element::new("p")
                                .attr("style", "margin:4px 0 0;color:#6b7280")
                                .child("View issue on GitHub"),
                        ),
                ),
            ),
        )
        .into()
}

fn card_header(reference: &IssueReference) -> Element {
    Element::new("a")
        .attr("className", "issue-card-reference")
        .attr("href", reference.html_url())
        .child(reference.to_string())
}

fn placeholder_card(reference: &IssueReference) -> Node {
    Element::new("div")
        .attr("className", "issue-card issue-card-loading")
        .child(card_header(reference))
        .into()
}

fn issue_card(reference: &IssueReference, issue: &Issue) -> Node {
    let state = match issue.state {
        IssueState::Open => "Open",
        IssueState::Closed => "Closed",
    };
    let mut card = Element::new("div")
        .attr("className", "issue-card")
        .child(card_header(reference))
        .child(
            Element::new("p")
                .attr("className", "issue-card-title")
                .child(issue.title.as_str()),
        )
        .child(
            Element::new("span")
                .attr("className", "issue-card-state")
                .child(state),
        );
    if let Some(author) = &issue.author {
        card = card.child(
            Element::new("span")
                .attr("className", "issue-card-author")
                .child(format!("opened by {author}")),
        );
    }
    card.into()
}
