use article_markdown::interactive::{self, LiveRequest, LookupOutcome};
use article_markdown::{Action, LookupError, Node, parse_issue_url};
use test_helpers::mock::{self, Call};
use test_helpers::{BENEFIT_ID, MockServices, advertisement, context};

const ISSUE_URL: &str = "https://github.com/polarsource/polar/issues/42";

fn embed_body() -> String {
    format!("<embed src=\"{ISSUE_URL}\" />")
}

#[tokio::test]
async fn test_embed_renders_placeholder_then_issue() -> anyhow::Result<()> {
    let reference = parse_issue_url(ISSUE_URL).expect("issue url");
    let ctx = context(&embed_body());
    let mut document = interactive::render(&ctx);

    assert!(document.node().find_class("issue-card-loading").is_some());
    assert_eq!(
        document.pending_lookups(),
        [LiveRequest::Issue(reference.clone())]
    );

    let services = MockServices::new()
        .with_issue(reference.clone(), mock::issue(&reference, "Crash on save"));
    document.enhance(&services).await;

    assert_eq!(services.calls(), [Call::Issue(reference)]);
    assert!(document.pending_lookups().is_empty());
    assert!(document.node().find_class("issue-card-loading").is_none());
    let title = document
        .node()
        .find_class("issue-card-title")
        .expect("issue title");
    assert_eq!(title.children, [Node::from("Crash on save")]);
    assert!(document.to_html().contains("opened by octocat"));
    Ok(())
}

#[tokio::test]
async fn test_failed_issue_lookup_keeps_placeholder() -> anyhow::Result<()> {
    let ctx = context(&embed_body());
    let mut document = interactive::render(&ctx);

    document.enhance(&MockServices::new()).await;

    assert!(document.node().find_class("issue-card-loading").is_some());
    assert!(document.pending_lookups().is_empty());
    assert!(document.to_html().contains("polarsource/polar#42"));
    Ok(())
}

#[tokio::test]
async fn test_duplicate_embeds_share_one_lookup() -> anyhow::Result<()> {
    let body = format!("{}\n\n{}", embed_body(), embed_body());
    let mut document = interactive::render(&context(&body));
    assert_eq!(document.pending_lookups().len(), 1);

    let services = MockServices::new();
    document.enhance(&services).await;
    assert_eq!(services.calls().len(), 1);
    Ok(())
}

#[tokio::test]
async fn test_ads_are_looked_up_then_rendered() -> anyhow::Result<()> {
    let body = format!("<Ad subscriptionBenefitId=\"{BENEFIT_ID}\" />");
    let mut document = interactive::render(&context(&body));

    assert_eq!(document.to_html(), "");
    assert_eq!(
        document.pending_lookups(),
        [LiveRequest::Ads(BENEFIT_ID.to_string())]
    );

    let services = MockServices::new()
        .with_ads(BENEFIT_ID, vec![advertisement("Only Ad", false)]);
    document.enhance(&services).await;

    assert_eq!(services.calls(), [Call::Ads(BENEFIT_ID.to_string())]);
    let link = document.node().find_class("ad").expect("ad link");
    assert_eq!(link.tag, "a");
    assert!(document.node().find("source").is_none());
    assert!(document.to_html().contains("Only Ad"));
    Ok(())
}

#[tokio::test]
async fn test_failed_ad_lookup_renders_nothing() -> anyhow::Result<()> {
    let body = format!("<Ad subscriptionBenefitId=\"{BENEFIT_ID}\" />");
    let mut document = interactive::render(&context(&body));

    document.enhance(&MockServices::new()).await;

    assert_eq!(document.to_html(), "");
    assert!(document.pending_lookups().is_empty());
    Ok(())
}

#[test]
fn test_results_after_unmount_are_discarded() {
    let reference = parse_issue_url(ISSUE_URL).expect("issue url");
    let mut document = interactive::render(&context(&embed_body()));
    let before = document.to_html();

    document.unmount();
    assert!(!document.is_mounted());

    let applied = document.apply(LookupOutcome::Issue(
        reference.clone(),
        Ok(mock::issue(&reference, "Too late")),
    ));
    assert!(!applied);
    assert_eq!(document.to_html(), before);
    assert!(!document.to_html().contains("Too late"));
}

#[test]
fn test_dispatch_after_unmount_is_ignored() {
    let mut document =
        interactive::render(&context("<poll>\n- Yes\n- No\n</poll>"));
    document.unmount();

    let action = Action::SelectPollOption { poll: 0, option: 1 };
    assert!(!document.dispatch(&action));
    assert_eq!(document.selected_option(0), None);
}

#[test]
fn test_apply_records_failure_without_retrying() {
    let reference = parse_issue_url(ISSUE_URL).expect("issue url");
    let mut document = interactive::render(&context(&embed_body()));

    let applied = document.apply(LookupOutcome::Issue(
        reference.clone(),
        Err(LookupError::NotFound(reference.to_string())),
    ));
    assert!(applied);
    assert!(document.pending_lookups().is_empty());
    assert!(document.node().find_class("issue-card-loading").is_some());
}

#[test]
fn test_ad_seed_is_fixed_across_rerenders() {
    let mut ctx = context("text");
    ctx.ad_seed = None;
    let document = interactive::render(&ctx);
    assert!(document.context().ad_seed.is_some());
}
