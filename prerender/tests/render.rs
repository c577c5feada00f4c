use std::path::PathBuf;

use article_markdown::Surface;
use prerender::{Config, api_client, load_article, parse_surface, render, render_context};
use test_helpers::{article, init_tracing};

fn config(vars: &[(&str, &str)]) -> Config {
    let vars: Vec<(String, String)> = vars
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    Config::from_vars(|key| {
        vars.iter()
            .find(|(name, _)| name == key)
            .map(|(_, value)| value.clone())
    })
}

/// Writes `contents` to a fresh file under the system temp dir.
fn write_input(name: &str, contents: &str) -> anyhow::Result<PathBuf> {
    let dir = std::env::temp_dir().join(format!("prerender-{}", uuid::Uuid::new_v4()));
    std::fs::create_dir_all(&dir)?;
    let path = dir.join(name);
    std::fs::write(&path, contents)?;
    Ok(path)
}

#[test]
fn test_parse_surface() -> anyhow::Result<()> {
    assert_eq!(parse_surface("interactive")?, (Surface::Interactive, false));
    assert_eq!(parse_surface("email")?, (Surface::Email, false));
    assert_eq!(parse_surface("preview")?, (Surface::Preview, false));
    assert_eq!(parse_surface("summary")?, (Surface::Preview, true));
    assert!(parse_surface("pdf").is_err());
    Ok(())
}

#[test]
fn test_markdown_input_uses_configured_organization() -> anyhow::Result<()> {
    let path = write_input("Release Notes.md", "# Hello\n\nWorld")?;
    let config = config(&[("RENDER_ORGANIZATION_NAME", "Acme Inc")]);
    let article = load_article(&path, &config)?;
    assert_eq!(article.title, "Release Notes");
    assert_eq!(article.slug, "release-notes");
    assert_eq!(article.body, "# Hello\n\nWorld");
    assert_eq!(article.organization.slug, "acme-inc");
    Ok(())
}

#[test]
fn test_json_input_is_decoded() -> anyhow::Result<()> {
    let expected = article("Body from JSON");
    let path = write_input("article.json", &serde_json::to_string(&expected)?)?;
    assert_eq!(load_article(&path, &config(&[]))?, expected);

    let broken = write_input("broken.json", "{")?;
    assert!(load_article(&broken, &config(&[])).is_err());
    Ok(())
}

#[test]
fn test_missing_input_is_an_error() {
    let missing = std::env::temp_dir().join("prerender-does-not-exist.md");
    let error = load_article(&missing, &config(&[])).expect_err("missing file");
    assert!(format!("{error:#}").contains("prerender-does-not-exist.md"));
}

#[tokio::test]
async fn test_render_every_surface() -> anyhow::Result<()> {
    init_tracing();
    let config = config(&[("RENDER_BASE_URL", "https://polar.example")]);
    let ctx = render_context(
        article("Intro\n\n---\n\n<Paywall>\n\nSecret\n\n</Paywall>"),
        &config,
    );
    assert!(api_client(&config).is_none());

    let email = render(Surface::Email, false, &ctx, None).await;
    assert!(email.starts_with("<p>Intro</p>"));
    assert!(email.contains("https://polar.example/acme/subscriptions"));

    let summary = render(Surface::Preview, true, &ctx, None).await;
    assert_eq!(summary, "Intro");

    let page = render(Surface::Interactive, false, &ctx, None).await;
    assert!(page.contains("paywall-cta"));
    assert!(!page.contains("Secret"));
    Ok(())
}

#[test]
fn test_api_client_from_config() {
    let config = config(&[
        ("API_BASE_URL", "http://localhost:8000/"),
        ("API_ACCESS_TOKEN", "token"),
    ]);
    let client = api_client(&config).expect("client");
    assert_eq!(client.address, "http://localhost:8000");
    assert!(client.access_token.is_some());
}
