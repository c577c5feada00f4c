use std::path::PathBuf;

use anyhow::Context;
use prerender::{
    Config, api_client, load_article, parse_surface, render, render_context,
    telemetry::{get_subscriber, init_subscriber, log_error},
};

/// Usage: prerender <interactive|preview|summary|email> <article.json|body.md>
///
/// Variables are read from the environment or a `.env` file, see
/// [`Config`].
#[tokio::main]
async fn main() -> std::process::ExitCode {
    // Load environment variables from .env file if available
    let _ = dotenvy::dotenv();

    let subscriber = get_subscriber("info".into());
    if let Err(e) = init_subscriber(subscriber) {
        eprintln!("failed to install logger: {e:#}");
    }

    match run().await {
        Ok(output) => {
            println!("{output}");
            std::process::ExitCode::SUCCESS
        }
        Err(e) => {
            log_error(e);
            std::process::ExitCode::FAILURE
        }
    }
}

async fn run() -> anyhow::Result<String> {
    let mut args = std::env::args().skip(1);
    let surface = args.next().context("missing surface argument")?;
    let path: PathBuf = args.next().context("missing input file argument")?.into();
    let (surface, abbreviate) = parse_surface(&surface)?;

    let config = Config::from_env();
    let article = load_article(&path, &config)?;
    let ctx = render_context(article, &config);
    let client = api_client(&config);
    Ok(render(surface, abbreviate, &ctx, client.as_ref()).await)
}
