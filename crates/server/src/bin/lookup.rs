//! Look up one or more release filenames from the terminal.
//!
//! Prompts for the TMDB API key on first use and prints each outcome as JSON.

use anyhow::{Context, bail};
use marquee_server::config::Config;
use marquee_server::prompt::LinePrompt;
use marquee_server::state::{build_session, open_db};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .with_writer(std::io::stderr)
        .init();

    let filenames: Vec<String> = std::env::args().skip(1).collect();
    if filenames.is_empty() {
        bail!("usage: marquee-lookup <filename>...");
    }

    let config = Config::from_env();
    let pool = open_db(&config.db_path)
        .await
        .context("failed to open database")?;
    let session = build_session(&pool, &config);
    if let Some(key) = &config.tmdb_key {
        session.set_credential(key).await?;
    }

    let prompt = LinePrompt::stdin();
    for filename in &filenames {
        let outcome = session.lookup_row(filename, &prompt).await?;
        println!("{}", serde_json::to_string_pretty(&outcome)?);
    }
    Ok(())
}
