use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};

use spa_search::config::{load_config, load_config_file, SpaSearchConfig};
use spa_search::render::{render_results, render_suggestions, CardOptions};
use spa_search::search::{fetch_suggestions, run_submitted};
use spa_search::view::{SearchView, SnapshotView};
use spa_search::AppState;

const USAGE: &str = "usage: spa-search [--base-url URL] [--config PATH] <suggest QUERY | search QUERY | watch>";

#[derive(Debug, Default)]
struct CliArgs {
    base_url: Option<String>,
    config: Option<PathBuf>,
    command: Vec<String>,
}

fn parse_args() -> CliArgs {
    let mut out = CliArgs::default();
    let mut args = std::env::args().skip(1);
    while let Some(a) = args.next() {
        if a == "--base-url" {
            out.base_url = args.next();
        } else if let Some(rest) = a.strip_prefix("--base-url=") {
            out.base_url = Some(rest.to_string());
        } else if a == "--config" {
            out.config = args.next().map(PathBuf::from);
        } else if let Some(rest) = a.strip_prefix("--config=") {
            out.config = Some(PathBuf::from(rest));
        } else {
            out.command.push(a);
        }
    }
    out
}

/// Prints every view mutation; the HTML goes to stdout, logs to stderr.
struct ConsoleView {
    inner: SnapshotView,
}

impl SearchView for ConsoleView {
    fn set_query_text(&self, text: &str) {
        self.inner.set_query_text(text);
        println!("[input] {}", text);
    }

    fn show_suggestions(&self, html: &str) {
        self.inner.show_suggestions(html);
        println!("[suggestions]\n{}", html);
    }

    fn hide_suggestions(&self) {
        if self.inner.snapshot().suggestions_active {
            println!("[suggestions hidden]");
        }
        self.inner.hide_suggestions();
    }

    fn show_results(&self, html: &str) {
        self.inner.show_results(html);
        println!("[results]\n{}", html);
    }

    fn hide_results(&self) {
        self.inner.hide_results();
    }

    fn set_default_listing_visible(&self, visible: bool) {
        if self.inner.snapshot().default_listing_visible() != visible {
            println!(
                "[default listing {}]",
                if visible { "shown" } else { "hidden" }
            );
        }
        self.inner.set_default_listing_visible(visible);
    }
}

async fn watch(state: &AppState) -> anyhow::Result<()> {
    let view = Arc::new(ConsoleView {
        inner: SnapshotView::new(),
    });
    let session = state.new_session(view.clone());
    let debounce = state.session_settings().debounce;

    info!("watching stdin; each line is the search field's content (:submit, :select N, :clear, :dismiss, :quit)");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let cmd = line.trim();
        if cmd == ":quit" {
            break;
        } else if cmd == ":submit" {
            let query = view.inner.snapshot().query_text;
            session.submit(&query).await;
        } else if cmd == ":clear" {
            view.inner.set_query_text("");
            session.on_input("").await;
        } else if cmd == ":dismiss" {
            session.dismiss().await;
        } else if let Some(n) = cmd.strip_prefix(":select") {
            match n.trim().parse::<usize>() {
                Ok(index) => {
                    if session.select(index).await.is_none() {
                        warn!("no suggestion row {} is showing", index);
                    }
                }
                Err(_) => warn!("usage: :select N"),
            }
        } else {
            view.inner.set_query_text(&line);
            session.on_input(&line).await;
        }
    }

    // Let the last debounced keystroke land before exiting.
    tokio::time::sleep(debounce + Duration::from_millis(100)).await;
    info!("final phase: {:?}", session.phase().await);
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let args = parse_args();
    let mut config: SpaSearchConfig = match &args.config {
        Some(path) => load_config_file(path)?,
        None => load_config(),
    };
    if let Some(url) = args.base_url {
        config.base_url = Some(url);
    }

    let state = AppState::from_config(config)?;
    info!("using search backend at {}", state.config.resolve_base_url());

    let (command, rest) = match args.command.split_first() {
        Some((c, rest)) => (c.as_str(), rest.join(" ")),
        None => anyhow::bail!(USAGE),
    };
    let query = rest.trim().to_string();

    match command {
        "suggest" => {
            if query.is_empty() {
                anyhow::bail!(USAGE);
            }
            let min_chars = state.config.resolve_min_query_chars();
            if query.chars().count() < min_chars {
                warn!("suggestions need at least {} characters", min_chars);
                return Ok(());
            }
            let items = fetch_suggestions(state.backend.as_ref(), &query).await?;
            println!("{}", render_suggestions(&items, &query));
        }
        "search" => {
            if query.is_empty() {
                anyhow::bail!(USAGE);
            }
            let results = run_submitted(state.backend.as_ref(), &query).await;
            let cards = CardOptions::from_config(&state.config);
            println!("{}", render_results(&results, &query, &cards));
        }
        "watch" => watch(&state).await?,
        other => anyhow::bail!("unknown command '{}'\n{}", other, USAGE),
    }

    Ok(())
}
