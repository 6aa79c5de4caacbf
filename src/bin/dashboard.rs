//! Terminal dashboard that polls the InvenX API and redraws its cards.
//!
//! Usage: `cargo run --bin dashboard`
//!
//! Reads `INVENX_API_URL`, `POLL_INTERVAL_SECS` and the optional external
//! service URLs from the environment (or `.env`).

use invenx::config::DashboardConfig;
use invenx::poller::{render, FeedClient, FeedSource, Poller};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "invenx=info".into()))
        .with(
            tracing_subscriber::fmt::layer()
                .compact()
                .with_writer(std::io::stderr),
        )
        .init();

    let config = DashboardConfig::from_env()?;
    let sources = FeedSource::from_config(&config);
    let handle = Poller::new(
        FeedClient::new(config.request_timeout),
        sources,
        config.poll_interval,
    )
    .spawn();

    let mut rx = handle.subscribe();
    loop {
        let snapshot = rx.borrow_and_update().clone();
        println!("=== INVENX  {} ===", chrono::Local::now().format("%B %-d, %Y %-I:%M %p"));
        print!("{}", render::render_text(&render::cards(&snapshot)));
        println!();

        tokio::select! {
            changed = rx.changed() => {
                if changed.is_err() {
                    break;
                }
            }
            _ = tokio::signal::ctrl_c() => break,
        }
    }

    handle.shutdown().await;
    Ok(())
}
