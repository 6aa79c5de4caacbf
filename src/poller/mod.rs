//! Fixed-interval polling of dashboard feeds.
//!
//! Each feed gets its own task and timer. A failed request marks the feed
//! unavailable and waits for the next tick; there is no early retry. Dropping
//! the [`PollerHandle`] cancels every task.

pub mod client;
pub mod render;

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::config::DashboardConfig;

pub use client::{FeedClient, PollError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Feed {
    TotalInventory,
    OverallUtilization,
    AvailableStorage,
    WarehouseUtilization,
    WarehouseDetails,
    Forecast,
    Optimization,
}

impl Feed {
    pub fn title(&self) -> &'static str {
        match self {
            Self::TotalInventory => "Total Inventory",
            Self::OverallUtilization => "Overall Utilization",
            Self::AvailableStorage => "Available Storage",
            Self::WarehouseUtilization => "Utilization by Warehouse",
            Self::WarehouseDetails => "Warehouses",
            Self::Forecast => "Demand Forecast",
            Self::Optimization => "Transfer Recommendations",
        }
    }

    /// Path on the InvenX API, or `None` for externally hosted services.
    pub fn api_path(&self) -> Option<&'static str> {
        match self {
            Self::TotalInventory => Some("/api/total-inventory"),
            Self::OverallUtilization => Some("/api/overall-utilization"),
            Self::AvailableStorage => Some("/api/available-storage"),
            Self::WarehouseUtilization => Some("/api/warehouse-utilization"),
            Self::WarehouseDetails => Some("/api/warehouse-details"),
            Self::Forecast | Self::Optimization => None,
        }
    }
}

/// A feed and the URL it is polled from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedSource {
    pub feed: Feed,
    pub url: String,
}

impl FeedSource {
    pub fn new(feed: Feed, url: impl Into<String>) -> Self {
        Self {
            feed,
            url: url.into(),
        }
    }

    /// All API feeds, plus the external services that are configured.
    pub fn from_config(config: &DashboardConfig) -> Vec<FeedSource> {
        let mut sources: Vec<FeedSource> = [
            Feed::TotalInventory,
            Feed::OverallUtilization,
            Feed::AvailableStorage,
            Feed::WarehouseUtilization,
            Feed::WarehouseDetails,
        ]
        .into_iter()
        .filter_map(|feed| {
            feed.api_path()
                .map(|path| FeedSource::new(feed, format!("{}{path}", config.api_url)))
        })
        .collect();

        if let Some(url) = &config.forecast_service_url {
            sources.push(FeedSource::new(Feed::Forecast, url.clone()));
        }
        if let Some(url) = &config.optimization_service_url {
            sources.push(FeedSource::new(Feed::Optimization, url.clone()));
        }
        sources
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum FeedState {
    Loading,
    Ready(Value),
    Unavailable,
}

static LOADING: FeedState = FeedState::Loading;

/// Latest known state of every polled feed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DashboardState {
    feeds: BTreeMap<Feed, FeedState>,
}

impl DashboardState {
    pub fn loading<'a>(feeds: impl IntoIterator<Item = &'a Feed>) -> Self {
        Self {
            feeds: feeds.into_iter().map(|f| (*f, FeedState::Loading)).collect(),
        }
    }

    /// Feeds that were never polled read as loading.
    pub fn get(&self, feed: Feed) -> &FeedState {
        self.feeds.get(&feed).unwrap_or(&LOADING)
    }

    pub fn feeds(&self) -> impl Iterator<Item = (&Feed, &FeedState)> {
        self.feeds.iter()
    }

    /// Record a new state, returning whether anything changed.
    pub fn set(&mut self, feed: Feed, state: FeedState) -> bool {
        match self.feeds.get(&feed) {
            Some(current) if *current == state => false,
            _ => {
                self.feeds.insert(feed, state);
                true
            }
        }
    }
}

pub struct Poller {
    client: FeedClient,
    sources: Vec<FeedSource>,
    interval: Duration,
}

impl Poller {
    pub fn new(client: FeedClient, sources: Vec<FeedSource>, interval: Duration) -> Self {
        Self {
            client,
            sources,
            interval,
        }
    }

    /// Start one polling task per feed. The first poll of each feed happens immediately.
    pub fn spawn(self) -> PollerHandle {
        let Self {
            client,
            sources,
            interval,
        } = self;
        let initial = DashboardState::loading(sources.iter().map(|s| &s.feed));
        let (tx, rx) = watch::channel(initial);
        let tx = Arc::new(tx);

        let tasks = sources
            .into_iter()
            .map(|source| tokio::spawn(poll_feed(client.clone(), source, interval, Arc::clone(&tx))))
            .collect();

        tracing::info!(interval_secs = interval.as_secs_f64(), "Dashboard polling started");
        PollerHandle { tasks, state: rx }
    }
}

async fn poll_feed(
    client: FeedClient,
    source: FeedSource,
    period: Duration,
    tx: Arc<watch::Sender<DashboardState>>,
) {
    let mut ticker = tokio::time::interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        ticker.tick().await;
        let state = match client.fetch(&source.url).await {
            Ok(body) => {
                tracing::debug!(feed = ?source.feed, "Feed refreshed");
                FeedState::Ready(body)
            }
            Err(e) => {
                tracing::warn!(feed = ?source.feed, url = %source.url, error = %e, "Feed poll failed");
                FeedState::Unavailable
            }
        };
        tx.send_if_modified(|dashboard| dashboard.set(source.feed, state));
    }
}

/// Owns the polling tasks; dropping it cancels them.
#[derive(Debug)]
pub struct PollerHandle {
    tasks: Vec<JoinHandle<()>>,
    state: watch::Receiver<DashboardState>,
}

impl PollerHandle {
    pub fn subscribe(&self) -> watch::Receiver<DashboardState> {
        self.state.clone()
    }

    pub fn current(&self) -> DashboardState {
        self.state.borrow().clone()
    }

    /// Cancel every timer and wait for the tasks to stop.
    pub async fn shutdown(mut self) {
        let tasks = std::mem::take(&mut self.tasks);
        for task in &tasks {
            task.abort();
        }
        for task in tasks {
            // Aborted tasks resolve to a cancellation error.
            let _ = task.await;
        }
        tracing::info!("Dashboard polling stopped");
    }
}

impl Drop for PollerHandle {
    fn drop(&mut self) {
        for task in &self.tasks {
            task.abort();
        }
    }
}
