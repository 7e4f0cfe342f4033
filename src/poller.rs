//! Background polling.
//!
//! Every cadence tick spawns its own fetch task and nothing is ever
//! cancelled, so a slow response may land after a newer one.

use std::{sync::Arc, time::Duration};

use tokio::{
    sync::mpsc,
    task::JoinHandle,
    time::{interval, interval_at, Instant, MissedTickBehavior},
};
use tracing::{info, warn};

use crate::{dashboard::Update, data::DataClient, data::Endpoint};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollIntervals {
    pub full: Duration,
    pub live: Duration,
    pub last_update: Duration,
}

impl Default for PollIntervals {
    fn default() -> Self {
        Self {
            full: Duration::from_secs(5 * 60),
            live: Duration::from_secs(30),
            last_update: Duration::from_secs(60),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Poller {
    client: Arc<DataClient>,
    tx: mpsc::Sender<Update>,
}

impl Poller {
    pub fn new(client: Arc<DataClient>, tx: mpsc::Sender<Update>) -> Self {
        Self { client, tx }
    }

    /// Starts the three cadences. Full data and the timestamp load right
    /// away; the live cadence waits one period first.
    pub fn spawn(&self, intervals: PollIntervals) -> Vec<JoinHandle<()>> {
        let full = self.clone();
        let live = self.clone();
        let stamp = self.clone();
        vec![
            tokio::spawn(async move {
                let mut ticker = interval(intervals.full);
                ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
                loop {
                    ticker.tick().await;
                    tokio::spawn(full.clone().poll_all());
                }
            }),
            tokio::spawn(async move {
                let mut ticker = interval_at(Instant::now() + intervals.live, intervals.live);
                ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
                loop {
                    ticker.tick().await;
                    tokio::spawn(live.clone().poll_live());
                }
            }),
            tokio::spawn(async move {
                let mut ticker = interval(intervals.last_update);
                ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
                loop {
                    ticker.tick().await;
                    tokio::spawn(stamp.clone().poll_last_update());
                }
            }),
        ]
    }

    /// Fetches both collections concurrently and reports them together.
    pub async fn poll_all(self) {
        let (completed, live) = tokio::join!(
            self.client.fetch_top_scorers(),
            self.client.fetch_live_games()
        );
        if let (Ok(c), Ok(l)) = (&completed, &live) {
            info!(completed = c.len(), live = l.len(), "player data loaded");
        }
        self.send(Update::Players { completed, live }).await;
    }

    /// Asks the backend to recompute live stats, then fetches them.
    pub async fn poll_live(self) {
        if let Err(e) = self.client.trigger_refresh(Endpoint::RefreshLive).await {
            warn!(error = %e, "live recompute failed, fetching current live data anyway");
        }
        let live = self.client.fetch_live_games().await;
        self.send(Update::LivePlayers(live)).await;
    }

    pub async fn poll_last_update(self) {
        let ts = self.client.fetch_last_update().await;
        self.send(Update::LastUpdate(ts)).await;
    }

    /// Manual refresh: recompute on the backend, then reload everything.
    pub fn refresh(&self, endpoint: Endpoint) -> JoinHandle<()> {
        let poller = self.clone();
        tokio::spawn(async move {
            match poller.client.trigger_refresh(endpoint).await {
                Ok(()) => poller.poll_all().await,
                Err(e) => poller.send(Update::RefreshFailed(e)).await,
            }
        })
    }

    async fn send(&self, update: Update) {
        // Only fails once the UI loop has gone away.
        let _ = self.tx.send(update).await;
    }
}
