use std::time::Duration;

use anyhow::{Context, Result};
use chrono::{DateTime, Local, NaiveDateTime, TimeZone};
use reqwest::Client;
use serde::de::DeserializeOwned;
use tracing::{debug, info};

use crate::{
    error::FetchError,
    model::{
        active_live_players, active_players, ApiStatus, LastUpdateResponse, Player,
        PlayersResponse, RefreshResponse,
    },
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    TopScorers,
    LiveGames,
    LastUpdate,
    Refresh,
    RefreshLive,
}

impl Endpoint {
    pub fn path(self) -> &'static str {
        match self {
            Endpoint::TopScorers => "/api/top-scorers",
            Endpoint::LiveGames => "/api/live-games",
            Endpoint::LastUpdate => "/api/last-update",
            Endpoint::Refresh => "/refresh",
            Endpoint::RefreshLive => "/refresh-live",
        }
    }
}

#[derive(Debug)]
pub struct DataClient {
    client: Client,
    base_url: String,
}

impl DataClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .context("failed to build HTTP client")?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    async fn get_json<T: DeserializeOwned>(&self, endpoint: Endpoint) -> Result<T, FetchError> {
        let url = format!("{}{}", self.base_url, endpoint.path());
        let request_failed = |source| FetchError::Request {
            endpoint: endpoint.path(),
            source,
        };
        let resp = self
            .client
            .get(&url)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(request_failed)?;
        resp.json::<T>().await.map_err(request_failed)
    }

    async fn fetch_players(&self, endpoint: Endpoint) -> Result<Vec<Player>, FetchError> {
        let data = self.get_json::<PlayersResponse>(endpoint).await?;
        ensure_success(endpoint, data.status, data.message)?;
        debug!(endpoint = endpoint.path(), players = data.players.len(), "fetched players");
        Ok(data.players)
    }

    /// Completed-game players, minus anyone without minutes.
    pub async fn fetch_top_scorers(&self) -> Result<Vec<Player>, FetchError> {
        Ok(active_players(self.fetch_players(Endpoint::TopScorers).await?))
    }

    /// Live-game players, minus anyone without minutes, flagged live.
    pub async fn fetch_live_games(&self) -> Result<Vec<Player>, FetchError> {
        Ok(active_live_players(self.fetch_players(Endpoint::LiveGames).await?))
    }

    pub async fn fetch_last_update(&self) -> Result<DateTime<Local>, FetchError> {
        let data = self.get_json::<LastUpdateResponse>(Endpoint::LastUpdate).await?;
        ensure_success(Endpoint::LastUpdate, data.status, data.message)?;
        let raw = data.last_update.ok_or_else(|| FetchError::Backend {
            endpoint: Endpoint::LastUpdate.path(),
            message: "response carried no timestamp".to_string(),
        })?;
        parse_timestamp(&raw)
    }

    /// Asks the backend to recompute its data. Only `Refresh` and
    /// `RefreshLive` make sense here.
    pub async fn trigger_refresh(&self, endpoint: Endpoint) -> Result<(), FetchError> {
        let data = self.get_json::<RefreshResponse>(endpoint).await?;
        ensure_success(endpoint, data.status, data.message)?;
        info!(endpoint = endpoint.path(), count = ?data.count, "backend recomputed");
        Ok(())
    }
}

fn ensure_success(
    endpoint: Endpoint,
    status: ApiStatus,
    message: Option<String>,
) -> Result<(), FetchError> {
    match status {
        ApiStatus::Success => Ok(()),
        ApiStatus::Failure => Err(FetchError::Backend {
            endpoint: endpoint.path(),
            message: message.unwrap_or_else(|| "request was not successful".to_string()),
        }),
    }
}

/// RFC 3339, or a naive "YYYY-MM-DD HH:MM:SS[.f]" (with a space or a `T`)
/// read as local time.
pub fn parse_timestamp(raw: &str) -> Result<DateTime<Local>, FetchError> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(dt.with_timezone(&Local));
    }
    ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .and_then(|naive| Local.from_local_datetime(&naive).earliest())
        .ok_or_else(|| FetchError::Timestamp(raw.to_string()))
}
