//! The dashboard view-model.
//!
//! Owns both player collections, the sort state, which view is active and
//! what the status area says. Only the UI loop touches it; background tasks
//! talk to it through [`Update`] messages.

use chrono::{DateTime, Local};
use tracing::{debug, warn};

use crate::{
    data::Endpoint,
    error::FetchError,
    model::Player,
    sort::{Column, SortState},
};

pub const COMPLETED_DESCRIPTION: &str = "Top performers from games in the last 12 hours";
pub const LIVE_DESCRIPTION: &str = "Top performers from live games";
pub const NO_COMPLETED_DATA: &str = "No completed games data available";
pub const LOADING: &str = "Loading player data...";

/// Results delivered by the polling tasks.
#[derive(Debug)]
pub enum Update {
    Players {
        completed: Result<Vec<Player>, FetchError>,
        live: Result<Vec<Player>, FetchError>,
    },
    LivePlayers(Result<Vec<Player>, FetchError>),
    LastUpdate(Result<DateTime<Local>, FetchError>),
    RefreshFailed(FetchError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataView {
    Completed,
    Live,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Status {
    Idle,
    Loading,
    Error(String),
}

#[derive(Debug)]
pub struct Dashboard {
    completed: Vec<Player>,
    live: Vec<Player>,
    sort: SortState,
    view: DataView,
    status: Status,
    // The error on display came only from the live endpoint.
    live_error: bool,
    last_update: Option<DateTime<Local>>,
}

impl Default for Dashboard {
    fn default() -> Self {
        Self::new(SortState::default())
    }
}

impl Dashboard {
    pub fn new(sort: SortState) -> Self {
        Self {
            completed: Vec::new(),
            live: Vec::new(),
            sort,
            view: DataView::Completed,
            status: Status::Loading,
            live_error: false,
            last_update: None,
        }
    }

    pub fn sort(&self) -> SortState {
        self.sort
    }

    pub fn status(&self) -> &Status {
        &self.status
    }

    pub fn last_update(&self) -> Option<DateTime<Local>> {
        self.last_update
    }

    pub fn live_available(&self) -> bool {
        !self.live.is_empty()
    }

    /// The view actually on screen: Live only while there is live data.
    pub fn active_view(&self) -> DataView {
        if self.view == DataView::Live && self.live_available() {
            DataView::Live
        } else {
            DataView::Completed
        }
    }

    pub fn description(&self) -> &'static str {
        match self.active_view() {
            DataView::Live => LIVE_DESCRIPTION,
            DataView::Completed => COMPLETED_DESCRIPTION,
        }
    }

    pub fn select_column(&mut self, column: Column) {
        self.sort.select(column);
        debug!(column = %self.sort.column, direction = ?self.sort.direction, "sort changed");
    }

    pub fn toggle_view(&mut self) {
        self.view = match self.active_view() {
            DataView::Completed if self.live_available() => DataView::Live,
            _ => DataView::Completed,
        };
    }

    /// Marks a manual refresh as in flight and says which recompute
    /// endpoint it should hit.
    pub fn begin_refresh(&mut self) -> Endpoint {
        self.status = Status::Loading;
        self.live_error = false;
        match self.active_view() {
            DataView::Live => Endpoint::RefreshLive,
            DataView::Completed => Endpoint::Refresh,
        }
    }

    pub fn visible_len(&self) -> usize {
        match self.active_view() {
            DataView::Live => self.live.len(),
            DataView::Completed => self.completed.len(),
        }
    }

    /// Players of the active view in current sort order, or `None` when
    /// there is nothing to show.
    pub fn visible_players(&self) -> Option<Vec<Player>> {
        let source = match self.active_view() {
            DataView::Live => &self.live,
            DataView::Completed => &self.completed,
        };
        if source.is_empty() {
            return None;
        }
        let mut players = source.clone();
        self.sort.sort(&mut players);
        Some(players)
    }

    pub fn apply(&mut self, update: Update) {
        match update {
            Update::Players { completed, live } => self.apply_players(completed, live),
            Update::LivePlayers(live) => self.apply_live(live),
            Update::LastUpdate(Ok(ts)) => self.last_update = Some(ts),
            Update::LastUpdate(Err(e)) => warn!(error = %e, "failed to fetch last update time"),
            Update::RefreshFailed(e) => {
                warn!(error = %e, "manual refresh failed");
                self.status = Status::Error(format!("Error refreshing data: {}", e));
                self.live_error = false;
            }
        }
    }

    fn apply_players(
        &mut self,
        completed: Result<Vec<Player>, FetchError>,
        live: Result<Vec<Player>, FetchError>,
    ) {
        let mut errors = Vec::new();
        let mut live_failed = false;

        self.completed = completed.unwrap_or_else(|e| {
            warn!(error = %e, "completed games fetch failed");
            errors.push(e.to_string());
            Vec::new()
        });
        self.live = live.unwrap_or_else(|e| {
            if e.is_backend() {
                debug!(error = %e, "no live games");
            } else {
                warn!(error = %e, "live games fetch failed");
                errors.push(e.to_string());
                live_failed = true;
            }
            Vec::new()
        });
        self.live_error = live_failed && errors.len() == 1;

        self.view = if self.live_available() {
            DataView::Live
        } else {
            DataView::Completed
        };
        self.status = if errors.is_empty() {
            Status::Idle
        } else {
            Status::Error(format!("Error loading data: {}", errors.join("; ")))
        };
        debug!(
            completed = self.completed.len(),
            live = self.live.len(),
            view = ?self.view,
            "player data replaced"
        );
    }

    fn apply_live(&mut self, live: Result<Vec<Player>, FetchError>) {
        self.live = match live {
            Err(e) if !e.is_backend() => {
                warn!(error = %e, "live games fetch failed");
                if !matches!(self.status, Status::Error(_)) || self.live_error {
                    self.status = Status::Error(format!("Error loading data: {}", e));
                    self.live_error = true;
                }
                Vec::new()
            }
            other => {
                if self.live_error {
                    self.status = Status::Idle;
                    self.live_error = false;
                }
                other.unwrap_or_else(|e| {
                    debug!(error = %e, "no live games");
                    Vec::new()
                })
            }
        };
        if !self.live_available() && self.view == DataView::Live {
            self.view = DataView::Completed;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sort::SortDirection;

    fn player(name: &str, score: f64) -> Player {
        Player {
            player_name: name.into(),
            team: "PHX".into(),
            minutes: "30:00".into(),
            custom_score: score,
            ..Default::default()
        }
    }

    fn live_player(name: &str, score: f64) -> Player {
        Player { is_live: true, ..player(name, score) }
    }

    fn backend_failure() -> FetchError {
        FetchError::Backend {
            endpoint: "/api/live-games",
            message: "No data available".into(),
        }
    }

    fn loaded(completed: Vec<Player>, live: Vec<Player>) -> Dashboard {
        let mut dash = Dashboard::default();
        dash.apply(Update::Players { completed: Ok(completed), live: Ok(live) });
        dash
    }

    #[test]
    fn test_default_load_ranks_highest_score_first() {
        let dash = loaded(vec![player("B", 12.0), player("A", 30.5)], vec![]);
        let players = dash.visible_players().expect("players should be visible");
        assert_eq!(players[0].player_name, "A");
        assert_eq!(players[1].player_name, "B");
        assert_eq!(dash.status(), &Status::Idle);
    }

    #[test]
    fn test_empty_data_shows_nothing() {
        let dash = loaded(vec![], vec![]);
        assert!(dash.visible_players().is_none());
        assert_eq!(dash.active_view(), DataView::Completed);
        assert_eq!(dash.description(), COMPLETED_DESCRIPTION);
    }

    #[test]
    fn test_live_data_selects_live_view() {
        let dash = loaded(vec![player("C", 1.0)], vec![live_player("L", 2.0)]);
        assert!(dash.live_available());
        assert_eq!(dash.active_view(), DataView::Live);
        assert_eq!(dash.description(), LIVE_DESCRIPTION);
        let players = dash.visible_players().expect("players should be visible");
        assert!(players.iter().all(|p| p.is_live));
    }

    #[test]
    fn test_toggle_view() {
        let mut dash = loaded(vec![player("C", 1.0)], vec![live_player("L", 2.0)]);
        dash.toggle_view();
        assert_eq!(dash.active_view(), DataView::Completed);
        dash.toggle_view();
        assert_eq!(dash.active_view(), DataView::Live);

        let mut no_live = loaded(vec![player("C", 1.0)], vec![]);
        no_live.toggle_view();
        assert_eq!(no_live.active_view(), DataView::Completed);
    }

    #[test]
    fn test_live_refresh_falls_back_when_games_end() {
        let mut dash = loaded(vec![player("C", 1.0)], vec![live_player("L", 2.0)]);
        dash.apply(Update::LivePlayers(Err(backend_failure())));
        assert!(!dash.live_available());
        assert_eq!(dash.active_view(), DataView::Completed);
        assert_eq!(dash.status(), &Status::Idle);

        dash.apply(Update::LivePlayers(Ok(vec![live_player("M", 3.0)])));
        assert!(dash.live_available());
        assert_eq!(dash.active_view(), DataView::Completed);
    }

    fn transport_failure() -> FetchError {
        FetchError::Request {
            endpoint: "/api/live-games",
            source: reqwest::Client::new()
                .get("not a url")
                .build()
                .unwrap_err(),
        }
    }

    #[test]
    fn test_live_error_clears_on_next_live_success() {
        let mut dash = loaded(vec![player("C", 1.0)], vec![live_player("L", 2.0)]);
        dash.apply(Update::LivePlayers(Err(transport_failure())));
        assert!(matches!(dash.status(), Status::Error(msg) if msg.contains("/api/live-games")));

        dash.apply(Update::LivePlayers(Ok(vec![live_player("M", 3.0)])));
        assert_eq!(dash.status(), &Status::Idle);
        assert!(dash.live_available());
    }

    #[test]
    fn test_live_success_keeps_completed_error() {
        let mut dash = Dashboard::default();
        dash.apply(Update::Players {
            completed: Err(FetchError::Backend {
                endpoint: "/api/top-scorers",
                message: "No data available".into(),
            }),
            live: Err(transport_failure()),
        });
        dash.apply(Update::LivePlayers(Err(transport_failure())));
        dash.apply(Update::LivePlayers(Ok(vec![live_player("M", 3.0)])));
        assert!(matches!(dash.status(), Status::Error(msg) if msg.contains("/api/top-scorers")));
    }

    #[test]
    fn test_live_error_from_full_load_clears_on_live_success() {
        let mut dash = Dashboard::default();
        dash.apply(Update::Players {
            completed: Ok(vec![player("C", 1.0)]),
            live: Err(transport_failure()),
        });
        assert!(matches!(dash.status(), Status::Error(_)));
        dash.apply(Update::LivePlayers(Err(backend_failure())));
        assert_eq!(dash.status(), &Status::Idle);
    }

    #[test]
    fn test_completed_failure_resets_and_reports() {
        let mut dash = loaded(vec![player("C", 1.0)], vec![]);
        dash.apply(Update::Players {
            completed: Err(FetchError::Backend {
                endpoint: "/api/top-scorers",
                message: "No data available".into(),
            }),
            live: Ok(vec![]),
        });
        assert!(dash.visible_players().is_none());
        assert_eq!(
            dash.status(),
            &Status::Error("Error loading data: /api/top-scorers: No data available".into())
        );
    }

    #[test]
    fn test_refresh_endpoint_follows_view() {
        let mut dash = loaded(vec![player("C", 1.0)], vec![live_player("L", 2.0)]);
        assert_eq!(dash.begin_refresh(), Endpoint::RefreshLive);
        assert_eq!(dash.status(), &Status::Loading);
        dash.toggle_view();
        assert_eq!(dash.begin_refresh(), Endpoint::Refresh);
    }

    #[test]
    fn test_refresh_failure_message() {
        let mut dash = loaded(vec![player("C", 1.0)], vec![]);
        dash.begin_refresh();
        dash.apply(Update::RefreshFailed(FetchError::Backend {
            endpoint: "/refresh",
            message: "Failed to update data".into(),
        }));
        assert_eq!(
            dash.status(),
            &Status::Error("Error refreshing data: /refresh: Failed to update data".into())
        );
        assert!(dash.visible_players().is_some());
    }

    #[test]
    fn test_select_column_resorts() {
        let mut dash = loaded(vec![player("B", 12.0), player("A", 30.5)], vec![]);
        dash.select_column(Column::CustomScore);
        assert_eq!(dash.sort().direction, SortDirection::Ascending);
        let players = dash.visible_players().expect("players should be visible");
        assert_eq!(players[0].player_name, "B");
    }
}
