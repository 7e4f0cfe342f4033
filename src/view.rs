//! Turns sorted players into what the table and chart draw.

use crate::{
    model::Player,
    sort::{Column, SortState},
};

pub const CHART_LIMIT: usize = 10;

#[derive(Debug, Clone, PartialEq)]
pub struct TableRow {
    pub rank: usize,
    /// One formatted cell per entry of [`Column::ALL`].
    pub cells: Vec<String>,
    pub is_live: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChartBar {
    pub label: String,
    pub score: f64,
    pub is_live: bool,
}

pub fn header_label(column: Column, sort: &SortState) -> String {
    if column == sort.column {
        format!("{} {}", column.header(), sort.direction.arrow())
    } else {
        column.header().to_string()
    }
}

pub fn format_cell(player: &Player, column: Column) -> String {
    match column {
        Column::PlayerName => player.player_name.clone(),
        Column::Team => player.team.clone(),
        Column::Minutes => player.minutes.to_string(),
        Column::Points => player.points.to_string(),
        Column::Rebounds => player.rebounds.to_string(),
        Column::Assists => player.assists.to_string(),
        Column::Steals => player.steals.to_string(),
        Column::Blocks => player.blocks.to_string(),
        Column::Turnovers => player.turnovers.to_string(),
        Column::FieldGoalMade => player.field_goal_made.to_string(),
        Column::FieldGoalAttempts => player.field_goal_attempts.to_string(),
        Column::ThreePointMade => player.three_point_made.to_string(),
        Column::ThreePointAttempts => player.three_point_attempts.to_string(),
        Column::PersonalFouls => player.personal_fouls.to_string(),
        Column::PlusMinus => {
            if player.plus_minus.as_f64() > 0.0 {
                format!("+{}", player.plus_minus.to_string().trim_start_matches('+'))
            } else {
                player.plus_minus.to_string()
            }
        }
        Column::CustomScore => format!("{:.2}", player.custom_score),
    }
}

pub fn table_rows(players: &[Player]) -> Vec<TableRow> {
    players
        .iter()
        .enumerate()
        .map(|(i, p)| TableRow {
            rank: i + 1,
            cells: Column::ALL.iter().map(|&c| format_cell(p, c)).collect(),
            is_live: p.is_live,
        })
        .collect()
}

/// The first [`CHART_LIMIT`] players, reversed: bars run bottom-up so the
/// leader ends up on top.
pub fn chart_bars(players: &[Player]) -> Vec<ChartBar> {
    players
        .iter()
        .take(CHART_LIMIT)
        .rev()
        .map(|p| ChartBar {
            label: format!("{} ({})", p.player_name, p.team),
            score: p.custom_score,
            is_live: p.is_live,
        })
        .collect()
}
