use std::{cmp::Ordering, fmt, str::FromStr};

use crate::model::Player;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Column {
    PlayerName,
    Team,
    Minutes,
    Points,
    Rebounds,
    Assists,
    Steals,
    Blocks,
    Turnovers,
    FieldGoalMade,
    FieldGoalAttempts,
    ThreePointMade,
    ThreePointAttempts,
    PersonalFouls,
    PlusMinus,
    CustomScore,
}

impl Column {
    /// Sortable columns in table order. The rank column is not one of them.
    pub const ALL: [Column; 16] = [
        Column::PlayerName,
        Column::Team,
        Column::Minutes,
        Column::Points,
        Column::Rebounds,
        Column::Assists,
        Column::Steals,
        Column::Blocks,
        Column::Turnovers,
        Column::FieldGoalMade,
        Column::FieldGoalAttempts,
        Column::ThreePointMade,
        Column::ThreePointAttempts,
        Column::PersonalFouls,
        Column::PlusMinus,
        Column::CustomScore,
    ];

    /// Field name used by the backend.
    pub fn key(self) -> &'static str {
        match self {
            Column::PlayerName => "player_name",
            Column::Team => "team",
            Column::Minutes => "minutes",
            Column::Points => "points",
            Column::Rebounds => "rebounds",
            Column::Assists => "assists",
            Column::Steals => "steals",
            Column::Blocks => "blocks",
            Column::Turnovers => "turnovers",
            Column::FieldGoalMade => "field_goal_made",
            Column::FieldGoalAttempts => "field_goal_attempts",
            Column::ThreePointMade => "three_point_made",
            Column::ThreePointAttempts => "three_point_attempts",
            Column::PersonalFouls => "personal_fouls",
            Column::PlusMinus => "plus_minus",
            Column::CustomScore => "custom_score",
        }
    }

    pub fn header(self) -> &'static str {
        match self {
            Column::PlayerName => "Player",
            Column::Team => "Team",
            Column::Minutes => "MIN",
            Column::Points => "PTS",
            Column::Rebounds => "REB",
            Column::Assists => "AST",
            Column::Steals => "STL",
            Column::Blocks => "BLK",
            Column::Turnovers => "TO",
            Column::FieldGoalMade => "FGM",
            Column::FieldGoalAttempts => "FGA",
            Column::ThreePointMade => "3PM",
            Column::ThreePointAttempts => "3PA",
            Column::PersonalFouls => "PF",
            Column::PlusMinus => "+/-",
            Column::CustomScore => "EPA",
        }
    }

    /// Box-score counters and the score. Minutes, names and teams are not.
    pub fn is_numeric(self) -> bool {
        !matches!(self, Column::PlayerName | Column::Team | Column::Minutes)
    }

    pub fn default_direction(self) -> SortDirection {
        if self.is_numeric() {
            SortDirection::Descending
        } else {
            SortDirection::Ascending
        }
    }

    fn sort_key(self, player: &Player) -> SortKey<'_> {
        match self {
            Column::PlayerName => SortKey::Text(&player.player_name),
            Column::Team => SortKey::Text(&player.team),
            Column::Minutes => SortKey::Number(minutes_to_seconds(&player.minutes.to_string()) as f64),
            Column::Points => SortKey::Number(player.points.as_f64()),
            Column::Rebounds => SortKey::Number(player.rebounds.as_f64()),
            Column::Assists => SortKey::Number(player.assists.as_f64()),
            Column::Steals => SortKey::Number(player.steals.as_f64()),
            Column::Blocks => SortKey::Number(player.blocks.as_f64()),
            Column::Turnovers => SortKey::Number(player.turnovers.as_f64()),
            Column::FieldGoalMade => SortKey::Number(player.field_goal_made.as_f64()),
            Column::FieldGoalAttempts => SortKey::Number(player.field_goal_attempts.as_f64()),
            Column::ThreePointMade => SortKey::Number(player.three_point_made.as_f64()),
            Column::ThreePointAttempts => SortKey::Number(player.three_point_attempts.as_f64()),
            Column::PersonalFouls => SortKey::Number(player.personal_fouls.as_f64()),
            Column::PlusMinus => SortKey::Number(player.plus_minus.as_f64()),
            Column::CustomScore => SortKey::Number(player.custom_score),
        }
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Column {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Column::ALL
            .into_iter()
            .find(|c| c.key() == wanted || c.header().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| format!("unknown sort column {:?}", s))
    }
}

enum SortKey<'a> {
    Number(f64),
    Text(&'a str),
}

impl SortKey<'_> {
    fn compare(&self, other: &Self) -> Ordering {
        match (self, other) {
            (SortKey::Number(a), SortKey::Number(b)) => a.total_cmp(b),
            (SortKey::Text(a), SortKey::Text(b)) => a.cmp(b),
            _ => Ordering::Equal,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn flipped(self) -> Self {
        match self {
            SortDirection::Ascending => SortDirection::Descending,
            SortDirection::Descending => SortDirection::Ascending,
        }
    }

    pub fn arrow(self) -> &'static str {
        match self {
            SortDirection::Ascending => "↑",
            SortDirection::Descending => "↓",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortState {
    pub column: Column,
    pub direction: SortDirection,
}

impl Default for SortState {
    fn default() -> Self {
        Self::for_column(Column::CustomScore)
    }
}

impl SortState {
    pub fn for_column(column: Column) -> Self {
        Self {
            column,
            direction: column.default_direction(),
        }
    }

    /// Header activation: the active column flips, any other column takes
    /// over with its default direction.
    pub fn select(&mut self, column: Column) {
        if column == self.column {
            self.direction = self.direction.flipped();
        } else {
            *self = Self::for_column(column);
        }
    }

    pub fn compare(&self, a: &Player, b: &Player) -> Ordering {
        let ord = self.column.sort_key(a).compare(&self.column.sort_key(b));
        match self.direction {
            SortDirection::Ascending => ord,
            SortDirection::Descending => ord.reverse(),
        }
    }

    /// Stable, so equal keys keep their fetch order.
    pub fn sort(&self, players: &mut [Player]) {
        players.sort_by(|a, b| self.compare(a, b));
    }
}

/// "MM:SS" to seconds. A bare number counts as whole minutes; anything
/// unparseable is 0.
pub fn minutes_to_seconds(minutes: &str) -> u32 {
    let minutes = minutes.trim();
    if minutes.is_empty() {
        return 0;
    }
    match minutes.split_once(':') {
        Some((mm, ss)) => match (mm.trim().parse::<u32>(), ss.trim().parse::<u32>()) {
            (Ok(mm), Ok(ss)) => mm.saturating_mul(60).saturating_add(ss),
            _ => 0,
        },
        None => match minutes.parse::<f64>() {
            Ok(m) if m.is_finite() && m > 0.0 => (m.trunc() as u32).saturating_mul(60),
            _ => 0,
        },
    }
}
