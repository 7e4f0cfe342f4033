use std::fmt;

use serde::{
    de::{self, Visitor},
    Deserialize, Deserializer, Serialize, Serializer,
};

/// A box-score cell as the backend sends it: a number, a numeric string,
/// or nothing at all.
#[derive(Default, Debug, Clone, PartialEq)]
pub enum Stat {
    Number(f64),
    Text(String),
    #[default]
    Missing,
}

impl Stat {
    /// Numeric value of the cell. Malformed or missing values count as 0.
    pub fn as_f64(&self) -> f64 {
        match self {
            Stat::Number(n) => *n,
            Stat::Text(s) => s.trim().parse::<f64>().unwrap_or(0.0),
            Stat::Missing => 0.0,
        }
    }

    /// True for the minute values the dashboard never shows: "0:00", "0",
    /// "", a literal zero, or no value.
    pub fn is_zero_minutes(&self) -> bool {
        match self {
            Stat::Number(n) => *n == 0.0,
            Stat::Text(s) => s == "0:00" || s == "0" || s.is_empty(),
            Stat::Missing => true,
        }
    }
}

impl fmt::Display for Stat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stat::Number(n) if n.fract() == 0.0 && n.is_finite() => write!(f, "{}", *n as i64),
            Stat::Number(n) => write!(f, "{}", n),
            Stat::Text(s) => f.write_str(s),
            Stat::Missing => f.write_str("-"),
        }
    }
}

impl From<&str> for Stat {
    fn from(s: &str) -> Self {
        Stat::Text(s.to_string())
    }
}

impl Serialize for Stat {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Stat::Number(n) => serializer.serialize_f64(*n),
            Stat::Text(s) => serializer.serialize_str(s),
            Stat::Missing => serializer.serialize_none(),
        }
    }
}

struct StatVisitor;

impl<'de> Visitor<'de> for StatVisitor {
    type Value = Stat;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a number, a string or null")
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Stat, E> {
        Ok(Stat::Number(v as f64))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Stat, E> {
        Ok(Stat::Number(v as f64))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Stat, E> {
        Ok(Stat::Number(v))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Stat, E> {
        Ok(Stat::Text(v.to_string()))
    }

    fn visit_string<E: de::Error>(self, v: String) -> Result<Stat, E> {
        Ok(Stat::Text(v))
    }

    fn visit_unit<E: de::Error>(self) -> Result<Stat, E> {
        Ok(Stat::Missing)
    }

    fn visit_none<E: de::Error>(self) -> Result<Stat, E> {
        Ok(Stat::Missing)
    }

    fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<Stat, D::Error> {
        deserializer.deserialize_any(StatVisitor)
    }
}

impl<'de> Deserialize<'de> for Stat {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(StatVisitor)
    }
}

#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    #[serde(default)]
    pub player_name: String,
    #[serde(default)]
    pub team: String,
    #[serde(default)]
    pub minutes: Stat,
    #[serde(default)]
    pub points: Stat,
    #[serde(default)]
    pub rebounds: Stat,
    #[serde(default)]
    pub assists: Stat,
    #[serde(default)]
    pub steals: Stat,
    #[serde(default)]
    pub blocks: Stat,
    #[serde(default)]
    pub turnovers: Stat,
    #[serde(default)]
    pub field_goal_made: Stat,
    #[serde(default)]
    pub field_goal_attempts: Stat,
    #[serde(default)]
    pub three_point_made: Stat,
    #[serde(default)]
    pub three_point_attempts: Stat,
    #[serde(default)]
    pub personal_fouls: Stat,
    #[serde(default)]
    pub plus_minus: Stat,
    #[serde(default)]
    pub custom_score: f64,
    // Set client-side on everything that came from the live endpoint.
    #[serde(default, rename = "isLive")]
    pub is_live: bool,
}

/// Drops players who have not logged any minutes.
pub fn active_players(players: Vec<Player>) -> Vec<Player> {
    players
        .into_iter()
        .filter(|p| !p.minutes.is_zero_minutes())
        .collect()
}

/// Like [`active_players`], additionally flagging every record as live.
pub fn active_live_players(players: Vec<Player>) -> Vec<Player> {
    active_players(players)
        .into_iter()
        .map(|p| Player { is_live: true, ..p })
        .collect()
}

#[derive(Default, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApiStatus {
    Success,
    #[default]
    #[serde(other)]
    Failure,
}

#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayersResponse {
    #[serde(default)]
    pub status: ApiStatus,
    pub message: Option<String>,
    #[serde(default)]
    pub players: Vec<Player>,
}

#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LastUpdateResponse {
    #[serde(default)]
    pub status: ApiStatus,
    pub message: Option<String>,
    pub last_update: Option<String>,
}

#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RefreshResponse {
    #[serde(default)]
    pub status: ApiStatus,
    pub message: Option<String>,
    pub count: Option<u64>,
}
