//! Snapshot record produced by the extractor
//!
//! Field names on the wire follow the published dashboard JSON, which is why
//! several structs rename their fields for serde.

use chrono::{DateTime, FixedOffset};
use serde::Serialize;

/// Attribution attached to every snapshot
pub const DISCLAIMER: &str =
    "Data provided by the City of Cape Town (http://coct.co/water-dashboard/)";

/// Sentinel for a consumption figure the city has withheld
pub const UNDER_REVIEW: f64 = -1.0;

/// One extraction of the dashboard page
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snapshot {
    /// Projected date the taps are turned off
    #[serde(rename = "dayzero")]
    pub day_zero: DateTime<FixedOffset>,

    /// Week the statistics were published for, when the page states it
    #[serde(rename = "statsAsAtWeek", skip_serializing_if = "Option::is_none")]
    pub stats_as_at_week: Option<DateTime<FixedOffset>>,

    pub city: City,

    pub dams: Dams,

    #[serde(rename = "capetonians")]
    pub cape_tonians: CapeTonians,

    pub other: Other,

    pub disclaimer: String,

    /// Set by the serving layer, never by the extractor
    pub cached: bool,
}

/// Progress on the city's alternative water programme
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct City {
    pub description: String,
    pub progress: f64,
    pub projects: Vec<Project>,
}

/// Combined dam level
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dams {
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description_url: Option<String>,
    pub level: f64,
    pub trend: Trend,
}

/// Share of residents keeping to the daily consumption target
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CapeTonians {
    pub description: String,
    /// Percentage, or [`UNDER_REVIEW`] when the page leaves it blank
    pub amount: f64,
    pub trend: Trend,
}

impl CapeTonians {
    pub fn is_under_review(&self) -> bool {
        self.amount == UNDER_REVIEW
    }
}

/// Projects that are planned but not yet underway
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Other {
    pub description: String,
    pub projects: Vec<Project>,
}

/// An effort to increase water supply
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Project {
    pub area: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub percentage: f64,
    pub status: Status,
}

/// Week-over-week change
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Trend {
    pub amount: f64,
    pub direction: Direction,
}

/// Direction of a trend, serialised as -1, 0 or 1
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(into = "i8")]
pub enum Direction {
    Down,
    #[default]
    Unknown,
    Up,
}

impl From<Direction> for i8 {
    fn from(direction: Direction) -> Self {
        match direction {
            Direction::Down => -1,
            Direction::Unknown => 0,
            Direction::Up => 1,
        }
    }
}

/// Schedule status of a project, serialised as -1, 0 or 1
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(into = "i8")]
pub enum Status {
    BehindSchedule,
    #[default]
    Unknown,
    OnSchedule,
}

impl From<Status> for i8 {
    fn from(status: Status) -> Self {
        match status {
            Status::BehindSchedule => -1,
            Status::Unknown => 0,
            Status::OnSchedule => 1,
        }
    }
}
