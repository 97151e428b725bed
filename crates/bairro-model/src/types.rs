//! Core records of the proposal board.
//!
//! These types model proposals, comments and the people writing them.
//! Counters on [`Proposal`] are owned by the engine: they always equal the
//! number of votes and comments recorded for the proposal.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[cfg(feature = "typescript")]
use ts_rs::TS;

use crate::ids::{CommentId, ProposalId, UserId};

/// Error returned when parsing a status or priority from text.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown {kind}: {value}")]
pub struct ParseVariantError {
    pub kind: &'static str,
    pub value: String,
}

/// Lifecycle status of a proposal.
///
/// New proposals start as `Pending`; other values are set by moderation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
#[serde(rename_all = "snake_case")]
pub enum ProposalStatus {
    /// Awaiting review
    #[default]
    Pending,
    /// Accepted by the neighborhood council
    Approved,
    /// Work has started
    InProgress,
    /// Work is done
    Completed,
    /// Not going ahead
    Rejected,
}

impl ProposalStatus {
    /// Every status, in board display order.
    pub const ALL: [Self; 5] = [
        Self::Pending,
        Self::Approved,
        Self::InProgress,
        Self::Completed,
        Self::Rejected,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
            Self::Rejected => "rejected",
        }
    }

    /// Label shown on the board.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Pending => "Pendente",
            Self::Approved => "Aprovado",
            Self::InProgress => "Em Andamento",
            Self::Completed => "Concluído",
            Self::Rejected => "Rejeitado",
        }
    }
}

impl fmt::Display for ProposalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProposalStatus {
    type Err = ParseVariantError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == s.trim())
            .ok_or_else(|| ParseVariantError {
                kind: "status",
                value: s.to_string(),
            })
    }
}

/// How urgent the author considers a proposal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl Priority {
    /// Every priority, highest first.
    pub const ALL: [Self; 3] = [Self::High, Self::Medium, Self::Low];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Priority {
    type Err = ParseVariantError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|priority| priority.as_str() == s.trim())
            .ok_or_else(|| ParseVariantError {
                kind: "priority",
                value: s.to_string(),
            })
    }
}

/// A point on the map, in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    /// Mean Earth radius used for distance calculations.
    pub const EARTH_RADIUS_KM: f64 = 6371.0;

    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Whether both components are finite and within their ranges.
    pub fn is_valid(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && (-90.0..=90.0).contains(&self.latitude)
            && (-180.0..=180.0).contains(&self.longitude)
    }

    /// Great-circle distance in kilometres (haversine formula).
    pub fn distance_km(&self, other: &Coordinate) -> f64 {
        let lat1 = self.latitude.to_radians();
        let lat2 = other.latitude.to_radians();
        let d_lat = (other.latitude - self.latitude).to_radians();
        let d_lon = (other.longitude - self.longitude).to_radians();

        let a = (d_lat / 2.0).sin().powi(2)
            + lat1.cos() * lat2.cos() * (d_lon / 2.0).sin().powi(2);
        let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
        Self::EARTH_RADIUS_KM * c
    }
}

/// A community member as seen by the engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
pub struct User {
    pub id: UserId,
    /// Display name shown next to proposals and comments
    pub name: String,
    pub email: String,
}

/// A neighborhood-improvement proposal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
pub struct Proposal {
    /// Unique identifier, assigned at creation
    pub id: ProposalId,
    pub title: String,
    pub description: String,
    /// Free-text street address
    pub address: String,
    /// Catalog id of the category
    pub category: String,
    pub coordinate: Coordinate,
    pub status: ProposalStatus,
    pub priority: Priority,
    /// Number of members currently voting for the proposal
    pub votes_count: u32,
    /// Number of comments posted on the proposal
    pub comments_count: u32,
    pub author_id: UserId,
    pub author_name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A comment on a proposal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
pub struct Comment {
    pub id: CommentId,
    /// Proposal the comment belongs to
    pub proposal_id: ProposalId,
    pub author_id: UserId,
    pub author_name: String,
    /// Trimmed, never empty
    pub content: String,
    pub created_at: DateTime<Utc>,
}

/// Result of flipping a member's vote on a proposal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
pub struct VoteToggle {
    /// Whether the member is voting for the proposal after the toggle
    pub voted: bool,
    /// Vote count after the toggle
    pub new_count: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_parsing() {
        assert_eq!(
            "in_progress".parse::<ProposalStatus>().unwrap(),
            ProposalStatus::InProgress
        );
        assert_eq!(ProposalStatus::default(), ProposalStatus::Pending);
        let err = "done".parse::<ProposalStatus>().unwrap_err();
        assert_eq!(err.kind, "status");
    }

    #[test]
    fn test_priority_defaults_to_medium() {
        assert_eq!(Priority::default(), Priority::Medium);
        assert_eq!("high".parse::<Priority>().unwrap(), Priority::High);
        assert!("urgent".parse::<Priority>().is_err());
    }

    #[test]
    fn test_status_serializes_snake_case() {
        let json = serde_json::to_string(&ProposalStatus::InProgress).unwrap();
        assert_eq!(json, "\"in_progress\"");
    }

    #[test]
    fn test_coordinate_validation() {
        assert!(Coordinate::new(-23.55, -46.63).is_valid());
        assert!(!Coordinate::new(91.0, 0.0).is_valid());
        assert!(!Coordinate::new(0.0, -180.5).is_valid());
        assert!(!Coordinate::new(f64::NAN, 0.0).is_valid());
    }

    #[test]
    fn test_distance() {
        let se = Coordinate::new(-23.550520, -46.633308);
        assert_eq!(se.distance_km(&se), 0.0);

        // Roughly 0.1 degree of latitude apart, about 11 km
        let north = Coordinate::new(-23.450520, -46.633308);
        let d = se.distance_km(&north);
        assert!((d - 11.12).abs() < 0.1, "distance was {d}");
    }
}
