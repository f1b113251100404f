//! Data model: gardens, flowers, comments, and users as they arrive from the
//! server and live in client state.
//!
//! Flower identity is the server-assigned id. A flower without an id is a
//! pending local addition that has never been saved; such flowers never
//! compare equal by id to anything, including each other.

#[cfg(test)]
#[path = "garden_test.rs"]
mod garden_test;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Server id of a garden.
pub type GardenId = i64;
/// Server id of a flower.
pub type FlowerId = i64;
/// Server id of a comment.
pub type CommentId = i64;
/// Server id of a user.
pub type UserId = i64;

/// Sentinel garden id meaning "no garden selected".
pub const NO_GARDEN: GardenId = -1;

// =============================================================================
// FLOWER COLOR
// =============================================================================

/// The five flower varieties. The color alone determines how a flower looks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlowerColor {
    Blue,
    Red,
    Yellow,
    White,
    Purple,
}

impl FlowerColor {
    /// Every variety, in palette order.
    pub const ALL: [Self; 5] = [Self::Blue, Self::Red, Self::Yellow, Self::White, Self::Purple];

    /// Wire name, also used as the CSS stroke color.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Blue => "blue",
            Self::Red => "red",
            Self::Yellow => "yellow",
            Self::White => "white",
            Self::Purple => "purple",
        }
    }
}

impl fmt::Display for FlowerColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown flower color: {0}")]
pub struct UnknownColor(pub String);

impl FromStr for FlowerColor {
    type Err = UnknownColor;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownColor(s.to_owned()))
    }
}

// =============================================================================
// FLOWER
// =============================================================================

/// A flower placed on a garden canvas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Flower {
    /// Server id; `None` until the flower has been saved and reloaded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<FlowerId>,
    pub color: FlowerColor,
    /// Center x in canvas bitmap coordinates.
    pub x: f64,
    /// Center y in canvas bitmap coordinates.
    pub y: f64,
}

impl Flower {
    /// A new, unsaved flower.
    #[must_use]
    pub fn new(color: FlowerColor, x: f64, y: f64) -> Self {
        Self { id: None, color, x, y }
    }

    /// A flower that already carries a server id.
    #[must_use]
    pub fn saved(id: FlowerId, color: FlowerColor, x: f64, y: f64) -> Self {
        Self { id: Some(id), color, x, y }
    }

    #[must_use]
    pub fn is_saved(&self) -> bool {
        self.id.is_some()
    }

    /// Id-based identity. Unsaved flowers are never the same as anything.
    #[must_use]
    pub fn same_as(&self, other: &Flower) -> bool {
        matches!((self.id, other.id), (Some(a), Some(b)) if a == b)
    }
}

// =============================================================================
// COMMENTS, GARDENS, USERS
// =============================================================================

/// A comment left on a garden. Created and deleted whole, never edited.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub id: CommentId,
    /// Display name of the commenter.
    pub author: String,
    pub author_id: UserId,
    pub content: String,
}

/// Full garden record from `GET /gardens/{id}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Garden {
    pub id: GardenId,
    pub name: String,
    pub author: String,
    pub author_id: UserId,
    #[serde(default)]
    pub flowers: Vec<Flower>,
    #[serde(default)]
    pub comments: Vec<Comment>,
}

/// Depth-0 garden listing entry from `GET /gardens` and `GET /me`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GardenSummary {
    pub id: GardenId,
    pub name: String,
    pub author: String,
    pub author_id: UserId,
}

/// The authenticated user from `GET /me`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    /// Gardens authored by this user.
    #[serde(default)]
    pub gardens: Vec<GardenSummary>,
}
