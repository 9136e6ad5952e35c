//! Database models.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};
use sqlx::FromRow;

use crate::error::ShoppingListError;
use crate::validation::ValidationError;

/// Which logical list an item belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, sqlx::Type)]
pub enum ListType {
    /// Items still to be bought.
    ToBuy,
    /// History of bought items, available for re-adding.
    PrevBought,
}

impl ListType {
    /// Value stored in the `list_type` column.
    pub fn as_str(&self) -> &'static str {
        match self {
            ListType::ToBuy => "ToBuy",
            ListType::PrevBought => "PrevBought",
        }
    }
}

impl fmt::Display for ListType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ListType {
    type Err = ValidationError;

    /// Accepts the variant name (any case) or its numeric index.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "tobuy" | "0" => Ok(ListType::ToBuy),
            "prevbought" | "1" => Ok(ListType::PrevBought),
            other => Err(ValidationError::InvalidListType(other.to_string())),
        }
    }
}

impl<'de> Deserialize<'de> for ListType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        EnumRepr::deserialize(deserializer)?
            .into_string()
            .parse()
            .map_err(serde::de::Error::custom)
    }
}

/// Wire form of the list enums. Names are written; older clients send the
/// numeric index, so both are read.
#[derive(Deserialize)]
#[serde(untagged)]
enum EnumRepr {
    Index(u64),
    Name(String),
}

impl EnumRepr {
    fn into_string(self) -> String {
        match self {
            EnumRepr::Index(index) => index.to_string(),
            EnumRepr::Name(name) => name,
        }
    }
}

/// Presentation order of the to-buy list.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, sqlx::Type,
)]
pub enum SortMode {
    /// Ordered by name within each importance group.
    #[default]
    Alphabetical,
    /// Ordered by the user-maintained `sort_order`.
    Custom,
}

impl SortMode {
    /// Value stored in the `sort_mode` column.
    pub fn as_str(&self) -> &'static str {
        match self {
            SortMode::Alphabetical => "Alphabetical",
            SortMode::Custom => "Custom",
        }
    }
}

impl fmt::Display for SortMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortMode {
    type Err = ValidationError;

    /// Accepts the variant name (any case) or its numeric index.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "alphabetical" | "0" => Ok(SortMode::Alphabetical),
            "custom" | "1" => Ok(SortMode::Custom),
            other => Err(ValidationError::InvalidSortMode(other.to_string())),
        }
    }
}

impl<'de> Deserialize<'de> for SortMode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        EnumRepr::deserialize(deserializer)?
            .into_string()
            .parse()
            .map_err(serde::de::Error::custom)
    }
}

/// Direction of a manual move within a partition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Towards position 0 (`-1`).
    Up,
    /// Towards the end of the partition (`+1`).
    Down,
}

impl Direction {
    /// Signed change applied to the moved item's `sort_order`.
    pub fn delta(self) -> i64 {
        match self {
            Direction::Up => -1,
            Direction::Down => 1,
        }
    }
}

impl TryFrom<i64> for Direction {
    type Error = ShoppingListError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        match value {
            -1 => Ok(Direction::Up),
            1 => Ok(Direction::Down),
            other => Err(ShoppingListError::InvalidDirection(other)),
        }
    }
}

/// A shopping list entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    /// UUID assigned at creation.
    pub id: String,
    /// Display name, also the merge key within the to-buy list.
    pub name: String,
    /// How many to buy. Always 0 in history.
    pub amount: i64,
    /// Important items are listed before the rest.
    pub is_important: bool,
    /// Position within the item's (list, importance) partition; -1 in history.
    pub sort_order: i64,
    /// Which list the item is on.
    pub list_type: ListType,
    /// Mode of the whole to-buy list, reported on every item.
    pub current_sort_mode: SortMode,
}

/// Sort order carried by every history item.
pub const UNORDERED: i64 = -1;

/// Payload for adding an item to the to-buy list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewItem {
    pub name: String,
    #[serde(default = "default_amount")]
    pub amount: i64,
    #[serde(default)]
    pub is_important: bool,
}

fn default_amount() -> i64 {
    1
}

impl NewItem {
    /// A non-important item with the given amount.
    pub fn new(name: impl Into<String>, amount: i64) -> Self {
        Self {
            name: name.into(),
            amount,
            is_important: false,
        }
    }

    /// Mark the new item as important.
    pub fn important(mut self) -> Self {
        self.is_important = true;
        self
    }
}
