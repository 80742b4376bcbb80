//! Column value mapping - service layer
//!
//! Board column titles are configured by operators, so values are matched by
//! lower-cased, trimmed title and any column that is missing is skipped.

use crate::models::{BoardSchema, CharacterLoop, Column, EpisodeNumber};
use chrono::NaiveDate;
use phf::phf_map;
use serde_json::{json, Map, Value};

/// Status label given to every imported episode.
pub const REVIEW_STATUS_LABEL: &str = "Para Revisar";

/// Columns the importer knows how to fill
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnRole {
    Obra,
    Date,
    Status,
    Loops,
    /// Singular spelling, used only when no "loops" column exists
    Loop,
}

static COLUMN_ROLES: phf::Map<&'static str, ColumnRole> = phf_map! {
    "obra" => ColumnRole::Obra,
    "date" => ColumnRole::Date,
    "status" => ColumnRole::Status,
    "loops" => ColumnRole::Loops,
    "loop" => ColumnRole::Loop,
};

/// Column per role, built once per column list. A repeated title replaces
/// the earlier column.
#[derive(Debug, Default, Clone, Copy)]
pub struct ColumnLookup<'c> {
    obra: Option<&'c Column>,
    date: Option<&'c Column>,
    status: Option<&'c Column>,
    loops: Option<&'c Column>,
    loop_singular: Option<&'c Column>,
}

impl<'c> ColumnLookup<'c> {
    pub fn build(columns: &'c [Column]) -> Self {
        let mut lookup = Self::default();
        for column in columns {
            let key = column.title.trim().to_lowercase();
            let Some(role) = COLUMN_ROLES.get(key.as_str()) else {
                continue;
            };
            let slot = match role {
                ColumnRole::Obra => &mut lookup.obra,
                ColumnRole::Date => &mut lookup.date,
                ColumnRole::Status => &mut lookup.status,
                ColumnRole::Loops => &mut lookup.loops,
                ColumnRole::Loop => &mut lookup.loop_singular,
            };
            *slot = Some(column);
        }
        lookup
    }

    pub fn get(&self, role: ColumnRole) -> Option<&'c Column> {
        match role {
            ColumnRole::Obra => self.obra,
            ColumnRole::Date => self.date,
            ColumnRole::Status => self.status,
            ColumnRole::Loops => self.loops,
            ColumnRole::Loop => self.loop_singular,
        }
    }

    /// "loops" if present, otherwise "loop".
    pub fn loops_column(&self) -> Option<&'c Column> {
        self.loops.or(self.loop_singular)
    }
}

/// Values for the episode item: obra, date and status.
pub fn build_item_column_values(
    lookup: &ColumnLookup<'_>,
    original_title: Option<&str>,
    today: NaiveDate,
) -> Map<String, Value> {
    let mut values = Map::new();
    if let (Some(column), Some(title)) = (lookup.get(ColumnRole::Obra), original_title) {
        values.insert(column.id.clone(), json!(title));
    }
    if let Some(column) = lookup.get(ColumnRole::Date) {
        values.insert(
            column.id.clone(),
            json!({ "date": today.format("%Y-%m-%d").to_string() }),
        );
    }
    if let Some(column) = lookup.get(ColumnRole::Status) {
        values.insert(column.id.clone(), json!({ "label": REVIEW_STATUS_LABEL }));
    }
    values
}

/// Values for one character subitem: loops and "obra episode".
pub fn build_subitem_column_values(
    lookup: &ColumnLookup<'_>,
    loops: u32,
    obra_episode: &str,
) -> Map<String, Value> {
    let mut values = Map::new();
    if let Some(column) = lookup.loops_column() {
        values.insert(column.id.clone(), json!(loops.to_string()));
    }
    if let Some(column) = lookup.get(ColumnRole::Obra) {
        values.insert(column.id.clone(), json!(obra_episode));
    }
    values
}

/// `"<title> <episode>"`, or just the episode without a title.
pub fn obra_episode_label(original_title: Option<&str>, episode: &EpisodeNumber) -> String {
    match original_title {
        Some(title) => format!("{} {}", title, episode),
        None => episode.to_string(),
    }
}

/// Both lookups for one import
pub struct ValueMapper<'s> {
    parent: ColumnLookup<'s>,
    child: ColumnLookup<'s>,
}

impl<'s> ValueMapper<'s> {
    pub fn new(schema: &'s BoardSchema) -> Self {
        Self {
            parent: ColumnLookup::build(&schema.parent_columns),
            child: ColumnLookup::build(&schema.child_columns),
        }
    }

    pub fn item_values(&self, original_title: Option<&str>, today: NaiveDate) -> Map<String, Value> {
        build_item_column_values(&self.parent, original_title, today)
    }

    pub fn subitem_values(&self, character: &CharacterLoop, obra_episode: &str) -> Map<String, Value> {
        build_subitem_column_values(&self.child, character.loops, obra_episode)
    }
}
