use serde::{Deserialize, Serialize};

/// One column definition as returned by the board service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    pub id: String,
    pub title: String,
    #[serde(rename = "type", default)]
    pub kind: String,
    /// JSON-encoded settings blob
    #[serde(rename = "settings_str", default, skip_serializing_if = "Option::is_none")]
    pub settings: Option<String>,
}

impl Column {
    pub fn new(id: impl Into<String>, title: impl Into<String>, kind: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            kind: kind.into(),
            settings: None,
        }
    }

    pub fn with_settings(mut self, settings: impl Into<String>) -> Self {
        self.settings = Some(settings.into());
        self
    }
}

/// Group as returned by the board query
#[derive(Debug, Clone, Deserialize)]
pub struct Group {
    pub id: String,
    #[serde(default)]
    pub title: String,
}

/// Board as returned by the `boards(ids: ...)` query
#[derive(Debug, Clone, Deserialize)]
pub struct Board {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub groups: Vec<Group>,
    #[serde(default)]
    pub columns: Vec<Column>,
}

/// Parent and child column layout resolved for one import
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardSchema {
    /// First group of the board, used when no group is configured
    pub group_id: Option<String>,
    pub parent_columns: Vec<Column>,
    pub child_columns: Vec<Column>,
    pub child_board_id: Option<String>,
}

/// Outcome of a finished import
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportResult {
    pub item_id: String,
    pub subitems_created: usize,
}

/// Progress snapshot handed to the import callback
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportProgress {
    pub completed: usize,
    pub total: usize,
    pub message: String,
}

impl ImportProgress {
    /// Rounded percentage, 0 when `total` is 0.
    pub fn percent(&self) -> usize {
        if self.total == 0 {
            return 0;
        }
        (self.completed * 100 + self.total / 2) / self.total
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn column_reads_wire_names() {
        let column: Column = serde_json::from_str(
            r#"{"id":"subitems","title":"Subitems","type":"subtasks","settings_str":"{\"boardIds\":[42]}"}"#,
        )
        .unwrap();
        assert_eq!(column.kind, "subtasks");
        assert_eq!(column.settings.as_deref(), Some(r#"{"boardIds":[42]}"#));

        let bare: Column = serde_json::from_str(r#"{"id":"text","title":"Obra"}"#).unwrap();
        assert_eq!(bare.kind, "");
        assert!(bare.settings.is_none());
    }

    #[test]
    fn percent_rounds() {
        let progress = ImportProgress {
            completed: 1,
            total: 3,
            message: String::new(),
        };
        assert_eq!(progress.percent(), 33);
        assert_eq!(
            ImportProgress {
                completed: 2,
                total: 3,
                message: String::new()
            }
            .percent(),
            67
        );
    }
}
