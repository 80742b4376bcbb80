//! Board schema resolution - service layer
//!
//! Reads the parent board's columns and works out which columns the subitems
//! actually have. Classic boards keep subitems on a separate linked board.

use crate::clients::GraphQlTransport;
use crate::error::{AppError, AppResult};
use crate::models::{Board, BoardSchema, Column};
use serde_json::{json, Value};
use tracing::{debug, info, warn};

pub const BOARD_QUERY: &str = r#"
    query($boardId: ID!) {
      boards(ids: [ $boardId ]) {
        id
        name
        groups { id title }
        columns { id title type settings_str }
      }
    }
"#;

pub const SUBITEM_BOARD_QUERY: &str = r#"
    query($boardId: ID!) {
      boards(ids: [ $boardId ]) {
        columns { id title type }
      }
    }
"#;

/// Column type fragment marking the subitems relationship.
const SUBTASKS_KIND: &str = "subtask";
/// Settings keys that may hold the linked board, in priority order.
const LINKED_BOARD_KEYS: [&str; 3] = ["boardIds", "board_id", "linked_board_id"];

/// Resolves `BoardSchema`s through a GraphQL transport
pub struct SchemaResolver<'a, T: GraphQlTransport> {
    transport: &'a T,
    /// Configured subitem board, skips discovery when set
    subitems_board_id: Option<String>,
}

impl<'a, T: GraphQlTransport> SchemaResolver<'a, T> {
    pub fn new(transport: &'a T, subitems_board_id: Option<String>) -> Self {
        Self {
            transport,
            subitems_board_id: subitems_board_id.filter(|id| !id.trim().is_empty()),
        }
    }

    /// Fetch the board and its subitem columns.
    pub async fn resolve(&self, board_id: &str) -> AppResult<BoardSchema> {
        info!("🔍 Reading structure of board {}", board_id);
        let board = self
            .fetch_board(BOARD_QUERY, board_id)
            .await?
            .ok_or_else(|| AppError::board_not_found(board_id))?;

        let group_id = board.groups.first().map(|g| g.id.clone());
        let parent_columns = board.columns;

        let child_board_id = self
            .subitems_board_id
            .clone()
            .or_else(|| find_linked_board_id(&parent_columns));

        let mut child_columns = Vec::new();
        if let Some(child_board_id) = &child_board_id {
            debug!("Subitem board: {}", child_board_id);
            child_columns = self
                .fetch_board(SUBITEM_BOARD_QUERY, child_board_id)
                .await?
                .map(|b| b.columns)
                .unwrap_or_default();
        }
        if child_columns.is_empty() {
            if child_board_id.is_some() {
                warn!("⚠️ Subitem board has no columns, using the board columns");
            }
            child_columns = parent_columns.clone();
        }

        info!(
            "✓ Board has {} columns, subitems have {} columns",
            parent_columns.len(),
            child_columns.len()
        );

        Ok(BoardSchema {
            group_id,
            parent_columns,
            child_columns,
            child_board_id,
        })
    }

    async fn fetch_board(&self, query: &str, board_id: &str) -> AppResult<Option<Board>> {
        let data = self
            .transport
            .execute(query, json!({ "boardId": board_id }))
            .await?;
        let board: Option<Board> = match data
            .get("boards")
            .and_then(Value::as_array)
            .and_then(|boards| boards.first())
        {
            Some(board) if !board.is_null() => Some(serde_json::from_value(board.clone())?),
            _ => None,
        };
        Ok(board)
    }
}

/// First subtasks column whose settings point at a linked board.
pub fn find_linked_board_id(columns: &[Column]) -> Option<String> {
    columns
        .iter()
        .filter(|c| c.kind.to_lowercase().contains(SUBTASKS_KIND))
        .find_map(|c| c.settings.as_deref().and_then(linked_board_from_settings))
}

fn linked_board_from_settings(settings: &str) -> Option<String> {
    let settings: Value = serde_json::from_str(settings).ok()?;
    LINKED_BOARD_KEYS.iter().find_map(|key| {
        let value = settings.get(*key)?;
        let value = match value {
            Value::Array(ids) => ids.first()?,
            other => other,
        };
        match value {
            Value::String(id) if !id.is_empty() => Some(id.clone()),
            Value::Number(id) => Some(id.to_string()),
            _ => None,
        }
    })
}
