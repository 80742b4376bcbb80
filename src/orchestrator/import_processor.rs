//! Episode import - orchestration layer
//!
//! Creates the episode item and then one subitem per character, strictly in
//! extraction order. Every remote call is awaited before the next one is
//! issued. A failure stops the sequence and records already created are kept.

use crate::clients::GraphQlTransport;
use crate::config::Config;
use crate::error::{AppError, AppResult, BusinessError};
use crate::models::{BoardSchema, EpisodeNumber, ExtractedDocument, ImportProgress, ImportResult};
use crate::services::value_mapper::{obra_episode_label, ValueMapper};
use crate::services::SchemaResolver;
use chrono::NaiveDate;
use serde_json::{json, Map, Value};
use tracing::{debug, info};

pub const CREATE_ITEM_MUTATION: &str = r#"
    mutation($boardId: ID!, $groupId: String!, $itemName: String!, $columnValues: JSON!) {
      create_item(
        board_id: $boardId,
        group_id: $groupId,
        item_name: $itemName,
        column_values: $columnValues
      ) { id }
    }
"#;

/// Same mutation without a group: the service picks the board's default group.
pub const CREATE_ITEM_DEFAULT_GROUP_MUTATION: &str = r#"
    mutation($boardId: ID!, $itemName: String!, $columnValues: JSON!) {
      create_item(
        board_id: $boardId,
        item_name: $itemName,
        column_values: $columnValues
      ) { id }
    }
"#;

pub const CREATE_SUBITEM_MUTATION: &str = r#"
    mutation($parentId: ID!, $itemName: String!, $columnValues: JSON!) {
      create_subitem(
        parent_item_id: $parentId,
        item_name: $itemName,
        column_values: $columnValues
      ) { id }
    }
"#;

/// Creates items on one board through a GraphQL transport
pub struct ImportProcessor<'a, T: GraphQlTransport> {
    transport: &'a T,
    board_id: String,
}

impl<'a, T: GraphQlTransport> ImportProcessor<'a, T> {
    pub fn new(transport: &'a T, board_id: impl Into<String>) -> Self {
        Self {
            transport,
            board_id: board_id.into(),
        }
    }

    /// Create the episode item and its character subitems.
    ///
    /// `on_progress` sees `(0, total)` before the first call and one update
    /// after each created record, with `total = 1 + characters`.
    pub async fn import_document<F>(
        &self,
        document: &ExtractedDocument,
        schema: &BoardSchema,
        group_id: Option<&str>,
        today: NaiveDate,
        mut on_progress: F,
    ) -> AppResult<ImportResult>
    where
        F: FnMut(&ImportProgress),
    {
        let episode = document
            .episode
            .as_ref()
            .ok_or_else(|| AppError::missing_episode(&document.filename))?;
        let characters = &document.characters;
        let total = 1 + characters.len();
        let mut report = |completed: usize, message: String| {
            on_progress(&ImportProgress {
                completed,
                total,
                message,
            })
        };

        report(0, "Connecting to the board…".to_string());

        let mapper = ValueMapper::new(schema);
        let title = document.original_title.as_deref();
        let item_values = mapper.item_values(title, today);
        let item_id = self.create_item(episode, group_id, &item_values).await?;
        info!("✓ Item {} created for episode {}", item_id, episode);
        report(1, "Item created. Creating subitems…".to_string());

        let obra_episode = obra_episode_label(title, episode);
        for (index, character) in characters.iter().enumerate() {
            let values = mapper.subitem_values(character, &obra_episode);
            self.create_subitem(&item_id, &character.name, &values).await?;
            debug!("Subitem {} created ({} loops)", character.name, character.loops);
            report(
                index + 2,
                format!("Subitem {}/{}: {}", index + 1, characters.len(), character.name),
            );
        }

        Ok(ImportResult {
            item_id,
            subitems_created: characters.len(),
        })
    }

    async fn create_item(
        &self,
        episode: &EpisodeNumber,
        group_id: Option<&str>,
        values: &Map<String, Value>,
    ) -> AppResult<String> {
        let column_values = serde_json::to_string(values)?;
        let (query, variables) = match group_id.filter(|g| !g.is_empty()) {
            Some(group_id) => (
                CREATE_ITEM_MUTATION,
                json!({
                    "boardId": self.board_id,
                    "groupId": group_id,
                    "itemName": episode.as_str(),
                    "columnValues": column_values,
                }),
            ),
            None => (
                CREATE_ITEM_DEFAULT_GROUP_MUTATION,
                json!({
                    "boardId": self.board_id,
                    "itemName": episode.as_str(),
                    "columnValues": column_values,
                }),
            ),
        };

        info!("📋 Creating item for episode {}", episode);
        let data = self.transport.execute(query, variables).await?;
        created_id(&data, "create_item").ok_or_else(|| {
            BusinessError::ItemNotCreated {
                episode: episode.to_string(),
            }
            .into()
        })
    }

    async fn create_subitem(
        &self,
        parent_id: &str,
        name: &str,
        values: &Map<String, Value>,
    ) -> AppResult<()> {
        let variables = json!({
            "parentId": parent_id,
            "itemName": name,
            "columnValues": serde_json::to_string(values)?,
        });
        self.transport.execute(CREATE_SUBITEM_MUTATION, variables).await?;
        Ok(())
    }
}

/// Resolve the schema and run the import for an already extracted document.
///
/// Nothing is sent to the service when the document has no episode number.
pub async fn import_extracted<T, F>(
    transport: &T,
    config: &Config,
    document: &ExtractedDocument,
    today: NaiveDate,
    on_progress: F,
) -> AppResult<ImportResult>
where
    T: GraphQlTransport,
    F: FnMut(&ImportProgress),
{
    if document.episode.is_none() {
        return Err(AppError::missing_episode(&document.filename));
    }

    let resolver = SchemaResolver::new(transport, config.subitems_board_id.clone());
    let schema = resolver.resolve(&config.board_id).await?;
    let group_id = config.group_id.as_deref().or(schema.group_id.as_deref());

    ImportProcessor::new(transport, config.board_id.clone())
        .import_document(document, &schema, group_id, today, on_progress)
        .await
}

/// Id of the created record under `data.<field>.id`, string or number.
fn created_id(data: &Value, field: &str) -> Option<String> {
    match data.get(field)?.get("id")? {
        Value::String(id) if !id.is_empty() => Some(id.clone()),
        Value::Number(id) => Some(id.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn created_id_accepts_strings_and_numbers() {
        assert_eq!(
            created_id(&json!({ "create_item": { "id": "123" } }), "create_item").as_deref(),
            Some("123")
        );
        assert_eq!(
            created_id(&json!({ "create_item": { "id": 123 } }), "create_item").as_deref(),
            Some("123")
        );
        assert_eq!(created_id(&json!({ "create_item": null }), "create_item"), None);
        assert_eq!(created_id(&Value::Null, "create_item"), None);
    }
}
