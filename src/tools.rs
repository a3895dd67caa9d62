//! Tool registry and dispatcher.
//!
//! Declares the tools advertised to MCP clients and routes `tools/call`
//! requests to them. Failures inside a known tool come back as a normal
//! text response; only an unknown tool name is reported as [`DispatchError`].

use std::collections::BTreeMap;
use std::sync::Arc;

use rmcp::model::{CallToolRequestParam, CallToolResult, Content, JsonObject, Tool};
use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::{json, Value};
use thiserror::Error;
use tracing::{info, warn};

use crate::client::{AnkiConnect, ClientError};
use crate::model::Note;

/// Errors raised while running a known tool. Rendered into the response text.
#[derive(Debug, Error)]
pub enum ToolError {
    #[error("invalid arguments: {0}")]
    InvalidArguments(String),

    #[error(transparent)]
    Client(#[from] ClientError),

    #[error("AnkiConnect returned no note ID")]
    MissingNoteId,
}

/// Protocol-level dispatch failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DispatchError {
    #[error("Unknown tool: {0}")]
    UnknownTool(String),
}

/// The tools this server exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolKind {
    AddNote,
}

impl ToolKind {
    pub const ALL: [ToolKind; 1] = [ToolKind::AddNote];

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.name() == name)
    }

    pub fn name(self) -> &'static str {
        match self {
            ToolKind::AddNote => "add-note",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            ToolKind::AddNote => "Add a new note to Anki",
        }
    }

    pub fn descriptor(self) -> Tool {
        let schema = match self {
            ToolKind::AddNote => input_schema::<AddNoteArgs>(),
        };
        Tool::new(self.name(), self.description(), schema)
    }
}

/// Input of the `add-note` tool.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct AddNoteArgs {
    /// Name of the deck to add note to
    pub deck_name: String,
    /// Name of the note model/type to use
    pub model_name: String,
    /// Fields for the note as key-value pairs
    pub fields: BTreeMap<String, String>,
    /// Optional tags to add to the note
    #[serde(default)]
    pub tags: Option<Vec<String>>,
}

impl AddNoteArgs {
    /// Parse and check raw call arguments. Absent arguments count as an empty object.
    pub fn from_arguments(arguments: Option<JsonObject>) -> Result<Self, ToolError> {
        let value = Value::Object(arguments.unwrap_or_default());
        let args: Self = serde_json::from_value(value)
            .map_err(|e| ToolError::InvalidArguments(e.to_string()))?;

        if args.deck_name.trim().is_empty() {
            return Err(ToolError::InvalidArguments("`deckName` must not be empty".into()));
        }
        if args.model_name.trim().is_empty() {
            return Err(ToolError::InvalidArguments("`modelName` must not be empty".into()));
        }
        if args.fields.is_empty() {
            return Err(ToolError::InvalidArguments("`fields` must not be empty".into()));
        }

        Ok(args)
    }
}

impl From<AddNoteArgs> for Note {
    fn from(args: AddNoteArgs) -> Self {
        Note {
            deck_name: args.deck_name,
            model_name: args.model_name,
            fields: args.fields,
            tags: args.tags,
        }
    }
}

/// JSON schema object for a tool input type.
fn input_schema<T: JsonSchema>() -> Arc<JsonObject> {
    let root = schemars::schema_for!(T);
    match serde_json::to_value(root) {
        Ok(Value::Object(mut schema)) => {
            schema.remove("$schema");
            Arc::new(schema)
        }
        _ => Arc::new(JsonObject::new()),
    }
}

/// Routes tool calls to their handlers.
#[derive(Clone)]
pub struct Dispatcher {
    client: Arc<dyn AnkiConnect>,
    tools: Arc<[Tool]>,
}

impl Dispatcher {
    pub fn new<C: AnkiConnect + 'static>(client: C) -> Self {
        Self::from_shared(Arc::new(client))
    }

    pub fn from_shared(client: Arc<dyn AnkiConnect>) -> Self {
        Self {
            client,
            tools: ToolKind::ALL.iter().map(|kind| kind.descriptor()).collect(),
        }
    }

    /// All declared tools, in declaration order.
    pub fn list(&self) -> Vec<Tool> {
        self.tools.to_vec()
    }

    /// Run a tool call.
    ///
    /// Returns `Err` only for an unknown tool; every other failure is folded
    /// into the single text block of the returned result.
    pub async fn dispatch(
        &self,
        request: CallToolRequestParam,
    ) -> Result<CallToolResult, DispatchError> {
        let Some(kind) = ToolKind::from_name(&request.name) else {
            warn!(tool = %request.name, "unknown tool requested");
            return Err(DispatchError::UnknownTool(request.name.into_owned()));
        };

        let result = match kind {
            ToolKind::AddNote => self.add_note(request.arguments).await,
        };
        Ok(result)
    }

    async fn add_note(&self, arguments: Option<JsonObject>) -> CallToolResult {
        let text = match self.create_note(arguments).await {
            Ok(id) => {
                info!(note_id = %id, "created note");
                format!("Successfully created note with ID: {id}")
            }
            Err(e) => {
                warn!(error = %e, "add-note failed");
                format!("Failed to create note: {e}")
            }
        };
        CallToolResult::success(vec![Content::text(text)])
    }

    async fn create_note(&self, arguments: Option<JsonObject>) -> Result<String, ToolError> {
        let note = Note::from(AddNoteArgs::from_arguments(arguments)?);
        let id = self.client.invoke("addNote", json!({ "note": note })).await?;
        note_id(id)
    }
}

fn note_id(value: Value) -> Result<String, ToolError> {
    match value {
        Value::Null => Err(ToolError::MissingNoteId),
        Value::String(id) => Ok(id),
        other => Ok(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn object(value: Value) -> Option<JsonObject> {
        value.as_object().cloned()
    }

    #[test]
    fn add_note_schema_requires_core_fields() {
        let tool = ToolKind::AddNote.descriptor();
        assert_eq!(tool.name, "add-note");

        let required: Vec<&str> = tool.input_schema["required"]
            .as_array()
            .unwrap()
            .iter()
            .filter_map(Value::as_str)
            .collect();
        assert!(required.contains(&"deckName"));
        assert!(required.contains(&"modelName"));
        assert!(required.contains(&"fields"));
        assert!(!required.contains(&"tags"));

        let properties = tool.input_schema["properties"].as_object().unwrap();
        assert!(properties.contains_key("tags"));
    }

    #[test]
    fn lookup_by_name() {
        assert_eq!(ToolKind::from_name("add-note"), Some(ToolKind::AddNote));
        assert_eq!(ToolKind::from_name("delete-note"), None);
    }

    #[test]
    fn parses_arguments_without_tags() {
        let args = AddNoteArgs::from_arguments(object(json!({
            "deckName": "Spanish",
            "modelName": "Basic",
            "fields": { "Front": "hola", "Back": "hello" }
        })))
        .unwrap();
        assert_eq!(args.deck_name, "Spanish");
        assert_eq!(args.fields.len(), 2);
        assert_eq!(args.tags, None);
    }

    #[test]
    fn missing_fields_is_rejected() {
        let err = AddNoteArgs::from_arguments(object(json!({
            "deckName": "Spanish",
            "modelName": "Basic"
        })))
        .unwrap_err();
        assert_eq!(err.to_string(), "invalid arguments: missing field `fields`");
    }

    #[test]
    fn absent_arguments_are_rejected() {
        let err = AddNoteArgs::from_arguments(None).unwrap_err();
        assert!(matches!(err, ToolError::InvalidArguments(_)));
    }

    #[test]
    fn blank_deck_is_rejected() {
        let err = AddNoteArgs::from_arguments(object(json!({
            "deckName": "  ",
            "modelName": "Basic",
            "fields": { "Front": "hola" }
        })))
        .unwrap_err();
        assert_eq!(err.to_string(), "invalid arguments: `deckName` must not be empty");
    }

    #[test]
    fn blank_model_is_rejected() {
        let err = AddNoteArgs::from_arguments(object(json!({
            "deckName": "Spanish",
            "modelName": "",
            "fields": { "Front": "hola" }
        })))
        .unwrap_err();
        assert_eq!(err.to_string(), "invalid arguments: `modelName` must not be empty");
    }

    #[test]
    fn empty_fields_are_rejected() {
        let err = AddNoteArgs::from_arguments(object(json!({
            "deckName": "Spanish",
            "modelName": "Basic",
            "fields": {}
        })))
        .unwrap_err();
        assert_eq!(err.to_string(), "invalid arguments: `fields` must not be empty");
    }

    #[test]
    fn non_string_field_value_is_rejected() {
        let err = AddNoteArgs::from_arguments(object(json!({
            "deckName": "Spanish",
            "modelName": "Basic",
            "fields": { "Front": 1 }
        })))
        .unwrap_err();
        assert!(matches!(err, ToolError::InvalidArguments(_)));
        assert!(err.to_string().starts_with("invalid arguments: invalid type"));
    }

    #[test]
    fn numeric_deck_is_rejected() {
        let err = AddNoteArgs::from_arguments(object(json!({
            "deckName": 5,
            "modelName": "Basic",
            "fields": { "Front": "hola" }
        })))
        .unwrap_err();
        assert!(err.to_string().starts_with("invalid arguments: invalid type"));
    }

    #[test]
    fn tags_must_be_strings() {
        let err = AddNoteArgs::from_arguments(object(json!({
            "deckName": "Spanish",
            "modelName": "Basic",
            "fields": { "Front": "hola" },
            "tags": [1, 2]
        })))
        .unwrap_err();
        assert!(matches!(err, ToolError::InvalidArguments(_)));
    }

    #[test]
    fn note_id_formatting() {
        assert_eq!(note_id(json!(12345)).unwrap(), "12345");
        assert_eq!(note_id(json!("abc")).unwrap(), "abc");
        assert!(matches!(note_id(Value::Null), Err(ToolError::MissingNoteId)));
    }
}
