//! Schema context and translation request types
//!
//! The schema context is produced by an external schema-management
//! collaborator and consumed read-only here, as grounding material for
//! prompts. The translation request is immutable per call.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Database schema snapshot used to ground prompts
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SchemaContext {
    pub tables: Vec<TableSchema>,
    #[serde(default)]
    pub relationships: Vec<Relationship>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableSchema {
    pub name: String,
    pub columns: Vec<ColumnSchema>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColumnSchema {
    pub name: String,
    #[serde(rename = "type")]
    pub data_type: String,
    #[serde(default)]
    pub nullable: bool,
    #[serde(default)]
    pub primary_key: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Relationship {
    pub from_table: String,
    pub to_table: String,
    pub relationship_type: String,
}

/// One prior exchange in the conversation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationTurn {
    pub role: String,
    pub content: String,
}

impl ConversationTurn {
    pub fn new(role: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            role: role.into(),
            content: content.into(),
        }
    }
}

/// Immutable input to a single SQL generation call
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranslationRequest {
    pub question: String,
    #[serde(default)]
    pub schema_context: Option<SchemaContext>,
    #[serde(default)]
    pub conversation_history: Vec<ConversationTurn>,
    #[serde(default)]
    pub user_preferences: Option<BTreeMap<String, String>>,
}

impl TranslationRequest {
    pub fn new(question: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            schema_context: None,
            conversation_history: Vec::new(),
            user_preferences: None,
        }
    }

    pub fn with_schema(mut self, schema: SchemaContext) -> Self {
        self.schema_context = Some(schema);
        self
    }

    pub fn with_history(mut self, history: Vec<ConversationTurn>) -> Self {
        self.conversation_history = history;
        self
    }

    pub fn with_preferences(mut self, preferences: BTreeMap<String, String>) -> Self {
        self.user_preferences = Some(preferences);
        self
    }
}
