use serde::{Deserialize, Serialize};

use crate::screen::screen_model::FieldDescriptor;

/// The only thing that leaves the detector: the converged field list.
///
/// Serialized as `{"type": "EXTRACT_FIELDS", "payload": [...]}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FieldsMessage {
    ExtractFields(Vec<FieldDescriptor>),
}

impl FieldsMessage {
    pub fn fields(&self) -> &[FieldDescriptor] {
        match self {
            FieldsMessage::ExtractFields(fields) => fields,
        }
    }
}
