use serde::{Deserialize, Serialize};

use crate::dom::dom_model::NodeId;
use crate::error::DetectError;

/// Semantic kind of a fillable control.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FieldType {
    Text,
    Textarea,
    Select,
    Radio,
    Checkbox,
    Richtext,
}

impl FieldType {
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldType::Text => "Text",
            FieldType::Textarea => "Textarea",
            FieldType::Select => "Select",
            FieldType::Radio => "Radio",
            FieldType::Checkbox => "Checkbox",
            FieldType::Richtext => "Richtext",
        }
    }

    /// Types that carry free or single-choice text.
    pub fn is_text_bearing(&self) -> bool {
        matches!(self, FieldType::Text | FieldType::Textarea | FieldType::Select)
    }
}

impl std::fmt::Display for FieldType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One fillable field of the primary form, as handed to downstream consumers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldDescriptor {
    pub id: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    #[serde(default)]
    pub context_text: String,
    pub required: bool,
    pub selector: String,
}

impl FieldDescriptor {
    /// Record-level schema: id, label and selector must be non-empty.
    pub fn validate(&self) -> Result<(), DetectError> {
        let checks = [
            ("id", &self.id),
            ("label", &self.label),
            ("selector", &self.selector),
        ];

        for (name, value) in checks {
            if value.trim().is_empty() {
                return Err(DetectError::InvalidField {
                    field: self.selector.clone(),
                    reason: format!("empty {}", name),
                });
            }
        }

        if matches!(&self.placeholder, Some(p) if p.is_empty()) {
            return Err(DetectError::InvalidField {
                field: self.selector.clone(),
                reason: "placeholder present but empty".into(),
            });
        }

        Ok(())
    }
}

/// An eligible input-capable node together with its path selector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Control {
    pub node: NodeId,
    pub selector: String,
}

/// Derived statistics for one ancestor considered as the form root.
#[derive(Debug, Clone, PartialEq)]
pub struct CandidateStats {
    pub container: NodeId,
    pub logical_field_count: usize,
    pub text_like_field_count: usize,
    pub has_submit_control: bool,
    pub is_form_semantic: bool,
    pub is_excluded_region: bool,
    pub visible_area: f64,
    pub discovery_index: usize,
}

/// Empirically tuned thresholds. Defaults match the values the heuristics
/// were tuned against; every one can be overridden from the config file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectionConfig {
    /// Strict pass: a container needs at least this many logical fields
    #[serde(default = "default_min_logical_fields")]
    pub min_logical_fields: usize,

    /// Relaxed pass and cache revalidation minimum
    #[serde(default = "default_relaxed_min_logical_fields")]
    pub relaxed_min_logical_fields: usize,

    /// Ancestor levels walked above each control
    #[serde(default = "default_max_ancestor_depth")]
    pub max_ancestor_depth: usize,

    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,

    /// Fewer fields than this never count as a stable pass
    #[serde(default = "default_min_stable_fields")]
    pub min_stable_fields: usize,

    /// Consecutive identical passes needed to finalize
    #[serde(default = "default_required_stable_passes")]
    pub required_stable_passes: u32,

    #[serde(default = "default_unlabeled_sentinel")]
    pub unlabeled_sentinel: String,
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            min_logical_fields: 3,
            relaxed_min_logical_fields: 1,
            max_ancestor_depth: 8,
            debounce_ms: 150,
            min_stable_fields: 3,
            required_stable_passes: 2,
            unlabeled_sentinel: "Unlabeled Field".to_string(),
        }
    }
}

impl DetectionConfig {
    pub fn debounce(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.debounce_ms)
    }
}

// Serde default helpers
fn default_min_logical_fields() -> usize { 3 }
fn default_relaxed_min_logical_fields() -> usize { 1 }
fn default_max_ancestor_depth() -> usize { 8 }
fn default_debounce_ms() -> u64 { 150 }
fn default_min_stable_fields() -> usize { 3 }
fn default_required_stable_passes() -> u32 { 2 }
fn default_unlabeled_sentinel() -> String { "Unlabeled Field".to_string() }
