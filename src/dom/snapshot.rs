use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::dom::dom_model::{Document, NodeId, Rect, Style};
use crate::error::DetectError;

/// Which frame of the tab a snapshot was captured from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FrameScope {
    #[default]
    TopFrame,
    ChildFrame,
}

/// Serialized page as produced by the browser-side extractor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageSnapshot {
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub frame: FrameScope,
    pub body: ElementSnapshot,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ElementSnapshot {
    pub tag: String,
    #[serde(default)]
    pub attrs: BTreeMap<String, String>,
    #[serde(default)]
    pub value: Option<String>,
    #[serde(default)]
    pub rect: Rect,
    #[serde(default)]
    pub style: Style,
    #[serde(default)]
    pub children: Vec<NodeSnapshot>,
}

/// A child is an element, a `{text: ...}` record, or a bare string.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NodeSnapshot {
    Element(ElementSnapshot),
    Text { text: String },
    Raw(String),
}

impl PageSnapshot {
    pub fn from_json(content: &str) -> Result<Self, DetectError> {
        serde_json::from_str(content).map_err(|e| DetectError::SnapshotParse {
            context: "page snapshot".into(),
            source: e,
        })
    }

    pub fn from_yaml(content: &str) -> Result<Self, DetectError> {
        serde_yaml::from_str(content).map_err(|e| DetectError::SnapshotYaml {
            context: "page snapshot".into(),
            source: e,
        })
    }

    /// Load from disk; `.yaml`/`.yml` files are read as YAML, anything else as JSON.
    pub fn load(path: &Path) -> Result<Self, DetectError> {
        let content = std::fs::read_to_string(path).map_err(|e| DetectError::SnapshotRead {
            path: path.display().to_string(),
            source: e,
        })?;

        match path.extension().and_then(|e| e.to_str()) {
            Some("yaml") | Some("yml") => Self::from_yaml(&content),
            _ => Self::from_json(&content),
        }
    }
}

impl Document {
    pub fn from_snapshot(snapshot: &PageSnapshot) -> Result<Document, DetectError> {
        let mut doc = Document::new();
        doc.set_url(&snapshot.url);
        doc.set_title(&snapshot.title);
        apply_body(&mut doc, &snapshot.body)?;
        Ok(doc)
    }
}

/// Swap the body's content for `body`, producing mutation records for every
/// removed and appended child.
pub fn apply_body(doc: &mut Document, body: &ElementSnapshot) -> Result<(), DetectError> {
    let body_id = doc.body();
    doc.clear_children(body_id);

    let existing: Vec<String> = doc.node(body_id).attrs.keys().cloned().collect();
    for name in existing {
        doc.remove_attribute(body_id, &name);
    }
    for (name, value) in &body.attrs {
        doc.set_attribute(body_id, name, value);
    }
    doc.set_rect(body_id, body.rect);
    doc.set_style(body_id, body.style);

    for child in &body.children {
        let child_id = build_node(doc, child)?;
        doc.append_child(body_id, child_id)?;
    }
    Ok(())
}

/// Builds a detached subtree; the caller attaches the returned root.
fn build_node(doc: &mut Document, snapshot: &NodeSnapshot) -> Result<NodeId, DetectError> {
    let el = match snapshot {
        NodeSnapshot::Text { text } | NodeSnapshot::Raw(text) => return Ok(doc.create_text(text)),
        NodeSnapshot::Element(el) => el,
    };

    let id = doc.create_element(&el.tag)?;
    for (name, value) in &el.attrs {
        doc.set_attribute(id, name, value);
    }
    if let Some(value) = &el.value {
        doc.set_value(id, value);
    }
    doc.set_rect(id, el.rect);
    doc.set_style(id, el.style);

    for child in &el.children {
        let child_id = build_node(doc, child)?;
        doc.append_child(id, child_id)?;
    }
    Ok(id)
}
