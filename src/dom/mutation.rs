use std::sync::mpsc::Receiver;

use crate::dom::dom_model::{Document, NodeId};

/// One structural change: children added to or removed from `target`.
#[derive(Debug, Clone, PartialEq)]
pub struct MutationRecord {
    pub target: NodeId,
    pub added: Vec<NodeId>,
    pub removed: Vec<NodeId>,
}

/// Subscription handle returned by `Document::observe`.
///
/// Holding it keeps the subscription alive; dropping it disconnects.
#[derive(Debug)]
pub struct MutationObserver {
    root: NodeId,
    rx: Receiver<MutationRecord>,
}

impl MutationObserver {
    pub(crate) fn new(root: NodeId, rx: Receiver<MutationRecord>) -> Self {
        MutationObserver { root, rx }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Drain every record delivered since the last call.
    pub fn take_records(&self) -> Vec<MutationRecord> {
        self.rx.try_iter().collect()
    }
}

/// Matches `input, textarea, select, [contenteditable='true'],
/// button[type='submit'], input[type='submit'], form, [role='form']`.
pub fn is_relevant_node(doc: &Document, id: NodeId) -> bool {
    if !doc.is_element(id) {
        return false;
    }

    match doc.tag(id) {
        "input" | "textarea" | "select" | "form" => return true,
        "button" if doc.attr_lower(id, "type") == "submit" => return true,
        _ => {}
    }

    doc.attr(id, "contenteditable") == Some("true") || doc.attr(id, "role") == Some("form")
}

fn contains_relevant_control(doc: &Document, id: NodeId) -> bool {
    is_relevant_node(doc, id)
        || doc
            .descendant_elements(id)
            .into_iter()
            .any(|d| is_relevant_node(doc, d))
}

/// Whether a batch of records touches anything that can change the field list.
pub fn has_relevant_mutation(doc: &Document, records: &[MutationRecord]) -> bool {
    records.iter().any(|record| {
        contains_relevant_control(doc, record.target)
            || record.added.iter().any(|n| contains_relevant_control(doc, *n))
            || record.removed.iter().any(|n| contains_relevant_control(doc, *n))
    })
}
