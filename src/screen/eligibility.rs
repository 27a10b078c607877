use std::collections::HashSet;

use crate::dom::dom_model::{Display, Document, NodeId, Visibility};
use crate::screen::screen_model::Control;
use crate::state::identity::selector_for;

/// Native input types that never hold user-entered data.
pub const DISALLOWED_INPUT_TYPES: [&str; 5] = ["hidden", "submit", "button", "reset", "image"];

/// ARIA roles treated as input widgets when they stand alone.
pub const SEMANTIC_CONTROL_ROLES: [&str; 5] = ["combobox", "listbox", "checkbox", "radio", "textbox"];

/// Effective `type` of an `<input>`, lowercased; missing or empty means "text".
pub fn input_type(doc: &Document, id: NodeId) -> String {
    let t = doc.attr_lower(id, "type");
    if t.is_empty() { "text".to_string() } else { t }
}

pub fn is_input_of_type(doc: &Document, id: NodeId, wanted: &str) -> bool {
    doc.tag(id) == "input" && input_type(doc, id) == wanted
}

pub fn is_file_input(doc: &Document, id: NodeId) -> bool {
    is_input_of_type(doc, id, "file")
}

pub fn is_content_editable(doc: &Document, id: NodeId) -> bool {
    doc.attr(id, "contenteditable") == Some("true")
}

fn role(doc: &Document, id: NodeId) -> String {
    doc.attr_lower(id, "role")
}

fn has_semantic_role(doc: &Document, id: NodeId) -> bool {
    SEMANTIC_CONTROL_ROLES.contains(&role(doc, id).as_str())
}

/// `input, textarea, select, [contenteditable='true']`
pub fn is_native_control(doc: &Document, id: NodeId) -> bool {
    matches!(doc.tag(id), "input" | "textarea" | "select") || is_content_editable(doc, id)
}

/// Rendered with a non-empty box and not hidden. File inputs always count as visible.
pub fn is_element_visible(doc: &Document, id: NodeId) -> bool {
    if !doc.is_element(id) {
        return false;
    }
    if is_file_input(doc, id) {
        return true;
    }
    if doc.has_attr(id, "hidden") {
        return false;
    }

    let style = doc.style(id);
    if style.display == Display::None || style.visibility == Visibility::Hidden {
        return false;
    }

    doc.rect(id).has_extent()
}

/// An ARIA widget counts only when it is not a wrapper around, or a
/// decoration next to, a native control.
pub fn is_standalone_semantic_control(doc: &Document, id: NodeId) -> bool {
    if role(doc, id).is_empty() {
        return false;
    }
    if doc.attr(id, "aria-hidden") == Some("true") {
        return false;
    }
    if !is_element_visible(doc, id) {
        return false;
    }

    if let Some(parent) = doc.parent_element(id) {
        let has_native_sibling = doc
            .element_children(parent)
            .filter(|s| *s != id)
            .any(|s| is_native_control(doc, s));
        if has_native_sibling {
            return false;
        }
    }

    !doc
        .descendant_elements(id)
        .into_iter()
        .any(|d| is_native_control(doc, d) || has_semantic_role(doc, d))
}

/// Eligible controls under `root`, deduplicated by selector (first wins).
///
/// Order follows the query groups: inputs, textareas, selects, rich-text
/// regions, then ARIA widgets; document order inside each group.
pub fn query_eligible_controls(doc: &Document, root: NodeId) -> Vec<Control> {
    let descendants = doc.descendant_elements(root);

    let inputs = descendants.iter().filter(|n| {
        doc.tag(**n) == "input" && !DISALLOWED_INPUT_TYPES.contains(&input_type(doc, **n).as_str())
    });
    let textareas = descendants.iter().filter(|n| doc.tag(**n) == "textarea");
    let selects = descendants.iter().filter(|n| doc.tag(**n) == "select");
    let richtext = descendants.iter().filter(|n| is_content_editable(doc, **n));
    let semantic = descendants
        .iter()
        .filter(|n| has_semantic_role(doc, **n) && is_standalone_semantic_control(doc, **n));

    let mut seen = HashSet::new();
    let mut controls = Vec::new();

    for node in inputs.chain(textareas).chain(selects).chain(richtext).chain(semantic) {
        let selector = selector_for(doc, *node);
        if seen.insert(selector.clone()) {
            controls.push(Control { node: *node, selector });
        }
    }

    controls.retain(|c| is_element_visible(doc, c.node) || is_file_input(doc, c.node));
    controls
}
