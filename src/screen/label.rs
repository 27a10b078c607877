use crate::dom::dom_model::{Document, NodeId};
use crate::screen::classifier::classify_field;
use crate::screen::screen_model::FieldType;

/// Collapse runs of whitespace to one space and trim.
pub fn normalized_text(value: &str) -> String {
    value.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SiblingDirection {
    Previous,
    Next,
}

/// Nearest sibling with text, stepping over other interactive siblings.
fn find_sibling_label_candidate(
    doc: &Document,
    id: NodeId,
    direction: SiblingDirection,
) -> Option<NodeId> {
    let siblings = match direction {
        SiblingDirection::Previous => doc.previous_element_siblings(id),
        SiblingDirection::Next => doc.next_element_siblings(id),
    };

    siblings.into_iter().find(|s| {
        !matches!(doc.tag(*s), "input" | "textarea" | "select" | "button")
            && !normalized_text(&doc.text_content(*s)).is_empty()
    })
}

/// Elements that act as the control's label, in priority order:
/// `label[for=id]`, a wrapping `<label>`, `aria-labelledby` targets, the
/// preceding text sibling and (checkbox/radio only) the following one.
pub fn associated_label_elements(doc: &Document, id: NodeId) -> Vec<NodeId> {
    let mut labels: Vec<NodeId> = Vec::new();
    let mut add = |candidate: Option<NodeId>| {
        if let Some(c) = candidate {
            if !labels.contains(&c) {
                labels.push(c);
            }
        }
    };

    if let Some(own_id) = doc.attr(id, "id").filter(|v| !v.is_empty()) {
        add(doc.find_first(|n| doc.tag(n) == "label" && doc.attr(n, "for") == Some(own_id)));
    }

    add(doc.closest(id, |n| doc.tag(n) == "label"));

    if let Some(refs) = doc.attr(id, "aria-labelledby") {
        for label_id in refs.split_whitespace() {
            add(doc.element_by_id(label_id));
        }
    }

    add(find_sibling_label_candidate(doc, id, SiblingDirection::Previous));

    if matches!(classify_field(doc, id), FieldType::Checkbox | FieldType::Radio) {
        add(find_sibling_label_candidate(doc, id, SiblingDirection::Next));
    }

    labels
}

/// Best human-readable label for a control.
///
/// Falls back through associated labels, `aria-label`, `name`, `title` and
/// `placeholder` before returning `sentinel`.
pub fn resolve_label(doc: &Document, id: NodeId, sentinel: &str) -> String {
    for label in associated_label_elements(doc, id) {
        let text = normalized_text(&doc.text_content(label));
        if !text.is_empty() {
            return text;
        }
    }

    let mut attrs = vec!["aria-label", "name", "title"];
    if supports_placeholder(doc, id) {
        attrs.push("placeholder");
    }

    attrs
        .into_iter()
        .filter_map(|name| doc.attr(id, name))
        .map(normalized_text)
        .find(|text| !text.is_empty())
        .unwrap_or_else(|| sentinel.to_string())
}

fn supports_placeholder(doc: &Document, id: NodeId) -> bool {
    matches!(doc.tag(id), "input" | "textarea")
}

/// Non-empty `placeholder` of an input or textarea.
pub fn placeholder(doc: &Document, id: NodeId) -> Option<String> {
    if !supports_placeholder(doc, id) {
        return None;
    }
    doc.attr(id, "placeholder")
        .filter(|p| !p.is_empty())
        .map(str::to_string)
}

/// Surrounding help text: `aria-describedby` targets, else the enclosing
/// fieldset's legend, else the loose text beside the control.
pub fn resolve_context_text(doc: &Document, id: NodeId) -> String {
    if let Some(refs) = doc.attr(id, "aria-describedby") {
        let parts: Vec<String> = refs
            .split_whitespace()
            .filter_map(|ref_id| doc.element_by_id(ref_id))
            .map(|n| doc.text_content(n).trim().to_string())
            .filter(|t| !t.is_empty())
            .collect();

        if !parts.is_empty() {
            return parts.join(" ");
        }
    }

    if let Some(fieldset) = doc.closest(id, |n| doc.tag(n) == "fieldset") {
        let legend = doc
            .descendant_elements(fieldset)
            .into_iter()
            .find(|n| doc.tag(*n) == "legend")
            .map(|l| doc.text_content(l).trim().to_string())
            .unwrap_or_default();

        if !legend.is_empty() {
            return legend;
        }
    }

    let Some(parent) = doc.parent_element(id) else {
        return String::new();
    };

    doc.children(parent)
        .iter()
        .filter_map(|c| doc.node(*c).text.as_deref())
        .map(str::trim)
        .collect::<Vec<_>>()
        .join(" ")
        .trim()
        .to_string()
}
