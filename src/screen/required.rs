use crate::dom::dom_model::{Document, NodeId};
use crate::screen::eligibility::{input_type, is_input_of_type};
use crate::screen::label::associated_label_elements;

/// Attribute values that read as "yes".
pub const REQUIRED_TRUE_VALUES: [&str; 3] = ["true", "1", "required"];

fn is_truthy(value: &str) -> bool {
    REQUIRED_TRUE_VALUES.contains(&value)
}

/// `required`, or a truthy `aria-required` / `data-required`.
pub fn has_required_attribute_signal(doc: &Document, id: NodeId) -> bool {
    doc.has_attr(id, "required")
        || is_truthy(&doc.attr_lower(id, "aria-required"))
        || is_truthy(&doc.attr_lower(id, "data-required"))
}

/// Any associated label shows a `*` marker.
pub fn has_required_label_marker(doc: &Document, id: NodeId) -> bool {
    associated_label_elements(doc, id)
        .into_iter()
        .any(|label| doc.text_content(label).contains('*'))
}

/// A radio whose group (same `name`, whole document) carries a required attribute.
pub fn has_required_group_signal(doc: &Document, id: NodeId) -> bool {
    if !is_input_of_type(doc, id, "radio") {
        return false;
    }
    let Some(name) = doc.attr(id, "name").filter(|n| !n.trim().is_empty()) else {
        return false;
    };

    doc.find_all(|n| {
        doc.tag(n) == "input" && input_type(doc, n) == "radio" && doc.attr(n, "name") == Some(name)
    })
    .into_iter()
    .any(|radio| has_required_attribute_signal(doc, radio))
}

/// Flagged `aria-invalid` while still empty: the page already rejected it blank.
pub fn has_invalid_empty_signal(doc: &Document, id: NodeId) -> bool {
    if !is_truthy(&doc.attr_lower(id, "aria-invalid")) {
        return false;
    }
    is_control_value_empty(doc, id)
}

pub fn is_control_value_empty(doc: &Document, id: NodeId) -> bool {
    match doc.tag(id) {
        "input" | "textarea" => doc.value(id).unwrap_or("").trim().is_empty(),
        "select" => selected_value(doc, id).trim().is_empty(),
        _ => {
            let value_text = doc.attr(id, "aria-valuetext").unwrap_or("").trim();
            if !value_text.is_empty() {
                return false;
            }
            doc.text_content(id).trim().is_empty()
        }
    }
}

/// Value of a `<select>`: live value, else the first `selected` option,
/// else the first option.
fn selected_value(doc: &Document, id: NodeId) -> String {
    if let Some(v) = doc.node(id).value.as_deref() {
        return v.to_string();
    }

    let options: Vec<NodeId> = doc
        .descendant_elements(id)
        .into_iter()
        .filter(|n| doc.tag(*n) == "option")
        .collect();

    let chosen = options
        .iter()
        .find(|o| doc.has_attr(**o, "selected"))
        .or(options.first());

    match chosen {
        Some(option) => doc
            .attr(*option, "value")
            .map(str::to_string)
            .unwrap_or_else(|| doc.text_content(*option)),
        None => String::new(),
    }
}

/// Independent signals combined by OR.
pub fn is_required_field(doc: &Document, id: NodeId) -> bool {
    has_required_attribute_signal(doc, id)
        || has_required_label_marker(doc, id)
        || has_required_group_signal(doc, id)
        || has_invalid_empty_signal(doc, id)
}
