use crate::dom::dom_model::{Document, NodeId};
use crate::screen::eligibility::{input_type, is_content_editable};
use crate::screen::screen_model::FieldType;

/// Map a control to its field type. Explicit roles win over the native tag.
pub fn classify_field(doc: &Document, id: NodeId) -> FieldType {
    let role = doc.attr_lower(id, "role");

    match role.as_str() {
        "combobox" | "listbox" => return FieldType::Select,
        "checkbox" => return FieldType::Checkbox,
        "radio" => return FieldType::Radio,
        _ => {}
    }

    if is_content_editable(doc, id) {
        return FieldType::Richtext;
    }
    if role == "textbox" {
        return FieldType::Text;
    }

    match doc.tag(id) {
        "input" => match input_type(doc, id).as_str() {
            "radio" => FieldType::Radio,
            "checkbox" => FieldType::Checkbox,
            // file and every textual type
            _ => FieldType::Text,
        },
        "textarea" => FieldType::Textarea,
        "select" => FieldType::Select,
        _ => FieldType::Text,
    }
}

/// Text-like controls accept free or single-choice text (not checkbox/radio).
pub fn is_text_like_control(doc: &Document, id: NodeId) -> bool {
    match doc.tag(id) {
        "input" => !matches!(input_type(doc, id).as_str(), "radio" | "checkbox"),
        "textarea" | "select" => true,
        _ => {
            matches!(doc.attr_lower(id, "role").as_str(), "combobox" | "listbox" | "textbox")
                || is_content_editable(doc, id)
        }
    }
}
