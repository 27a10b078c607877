#![allow(dead_code)]

use form_detection::dom::dom_model::{Display, Document, NodeId, Rect, Style};

/// Box given to every element built through `el`.
pub fn visible_box() -> Rect {
    Rect::new(0.0, 0.0, 240.0, 32.0)
}

/// Append a visible element with attributes under `parent`.
pub fn el(doc: &mut Document, parent: NodeId, tag: &str, attrs: &[(&str, &str)]) -> NodeId {
    let id = doc.create_element(tag).expect("valid tag");
    for (name, value) in attrs {
        doc.set_attribute(id, name, value);
    }
    doc.set_rect(id, visible_box());
    doc.append_child(parent, id).expect("append element");
    id
}

pub fn text(doc: &mut Document, parent: NodeId, content: &str) -> NodeId {
    let id = doc.create_text(content);
    doc.append_child(parent, id).expect("append text");
    id
}

/// Element with a text child, e.g. `<label for=..>Email</label>`.
pub fn el_text(
    doc: &mut Document,
    parent: NodeId,
    tag: &str,
    attrs: &[(&str, &str)],
    content: &str,
) -> NodeId {
    let id = el(doc, parent, tag, attrs);
    text(doc, id, content);
    id
}

pub fn hide(doc: &mut Document, id: NodeId) {
    doc.set_style(
        id,
        Style {
            display: Display::None,
            ..Style::default()
        },
    );
}

pub fn resize(doc: &mut Document, id: NodeId, width: f64, height: f64) {
    doc.set_rect(id, Rect::new(0.0, 0.0, width, height));
}

/// `<form>` with `inputs` labelled text inputs (`field-0`, `field-1`, ...)
/// and a submit button.
pub fn form_page(inputs: usize) -> (Document, NodeId) {
    let mut doc = Document::new();
    let body = doc.body();
    let form = el(&mut doc, body, "form", &[]);
    resize(&mut doc, form, 600.0, 400.0);

    for i in 0..inputs {
        let field_id = format!("field-{}", i);
        el_text(&mut doc, form, "label", &[("for", field_id.as_str())], &format!("Field {}", i));
        el(&mut doc, form, "input", &[("type", "text"), ("id", field_id.as_str())]);
    }
    el_text(&mut doc, form, "button", &[("type", "submit")], "Send");

    (doc, form)
}

pub fn fixture_path(name: &str) -> std::path::PathBuf {
    std::path::Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}
