use crate::dom::dom_model::{Document, NodeId};

pub const FIELD_ID_PREFIX: &str = "field";

/// Path selector for a node.
///
/// An element with an id is addressed by `#id` alone. Otherwise the path is
/// built from `tag:nth-of-type(k)` segments up to the root, anchored early at
/// the first ancestor that carries an id (`tag#id`).
pub fn selector_for(doc: &Document, id: NodeId) -> String {
    if let Some(own) = non_empty_id(doc, id) {
        return format!("#{}", escape_css_ident(own));
    }

    let mut parts = Vec::new();
    let mut current = Some(id);

    while let Some(node) = current {
        if !doc.is_element(node) {
            break;
        }
        let tag = doc.tag(node);

        if let Some(anchor) = non_empty_id(doc, node) {
            parts.push(format!("{}#{}", tag, escape_css_ident(anchor)));
            break;
        }

        let nth = 1 + doc
            .previous_element_siblings(node)
            .into_iter()
            .filter(|s| doc.tag(*s) == tag)
            .count();
        parts.push(format!("{}:nth-of-type({})", tag, nth));

        current = doc.parent(node);
    }

    assert!(
        !parts.is_empty(),
        "selector generator produced an empty path for node {:?}",
        id
    );

    parts.reverse();
    parts.join(" > ")
}

fn non_empty_id(doc: &Document, id: NodeId) -> Option<&str> {
    doc.attr(id, "id").filter(|v| !v.is_empty())
}

/// Serialize an identifier the way `CSS.escape` does.
pub fn escape_css_ident(value: &str) -> String {
    let chars: Vec<char> = value.chars().collect();
    let mut out = String::with_capacity(value.len());

    for (i, &c) in chars.iter().enumerate() {
        let code = c as u32;

        if c == '\0' {
            out.push('\u{FFFD}');
        } else if (0x01..=0x1F).contains(&code)
            || code == 0x7F
            || (i == 0 && c.is_ascii_digit())
            || (i == 1 && c.is_ascii_digit() && chars[0] == '-')
        {
            out.push_str(&format!("\\{:x} ", code));
        } else if i == 0 && c == '-' && chars.len() == 1 {
            out.push_str("\\-");
        } else if code >= 0x80 || c == '-' || c == '_' || c.is_ascii_alphanumeric() {
            out.push(c);
        } else {
            out.push('\\');
            out.push(c);
        }
    }

    out
}

/// 32-bit shift/subtract polynomial hash over UTF-16 code units, made non-negative.
pub fn hash_selector(selector: &str) -> u32 {
    let mut hash: i32 = 0;
    for unit in selector.encode_utf16() {
        hash = hash
            .wrapping_shl(5)
            .wrapping_sub(hash)
            .wrapping_add(unit as i32);
    }
    hash.unsigned_abs()
}

/// `field-<position>-<hash(selector)>`
pub fn stable_field_id(selector: &str, index: usize) -> String {
    format!("{}-{}-{}", FIELD_ID_PREFIX, index, hash_selector(selector))
}
