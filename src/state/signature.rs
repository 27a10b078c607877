use crate::screen::screen_model::FieldDescriptor;

/// Canonical form of a field list: sorted `selector|type|required` triples.
pub fn fields_signature(fields: &[FieldDescriptor]) -> String {
    let mut parts: Vec<String> = fields
        .iter()
        .map(|f| {
            format!(
                "{}|{}|{}",
                f.selector,
                f.field_type.as_str(),
                if f.required { "1" } else { "0" }
            )
        })
        .collect();

    parts.sort();
    parts.join("||")
}

/// Minimum shape a field list must have before it may count towards convergence.
pub fn is_stable_extraction(fields: &[FieldDescriptor], min_stable_fields: usize) -> bool {
    if fields.len() < min_stable_fields {
        return false;
    }
    fields.iter().any(|f| f.field_type.is_text_bearing())
}

/// Short digest of a signature for trace output.
pub fn signature_fingerprint(signature: &str) -> String {
    use sha1::{Digest, Sha1};

    let mut hasher = Sha1::new();
    hasher.update(signature.as_bytes());
    format!("{:x}", hasher.finalize())
}
