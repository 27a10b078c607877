use crate::screen::screen_model::FieldDescriptor;

// ============================================================================
// Console reporter: formatted terminal output
// ============================================================================

/// Format an extracted field list for terminal output.
///
/// Produces output like:
/// ```text
/// === Primary form: #signup (3 fields) ===
///
///   0  Text      * Email            #email
///   1  Textarea    Cover letter     form#signup > textarea:nth-of-type(1)
///        context: Tell us about yourself
///
/// === 1 required, 2 optional ===
/// ```
pub fn format_field_report(fields: &[FieldDescriptor], container: Option<&str>) -> String {
    let mut out = String::new();

    if fields.is_empty() {
        out.push_str("=== No form detected ===\n");
        return out;
    }

    out.push_str(&format!(
        "=== Primary form: {} ({} fields) ===\n\n",
        container.unwrap_or("<unknown>"),
        fields.len()
    ));

    let label_width = fields
        .iter()
        .map(|f| f.label.chars().count())
        .max()
        .unwrap_or(0)
        .min(40);

    for (index, field) in fields.iter().enumerate() {
        let marker = if field.required { "*" } else { " " };
        out.push_str(&format!(
            "{:>3}  {:<9} {} {:<width$}  {}\n",
            index,
            field.field_type.as_str(),
            marker,
            field.label,
            field.selector,
            width = label_width
        ));

        if let Some(placeholder) = &field.placeholder {
            out.push_str(&format!("       placeholder: {}\n", placeholder));
        }
        if !field.context_text.is_empty() {
            out.push_str(&format!("       context: {}\n", field.context_text));
        }
    }

    let required = fields.iter().filter(|f| f.required).count();
    out.push_str(&format!(
        "\n=== {} required, {} optional ===\n",
        required,
        fields.len() - required
    ));

    out
}
