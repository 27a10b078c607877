use crate::dom::dom_model::{Document, NodeId};
use crate::error::DetectError;
use crate::screen::classifier::classify_field;
use crate::screen::container::primary_form_container;
use crate::screen::eligibility::query_eligible_controls;
use crate::screen::label::{placeholder, resolve_context_text, resolve_label};
use crate::screen::required::is_required_field;
use crate::screen::screen_model::{Control, DetectionConfig, FieldDescriptor};
use crate::state::identity::stable_field_id;
use crate::state::state_model::ContainerCache;

/// One full extraction pass over the current tree.
///
/// An empty list means no primary form was found; that is not an error.
pub fn extract_form_fields(
    doc: &Document,
    cache: &mut ContainerCache,
    config: &DetectionConfig,
) -> Result<Vec<FieldDescriptor>, DetectError> {
    let Some(container) = primary_form_container(doc, cache, config) else {
        return Ok(Vec::new());
    };

    fields_in_container(doc, container, config)
}

/// Describe every eligible control inside `container`.
pub fn fields_in_container(
    doc: &Document,
    container: NodeId,
    config: &DetectionConfig,
) -> Result<Vec<FieldDescriptor>, DetectError> {
    query_eligible_controls(doc, container)
        .into_iter()
        .enumerate()
        .map(|(index, control)| describe_control(doc, &control, index, config))
        .collect()
}

fn describe_control(
    doc: &Document,
    control: &Control,
    index: usize,
    config: &DetectionConfig,
) -> Result<FieldDescriptor, DetectError> {
    let field = FieldDescriptor {
        id: stable_field_id(&control.selector, index),
        field_type: classify_field(doc, control.node),
        label: resolve_label(doc, control.node, &config.unlabeled_sentinel),
        placeholder: placeholder(doc, control.node),
        context_text: resolve_context_text(doc, control.node),
        required: is_required_field(doc, control.node),
        selector: control.selector.clone(),
    };

    field.validate()?;
    Ok(field)
}
