use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};

use tracing::debug;

use crate::dom::dom_model::{Document, NodeId};
use crate::screen::classifier::is_text_like_control;
use crate::screen::eligibility::{is_input_of_type, query_eligible_controls};
use crate::screen::screen_model::{CandidateStats, Control, DetectionConfig};
use crate::state::identity::selector_for;
use crate::state::state_model::ContainerCache;

#[derive(Debug, Default)]
struct CandidateAccumulator {
    logical_keys: HashSet<String>,
    text_like_keys: HashSet<String>,
    discovery_index: usize,
}

/// Radios sharing a non-empty `name` collapse to one `radio:<name>` key;
/// every other control is its own logical field.
pub fn logical_key(doc: &Document, control: &Control) -> String {
    if is_input_of_type(doc, control.node, "radio") {
        if let Some(name) = doc.attr(control.node, "name") {
            if !name.trim().is_empty() {
                return format!("radio:{}", name);
            }
        }
    }
    control.selector.clone()
}

pub fn count_logical_fields(doc: &Document, controls: &[Control]) -> usize {
    controls
        .iter()
        .map(|c| logical_key(doc, c))
        .collect::<HashSet<_>>()
        .len()
}

/// Walk up to `max_depth` ancestors of each control (the control itself is
/// level 0) and accumulate per-ancestor field sets.
///
/// Returned in first-discovery order.
fn collect_candidate_containers(
    doc: &Document,
    controls: &[Control],
    max_depth: usize,
) -> Vec<(NodeId, CandidateAccumulator)> {
    let mut by_container: HashMap<NodeId, CandidateAccumulator> = HashMap::new();
    let mut order: Vec<NodeId> = Vec::new();

    for control in controls {
        let key = logical_key(doc, control);
        let text_like = is_text_like_control(doc, control.node);

        let chain = std::iter::once(control.node).chain(doc.ancestors(control.node));
        for current in chain.take(max_depth + 1) {
            let acc = by_container.entry(current).or_insert_with(|| {
                order.push(current);
                CandidateAccumulator {
                    discovery_index: order.len() - 1,
                    ..Default::default()
                }
            });

            acc.logical_keys.insert(key.clone());
            if text_like {
                acc.text_like_keys.insert(control.selector.clone());
            }
        }
    }

    order
        .into_iter()
        .filter_map(|node| by_container.remove(&node).map(|acc| (node, acc)))
        .collect()
}

/// `header, nav, footer, aside, [role=search]` plus cookie/consent banners.
fn matches_excluded_region(doc: &Document, id: NodeId) -> bool {
    if matches!(doc.tag(id), "header" | "nav" | "footer" | "aside") {
        return true;
    }
    if doc.attr(id, "role") == Some("search") {
        return true;
    }

    let hints = |name: &str, needle: &str| {
        doc.attr(id, name)
            .map(|v| v.to_lowercase().contains(needle))
            .unwrap_or(false)
    };

    hints("aria-label", "cookie")
        || hints("id", "cookie")
        || hints("class", "cookie")
        || hints("id", "consent")
        || hints("class", "consent")
}

/// The node or one of its ancestors is page chrome rather than content.
pub fn is_in_excluded_region(doc: &Document, id: NodeId) -> bool {
    doc.closest(id, |n| matches_excluded_region(doc, n)).is_some()
}

fn is_submit_control(doc: &Document, id: NodeId) -> bool {
    let tag = doc.tag(id);
    let type_attr = doc.attr(id, "type").map(|t| t.trim().to_lowercase());

    if (tag == "button" || tag == "input") && type_attr.as_deref() == Some("submit") {
        return true;
    }
    if tag == "button" && type_attr.is_none() {
        return true;
    }

    let hints_submit = |name: &str| {
        doc.attr(id, name)
            .map(|v| v.to_lowercase().contains("submit"))
            .unwrap_or(false)
    };
    hints_submit("data-testid") || hints_submit("aria-label")
}

pub fn has_submit_control(doc: &Document, container: NodeId) -> bool {
    doc.descendant_elements(container)
        .into_iter()
        .any(|d| is_submit_control(doc, d))
}

pub fn is_form_semantic(doc: &Document, id: NodeId) -> bool {
    doc.tag(id) == "form" || doc.attr(id, "role") == Some("form")
}

fn build_candidate_stats(
    doc: &Document,
    candidates: Vec<(NodeId, CandidateAccumulator)>,
) -> Vec<CandidateStats> {
    candidates
        .into_iter()
        .map(|(container, acc)| CandidateStats {
            container,
            logical_field_count: acc.logical_keys.len(),
            text_like_field_count: acc.text_like_keys.len(),
            has_submit_control: has_submit_control(doc, container),
            is_form_semantic: is_form_semantic(doc, container),
            is_excluded_region: is_in_excluded_region(doc, container),
            visible_area: doc.rect(container).area(),
            discovery_index: acc.discovery_index,
        })
        .collect()
}

/// Ranking order; the best candidate sorts first.
pub fn compare_candidates(a: &CandidateStats, b: &CandidateStats) -> Ordering {
    a.is_excluded_region
        .cmp(&b.is_excluded_region)
        .then_with(|| b.logical_field_count.cmp(&a.logical_field_count))
        .then_with(|| b.text_like_field_count.cmp(&a.text_like_field_count))
        .then_with(|| b.has_submit_control.cmp(&a.has_submit_control))
        .then_with(|| b.is_form_semantic.cmp(&a.is_form_semantic))
        .then_with(|| b.visible_area.total_cmp(&a.visible_area))
        .then_with(|| a.discovery_index.cmp(&b.discovery_index))
}

/// Shape the relaxed pass accepts. The disjunction is a tuned heuristic.
fn passes_relaxed(stats: &CandidateStats, config: &DetectionConfig) -> bool {
    !stats.is_excluded_region
        && stats.logical_field_count >= config.relaxed_min_logical_fields
        && stats.text_like_field_count >= 1
        && (stats.is_form_semantic || stats.has_submit_control || stats.text_like_field_count >= 2)
}

/// Score every candidate ancestor of the document's eligible controls.
pub fn rank_candidates(doc: &Document, config: &DetectionConfig) -> Vec<CandidateStats> {
    let controls = query_eligible_controls(doc, doc.root());
    if controls.is_empty() {
        return Vec::new();
    }

    let candidates = collect_candidate_containers(doc, &controls, config.max_ancestor_depth);
    build_candidate_stats(doc, candidates)
}

/// Run the strict pass, then the relaxed pass, and return the best survivor.
pub fn choose_primary_container(
    candidates: &[CandidateStats],
    config: &DetectionConfig,
) -> Option<CandidateStats> {
    let mut strict: Vec<&CandidateStats> = candidates
        .iter()
        .filter(|c| c.logical_field_count >= config.min_logical_fields)
        .collect();

    if strict.is_empty() {
        let mut relaxed: Vec<&CandidateStats> = candidates
            .iter()
            .filter(|c| passes_relaxed(c, config))
            .collect();

        if relaxed.is_empty() {
            return None;
        }

        debug!(candidates = relaxed.len(), "strict pass empty, using relaxed candidates");
        relaxed.sort_by(|a, b| compare_candidates(a, b));
        return relaxed.first().map(|c| (*c).clone());
    }

    strict.sort_by(|a, b| compare_candidates(a, b));
    strict.first().map(|c| (*c).clone())
}

/// Whether the cached winner can be reused without re-running selection.
fn is_valid_primary_container(
    doc: &Document,
    node: NodeId,
    key: &str,
    config: &DetectionConfig,
) -> bool {
    if !doc.is_connected(node) {
        return false;
    }
    if selector_for(doc, node) != key {
        return false;
    }
    if is_in_excluded_region(doc, node) {
        return false;
    }

    let controls = query_eligible_controls(doc, node);
    count_logical_fields(doc, &controls) >= config.relaxed_min_logical_fields
}

/// Locate the primary form container, reusing the cache when it still holds.
pub fn primary_form_container(
    doc: &Document,
    cache: &mut ContainerCache,
    config: &DetectionConfig,
) -> Option<NodeId> {
    if let Some(cached) = cache.get() {
        if is_valid_primary_container(doc, cached.node, &cached.key, config) {
            debug!(container = %cached.key, "reusing cached primary container");
            return Some(cached.node);
        }
        debug!(container = %cached.key, "cached primary container invalidated");
    }

    let candidates = rank_candidates(doc, config);
    match choose_primary_container(&candidates, config) {
        Some(winner) => {
            let key = selector_for(doc, winner.container);
            debug!(
                container = %key,
                logical_fields = winner.logical_field_count,
                text_like_fields = winner.text_like_field_count,
                "selected primary container"
            );
            cache.store(winner.container, key);
            Some(winner.container)
        }
        None => {
            cache.clear();
            None
        }
    }
}
