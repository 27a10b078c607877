use form_detection::dom::dom_model::{Document, NodeId};
use form_detection::screen::container::{
    choose_primary_container, compare_candidates, count_logical_fields, is_in_excluded_region,
    primary_form_container, rank_candidates,
};
use form_detection::screen::eligibility::query_eligible_controls;
use form_detection::screen::screen_model::{CandidateStats, DetectionConfig};
use form_detection::state::state_model::ContainerCache;
use std::cmp::Ordering;

mod common;
use common::{el, el_text, form_page, resize};

fn stats_for(doc: &Document, config: &DetectionConfig, node: NodeId) -> CandidateStats {
    rank_candidates(doc, config)
        .into_iter()
        .find(|c| c.container == node)
        .expect("node should be a candidate")
}

fn winner(doc: &Document, config: &DetectionConfig) -> Option<NodeId> {
    let candidates = rank_candidates(doc, config);
    choose_primary_container(&candidates, config).map(|c| c.container)
}

fn candidate(discovery_index: usize) -> CandidateStats {
    CandidateStats {
        container: NodeId(discovery_index),
        logical_field_count: 3,
        text_like_field_count: 3,
        has_submit_control: false,
        is_form_semantic: false,
        is_excluded_region: false,
        visible_area: 100.0,
        discovery_index,
    }
}

// =========================================================================
// Candidate statistics
// =========================================================================

#[test]
fn radio_groups_collapse_to_one_logical_field() {
    let mut doc = Document::new();
    let body = doc.body();
    let form = el(&mut doc, body, "form", &[]);
    for value in ["a", "b", "c", "d", "e"] {
        el(&mut doc, form, "input", &[("type", "radio"), ("name", "plan"), ("value", value)]);
    }
    el(&mut doc, form, "input", &[("type", "text"), ("name", "first")]);
    el(&mut doc, form, "input", &[("type", "email"), ("name", "mail")]);

    let config = DetectionConfig::default();
    let stats = stats_for(&doc, &config, form);

    assert_eq!(stats.logical_field_count, 3, "5 radios + 2 inputs = 3 logical fields");
    assert_eq!(stats.text_like_field_count, 2, "Radios are not text-like");
    assert!(stats.is_form_semantic);
    assert!(!stats.has_submit_control);

    let controls = query_eligible_controls(&doc, form);
    assert_eq!(controls.len(), 7);
    assert_eq!(count_logical_fields(&doc, &controls), 3);
}

#[test]
fn unnamed_radios_count_individually() {
    let mut doc = Document::new();
    let body = doc.body();
    let form = el(&mut doc, body, "form", &[]);
    el(&mut doc, form, "input", &[("type", "radio")]);
    el(&mut doc, form, "input", &[("type", "radio"), ("name", "  ")]);

    let controls = query_eligible_controls(&doc, form);
    assert_eq!(count_logical_fields(&doc, &controls), 2);
}

#[test]
fn ancestor_walk_is_bounded() {
    let mut doc = Document::new();
    let body = doc.body();
    let outer = el(&mut doc, body, "section", &[]);
    let inner = el(&mut doc, outer, "div", &[]);
    let input = el(&mut doc, inner, "input", &[]);

    let config = DetectionConfig {
        max_ancestor_depth: 1,
        ..DetectionConfig::default()
    };
    let nodes: Vec<NodeId> = rank_candidates(&doc, &config)
        .into_iter()
        .map(|c| c.container)
        .collect();

    assert_eq!(nodes, vec![input, inner], "Control itself plus one ancestor");
}

#[test]
fn submit_hints_are_detected() {
    let mut doc = Document::new();
    let body = doc.body();
    let config = DetectionConfig::default();

    let untyped = el(&mut doc, body, "div", &[]);
    el(&mut doc, untyped, "input", &[]);
    el_text(&mut doc, untyped, "button", &[], "Go");

    let testid = el(&mut doc, body, "div", &[]);
    el(&mut doc, testid, "input", &[]);
    el(&mut doc, testid, "a", &[("data-testid", "Submit-Application")]);

    let plain = el(&mut doc, body, "div", &[]);
    el(&mut doc, plain, "input", &[]);
    el_text(&mut doc, plain, "button", &[("type", "button")], "Cancel");

    assert!(stats_for(&doc, &config, untyped).has_submit_control);
    assert!(stats_for(&doc, &config, testid).has_submit_control);
    assert!(!stats_for(&doc, &config, plain).has_submit_control);
}

// =========================================================================
// Excluded regions
// =========================================================================

#[test]
fn page_chrome_is_excluded() {
    let mut doc = Document::new();
    let body = doc.body();

    let header = el(&mut doc, body, "header", &[]);
    let in_header = el(&mut doc, header, "input", &[]);
    let search = el(&mut doc, body, "div", &[("role", "search")]);
    let banner = el(&mut doc, body, "div", &[("class", "Cookie-Banner")]);
    let consent = el(&mut doc, body, "div", &[("id", "gdpr-consent")]);
    let labelled = el(&mut doc, body, "div", &[("aria-label", "Cookie settings")]);
    let main = el(&mut doc, body, "main", &[]);

    assert!(is_in_excluded_region(&doc, in_header), "Inherited from the header");
    assert!(is_in_excluded_region(&doc, search));
    assert!(is_in_excluded_region(&doc, banner));
    assert!(is_in_excluded_region(&doc, consent));
    assert!(is_in_excluded_region(&doc, labelled));
    assert!(!is_in_excluded_region(&doc, main));
}

#[test]
fn excluded_region_never_beats_content() {
    let mut doc = Document::new();
    let body = doc.body();

    let nav = el(&mut doc, body, "nav", &[]);
    resize(&mut doc, nav, 1200.0, 80.0);
    for _ in 0..3 {
        el(&mut doc, nav, "input", &[]);
    }

    let form = el(&mut doc, body, "form", &[]);
    el(&mut doc, form, "input", &[]);
    el(&mut doc, form, "input", &[]);
    el_text(&mut doc, form, "button", &[("type", "submit")], "Send");

    let config = DetectionConfig::default();
    let chosen = winner(&doc, &config);

    assert_ne!(chosen, Some(nav), "nav has 3 fields but is chrome");
    assert_eq!(chosen, Some(body), "body is the smallest content container with 3+ fields");
}

#[test]
fn controls_only_in_chrome_yield_no_container() {
    let mut doc = Document::new();
    let body = doc.body();
    let nav = el(&mut doc, body, "nav", &[]);
    el(&mut doc, nav, "input", &[("type", "search")]);

    let config = DetectionConfig::default();
    assert_eq!(winner(&doc, &config), None);
}

#[test]
fn empty_page_yields_no_container() {
    let doc = Document::new();
    let config = DetectionConfig::default();

    assert!(rank_candidates(&doc, &config).is_empty());
    assert_eq!(winner(&doc, &config), None);
}

// =========================================================================
// Selection
// =========================================================================

#[test]
fn form_element_wins_over_equal_ancestors() {
    let (doc, form) = form_page(3);
    let config = DetectionConfig::default();

    assert_eq!(winner(&doc, &config), Some(form), "Form-semantic breaks the tie with body");
}

#[test]
fn relaxed_pass_accepts_small_forms_with_submit() {
    let mut doc = Document::new();
    let body = doc.body();
    let search = el(&mut doc, body, "div", &[]);
    el(&mut doc, search, "input", &[]);
    el_text(&mut doc, search, "button", &[], "Go");

    let config = DetectionConfig::default();
    assert_eq!(winner(&doc, &config), Some(search), "Largest area wins among relaxed ties");
}

#[test]
fn relaxed_pass_rejects_lone_checkbox() {
    let mut doc = Document::new();
    let body = doc.body();
    let wrapper = el(&mut doc, body, "div", &[]);
    el(&mut doc, wrapper, "input", &[("type", "checkbox")]);
    el_text(&mut doc, wrapper, "button", &[], "OK");

    let config = DetectionConfig::default();
    assert_eq!(winner(&doc, &config), None, "No text-like field anywhere");
}

#[test]
fn relaxed_pass_accepts_two_text_fields_without_submit() {
    let mut doc = Document::new();
    let body = doc.body();
    let pair = el(&mut doc, body, "div", &[]);
    resize(&mut doc, pair, 400.0, 100.0);
    el(&mut doc, pair, "input", &[]);
    el(&mut doc, pair, "textarea", &[]);

    let config = DetectionConfig::default();
    assert_eq!(winner(&doc, &config), Some(pair));
}

#[test]
fn equal_sibling_containers_resolve_by_discovery_order() {
    let mut doc = Document::new();
    let body = doc.body();
    let first = el(&mut doc, body, "div", &[]);
    let second = el(&mut doc, body, "div", &[]);
    for parent in [second, first] {
        for _ in 0..3 {
            el(&mut doc, parent, "input", &[]);
        }
    }

    // Keep body out of the running so only the two siblings compete.
    let config = DetectionConfig {
        max_ancestor_depth: 1,
        ..DetectionConfig::default()
    };

    assert_eq!(
        winner(&doc, &config),
        Some(first),
        "Earlier in document order is discovered first"
    );
}

#[test]
fn comparison_order_follows_priority() {
    let base = candidate(0);

    let excluded = CandidateStats {
        is_excluded_region: true,
        logical_field_count: 10,
        ..candidate(1)
    };
    assert_eq!(compare_candidates(&base, &excluded), Ordering::Less);

    let more_fields = CandidateStats {
        logical_field_count: 4,
        ..candidate(1)
    };
    assert_eq!(compare_candidates(&more_fields, &base), Ordering::Less);

    let more_text = CandidateStats {
        text_like_field_count: 4,
        ..candidate(1)
    };
    assert_eq!(compare_candidates(&more_text, &base), Ordering::Less);

    let submit = CandidateStats {
        has_submit_control: true,
        ..candidate(1)
    };
    assert_eq!(compare_candidates(&submit, &base), Ordering::Less);

    let semantic = CandidateStats {
        is_form_semantic: true,
        ..candidate(1)
    };
    assert_eq!(compare_candidates(&semantic, &base), Ordering::Less);

    let larger = CandidateStats {
        visible_area: 500.0,
        ..candidate(1)
    };
    assert_eq!(compare_candidates(&larger, &base), Ordering::Less);

    assert_eq!(
        compare_candidates(&base, &candidate(1)),
        Ordering::Less,
        "Earlier discovery wins a full tie"
    );
}

// =========================================================================
// Container cache
// =========================================================================

#[test]
fn cached_container_is_reused_while_valid() {
    let (mut doc, form) = form_page(3);
    let config = DetectionConfig::default();
    let mut cache = ContainerCache::default();

    assert_eq!(primary_form_container(&doc, &mut cache, &config), Some(form));
    let key = cache.key().map(str::to_string);
    assert_eq!(
        key.as_deref(),
        Some("html:nth-of-type(1) > body:nth-of-type(1) > form:nth-of-type(1)")
    );

    // A bigger form appears later in the page; the cached one still holds.
    let body = doc.body();
    let other = el(&mut doc, body, "form", &[]);
    for _ in 0..5 {
        el(&mut doc, other, "input", &[]);
    }

    assert_eq!(primary_form_container(&doc, &mut cache, &config), Some(form));
    assert_eq!(cache.key().map(str::to_string), key);
}

#[test]
fn cache_is_invalidated_when_selector_changes() {
    let (mut doc, form) = form_page(3);
    let config = DetectionConfig::default();
    let mut cache = ContainerCache::default();

    primary_form_container(&doc, &mut cache, &config);
    doc.set_attribute(form, "id", "signup");

    assert_eq!(primary_form_container(&doc, &mut cache, &config), Some(form));
    assert_eq!(cache.key(), Some("#signup"), "Re-selected under its new key");
}

#[test]
fn cache_is_cleared_when_container_disappears() {
    let (mut doc, form) = form_page(3);
    let config = DetectionConfig::default();
    let mut cache = ContainerCache::default();

    primary_form_container(&doc, &mut cache, &config);
    let body = doc.body();
    doc.remove_child(body, form);

    assert_eq!(primary_form_container(&doc, &mut cache, &config), None);
    assert!(cache.get().is_none());
}

#[test]
fn cache_is_invalidated_when_container_loses_all_fields() {
    let (mut doc, form) = form_page(3);
    let config = DetectionConfig::default();
    let mut cache = ContainerCache::default();

    primary_form_container(&doc, &mut cache, &config);

    let inputs: Vec<NodeId> = doc
        .element_children(form)
        .filter(|n| doc.tag(*n) == "input")
        .collect();
    for input in inputs {
        doc.remove_child(form, input);
    }

    assert_eq!(primary_form_container(&doc, &mut cache, &config), None);
}
