use std::time::Instant;

use crate::dom::dom_model::Document;
use crate::orchestrator::orchestrator_model::NavigationEvent;

/// Implemented by anything that must restart when the page location changes.
///
/// The host decides how navigations are detected (history hooks, `popstate`,
/// a driver callback) and reports them here.
pub trait NavigationListener {
    fn navigated(&mut self, doc: &mut Document, event: NavigationEvent, now: Instant);
}
