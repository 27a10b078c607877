use crate::dom::dom_model::NodeId;

/// Identity of the last winning container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CachedContainer {
    pub node: NodeId,
    pub key: String,
}

#[derive(Debug, Clone, Default)]
pub struct ContainerCache {
    entry: Option<CachedContainer>,
}

impl ContainerCache {
    pub fn get(&self) -> Option<&CachedContainer> {
        self.entry.as_ref()
    }

    pub fn key(&self) -> Option<&str> {
        self.entry.as_ref().map(|e| e.key.as_str())
    }

    pub fn store(&mut self, node: NodeId, key: String) {
        self.entry = Some(CachedContainer { node, key });
    }

    pub fn clear(&mut self) {
        self.entry = None;
    }
}

/// Per-document detection state. Owned by exactly one orchestrator.
#[derive(Debug, Clone, Default)]
pub struct ExtractionState {
    pub container_cache: ContainerCache,
    pub emitted_signature: Option<String>,
    pub stable_signature: Option<String>,
    pub stable_passes: u32,
    pub finalized: bool,
}

impl ExtractionState {
    /// Back to boot state: cache, signatures, counter and finalized flag.
    pub fn reset(&mut self) {
        *self = ExtractionState::default();
    }
}
