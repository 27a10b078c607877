use serde::{Deserialize, Serialize};

use crate::screen::screen_model::FieldDescriptor;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum OrchestratorPhase {
    Idle,
    Scheduled,
    Running,
    Finalized,
}

/// How the document's location changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NavigationEvent {
    /// Fresh document load
    Load,
    /// `history.pushState`
    PushState,
    /// `history.replaceState`
    ReplaceState,
    /// Back/forward (`popstate`)
    Traverse,
}

/// Result of asking the orchestrator to make progress.
#[derive(Debug, Clone, PartialEq)]
pub enum PassOutcome {
    /// No run was due (or detection is already finalized)
    NotDue,
    /// Ran, but the result is too small or has no text-bearing field
    Unstable(Vec<FieldDescriptor>),
    /// Ran and counted towards convergence
    Converging {
        fields: Vec<FieldDescriptor>,
        stable_passes: u32,
    },
    /// This pass converged; the list was delivered downstream
    Finalized(Vec<FieldDescriptor>),
}

impl PassOutcome {
    pub fn fields(&self) -> &[FieldDescriptor] {
        match self {
            PassOutcome::NotDue => &[],
            PassOutcome::Unstable(fields) | PassOutcome::Finalized(fields) => fields,
            PassOutcome::Converging { fields, .. } => fields,
        }
    }

    pub fn is_finalized(&self) -> bool {
        matches!(self, PassOutcome::Finalized(_))
    }
}
