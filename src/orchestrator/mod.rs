pub mod navigation;
pub mod orchestrator;
pub mod orchestrator_model;
pub mod scheduler;
