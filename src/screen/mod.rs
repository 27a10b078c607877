pub mod classifier;
pub mod container;
pub mod eligibility;
pub mod extract;
pub mod label;
pub mod required;
pub mod screen_model;
