pub mod identity;
pub mod signature;
pub mod state_model;
