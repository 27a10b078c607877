pub mod messages;
pub mod sink;
