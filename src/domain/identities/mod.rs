pub mod logical_id;
pub mod validation;

pub use logical_id::LogicalId;
