pub mod fargate;
pub mod parse;
pub mod stack;

pub use parse::{StackConfigDto, parse_config_content};
pub use stack::{BucketConfig, DatabaseConfig, NetworkConfig, ServiceConfig, StackConfig};
