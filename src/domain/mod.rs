pub mod config;
pub mod error;
pub mod grant;
pub mod graph;
pub mod identities;
pub mod image;
pub mod manifest;
pub mod network;
pub mod resource;
pub mod token;
pub mod topology;

pub use config::StackConfig;
pub use error::AppError;
pub use grant::{Grant, Output, TaskIdentity};
pub use graph::ReferenceGraph;
pub use identities::LogicalId;
pub use image::{DEFAULT_IMAGE_TAG, ImageReference, ImageTag};
pub use manifest::{Manifest, ManifestBuilder, ManifestFormat};
pub use network::{Ipv4Block, NetworkSpec, SubnetKind};
pub use resource::{Resource, ResourceKind, ResourceSpec};
pub use token::{Attribute, Token};
pub use topology::declare;
