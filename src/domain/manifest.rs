//! Desired-state manifest.

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;
use sha2::{Digest, Sha256};

use crate::domain::{
    AppError, Grant, LogicalId, Output, ReferenceGraph, Resource, ResourceKind, ResourceSpec,
};

/// Output format for a rendered manifest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ManifestFormat {
    #[default]
    Json,
    Yaml,
}

impl ManifestFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ManifestFormat::Json => "json",
            ManifestFormat::Yaml => "yaml",
        }
    }
}

impl std::str::FromStr for ManifestFormat {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(ManifestFormat::Json),
            "yaml" | "yml" => Ok(ManifestFormat::Yaml),
            other => Err(AppError::config_error(format!(
                "Unknown manifest format '{}': expected json or yaml",
                other
            ))),
        }
    }
}

/// The evaluated topology: every resource, the grants between them, and stack outputs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Manifest {
    #[serde(rename = "stack")]
    stack_name: String,
    description: String,
    resources: BTreeMap<LogicalId, Resource>,
    grants: Vec<Grant>,
    outputs: BTreeMap<String, Output>,
    #[serde(skip)]
    order: Vec<LogicalId>,
    #[serde(skip)]
    dependencies: BTreeMap<LogicalId, BTreeSet<LogicalId>>,
}

impl Manifest {
    pub fn stack_name(&self) -> &str {
        &self.stack_name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn resources(&self) -> &BTreeMap<LogicalId, Resource> {
        &self.resources
    }

    pub fn resource(&self, id: &str) -> Option<&Resource> {
        LogicalId::new(id).ok().and_then(|id| self.resources.get(&id))
    }

    pub fn grants(&self) -> &[Grant] {
        &self.grants
    }

    pub fn outputs(&self) -> &BTreeMap<String, Output> {
        &self.outputs
    }

    /// Resources with dependencies first.
    pub fn deployment_order(&self) -> &[LogicalId] {
        &self.order
    }

    /// Resources `id` must follow: referenced by its tokens or named in `dependsOn`.
    pub fn dependencies_of(&self, id: &LogicalId) -> Option<&BTreeSet<LogicalId>> {
        self.dependencies.get(id)
    }

    pub fn of_kind(&self, kind: ResourceKind) -> impl Iterator<Item = (&LogicalId, &Resource)> {
        self.resources.iter().filter(move |(_, resource)| resource.kind() == kind)
    }

    pub fn count(&self, kind: ResourceKind) -> usize {
        self.of_kind(kind).count()
    }

    pub fn to_json(&self) -> Result<String, AppError> {
        serde_json::to_string_pretty(self).map_err(|err| AppError::Serialization {
            format: "json".to_string(),
            details: err.to_string(),
        })
    }

    pub fn to_yaml(&self) -> Result<String, AppError> {
        serde_yaml::to_string(self).map_err(|err| AppError::Serialization {
            format: "yaml".to_string(),
            details: err.to_string(),
        })
    }

    pub fn render(&self, format: ManifestFormat) -> Result<String, AppError> {
        match format {
            ManifestFormat::Json => self.to_json(),
            ManifestFormat::Yaml => self.to_yaml(),
        }
    }

    /// SHA-256 of the compact JSON form, for change detection.
    pub fn fingerprint(&self) -> Result<String, AppError> {
        let canonical = serde_json::to_vec(self).map_err(|err| AppError::Serialization {
            format: "json".to_string(),
            details: err.to_string(),
        })?;
        Ok(hash_content(&canonical))
    }
}

pub fn hash_content(content: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content);
    let digest = hasher.finalize();
    digest.iter().map(|byte| format!("{:02x}", byte)).collect()
}

/// Collects resources, grants, and outputs, then validates them as a whole.
#[derive(Debug, Default)]
pub struct ManifestBuilder {
    stack_name: String,
    description: String,
    resources: BTreeMap<LogicalId, Resource>,
    grants: Vec<Grant>,
    outputs: BTreeMap<String, Output>,
}

impl ManifestBuilder {
    pub fn new<S: Into<String>, D: Into<String>>(stack_name: S, description: D) -> Self {
        Self { stack_name: stack_name.into(), description: description.into(), ..Self::default() }
    }

    pub fn add_resource(&mut self, id: &LogicalId, resource: Resource) -> Result<(), AppError> {
        if self.resources.contains_key(id) {
            return Err(AppError::DuplicateResource(id.to_string()));
        }
        tracing::debug!(resource = %id, kind = %resource.kind(), "declared resource");
        self.resources.insert(id.clone(), resource);
        Ok(())
    }

    pub fn add_grant(&mut self, grant: Grant) {
        tracing::debug!(grant = %grant.describe(), "declared grant");
        self.grants.push(grant);
    }

    pub fn add_output<S: Into<String>>(&mut self, name: S, output: Output) -> Result<(), AppError> {
        let name = name.into();
        if !crate::domain::identities::validation::validate_logical_id(&name) {
            return Err(AppError::InvalidLogicalId(name));
        }
        if self.outputs.contains_key(&name) {
            return Err(AppError::DuplicateOutput(name));
        }
        self.outputs.insert(name, output);
        Ok(())
    }

    /// Validate references, ordering, and network membership.
    pub fn build(self) -> Result<Manifest, AppError> {
        let graph = ReferenceGraph::build(&self.resources)?;
        graph.check_edges(&self.resources, &self.grants, &self.outputs)?;
        let order = graph.deployment_order()?;

        self.check_network_membership()?;

        Ok(Manifest {
            stack_name: self.stack_name,
            description: self.description,
            resources: self.resources,
            grants: self.grants,
            outputs: self.outputs,
            order,
            dependencies: graph.into_dependencies(),
        })
    }

    fn check_network_membership(&self) -> Result<(), AppError> {
        let networks: Vec<_> = self
            .resources
            .iter()
            .filter(|(_, resource)| matches!(resource.spec, ResourceSpec::Network(_)))
            .map(|(id, _)| id)
            .collect();

        let scoped: Vec<_> =
            self.resources.iter().filter(|(_, r)| r.spec.placement().is_some()).collect();
        if scoped.is_empty() {
            return Ok(());
        }

        match networks.as_slice() {
            [_] => {}
            [] => {
                return Err(AppError::NetworkMembership(
                    "network-scoped resources are declared but no network exists".to_string(),
                ));
            }
            many => {
                let names: Vec<_> = many.iter().map(|id| id.to_string()).collect();
                return Err(AppError::NetworkMembership(format!(
                    "expected exactly one network, found {}",
                    names.join(", ")
                )));
            }
        }

        for (id, _) in scoped {
            ReferenceGraph::network_of(id, &self.resources)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::resource::{ServiceClusterSpec, StaticBucketSpec};
    use crate::domain::{NetworkSpec, Token};

    fn id(s: &str) -> LogicalId {
        LogicalId::new(s).unwrap()
    }

    fn network_resource() -> Resource {
        Resource::new(ResourceSpec::Network(NetworkSpec::new("10.0.0.0/16", 2).unwrap()))
    }

    fn cluster(network: &str) -> Resource {
        Resource::new(ResourceSpec::ServiceCluster(ServiceClusterSpec {
            network: Token::reference(&id(network)),
        }))
    }

    #[test]
    fn duplicate_resource_is_rejected() {
        let mut builder = ManifestBuilder::new("Stack", "test");
        builder.add_resource(&id("Vpc"), network_resource()).unwrap();

        let result = builder.add_resource(&id("Vpc"), network_resource());

        assert!(matches!(result, Err(AppError::DuplicateResource(name)) if name == "Vpc"));
    }

    #[test]
    fn duplicate_output_is_reported_as_output() {
        let mut builder = ManifestBuilder::new("Stack", "test");
        let output = || Output { description: "dns".to_string(), value: Token::literal("x") };
        builder.add_output("Dns", output()).unwrap();

        let err = builder.add_output("Dns", output()).unwrap_err();

        assert!(matches!(&err, AppError::DuplicateOutput(name) if name == "Dns"));
        assert_eq!(err.to_string(), "Output 'Dns' is declared more than once");
    }

    #[test]
    fn second_network_violates_membership() {
        let mut builder = ManifestBuilder::new("Stack", "test");
        builder.add_resource(&id("VpcA"), network_resource()).unwrap();
        builder.add_resource(&id("VpcB"), network_resource()).unwrap();
        builder.add_resource(&id("Cluster"), cluster("VpcA")).unwrap();

        assert!(matches!(builder.build(), Err(AppError::NetworkMembership(_))));
    }

    #[test]
    fn network_free_manifest_builds() {
        let mut builder = ManifestBuilder::new("Stack", "test");
        builder
            .add_resource(
                &id("Bucket"),
                Resource::new(ResourceSpec::StaticBucket(StaticBucketSpec::public_read("bucket-a"))),
            )
            .unwrap();

        let manifest = builder.build().unwrap();

        assert_eq!(manifest.count(ResourceKind::StaticBucket), 1);
        assert_eq!(manifest.deployment_order(), &[id("Bucket")]);
        assert!(manifest.dependencies_of(&id("Bucket")).unwrap().is_empty());
    }

    #[test]
    fn output_referencing_unknown_resource_fails() {
        let mut builder = ManifestBuilder::new("Stack", "test");
        builder
            .add_output(
                "Dns",
                Output { description: "dns".to_string(), value: Token::reference(&id("Nope")) },
            )
            .unwrap();

        assert!(matches!(builder.build(), Err(AppError::UnresolvedReference { .. })));
    }

    #[test]
    fn format_parsing() {
        assert_eq!("JSON".parse::<ManifestFormat>().unwrap(), ManifestFormat::Json);
        assert_eq!("yml".parse::<ManifestFormat>().unwrap(), ManifestFormat::Yaml);
        assert!("toml".parse::<ManifestFormat>().is_err());
    }

    #[test]
    fn hash_content_is_sha256_hex() {
        // echo -n "hello world" | shasum -a 256
        assert_eq!(
            hash_content(b"hello world"),
            "b94d27b9934d3e08a52e52d7da7dabfac484efe37a5380ee9088f7ace2efcde9"
        );
    }
}
