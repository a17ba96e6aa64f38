//! Desired-state resource records.

use std::collections::BTreeMap;

use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};

use crate::domain::network::{NetworkSpec, SubnetKind};
use crate::domain::{Attribute, ImageReference, LogicalId, Token};

/// Characters excluded from generated database passwords.
pub const PASSWORD_EXCLUDED_CHARACTERS: &str = " %+~`#$&*()|[]{}:;<>?!'/@\"\\";

/// Length of generated database passwords.
pub const PASSWORD_LENGTH: u32 = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ResourceKind {
    Network,
    CredentialSecret,
    DatabaseCluster,
    StaticBucket,
    UrlSecret,
    ServiceCluster,
    TaskService,
}

impl ResourceKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ResourceKind::Network => "network",
            ResourceKind::CredentialSecret => "credential-secret",
            ResourceKind::DatabaseCluster => "database-cluster",
            ResourceKind::StaticBucket => "static-bucket",
            ResourceKind::UrlSecret => "url-secret",
            ResourceKind::ServiceCluster => "service-cluster",
            ResourceKind::TaskService => "task-service",
        }
    }

    /// Attributes a resource of this kind exposes to other resources.
    pub fn exports(self) -> &'static [Attribute] {
        match self {
            ResourceKind::DatabaseCluster => &[
                Attribute::EndpointAddress,
                Attribute::EndpointPort,
                Attribute::SecurityGroupId,
            ],
            ResourceKind::StaticBucket => &[Attribute::BucketArn, Attribute::BucketDomainName],
            ResourceKind::TaskService => &[
                Attribute::SecurityGroupId,
                Attribute::TaskRoleArn,
                Attribute::ExecutionRoleArn,
                Attribute::LoadBalancerDnsName,
            ],
            ResourceKind::Network
            | ResourceKind::CredentialSecret
            | ResourceKind::UrlSecret
            | ResourceKind::ServiceCluster => &[],
        }
    }
}

impl std::fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How the provider generates the secret value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedSecretString {
    pub secret_string_template: String,
    pub generate_string_key: String,
    pub password_length: u32,
    pub exclude_characters: String,
}

/// Generated database login. The password never appears in the manifest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CredentialSecretSpec {
    pub username: String,
    pub generate_secret_string: GeneratedSecretString,
}

impl CredentialSecretSpec {
    pub fn for_user(username: &str) -> Self {
        let template = serde_json::json!({ "username": username }).to_string();
        Self {
            username: username.to_string(),
            generate_secret_string: GeneratedSecretString {
                secret_string_template: template,
                generate_string_key: "password".to_string(),
                password_length: PASSWORD_LENGTH,
                exclude_characters: PASSWORD_EXCLUDED_CHARACTERS.to_string(),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DatabaseClusterSpec {
    pub engine: String,
    pub engine_version: String,
    pub instance_class: String,
    pub instances: u8,
    pub default_database_name: String,
    pub port: u16,
    pub network: Token,
    pub subnet_kind: SubnetKind,
    pub master_username: Token,
    pub master_user_password: Token,
}

/// The four public-access-block switches of an object store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicAccessBlock {
    pub block_public_acls: bool,
    pub ignore_public_acls: bool,
    pub block_public_policy: bool,
    pub restrict_public_buckets: bool,
}

impl PublicAccessBlock {
    /// Every switch off: objects may be made world-readable.
    pub fn disabled() -> Self {
        Self {
            block_public_acls: false,
            ignore_public_acls: false,
            block_public_policy: false,
            restrict_public_buckets: false,
        }
    }

    pub fn flags(&self) -> [bool; 4] {
        [
            self.block_public_acls,
            self.ignore_public_acls,
            self.block_public_policy,
            self.restrict_public_buckets,
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct PolicyStatement {
    pub effect: String,
    pub principal: String,
    pub action: Vec<String>,
    pub resource: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StaticBucketSpec {
    pub bucket_name: String,
    pub public_read_access: bool,
    pub public_access_block: PublicAccessBlock,
    pub policy: Vec<PolicyStatement>,
}

impl StaticBucketSpec {
    /// A bucket whose objects anyone may read.
    pub fn public_read(bucket_name: &str) -> Self {
        Self {
            bucket_name: bucket_name.to_string(),
            public_read_access: true,
            public_access_block: PublicAccessBlock::disabled(),
            policy: vec![PolicyStatement {
                effect: "Allow".to_string(),
                principal: "*".to_string(),
                action: vec!["s3:GetObject".to_string()],
                resource: vec![format!("arn:aws:s3:::{}/*", bucket_name)],
            }],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UrlSecretSpec {
    pub secret_string: Token,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceClusterSpec {
    pub network: Token,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContainerSpec {
    pub name: String,
    pub image: ImageReference,
    pub container_port: u16,
    pub secrets: BTreeMap<String, Token>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadBalancerSpec {
    pub public: bool,
    pub listener_port: u16,
    pub protocol: String,
    pub target_port: u16,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskServiceSpec {
    pub cluster: Token,
    pub launch_type: String,
    pub cpu: u32,
    pub memory_mib: u32,
    pub desired_count: u32,
    pub subnet_kind: SubnetKind,
    pub container: ContainerSpec,
    pub load_balancer: LoadBalancerSpec,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ResourceSpec {
    Network(NetworkSpec),
    CredentialSecret(CredentialSecretSpec),
    DatabaseCluster(DatabaseClusterSpec),
    StaticBucket(StaticBucketSpec),
    UrlSecret(UrlSecretSpec),
    ServiceCluster(ServiceClusterSpec),
    TaskService(TaskServiceSpec),
}

impl ResourceSpec {
    pub fn kind(&self) -> ResourceKind {
        match self {
            ResourceSpec::Network(_) => ResourceKind::Network,
            ResourceSpec::CredentialSecret(_) => ResourceKind::CredentialSecret,
            ResourceSpec::DatabaseCluster(_) => ResourceKind::DatabaseCluster,
            ResourceSpec::StaticBucket(_) => ResourceKind::StaticBucket,
            ResourceSpec::UrlSecret(_) => ResourceKind::UrlSecret,
            ResourceSpec::ServiceCluster(_) => ResourceKind::ServiceCluster,
            ResourceSpec::TaskService(_) => ResourceKind::TaskService,
        }
    }

    /// Every token carried in this resource's properties.
    pub fn tokens(&self) -> Vec<&Token> {
        match self {
            ResourceSpec::Network(_)
            | ResourceSpec::CredentialSecret(_)
            | ResourceSpec::StaticBucket(_) => Vec::new(),
            ResourceSpec::DatabaseCluster(db) => {
                vec![&db.network, &db.master_username, &db.master_user_password]
            }
            ResourceSpec::UrlSecret(secret) => vec![&secret.secret_string],
            ResourceSpec::ServiceCluster(cluster) => vec![&cluster.network],
            ResourceSpec::TaskService(service) => {
                let mut tokens = vec![&service.cluster];
                tokens.extend(service.container.secrets.values());
                tokens
            }
        }
    }

    /// The token naming the parent that places this resource in a network.
    pub fn placement(&self) -> Option<&Token> {
        match self {
            ResourceSpec::DatabaseCluster(db) => Some(&db.network),
            ResourceSpec::ServiceCluster(cluster) => Some(&cluster.network),
            ResourceSpec::TaskService(service) => Some(&service.cluster),
            _ => None,
        }
    }
}

/// A resource entry: its spec plus explicit ordering edges.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resource {
    pub spec: ResourceSpec,
    pub depends_on: Vec<LogicalId>,
}

impl Resource {
    pub fn new(spec: ResourceSpec) -> Self {
        Self { spec, depends_on: Vec::new() }
    }

    pub fn depending_on(mut self, ids: &[&LogicalId]) -> Self {
        self.depends_on.extend(ids.iter().map(|id| (*id).clone()));
        self
    }

    pub fn kind(&self) -> ResourceKind {
        self.spec.kind()
    }
}

impl Serialize for Resource {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let fields = if self.depends_on.is_empty() { 2 } else { 3 };
        let mut state = serializer.serialize_struct("Resource", fields)?;
        state.serialize_field("type", self.kind().as_str())?;
        state.serialize_field("properties", &self.spec)?;
        if self.depends_on.is_empty() {
            state.skip_field("dependsOn")?;
        } else {
            state.serialize_field("dependsOn", &self.depends_on)?;
        }
        state.end()
    }
}
