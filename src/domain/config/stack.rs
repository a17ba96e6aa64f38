//! Naming and sizing constants for the topology.

use std::net::Ipv4Addr;

use url::Url;

use super::fargate;
use crate::domain::identities::validation::{validate_env_var_name, validate_sql_identifier};
use crate::domain::image::validate_repository;
use crate::domain::network::allocate_subnets;
use crate::domain::{AppError, ImageReference, ImageTag, Ipv4Block};

pub const DEFAULT_STACK_NAME: &str = "Hw2Stack";
pub const DEFAULT_IMAGE_REPOSITORY: &str = "danieltimko/recipes-rs";
pub const DATABASE_ENGINE: &str = "aurora-postgresql";
pub const DATABASE_URL_TEMPLATE: &str = "postgres://${DBUser}:${DBPassword}@${DBHost}/${DBName}";

const RESERVED_DATABASE_USERS: &[&str] = &["rdsadmin"];
const MAX_CLUSTER_INSTANCES: u8 = 16;
const MAX_AVAILABILITY_ZONES: u8 = 6;

/// Validated configuration consumed by the topology declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StackConfig {
    pub stack_name: String,
    pub image_tag: ImageTag,
    pub network: NetworkConfig,
    pub database: DatabaseConfig,
    pub bucket: BucketConfig,
    pub service: ServiceConfig,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkConfig {
    pub max_azs: u8,
    pub cidr: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseConfig {
    /// Default schema created with the cluster.
    pub name: String,
    pub user: String,
    pub engine_version: String,
    pub instance_class: String,
    pub instances: u8,
    pub port: u16,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BucketConfig {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceConfig {
    pub image_repository: String,
    pub container_port: u16,
    pub cpu: u32,
    pub memory_mib: u32,
    pub desired_count: u32,
    pub public_load_balancer: bool,
    pub listener_port: u16,
    /// Container environment variable receiving the database URL.
    pub database_url_env: String,
}

impl Default for StackConfig {
    fn default() -> Self {
        Self {
            stack_name: DEFAULT_STACK_NAME.to_string(),
            image_tag: ImageTag::default(),
            network: NetworkConfig::default(),
            database: DatabaseConfig::default(),
            bucket: BucketConfig::default(),
            service: ServiceConfig::default(),
        }
    }
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self { max_azs: 2, cidr: "10.0.0.0/16".to_string() }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            name: "hw2".to_string(),
            user: "dbadmin".to_string(),
            engine_version: "16.6".to_string(),
            instance_class: "db.t3.medium".to_string(),
            instances: 2,
            port: 5432,
        }
    }
}

impl Default for BucketConfig {
    fn default() -> Self {
        Self { name: "recipes-rs-static-content".to_string() }
    }
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            image_repository: DEFAULT_IMAGE_REPOSITORY.to_string(),
            container_port: 8080,
            cpu: 512,
            memory_mib: 1024,
            desired_count: 1,
            public_load_balancer: true,
            listener_port: 80,
            database_url_env: "DATABASE_URL".to_string(),
        }
    }
}

impl StackConfig {
    /// Replace the image tag, keeping every other constant.
    pub fn with_image_tag(mut self, tag: ImageTag) -> Self {
        self.image_tag = tag;
        self
    }

    pub fn image_reference(&self) -> Result<ImageReference, AppError> {
        ImageReference::new(&self.service.image_repository, self.image_tag.clone())
    }

    /// Check every constant, failing on the first invalid one.
    pub fn validate(&self) -> Result<(), AppError> {
        validate_stack_name(&self.stack_name)?;
        validate_repository(&self.service.image_repository)?;
        self.network.validate()?;
        self.database.validate()?;
        validate_bucket_name(&self.bucket.name)?;
        self.service.validate()?;
        validate_database_url_shape(&self.database)?;
        Ok(())
    }
}

impl NetworkConfig {
    fn validate(&self) -> Result<(), AppError> {
        if !(1..=MAX_AVAILABILITY_ZONES).contains(&self.max_azs) {
            return Err(AppError::invalid_constant(
                "network.max_azs",
                format!("must be between 1 and {}", MAX_AVAILABILITY_ZONES),
            ));
        }
        let block = Ipv4Block::parse(&self.cidr)?;
        allocate_subnets(block, self.max_azs)?;
        Ok(())
    }
}

impl DatabaseConfig {
    fn validate(&self) -> Result<(), AppError> {
        if !validate_sql_identifier(&self.name) {
            return Err(AppError::invalid_constant(
                "database.name",
                "must start with a letter and contain at most 63 letters, digits, or '_'",
            ));
        }
        if !validate_sql_identifier(&self.user) {
            return Err(AppError::invalid_constant(
                "database.user",
                "must start with a letter and contain at most 63 letters, digits, or '_'",
            ));
        }
        if RESERVED_DATABASE_USERS.contains(&self.user.as_str()) {
            return Err(AppError::invalid_constant(
                "database.user",
                format!("'{}' is reserved by the provider", self.user),
            ));
        }

        let version_ok = self.engine_version.split_once('.').is_some_and(|(major, minor)| {
            !major.is_empty()
                && !minor.is_empty()
                && major.chars().all(|c| c.is_ascii_digit())
                && minor.chars().all(|c| c.is_ascii_digit())
        });
        if !version_ok {
            return Err(AppError::invalid_constant(
                "database.engine_version",
                format!("'{}' must look like <major>.<minor>", self.engine_version),
            ));
        }

        let class_ok = self
            .instance_class
            .strip_prefix("db.")
            .is_some_and(|rest| rest.split('.').count() == 2 && !rest.split('.').any(str::is_empty));
        if !class_ok {
            return Err(AppError::invalid_constant(
                "database.instance_class",
                format!("'{}' must look like db.<family>.<size>", self.instance_class),
            ));
        }

        if !(1..=MAX_CLUSTER_INSTANCES).contains(&self.instances) {
            return Err(AppError::invalid_constant(
                "database.instances",
                format!("must be between 1 and {}", MAX_CLUSTER_INSTANCES),
            ));
        }
        if self.port == 0 {
            return Err(AppError::invalid_constant("database.port", "must be nonzero"));
        }
        Ok(())
    }
}

impl ServiceConfig {
    fn validate(&self) -> Result<(), AppError> {
        if !fargate::is_valid_task_size(self.cpu, self.memory_mib) {
            let reason = match fargate::memory_options(self.cpu) {
                Some(options) => format!(
                    "{} MiB is not offered with {} CPU units (valid: {})",
                    self.memory_mib, self.cpu, options
                ),
                None => format!(
                    "{} CPU units is not a task size (valid: {})",
                    self.cpu,
                    fargate::cpu_options()
                ),
            };
            return Err(AppError::invalid_constant("service.cpu/memory_mib", reason));
        }
        if self.container_port == 0 {
            return Err(AppError::invalid_constant("service.container_port", "must be nonzero"));
        }
        if self.listener_port == 0 {
            return Err(AppError::invalid_constant("service.listener_port", "must be nonzero"));
        }
        if !validate_env_var_name(&self.database_url_env) {
            return Err(AppError::invalid_constant(
                "service.database_url_env",
                "must match [A-Z_][A-Z0-9_]*",
            ));
        }
        Ok(())
    }
}

fn validate_stack_name(name: &str) -> Result<(), AppError> {
    let mut chars = name.chars();
    let ok = chars.next().is_some_and(|c| c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '-')
        && name.len() <= 128;
    if ok {
        Ok(())
    } else {
        Err(AppError::invalid_constant(
            "stack_name",
            "must start with a letter and contain at most 128 letters, digits, or '-'",
        ))
    }
}

/// Object store naming rules.
pub fn validate_bucket_name(name: &str) -> Result<(), AppError> {
    let invalid = |reason: &str| AppError::invalid_constant("bucket.name", reason);

    if !(3..=63).contains(&name.len()) {
        return Err(invalid("must be between 3 and 63 characters"));
    }
    if !name.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '.' || c == '-')
    {
        return Err(invalid("may only contain lowercase letters, digits, '.', and '-'"));
    }
    let alnum = |c: Option<char>| c.is_some_and(|c| c.is_ascii_alphanumeric());
    if !alnum(name.chars().next()) || !alnum(name.chars().last()) {
        return Err(invalid("must start and end with a letter or digit"));
    }
    if name.contains("..") {
        return Err(invalid("must not contain consecutive periods"));
    }
    if name.parse::<Ipv4Addr>().is_ok() {
        return Err(invalid("must not be formatted as an IP address"));
    }
    if name.starts_with("xn--") {
        return Err(invalid("must not start with 'xn--'"));
    }
    Ok(())
}

/// Substitute sample values into the URL template and make sure the result parses.
fn validate_database_url_shape(database: &DatabaseConfig) -> Result<(), AppError> {
    let sample = DATABASE_URL_TEMPLATE
        .replace("${DBUser}", &database.user)
        .replace("${DBPassword}", "sample")
        .replace("${DBHost}", "cluster.example.internal")
        .replace("${DBName}", &database.name);

    let url = Url::parse(&sample).map_err(|err| AppError::ParseError {
        what: "database URL template".to_string(),
        details: err.to_string(),
    })?;
    if url.scheme() != "postgres" || url.username() != database.user {
        return Err(AppError::ParseError {
            what: "database URL template".to_string(),
            details: format!("'{}' does not carry the expected scheme and user", url),
        });
    }
    if url.path().trim_start_matches('/') != database.name {
        return Err(AppError::ParseError {
            what: "database URL template".to_string(),
            details: format!("'{}' does not select database '{}'", url, database.name),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        StackConfig::default().validate().unwrap();
    }

    #[test]
    fn defaults_match_the_deployed_topology() {
        let config = StackConfig::default();
        assert_eq!(config.stack_name, "Hw2Stack");
        assert_eq!(config.image_tag.as_str(), "latest");
        assert_eq!(config.network.max_azs, 2);
        assert_eq!(config.database.name, "hw2");
        assert_eq!(config.database.user, "dbadmin");
        assert_eq!(config.database.instances, 2);
        assert_eq!(config.bucket.name, "recipes-rs-static-content");
        assert_eq!(config.service.container_port, 8080);
        assert_eq!((config.service.cpu, config.service.memory_mib), (512, 1024));
    }

    #[test]
    fn image_reference_uses_repository_and_tag() {
        let config = StackConfig::default().with_image_tag(ImageTag::new("abc123").unwrap());
        assert_eq!(config.image_reference().unwrap().to_string(), "danieltimko/recipes-rs:abc123");
    }

    #[test]
    fn invalid_task_size_fails() {
        let mut config = StackConfig::default();
        config.service.memory_mib = 512;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("service.cpu/memory_mib"), "{}", err);
    }

    #[test]
    fn zero_instances_fails() {
        let mut config = StackConfig::default();
        config.database.instances = 0;
        assert!(matches!(
            config.validate(),
            Err(AppError::InvalidConstant { name, .. }) if name == "database.instances"
        ));
    }

    #[test]
    fn reserved_user_fails() {
        let mut config = StackConfig::default();
        config.database.user = "rdsadmin".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn malformed_engine_version_and_class_fail() {
        let mut config = StackConfig::default();
        config.database.engine_version = "16".to_string();
        assert!(config.validate().is_err());

        let mut config = StackConfig::default();
        config.database.instance_class = "t3.medium".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn too_many_zones_fails() {
        let mut config = StackConfig::default();
        config.network.max_azs = 7;
        assert!(config.validate().is_err());
    }

    #[test]
    fn bucket_name_rules() {
        assert!(validate_bucket_name("recipes-rs-static-content").is_ok());
        assert!(validate_bucket_name("ab").is_err());
        assert!(validate_bucket_name("Upper").is_err());
        assert!(validate_bucket_name("-leading").is_err());
        assert!(validate_bucket_name("a..b").is_err());
        assert!(validate_bucket_name("192.168.1.1").is_err());
        assert!(validate_bucket_name("xn--bucket").is_err());
    }

    #[test]
    fn stack_name_rules() {
        assert!(validate_stack_name("Hw2Stack").is_ok());
        assert!(validate_stack_name("hw2-stack").is_ok());
        assert!(validate_stack_name("2stack").is_err());
        assert!(validate_stack_name("stack_name").is_err());
    }

    #[test]
    fn lowercase_env_name_fails() {
        let mut config = StackConfig::default();
        config.service.database_url_env = "database_url".to_string();
        assert!(config.validate().is_err());
    }
}
