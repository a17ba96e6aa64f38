//! Pure parse/validate for stack configuration (`stack.toml`).

use serde::Deserialize;

use super::stack::{BucketConfig, DatabaseConfig, NetworkConfig, ServiceConfig, StackConfig};
use crate::domain::{AppError, ImageTag};

/// Raw configuration as written in TOML. Missing fields take the built-in defaults.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StackConfigDto {
    pub stack_name: Option<String>,
    pub image_tag: Option<String>,
    pub network: NetworkDto,
    pub database: DatabaseDto,
    pub bucket: BucketDto,
    pub service: ServiceDto,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct NetworkDto {
    pub max_azs: Option<u8>,
    pub cidr: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DatabaseDto {
    pub name: Option<String>,
    pub user: Option<String>,
    pub engine_version: Option<String>,
    pub instance_class: Option<String>,
    pub instances: Option<u8>,
    pub port: Option<u16>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BucketDto {
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServiceDto {
    pub image_repository: Option<String>,
    pub container_port: Option<u16>,
    pub cpu: Option<u32>,
    pub memory_mib: Option<u32>,
    pub desired_count: Option<u32>,
    pub public_load_balancer: Option<bool>,
    pub listener_port: Option<u16>,
    pub database_url_env: Option<String>,
}

impl StackConfigDto {
    /// Fill gaps with defaults and validate the result.
    pub fn into_config(self) -> Result<StackConfig, AppError> {
        let defaults = StackConfig::default();

        let image_tag = match self.image_tag {
            Some(tag) => ImageTag::new(&tag)?,
            None => defaults.image_tag,
        };

        let network = NetworkConfig {
            max_azs: self.network.max_azs.unwrap_or(defaults.network.max_azs),
            cidr: self.network.cidr.unwrap_or(defaults.network.cidr),
        };

        let db = defaults.database;
        let database = DatabaseConfig {
            name: self.database.name.unwrap_or(db.name),
            user: self.database.user.unwrap_or(db.user),
            engine_version: self.database.engine_version.unwrap_or(db.engine_version),
            instance_class: self.database.instance_class.unwrap_or(db.instance_class),
            instances: self.database.instances.unwrap_or(db.instances),
            port: self.database.port.unwrap_or(db.port),
        };

        let bucket = BucketConfig { name: self.bucket.name.unwrap_or(defaults.bucket.name) };

        let svc = defaults.service;
        let service = ServiceConfig {
            image_repository: self.service.image_repository.unwrap_or(svc.image_repository),
            container_port: self.service.container_port.unwrap_or(svc.container_port),
            cpu: self.service.cpu.unwrap_or(svc.cpu),
            memory_mib: self.service.memory_mib.unwrap_or(svc.memory_mib),
            desired_count: self.service.desired_count.unwrap_or(svc.desired_count),
            public_load_balancer: self
                .service
                .public_load_balancer
                .unwrap_or(svc.public_load_balancer),
            listener_port: self.service.listener_port.unwrap_or(svc.listener_port),
            database_url_env: self.service.database_url_env.unwrap_or(svc.database_url_env),
        };

        let config = StackConfig {
            stack_name: self.stack_name.unwrap_or(defaults.stack_name),
            image_tag,
            network,
            database,
            bucket,
            service,
        };
        config.validate()?;
        Ok(config)
    }
}

/// Parse and validate stack configuration from TOML content.
pub fn parse_config_content(content: &str) -> Result<StackConfig, AppError> {
    let dto: StackConfigDto = toml::from_str(content)?;
    dto.into_config()
}
