//! List resources in deployment order.

use crate::app::config::{ConfigSources, resolve_config};
use crate::domain::{AppError, declare};
use crate::ports::EnvironmentReader;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceEntry {
    pub id: String,
    pub kind: String,
    pub depends_on: Vec<String>,
}

pub fn execute<E: EnvironmentReader>(
    sources: &ConfigSources,
    env: &E,
) -> Result<Vec<ResourceEntry>, AppError> {
    let config = resolve_config(sources, env)?;
    let manifest = declare(&config)?;

    let entries = manifest
        .deployment_order()
        .iter()
        .filter_map(|id| {
            let resource = manifest.resources().get(id)?;
            let depends_on = manifest
                .dependencies_of(id)
                .map(|deps| deps.iter().map(|d| d.to_string()).collect())
                .unwrap_or_default();
            Some(ResourceEntry { id: id.to_string(), kind: resource.kind().to_string(), depends_on })
        })
        .collect();

    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeEnvironment;

    #[test]
    fn lists_every_resource_once_with_dependencies_first() {
        let entries = execute(&ConfigSources::default(), &FakeEnvironment::new()).unwrap();

        assert_eq!(entries.len(), 7);
        for (index, entry) in entries.iter().enumerate() {
            for dep in &entry.depends_on {
                let dep_index = entries.iter().position(|e| &e.id == dep).unwrap();
                assert!(dep_index < index, "{} listed before its dependency {}", entry.id, dep);
            }
        }
    }

    #[test]
    fn url_secret_depends_on_credentials_and_database() {
        let entries = execute(&ConfigSources::default(), &FakeEnvironment::new()).unwrap();
        let url = entries.iter().find(|e| e.id == "DbUrlSecret").unwrap();

        assert_eq!(url.kind, "url-secret");
        assert_eq!(url.depends_on, vec!["AuroraCluster".to_string(), "DbSecret".to_string()]);
    }

    #[test]
    fn task_service_lists_explicit_and_token_dependencies() {
        let entries = execute(&ConfigSources::default(), &FakeEnvironment::new()).unwrap();
        let service = entries.iter().find(|e| e.id == "FargateService").unwrap();

        assert_eq!(service.depends_on, vec!["AuroraCluster", "DbUrlSecret", "EcsCluster"]);
    }
}
