//! Reference graph over manifest resources.

use std::collections::{BTreeMap, BTreeSet};

use crate::domain::{AppError, Grant, LogicalId, Output, Resource, ResourceKind};

/// Edges between resources derived from their tokens and explicit `dependsOn`.
#[derive(Debug, Clone)]
pub struct ReferenceGraph {
    /// node -> resources it depends on
    dependencies: BTreeMap<LogicalId, BTreeSet<LogicalId>>,
}

impl ReferenceGraph {
    /// Build the graph, rejecting dangling references and unexported attributes.
    pub fn build(resources: &BTreeMap<LogicalId, Resource>) -> Result<Self, AppError> {
        let mut dependencies = BTreeMap::new();

        for (id, resource) in resources {
            let mut deps = BTreeSet::new();

            for token in resource.spec.tokens() {
                for reference in token.references() {
                    check_reference(id.as_str(), reference.target, reference.attribute, resources)?;
                    deps.insert(reference.target.clone());
                }
            }
            for explicit in &resource.depends_on {
                if !resources.contains_key(explicit) {
                    return Err(AppError::UnresolvedReference {
                        from: id.to_string(),
                        target: explicit.to_string(),
                    });
                }
                deps.insert(explicit.clone());
            }

            dependencies.insert(id.clone(), deps);
        }

        Ok(Self { dependencies })
    }

    /// Check that grants and outputs only point at resources in the graph.
    pub fn check_edges(
        &self,
        resources: &BTreeMap<LogicalId, Resource>,
        grants: &[Grant],
        outputs: &BTreeMap<String, Output>,
    ) -> Result<(), AppError> {
        for grant in grants {
            let label = grant.describe();
            for token in grant.tokens() {
                for reference in token.references() {
                    check_reference(&label, reference.target, reference.attribute, resources)?;
                }
            }
        }
        for (name, output) in outputs {
            for reference in output.value.references() {
                check_reference(name, reference.target, reference.attribute, resources)?;
            }
        }
        Ok(())
    }

    /// Hand the per-node dependency sets over to the caller.
    pub fn into_dependencies(self) -> BTreeMap<LogicalId, BTreeSet<LogicalId>> {
        self.dependencies
    }

    /// Return resources with dependencies first.
    ///
    /// Uses Kahn's algorithm; the smallest ready id is always taken next so the
    /// result is deterministic.
    pub fn deployment_order(&self) -> Result<Vec<LogicalId>, AppError> {
        // Edge A -> B means A depends on B (B must come before A)
        let mut in_degree: BTreeMap<&LogicalId, usize> =
            self.dependencies.iter().map(|(id, deps)| (id, deps.len())).collect();
        let mut dependents: BTreeMap<&LogicalId, Vec<&LogicalId>> = BTreeMap::new();
        for (id, deps) in &self.dependencies {
            for dep in deps {
                dependents.entry(dep).or_default().push(id);
            }
        }

        let mut ready: BTreeSet<&LogicalId> =
            in_degree.iter().filter(|&(_, deg)| *deg == 0).map(|(id, _)| *id).collect();
        let mut order = Vec::with_capacity(self.dependencies.len());

        while let Some(current) = ready.pop_first() {
            order.push(current.clone());

            for dependent in dependents.get(current).into_iter().flatten() {
                if let Some(deg) = in_degree.get_mut(dependent) {
                    *deg -= 1;
                    if *deg == 0 {
                        ready.insert(*dependent);
                    }
                }
            }
        }

        if order.len() != self.dependencies.len() {
            let remaining: Vec<_> =
                in_degree.iter().filter(|&(_, deg)| *deg > 0).map(|(id, _)| id.to_string()).collect();
            return Err(AppError::CircularReference(remaining.join(", ")));
        }

        Ok(order)
    }

    /// Follow placement edges from `id` until a network is reached.
    pub fn network_of(
        id: &LogicalId,
        resources: &BTreeMap<LogicalId, Resource>,
    ) -> Result<LogicalId, AppError> {
        let mut current = id;
        let mut visited = BTreeSet::new();

        loop {
            if !visited.insert(current) {
                return Err(AppError::CircularReference(format!("placement of {}", id)));
            }
            let resource = resources.get(current).ok_or_else(|| AppError::UnresolvedReference {
                from: id.to_string(),
                target: current.to_string(),
            })?;
            if resource.kind() == ResourceKind::Network {
                return Ok(current.clone());
            }

            let placement = resource.spec.placement().ok_or_else(|| {
                AppError::NetworkMembership(format!(
                    "'{}' is placed under '{}', which is not network-scoped",
                    id, current
                ))
            })?;
            let refs = placement.references();
            current = match refs.as_slice() {
                [single] if single.attribute.is_none() => single.target,
                _ => {
                    return Err(AppError::NetworkMembership(format!(
                        "'{}' must be placed by a single plain reference",
                        current
                    )));
                }
            };
        }
    }
}

fn check_reference(
    from: &str,
    target: &LogicalId,
    attribute: Option<crate::domain::Attribute>,
    resources: &BTreeMap<LogicalId, Resource>,
) -> Result<(), AppError> {
    let resource = resources.get(target).ok_or_else(|| AppError::UnresolvedReference {
        from: from.to_string(),
        target: target.to_string(),
    })?;

    if let Some(attribute) = attribute
        && !resource.kind().exports().contains(&attribute)
    {
        return Err(AppError::UnresolvedAttribute {
            from: from.to_string(),
            target: target.to_string(),
            attribute: attribute.to_string(),
        });
    }
    Ok(())
}
