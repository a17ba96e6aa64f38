//! Permission edges between resources.

use serde::Serialize;

use crate::domain::{Attribute, LogicalId, Token};

/// Which identity of a task service receives a permission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum TaskIdentity {
    /// Role the application code runs as.
    Task,
    /// Role the orchestrator uses to pull images and inject secrets.
    Execution,
}

impl TaskIdentity {
    pub fn attribute(self) -> Attribute {
        match self {
            TaskIdentity::Task => Attribute::TaskRoleArn,
            TaskIdentity::Execution => Attribute::ExecutionRoleArn,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum Grant {
    /// `grantee` may read the value of `secret`.
    #[serde(rename_all = "camelCase")]
    SecretRead { grantee: Token, secret: Token },
    /// `target` accepts inbound connections from `source` on `port`.
    #[serde(rename_all = "camelCase")]
    Ingress { target: Token, source: Token, port: u16, protocol: String },
}

impl Grant {
    pub fn secret_read(service: &LogicalId, identity: TaskIdentity, secret: &LogicalId) -> Self {
        Grant::SecretRead {
            grantee: Token::attribute(service, identity.attribute()),
            secret: Token::reference(secret),
        }
    }

    pub fn tcp_ingress(target: &LogicalId, source: &LogicalId, port: u16) -> Self {
        Grant::Ingress {
            target: Token::attribute(target, Attribute::SecurityGroupId),
            source: Token::attribute(source, Attribute::SecurityGroupId),
            port,
            protocol: "tcp".to_string(),
        }
    }

    pub fn tokens(&self) -> [&Token; 2] {
        match self {
            Grant::SecretRead { grantee, secret } => [grantee, secret],
            Grant::Ingress { target, source, .. } => [target, source],
        }
    }

    /// Short label used in diagnostics.
    pub fn describe(&self) -> String {
        let name = |token: &Token| {
            token.references().first().map(|r| r.target.to_string()).unwrap_or_default()
        };
        match self {
            Grant::SecretRead { grantee, secret } => {
                format!("{} reads {}", name(grantee), name(secret))
            }
            Grant::Ingress { target, source, port, protocol } => {
                format!("{} accepts {}/{} from {}", name(target), protocol, port, name(source))
            }
        }
    }
}

/// A named value surfaced after provisioning.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Output {
    pub description: String,
    pub value: Token,
}
