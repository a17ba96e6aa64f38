//! Values resolved now or deferred to provisioning time.
//!
//! A [`Token`] is either a literal known at declaration time or a placeholder
//! the provisioning engine substitutes once the referenced resource exists.
//! Tokens serialize in the intrinsic-function shape provisioning engines
//! understand (`Ref`, `Fn::GetAtt`, `Fn::Sub`, `Fn::Join`).

use std::collections::{BTreeMap, BTreeSet};

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

use crate::domain::{AppError, LogicalId};

/// A named value exported by a provisioned resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Attribute {
    EndpointAddress,
    EndpointPort,
    SecurityGroupId,
    TaskRoleArn,
    ExecutionRoleArn,
    LoadBalancerDnsName,
    BucketArn,
    BucketDomainName,
}

impl Attribute {
    pub fn as_str(self) -> &'static str {
        match self {
            Attribute::EndpointAddress => "Endpoint.Address",
            Attribute::EndpointPort => "Endpoint.Port",
            Attribute::SecurityGroupId => "SecurityGroupId",
            Attribute::TaskRoleArn => "TaskRoleArn",
            Attribute::ExecutionRoleArn => "ExecutionRoleArn",
            Attribute::LoadBalancerDnsName => "LoadBalancer.DNSName",
            Attribute::BucketArn => "Arn",
            Attribute::BucketDomainName => "DomainName",
        }
    }
}

impl std::fmt::Display for Attribute {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single edge from a token to the resource it depends on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reference<'a> {
    pub target: &'a LogicalId,
    pub attribute: Option<Attribute>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    Literal(String),
    Ref(LogicalId),
    Attribute { target: LogicalId, attribute: Attribute },
    /// A JSON field of a stored secret, resolved by the provisioning engine.
    SecretField { secret: LogicalId, field: String },
    Sub { template: String, variables: BTreeMap<String, Token> },
    Join { separator: String, parts: Vec<Token> },
}

impl Token {
    pub fn literal<S: Into<String>>(value: S) -> Self {
        Token::Literal(value.into())
    }

    pub fn reference(target: &LogicalId) -> Self {
        Token::Ref(target.clone())
    }

    pub fn attribute(target: &LogicalId, attribute: Attribute) -> Self {
        Token::Attribute { target: target.clone(), attribute }
    }

    pub fn secret_field<S: Into<String>>(secret: &LogicalId, field: S) -> Self {
        Token::SecretField { secret: secret.clone(), field: field.into() }
    }

    /// Build a substitution token.
    ///
    /// Every `${Name}` placeholder in `template` must be bound in `variables`
    /// and every variable must be used.
    pub fn sub<S: Into<String>>(
        template: S,
        variables: BTreeMap<String, Token>,
    ) -> Result<Self, AppError> {
        let template = template.into();
        let placeholders = placeholders(&template)?;
        let used: BTreeSet<&str> = placeholders.iter().copied().collect();

        if let Some(missing) = used.iter().find(|name| !variables.contains_key(**name)) {
            return Err(AppError::config_error(format!(
                "Template placeholder '${{{}}}' has no bound variable",
                missing
            )));
        }
        if let Some(unused) = variables.keys().find(|name| !used.contains(name.as_str())) {
            return Err(AppError::config_error(format!(
                "Template variable '{}' is not used by the template",
                unused
            )));
        }

        Ok(Token::Sub { template, variables })
    }

    pub fn join<S: Into<String>>(separator: S, parts: Vec<Token>) -> Self {
        Token::Join { separator: separator.into(), parts }
    }

    /// Literal value, if this token is resolvable at declaration time.
    pub fn as_literal(&self) -> Option<&str> {
        match self {
            Token::Literal(value) => Some(value),
            _ => None,
        }
    }

    /// All resources this token depends on, in declaration order.
    pub fn references(&self) -> Vec<Reference<'_>> {
        let mut refs = Vec::new();
        self.collect_references(&mut refs);
        refs
    }

    fn collect_references<'a>(&'a self, refs: &mut Vec<Reference<'a>>) {
        match self {
            Token::Literal(_) => {}
            Token::Ref(target) => refs.push(Reference { target, attribute: None }),
            Token::Attribute { target, attribute } => {
                refs.push(Reference { target, attribute: Some(*attribute) })
            }
            Token::SecretField { secret, .. } => {
                refs.push(Reference { target: secret, attribute: None })
            }
            Token::Sub { variables, .. } => {
                for value in variables.values() {
                    value.collect_references(refs);
                }
            }
            Token::Join { parts, .. } => {
                for part in parts {
                    part.collect_references(refs);
                }
            }
        }
    }

    fn secret_field_as_join(secret: &LogicalId, field: &str) -> Token {
        Token::join(
            "",
            vec![
                Token::literal("{{resolve:secretsmanager:"),
                Token::reference(secret),
                Token::literal(format!(":SecretString:{}::}}}}", field)),
            ],
        )
    }
}

impl Serialize for Token {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Token::Literal(value) => serializer.serialize_str(value),
            Token::Ref(target) => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry("Ref", target)?;
                map.end()
            }
            Token::Attribute { target, attribute } => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry("Fn::GetAtt", &(target.as_str(), attribute.as_str()))?;
                map.end()
            }
            Token::SecretField { secret, field } => {
                Token::secret_field_as_join(secret, field).serialize(serializer)
            }
            Token::Sub { template, variables } => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry("Fn::Sub", &(template, variables))?;
                map.end()
            }
            Token::Join { separator, parts } => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry("Fn::Join", &(separator, parts))?;
                map.end()
            }
        }
    }
}

/// Extract `${Name}` placeholder names from a substitution template.
///
/// `${!Literal}` is an escape for a literal `${Literal}` and is skipped.
pub fn placeholders(template: &str) -> Result<Vec<&str>, AppError> {
    let mut names = Vec::new();
    let mut rest = template;

    while let Some(start) = rest.find("${") {
        let after = &rest[start + 2..];
        let end = after.find('}').ok_or_else(|| AppError::ParseError {
            what: "substitution template".to_string(),
            details: format!("unterminated placeholder in '{}'", template),
        })?;
        let name = &after[..end];
        if name.is_empty() {
            return Err(AppError::ParseError {
                what: "substitution template".to_string(),
                details: format!("empty placeholder in '{}'", template),
            });
        }
        if !name.starts_with('!') {
            names.push(name);
        }
        rest = &after[end + 1..];
    }

    Ok(names)
}
