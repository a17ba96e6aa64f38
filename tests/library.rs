//! Manifest properties checked through the public library API.

use recipes_infra::domain::resource::ResourceSpec;
use recipes_infra::domain::token::placeholders;
use recipes_infra::domain::topology::{
    CREDENTIAL_SECRET_ID, DATABASE_CLUSTER_ID, STATIC_BUCKET_ID, TASK_SERVICE_ID, URL_SECRET_ID,
};
use recipes_infra::domain::{Attribute, Grant, ResourceKind, TaskIdentity, Token};
use recipes_infra::{AppError, Manifest, declare_topology};
use serde_json::json;

fn manifest(tag: Option<&str>) -> Manifest {
    declare_topology(tag).expect("topology should declare")
}

#[test]
fn cardinality_is_one_of_each_entity() {
    let manifest = manifest(Some("v1"));

    assert_eq!(manifest.count(ResourceKind::Network), 1);
    assert_eq!(manifest.count(ResourceKind::DatabaseCluster), 1);
    assert_eq!(manifest.count(ResourceKind::StaticBucket), 1);
    assert_eq!(manifest.count(ResourceKind::UrlSecret), 1);
    assert_eq!(manifest.count(ResourceKind::ServiceCluster), 1);
    assert_eq!(manifest.count(ResourceKind::TaskService), 1);
    assert_eq!(manifest.count(ResourceKind::CredentialSecret), 1);
}

#[test]
fn image_reference_is_registry_prefix_plus_tag() {
    for tag in ["latest", "v1.2.3", "sha-deadbeef"] {
        let manifest = manifest(Some(tag));
        let ResourceSpec::TaskService(service) = &manifest.resource(TASK_SERVICE_ID).unwrap().spec
        else {
            panic!("task service missing");
        };
        assert_eq!(service.container.image.to_string(), format!("danieltimko/recipes-rs:{}", tag));
    }
}

#[test]
fn omitted_tag_matches_explicit_default() {
    let implicit = manifest(None);
    let explicit = manifest(Some("latest"));

    assert_eq!(implicit, explicit);
    assert_eq!(implicit.to_json().unwrap(), explicit.to_json().unwrap());
    assert_eq!(implicit.fingerprint().unwrap(), explicit.fingerprint().unwrap());
}

#[test]
fn different_tags_change_the_fingerprint() {
    assert_ne!(
        manifest(Some("v1")).fingerprint().unwrap(),
        manifest(Some("v2")).fingerprint().unwrap()
    );
}

#[test]
fn url_secret_template_has_exactly_four_placeholders_and_no_password() {
    let manifest = manifest(None);
    let ResourceSpec::UrlSecret(secret) = &manifest.resource(URL_SECRET_ID).unwrap().spec else {
        panic!("url secret missing");
    };
    let Token::Sub { template, variables } = &secret.secret_string else {
        panic!("url secret should be a substitution");
    };

    let mut names = placeholders(template).unwrap();
    names.sort();
    assert_eq!(names, vec!["DBHost", "DBName", "DBPassword", "DBUser"]);
    assert_eq!(variables.len(), 4);
    assert!(variables["DBPassword"].as_literal().is_none());
    assert!(variables["DBHost"].as_literal().is_none());
    assert_eq!(variables["DBUser"].as_literal(), Some("dbadmin"));
    assert_eq!(variables["DBName"].as_literal(), Some("hw2"));

    let rendered = serde_json::to_value(&secret.secret_string).unwrap();
    assert_eq!(
        rendered["Fn::Sub"][1]["DBPassword"],
        json!({"Fn::Join": ["", [
            "{{resolve:secretsmanager:",
            {"Ref": CREDENTIAL_SECRET_ID},
            ":SecretString:password::}}"
        ]]})
    );
}

#[test]
fn emitted_manifest_never_contains_a_password_value() {
    let json = manifest(None).to_json().unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();

    let secret = &value["resources"][CREDENTIAL_SECRET_ID]["properties"];
    assert!(secret.get("password").is_none());
    assert_eq!(secret["generateSecretString"]["generateStringKey"], "password");
    assert_eq!(secret["generateSecretString"]["secretStringTemplate"], r#"{"username":"dbadmin"}"#);
}

#[test]
fn static_bucket_disables_all_public_access_blocks() {
    let manifest = manifest(None);
    let ResourceSpec::StaticBucket(bucket) = &manifest.resource(STATIC_BUCKET_ID).unwrap().spec
    else {
        panic!("bucket missing");
    };

    let block = bucket.public_access_block;
    assert!(!block.block_public_acls);
    assert!(!block.ignore_public_acls);
    assert!(!block.block_public_policy);
    assert!(!block.restrict_public_buckets);
    assert!(bucket.public_read_access);
    assert_eq!(bucket.bucket_name, "recipes-rs-static-content");
}

#[test]
fn identities_read_their_secrets_and_database_admits_service() {
    let manifest = manifest(None);

    let reads_credentials = manifest.grants().iter().any(|grant| {
        matches!(grant, Grant::SecretRead { grantee, secret }
            if *grantee == Token::Attribute {
                target: recipes_infra::domain::LogicalId::new(TASK_SERVICE_ID).unwrap(),
                attribute: TaskIdentity::Task.attribute(),
            }
            && matches!(secret, Token::Ref(id) if id.as_str() == CREDENTIAL_SECRET_ID))
    });
    assert!(reads_credentials);

    let url_read = Grant::secret_read(
        &recipes_infra::domain::LogicalId::new(TASK_SERVICE_ID).unwrap(),
        TaskIdentity::Execution,
        &recipes_infra::domain::LogicalId::new(URL_SECRET_ID).unwrap(),
    );
    assert!(manifest.grants().contains(&url_read), "execution identity must read the URL secret");

    let ingress = manifest.grants().iter().find_map(|grant| match grant {
        Grant::Ingress { target, source, port, protocol } => Some((target, source, *port, protocol)),
        _ => None,
    });
    let (target, source, port, protocol) = ingress.expect("database ingress grant");
    assert!(matches!(target, Token::Attribute { target, attribute: Attribute::SecurityGroupId }
        if target.as_str() == DATABASE_CLUSTER_ID));
    assert!(matches!(source, Token::Attribute { target, attribute: Attribute::SecurityGroupId }
        if target.as_str() == TASK_SERVICE_ID));
    assert_eq!(port, 5432);
    assert_eq!(protocol, "tcp");
}

#[test]
fn manifest_json_shape() {
    let value: serde_json::Value =
        serde_json::from_str(&manifest(None).to_json().unwrap()).unwrap();

    assert_eq!(value["resources"]["Hw2Vpc"]["type"], "network");
    assert_eq!(value["resources"]["Hw2Vpc"]["properties"]["maxAzs"], 2);
    assert_eq!(value["resources"][DATABASE_CLUSTER_ID]["properties"]["engineVersion"], "16.6");
    assert_eq!(
        value["resources"][DATABASE_CLUSTER_ID]["properties"]["network"],
        json!({"Ref": "Hw2Vpc"})
    );
    assert_eq!(value["resources"][TASK_SERVICE_ID]["dependsOn"], json!([DATABASE_CLUSTER_ID]));
    assert_eq!(
        value["outputs"]["LoadBalancerDns"]["value"],
        json!({"Fn::GetAtt": [TASK_SERVICE_ID, "LoadBalancer.DNSName"]})
    );
}

#[test]
fn malformed_tag_is_a_configuration_error() {
    assert!(matches!(declare_topology(Some("")), Err(AppError::InvalidImageTag(_))));
    assert!(matches!(declare_topology(Some("a:b")), Err(AppError::InvalidImageTag(_))));
}
