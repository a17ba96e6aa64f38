/// Validates a logical resource identifier.
///
/// Checks:
/// - Length between 1 and 255
/// - First character is an ASCII letter
/// - Remaining characters are ASCII alphanumeric
pub fn validate_logical_id(id: &str) -> bool {
    let mut chars = id.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() => {}
        _ => return false,
    }
    id.len() <= 255 && chars.all(|c| c.is_ascii_alphanumeric())
}

/// Validates a container image tag.
///
/// Checks:
/// - Length between 1 and 128
/// - First character is ASCII alphanumeric or '_'
/// - Remaining characters are ASCII alphanumeric, '_', '.', or '-'
pub fn validate_image_tag(tag: &str) -> bool {
    let mut chars = tag.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphanumeric() || first == '_' => {}
        _ => return false,
    }
    tag.len() <= 128 && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-'))
}

/// Validates a PostgreSQL identifier used for database and user names.
pub fn validate_sql_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() => {}
        _ => return false,
    }
    name.len() <= 63 && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Validates an environment variable name as injected into a container.
pub fn validate_env_var_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_ascii_uppercase() || first == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || c == '_')
}
