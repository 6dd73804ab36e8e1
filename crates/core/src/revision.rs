//! Validation of the identifiers that end up inside KV keys.
//!
//! Revision keys and alias names are stored both as key path segments and as
//! entries of comma-joined lists, so neither may contain `/` or `,`.

use crate::error::{Error, Result};

const LIST_SEPARATOR: char = ',';
const PATH_SEPARATOR: char = '/';

fn check_segment(value: &str) -> std::result::Result<(), String> {
    if value.is_empty() {
        return Err("must not be empty".to_string());
    }
    if value.trim() != value {
        return Err(format!("{value:?} has leading or trailing whitespace"));
    }
    if value.contains(LIST_SEPARATOR) {
        return Err(format!("{value:?} contains ','"));
    }
    if value.contains(PATH_SEPARATOR) {
        return Err(format!("{value:?} contains '/'"));
    }
    Ok(())
}

/// Validate a revision key.
pub fn validate_revision_key(key: &str) -> Result<()> {
    check_segment(key).map_err(Error::InvalidRevisionKey)
}

/// Validate an alias name.
pub fn validate_alias_name(name: &str) -> Result<()> {
    check_segment(name).map_err(Error::InvalidAliasName)
}

/// Validate a namespace.
///
/// Namespaces may be hierarchical (`team/app`) but must not be empty and
/// must not start or end with `/`.
pub fn validate_namespace(namespace: &str) -> Result<()> {
    if namespace.is_empty() {
        return Err(Error::InvalidNamespace("must not be empty".to_string()));
    }
    if namespace.starts_with(PATH_SEPARATOR) || namespace.ends_with(PATH_SEPARATOR) {
        return Err(Error::InvalidNamespace(format!(
            "{namespace:?} must not start or end with '/'"
        )));
    }
    if namespace.split(PATH_SEPARATOR).any(str::is_empty) {
        return Err(Error::InvalidNamespace(format!(
            "{namespace:?} contains an empty path segment"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn revision_keys_accept_plain_identifiers() {
        validate_revision_key("1234").unwrap();
        validate_revision_key("a1b2c3d-dirty").unwrap();
        validate_revision_key("v1.2.3+build.7").unwrap();
    }

    #[test]
    fn revision_keys_reject_separators() {
        assert!(matches!(
            validate_revision_key("a,b"),
            Err(Error::InvalidRevisionKey(_))
        ));
        assert!(matches!(
            validate_revision_key("a/b"),
            Err(Error::InvalidRevisionKey(_))
        ));
        assert!(matches!(
            validate_revision_key(""),
            Err(Error::InvalidRevisionKey(_))
        ));
        assert!(validate_revision_key(" 1234").is_err());
    }

    #[test]
    fn alias_names_use_alias_error() {
        validate_alias_name("my-branch").unwrap();
        let err = validate_alias_name("feature/login").unwrap_err();
        assert!(matches!(err, Error::InvalidAliasName(_)));
        assert!(err.to_string().contains("contains '/'"));
    }

    #[test]
    fn namespaces_may_be_hierarchical() {
        validate_namespace("foo").unwrap();
        validate_namespace("team/app").unwrap();
        assert!(validate_namespace("").is_err());
        assert!(validate_namespace("/foo").is_err());
        assert!(validate_namespace("foo/").is_err());
        assert!(validate_namespace("foo//bar").is_err());
    }
}
