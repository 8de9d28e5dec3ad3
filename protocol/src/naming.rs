//! Name and namespace id syntax.
//!
//! A fully-qualified name is `label.namespace_id`, e.g. `foo.test`.
//!
//! - namespace id: 1..=`max_namespace_id_length` chars of `[a-z0-9_-]`
//! - label: at least one char of `[a-z0-9_+-]`
//! - exactly one `.`; the whole name at most `max_name_length` bytes
//!
//! Uppercase is rejected rather than folded: two spellings of one name
//! would hash to two different commitments.

use crate::config::ConsensusParams;
use crate::error::RejectReason;

fn invalid(name: &str, reason: impl Into<String>) -> RejectReason {
    RejectReason::InvalidName {
        name: name.to_string(),
        reason: reason.into(),
    }
}

/// Check a namespace id against the syntax rules.
pub fn validate_namespace_id(id: &str, params: &ConsensusParams) -> Result<(), RejectReason> {
    if id.is_empty() {
        return Err(invalid(id, "namespace id is empty"));
    }
    if id.len() > params.max_namespace_id_length {
        return Err(invalid(
            id,
            format!(
                "namespace id longer than {} characters",
                params.max_namespace_id_length
            ),
        ));
    }
    if let Some(c) = id
        .chars()
        .find(|c| !matches!(c, 'a'..='z' | '0'..='9' | '_' | '-'))
    {
        return Err(invalid(id, format!("character '{}' not allowed in namespace id", c)));
    }
    Ok(())
}

/// Split a fully-qualified name into `(label, namespace_id)`, validating both.
pub fn split_name<'a>(
    name: &'a str,
    params: &ConsensusParams,
) -> Result<(&'a str, &'a str), RejectReason> {
    if name.len() > params.max_name_length {
        return Err(invalid(
            name,
            format!("longer than {} characters", params.max_name_length),
        ));
    }
    let mut parts = name.split('.');
    let (label, namespace_id) = match (parts.next(), parts.next(), parts.next()) {
        (Some(label), Some(ns), None) => (label, ns),
        _ => return Err(invalid(name, "expected exactly one '.'")),
    };
    if label.is_empty() {
        return Err(invalid(name, "empty label"));
    }
    if let Some(c) = label
        .chars()
        .find(|c| !matches!(c, 'a'..='z' | '0'..='9' | '_' | '-' | '+'))
    {
        return Err(invalid(name, format!("character '{}' not allowed in label", c)));
    }
    validate_namespace_id(namespace_id, params).map_err(|_| {
        invalid(name, format!("invalid namespace id '{}'", namespace_id))
    })?;
    Ok((label, namespace_id))
}
