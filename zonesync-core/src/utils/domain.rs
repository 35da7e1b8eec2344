//! 域名校验

use zonesync_provider::normalize_domain_name;

use crate::error::{CoreError, CoreResult};

const MAX_NAME_LEN: usize = 253;
const MAX_LABEL_LEN: usize = 63;

/// 规范化并校验 zone 名称
///
/// Returns the canonical form (lowercase, no trailing dot). Rejects empty names with
/// `MissingField` and malformed names with `ValidationError`.
pub fn validate_domain_name(raw: &str) -> CoreResult<String> {
    let name = normalize_domain_name(raw);
    if name.is_empty() {
        return Err(CoreError::MissingField("domain_name".to_string()));
    }
    if name.len() > MAX_NAME_LEN {
        return Err(invalid(&name, "name exceeds 253 characters"));
    }

    for label in name.split('.') {
        if label.is_empty() {
            return Err(invalid(&name, "empty label"));
        }
        if label.len() > MAX_LABEL_LEN {
            return Err(invalid(&name, "label exceeds 63 characters"));
        }
        if label.starts_with('-') || label.ends_with('-') {
            return Err(invalid(&name, "label starts or ends with a hyphen"));
        }
        if !label
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        {
            return Err(invalid(&name, "label contains invalid characters"));
        }
    }

    Ok(name)
}

fn invalid(name: &str, reason: &str) -> CoreError {
    CoreError::ValidationError(format!("Invalid domain name '{name}': {reason}"))
}
