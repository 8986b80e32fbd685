//! Environment variable expansion for configuration strings.
//!
//! Supports:
//! - `${VAR}` - expands to the value of VAR, errors if unset
//! - `${VAR:-default}` - expands to VAR if set, otherwise uses default

use std::cell::RefCell;
use std::convert::Infallible;

use crate::ConfigError;

/// Expand environment variable references in a string.
///
/// Returns the original string unchanged if no `${}` patterns are present.
/// Only a braced `${VAR}` without a default is an error when unset.
pub(crate) fn expand_env(value: &str, field: &str) -> Result<String, ConfigError> {
    // Fast path: no expansion needed
    if !value.contains("${") {
        return Ok(value.to_owned());
    }

    let unset = RefCell::new(Vec::new());
    let expanded = shellexpand::env_with_context(value, |var| -> Result<Option<String>, Infallible> {
        match std::env::var(var) {
            Ok(val) => Ok(Some(val)),
            Err(_) => {
                unset.borrow_mut().push(var.to_owned());
                Ok(None)
            }
        }
    })
    .map_or_else(|e| match e.cause {}, std::borrow::Cow::into_owned);

    // Unset variables without a default are left verbatim by shellexpand.
    if let Some(var) = unset
        .into_inner()
        .into_iter()
        .find(|var| expanded.contains(&format!("${{{var}}}")))
    {
        return Err(ConfigError::EnvVar {
            field: field.to_owned(),
            message: format!("${{{var}}} not set"),
        });
    }

    Ok(expanded)
}
