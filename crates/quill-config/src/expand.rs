//! Environment variable expansion for configuration strings.
//!
//! Supports:
//! - `${VAR}` - expands to the value of VAR, errors if unset
//! - `${VAR:-default}` - expands to VAR if set, otherwise uses default

use crate::ConfigError;

/// Expand environment variable references in a config field, in place.
///
/// `field` names the config key for error messages. Values without `${`
/// are left untouched. Once a value contains `${`, bare `$VAR` references
/// in it are expanded too.
pub(crate) fn expand_field(value: &mut String, field: &str) -> Result<(), ConfigError> {
    if value.contains("${") {
        *value = expand_env(value, field)?;
    }
    Ok(())
}

fn expand_env(value: &str, field: &str) -> Result<String, ConfigError> {
    let lookup = |var: &str| -> Result<Option<String>, UnsetVar> {
        std::env::var(var)
            .map(Some)
            .map_err(|_| UnsetVar(var.to_owned()))
    };

    shellexpand::env_with_context(value, lookup)
        .map(std::borrow::Cow::into_owned)
        .map_err(|e| ConfigError::EnvVar {
            field: field.to_owned(),
            message: format!("${{{}}} not set", e.cause.0),
        })
}

/// Name of a referenced variable that is not set.
struct UnsetVar(String);
