//! Usage diagnostics.
//!
//! Warnings are advisory: they never change control flow. They are dropped
//! entirely in optimized builds (`diagnostics == false`) or when the runtime
//! is configured as `silent`.

use crate::kernel::config::RuntimeConfig;
use crate::kernel::constants::RESERVED_COMPONENT_NAMES;

/// Emit a usage warning according to `config`.
pub fn warn(config: &RuntimeConfig, message: &str) {
    if !config.diagnostics || config.silent {
        return;
    }
    match &config.warn_handler {
        Some(handler) => handler(message),
        None => log::warn!("[trellis warn]: {}", message),
    }
}

/// Check whether `name` is usable as a component name.
///
/// Names must start with an ASCII letter and may contain letters, digits,
/// `-`, `_` and `.`. Reserved tag names are rejected.
pub fn is_valid_component_name(name: &str) -> bool {
    let mut chars = name.chars();
    let starts_with_letter = chars.next().is_some_and(|c| c.is_ascii_alphabetic());
    starts_with_letter
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
        && !RESERVED_COMPONENT_NAMES.contains(&name.to_ascii_lowercase().as_str())
}

/// Warn when `name` is not a valid component name.
pub fn validate_component_name(config: &RuntimeConfig, name: &str) {
    if !is_valid_component_name(name) {
        warn(
            config,
            &format!(
                "Invalid component name: \"{}\". Component names should start with a letter and \
                 contain only letters, digits, '-', '_' or '.', and must not be a reserved tag.",
                name
            ),
        );
    }
}
