use crate::config::types::{Settings, UserAgent};
use crate::{ConfigError, ConfigResult};

/// Validates the settings
pub fn validate(settings: &Settings) -> ConfigResult<()> {
    validate_user_agent(&settings.user_agent)?;
    Ok(())
}

/// Validates a custom user agent
///
/// The value is sent verbatim as an HTTP header, so it must be non-empty and
/// consist of visible ASCII characters and spaces only.
fn validate_user_agent(user_agent: &UserAgent) -> ConfigResult<()> {
    let UserAgent::Custom(value) = user_agent else {
        return Ok(());
    };

    if value.trim().is_empty() {
        return Err(ConfigError::Validation(
            "custom user agent cannot be empty".to_string(),
        ));
    }

    if let Some(c) = value.chars().find(|c| !(c.is_ascii_graphic() || *c == ' ')) {
        return Err(ConfigError::Validation(format!(
            "custom user agent contains invalid character {:?}",
            c
        )));
    }

    Ok(())
}
