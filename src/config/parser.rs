use crate::config::types::{CrawlMode, PrivacyHeader, Settings, UserAgent};
use crate::config::validation::validate;
use crate::{ConfigError, ConfigResult};
use std::path::Path;

const KEY_USER_AGENT: &str = "USER-AGENT";
const KEY_HEADER: &str = "HEADER";
const KEY_MODE: &str = "MODE";

/// Value of `USER-AGENT` selecting the generic user agent
const GENERIC_MARKER: &str = "/";

/// Loads and validates a settings file from the given path
///
/// # Arguments
///
/// * `path` - Path to the line-oriented settings file
///
/// # Returns
///
/// * `Ok(Settings)` - Successfully loaded and validated settings
/// * `Err(ConfigError)` - Failed to read, parse, or validate the settings
///
/// # Example
///
/// ```no_run
/// use std::path::Path;
/// use cookie_tracker::config::load_settings;
///
/// let settings = load_settings(Path::new("settings.conf")).unwrap();
/// println!("Header: {:?}", settings.header);
/// ```
pub fn load_settings(path: &Path) -> ConfigResult<Settings> {
    let content = std::fs::read_to_string(path)?;
    parse_settings(&content)
}

/// Parses settings from the `KEY=value` text format
///
/// Lines starting with `#` and blank lines are skipped. Keys that are missing keep their
/// default value; unknown keys are logged and ignored.
pub fn parse_settings(content: &str) -> ConfigResult<Settings> {
    let mut settings = Settings::default();

    for (index, raw_line) in content.lines().enumerate() {
        let line_number = index + 1;
        let line = raw_line.trim();

        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let (key, value) = line.split_once('=').ok_or_else(|| ConfigError::Parse {
            line: line_number,
            message: format!("expected KEY=value, got '{}'", line),
        })?;
        let key = key.trim().to_ascii_uppercase();
        let value = value.trim();

        match key.as_str() {
            KEY_USER_AGENT => {
                settings.user_agent = if value == GENERIC_MARKER {
                    UserAgent::Generic
                } else {
                    UserAgent::Custom(value.to_string())
                };
            }
            KEY_HEADER => {
                settings.header = match value {
                    "0" => PrivacyHeader::Dnt,
                    "1" => PrivacyHeader::Gpc,
                    other => {
                        return Err(ConfigError::Parse {
                            line: line_number,
                            message: format!("HEADER must be 0 (DNT) or 1 (GPC), got '{}'", other),
                        })
                    }
                };
            }
            KEY_MODE => {
                settings.mode = match value {
                    "0" => CrawlMode::Breadth,
                    "1" => CrawlMode::SinglePage,
                    other => {
                        return Err(ConfigError::Parse {
                            line: line_number,
                            message: format!(
                                "MODE must be 0 (breadth) or 1 (single page), got '{}'",
                                other
                            ),
                        })
                    }
                };
            }
            _ => {
                tracing::warn!("Ignoring unknown settings key '{}' on line {}", key, line_number);
            }
        }
    }

    validate(&settings)?;

    Ok(settings)
}

impl Settings {
    /// Renders the settings in the `KEY=value` file format
    pub fn to_file_string(&self) -> String {
        let user_agent = match &self.user_agent {
            UserAgent::Generic => GENERIC_MARKER,
            UserAgent::Custom(value) => value.as_str(),
        };
        let header = match self.header {
            PrivacyHeader::Dnt => "0",
            PrivacyHeader::Gpc => "1",
        };
        let mode = match self.mode {
            CrawlMode::Breadth => "0",
            CrawlMode::SinglePage => "1",
        };

        format!(
            "# Cookie Tracker settings\n\
             # USER-AGENT: '/' for the generic user agent, otherwise the literal string\n\
             # HEADER: 0 = DNT, 1 = GPC\n\
             # MODE: 0 = breadth, 1 = single page\n\
             {}={}\n{}={}\n{}={}\n",
            KEY_USER_AGENT, user_agent, KEY_HEADER, header, KEY_MODE, mode
        )
    }
}

/// Validates and writes settings to the given path
pub fn save_settings(path: &Path, settings: &Settings) -> ConfigResult<()> {
    validate(settings)?;
    std::fs::write(path, settings.to_file_string())?;
    Ok(())
}
