//! Session creation, resumption and persistence
//!
//! Sessions are stored as JSON with the top-level fields `start`, `end`, `urls`, `urls_done`
//! and `results`. A resumed session is checked for structural completeness before use.

use crate::session::Session;
use crate::url::parse_web_url;
use crate::{SessionError, SessionResult};
use serde_json::Value;
use std::path::Path;

/// Top-level fields every session file must carry
const REQUIRED_FIELDS: &[&str] = &["start", "end", "urls", "urls_done", "results"];

/// Fields every domain entry of `results` must carry
const REQUIRED_DOMAIN_FIELDS: &[&str] = &["persistentCookies", "sessionCookies", "trackingCookies"];

/// Creates a fresh session starting at `url`
///
/// # Example
///
/// ```
/// use cookie_tracker::session::create_session;
///
/// let session = create_session("https://example.com/").unwrap();
/// assert_eq!(session.frontier.external(), &["https://example.com/"]);
/// assert!(create_session("not a url").is_err());
/// ```
pub fn create_session(url: &str) -> SessionResult<Session> {
    parse_web_url(url)?;
    Ok(Session::new(url.trim()))
}

/// Resumes a serialized session
///
/// If `url` is given and neither visited nor queued, it is pushed onto the external frontier.
/// A session that fails validation is discarded: with a `url` a brand-new session is started
/// from it, without one the validation error is returned.
pub fn continue_session(url: Option<&str>, serialized: &str) -> SessionResult<Session> {
    let url = match url {
        Some(url) => {
            parse_web_url(url)?;
            Some(url.trim())
        }
        None => None,
    };

    match parse_session(serialized) {
        Ok(mut session) => {
            match url {
                Some(url) if !session.is_known(url) => {
                    session.frontier.push_external(url);
                }
                Some(url) => {
                    tracing::info!("{} was already visited or queued", url);
                }
                None => {}
            }
            Ok(session)
        }
        Err(e) => {
            tracing::warn!("Illegal session: {}", e);
            match url {
                Some(url) => {
                    tracing::info!("Starting new session from {}", url);
                    create_session(url)
                }
                None => Err(e),
            }
        }
    }
}

/// Parses and validates a serialized session
pub fn parse_session(serialized: &str) -> SessionResult<Session> {
    let value: Value = serde_json::from_str(serialized)?;
    validate_session_value(&value)?;
    Ok(serde_json::from_value(value)?)
}

/// Checks that a session value has every required field
///
/// This only checks presence; types are checked when the value is deserialized.
pub fn validate_session_value(value: &Value) -> SessionResult<()> {
    let object = value.as_object().ok_or(SessionError::NotAnObject)?;

    for field in REQUIRED_FIELDS {
        if !object.contains_key(*field) {
            return Err(SessionError::MissingField(field.to_string()));
        }
    }

    let results = object["results"]
        .as_object()
        .ok_or_else(|| SessionError::MissingField("results".to_string()))?;

    for (domain, entry) in results {
        for field in REQUIRED_DOMAIN_FIELDS {
            if entry.get(*field).is_none() {
                return Err(SessionError::MissingDomainField {
                    domain: domain.clone(),
                    field: field.to_string(),
                });
            }
        }
    }

    Ok(())
}

/// Reads and validates a session file
pub fn load_session(path: &Path) -> SessionResult<Session> {
    let content = std::fs::read_to_string(path)?;
    parse_session(&content)
}

/// Writes a session as pretty-printed JSON
pub fn save_session(path: &Path, session: &Session) -> SessionResult<()> {
    let json = serde_json::to_string_pretty(session)?;
    std::fs::write(path, json)?;
    tracing::debug!("Saved session to {}", path.display());
    Ok(())
}
