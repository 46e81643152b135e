//! Credential loading.
//!
//! Two local files feed the credential set:
//! - a key=value secrets file (shell `export` lines accepted)
//! - a Google OAuth token.json
//!
//! A missing file simply leaves its keys out. Nothing here validates token
//! shape or expiry; the consumers decide what a usable credential is.

use std::collections::HashMap;
use std::path::Path;

use crate::types::CredentialPaths;
use crate::util::expand_home;

pub const AIRTABLE_TOKEN: &str = "airtable_token";
pub const GOOGLE_TOKEN: &str = "google_token";

/// Secrets-file keys that are exposed under a different credential name.
const SECRET_ALIASES: &[(&str, &str)] = &[("AIRTABLE_API_KEY", AIRTABLE_TOKEN)];

#[derive(Debug, Clone, PartialEq)]
pub enum CredentialValue {
    Secret(String),
    Token(serde_json::Value),
}

/// In-memory credential set, rebuilt every run.
#[derive(Debug, Clone, Default)]
pub struct Credentials {
    values: HashMap<String, CredentialValue>,
}

impl Credentials {
    /// Read both credential files. Never fails.
    pub fn load(paths: &CredentialPaths) -> Self {
        let secrets = read_optional(&expand_home(&paths.secrets_path));
        let token = read_optional(&expand_home(&paths.token_path));
        Self::from_sources(secrets.as_deref(), token.as_deref())
    }

    pub fn from_sources(secrets: Option<&str>, token_json: Option<&str>) -> Self {
        let mut values = HashMap::new();

        if let Some(content) = secrets {
            for (key, value) in parse_secrets(content) {
                let name = SECRET_ALIASES
                    .iter()
                    .find(|(raw, _)| *raw == key)
                    .map(|(_, alias)| alias.to_string())
                    .unwrap_or(key);
                values.insert(name, CredentialValue::Secret(value));
            }
        }

        if let Some(content) = token_json {
            match serde_json::from_str::<serde_json::Value>(content) {
                Ok(token) => {
                    values.insert(GOOGLE_TOKEN.to_string(), CredentialValue::Token(token));
                }
                Err(e) => log::warn!("Ignoring unparseable Google token file: {}", e),
            }
        }

        Self { values }
    }

    pub fn secret(&self, name: &str) -> Option<&str> {
        match self.values.get(name) {
            Some(CredentialValue::Secret(value)) if !value.is_empty() => Some(value),
            _ => None,
        }
    }

    pub fn token(&self, name: &str) -> Option<&serde_json::Value> {
        match self.values.get(name) {
            Some(CredentialValue::Token(value)) => Some(value),
            _ => None,
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }
}

fn read_optional(path: &Path) -> Option<String> {
    if !path.exists() {
        log::debug!("Credential file not present: {}", path.display());
        return None;
    }
    match std::fs::read_to_string(path) {
        Ok(content) => Some(content),
        Err(e) => {
            log::warn!("Failed to read {}: {}", path.display(), e);
            None
        }
    }
}

/// Parse `KEY=value` lines. Lines without `=` are skipped.
pub fn parse_secrets(content: &str) -> Vec<(String, String)> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .filter_map(|line| {
            let (key, value) = line.split_once('=')?;
            let key = key.trim();
            let key = key.strip_prefix("export ").unwrap_or(key).trim();
            if key.is_empty() {
                return None;
            }
            let value = value.trim().trim_matches(|c| c == '"' || c == '\'');
            Some((key.to_string(), value.to_string()))
        })
        .collect()
}
