//! Google Sheets access for the financial ledger.
//!
//! Access tokens come from an external helper script (which owns refresh),
//! with the stored token.json as a second source while it is unexpired.
//!
//! Modules:
//! - sheets: Sheets API v4 values reads

pub mod sheets;

use std::path::{Path, PathBuf};
use std::process::Command;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::credentials::GOOGLE_TOKEN;
use crate::error::FetchError;

// ============================================================================
// Token types (google-auth token.json format)
// ============================================================================

/// OAuth2 token as written to token.json.
///
/// Both `token` and `access_token` are accepted on read.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GoogleToken {
    #[serde(alias = "access_token")]
    pub token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    /// Token expiry time (ISO 8601)
    #[serde(default)]
    pub expiry: Option<String>,
    #[serde(default, alias = "email")]
    pub account: Option<String>,
}

impl GoogleToken {
    /// Interpret the structured `google_token` credential, if it has the right shape.
    pub fn from_credential(value: &serde_json::Value) -> Option<Self> {
        match serde_json::from_value::<GoogleToken>(value.clone()) {
            Ok(token) if !token.token.trim().is_empty() => Some(token),
            Ok(_) => None,
            Err(e) => {
                log::warn!("{} credential has unexpected shape: {}", GOOGLE_TOKEN, e);
                None
            }
        }
    }
}

/// Check if a token is expired based on its expiry field.
pub fn is_token_expired(token: &GoogleToken, now: DateTime<Utc>) -> bool {
    match &token.expiry {
        None => true, // No expiry = assume expired
        Some(expiry_str) => {
            // google-auth writes expiry as "2026-02-08T12:00:00.000000Z" or similar
            match DateTime::parse_from_rfc3339(&expiry_str.replace('Z', "+00:00"))
                .or_else(|_| DateTime::parse_from_rfc3339(expiry_str))
            {
                // Consider expired if within 60 seconds of expiry
                Ok(expiry) => expiry <= now + chrono::Duration::seconds(60),
                Err(_) => true,
            }
        }
    }
}

// ============================================================================
// Token providers
// ============================================================================

/// Source of a bearer token for Google APIs.
pub trait TokenProvider {
    fn access_token(&self) -> Result<String, FetchError>;
}

/// Runs the token helper script, falling back to an unexpired stored token.
pub struct HelperTokenProvider {
    helper: Option<PathBuf>,
    stored: Option<GoogleToken>,
    now: DateTime<Utc>,
}

impl HelperTokenProvider {
    pub fn new(helper: Option<PathBuf>, stored: Option<GoogleToken>, now: DateTime<Utc>) -> Self {
        Self {
            helper,
            stored,
            now,
        }
    }
}

impl TokenProvider for HelperTokenProvider {
    fn access_token(&self) -> Result<String, FetchError> {
        if let Some(helper) = &self.helper {
            match run_token_helper(helper) {
                Ok(token) => return Ok(token),
                Err(e) => log::warn!("Google token helper: {}", e),
            }
        }

        match &self.stored {
            Some(token) if !is_token_expired(token, self.now) => Ok(token.token.clone()),
            Some(_) => Err(FetchError::TokenExpired),
            None => Err(FetchError::MissingCredential(GOOGLE_TOKEN)),
        }
    }
}

/// Run the helper with bash and return its trimmed stdout.
fn run_token_helper(helper: &Path) -> Result<String, FetchError> {
    if !helper.exists() {
        return Err(FetchError::TokenHelper(format!(
            "not found at {}",
            helper.display()
        )));
    }

    let output = Command::new("bash").arg(helper).output()?;
    if !output.status.success() {
        return Err(FetchError::TokenHelper(format!(
            "exit {}: {}",
            output.status.code().unwrap_or(-1),
            String::from_utf8_lossy(&output.stderr).trim()
        )));
    }

    let token = String::from_utf8_lossy(&output.stdout).trim().to_string();
    if token.is_empty() {
        return Err(FetchError::TokenHelper("printed no token".to_string()));
    }
    Ok(token)
}
