//! Miro configuration parsed from environment variables.

use super::types::MiroError;

pub const DEFAULT_API_URL: &str = "https://api.miro.com/v2";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;
pub const TOKEN_VAR: &str = "MIRO_PAT";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MiroTimeouts {
    pub request_secs: u64,
    pub connect_secs: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MiroConfig {
    pub token: String,
    pub board_id: Option<String>,
    pub api_url: String,
    pub timeouts: MiroTimeouts,
}

impl MiroConfig {
    /// Build typed Miro config from environment variables.
    ///
    /// Required:
    /// - `MIRO_PAT`: personal access token
    ///
    /// Optional:
    /// - `MIRO_BOARD_ID`: default board
    /// - `MIRO_API_URL`: default `https://api.miro.com/v2`
    /// - `MIRO_REQUEST_TIMEOUT_SECS`: default 10
    /// - `MIRO_CONNECT_TIMEOUT_SECS`: default 10
    ///
    /// # Errors
    ///
    /// Returns `MiroError::MissingToken` if `MIRO_PAT` is unset or empty.
    pub fn from_env() -> Result<Self, MiroError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as `from_env`, reading values through `lookup`.
    ///
    /// # Errors
    ///
    /// Returns `MiroError::MissingToken` if the token is unset or empty.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, MiroError> {
        let token = lookup(TOKEN_VAR)
            .filter(|t| !t.trim().is_empty())
            .ok_or_else(|| MiroError::MissingToken { var: TOKEN_VAR.into() })?;

        let board_id = lookup("MIRO_BOARD_ID").filter(|b| !b.trim().is_empty());
        let api_url = lookup("MIRO_API_URL")
            .unwrap_or_else(|| DEFAULT_API_URL.to_string())
            .trim_end_matches('/')
            .to_string();
        let timeouts = MiroTimeouts {
            request_secs: parse_u64(lookup("MIRO_REQUEST_TIMEOUT_SECS"), DEFAULT_REQUEST_TIMEOUT_SECS),
            connect_secs: parse_u64(lookup("MIRO_CONNECT_TIMEOUT_SECS"), DEFAULT_CONNECT_TIMEOUT_SECS),
        };

        Ok(Self { token, board_id, api_url, timeouts })
    }
}

fn parse_u64(raw: Option<String>, default: u64) -> u64 {
    raw.and_then(|v| v.trim().parse::<u64>().ok())
        .unwrap_or(default)
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
