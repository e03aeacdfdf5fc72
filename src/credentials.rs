//! Access token and environment lookups.
use secrecy::SecretString;
use std::{env, fs, path::PathBuf};

use crate::{ReleaseToolsError, Result};

/// Environment variable holding the GitHub access token.
pub const GITHUB_TOKEN_ENV: &str = "GITHUB_TOKEN";
/// Token file consulted when the environment variable is unset.
pub const DEFAULT_TOKEN_FILE: &str = ".githubtoken";
/// Package registry endpoint.
pub const NUGET_SERVER_URL_ENV: &str = "NUGET_SERVER_URL";
/// Package registry API key.
pub const NUGET_API_KEY_ENV: &str = "NUGET_API_KEY";
/// Optional path to the NuGet executable.
pub const NUGET_TOOL_PATH_ENV: &str = "NUGET_TOOL_PATH";

/// Resolves the forge access token, preferring the environment over the
/// token file.
#[derive(Debug, Clone)]
pub struct TokenSource {
    token_file: PathBuf,
}

impl TokenSource {
    pub fn new(token_file: impl Into<PathBuf>) -> Self {
        Self {
            token_file: token_file.into(),
        }
    }

    pub fn access_token(&self) -> Result<SecretString> {
        if let Some(token) = optional_env_var(GITHUB_TOKEN_ENV) {
            return Ok(SecretString::from(token));
        }

        if self.token_file.is_file() {
            let token = fs::read_to_string(&self.token_file)?;
            let token = token.trim();

            if !token.is_empty() {
                return Ok(SecretString::from(token.to_string()));
            }
        }

        Err(ReleaseToolsError::MissingCredential(format!(
            "GitHub access token is missing; please put it in '{}', or in the {} environment variable.",
            self.token_file.display(),
            GITHUB_TOKEN_ENV
        )))
    }
}

impl Default for TokenSource {
    fn default() -> Self {
        Self::new(DEFAULT_TOKEN_FILE)
    }
}

/// Value of an environment variable that must be set and non-empty.
pub fn required_env_var(key: &str) -> Result<String> {
    optional_env_var(key)
        .ok_or_else(|| ReleaseToolsError::MissingEnvVar(key.to_string()))
}

/// Value of an environment variable, treating empty as unset.
pub fn optional_env_var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.is_empty())
}
