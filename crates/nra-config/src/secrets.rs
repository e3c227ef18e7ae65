//! Runtime secret resolution.
//!
//! Config YAML stores only env var NAMES; values come from the process
//! environment. Resolve once at startup and pass the result into
//! constructors. `Debug` redacts values and errors name the variable, never
//! its value.

use anyhow::{bail, Result};
use serde_json::Value;

pub const DEFAULT_TWELVEDATA_KEY_ENV: &str = "TWELVEDATA_API_KEY";

#[derive(Clone)]
pub struct ResolvedSecrets {
    /// Env var the key was read from.
    pub twelvedata_api_key_var: String,
    /// `None` if the variable was absent or blank.
    pub twelvedata_api_key: Option<String>,
}

impl std::fmt::Debug for ResolvedSecrets {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResolvedSecrets")
            .field("twelvedata_api_key_var", &self.twelvedata_api_key_var)
            .field(
                "twelvedata_api_key",
                &self.twelvedata_api_key.as_ref().map(|_| "<REDACTED>"),
            )
            .finish()
    }
}

fn resolve_env(var_name: &str) -> Option<String> {
    match std::env::var(var_name) {
        Ok(v) if !v.trim().is_empty() => Some(v),
        _ => None,
    }
}

/// Resolve the provider key named at `/data/providers/twelvedata/api_key_env`
/// (default `TWELVEDATA_API_KEY`).
///
/// With `require_provider`, a missing key is `SECRETS_MISSING`.
pub fn resolve_secrets(config_json: &Value, require_provider: bool) -> Result<ResolvedSecrets> {
    let var = config_json
        .pointer("/data/providers/twelvedata/api_key_env")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .unwrap_or(DEFAULT_TWELVEDATA_KEY_ENV)
        .to_string();

    let key = resolve_env(&var);
    if require_provider && key.is_none() {
        bail!(
            "SECRETS_MISSING: required env var '{}' (TwelveData api_key) is not set or empty",
            var
        );
    }

    Ok(ResolvedSecrets {
        twelvedata_api_key_var: var,
        twelvedata_api_key: key,
    })
}
