//! Gate configuration, loaded from environment variables.

use std::time::Duration;

const DEFAULT_RESOLVE_TIMEOUT_MS: u64 = 5_000;
const DEFAULT_CREDENTIAL_TTL_SECS: u64 = 30 * 24 * 60 * 60;
const DEFAULT_CREDENTIAL_KEY: &str = "ridegate.credential";
const DEFAULT_LOGIN_DESTINATION: &str = "/login";

/// Tuning knobs for session resolution and gating.
#[derive(Debug, Clone)]
pub struct GateConfig {
    /// Bound on the initial credential read; past it, resolution settles
    /// with no actor so the gate never stays pending forever.
    pub resolve_timeout: Duration,
    /// Lifetime stamped onto credentials persisted at login.
    pub credential_ttl: Duration,
    /// Key the credential is stored under.
    pub credential_key: String,
    /// Where denied screens are redirected.
    pub login_destination: String,
}

impl GateConfig {
    /// Load from `RIDEGATE_*` environment variables, falling back to the
    /// coded defaults for anything missing or unparsable.
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            resolve_timeout: Duration::from_millis(env_parse(
                "RIDEGATE_RESOLVE_TIMEOUT_MS",
                DEFAULT_RESOLVE_TIMEOUT_MS,
            )),
            credential_ttl: Duration::from_secs(env_parse(
                "RIDEGATE_CREDENTIAL_TTL_SECS",
                DEFAULT_CREDENTIAL_TTL_SECS,
            )),
            credential_key: env_string("RIDEGATE_CREDENTIAL_KEY", DEFAULT_CREDENTIAL_KEY),
            login_destination: env_string("RIDEGATE_LOGIN_DESTINATION", DEFAULT_LOGIN_DESTINATION),
        }
    }
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            resolve_timeout: Duration::from_millis(DEFAULT_RESOLVE_TIMEOUT_MS),
            credential_ttl: Duration::from_secs(DEFAULT_CREDENTIAL_TTL_SECS),
            credential_key: DEFAULT_CREDENTIAL_KEY.to_owned(),
            login_destination: DEFAULT_LOGIN_DESTINATION.to_owned(),
        }
    }
}

pub(crate) fn env_parse<T>(key: &str, default: T) -> T
where
    T: std::str::FromStr + Copy,
{
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse::<T>().ok())
        .unwrap_or(default)
}

fn env_string(key: &str, default: &str) -> String {
    std::env::var(key)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| default.to_owned())
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
