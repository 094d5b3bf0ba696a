//! Ledger client configuration.
//!
//! The live ledger is reached through an HTTP gateway in front of the
//! verifier contract. A signing credential is mandatory for live mode; its
//! absence is not an error at startup, it selects mock mode.

use std::time::Duration;

use url::Url;
use veritas_core::LedgerAddress;
use zeroize::Zeroizing;

/// Default gateway endpoint.
pub const DEFAULT_RPC_URL: &str = "https://evmrpc-testnet.0g.ai";

/// Default verifier contract address.
pub const DEFAULT_CONTRACT_ADDRESS: &str = "0x0B1eB634c9F6Cf22B831ca5B7B66E8CBeD3BfC78";

/// Configuration for connecting to the ledger gateway.
///
/// Custom `Debug` implementation redacts `signer_key`.
#[derive(Clone)]
pub struct LedgerConfig {
    /// Gateway base URL. Always ends with `/`.
    pub rpc_url: Url,
    /// Credential for the signing identity. Zeroized on drop.
    pub signer_key: Zeroizing<String>,
    /// Address of the verifier contract.
    pub contract_address: LedgerAddress,
    /// Per-request HTTP timeout in seconds.
    pub timeout_secs: u64,
    /// Upper bound on waiting for a transaction to confirm, in seconds.
    pub confirm_timeout_secs: u64,
    /// Interval between receipt polls, in milliseconds.
    pub poll_interval_ms: u64,
}

impl std::fmt::Debug for LedgerConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LedgerConfig")
            .field("rpc_url", &self.rpc_url)
            .field("signer_key", &"[REDACTED]")
            .field("contract_address", &self.contract_address)
            .field("timeout_secs", &self.timeout_secs)
            .field("confirm_timeout_secs", &self.confirm_timeout_secs)
            .field("poll_interval_ms", &self.poll_interval_ms)
            .finish()
    }
}

impl LedgerConfig {
    /// Load configuration from environment variables.
    ///
    /// Variables:
    /// - `LEDGER_RPC_URL` (default: `https://evmrpc-testnet.0g.ai`)
    /// - `LEDGER_SIGNER_KEY` (required)
    /// - `LEDGER_CONTRACT_ADDRESS` (default: the deployed verifier)
    /// - `LEDGER_TIMEOUT_SECS` (default: 30)
    /// - `LEDGER_CONFIRM_TIMEOUT_SECS` (default: 120)
    /// - `LEDGER_POLL_INTERVAL_MS` (default: 1000)
    pub fn from_env() -> Result<Self, ConfigError> {
        let signer_key = std::env::var("LEDGER_SIGNER_KEY")
            .ok()
            .filter(|k| !k.trim().is_empty())
            .ok_or(ConfigError::MissingSignerKey)?;

        let contract_address = std::env::var("LEDGER_CONTRACT_ADDRESS")
            .unwrap_or_else(|_| DEFAULT_CONTRACT_ADDRESS.to_string());
        if contract_address.trim().is_empty() {
            return Err(ConfigError::MissingContractAddress);
        }

        Ok(Self {
            rpc_url: env_url("LEDGER_RPC_URL", DEFAULT_RPC_URL)?,
            signer_key: Zeroizing::new(signer_key),
            contract_address: LedgerAddress::new(contract_address),
            timeout_secs: env_u64("LEDGER_TIMEOUT_SECS", 30),
            confirm_timeout_secs: env_u64("LEDGER_CONFIRM_TIMEOUT_SECS", 120),
            poll_interval_ms: env_u64("LEDGER_POLL_INTERVAL_MS", 1000),
        })
    }

    /// Configuration pointing at a local gateway (for testing).
    pub fn local(base_url: &str, signer_key: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            rpc_url: parse_base_url("local", base_url)?,
            signer_key: Zeroizing::new(signer_key.to_string()),
            contract_address: LedgerAddress::new(DEFAULT_CONTRACT_ADDRESS),
            timeout_secs: 5,
            confirm_timeout_secs: 2,
            poll_interval_ms: 10,
        })
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn confirm_timeout(&self) -> Duration {
        Duration::from_secs(self.confirm_timeout_secs)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

fn env_url(var: &str, default: &str) -> Result<Url, ConfigError> {
    let raw = std::env::var(var).unwrap_or_else(|_| default.to_string());
    parse_base_url(var, &raw)
}

fn env_u64(var: &str, default: u64) -> u64 {
    std::env::var(var)
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(default)
}

/// Parse a base URL, forcing a trailing slash so relative paths append.
fn parse_base_url(source: &str, raw: &str) -> Result<Url, ConfigError> {
    let mut url =
        Url::parse(raw).map_err(|e| ConfigError::InvalidUrl(source.to_string(), e.to_string()))?;
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("LEDGER_SIGNER_KEY environment variable is required")]
    MissingSignerKey,
    #[error("LEDGER_CONTRACT_ADDRESS must not be empty")]
    MissingContractAddress,
    #[error("invalid URL for {0}: {1}")]
    InvalidUrl(String, String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn local_builds_valid_config() {
        let cfg = LedgerConfig::local("http://127.0.0.1:9000", "key").unwrap();
        assert_eq!(cfg.rpc_url.as_str(), "http://127.0.0.1:9000/");
        assert_eq!(cfg.signer_key.as_str(), "key");
        assert_eq!(cfg.timeout_secs, 5);
    }

    #[test]
    fn base_url_gains_trailing_slash() {
        let url = parse_base_url("t", "https://gw.example.com/rpc").unwrap();
        assert_eq!(url.as_str(), "https://gw.example.com/rpc/");
        assert_eq!(url.join("ledger/v1/requests").unwrap().path(), "/rpc/ledger/v1/requests");
    }

    #[test]
    fn env_url_uses_default_when_var_absent() {
        let url = env_url("NONEXISTENT_LEDGER_VAR_12345", "https://example.com").unwrap();
        assert_eq!(url.as_str(), "https://example.com/");
    }

    #[test]
    fn invalid_url_is_rejected() {
        assert!(matches!(
            parse_base_url("t", "not a url"),
            Err(ConfigError::InvalidUrl(..))
        ));
    }

    #[test]
    fn debug_redacts_signer_key() {
        let cfg = LedgerConfig::local("http://127.0.0.1:9000", "super-secret").unwrap();
        let rendered = format!("{cfg:?}");
        assert!(!rendered.contains("super-secret"));
        assert!(rendered.contains("[REDACTED]"));
    }
}
