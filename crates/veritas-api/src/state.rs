//! # Application State
//!
//! Shared state passed to all Axum route handlers via the `State` extractor.

use std::sync::Arc;

use veritas_inference::{Generator, TemplateGenerator};
use veritas_ledger::LedgerClient;

use crate::coordinator::RequestCoordinator;

/// Default HTTP port.
pub const DEFAULT_PORT: u16 = 3001;

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Port to bind the HTTP server to.
    pub port: u16,
    /// Emit logs as JSON lines instead of human-readable text.
    pub json_logs: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            json_logs: false,
        }
    }
}

impl AppConfig {
    /// Read `PORT` and `LOG_FORMAT` from the environment.
    pub fn from_env() -> Self {
        let port = std::env::var("PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(DEFAULT_PORT);
        let json_logs = std::env::var("LOG_FORMAT")
            .map(|f| f.eq_ignore_ascii_case("json"))
            .unwrap_or(false);
        Self { port, json_logs }
    }
}

/// Shared application state. Cheap to clone.
#[derive(Debug, Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub ledger: LedgerClient,
    pub coordinator: RequestCoordinator,
}

impl AppState {
    /// State over the given ledger client with the template generator.
    pub fn new(config: AppConfig, ledger: LedgerClient) -> Self {
        Self::with_generator(config, ledger, Arc::new(TemplateGenerator::new()))
    }

    pub fn with_generator(
        config: AppConfig,
        ledger: LedgerClient,
        generator: Arc<dyn Generator>,
    ) -> Self {
        let coordinator = RequestCoordinator::new(ledger.clone(), generator);
        Self {
            config,
            ledger,
            coordinator,
        }
    }

    /// State in mock mode, for tests and offline use.
    pub fn mock() -> Self {
        Self::new(AppConfig::default(), LedgerClient::mock())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_port() {
        assert_eq!(AppConfig::default().port, 3001);
    }

    #[test]
    fn coordinator_shares_the_ledger_client() {
        let state = AppState::mock();
        state.ledger.shutdown();
        assert_eq!(
            state.coordinator.ledger().state(),
            veritas_ledger::ConnectionState::MockMode
        );
    }
}
