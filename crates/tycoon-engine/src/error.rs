//! Error types for the game engine binary.
//!
//! [`EngineError`] is the top-level error type that wraps all possible
//! failure modes during startup.

/// Top-level error for the engine binary.
///
/// Each variant wraps a specific subsystem error, providing a single
/// error type that the startup helpers can propagate with `?`.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// Configuration loading failed.
    #[error("config error: {source}")]
    Config {
        /// The underlying config error.
        #[from]
        source: tycoon_core::config::ConfigError,
    },

    /// Seeded data failed startup validation.
    #[error("startup validation error: {source}")]
    Validation {
        /// The underlying validation error.
        #[from]
        source: tycoon_core::state::StateError,
    },

    /// Save store construction or migration failed.
    #[error("store error: {source}")]
    Store {
        /// The underlying store error.
        #[from]
        source: tycoon_db::StoreError,
    },

    /// The HTTP server failed to start or serve.
    #[error("server error: {source}")]
    Server {
        /// The underlying server error.
        #[from]
        source: tycoon_server::ServerError,
    },
}
