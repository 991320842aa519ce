//! Infrastructure layer constants
//!
//! Domain-specific constants are defined in `relay_domain::constants`.

// ============================================================================
// CONFIGURATION CONSTANTS
// ============================================================================

/// Default configuration file name
pub const DEFAULT_CONFIG_FILENAME: &str = "relay.toml";

/// Default configuration directory name
pub const DEFAULT_CONFIG_DIR: &str = "relay";

/// Environment variable prefix for configuration
pub const CONFIG_ENV_PREFIX: &str = "RELAY";

/// Separator between nested keys in environment variable names
pub const CONFIG_ENV_SEPARATOR: &str = "__";

/// Unprefixed variables honoured for compatibility, with their config keys
pub const LEGACY_ENV_MAPPINGS: &[(&str, &str)] = &[
    ("GEMINI_API_KEY", "model.api_key"),
    ("PORT", "server.port"),
    ("FRONTEND_URL", "server.cors_origin"),
    ("HOST_EMAIL", "tools.mail.username"),
    ("HOST_PASSWORD", "tools.mail.password"),
    ("TWITTER_BEARER_TOKEN", "tools.social.bearer_token"),
];

// ============================================================================
// HTTP SERVER CONSTANTS
// ============================================================================

/// Default bind address
pub const DEFAULT_SERVER_HOST: &str = "127.0.0.1";

/// Default HTTP port
pub const DEFAULT_SERVER_PORT: u16 = 4000;

/// Default allowed CORS origin
pub const DEFAULT_CORS_ORIGIN: &str = "http://localhost:3000";

// ============================================================================
// MODEL CONSTANTS
// ============================================================================

/// Default upstream request timeout in seconds
pub const DEFAULT_MODEL_TIMEOUT_SECS: u64 = 60;

// ============================================================================
// TOOL CLIENT CONSTANTS
// ============================================================================

/// Default bound on the connect and initialize handshake
pub const DEFAULT_HANDSHAKE_TIMEOUT_SECS: u64 = 10;

/// Default bound on waiting for one tool result
pub const DEFAULT_CALL_TIMEOUT_SECS: u64 = 60;

/// Default number of reconnect attempts after the push stream closes
pub const DEFAULT_MAX_RECONNECT_ATTEMPTS: u32 = 3;

// ============================================================================
// TOOL SERVICE CONSTANTS
// ============================================================================

/// Default SMTP relay
pub const DEFAULT_SMTP_HOST: &str = "smtp.gmail.com";

/// Default SMTP submission port (implicit TLS)
pub const DEFAULT_SMTP_PORT: u16 = 465;

/// Timeout for social API requests in seconds
pub const DEFAULT_SOCIAL_TIMEOUT_SECS: u64 = 30;

// ============================================================================
// LOGGING CONSTANTS
// ============================================================================

/// Default log level
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Environment variable holding a full `EnvFilter` directive
pub const LOG_FILTER_ENV: &str = "RELAY_LOG";

/// File stem used when the log path has none
pub const DEFAULT_LOG_FILE_STEM: &str = "relay";
