use std::time::Duration;

use clap::{Parser, ValueEnum};

use crate::domain::order::TransitionPolicy;

// ============================================================================
// Service Configuration
// ============================================================================
//
// Every setting can come from a flag or the matching environment variable.
//
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StorageBackend {
    Scylla,
    /// Volatile; for local runs only.
    Memory,
}

/// Command-line face of `TransitionPolicy`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PolicyArg {
    /// Any registered status over any other
    Unrestricted,
    /// Follow the kitchen lifecycle
    Lifecycle,
}

impl From<PolicyArg> for TransitionPolicy {
    fn from(arg: PolicyArg) -> Self {
        match arg {
            PolicyArg::Unrestricted => TransitionPolicy::Unrestricted,
            PolicyArg::Lifecycle => TransitionPolicy::Lifecycle,
        }
    }
}

#[derive(Parser, Debug, Clone)]
#[command(author, version, about = "Food order management service", long_about = None)]
pub struct Config {
    #[arg(long, env = "ORDERS_HTTP_HOST", default_value = "0.0.0.0")]
    pub http_host: String,

    #[arg(long, env = "ORDERS_HTTP_PORT", default_value_t = 8080)]
    pub http_port: u16,

    #[arg(long, env = "ORDERS_STORAGE", value_enum, default_value_t = StorageBackend::Scylla)]
    pub storage: StorageBackend,

    /// Contact points, comma separated
    #[arg(
        long,
        env = "SCYLLA_NODES",
        value_delimiter = ',',
        default_value = "127.0.0.1:9042"
    )]
    pub scylla_nodes: Vec<String>,

    #[arg(long, env = "SCYLLA_KEYSPACE", default_value = "orders_ks")]
    pub scylla_keyspace: String,

    /// Product catalog base URL. Without it every product is accepted.
    #[arg(long, env = "PRODUCT_CATALOG_URL")]
    pub catalog_url: Option<String>,

    #[arg(long, env = "PRODUCT_CATALOG_TIMEOUT_SECS", default_value_t = 5)]
    pub catalog_timeout_secs: u64,

    #[arg(
        long,
        env = "ORDERS_TRANSITION_POLICY",
        value_enum,
        default_value_t = PolicyArg::Unrestricted
    )]
    pub transition_policy: PolicyArg,

    /// Default log filter; RUST_LOG takes precedence
    #[arg(long, env = "ORDERS_LOG_LEVEL", default_value = "info,order_service=debug")]
    pub log_level: String,
}

impl Config {
    pub fn catalog_timeout(&self) -> Duration {
        Duration::from_secs(self.catalog_timeout_secs)
    }

    pub fn policy(&self) -> TransitionPolicy {
        self.transition_policy.into()
    }
}
