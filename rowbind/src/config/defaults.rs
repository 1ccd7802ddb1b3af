//! Default configuration values - single source of truth

/// Default config file name, looked up without extension
pub const CONFIG_FILE: &str = "rowbind";

/// Prefix for environment variable overrides
pub const ENV_PREFIX: &str = "ROWBIND";

/// Separator between nested keys in environment variable names
pub const ENV_SEPARATOR: &str = "__";

/// Default database URL
pub const DATABASE_URL: &str = "mysql://root@localhost:3306/test";

/// Default minimum number of pooled connections
pub const POOL_MIN: usize = 10;

/// Default maximum number of pooled connections
pub const POOL_MAX: usize = 100;
