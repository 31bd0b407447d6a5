//! Service configuration loaded from environment variables.

use std::env;
use std::str::FromStr;

pub const DATABASE_URL_ENV_VAR: &str = "DATABASE_URL";
pub const BIND_ADDR_ENV_VAR: &str = "BIND_ADDR";
pub const RUN_MIGRATIONS_ENV_VAR: &str = "RUN_MIGRATIONS";

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("invalid value for {key}: {value:?}")]
    Invalid { key: &'static str, value: String },
}

/// Page size and page cap applied to one kind of table query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueryLimits {
    pub page_size: u64,
    pub max_pages: usize,
}

impl QueryLimits {
    pub const LOOKUP: QueryLimits = QueryLimits { page_size: 500, max_pages: 2 };
    pub const SCAN: QueryLimits = QueryLimits { page_size: 500, max_pages: 4 };
    pub const EXPORT: QueryLimits = QueryLimits { page_size: 1000, max_pages: 4 };
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub bind_addr: String,
    pub run_migrations: bool,
    /// Exact postcode lookup
    pub lookup: QueryLimits,
    /// Prefix scan
    pub scan: QueryLimits,
    /// Prefix scan with an explicit output format
    pub export: QueryLimits,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the config from any key lookup, e.g. a map in tests.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = lookup(DATABASE_URL_ENV_VAR)
            .filter(|url| !url.trim().is_empty())
            .ok_or(ConfigError::Missing(DATABASE_URL_ENV_VAR))?;

        let bind_addr = lookup(BIND_ADDR_ENV_VAR).unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let run_migrations = parse_or(&lookup, RUN_MIGRATIONS_ENV_VAR, false)?;

        Ok(Self {
            database_url,
            bind_addr,
            run_migrations,
            lookup: limits(&lookup, "LOOKUP_PAGE_SIZE", "LOOKUP_MAX_PAGES", QueryLimits::LOOKUP)?,
            scan: limits(&lookup, "SCAN_PAGE_SIZE", "SCAN_MAX_PAGES", QueryLimits::SCAN)?,
            export: limits(&lookup, "EXPORT_PAGE_SIZE", "EXPORT_MAX_PAGES", QueryLimits::EXPORT)?,
        })
    }
}

fn limits<F>(
    lookup: &F,
    page_size_key: &'static str,
    max_pages_key: &'static str,
    defaults: QueryLimits,
) -> Result<QueryLimits, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let page_size: u64 = parse_or(lookup, page_size_key, defaults.page_size)?;
    let max_pages: usize = parse_or(lookup, max_pages_key, defaults.max_pages)?;

    // Both must be positive: a zero page size cannot be paginated
    if page_size == 0 {
        return Err(ConfigError::Invalid { key: page_size_key, value: "0".to_string() });
    }
    if max_pages == 0 {
        return Err(ConfigError::Invalid { key: max_pages_key, value: "0".to_string() });
    }

    Ok(QueryLimits { page_size, max_pages })
}

fn parse_or<F, T>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        None => Ok(default),
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { key, value: raw }),
    }
}
