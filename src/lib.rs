//! Library entry for lingocache: YAML message lookup with fallback languages,
//! a TTL cache, key validation and update checks.

pub mod config;
pub mod i18n;
pub mod logging;
pub mod update;
