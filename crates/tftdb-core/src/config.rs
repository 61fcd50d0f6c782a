use crate::app_config::{AppConfig, Environment};
use crate::ladder::Tier;
use crate::ConfigError;

const DEFAULT_TIERS: &str = "IRON,BRONZE,SILVER,GOLD,PLATINUM,DIAMOND";
const DEFAULT_PLATFORM_BASE_URL: &str = "https://eun1.api.riotgames.com";
const DEFAULT_REGIONAL_BASE_URL: &str = "https://europe.api.riotgames.com";

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Parsing is decoupled from the process environment so tests can drive it
/// with a plain `HashMap`.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let require = |var: &str| -> Result<String, ConfigError> {
        match lookup(var) {
            Ok(v) if !v.trim().is_empty() => Ok(v),
            _ => Err(ConfigError::MissingEnvVar(var.to_string())),
        }
    };

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        or_default(var, default)
            .parse::<u32>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        or_default(var, default)
            .parse::<u64>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_sample = |var: &str, default: &str| -> Result<usize, ConfigError> {
        let n = or_default(var, default)
            .parse::<usize>()
            .map_err(|e| invalid(var, e.to_string()))?;
        if n == 0 {
            return Err(invalid(var, "must be greater than zero".to_string()));
        }
        Ok(n)
    };

    let riot_api_key = require("RIOT_GAMES_KEY")?;
    let database_url = lookup("DATABASE_URL")
        .ok()
        .filter(|v| !v.trim().is_empty());

    let env = parse_environment(&or_default("TFTDB_ENV", "development"))?;
    let log_level = or_default("TFTDB_LOG_LEVEL", "info");
    let tiers = parse_tiers(&or_default("TFTDB_TIERS", DEFAULT_TIERS))?;

    let players_per_division = parse_sample("TFTDB_PLAYERS_PER_DIVISION", "20")?;
    let matches_per_player = parse_sample("TFTDB_MATCHES_PER_PLAYER", "20")?;

    let platform_base_url = or_default("TFTDB_PLATFORM_BASE_URL", DEFAULT_PLATFORM_BASE_URL);
    let regional_base_url = or_default("TFTDB_REGIONAL_BASE_URL", DEFAULT_REGIONAL_BASE_URL);
    let request_timeout_secs = parse_u64("TFTDB_REQUEST_TIMEOUT_SECS", "30")?;
    let user_agent = or_default("TFTDB_USER_AGENT", "tftdb/0.1 (ladder-collector)");

    let db_max_connections = parse_u32("TFTDB_DB_MAX_CONNECTIONS", "10")?;
    let db_min_connections = parse_u32("TFTDB_DB_MIN_CONNECTIONS", "1")?;
    let db_acquire_timeout_secs = parse_u64("TFTDB_DB_ACQUIRE_TIMEOUT_SECS", "10")?;

    Ok(AppConfig {
        database_url,
        env,
        log_level,
        riot_api_key,
        tiers,
        players_per_division,
        matches_per_player,
        platform_base_url,
        regional_base_url,
        request_timeout_secs,
        user_agent,
        db_max_connections,
        db_min_connections,
        db_acquire_timeout_secs,
    })
}

/// Parse a string into an `Environment` variant.
fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "TFTDB_ENV".to_string(),
            reason: format!("unknown environment '{other}'"),
        }),
    }
}

/// Parse a comma-separated tier list. Blank segments are ignored; an empty
/// list is rejected.
fn parse_tiers(raw: &str) -> Result<Vec<Tier>, ConfigError> {
    let mut tiers = Vec::new();
    for segment in raw.split(',').map(str::trim).filter(|s| !s.is_empty()) {
        let tier = segment
            .parse::<Tier>()
            .map_err(|reason| ConfigError::InvalidEnvVar {
                var: "TFTDB_TIERS".to_string(),
                reason,
            })?;
        if !tiers.contains(&tier) {
            tiers.push(tier);
        }
    }
    if tiers.is_empty() {
        return Err(ConfigError::InvalidEnvVar {
            var: "TFTDB_TIERS".to_string(),
            reason: "no tiers configured".to_string(),
        });
    }
    Ok(tiers)
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
