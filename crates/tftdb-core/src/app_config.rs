use crate::ladder::Tier;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

#[derive(Clone)]
pub struct AppConfig {
    /// Needed by the `db` commands and by `collect` unless it is a dry run.
    pub database_url: Option<String>,
    pub env: Environment,
    pub log_level: String,
    pub riot_api_key: String,
    /// Tiers collected by `tftdb collect` when no `--tier` flag is given.
    pub tiers: Vec<Tier>,
    pub players_per_division: usize,
    pub matches_per_player: usize,
    /// Host serving league endpoints (e.g. `https://eun1.api.riotgames.com`).
    pub platform_base_url: String,
    /// Host serving match endpoints (e.g. `https://europe.api.riotgames.com`).
    pub regional_base_url: String,
    pub request_timeout_secs: u64,
    pub user_agent: String,
    pub db_max_connections: u32,
    pub db_min_connections: u32,
    pub db_acquire_timeout_secs: u64,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("log_level", &self.log_level)
            .field("database_url", &"[redacted]")
            .field("riot_api_key", &"[redacted]")
            .field("tiers", &self.tiers)
            .field("players_per_division", &self.players_per_division)
            .field("matches_per_player", &self.matches_per_player)
            .field("platform_base_url", &self.platform_base_url)
            .field("regional_base_url", &self.regional_base_url)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("user_agent", &self.user_agent)
            .field("db_max_connections", &self.db_max_connections)
            .field("db_min_connections", &self.db_min_connections)
            .field("db_acquire_timeout_secs", &self.db_acquire_timeout_secs)
            .finish()
    }
}
