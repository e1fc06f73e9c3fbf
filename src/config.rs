use anyhow::{Context, anyhow};
use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    #[serde(default)]
    pub admin: AdminConfig,
    #[serde(default)]
    pub draw: DrawConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AdminConfig {
    /// 管理接口 Bearer token，为空时拒绝所有管理请求
    pub api_token: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DrawConfig {
    /// 单次生成兑奖码的上限
    #[serde(default = "default_max_codes_per_batch")]
    pub max_codes_per_batch: u32,
    /// 统计页按日汇总的天数
    #[serde(default = "default_daily_stats_days")]
    pub daily_stats_days: u32,
}

fn default_max_codes_per_batch() -> u32 {
    10_000
}

fn default_daily_stats_days() -> u32 {
    7
}

impl Default for DrawConfig {
    fn default() -> Self {
        Self {
            max_codes_per_batch: default_max_codes_per_batch(),
            daily_stats_days: default_daily_stats_days(),
        }
    }
}

fn get_env(name: &str) -> Option<String> {
    env::var(name).ok()
}

fn get_env_parse<T: std::str::FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|v| v.parse::<T>().ok())
        .unwrap_or(default)
}

impl Config {
    pub fn from_toml() -> anyhow::Result<Self> {
        let config_path = env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string());
        use std::io::ErrorKind;

        // 尝试读取配置文件，如果不存在则完全依赖环境变量
        let mut config: Config = match std::fs::read_to_string(&config_path) {
            Ok(config_str) => Self::parse(&config_str)
                .with_context(|| format!("Failed to parse config file {config_path}"))?,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                // 数据库 URL 在无配置文件时必须提供
                let database_url = get_env("DATABASE_URL").ok_or_else(|| {
                    anyhow!("DATABASE_URL is not set and no {config_path} was found")
                })?;

                Config {
                    server: ServerConfig {
                        host: get_env("SERVER_HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
                        port: get_env_parse("SERVER_PORT", 8080u16),
                    },
                    database: DatabaseConfig {
                        url: database_url,
                        max_connections: get_env_parse("DB_MAX_CONNECTIONS", 10u32),
                    },
                    admin: AdminConfig::default(),
                    draw: DrawConfig::default(),
                }
            }
            Err(e) => {
                return Err(anyhow!("Unable to read config file {config_path}: {e}"));
            }
        };

        config.apply_env_overrides();
        Ok(config)
    }

    pub fn parse(config_str: &str) -> anyhow::Result<Self> {
        Ok(toml::from_str(config_str)?)
    }

    /// 环境变量覆盖（即便文件存在时也覆盖）
    fn apply_env_overrides(&mut self) {
        if let Ok(v) = env::var("SERVER_HOST") {
            self.server.host = v;
        }
        if let Ok(v) = env::var("SERVER_PORT")
            && let Ok(p) = v.parse()
        {
            self.server.port = p;
        }
        if let Ok(v) = env::var("DATABASE_URL") {
            self.database.url = v;
        }
        if let Ok(v) = env::var("DB_MAX_CONNECTIONS")
            && let Ok(mc) = v.parse()
        {
            self.database.max_connections = mc;
        }
        if let Ok(v) = env::var("ADMIN_API_TOKEN") {
            self.admin.api_token = v;
        }
        if let Ok(v) = env::var("DRAW_MAX_CODES_PER_BATCH")
            && let Ok(n) = v.parse()
        {
            self.draw.max_codes_per_batch = n;
        }
        if let Ok(v) = env::var("DRAW_DAILY_STATS_DAYS")
            && let Ok(n) = v.parse()
        {
            self.draw.daily_stats_days = n;
        }
    }
}
