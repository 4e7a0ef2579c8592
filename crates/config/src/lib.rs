//! 统一配置中心
//!
//! 提供应用的全局配置管理，包括：
//! - 服务监听地址与 CORS 白名单
//! - 协调器命令队列
//! - 日志输出
//!
//! 加载顺序：默认值 -> 可选配置文件（`CHAT_CONFIG_FILE`）-> `CHAT_*` 环境变量 -> `PORT`。

use figment::providers::{Env, Format, Json, Serialized, Toml, Yaml};
use figment::Figment;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// 指定配置文件路径的环境变量
pub const CONFIG_FILE_ENV: &str = "CHAT_CONFIG_FILE";

/// 环境变量前缀，嵌套字段用 `__` 分隔，例如 `CHAT_SERVER__HOST`
pub const ENV_PREFIX: &str = "CHAT_";

/// 全局应用配置
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct AppConfig {
    /// 服务配置
    #[validate(nested)]
    pub server: ServerConfig,
    /// 协调器配置
    #[serde(default)]
    #[validate(nested)]
    pub hub: HubConfig,
    /// 日志配置
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// 服务器配置
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ServerConfig {
    #[validate(length(min = 1))]
    pub host: String,
    #[validate(range(min = 1))]
    pub port: u16,
    #[serde(default)]
    pub cors_origins: Vec<String>,
}

/// 协调器配置
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct HubConfig {
    /// 入站命令队列容量
    #[validate(range(min = 1))]
    pub command_capacity: usize,
}

impl Default for HubConfig {
    fn default() -> Self {
        Self {
            command_capacity: 1024,
        }
    }
}

/// 日志配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// `RUST_LOG` 未设置时使用的过滤规则
    pub filter: String,
    /// 是否输出 JSON 格式日志
    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "info".to_string(),
            json: false,
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: "0.0.0.0".into(),
                port: 5001,
                cors_origins: vec![
                    "http://localhost:3000".into(),
                    "http://localhost:3001".into(),
                ],
            },
            hub: HubConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl AppConfig {
    /// 按优先级合并所有配置来源并校验
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_figment(Self::figment())
    }

    /// 组装配置来源，测试中可以单独使用
    pub fn figment() -> Figment {
        let mut fig = Figment::new().merge(Serialized::defaults(AppConfig::default()));
        if let Ok(path) = std::env::var(CONFIG_FILE_ENV) {
            if path.ends_with(".yml") || path.ends_with(".yaml") {
                fig = fig.merge(Yaml::file(path));
            } else if path.ends_with(".json") {
                fig = fig.merge(Json::file(path));
            } else {
                fig = fig.merge(Toml::file(path));
            }
        }
        fig.merge(Env::prefixed(ENV_PREFIX).split("__"))
            .merge(Env::raw().only(&["PORT"]).map(|_| "server.port".into()))
    }

    pub fn from_figment(fig: Figment) -> Result<Self, ConfigError> {
        let cfg: AppConfig = fig.extract().map_err(Box::new)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// 监听地址，形如 `0.0.0.0:5001`
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

/// 配置错误类型
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    Load(#[from] Box<figment::Error>),
    #[error("Invalid configuration: {0}")]
    Invalid(#[from] validator::ValidationErrors),
}
