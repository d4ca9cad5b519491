use serde::{Deserialize, Serialize};

/// 静态配置：进程启动时加载一次，之后只读
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StaticConfig {
    pub counter: CounterConfig,
    pub reconcile: ReconcileConfig,
    pub logging: LoggingConfig,
}

/// 快速计数存储配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CounterConfig {
    /// 后端选择："redis" 或 "memory"
    pub backend: String,
    pub redis: RedisConfig,
}

impl Default for CounterConfig {
    fn default() -> Self {
        Self {
            backend: "memory".into(),
            redis: RedisConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RedisConfig {
    pub url: String,
    /// 所有 key 的统一前缀（多应用共享一个 Redis 时使用）
    pub key_prefix: String,
}

impl Default for RedisConfig {
    fn default() -> Self {
        Self {
            url: "redis://127.0.0.1:6379/0".into(),
            key_prefix: String::new(),
        }
    }
}

/// 对账任务配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReconcileConfig {
    /// 缓冲曝光量刷入持久存储的周期（秒）
    pub interval_secs: u64,
}

impl Default for ReconcileConfig {
    fn default() -> Self {
        Self { interval_secs: 300 }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    /// "text" 或 "json"
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".into(),
            format: "text".into(),
        }
    }
}

impl StaticConfig {
    /// Load configuration from an optional `config.toml` in the current
    /// directory, overridden by `BLOGSTATS_*` environment variables
    /// (nested keys separated by `__`, e.g. `BLOGSTATS_COUNTER__BACKEND`).
    pub fn load() -> Self {
        let builder = config::Config::builder()
            .add_source(config::File::with_name("config").required(false))
            .add_source(
                config::Environment::with_prefix("BLOGSTATS")
                    .separator("__")
                    .try_parsing(true),
            );

        match builder.build().and_then(|c| c.try_deserialize()) {
            Ok(cfg) => cfg,
            Err(e) => {
                // tracing 此时尚未初始化，只能走 stderr
                eprintln!("[blogstats] failed to load config ({e}), using defaults");
                Self::default()
            }
        }
    }
}
