use async_trait::async_trait;
use redis::{AsyncCommands, aio::MultiplexedConnection};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, error};

use crate::config::RedisConfig;
use crate::counter::CounterStore;
use crate::errors::{BlogstatsError, Result};

pub struct RedisCounterStore {
    client: redis::Client,
    /// 持久化连接，使用 RwLock 保护
    connection: Arc<RwLock<Option<MultiplexedConnection>>>,
    key_prefix: String,
}

impl RedisCounterStore {
    pub async fn new(config: &RedisConfig) -> Result<Self> {
        debug!(
            "RedisCounterStore created with prefix: '{}'",
            config.key_prefix
        );

        let client = redis::Client::open(config.url.clone())
            .map_err(|e| BlogstatsError::cache_connection(format!("invalid Redis URL: {e}")))?;

        // 测试 Redis 连接
        let mut conn = client.get_multiplexed_async_connection().await.map_err(|e| {
            error!(
                "Failed to connect to Redis server: {}. Check Redis server status and URL: {}",
                e, config.url
            );
            BlogstatsError::cache_connection(format!("Redis connection failed: {e}"))
        })?;
        let pong: String = redis::cmd("PING")
            .query_async(&mut conn)
            .await
            .map_err(|e| BlogstatsError::cache_connection(format!("Redis ping failed: {e}")))?;
        debug!("Redis connection test successful: {}", pong);

        Ok(Self {
            client,
            connection: Arc::new(RwLock::new(Some(conn))),
            key_prefix: config.key_prefix.clone(),
        })
    }

    /// 获取或建立持久连接
    async fn get_connection(&self) -> Result<MultiplexedConnection> {
        // 首先尝试读取现有连接
        {
            let conn_guard = self.connection.read().await;
            if let Some(ref conn) = *conn_guard {
                return Ok(conn.clone());
            }
        }

        // 需要建立新连接
        let mut conn_guard = self.connection.write().await;

        // 双重检查，避免竞态条件
        if let Some(ref conn) = *conn_guard {
            return Ok(conn.clone());
        }

        let new_conn = self.client.get_multiplexed_async_connection().await?;
        *conn_guard = Some(new_conn.clone());
        debug!("Redis connection established and cached");

        Ok(new_conn)
    }

    /// 重置连接（在连接错误时调用）
    async fn reset_connection(&self) {
        let mut conn_guard = self.connection.write().await;
        *conn_guard = None;
        debug!("Redis connection reset due to error");
    }

    fn make_key(&self, key: &str) -> String {
        format!("{}{}", self.key_prefix, key)
    }
}

#[async_trait]
impl CounterStore for RedisCounterStore {
    async fn increment(&self, key: &str) -> Result<i64> {
        let redis_key = self.make_key(key);
        let mut conn = self.get_connection().await?;

        match conn.incr::<_, _, i64>(&redis_key, 1).await {
            Ok(value) => Ok(value),
            Err(e) => {
                error!("Failed to increment key '{}': {}", key, e);
                self.reset_connection().await;
                Err(e.into())
            }
        }
    }

    async fn get(&self, key: &str) -> Result<Option<i64>> {
        let redis_key = self.make_key(key);
        let mut conn = self.get_connection().await?;

        match conn.get::<_, Option<i64>>(&redis_key).await {
            Ok(value) => Ok(value),
            Err(e) => {
                error!("Failed to get key '{}': {}", key, e);
                self.reset_connection().await;
                Err(e.into())
            }
        }
    }

    async fn delete(&self, key: &str) -> Result<()> {
        let redis_key = self.make_key(key);
        let mut conn = self.get_connection().await?;

        match conn.del::<_, i64>(&redis_key).await {
            Ok(_) => Ok(()),
            Err(e) => {
                error!("Failed to delete key '{}': {}", key, e);
                self.reset_connection().await;
                Err(e.into())
            }
        }
    }

    async fn keys_with_prefix(&self, prefix: &str) -> Result<Vec<String>> {
        let pattern = format!("{}{}*", self.key_prefix, prefix);
        let mut conn = self.get_connection().await?;

        // 原实现用的就是 KEYS；缓冲 key 的数量与实体数同阶，可接受。
        // 数据量大时可换成 SCAN。
        let keys: Vec<String> = match redis::cmd("KEYS").arg(&pattern).query_async(&mut conn).await
        {
            Ok(keys) => keys,
            Err(e) => {
                error!("Failed to enumerate keys for pattern '{}': {}", pattern, e);
                self.reset_connection().await;
                return Err(e.into());
            }
        };

        // 去掉全局前缀后返回调用方视角的 key
        Ok(keys
            .into_iter()
            .filter_map(|k| k.strip_prefix(&self.key_prefix).map(str::to_string))
            .collect())
    }

    fn backend_name(&self) -> &'static str {
        "redis"
    }
}
