use std::sync::Arc;

use async_trait::async_trait;

use crate::errors::Result;

pub mod memory;
pub mod redis;

pub use memory::MemoryCounterStore;
pub use redis::RedisCounterStore;

/// 快速计数存储（缓冲曝光计数用）
///
/// 所有操作都是进程外调用，可能瞬时不可用；事件路径上的调用方
/// 负责吞掉错误并记录日志，绝不把存储故障抛给 HTTP 调用者。
#[async_trait]
pub trait CounterStore: Send + Sync {
    /// 原子自增：key 不存在时从 0 创建再加一，返回新值
    async fn increment(&self, key: &str) -> Result<i64>;

    async fn get(&self, key: &str) -> Result<Option<i64>>;

    async fn delete(&self, key: &str) -> Result<()>;

    /// 枚举指定前缀的 key（仅对账任务使用，与并发自增之间
    /// 只要求最终一致）
    async fn keys_with_prefix(&self, prefix: &str) -> Result<Vec<String>>;

    fn backend_name(&self) -> &'static str;
}

pub struct CounterFactory;

impl CounterFactory {
    /// 根据配置创建计数存储后端
    pub async fn create() -> Result<Arc<dyn CounterStore>> {
        let config = crate::config::get_config();

        let boxed: Box<dyn CounterStore> = match config.counter.backend.as_str() {
            "redis" => Box::new(RedisCounterStore::new(&config.counter.redis).await?),
            _ => Box::new(MemoryCounterStore::new()),
        };

        Ok(Arc::from(boxed))
    }
}
