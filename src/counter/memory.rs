use async_trait::async_trait;
use dashmap::DashMap;

use crate::counter::CounterStore;
use crate::errors::Result;

/// 进程内计数存储，测试和嵌入式部署用
#[derive(Default)]
pub struct MemoryCounterStore {
    inner: DashMap<String, i64>,
}

impl MemoryCounterStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// 直接写入某个 key 的值（测试构造零值 key 等场景用）
    pub fn set(&self, key: &str, value: i64) {
        self.inner.insert(key.to_string(), value);
    }
}

#[async_trait]
impl CounterStore for MemoryCounterStore {
    async fn increment(&self, key: &str) -> Result<i64> {
        let mut entry = self.inner.entry(key.to_string()).or_insert(0);
        *entry += 1;
        Ok(*entry)
    }

    async fn get(&self, key: &str) -> Result<Option<i64>> {
        Ok(self.inner.get(key).map(|v| *v))
    }

    async fn delete(&self, key: &str) -> Result<()> {
        self.inner.remove(key);
        Ok(())
    }

    async fn keys_with_prefix(&self, prefix: &str) -> Result<Vec<String>> {
        Ok(self
            .inner
            .iter()
            .filter(|e| e.key().starts_with(prefix))
            .map(|e| e.key().clone())
            .collect())
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}
