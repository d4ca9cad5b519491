//! 按实体种类参数化的统计记录服务
//!
//! 文章和分类走同一套代码路径，存储行按 `(kind, id)` 区分。
//! 所有外部存储依赖都显式注入，测试时可替换为内存实现。

use std::net::IpAddr;
use std::sync::Arc;

use tracing::warn;
use uuid::Uuid;

use crate::errors::Result;
use crate::storage::{AnalyticsRecord, AnalyticsStore, EntityKind, EntityStore, ViewLedger};

pub struct EntityAnalytics {
    entities: Arc<dyn EntityStore>,
    records: Arc<dyn AnalyticsStore>,
    ledger: Arc<dyn ViewLedger>,
}

impl EntityAnalytics {
    pub fn new(
        entities: Arc<dyn EntityStore>,
        records: Arc<dyn AnalyticsStore>,
        ledger: Arc<dyn ViewLedger>,
    ) -> Self {
        Self {
            entities,
            records,
            ledger,
        }
    }

    /// 曝光计数加 `delta`
    ///
    /// 实体不存在时跳过并记录日志，不向调用方报错（缓冲计数里可能
    /// 残留已删除实体的 key，由对账任务清理）。
    pub async fn increment_impressions(&self, kind: EntityKind, id: Uuid, delta: u64) -> Result<()> {
        if !self.entities.exists(kind, id).await? {
            warn!(
                "skipping impression increment for missing {} {} (delta {})",
                kind, id, delta
            );
            return Ok(());
        }

        self.records.add_impressions(kind, id, delta).await?;
        Ok(())
    }

    /// 点击计数加一，返回更新后的记录（含新的点击总数和 CTR）
    pub async fn increment_clicks(&self, kind: EntityKind, id: Uuid) -> Result<AnalyticsRecord> {
        self.records.add_click(kind, id).await
    }

    /// 浏览计数：每个 `(实体, 访客IP)` 只计一次
    ///
    /// 先在去重账本里原子插入，只有新插入的组合才会加计数。
    /// 返回该浏览是否被计入（重复浏览返回 `Ok(false)`，不是错误）。
    pub async fn increment_view(
        &self,
        kind: EntityKind,
        id: Uuid,
        visitor_ip: IpAddr,
    ) -> Result<bool> {
        if !self.ledger.record(kind, id, visitor_ip).await? {
            return Ok(false);
        }

        self.records.add_view(kind, id).await?;
        Ok(true)
    }

    /// 设置平均停留时长（独立指标，不参与 CTR 派生）
    pub async fn set_avg_time_on_page(
        &self,
        kind: EntityKind,
        id: Uuid,
        seconds: f64,
    ) -> Result<AnalyticsRecord> {
        self.records.set_avg_time_on_page(kind, id, seconds).await
    }

    pub async fn get(&self, kind: EntityKind, id: Uuid) -> Result<Option<AnalyticsRecord>> {
        self.records.get(kind, id).await
    }
}
