use std::net::IpAddr;

use async_trait::async_trait;
use uuid::Uuid;

use crate::errors::Result;

pub mod memory;
mod models;

pub use memory::MemoryBackend;
pub use models::{AnalyticsRecord, Entity, EntityKind, ViewRecord};

/// 实体的只读访问：存在性检查和 slug 查找。
/// `insert` 供上层建模代码和测试种数据用。
#[async_trait]
pub trait EntityStore: Send + Sync {
    async fn exists(&self, kind: EntityKind, id: Uuid) -> Result<bool>;
    async fn find_by_slug(&self, kind: EntityKind, slug: &str) -> Result<Option<Entity>>;
    async fn insert(&self, entity: Entity) -> Result<()>;
}

/// 持久化统计记录存储
///
/// 所有写方法都是 get-or-create 语义：记录不存在时先创建再应用增量。
/// 实现必须把计数变更和 `click_through_rate` 重算放在同一个原子单元里
/// （同一行锁 / 同一条 UPDATE），并发写同一条记录不允许丢失更新。
#[async_trait]
pub trait AnalyticsStore: Send + Sync {
    async fn get(&self, kind: EntityKind, id: Uuid) -> Result<Option<AnalyticsRecord>>;

    /// `impressions += delta`，返回更新后的记录
    async fn add_impressions(
        &self,
        kind: EntityKind,
        id: Uuid,
        delta: u64,
    ) -> Result<AnalyticsRecord>;

    /// `clicks += 1`，返回更新后的记录（调用方需要新的点击总数）
    async fn add_click(&self, kind: EntityKind, id: Uuid) -> Result<AnalyticsRecord>;

    /// `views += 1`。去重判断由调用方负责（见 `ViewLedger`）
    async fn add_view(&self, kind: EntityKind, id: Uuid) -> Result<AnalyticsRecord>;

    /// 平均停留时长是独立设置的指标，不参与派生计算
    async fn set_avg_time_on_page(
        &self,
        kind: EntityKind,
        id: Uuid,
        seconds: f64,
    ) -> Result<AnalyticsRecord>;
}

/// 浏览去重账本
///
/// 唯一性必须在存储层保证：`record` 原子地完成"检查 + 插入"，
/// 返回该访客对该实体是否是首次浏览。
#[async_trait]
pub trait ViewLedger: Send + Sync {
    async fn exists(&self, kind: EntityKind, id: Uuid, visitor_ip: IpAddr) -> Result<bool>;

    /// 返回 `true` 表示新插入（首次浏览），`false` 表示该组合已存在
    async fn record(&self, kind: EntityKind, id: Uuid, visitor_ip: IpAddr) -> Result<bool>;
}
