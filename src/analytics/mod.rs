//! 统计聚合核心
//!
//! - `service`: 按实体种类参数化的统计记录服务（曝光/浏览/点击计数）
//! - `ingest`: 面向上层接口代码的事件接收 API
//! - `reconcile`: 周期性把缓冲曝光量刷入持久存储的对账任务

pub mod ingest;
pub mod reconcile;
pub mod service;

pub use ingest::EventIngestor;
pub use reconcile::{ReconcileJob, ReconcileReport};
pub use service::EntityAnalytics;

use uuid::Uuid;

use crate::storage::EntityKind;

/// 缓冲曝光计数的 key：`{kind}:impressions:{entity_id}`
pub fn impression_key(kind: EntityKind, id: Uuid) -> String {
    format!("{}:impressions:{}", kind.as_str(), id)
}

/// 某一实体种类下所有缓冲 key 的公共前缀
pub fn impression_key_prefix(kind: EntityKind) -> String {
    format!("{}:impressions:", kind.as_str())
}

/// 从缓冲 key 解析出实体种类和 ID，格式不合法时返回 `None`
pub fn parse_impression_key(key: &str) -> Option<(EntityKind, Uuid)> {
    let mut parts = key.splitn(3, ':');
    let kind: EntityKind = parts.next()?.parse().ok()?;
    if parts.next()? != "impressions" {
        return None;
    }
    let id = Uuid::parse_str(parts.next()?).ok()?;
    Some((kind, id))
}
