use std::fmt;
use std::net::IpAddr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// 统计对象的种类（文章 / 分类）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    Post,
    Category,
}

impl EntityKind {
    /// 对账任务按种类遍历缓冲 key 时使用
    pub const ALL: [EntityKind; 2] = [EntityKind::Post, EntityKind::Category];

    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::Post => "post",
            EntityKind::Category => "category",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for EntityKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "post" => Ok(EntityKind::Post),
            "category" => Ok(EntityKind::Category),
            other => Err(format!("unknown entity kind: '{other}'")),
        }
    }
}

/// 被统计的内容实体（文章或分类）。实体本身由上层 CRUD 代码管理，
/// 本 crate 只做存在性检查和 slug 查找。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Entity {
    pub id: Uuid,
    pub kind: EntityKind,
    pub slug: String,
    pub title: String,
    pub created_at: DateTime<Utc>,
}

impl Entity {
    pub fn new(kind: EntityKind, slug: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind,
            slug: slug.into(),
            title: title.into(),
            created_at: Utc::now(),
        }
    }
}

/// 每个实体一条的持久化统计记录
///
/// `click_through_rate` 是派生值，必须和 `clicks`/`impressions` 同步更新，
/// 因此重算入口是 crate 私有的，只在存储层的原子更新里调用。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyticsRecord {
    pub entity_id: Uuid,
    pub kind: EntityKind,
    pub views: u64,
    pub impressions: u64,
    pub clicks: u64,
    pub click_through_rate: f64,
    pub avg_time_on_page: f64,
}

impl AnalyticsRecord {
    pub fn new(kind: EntityKind, entity_id: Uuid) -> Self {
        Self {
            entity_id,
            kind,
            views: 0,
            impressions: 0,
            clicks: 0,
            click_through_rate: 0.0,
            avg_time_on_page: 0.0,
        }
    }

    /// clicks / impressions * 100，曝光为 0 时为 0
    pub(crate) fn recompute_click_through_rate(&mut self) {
        if self.impressions > 0 {
            self.click_through_rate = self.clicks as f64 / self.impressions as f64 * 100.0;
        } else {
            self.click_through_rate = 0.0;
        }
    }
}

/// 去重账本条目：`(kind, entity_id, visitor_ip)` 存在即表示该访客的浏览已计数
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ViewRecord {
    pub entity_id: Uuid,
    pub kind: EntityKind,
    pub visitor_ip: IpAddr,
    pub timestamp: DateTime<Utc>,
}
