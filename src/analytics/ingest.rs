//! 事件接收 API
//!
//! 上层接口代码（列表页 / 详情页 / 点击跳转）只和这里打交道：
//! - 曝光：只写快速计数存储，失败即丢弃（fire-and-forget 热路径）
//! - 浏览：可等待，也可脱离请求关键路径异步投递
//! - 点击：同步写持久记录，响应体需要新的点击总数

use std::net::IpAddr;
use std::sync::Arc;

use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::analytics::{EntityAnalytics, impression_key};
use crate::counter::CounterStore;
use crate::errors::{BlogstatsError, Result};
use crate::storage::{EntityKind, EntityStore};

pub struct EventIngestor {
    counter: Arc<dyn CounterStore>,
    analytics: Arc<EntityAnalytics>,
    entities: Arc<dyn EntityStore>,
}

impl EventIngestor {
    pub fn new(
        counter: Arc<dyn CounterStore>,
        analytics: Arc<EntityAnalytics>,
        entities: Arc<dyn EntityStore>,
    ) -> Self {
        Self {
            counter,
            analytics,
            entities,
        }
    }

    /// 记录一次曝光（列表/详情渲染时每次调用）
    ///
    /// 只自增快速存储里的缓冲计数，不触碰持久存储。计数存储故障时
    /// 丢弃本次事件并记录日志，绝不向 HTTP 调用方冒泡。
    pub async fn record_impression(&self, kind: EntityKind, id: Uuid) {
        let key = impression_key(kind, id);
        match self.counter.increment(&key).await {
            Ok(value) => debug!("buffered impression for {} -> {}", key, value),
            Err(e) => warn!("dropping impression for {}: {}", key, e),
        }
    }

    /// 记录一次点击，返回更新后的点击总数
    ///
    /// 调用方传 slug；找不到实体时返回 `NotFound`，由上层翻译成 404。
    pub async fn record_click(&self, kind: EntityKind, slug: &str) -> Result<u64> {
        let entity = self
            .entities
            .find_by_slug(kind, slug)
            .await?
            .ok_or_else(|| {
                BlogstatsError::not_found(format!("no {} with slug '{}'", kind, slug))
            })?;

        let record = self.analytics.increment_clicks(kind, entity.id).await?;
        Ok(record.clicks)
    }

    /// 记录一次浏览（按访客 IP 去重），返回是否计入
    pub async fn record_view(&self, kind: EntityKind, id: Uuid, visitor_ip: IpAddr) -> Result<bool> {
        self.analytics.increment_view(kind, id, visitor_ip).await
    }

    /// 浏览记录的异步投递形式：立即返回，计数在后台完成
    ///
    /// 响应先于计数完成是正常的；后台失败时本次浏览被丢弃（只记日志），
    /// 同一访客下次访问仍会被账本判定为首次。
    pub fn record_view_detached(&self, kind: EntityKind, id: Uuid, visitor_ip: IpAddr) {
        let analytics = Arc::clone(&self.analytics);
        tokio::spawn(async move {
            if let Err(e) = analytics.increment_view(kind, id, visitor_ip).await {
                info!("dropping view for {} {}: {}", kind, id, e);
            }
        });
    }
}
