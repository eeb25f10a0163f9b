use serde::{Deserialize, Serialize};

/// 领域事件载荷 (服务端 -> 外部通知器)
///
/// 通知器收到 `{event, payload, timestamp}`；投递是 fire-and-forget，
/// 投递失败不回滚底层状态变更。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventPayload {
    /// 事件名称 ("order:created", "order:checkin", "order:cancelled")
    pub event: String,
    /// 事件发生时间 (Unix millis)
    pub timestamp: i64,
    /// 业务数据 (JSON)
    pub data: serde_json::Value,
}

/// 同步信号载荷 (服务端 -> 客户端)
///
/// 资源变更通知，客户端通过版本号判断数据新旧。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SyncPayload {
    /// 资源类型 (如 "reservation")
    pub resource: String,
    /// 递增版本号
    pub version: u64,
    /// 变更类型 ("created", "checked_in", "cancelled")
    pub action: String,
    /// 资源 ID
    pub id: String,
    /// 资源数据 (deleted 时为 None)
    pub data: Option<serde_json::Value>,
}
