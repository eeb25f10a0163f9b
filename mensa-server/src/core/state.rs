use std::path::PathBuf;
use std::sync::Arc;

use dashmap::DashMap;
use sqlx::SqlitePool;
use tokio_util::sync::CancellationToken;

use crate::auth::{JwtService, RateLimiter};
use crate::core::Config;
use crate::db::DbService;
use crate::services::{NotifierService, PhotoStoreService, TokenRenderService};
use shared::message::{BusMessage, EventPayload, SyncPayload};

/// 资源版本管理器
///
/// 使用 DashMap 实现无锁并发的版本号管理。
/// 每种资源类型维护独立的版本号，支持原子递增。
///
/// 用于 broadcast_sync 时自动生成递增的版本号，
/// 确保客户端可以通过版本号判断数据新旧。
#[derive(Debug, Default)]
pub struct ResourceVersions {
    versions: DashMap<String, u64>,
}

impl ResourceVersions {
    /// 创建空的版本管理器
    pub fn new() -> Self {
        Self {
            versions: DashMap::new(),
        }
    }

    /// 递增指定资源的版本号并返回新值
    ///
    /// 如果资源不存在，从 0 开始递增（返回 1）
    pub fn increment(&self, resource: &str) -> u64 {
        let mut entry = self.versions.entry(resource.to_string()).or_insert(0);
        *entry += 1;
        *entry
    }

    /// 获取指定资源的当前版本号
    ///
    /// 如果资源不存在，返回 0
    pub fn get(&self, resource: &str) -> u64 {
        self.versions.get(resource).map(|v| *v).unwrap_or(0)
    }
}

/// 服务器状态 - 持有所有服务的共享引用
///
/// 使用 Arc / 连接池实现浅拷贝，克隆成本极低。
///
/// # 服务组件
///
/// | 字段 | 说明 |
/// |------|------|
/// | config | 配置项 (不可变) |
/// | pool | SQLite 连接池 |
/// | notifier | 事件通知总线 |
/// | token_render | QR 令牌渲染 |
/// | photo_store | 取餐照片存储 |
/// | jwt_service | JWT 认证服务 |
/// | rate_limiter | 入口限流 |
/// | resource_versions | 资源版本管理 |
#[derive(Clone)]
pub struct ServerState {
    /// 服务器配置
    pub config: Config,
    /// SQLite 连接池
    pub pool: SqlitePool,
    /// 事件通知总线
    pub notifier: NotifierService,
    /// QR 令牌渲染服务
    pub token_render: TokenRenderService,
    /// 取餐照片存储
    pub photo_store: PhotoStoreService,
    /// JWT 认证服务 (Arc 共享所有权)
    pub jwt_service: Arc<JwtService>,
    /// 入口限流器
    pub rate_limiter: RateLimiter,
    /// 资源版本管理器 (用于 broadcast_sync 自动递增版本号)
    pub resource_versions: Arc<ResourceVersions>,
    /// 关机信号
    pub shutdown: CancellationToken,
}

impl ServerState {
    /// 初始化服务器状态
    ///
    /// 按顺序初始化：
    /// 1. 工作目录结构 (确保目录存在)
    /// 2. 数据库 (work_dir/database/mensa.db)
    /// 3. 各服务 (Notifier, TokenRender, PhotoStore, JWT, RateLimiter)
    ///
    /// # Panics
    ///
    /// 数据库初始化失败时 panic
    pub async fn initialize(config: &Config) -> Self {
        // 0. Ensure work_dir structure exists
        config
            .ensure_work_dir_structure()
            .expect("Failed to create work directory structure");

        // 1. Initialize DB
        let db_path = config.database_dir().join("mensa.db");
        let db_path_str = db_path.to_string_lossy();

        let db_service = DbService::new(&db_path_str)
            .await
            .expect("Failed to initialize database");

        // 2. Initialize Services
        let notifier = NotifierService::new();
        let token_render = TokenRenderService::new();
        let photo_store = PhotoStoreService::new(PathBuf::from(&config.work_dir));
        let jwt_service = Arc::new(JwtService::with_config(config.jwt.clone()));
        let rate_limiter = RateLimiter::new();
        let resource_versions = Arc::new(ResourceVersions::new());

        Self {
            config: config.clone(),
            pool: db_service.pool,
            notifier,
            token_render,
            photo_store,
            jwt_service,
            rate_limiter,
            resource_versions,
            shutdown: CancellationToken::new(),
        }
    }

    /// 启动后台任务
    ///
    /// 必须在 `Server::run()` 之前调用
    ///
    /// 启动的任务：
    /// - 限流器过期条目清理
    pub fn start_background_tasks(&self) {
        let limiter = self.rate_limiter.clone();
        let shutdown = self.shutdown.clone();
        tokio::spawn(async move {
            loop {
                tokio::select! {
                    _ = tokio::time::sleep(std::time::Duration::from_secs(300)) => {
                        limiter.cleanup().await;
                    }
                    _ = shutdown.cancelled() => {
                        tracing::info!("Rate limiter cleanup task received shutdown signal");
                        return;
                    }
                }
            }
        });
    }

    /// 获取 JWT 服务
    pub fn get_jwt_service(&self) -> Arc<JwtService> {
        self.jwt_service.clone()
    }

    /// 发布领域事件 (fire-and-forget)
    ///
    /// 通知失败不影响底层状态变更；`now_millis` 为请求入口捕获的时间。
    pub fn publish_event<T: serde::Serialize>(&self, event: &str, data: &T, now_millis: i64) {
        let payload = EventPayload {
            event: event.to_string(),
            timestamp: now_millis,
            data: serde_json::to_value(data).unwrap_or(serde_json::Value::Null),
        };
        let delivered = self.notifier.publish(BusMessage::event(&payload));
        tracing::debug!(event, delivered, "domain event published");
    }

    /// 广播同步消息
    ///
    /// 向所有订阅者广播资源变更通知。
    /// 版本号由 ResourceVersions 自动递增管理。
    ///
    /// # 参数
    /// - `resource`: 资源类型 (如 "reservation")
    /// - `action`: 变更类型 ("created", "checked_in", "cancelled")
    /// - `id`: 资源 ID
    /// - `data`: 资源数据 (deleted 时为 None)
    pub fn broadcast_sync<T: serde::Serialize>(
        &self,
        resource: &str,
        action: &str,
        id: &str,
        data: Option<&T>,
    ) {
        let version = self.resource_versions.increment(resource);
        let payload = SyncPayload {
            resource: resource.to_string(),
            version,
            action: action.to_string(),
            id: id.to_string(),
            data: data.and_then(|d| serde_json::to_value(d).ok()),
        };
        let _ = self.notifier.publish(BusMessage::sync(&payload));
    }
}
