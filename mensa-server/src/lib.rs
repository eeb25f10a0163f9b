//! Mensa Server - 食堂订餐与取餐核销服务
//!
//! # 架构概述
//!
//! 本模块是服务的主入口，提供以下核心功能：
//!
//! - **订餐准入** (`ordering::admission`): 重复/节假日/截止/容量仲裁
//! - **取餐核销** (`ordering::checkin`): QR 与人工查找，跨夜班次回退
//! - **取消** (`ordering::cancel`): 与创建共用同一截止公式
//! - **数据库** (`db`): 嵌入式 SQLite 存储，条件更新保证至多一次状态迁移
//! - **认证** (`auth`): JWT 验证与入口限流
//! - **HTTP API** (`api`): RESTful API 接口
//!
//! # 模块结构
//!
//! ```text
//! mensa-server/src/
//! ├── core/          # 配置、状态、服务器
//! ├── auth/          # JWT 认证、限流
//! ├── services/      # 通知、令牌渲染、照片存储
//! ├── api/           # HTTP 路由和处理器
//! ├── ordering/      # 订餐准入与核销引擎
//! ├── utils/         # 工具函数
//! └── db/            # 数据库层
//! ```

pub mod api;
pub mod auth;
pub mod core;
pub mod db;
pub mod ordering;
pub mod services;
pub mod utils;

// Re-export 公共类型
pub use auth::{CurrentUser, JwtService, Role};
pub use core::{Config, Server, ServerState};
pub use ordering::{CheckinOutcome, CutoffDecision};
pub use utils::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};

// Audit logging macro - 关键业务操作审计 (tracing target: "audit")
#[macro_export]
macro_rules! audit_log {
    ($action:expr, $($fields:tt)+) => {
        tracing::info!(
            target: "audit",
            action = $action,
            $($fields)+
        );
    };
}

// Security logging macro - 支持 tracing 格式说明符
#[macro_export]
macro_rules! security_log {
    ($level:expr, $event:expr, $($key:ident = $value:expr),*) => {
        tracing::info!(
            target: "security",
            level = $level,
            event = $event,
            $($key = $value),*
        );
    };
}

/// 设置运行环境 (dotenv + 日志)
pub fn setup_environment() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();

    let log_level = std::env::var("LOG_LEVEL").ok();
    let log_dir = std::env::var("LOG_DIR").ok();
    init_logger_with_file(log_level.as_deref(), log_dir.as_deref());

    Ok(())
}

pub fn print_banner() {
    println!(
        r#"
    __  ___
   /  |/  /__  ____  _________ _
  / /|_/ / _ \/ __ \/ ___/ __ `/
 / /  / /  __/ / / (__  ) /_/ /
/_/  /_/\___/_/ /_/____/\__,_/
    "#
    );
}
