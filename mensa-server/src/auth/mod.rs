//! 认证授权模块
//!
//! 提供 JWT 认证、角色与限流：
//! - [`JwtService`] - JWT 令牌服务
//! - [`CurrentUser`] - 当前用户上下文
//! - [`RateLimiter`] - 入口限流

pub mod extractor;
pub mod jwt;
pub mod rate_limit;

pub use jwt::{Claims, CurrentUser, JwtConfig, JwtError, JwtService, Role};
pub use rate_limit::{RateDecision, RateLimiter};
