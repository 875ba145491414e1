//! 日志初始化
//!
//! 配置 tracing 日志框架。`RUST_LOG` 环境变量优先于配置文件中的日志级别。

use crate::config::LoggingConfig;
use tracing_subscriber::EnvFilter;

/// 初始化日志系统
///
/// 重复调用是安全的：已经安装过全局订阅者时直接返回。
pub fn init_logging(config: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.level.as_filter()));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(config.with_target)
        .try_init();

    tracing::info!(target: "sparks", "Logging initialized at level {:?}", config.level);
}
