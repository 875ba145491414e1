//! 统一错误处理模块
//!
//! 提供粒子系统范围内的统一错误类型定义
//!
//! ## 错误类型分层
//!
//! - **配置错误** (`config::ConfigError`): 配置文件读取、解析与校验
//! - **渲染错误** (`RenderError`): GPU 适配器、设备与纹理资源
//!
//! 模拟规则与线段展开本身不会失败，错误只出现在系统边界（配置、资源上传、设备初始化）。

use crate::config::ConfigError;
use thiserror::Error;

/// 粒子系统核心错误类型
#[derive(Error, Debug)]
pub enum SparkError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Render error: {0}")]
    Render(#[from] RenderError),

    #[error("Invalid noise table: {0}")]
    InvalidNoise(String),
}

/// 渲染系统错误
#[derive(Error, Debug, Clone)]
pub enum RenderError {
    #[error("Failed to request adapter: no compatible GPU found")]
    NoAdapter,

    #[error("Failed to request device: {0}")]
    DeviceRequest(String),

    #[error("Invalid streak atlas: {0}")]
    InvalidAtlas(String),

    #[error("Invalid height map: {0}")]
    InvalidHeightMap(String),

    #[error("Device limit exceeded: {0}")]
    LimitExceeded(String),
}

/// 结果类型别名
pub type SparkResult<T> = Result<T, SparkError>;
pub type RenderResult<T> = Result<T, RenderError>;
