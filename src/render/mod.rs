//! 渲染模块
//!
//! - `lines` - CPU 线段展开，与 GPU 顶点着色器输出一致
//! - `atlas` - 拖尾纹理数组与 clamp-to-edge 双线性采样
//! - `gpu` - wgpu 上的流输出模拟与间接绘制

pub mod atlas;
pub mod gpu;
pub mod lines;

pub use atlas::{shade, StreakAtlas};
pub use gpu::{GpuSparkSystem, HeightMap};
pub use lines::{LineExpansion, LineSegment, LineVertex, DEFAULT_STREAK_LENGTH};
