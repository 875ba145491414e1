//! 火花粒子模块（CPU 参考实现）
//!
//! 单个发射器周期性地喷出火花，火花在恒定加速度下做抛体运动，超过寿命后被剔除。
//! 整个系统只有一种图元：粒子，发射器本身也是流中的一个粒子。
//!
//! ## 架构设计
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │                     Spark Frame                          │
//! ├─────────────────────────────────────────────────────────┤
//! │  1. Simulate (stream_out)                                │
//! │     - 读取当前流，每个粒子产生 0..=burst+1 个输出          │
//! │     - 发射器：计时，到期时爆发一组火花                     │
//! │     - 火花：积分运动，超过寿命时剔除                       │
//! │                                                          │
//! │  2. Barrier + Swap                                       │
//! │     - 所有输出写完后交换读写流                             │
//! │                                                          │
//! │  3. Render (LineExpansion)                               │
//! │     - 火花展开为沿速度方向的线段，发射器不产生几何          │
//! └─────────────────────────────────────────────────────────┘
//! ```
//!
//! ## 使用示例
//!
//! ```
//! use fire_sparks::config::SimulationConfig;
//! use fire_sparks::particles::{FrameParams, SparkSystem};
//!
//! let config = SimulationConfig::default();
//! let mut system = SparkSystem::from_config(&config).unwrap();
//! let mut frame = FrameParams::from_config(&config);
//!
//! frame.advance(0.3);
//! let stats = system.simulate(&frame);
//! assert_eq!(stats.alive, 1 + config.burst_size as usize);
//! ```

pub mod frame;
pub mod noise;
pub mod particle;
pub mod simulate;
pub mod stream;
pub mod system;

pub use frame::FrameParams;
pub use noise::{ConstantSource, NoiseTable, RandomVectorSource};
pub use particle::{GpuParticle, Particle, ParticleKind};
pub use simulate::{SimulationRule, StepOutcome};
pub use stream::{stream_out, ParticleStream, StreamBuffers, StreamOutReport};
pub use system::{SparkStats, SparkSystem};
