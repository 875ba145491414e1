//! CPU 帧驱动
//!
//! 持有规则、随机源和双缓冲流，按帧执行 模拟 → 屏障 → 交换，
//! 交换后的当前流同时供下一帧模拟和本帧渲染读取。

use super::frame::FrameParams;
use super::noise::{NoiseTable, RandomVectorSource};
use super::particle::Particle;
use super::simulate::SimulationRule;
use super::stream::{stream_out, ParticleStream, StreamBuffers};
use crate::config::{RenderConfig, SimulationConfig};
use crate::core::error::SparkResult;
use crate::render::lines::{LineExpansion, LineSegment};

/// 每帧统计
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SparkStats {
    /// 已完成的模拟帧数
    pub frame: u64,
    /// 当前流中的粒子数（含发射器）
    pub alive: usize,
    /// 当前流中的火花数
    pub flares: usize,
    /// 本帧新生火花数
    pub spawned: usize,
    /// 本帧剔除火花数
    pub culled: usize,
    /// 本帧因容量不足丢弃的粒子数
    pub dropped: usize,
}

/// 火花粒子系统（CPU 实现）
pub struct SparkSystem<N: RandomVectorSource = NoiseTable> {
    rule: SimulationRule,
    noise: N,
    buffers: StreamBuffers,
    emitter_origin: glam::Vec3,
    expansion: LineExpansion,
    frame_index: u64,
    stats: SparkStats,
}

impl SparkSystem<NoiseTable> {
    /// 按配置创建系统，随机向量表由配置中的种子生成
    pub fn from_config(config: &SimulationConfig) -> SparkResult<Self> {
        let noise = NoiseTable::seeded(config.noise_table_len, config.noise_seed)?;
        Self::with_noise(config, noise)
    }
}

impl<N: RandomVectorSource> SparkSystem<N> {
    /// 使用指定随机源创建系统
    pub fn with_noise(config: &SimulationConfig, noise: N) -> SparkResult<Self> {
        config.validate()?;

        let mut buffers = StreamBuffers::new(config.max_particles);
        buffers.seed([Particle::emitter(config.emit_position)]);

        let mut system = Self {
            rule: SimulationRule::from_config(config),
            noise,
            buffers,
            emitter_origin: config.emit_position,
            expansion: LineExpansion::default(),
            frame_index: 0,
            stats: SparkStats::default(),
        };
        system.stats = system.snapshot(0, 0, 0);

        tracing::debug!(
            target: "sparks",
            "Spark system created (capacity {}, burst {}, period {}s)",
            config.max_particles,
            config.burst_size,
            config.emit_period
        );
        Ok(system)
    }

    /// 应用渲染配置中的拖尾长度
    pub fn with_render_config(mut self, config: &RenderConfig) -> Self {
        self.expansion = LineExpansion::new(config.streak_length);
        self
    }

    /// 执行一次模拟阶段并交换缓冲
    pub fn simulate(&mut self, frame: &FrameParams) -> SparkStats {
        let rule = self.rule;
        let noise = &self.noise;
        let (current, next) = self.buffers.split();
        let report = stream_out(current.as_slice(), next, |p| rule.apply(p, frame, noise));
        self.buffers.swap();
        self.frame_index += 1;

        if report.dropped > 0 {
            tracing::warn!(
                target: "sparks",
                "Particle stream full (capacity {}), dropped {} appends",
                self.buffers.capacity(),
                report.dropped
            );
        }

        self.stats = self.snapshot(report.spawned, report.culled, report.dropped);
        tracing::debug!(
            target: "sparks",
            frame = self.stats.frame,
            alive = self.stats.alive,
            spawned = self.stats.spawned,
            culled = self.stats.culled,
            "simulate pass complete"
        );
        self.stats
    }

    /// 把当前流展开为线段
    pub fn render(&self, frame: &FrameParams) -> Vec<LineSegment> {
        self.expansion
            .expand(self.current_stream().as_slice(), frame.view_proj)
    }

    /// 当前（只读）粒子流
    pub fn current_stream(&self) -> &ParticleStream {
        self.buffers.current_stream()
    }

    pub fn stats(&self) -> SparkStats {
        self.stats
    }

    pub fn frame_index(&self) -> u64 {
        self.frame_index
    }

    pub fn rule(&self) -> &SimulationRule {
        &self.rule
    }

    pub fn noise(&self) -> &N {
        &self.noise
    }

    /// 回到只有一个发射器的初始状态
    pub fn reset(&mut self) {
        self.buffers.seed([Particle::emitter(self.emitter_origin)]);
        self.frame_index = 0;
        self.stats = self.snapshot(0, 0, 0);
    }

    fn snapshot(&self, spawned: usize, culled: usize, dropped: usize) -> SparkStats {
        let stream = self.buffers.current_stream();
        SparkStats {
            frame: self.frame_index,
            alive: stream.len(),
            flares: stream.flare_count(),
            spawned,
            culled,
            dropped,
        }
    }
}
