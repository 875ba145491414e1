//! 生命周期与物理规则（模拟阶段）
//!
//! 逐粒子、与顺序无关的转移函数：输入一个粒子，输出 0、1 或 1 + burst 个粒子。
//! 所有粒子并行独立地应用该函数，输出拼接成下一帧的粒子流（顺序不保证）。

use super::frame::FrameParams;
use super::noise::RandomVectorSource;
use super::particle::{Particle, ParticleKind};
use crate::config::SimulationConfig;
use glam::{Vec2, Vec3};

/// 模拟规则常量
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimulationRule {
    /// 发射周期（秒）
    pub emit_period: f32,
    /// 每次爆发的火花数
    pub burst_size: u32,
    /// 火花最大寿命（秒）
    pub max_lifetime: f32,
    /// 水平速度缩放
    pub spray_horizontal: f32,
    /// 垂直速度偏置
    pub spray_vertical: f32,
    /// 出生点垂直偏移
    pub spawn_height: f32,
    /// 火花尺寸
    pub flare_size: Vec2,
}

impl Default for SimulationRule {
    fn default() -> Self {
        Self::from_config(&SimulationConfig::default())
    }
}

impl SimulationRule {
    pub fn from_config(config: &SimulationConfig) -> Self {
        Self {
            emit_period: config.emit_period,
            burst_size: config.burst_size,
            max_lifetime: config.max_lifetime,
            spray_horizontal: config.spray_horizontal,
            spray_vertical: config.spray_vertical,
            spawn_height: config.spawn_height,
            flare_size: config.flare_size,
        }
    }

    /// 单个粒子的最大输出数
    pub fn max_outputs(&self) -> usize {
        1 + self.burst_size as usize
    }

    /// 对单个粒子应用规则
    pub fn apply<N>(&self, particle: &Particle, frame: &FrameParams, noise: &N) -> StepOutcome
    where
        N: RandomVectorSource + ?Sized,
    {
        let dt = frame.clamped_time_step();
        let mut p = *particle;
        p.age += dt;

        match p.kind {
            ParticleKind::Emitter => {
                if p.age > self.emit_period {
                    let flares = self.burst(frame, noise);
                    p.age = 0.0;
                    StepOutcome::Burst { emitter: p, flares }
                } else {
                    StepOutcome::Survived(p)
                }
            }
            ParticleKind::Flare => {
                let a = frame.acceleration;
                p.position += 0.5 * dt * dt * a + dt * p.velocity;
                p.velocity += dt * a;
                if p.age <= self.max_lifetime {
                    StepOutcome::Survived(p)
                } else {
                    StepOutcome::Culled
                }
            }
        }
    }

    /// 生成一次爆发的火花
    ///
    /// 偏移按 `i / burst_size` 分布在一个采样周期内：整数偏移在周期寻址下会落到同一个纹素。
    fn burst<N>(&self, frame: &FrameParams, noise: &N) -> Vec<Particle>
    where
        N: RandomVectorSource + ?Sized,
    {
        let origin = frame.emit_pos.truncate() + Vec3::new(0.0, self.spawn_height, 0.0);
        (0..self.burst_size)
            .map(|i| {
                let offset = i as f32 / self.burst_size as f32;
                let dir = noise.sample_unit(frame.scene_time, offset);
                // 取 |y| 再加偏置，保证竖直速度不低于 spray_vertical
                let velocity = Vec3::new(
                    dir.x * self.spray_horizontal,
                    dir.y.abs() + self.spray_vertical,
                    dir.z * self.spray_horizontal,
                );
                Particle::flare(origin, velocity, self.flare_size)
            })
            .collect()
    }
}

/// 单个粒子的模拟结果
#[derive(Debug, Clone, PartialEq)]
pub enum StepOutcome {
    /// 火花超过寿命，不再追加
    Culled,
    /// 粒子存活（火花或未触发的发射器）
    Survived(Particle),
    /// 发射器触发爆发：发射器本身加新生火花
    Burst {
        emitter: Particle,
        flares: Vec<Particle>,
    },
}

impl StepOutcome {
    /// 本次新生成的火花数
    pub fn spawned(&self) -> usize {
        match self {
            StepOutcome::Burst { flares, .. } => flares.len(),
            _ => 0,
        }
    }

    /// 本次剔除的火花数
    pub fn culled(&self) -> usize {
        match self {
            StepOutcome::Culled => 1,
            _ => 0,
        }
    }

    /// 输出粒子数
    pub fn len(&self) -> usize {
        match self {
            StepOutcome::Culled => 0,
            StepOutcome::Survived(_) => 1,
            StepOutcome::Burst { flares, .. } => 1 + flares.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, StepOutcome::Culled)
    }
}

impl IntoIterator for StepOutcome {
    type Item = Particle;
    type IntoIter = std::iter::Chain<std::option::IntoIter<Particle>, std::vec::IntoIter<Particle>>;

    fn into_iter(self) -> Self::IntoIter {
        let (head, tail) = match self {
            StepOutcome::Culled => (None, Vec::new()),
            StepOutcome::Survived(p) => (Some(p), Vec::new()),
            StepOutcome::Burst { emitter, flares } => (Some(emitter), flares),
        };
        head.into_iter().chain(tail)
    }
}
