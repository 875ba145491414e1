//! 粒子数据模型
//!
//! 流中只有一种实体：粒子。`kind` 标签区分管理用的发射器和可见的火花。

use glam::{Vec2, Vec3};

/// 粒子种类
#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParticleKind {
    /// 永生的发射器，周期性生成火花，不参与渲染
    Emitter = 0,
    /// 有限寿命的火花
    Flare = 1,
}

impl ParticleKind {
    /// GPU 端的标签值
    pub fn as_tag(self) -> u32 {
        self as u32
    }

    /// 从 GPU 标签解码，未知值按火花处理
    pub fn from_tag(tag: u32) -> Self {
        match tag {
            0 => ParticleKind::Emitter,
            _ => ParticleKind::Flare,
        }
    }
}

/// 粒子
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Particle {
    /// 世界空间位置
    pub position: Vec3,
    /// 世界空间速度
    pub velocity: Vec3,
    /// 尺寸（保留给公告板缩放，线段渲染不使用）
    pub size: Vec2,
    /// 火花：出生以来的时间；发射器：距上次爆发的时间
    pub age: f32,
    /// 种类
    pub kind: ParticleKind,
}

impl Particle {
    /// 创建发射器粒子
    pub fn emitter(position: Vec3) -> Self {
        Self {
            position,
            velocity: Vec3::ZERO,
            size: Vec2::ZERO,
            age: 0.0,
            kind: ParticleKind::Emitter,
        }
    }

    /// 创建新生火花（age = 0）
    pub fn flare(position: Vec3, velocity: Vec3, size: Vec2) -> Self {
        Self {
            position,
            velocity,
            size,
            age: 0.0,
            kind: ParticleKind::Flare,
        }
    }

    pub fn is_emitter(&self) -> bool {
        self.kind == ParticleKind::Emitter
    }

    pub fn is_flare(&self) -> bool {
        self.kind == ParticleKind::Flare
    }
}

/// GPU 粒子结构（对应 WGSL struct Particle）
///
/// 布局：`position.xyz + age`、`velocity.xyz + kind`、`size.xy + padding`，共 48 字节。
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct GpuParticle {
    /// 位置
    pub position: [f32; 3],
    /// 年龄
    pub age: f32,
    /// 速度
    pub velocity: [f32; 3],
    /// 种类标签
    pub kind: u32,
    /// 尺寸
    pub size: [f32; 2],
    /// 填充
    pub _pad: [f32; 2],
}

impl From<Particle> for GpuParticle {
    fn from(particle: Particle) -> Self {
        Self {
            position: particle.position.to_array(),
            age: particle.age,
            velocity: particle.velocity.to_array(),
            kind: particle.kind.as_tag(),
            size: particle.size.to_array(),
            _pad: [0.0; 2],
        }
    }
}

impl From<GpuParticle> for Particle {
    fn from(gpu: GpuParticle) -> Self {
        Self {
            position: Vec3::from_array(gpu.position),
            velocity: Vec3::from_array(gpu.velocity),
            size: Vec2::from_array(gpu.size),
            age: gpu.age,
            kind: ParticleKind::from_tag(gpu.kind),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gpu_particle_layout() {
        assert_eq!(std::mem::size_of::<GpuParticle>(), 48);
        assert_eq!(std::mem::align_of::<GpuParticle>(), 4);
    }

    #[test]
    fn test_gpu_conversion_preserves_fields() {
        let mut flare = Particle::flare(
            Vec3::new(1.0, 2.0, 3.0),
            Vec3::new(-4.0, 40.5, 6.0),
            Vec2::ONE,
        );
        flare.age = 1.25;

        let gpu = GpuParticle::from(flare);
        assert_eq!(gpu.kind, 1);
        assert_eq!(gpu.age, 1.25);
        assert_eq!(Particle::from(gpu), flare);

        let emitter = Particle::emitter(Vec3::ZERO);
        assert_eq!(Particle::from(GpuParticle::from(emitter)), emitter);
    }

    #[test]
    fn test_kind_tags() {
        assert_eq!(ParticleKind::Emitter.as_tag(), 0);
        assert_eq!(ParticleKind::from_tag(1), ParticleKind::Flare);
        assert_eq!(ParticleKind::from_tag(42), ParticleKind::Flare);
        assert!(Particle::emitter(Vec3::ZERO).is_emitter());
        assert!(Particle::flare(Vec3::ZERO, Vec3::Y, Vec2::ONE).is_flare());
    }
}
