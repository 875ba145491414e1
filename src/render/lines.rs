//! 线段展开（渲染阶段）
//!
//! 每个火花展开为一条沿速度方向的短线段，近似运动拖尾；发射器不产生几何。

use crate::particles::Particle;
use glam::{Mat4, Vec2, Vec4};
use rayon::prelude::*;

/// 默认拖尾长度系数
pub const DEFAULT_STREAK_LENGTH: f32 = 0.15;

/// 线段端点
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineVertex {
    /// 裁剪空间位置
    pub clip_position: Vec4,
    /// 纹理坐标
    pub tex_coord: Vec2,
}

impl LineVertex {
    /// 线性插值两个端点的全部属性
    pub fn lerp(self, other: Self, t: f32) -> Self {
        Self {
            clip_position: self.clip_position.lerp(other.clip_position, t),
            tex_coord: self.tex_coord.lerp(other.tex_coord, t),
        }
    }
}

/// 两个端点的线段图元
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineSegment {
    pub endpoints: [LineVertex; 2],
}

impl LineSegment {
    /// 线段上参数 t 处的插值顶点（t 会被限制在 [0, 1]）
    pub fn interpolate(&self, t: f32) -> LineVertex {
        let [start, end] = self.endpoints;
        start.lerp(end, t.clamp(0.0, 1.0))
    }
}

/// 线段展开器
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineExpansion {
    /// 拖尾长度系数
    pub streak_length: f32,
}

impl Default for LineExpansion {
    fn default() -> Self {
        Self::new(DEFAULT_STREAK_LENGTH)
    }
}

impl LineExpansion {
    pub fn new(streak_length: f32) -> Self {
        Self { streak_length }
    }

    /// 单个粒子的线段，发射器返回 `None`
    pub fn expand_one(&self, particle: &Particle, view_proj: Mat4) -> Option<LineSegment> {
        if !particle.is_flare() {
            return None;
        }
        let head = particle.position;
        let tail = head + self.streak_length * particle.velocity;
        Some(LineSegment {
            endpoints: [
                LineVertex {
                    clip_position: view_proj * head.extend(1.0),
                    tex_coord: Vec2::ZERO,
                },
                LineVertex {
                    clip_position: view_proj * tail.extend(1.0),
                    tex_coord: Vec2::ONE,
                },
            ],
        })
    }

    /// 展开整条粒子流；不修改输入
    pub fn expand(&self, particles: &[Particle], view_proj: Mat4) -> Vec<LineSegment> {
        particles
            .par_iter()
            .filter_map(|p| self.expand_one(p, view_proj))
            .collect()
    }
}
